//! URL-safe poll identifier derived from the title

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::DomainError;

/// Lower-case ASCII slug: letters, digits and single dashes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    /// Maximum slug length, matching the title column
    pub const MAX_LEN: usize = 255;

    /// Derive a slug from a poll title.
    ///
    /// Alphanumerics are lower-cased, whitespace, dashes and underscores collapse
    /// into a single dash, everything else is dropped.
    pub fn from_title(title: &str) -> Result<Self, DomainError> {
        let mut slug = String::with_capacity(title.len());
        let mut pending_dash = false;

        for c in title.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(c.to_ascii_lowercase());
            } else if c.is_whitespace() || c == '-' || c == '_' {
                pending_dash = true;
            }
        }

        if slug.is_empty() {
            return Err(DomainError::InvalidSlug(title.to_string()));
        }
        slug.truncate(Self::MAX_LEN);
        Ok(Self(slug.trim_end_matches('-').to_string()))
    }

    /// Wrap a slug loaded from storage
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Slug {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_title() {
        let cases = [
            ("Hello World", "hello-world"),
            ("  Cats vs. Dogs!  ", "cats-vs-dogs"),
            ("snake_case__title", "snake-case-title"),
            ("Already-a-slug", "already-a-slug"),
            ("Top 10 --- Songs", "top-10-songs"),
            ("mix日本語abc", "mixabc"),
        ];
        for (title, expected) in cases {
            assert_eq!(Slug::from_title(title).unwrap().as_str(), expected);
        }
    }

    #[test]
    fn test_deterministic() {
        let a = Slug::from_title("Same Title").unwrap();
        let b = Slug::from_title("Same Title").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_slug_rejected() {
        assert!(Slug::from_title("").is_err());
        assert!(Slug::from_title("!!! ???").is_err());
        assert!(Slug::from_title("日本語").is_err());
    }

    #[test]
    fn test_truncated_to_max_len() {
        let title = "a".repeat(400);
        assert_eq!(Slug::from_title(&title).unwrap().as_str().len(), Slug::MAX_LEN);
    }
}
