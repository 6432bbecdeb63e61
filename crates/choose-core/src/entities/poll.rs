//! Poll entity - a question with a fixed number of answer slots

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{PlacesNumber, Slug, Snowflake};

/// Kind of media the poll's options carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaType {
    Image,
    Gif,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "IMAGE",
            Self::Gif => "GIF",
            Self::Video => "VIDEO",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IMAGE" => Ok(Self::Image),
            "GIF" => Ok(Self::Gif),
            "VIDEO" => Ok(Self::Video),
            other => Err(DomainError::ValidationError(format!(
                "\"{other}\" is not a valid media type"
            ))),
        }
    }
}

/// Poll entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    pub id: Snowflake,
    pub creator_id: Snowflake,
    pub title: String,
    pub slug: Slug,
    pub description: Option<String>,
    pub image: Option<String>,
    pub media_type: MediaType,
    pub places_number: PlacesNumber,
    pub created_at: DateTime<Utc>,
}

impl Poll {
    /// Create a new poll. The slug is derived from the title.
    pub fn new(
        id: Snowflake,
        creator_id: Snowflake,
        title: String,
        media_type: MediaType,
        places_number: PlacesNumber,
    ) -> Result<Self, DomainError> {
        let slug = Slug::from_title(&title)?;
        Ok(Self {
            id,
            creator_id,
            title,
            slug,
            description: None,
            image: None,
            media_type,
            places_number,
            created_at: Utc::now(),
        })
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    /// Check if the given account created this poll
    #[inline]
    pub fn is_creator(&self, account_id: Snowflake) -> bool {
        self.creator_id == account_id
    }

    /// Whether the poll already holds as many options as it has places
    #[inline]
    pub fn is_full(&self, option_count: usize) -> bool {
        option_count >= self.places_number.as_usize()
    }

    /// A bulk option list must fill every place exactly.
    pub fn check_option_count(&self, count: usize) -> Result<(), DomainError> {
        if count == self.places_number.as_usize() {
            Ok(())
        } else {
            Err(DomainError::OptionCountMismatch)
        }
    }

    /// Every stored media name referenced by the poll itself
    pub fn media_names(&self) -> impl Iterator<Item = &str> {
        self.image.as_deref().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll(places: i64) -> Poll {
        Poll::new(
            Snowflake::new(10),
            Snowflake::new(1),
            "Best Pizza Topping".to_string(),
            MediaType::Image,
            PlacesNumber::new(places).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_slug_derived_from_title() {
        assert_eq!(poll(2).slug.as_str(), "best-pizza-topping");
    }

    #[test]
    fn test_title_without_slug_characters_is_rejected() {
        let result = Poll::new(
            Snowflake::new(10),
            Snowflake::new(1),
            "???".to_string(),
            MediaType::Gif,
            PlacesNumber::new(2).unwrap(),
        );
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_is_creator() {
        let poll = poll(2);
        assert!(poll.is_creator(Snowflake::new(1)));
        assert!(!poll.is_creator(Snowflake::new(2)));
    }

    #[test]
    fn test_option_count_must_match_places() {
        let poll = poll(4);
        assert!(poll.check_option_count(4).is_ok());
        assert!(matches!(
            poll.check_option_count(3),
            Err(DomainError::OptionCountMismatch)
        ));
        assert!(poll.check_option_count(5).is_err());
        assert!(poll.check_option_count(0).is_err());
    }

    #[test]
    fn test_is_full() {
        let poll = poll(2);
        assert!(!poll.is_full(1));
        assert!(poll.is_full(2));
    }

    #[test]
    fn test_media_type_parse_and_serialize() {
        assert_eq!("gif".parse::<MediaType>().unwrap(), MediaType::Gif);
        assert!("audio".parse::<MediaType>().is_err());
        assert_eq!(serde_json::to_string(&MediaType::Video).unwrap(), "\"VIDEO\"");
    }
}
