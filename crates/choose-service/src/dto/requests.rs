//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Rules that need the database or the object store (uniqueness, media
//! existence, option capacity) are checked by the services.

use serde::Deserialize;
use validator::{Validate, ValidationError};

use choose_core::MediaType;

/// Letters, digits and `@.+-_`
fn validate_username(username: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if username.chars().all(allowed) {
        Ok(())
    } else {
        Err(ValidationError::new("username").with_message(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .into(),
        ))
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("This field may not be blank.".into()))
    } else {
        Ok(())
    }
}

// ============================================================================
// Auth Requests
// ============================================================================

/// Credential request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,

    pub password: String,
}

/// Token verification request
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(alias = "refresh")]
    pub refresh_token: String,
}

/// Account registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1-150 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,

    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Email must be at most 254 characters")
    )]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// Account activation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ActivateRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub token: String,
}

// ============================================================================
// Profile Requests
// ============================================================================

/// Profile update; a full update must carry both fields
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1-150 characters"),
        custom(function = "validate_username")
    )]
    pub username: Option<String>,

    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Email must be at most 254 characters")
    )]
    pub email: Option<String>,
}

/// Password change for the signed-in account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub new_password: String,

    pub confirmed_password: String,
}

/// Password reset email request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgetPasswordRequest {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
}

/// Password reset with a token from the reset email
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub token: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub new_password: String,

    pub confirmed_password: String,
}

// ============================================================================
// Poll Requests
// ============================================================================

/// Reference to an uploaded media file
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MediaRef {
    #[validate(length(min = 1, max = 255, message = "Media name must be 1-255 characters"))]
    pub name: String,
}

/// Create poll request, optionally with its full option set
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePollRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(nested)]
    pub image: Option<MediaRef>,

    pub media_type: MediaType,

    /// Checked by the service so the domain message is reported
    pub places_number: i64,

    #[validate(nested)]
    pub options: Option<Vec<CreateOptionRequest>>,
}

/// Create option request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOptionRequest {
    #[validate(
        length(min = 1, max = 255, message = "Label must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub label: String,

    #[validate(nested)]
    pub media: MediaRef,
}

/// Update option request; a full update must carry both fields
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateOptionRequest {
    #[validate(
        length(min = 1, max = 255, message = "Label must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub label: Option<String>,

    #[validate(nested)]
    pub media: Option<MediaRef>,
}

// ============================================================================
// Pagination
// ============================================================================

/// Page of a listing, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE_SIZE: u32 = 20;
    pub const MAX_PAGE_SIZE: u32 = 100;

    /// Clamp the page to at least 1 and the size to 1..=100
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(Self::DEFAULT_PAGE_SIZE)
                .clamp(1, Self::MAX_PAGE_SIZE),
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_username_charset() {
        let mut request = RegisterRequest {
            username: "alice.b+c@d-e_f".to_string(),
            email: "a@x.com".to_string(),
            password: "Secret123".to_string(),
        };
        assert!(request.validate().is_ok());

        request.username = "alice smith".to_string();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
    }

    #[test]
    fn test_register_rejects_bad_email() {
        let request = RegisterRequest {
            username: "alice".to_string(),
            email: "not-an-email".to_string(),
            password: "Secret123".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_blank_label_rejected() {
        let request = CreateOptionRequest {
            label: "   ".to_string(),
            media: MediaRef {
                name: "a.jpeg".to_string(),
            },
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_poll_request_deserializes() {
        let request: CreatePollRequest = serde_json::from_value(serde_json::json!({
            "title": "Best pizza",
            "media_type": "IMAGE",
            "places_number": 2,
            "options": [
                {"label": "Margherita", "media": {"name": "a.jpeg"}},
                {"label": "Pepperoni", "media": {"name": "b.jpeg"}}
            ]
        }))
        .unwrap();
        assert_eq!(request.media_type, MediaType::Image);
        assert_eq!(request.options.as_ref().map(Vec::len), Some(2));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_page_request_bounds() {
        let page = PageRequest::new(Some(0), Some(500));
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 100);

        let page = PageRequest::new(Some(3), None);
        assert_eq!(page.limit(), 20);
        assert_eq!(page.offset(), 40);
    }
}
