//! Poll and option entity <-> model mappers

use choose_core::entities::{MediaType, Poll, PollOption};
use choose_core::error::DomainError;
use choose_core::value_objects::{PlacesNumber, Slug, Snowflake};

use crate::models::{PollModel, PollOptionModel};

/// Rows are checked by the schema, so a failure here means the data was edited by hand
impl TryFrom<PollModel> for Poll {
    type Error = DomainError;

    fn try_from(model: PollModel) -> Result<Self, Self::Error> {
        let media_type: MediaType = model.media_type.parse().map_err(|_| {
            DomainError::DatabaseError(format!(
                "poll {} has unknown media type {}",
                model.id, model.media_type
            ))
        })?;
        let places_number = PlacesNumber::try_from(model.places_number).map_err(|_| {
            DomainError::DatabaseError(format!(
                "poll {} has invalid places_number {}",
                model.id, model.places_number
            ))
        })?;

        Ok(Poll {
            id: Snowflake::new(model.id),
            creator_id: Snowflake::new(model.creator_id),
            title: model.title,
            slug: Slug::from_stored(model.slug),
            description: model.description,
            image: model.image,
            media_type,
            places_number,
            created_at: model.created_at,
        })
    }
}

impl From<PollOptionModel> for PollOption {
    fn from(model: PollOptionModel) -> Self {
        PollOption {
            id: Snowflake::new(model.id),
            poll_id: Snowflake::new(model.poll_id),
            label: model.label,
            media: model.media,
            created_at: model.created_at,
        }
    }
}
