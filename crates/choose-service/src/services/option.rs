//! Option service
//!
//! Options are addressed through their poll's slug. Adding checks the
//! poll's capacity inside the repository transaction.

use choose_core::access::Operation;
use choose_core::entities::{Poll, PollOption};
use choose_core::error::DomainError;
use choose_core::Snowflake;
use tracing::{info, instrument, warn};

use crate::dto::{CreateOptionRequest, OptionResponse, UpdateOptionRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::media::{discard, MediaService};
use super::poll::PollService;
use super::require_access;

const FIELD_REQUIRED: &str = "This field is required.";

/// Option service
pub struct OptionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> OptionService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Options of a poll in creation order
    #[instrument(skip(self))]
    pub async fn list(&self, slug: &str) -> ServiceResult<Vec<OptionResponse>> {
        let poll = PollService::new(self.ctx).find(slug).await?;
        let options = self.ctx.option_repo().list_by_poll(poll.id).await?;
        Ok(options
            .iter()
            .map(|option| OptionResponse::from_option(option, self.ctx.object_store()))
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, slug: &str, option_id: Snowflake) -> ServiceResult<OptionResponse> {
        let poll = PollService::new(self.ctx).find(slug).await?;
        let option = self.find(&poll, option_id).await?;
        Ok(OptionResponse::from_option(
            &option,
            self.ctx.object_store(),
        ))
    }

    /// Add one option to a poll owned by the caller, unless the poll is full
    #[instrument(skip(self, request), fields(label = %request.label))]
    pub async fn add(
        &self,
        identity: Option<Snowflake>,
        slug: &str,
        request: CreateOptionRequest,
    ) -> ServiceResult<OptionResponse> {
        let poll = self.owned_poll(identity, Operation::Create, slug).await?;
        MediaService::new(self.ctx)
            .require("media", &request.media)
            .await?;

        let option = PollOption::new(
            self.ctx.generate_id(),
            poll.id,
            request.label,
            request.media.name,
        );
        self.ctx
            .option_repo()
            .create_within_capacity(&option)
            .await
            .inspect_err(|e| {
                if matches!(e, DomainError::PollCapacityReached) {
                    warn!(poll_id = %poll.id, "Option rejected: poll is full");
                }
            })?;

        info!(poll_id = %poll.id, option_id = %option.id, "Option added");
        Ok(OptionResponse::from_option(
            &option,
            self.ctx.object_store(),
        ))
    }

    /// Replace or patch label and media. The option count does not change.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        identity: Option<Snowflake>,
        slug: &str,
        option_id: Snowflake,
        request: UpdateOptionRequest,
        partial: bool,
    ) -> ServiceResult<OptionResponse> {
        if !partial {
            if request.label.is_none() {
                return Err(ServiceError::invalid_field("label", FIELD_REQUIRED));
            }
            if request.media.is_none() {
                return Err(ServiceError::invalid_field("media", FIELD_REQUIRED));
            }
        }

        let poll = self.owned_poll(identity, Operation::Update, slug).await?;
        let mut option = self.find(&poll, option_id).await?;

        if let Some(media) = request.media {
            MediaService::new(self.ctx).require("media", &media).await?;
            option.media = media.name;
        }
        if let Some(label) = request.label {
            option.label = label;
        }

        self.ctx.option_repo().update(&option).await?;
        info!(option_id = %option.id, "Option updated");

        Ok(OptionResponse::from_option(
            &option,
            self.ctx.object_store(),
        ))
    }

    /// Delete one option of a poll owned by the caller
    #[instrument(skip(self))]
    pub async fn delete(
        &self,
        identity: Option<Snowflake>,
        slug: &str,
        option_id: Snowflake,
    ) -> ServiceResult<()> {
        let poll = self.owned_poll(identity, Operation::Delete, slug).await?;
        let option = self.find(&poll, option_id).await?;

        self.ctx.option_repo().delete(poll.id, option.id).await?;
        info!(option_id = %option.id, "Option deleted");

        discard(self.ctx, &[option.media]).await;
        Ok(())
    }

    /// The poll behind `slug`, provided the caller created it
    async fn owned_poll(
        &self,
        identity: Option<Snowflake>,
        operation: Operation,
        slug: &str,
    ) -> ServiceResult<Poll> {
        let poll = PollService::new(self.ctx).find(slug).await?;
        require_access(identity, operation, Some(poll.creator_id), || {
            warn!(slug, ?operation, "Option change refused: not the creator");
            DomainError::PollNotFound(slug.to_string())
        })?;
        Ok(poll)
    }

    async fn find(&self, poll: &Poll, option_id: Snowflake) -> ServiceResult<PollOption> {
        Ok(self
            .ctx
            .option_repo()
            .find_in_poll(poll.id, option_id)
            .await?
            .ok_or(DomainError::OptionNotFound(option_id))?)
    }
}
