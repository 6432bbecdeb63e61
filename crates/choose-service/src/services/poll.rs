//! Poll lifecycle service
//!
//! Polls are looked up by slug. Only the creator may delete a poll, and
//! everyone else is told it does not exist.

use choose_core::access::Operation;
use choose_core::entities::{Poll, PollOption};
use choose_core::error::DomainError;
use choose_core::traits::PollQuery;
use choose_core::{PlacesNumber, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{polls_with_options, CreatePollRequest, PageRequest, PageResponse, PollResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::media::{discard, MediaService};
use super::require_access;

/// Poll lifecycle service
pub struct PollService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PollService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// All polls, newest first
    #[instrument(skip(self))]
    pub async fn list(&self, page: PageRequest) -> ServiceResult<PageResponse<PollResponse>> {
        self.list_where(None, page).await
    }

    /// Polls created by the signed-in account, newest first
    #[instrument(skip(self))]
    pub async fn list_mine(
        &self,
        actor: Snowflake,
        page: PageRequest,
    ) -> ServiceResult<PageResponse<PollResponse>> {
        self.list_where(Some(actor), page).await
    }

    /// One poll with its options
    #[instrument(skip(self))]
    pub async fn get(&self, slug: &str) -> ServiceResult<PollResponse> {
        let poll = self.find(slug).await?;
        let options = self.ctx.option_repo().list_by_poll(poll.id).await?;
        Ok(PollResponse::from_poll(
            &poll,
            &options,
            self.ctx.object_store(),
        ))
    }

    /// Create a poll, optionally together with all of its options.
    ///
    /// A supplied option list must fill every place. Poll and options are
    /// stored in one transaction.
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create(
        &self,
        identity: Option<Snowflake>,
        request: CreatePollRequest,
    ) -> ServiceResult<PollResponse> {
        let actor = require_access(identity, Operation::Create, None, || {
            DomainError::AuthenticationRequired
        })?;

        let places_number = PlacesNumber::new(request.places_number)?;
        let poll = Poll::new(
            self.ctx.generate_id(),
            actor,
            request.title,
            request.media_type,
            places_number,
        )?
        .with_description(request.description);

        if let Some(options) = &request.options {
            poll.check_option_count(options.len())?;
        }

        if self
            .ctx
            .poll_repo()
            .title_or_slug_exists(&poll.title, poll.slug.as_str())
            .await?
        {
            return Err(DomainError::PollTitleExists.into());
        }

        let media = MediaService::new(self.ctx);
        if let Some(image) = &request.image {
            media.require("image", image).await?;
        }
        let mut options = Vec::new();
        for option in request.options.unwrap_or_default() {
            media.require("options", &option.media).await?;
            options.push(PollOption::new(
                self.ctx.generate_id(),
                poll.id,
                option.label,
                option.media.name,
            ));
        }

        let poll = poll.with_image(request.image.map(|image| image.name));
        self.ctx
            .poll_repo()
            .create_with_options(&poll, &options)
            .await?;

        info!(poll_id = %poll.id, slug = %poll.slug, options = options.len(), "Poll created");

        Ok(PollResponse::from_poll(
            &poll,
            &options,
            self.ctx.object_store(),
        ))
    }

    /// Delete a poll owned by the caller; its options and stored media go with it
    #[instrument(skip(self))]
    pub async fn delete(&self, identity: Option<Snowflake>, slug: &str) -> ServiceResult<()> {
        let poll = self.find(slug).await?;
        let actor = require_access(identity, Operation::Delete, Some(poll.creator_id), || {
            warn!(slug, "Delete refused: not the creator");
            DomainError::PollNotFound(slug.to_string())
        })?;

        let options = self.ctx.option_repo().list_by_poll(poll.id).await?;
        self.ctx.poll_repo().delete_owned(poll.id, actor).await?;
        info!(poll_id = %poll.id, slug, "Poll deleted");

        let names: Vec<String> = options
            .into_iter()
            .map(|option| option.media)
            .chain(poll.media_names().map(str::to_string))
            .collect();
        discard(self.ctx, &names).await;

        Ok(())
    }

    /// Resolve a slug, `PollNotFound` when there is no such poll
    pub(crate) async fn find(&self, slug: &str) -> ServiceResult<Poll> {
        Ok(self
            .ctx
            .poll_repo()
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::PollNotFound(slug.to_string()))?)
    }

    async fn list_where(
        &self,
        creator_id: Option<Snowflake>,
        page: PageRequest,
    ) -> ServiceResult<PageResponse<PollResponse>> {
        let query = PollQuery {
            creator_id,
            limit: page.limit(),
            offset: page.offset(),
        };
        let polls = self.ctx.poll_repo().list(query).await?;
        let count = self.ctx.poll_repo().count(creator_id).await?;

        let ids: Vec<Snowflake> = polls.iter().map(|poll| poll.id).collect();
        let options = self.ctx.option_repo().list_by_polls(&ids).await?;

        Ok(PageResponse::new(
            polls_with_options(&polls, options, self.ctx.object_store()),
            count,
            page,
        ))
    }
}
