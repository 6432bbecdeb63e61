//! Service context - dependency container for services
//!
//! Holds the repositories, the object store, the notifier and the credential
//! machinery needed by services.

use std::sync::Arc;

use choose_common::{AccountTokenGenerator, JwtService, LinkConfig, MediaConfig};
use choose_core::traits::{
    AccountRepository, Notifier, ObjectStore, OptionRepository, PollRepository,
};
use choose_core::SnowflakeGenerator;
use choose_db::PgPool;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Account, poll and option repositories
/// - The object store holding uploaded media
/// - The notifier delivering account emails
/// - JWT service and account token generator
/// - Snowflake generator for ID generation
///
/// The database pool is optional so the context can be assembled over
/// in-memory repositories.
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool
    pool: Option<PgPool>,

    // Repositories
    account_repo: Arc<dyn AccountRepository>,
    poll_repo: Arc<dyn PollRepository>,
    option_repo: Arc<dyn OptionRepository>,

    // Ports
    object_store: Arc<dyn ObjectStore>,
    notifier: Arc<dyn Notifier>,

    // Services
    jwt_service: Arc<JwtService>,
    account_tokens: Arc<AccountTokenGenerator>,
    snowflake_generator: Arc<SnowflakeGenerator>,

    // Settings
    links: LinkConfig,
    media: MediaConfig,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Database Pool ===

    /// Get the PostgreSQL connection pool, if the context runs on one
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    // === Repositories ===

    pub fn account_repo(&self) -> &dyn AccountRepository {
        self.account_repo.as_ref()
    }

    pub fn poll_repo(&self) -> &dyn PollRepository {
        self.poll_repo.as_ref()
    }

    pub fn option_repo(&self) -> &dyn OptionRepository {
        self.option_repo.as_ref()
    }

    // === Ports ===

    pub fn object_store(&self) -> &dyn ObjectStore {
        self.object_store.as_ref()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Get the activation / password reset token generator
    pub fn account_tokens(&self) -> &AccountTokenGenerator {
        self.account_tokens.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> choose_core::Snowflake {
        self.snowflake_generator.generate()
    }

    // === Settings ===

    pub fn links(&self) -> &LinkConfig {
        &self.links
    }

    pub fn media(&self) -> &MediaConfig {
        &self.media
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("repositories", &"...")
            .field("links", &self.links)
            .field("media", &self.media)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    account_repo: Option<Arc<dyn AccountRepository>>,
    poll_repo: Option<Arc<dyn PollRepository>>,
    option_repo: Option<Arc<dyn OptionRepository>>,
    object_store: Option<Arc<dyn ObjectStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    jwt_service: Option<Arc<JwtService>>,
    account_tokens: Option<Arc<AccountTokenGenerator>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    links: Option<LinkConfig>,
    media: Option<MediaConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn account_repo(mut self, repo: Arc<dyn AccountRepository>) -> Self {
        self.account_repo = Some(repo);
        self
    }

    pub fn poll_repo(mut self, repo: Arc<dyn PollRepository>) -> Self {
        self.poll_repo = Some(repo);
        self
    }

    pub fn option_repo(mut self, repo: Arc<dyn OptionRepository>) -> Self {
        self.option_repo = Some(repo);
        self
    }

    pub fn object_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.object_store = Some(store);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn account_tokens(mut self, generator: Arc<AccountTokenGenerator>) -> Self {
        self.account_tokens = Some(generator);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn links(mut self, links: LinkConfig) -> Self {
        self.links = Some(links);
        self
    }

    pub fn media(mut self, media: MediaConfig) -> Self {
        self.media = Some(media);
        self
    }

    /// Build the ServiceContext
    ///
    /// Links and media settings fall back to their defaults; everything else
    /// except the pool is required.
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::internal(format!("{name} is required")))
        }

        Ok(ServiceContext {
            pool: self.pool,
            account_repo: required(self.account_repo, "account_repo")?,
            poll_repo: required(self.poll_repo, "poll_repo")?,
            option_repo: required(self.option_repo, "option_repo")?,
            object_store: required(self.object_store, "object_store")?,
            notifier: required(self.notifier, "notifier")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            account_tokens: required(self.account_tokens, "account_tokens")?,
            snowflake_generator: required(self.snowflake_generator, "snowflake_generator")?,
            links: self.links.unwrap_or_default(),
            media: self.media.unwrap_or_default(),
        })
    }
}
