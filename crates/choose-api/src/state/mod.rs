//! Shared handler state

use std::path::Path;
use std::sync::Arc;

use choose_common::AppConfig;
use choose_service::{
    AccountService, AuthService, MediaService, OptionService, PollService, ServiceContext,
};

/// Cloned into every request; both halves are reference counted.
#[derive(Clone)]
pub struct AppState {
    context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(context: ServiceContext, config: AppConfig) -> Self {
        Self {
            context: Arc::new(context),
            config: Arc::new(config),
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.context
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Directory the object store writes to
    pub fn media_root(&self) -> &Path {
        Path::new(&self.config.media.root)
    }

    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.context)
    }

    pub fn accounts(&self) -> AccountService<'_> {
        AccountService::new(&self.context)
    }

    pub fn polls(&self) -> PollService<'_> {
        PollService::new(&self.context)
    }

    pub fn options(&self) -> OptionService<'_> {
        OptionService::new(&self.context)
    }

    pub fn media(&self) -> MediaService<'_> {
        MediaService::new(&self.context)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("env", &self.config.app.env)
            .field("media_root", &self.config.media.root)
            .finish_non_exhaustive()
    }
}
