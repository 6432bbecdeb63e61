//! Credential service
//!
//! Issues, verifies and refreshes bearer token pairs.

use chrono::Utc;
use choose_common::{verify_password, AppError};
use choose_core::Snowflake;
use tracing::{info, instrument, warn};

use crate::dto::{AuthResponse, LoginRequest, RefreshTokenRequest, VerifyTokenRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Credential service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Exchange email and password for a token pair.
    ///
    /// Unknown email, wrong password and inactive account all fail the same way.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn obtain(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let account = self
            .ctx
            .account_repo()
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: account not found");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let is_valid = verify_password(&request.password, &account.password_hash)
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        if !is_valid {
            warn!(account_id = %account.id, "Login failed: invalid password");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }

        if !account.can_login() {
            warn!(account_id = %account.id, "Login failed: account inactive");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }

        self.ctx
            .account_repo()
            .record_login(account.id, Utc::now())
            .await?;

        info!(account_id = %account.id, "Account logged in");

        let pair = self.ctx.jwt_service().generate_token_pair(account.id)?;
        Ok(AuthResponse::from(pair))
    }

    /// Check that a token is well-formed, correctly signed and unexpired
    #[instrument(skip(self, request))]
    pub async fn verify(&self, request: VerifyTokenRequest) -> ServiceResult<()> {
        self.ctx.jwt_service().decode_token(&request.token)?;
        Ok(())
    }

    /// Exchange a refresh token for a new pair
    #[instrument(skip(self, request))]
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;
        let account_id = claims.account_id()?;

        // Deactivated or removed accounts cannot keep refreshing
        let active = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .is_some_and(|account| account.can_login());
        if !active {
            warn!(account_id = %account_id, "Refresh rejected: account unavailable");
            return Err(ServiceError::App(AppError::InvalidToken));
        }

        let pair = self.ctx.jwt_service().generate_token_pair(account_id)?;
        Ok(AuthResponse::from(pair))
    }

    /// Validate an access token and return the account ID
    pub fn authenticate(&self, token: &str) -> ServiceResult<Snowflake> {
        let claims = self.ctx.jwt_service().validate_access_token(token)?;
        Ok(claims.account_id()?)
    }
}
