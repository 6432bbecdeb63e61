//! Account lifecycle service
//!
//! Registration, activation, profile updates and both password flows.
//! Activation and reset links carry stateless account tokens; see
//! `choose_common::auth::account_token`.

use choose_common::{
    ensure_passwords_match, hash_password, validate_password_strength, AccountTokenGenerator,
    AppError, TokenPurpose,
};
use choose_core::entities::Account;
use choose_core::error::DomainError;
use choose_core::traits::Notification;
use choose_core::Snowflake;
use tracing::{debug, info, instrument, warn};

use crate::dto::{
    AccountResponse, ActivateRequest, AuthResponse, ChangePasswordRequest, ForgetPasswordRequest,
    RegisterRequest, ResetPasswordRequest, UpdateProfileRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::notify::{
    ACTIVATE_USER_SUBJECT, ACTIVATE_USER_TEMPLATE, PASSWORD_FORGET_SUBJECT,
    PASSWORD_FORGET_TEMPLATE,
};

const INVALID_ACTIVATION_TOKEN: &str = "Provided activation token is not valid";
const INVALID_RESET_TOKEN: &str = "Token is invalid or expired";
const UNKNOWN_EMAIL: &str = "User with this email does not exist.";
const FIELD_REQUIRED: &str = "This field is required.";

/// Report password policy failures against the given field
fn password_error(field: &'static str, err: AppError) -> ServiceError {
    match err {
        AppError::Validation(msg) => ServiceError::invalid_field(field, msg),
        other => ServiceError::App(other),
    }
}

/// Account lifecycle service
pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register an inactive account and send the activation email
    #[instrument(skip(self, request), fields(username = %request.username, email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AccountResponse> {
        validate_password_strength(&request.password)
            .map_err(|e| password_error("password", e))?;

        let repo = self.ctx.account_repo();
        if repo.email_exists(&request.email, None).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }
        if repo.username_exists(&request.username, None).await? {
            return Err(DomainError::UsernameAlreadyExists.into());
        }

        let password_hash =
            hash_password(&request.password).map_err(|e| ServiceError::internal(e.to_string()))?;
        let account = Account::new(
            self.ctx.generate_id(),
            &request.email,
            request.username,
            password_hash,
        );

        repo.create(&account).await?;
        info!(account_id = %account.id, "Account registered");

        let token = self
            .ctx
            .account_tokens()
            .issue(&account, TokenPurpose::Activation);
        self.ctx.notifier().notify(
            Notification::new(
                ACTIVATE_USER_SUBJECT,
                ACTIVATE_USER_TEMPLATE,
                account.email.clone(),
            )
            .with("url", self.ctx.links().activation_link(&token))
            .with("email", account.email.clone()),
        );

        Ok(AccountResponse::from(&account))
    }

    /// Activate the account named by the token and sign it in.
    ///
    /// Every failure reports the same message. Activating twice is harmless.
    #[instrument(skip(self, request))]
    pub async fn activate(&self, request: ActivateRequest) -> ServiceResult<AuthResponse> {
        let invalid = || ServiceError::invalid_field("token", INVALID_ACTIVATION_TOKEN);

        let email = AccountTokenGenerator::email_of(&request.token).ok_or_else(|| {
            debug!("Activation token malformed");
            invalid()
        })?;
        let mut account = self
            .ctx
            .account_repo()
            .find_by_email(&email)
            .await?
            .ok_or_else(invalid)?;

        if !self
            .ctx
            .account_tokens()
            .check(&account, TokenPurpose::Activation, &request.token)
        {
            warn!(account_id = %account.id, "Activation token rejected");
            return Err(invalid());
        }

        account.activate();
        self.ctx
            .account_repo()
            .set_active(account.id, account.is_active)
            .await?;
        info!(account_id = %account.id, "Account activated");

        let pair = self.ctx.jwt_service().generate_token_pair(account.id)?;
        Ok(AuthResponse::from(pair))
    }

    /// Profile of the signed-in account
    #[instrument(skip(self))]
    pub async fn profile(&self, actor: Snowflake) -> ServiceResult<AccountResponse> {
        let account = self.load(actor).await?;
        Ok(AccountResponse::from(&account))
    }

    /// Change username and/or email of the signed-in account.
    ///
    /// With `partial` unset both fields must be present.
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        actor: Snowflake,
        request: UpdateProfileRequest,
        partial: bool,
    ) -> ServiceResult<AccountResponse> {
        if !partial {
            if request.username.is_none() {
                return Err(ServiceError::invalid_field("username", FIELD_REQUIRED));
            }
            if request.email.is_none() {
                return Err(ServiceError::invalid_field("email", FIELD_REQUIRED));
            }
        }

        let mut account = self.load(actor).await?;
        let repo = self.ctx.account_repo();

        if let Some(username) = request.username {
            if username != account.username && repo.username_exists(&username, Some(actor)).await?
            {
                return Err(DomainError::UsernameAlreadyExists.into());
            }
            account.set_username(username);
        }
        if let Some(email) = request.email {
            if repo.email_exists(&email, Some(actor)).await? {
                return Err(DomainError::EmailAlreadyExists.into());
            }
            account.set_email(&email);
        }

        repo.update_profile(&account).await?;
        info!(account_id = %actor, "Profile updated");

        Ok(AccountResponse::from(&account))
    }

    /// Set a new password for the signed-in account
    #[instrument(skip(self, request))]
    pub async fn change_password(
        &self,
        actor: Snowflake,
        request: ChangePasswordRequest,
    ) -> ServiceResult<()> {
        ensure_passwords_match(&request.new_password, &request.confirmed_password)?;
        validate_password_strength(&request.new_password)
            .map_err(|e| password_error("new_password", e))?;

        let account = self.load(actor).await?;
        self.store_password(&account, &request.new_password).await?;
        info!(account_id = %actor, "Password changed");
        Ok(())
    }

    /// Send a password reset email. Unknown addresses are reported.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn forget_password(&self, request: ForgetPasswordRequest) -> ServiceResult<()> {
        let account = self
            .ctx
            .account_repo()
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| ServiceError::invalid_field("email", UNKNOWN_EMAIL))?;

        let token = self
            .ctx
            .account_tokens()
            .issue(&account, TokenPurpose::PasswordReset);
        self.ctx.notifier().notify(
            Notification::new(
                PASSWORD_FORGET_SUBJECT,
                PASSWORD_FORGET_TEMPLATE,
                account.email.clone(),
            )
            .with("url", self.ctx.links().password_reset_link(&token))
            .with("email", account.email.clone()),
        );

        info!(account_id = %account.id, "Password reset requested");
        Ok(())
    }

    /// Set a new password using a reset token; the token is the authorization
    #[instrument(skip(self, request))]
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> ServiceResult<()> {
        ensure_passwords_match(&request.new_password, &request.confirmed_password)?;
        validate_password_strength(&request.new_password)
            .map_err(|e| password_error("new_password", e))?;

        let invalid = || ServiceError::invalid_field("token", INVALID_RESET_TOKEN);
        let email = AccountTokenGenerator::email_of(&request.token).ok_or_else(invalid)?;
        let account = self
            .ctx
            .account_repo()
            .find_by_email(&email)
            .await?
            .ok_or_else(invalid)?;

        if !self
            .ctx
            .account_tokens()
            .check(&account, TokenPurpose::PasswordReset, &request.token)
        {
            warn!(account_id = %account.id, "Reset token rejected");
            return Err(invalid());
        }

        self.store_password(&account, &request.new_password).await?;
        info!(account_id = %account.id, "Password reset");
        Ok(())
    }

    async fn load(&self, actor: Snowflake) -> ServiceResult<Account> {
        // A valid token for a vanished account is treated as a bad credential
        self.ctx
            .account_repo()
            .find_by_id(actor)
            .await?
            .ok_or(ServiceError::App(AppError::InvalidToken))
    }

    async fn store_password(&self, account: &Account, password: &str) -> ServiceResult<()> {
        let password_hash =
            hash_password(password).map_err(|e| ServiceError::internal(e.to_string()))?;
        self.ctx
            .account_repo()
            .update_password(account.id, &password_hash)
            .await?;
        Ok(())
    }
}
