//! Authentication service
//!
//! Handles registration, email verification codes, login and password reset.

use be4real_common::auth::{generate_verification_code, hash_password, verify_password};
use be4real_common::AppError;
use be4real_core::{Snowflake, User};
use tracing::{debug, info, instrument, warn};

use crate::dto::{
    prepare, CurrentUserResponse, LoginRequest, RegisterRequest, ResetPasswordRequest,
    SendVerificationRequest, TokenResponse, VerifyUserRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new, unverified user and issue their first code
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<CurrentUserResponse> {
        let request = prepare(request)?;

        let password_hash =
            hash_password(&request.password).map_err(|e| ServiceError::internal(e.to_string()))?;

        let mut user = User::new(
            self.ctx.generate_id(),
            request.username,
            request.email,
            password_hash,
        );
        let code = generate_verification_code();
        user.verification_code = Some(code.clone());

        self.ctx.user_repo().create(&user).await?;

        info!(user_id = %user.id, "User registered");
        log_code_issued(user.id, &code);

        Ok(CurrentUserResponse::from(&user))
    }

    /// Replace the verification code of an unverified user
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn send_verification(&self, request: SendVerificationRequest) -> ServiceResult<()> {
        let request = prepare(request)?;

        let user = self
            .ctx
            .user_repo()
            .find_by_email(&request.email)
            .await?
            .filter(|u| !u.verified)
            .ok_or_else(|| ServiceError::validation("User not found or already verified"))?;

        let code = generate_verification_code();
        self.ctx.user_repo().set_verification_code(user.id, &code).await?;

        log_code_issued(user.id, &code);

        Ok(())
    }

    /// Check a verification code and log the user in
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn verify(&self, request: VerifyUserRequest) -> ServiceResult<TokenResponse> {
        let request = prepare(request)?;

        let user = self
            .ctx
            .user_repo()
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", request.email.clone()))?;

        if !user.code_matches(&request.code) {
            warn!(user_id = %user.id, "Verification failed: code mismatch");
            return Err(AppError::InvalidCode.into());
        }

        self.ctx.user_repo().mark_verified(user.id).await?;
        info!(user_id = %user.id, "User verified");

        self.issue_token(&user)
    }

    /// Login with email and password
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<TokenResponse> {
        let request = prepare(request)?;

        let user = self
            .ctx
            .user_repo()
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: user not found");
                AppError::InvalidCredentials
            })?;

        if !user.uses_password() {
            warn!(user_id = %user.id, "Login failed: federated account");
            return Err(AppError::WrongLoginMethod.into());
        }

        let password_hash = user.password_hash.as_deref().ok_or_else(|| {
            warn!(user_id = %user.id, "Login failed: no password hash");
            AppError::InvalidCredentials
        })?;

        if !verify_password(&request.password, password_hash)? {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(AppError::InvalidCredentials.into());
        }

        if !user.verified {
            return Err(AppError::VerificationRequired.into());
        }

        info!(user_id = %user.id, "User logged in");

        self.issue_token(&user)
    }

    /// Set a new password if the email and code match
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> ServiceResult<()> {
        let request = prepare(request)?;

        let password_hash = hash_password(&request.new_password)
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        let updated = self
            .ctx
            .user_repo()
            .reset_password(&request.email, &request.code, &password_hash)
            .await?;

        if !updated {
            return Err(ServiceError::validation(
                "User not found or incorrect verification code",
            ));
        }

        info!("Password reset");
        Ok(())
    }

    fn issue_token(&self, user: &User) -> ServiceResult<TokenResponse> {
        let token = self.ctx.jwt_service().issue(user.id)?;
        Ok(TokenResponse::from(token))
    }
}

/// The code also authorizes password resets, so it never goes above debug.
/// No mail transport exists; in development the debug line is how it arrives.
fn log_code_issued(user_id: Snowflake, code: &str) {
    info!(user_id = %user_id, "Verification code issued");
    debug!(user_id = %user_id, code = %code, "Verification code value");
}
