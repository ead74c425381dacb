//! Auth service: signup, email verification, login, and password reset
//!
//! Drives a user through Unregistered → PendingVerification → Active, with
//! the orthogonal reset cycle Active → ResetPending → Active. All credential
//! and code storage goes through the repositories; delivery goes through the
//! mailer, falling back to returning the code when no channel is available.

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::mailer::Mailer;
use crate::models::{CodePurpose, NewUser, Role};
use crate::password;
use crate::repositories::{CodeRepository, UserRepository};
use crate::validation;

const EMAIL_VERIFICATION_TTL_MINUTES: i64 = 30;
const PASSWORD_RESET_TTL_MINUTES: i64 = 15;

/// Result of a successful signup or reset request
#[derive(Debug, Clone)]
pub struct CodeIssued {
    pub username: String,
    /// The verification code, present only when it could not be mailed
    pub dev_code: Option<String>,
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub username: String,
    pub role: Role,
}

/// Auth service
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    codes: CodeRepository,
    mailer: Mailer,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(pool: SqlitePool, mailer: Mailer) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            codes: CodeRepository::new(pool),
            mailer,
        }
    }

    /// Access to the underlying user repository
    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    /// Register a new account and issue its email verification code
    pub async fn sign_up(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> AppResult<CodeIssued> {
        validation::validate_username(username).map_err(AppError::InvalidInput)?;
        validation::validate_password(password).map_err(AppError::InvalidInput)?;
        validation::validate_email(email).map_err(AppError::InvalidInput)?;

        self.users
            .create(&NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash: password::hash(password),
                email_verified: false,
            })
            .await?;

        let code = self
            .codes
            .issue(username, CodePurpose::EmailVerification, EMAIL_VERIFICATION_TTL_MINUTES)
            .await?;

        let body = format!(
            "Hello {},\n\nYour verification code is: {}\nIt expires in {} minutes.",
            username, code, EMAIL_VERIFICATION_TTL_MINUTES
        );
        let dev_code = self
            .deliver_or_return(email, "Verify your ERailTicket account", &body, code)
            .await;

        Ok(CodeIssued {
            username: username.to_string(),
            dev_code,
        })
    }

    /// Confirm an email address with a verification code
    pub async fn verify_email(&self, username: &str, code: &str) -> AppResult<()> {
        if !self
            .codes
            .validate(username, code, CodePurpose::EmailVerification)
            .await?
        {
            return Err(AppError::InvalidOrExpiredCode);
        }

        self.users.mark_email_verified(username).await?;
        self.codes
            .consume(username, CodePurpose::EmailVerification)
            .await?;

        info!("Email verified for {}", username);
        Ok(())
    }

    /// Authenticate by username or email.
    ///
    /// Unknown identifier and wrong password produce the same error.
    pub async fn log_in(&self, identifier: &str, password: &str) -> AppResult<LoginOutcome> {
        let Some(user) = self.users.find_by_identifier(identifier).await? else {
            return Err(AppError::InvalidCredentials);
        };

        if !password::verify(&user.password_hash, password) {
            return Err(AppError::InvalidCredentials);
        }

        if !user.email_verified {
            return Err(AppError::EmailNotVerified);
        }

        let role = if self.users.is_admin(&user.username).await? {
            Role::Admin
        } else {
            Role::User
        };

        info!("User {} logged in as {}", user.username, role.as_str());
        Ok(LoginOutcome {
            username: user.username,
            role,
        })
    }

    /// Issue a password reset code for an account found by username or email
    pub async fn request_password_reset(&self, identifier: &str) -> AppResult<CodeIssued> {
        let Some(user) = self.users.find_by_identifier(identifier).await? else {
            return Err(AppError::NotFound(
                "No account found with that username/email".to_string(),
            ));
        };

        let code = self
            .codes
            .issue(&user.username, CodePurpose::PasswordReset, PASSWORD_RESET_TTL_MINUTES)
            .await?;

        let body = format!(
            "Hello {},\n\nYour password reset code is: {}\nIt expires in {} minutes.",
            user.username, code, PASSWORD_RESET_TTL_MINUTES
        );
        let dev_code = self
            .deliver_or_return(&user.email, "ERailTicket password reset code", &body, code)
            .await;

        Ok(CodeIssued {
            username: user.username,
            dev_code,
        })
    }

    /// Complete a password reset with a previously issued code
    pub async fn reset_password(
        &self,
        identifier: &str,
        code: &str,
        new_password: &str,
    ) -> AppResult<()> {
        validation::validate_password(new_password).map_err(AppError::InvalidInput)?;

        // The identifier may be an email; codes are stored per username
        let username = match self.users.find_by_identifier(identifier).await? {
            Some(user) => user.username,
            None => identifier.to_string(),
        };

        if !self
            .codes
            .validate(&username, code, CodePurpose::PasswordReset)
            .await?
        {
            return Err(AppError::InvalidOrExpiredCode);
        }

        self.users
            .set_password(&username, &password::hash(new_password))
            .await?;
        self.codes
            .consume(&username, CodePurpose::PasswordReset)
            .await?;

        info!("Password updated for {}", username);
        Ok(())
    }

    /// Create an Admin account: a pre-verified user plus its employee row.
    ///
    /// Used for first-run bootstrap and for admins creating further admins.
    pub async fn create_admin(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> AppResult<()> {
        validation::validate_username(username).map_err(AppError::InvalidInput)?;
        validation::validate_password(password).map_err(AppError::InvalidInput)?;
        validation::validate_email(email).map_err(AppError::InvalidInput)?;

        let hash = password::hash(password);
        self.users
            .create(&NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash: hash.clone(),
                email_verified: true,
            })
            .await?;
        self.users.promote_to_admin(username, &hash).await?;

        info!("Admin account {} created", username);
        Ok(())
    }

    /// Whether the first-run admin bootstrap has happened
    pub async fn admin_exists(&self) -> AppResult<bool> {
        self.users.admin_exists().await
    }

    /// Try the configured channel; hand the code back when there is none or
    /// the send fails, so the surrounding operation never aborts on delivery.
    async fn deliver_or_return(
        &self,
        email: &str,
        subject: &str,
        body: &str,
        code: String,
    ) -> Option<String> {
        if !self.mailer.is_configured() {
            return Some(code);
        }

        match self.mailer.deliver(email, subject, body).await {
            Ok(()) => None,
            Err(e) => {
                warn!("Falling back to returning the code directly: {}", e);
                Some(code)
            }
        }
    }
}
