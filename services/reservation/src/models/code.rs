//! Verification code model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// What a verification code is allowed to be used for.
///
/// The discriminator is stored as text alongside the code; a code issued for
/// one purpose never validates against another.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CodePurpose {
    EmailVerification,
    PasswordReset,
}

/// Verification code entity
///
/// Several rows may exist per (username, purpose); only the most recently
/// issued one is considered at validation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VerificationCode {
    pub username: String,
    pub code: String,
    pub purpose: CodePurpose,
    pub expiry_ts: i64,
}
