//! Verification code repository
//!
//! Codes are short-lived numeric credentials for email verification and
//! password reset. They expire by wall-clock comparison at validation time;
//! nothing evicts them in the background.

use chrono::Utc;
use rand::Rng;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::AppResult;
use crate::models::{CodePurpose, VerificationCode};

/// Verification code repository
#[derive(Clone)]
pub struct CodeRepository {
    pool: SqlitePool,
}

impl CodeRepository {
    /// Create a new code repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Generate and store a 6-digit code expiring `ttl_minutes` from now.
    ///
    /// The code is returned so the caller can hand it to the delivery
    /// channel, or directly to the user when no channel is configured.
    pub async fn issue(
        &self,
        username: &str,
        purpose: CodePurpose,
        ttl_minutes: i64,
    ) -> AppResult<String> {
        let code = format!("{}", rand::thread_rng().gen_range(100_000..=999_999));
        let expiry_ts = Utc::now().timestamp() + ttl_minutes * 60;

        sqlx::query(
            r#"
            INSERT INTO email_codes (username, code, purpose, expiry_ts)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(username)
        .bind(&code)
        .bind(purpose)
        .bind(expiry_ts)
        .execute(&self.pool)
        .await?;

        info!("Issued {:?} code for {}", purpose, username);
        Ok(code)
    }

    /// Check a candidate code against the most recently issued one.
    ///
    /// Returns false when no code exists, when the stored code has expired,
    /// or when the candidate does not match. Comparison is constant-time.
    /// Validation never consumes; a failed attempt leaves the code in place.
    pub async fn validate(
        &self,
        username: &str,
        candidate: &str,
        purpose: CodePurpose,
    ) -> AppResult<bool> {
        let row = sqlx::query_as::<_, VerificationCode>(
            r#"
            SELECT username, code, purpose, expiry_ts
            FROM email_codes
            WHERE username = ? AND purpose = ?
            ORDER BY expiry_ts DESC
            LIMIT 1
            "#,
        )
        .bind(username)
        .bind(purpose)
        .fetch_optional(&self.pool)
        .await?;

        let Some(stored) = row else {
            return Ok(false);
        };

        if Utc::now().timestamp() > stored.expiry_ts {
            return Ok(false);
        }

        Ok(subtle::ConstantTimeEq::ct_eq(stored.code.as_bytes(), candidate.as_bytes()).into())
    }

    /// Delete every code for (username, purpose); called only after a
    /// successful validation
    pub async fn consume(&self, username: &str, purpose: CodePurpose) -> AppResult<()> {
        sqlx::query("DELETE FROM email_codes WHERE username = ? AND purpose = ?")
            .bind(username)
            .bind(purpose)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Number of stored codes for (username, purpose)
    pub async fn count(&self, username: &str, purpose: CodePurpose) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM email_codes WHERE username = ? AND purpose = ?")
                .bind(username)
                .bind(purpose)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
