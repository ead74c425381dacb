//! User repository backing the credential store

use sqlx::SqlitePool;
use tracing::info;

use crate::error::{AppError, AppResult, map_unique_violation};
use crate::models::{Employee, NewUser, User};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user record
    ///
    /// The password must already be hashed by the caller.
    pub async fn create(&self, new_user: &NewUser) -> AppResult<User> {
        info!("Creating new user: {}", new_user.username);

        sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, email, email_verified)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(&new_user.email)
        .bind(new_user.email_verified)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, AppError::DuplicateUsername))?;

        Ok(User {
            username: new_user.username.clone(),
            password_hash: new_user.password_hash.clone(),
            email: new_user.email.clone(),
            email_verified: new_user.email_verified,
        })
    }

    /// Find a user by username or email
    pub async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT username, password_hash, email, email_verified
            FROM users
            WHERE username = ?1 OR email = ?1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Flip email_verified for a user
    pub async fn mark_email_verified(&self, username: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET email_verified = 1 WHERE username = ?")
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert or refresh the Admin employee row mirroring a user account
    pub async fn promote_to_admin(&self, username: &str, password_hash: &str) -> AppResult<()> {
        info!("Promoting {} to admin", username);

        sqlx::query(
            r#"
            INSERT INTO employees (employee_id, password_hash, designation)
            VALUES (?, ?, 'Admin')
            ON CONFLICT (employee_id)
            DO UPDATE SET password_hash = excluded.password_hash, designation = 'Admin'
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Replace a user's password hash, keeping any mirrored employee row in
    /// step within the same transaction
    pub async fn set_password(&self, username: &str, new_hash: &str) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE users SET password_hash = ? WHERE username = ?")
            .bind(new_hash)
            .bind(username)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE employees SET password_hash = ? WHERE employee_id = ?")
            .bind(new_hash)
            .bind(username)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Whether any employee carries the Admin designation
    pub async fn admin_exists(&self) -> AppResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE designation = 'Admin'")
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Whether the given user holds the Admin designation
    pub async fn is_admin(&self, username: &str) -> AppResult<bool> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT employee_id, password_hash, designation
            FROM employees
            WHERE employee_id = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee.is_some_and(|e| e.designation == "Admin"))
    }
}
