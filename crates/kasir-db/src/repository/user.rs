//! # User Repository
//!
//! Cashier accounts. Passwords arrive here already hashed; this layer never
//! sees plaintext.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasir_core::input::{NewUser, UpdateUser};
use kasir_core::{Page, PageRequest, Pagination, User};

const COLUMNS: &str = "id, name, email, password, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Pages through users whose name contains `page.search`, newest first.
    pub async fn list(&self, page: &PageRequest) -> DbResult<Page<User>> {
        debug!(page = page.page, limit = page.limit, search = %page.search, "Listing users");

        let pattern = page.like_pattern();

        let items = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE name LIKE ?1 ORDER BY id DESC LIMIT ?2 OFFSET ?3"
        ))
        .bind(&pattern)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE name LIKE ?1")
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        Ok(Page {
            items,
            pagination: Pagination::new(page, total),
        })
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        debug!(id, "Getting user by ID");

        let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Looks a user up by login email (exact match).
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        debug!(email = %email, "Getting user by email");

        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = ?1"))
                .bind(email.trim())
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    /// Validates and inserts a user.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - email already registered
    pub async fn create(&self, input: &NewUser, password_hash: &str) -> DbResult<User> {
        input.validate()?;
        self.insert(&input.name, &input.email, password_hash).await
    }

    /// Inserts a user without checking the input rules. Used by the seeder
    /// for the well-known admin account.
    pub async fn insert(&self, name: &str, email: &str, password_hash: &str) -> DbResult<User> {
        debug!(email = %email, "Creating user");

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?4) RETURNING {COLUMNS}"
        ))
        .bind(name.trim())
        .bind(email.trim())
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from(e).on_duplicate("email", email.trim()))?;

        Ok(user)
    }

    /// Updates name and email, and the password when `password_hash` is set.
    pub async fn update(
        &self,
        id: i64,
        input: &UpdateUser,
        password_hash: Option<&str>,
    ) -> DbResult<User> {
        input.validate()?;
        debug!(id, "Updating user");

        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET name = ?2, email = ?3, password = COALESCE(?4, password), updated_at = ?5 \
             WHERE id = ?1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(input.name.trim())
        .bind(input.email.trim())
        .bind(password_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DbError::from(e).on_duplicate("email", input.email.trim()))?;

        user.ok_or_else(|| DbError::not_found("User", id))
    }

    /// Deletes a user. Their cart goes with them; users with recorded
    /// transactions are kept (foreign key violation).
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting user");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
