//! Registration repository for database operations.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::Result;
use crate::database::models::{NewRegistration, Registration};
use crate::database::retry::retry_on_sqlite_busy;

/// Registration repository trait.
///
/// There are deliberately no update or delete operations: registrations are
/// immutable once written.
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Insert a validated registration as a single atomic statement and
    /// return the store-assigned id.
    async fn insert(&self, registration: &NewRegistration) -> Result<i64>;

    /// Find a registration by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Registration>>;

    /// List every registration ordered by id ascending.
    async fn list_all(&self) -> Result<Vec<Registration>>;

    /// The most recently created registration, if any.
    async fn latest(&self) -> Result<Option<Registration>>;

    /// Count total number of registrations.
    async fn count(&self) -> Result<i64>;
}

/// SQLx implementation of RegistrationRepository.
pub struct SqlxRegistrationRepository {
    pool: SqlitePool,
}

impl SqlxRegistrationRepository {
    /// Create a new SqlxRegistrationRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationRepository for SqlxRegistrationRepository {
    async fn insert(&self, registration: &NewRegistration) -> Result<i64> {
        retry_on_sqlite_busy("insert_registration", || async {
            let result = sqlx::query(
                r#"
                INSERT INTO registrations (
                    record_number, full_name, account_name,
                    request_secondary_notification, created_at
                ) VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&registration.record_number)
            .bind(&registration.full_name)
            .bind(&registration.account_name)
            .bind(registration.request_secondary_notification)
            .bind(registration.created_at)
            .execute(&self.pool)
            .await?;
            Ok(result.last_insert_rowid())
        })
        .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Registration>> {
        let registration =
            sqlx::query_as::<_, Registration>("SELECT * FROM registrations WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(registration)
    }

    async fn list_all(&self) -> Result<Vec<Registration>> {
        let registrations =
            sqlx::query_as::<_, Registration>("SELECT * FROM registrations ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(registrations)
    }

    async fn latest(&self) -> Result<Option<Registration>> {
        let registration = sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(registration)
    }

    async fn count(&self) -> Result<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM registrations")
            .fetch_one(&self.pool)
            .await?;
        Ok(result.0)
    }
}
