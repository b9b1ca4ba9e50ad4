// Repository layer for PostgreSQL operations

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::*;
use eventdesk_core::{AccountRecord, Event};

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

// Newest first; id breaks created_at ties the same way the in-memory store does
const LIST_EVENTS_SQL: &str = r#"
    SELECT id, name, description,
        begin_enrollment_date_time, close_enrollment_date_time,
        begin_event_date_time, end_event_date_time,
        location, base_price, max_price, limit_of_enrollment,
        free, offline, event_status, created_at
    FROM events
    ORDER BY created_at DESC, id DESC
"#;

impl Database {
    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    // ============================================
    // Accounts
    // ============================================

    /// Insert an account. Returns `None` when the email is already taken.
    pub async fn create_account(&self, input: AccountRecord) -> Result<Option<AccountRow>> {
        let roles: Vec<String> = input.roles.iter().map(|r| r.to_string()).collect();
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (id, email, password_hash, roles)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, password_hash, roles, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&roles)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password_hash, roles, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, event: &Event) -> Result<EventRow> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (
                id, name, description,
                begin_enrollment_date_time, close_enrollment_date_time,
                begin_event_date_time, end_event_date_time,
                location, base_price, max_price, limit_of_enrollment,
                free, offline, event_status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING id, name, description,
                begin_enrollment_date_time, close_enrollment_date_time,
                begin_event_date_time, end_event_date_time,
                location, base_price, max_price, limit_of_enrollment,
                free, offline, event_status, created_at
            "#,
        )
        .bind(event.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.begin_enrollment_date_time)
        .bind(event.close_enrollment_date_time)
        .bind(event.begin_event_date_time)
        .bind(event.end_event_date_time)
        .bind(&event.location)
        .bind(event.base_price)
        .bind(event.max_price)
        .bind(event.limit_of_enrollment)
        .bind(event.free)
        .bind(event.offline)
        .bind(event.event_status.to_string())
        .bind(event.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, name, description,
                begin_enrollment_date_time, close_enrollment_date_time,
                begin_event_date_time, end_event_date_time,
                location, base_price, max_price, limit_of_enrollment,
                free, offline, event_status, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_events(&self) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(LIST_EVENTS_SQL)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}
