// Database models (internal, may differ from domain types)

use chrono::{DateTime, NaiveDateTime, Utc};
use eventdesk_core::{Account, AccountRole, Event, EventStatus};
use sqlx::FromRow;
use uuid::Uuid;

// ============================================
// Account models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        let roles = row
            .roles
            .iter()
            .filter_map(|r| match r.parse::<AccountRole>() {
                Ok(role) => Some(role),
                Err(e) => {
                    tracing::warn!(email = %row.email, "Skipping stored role: {}", e);
                    None
                }
            })
            .collect();
        Account {
            id: row.id,
            email: row.email,
            password: row.password_hash,
            roles,
            created_at: row.created_at,
        }
    }
}

// ============================================
// Event models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub begin_enrollment_date_time: NaiveDateTime,
    pub close_enrollment_date_time: NaiveDateTime,
    pub begin_event_date_time: NaiveDateTime,
    pub end_event_date_time: NaiveDateTime,
    pub location: Option<String>,
    pub base_price: i32,
    pub max_price: i32,
    pub limit_of_enrollment: i32,
    pub free: bool,
    pub offline: bool,
    pub event_status: String,
    pub created_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            name: row.name,
            description: row.description,
            begin_enrollment_date_time: row.begin_enrollment_date_time,
            close_enrollment_date_time: row.close_enrollment_date_time,
            begin_event_date_time: row.begin_event_date_time,
            end_event_date_time: row.end_event_date_time,
            location: row.location,
            base_price: row.base_price,
            max_price: row.max_price,
            limit_of_enrollment: row.limit_of_enrollment,
            free: row.free,
            offline: row.offline,
            event_status: EventStatus::from(row.event_status.as_str()),
            created_at: row.created_at,
        }
    }
}
