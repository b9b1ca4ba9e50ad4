// In-memory storage implementation for dev mode
// Decision: Use parking_lot for thread-safe access
// Decision: UUIDs generated via uuid v7 (time-ordered)
//
// This implementation mirrors the PostgreSQL repository API with HashMaps,
// allowing the control-plane to run without a database for development.

use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::models::*;
use eventdesk_core::{AccountRecord, Event};

/// In-memory database for dev mode
/// All data is stored in memory and lost on restart
#[derive(Default)]
pub struct InMemoryDatabase {
    // Keyed by email, the account identifier
    accounts: RwLock<HashMap<String, AccountRow>>,
    events: RwLock<HashMap<Uuid, EventRow>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    // ============================================
    // Accounts
    // ============================================

    /// Insert an account. Returns `None` when the email is already taken.
    pub async fn create_account(&self, input: AccountRecord) -> Result<Option<AccountRow>> {
        let mut accounts = self.accounts.write();
        if accounts.contains_key(&input.email) {
            return Ok(None);
        }
        let row = AccountRow {
            id: Uuid::now_v7(),
            email: input.email,
            password_hash: input.password_hash,
            roles: input.roles.iter().map(|r| r.to_string()).collect(),
            created_at: Self::now(),
        };
        accounts.insert(row.email.clone(), row.clone());
        Ok(Some(row))
    }

    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<AccountRow>> {
        Ok(self.accounts.read().get(email).cloned())
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, event: &Event) -> Result<EventRow> {
        let row = EventRow {
            id: event.id,
            name: event.name.clone(),
            description: event.description.clone(),
            begin_enrollment_date_time: event.begin_enrollment_date_time,
            close_enrollment_date_time: event.close_enrollment_date_time,
            begin_event_date_time: event.begin_event_date_time,
            end_event_date_time: event.end_event_date_time,
            location: event.location.clone(),
            base_price: event.base_price,
            max_price: event.max_price,
            limit_of_enrollment: event.limit_of_enrollment,
            free: event.free,
            offline: event.offline,
            event_status: event.event_status.to_string(),
            created_at: event.created_at,
        };
        self.events.write().insert(row.id, row.clone());
        Ok(row)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        Ok(self.events.read().get(&id).cloned())
    }

    pub async fn list_events(&self) -> Result<Vec<EventRow>> {
        let mut rows: Vec<_> = self.events.read().values().cloned().collect();
        // v7 ids break ties between events created in the same instant
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }
}
