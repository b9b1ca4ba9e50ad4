// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// This module provides a unified StorageBackend enum that can work with
// either PostgreSQL (production) or in-memory (dev mode) storage, and
// implements the core AccountStore / EventStore traits on top of it.

use anyhow::Result;
use async_trait::async_trait;
use eventdesk_core::{Account, AccountRecord, AccountStore, DomainError, Event, EventStore};
use std::sync::Arc;
use uuid::Uuid;

use super::memory::InMemoryDatabase;
use super::models::*;
use super::repositories::Database;

/// Storage backend that can be either PostgreSQL or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// PostgreSQL database (production)
    Postgres(Database),
    /// In-memory database (dev mode)
    InMemory(Arc<InMemoryDatabase>),
}

impl StorageBackend {
    /// Create a PostgreSQL storage backend from a database URL and apply migrations
    pub async fn postgres(database_url: &str) -> Result<Self> {
        let db = Database::from_url(database_url).await?;
        db.migrate().await?;
        Ok(Self::Postgres(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryDatabase::new()))
    }

    /// Short name for health reporting
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::InMemory(_) => "in-memory",
        }
    }

    // ============================================
    // Accounts
    // ============================================

    pub async fn create_account(&self, input: AccountRecord) -> Result<Option<AccountRow>> {
        match self {
            Self::Postgres(db) => db.create_account(input).await,
            Self::InMemory(db) => db.create_account(input).await,
        }
    }

    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<AccountRow>> {
        match self {
            Self::Postgres(db) => db.get_account_by_email(email).await,
            Self::InMemory(db) => db.get_account_by_email(email).await,
        }
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, event: &Event) -> Result<EventRow> {
        match self {
            Self::Postgres(db) => db.create_event(event).await,
            Self::InMemory(db) => db.create_event(event).await,
        }
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        match self {
            Self::Postgres(db) => db.get_event(id).await,
            Self::InMemory(db) => db.get_event(id).await,
        }
    }

    pub async fn list_events(&self) -> Result<Vec<EventRow>> {
        match self {
            Self::Postgres(db) => db.list_events().await,
            Self::InMemory(db) => db.list_events().await,
        }
    }
}

#[async_trait]
impl AccountStore for StorageBackend {
    async fn save_account(&self, record: AccountRecord) -> eventdesk_core::Result<Account> {
        let email = record.email.clone();
        let row = self
            .create_account(record)
            .await
            .map_err(DomainError::storage)?
            .ok_or_else(|| DomainError::conflict(format!("Account already exists: {}", email)))?;
        Ok(row.into())
    }

    async fn find_by_email(&self, email: &str) -> eventdesk_core::Result<Option<Account>> {
        let row = self
            .get_account_by_email(email)
            .await
            .map_err(DomainError::storage)?;
        Ok(row.map(Account::from))
    }
}

#[async_trait]
impl EventStore for StorageBackend {
    async fn save_event(&self, event: Event) -> eventdesk_core::Result<Event> {
        let row = self
            .create_event(&event)
            .await
            .map_err(DomainError::storage)?;
        Ok(row.into())
    }

    async fn get_event(&self, id: Uuid) -> eventdesk_core::Result<Option<Event>> {
        let row = StorageBackend::get_event(self, id)
            .await
            .map_err(DomainError::storage)?;
        Ok(row.map(Event::from))
    }

    async fn list_events(&self) -> eventdesk_core::Result<Vec<Event>> {
        let rows = StorageBackend::list_events(self)
            .await
            .map_err(DomainError::storage)?;
        Ok(rows.into_iter().map(Event::from).collect())
    }
}
