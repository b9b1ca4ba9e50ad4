// Core traits for pluggable backends
//
// These traits keep account lookup and event creation independent of the
// storage engine and of the password hashing scheme:
// - Database implementations for production
// - In-memory implementations for dev mode and tests

use async_trait::async_trait;
use uuid::Uuid;

use crate::account::{Account, AccountDetails, AccountRecord};
use crate::error::Result;
use crate::event::Event;

// ============================================================================
// AccountStore - For persisting accounts keyed by email
// ============================================================================

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account. Fails with `Conflict` when the email is taken.
    async fn save_account(&self, record: AccountRecord) -> Result<Account>;

    /// Exact-match lookup by email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;
}

// ============================================================================
// EventStore - For persisting validated events
// ============================================================================

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist an event whose id was assigned by the caller
    async fn save_event(&self, event: Event) -> Result<Event>;

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>>;

    /// All events, newest first
    async fn list_events(&self) -> Result<Vec<Event>>;
}

// ============================================================================
// AccountLookup - Capability consumed by authenticators
// ============================================================================

/// Resolves a username to account details.
///
/// Implementations fail with `NotFound` whose message contains the queried
/// username when no account matches.
#[async_trait]
pub trait AccountLookup: Send + Sync {
    async fn load_by_username(&self, username: &str) -> Result<AccountDetails>;
}

// ============================================================================
// PasswordEncoder - Secret comparison policy
// ============================================================================

pub trait PasswordEncoder: Send + Sync {
    /// Encode a plain password for storage
    fn encode(&self, plain: &str) -> Result<String>;

    /// Compare a plain password against a stored encoding
    fn matches(&self, plain: &str, encoded: &str) -> bool;
}
