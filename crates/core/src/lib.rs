// Eventdesk Core
//
// This crate provides the DB-agnostic domain of Eventdesk:
// - Account types and the AccountLookup capability used by authenticators
// - Event types, derived fields (free, offline, status) and EventValidator
// - Storage and password traits implemented by the control-plane
//
// Key design decisions:
// - Validation collects every violation instead of stopping at the first
// - Server-computed fields are rejected when present in a request
// - Passwords are only ever compared through a PasswordEncoder

pub mod account;
pub mod error;
pub mod event;
pub mod traits;
pub mod validation;

// Re-exports for convenience
pub use account::{Account, AccountDetails, AccountRecord, AccountRole, NewAccount};
pub use error::{DomainError, Result};
pub use event::{is_free, is_offline, Event, EventDraft, EventStatus, ValidatedEvent};
pub use traits::{AccountLookup, AccountStore, EventStore, PasswordEncoder};
pub use validation::{EventValidator, FieldError, ValidationErrors};
