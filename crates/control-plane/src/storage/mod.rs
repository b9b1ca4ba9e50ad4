// Storage layer for Eventdesk control-plane
// Decision: Support both PostgreSQL (production) and in-memory (dev mode)
//
// StorageBackend implements the core traits:
// - AccountStore: account persistence keyed by email
// - EventStore: event persistence and queries

pub mod backend;
pub mod memory;
pub mod models;
pub mod password;
pub mod repositories;

pub use backend::StorageBackend;
pub use memory::InMemoryDatabase;
pub use models::*;
pub use password::Argon2PasswordEncoder;
pub use repositories::Database;
