// Services layer for business logic
// Services own business rules and call storage through the core traits

pub mod account;
pub mod event;

pub use account::AccountService;
pub use event::EventService;
