//! Domain layer: entities, validation newtypes, services, and the ports the
//! outbound adapters implement.

pub mod auth;
pub mod credential;
pub mod directory;
pub mod error;
pub mod exchange;
pub mod ledger;
pub mod ports;
pub mod session;
pub mod user;

pub use directory::UserDirectory;
pub use error::{DomainError, ErrorCode};
pub use ledger::{ExchangeLedger, NewExchange};
pub use session::{AuthError, SessionGuard};
