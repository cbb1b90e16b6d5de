//! Domain ports for the hexagonal boundary.
//!
//! Services depend on these traits only; adapters in `outbound` provide the
//! implementations wired up at startup.

mod exchange_repository;
mod token_codec;
mod user_repository;

pub use exchange_repository::{ExchangeRepository, ExchangeStoreError};
pub use token_codec::{TokenCodec, TokenError};
pub use user_repository::{SkillNameFilter, UserRepository, UserStoreError};
