//! Port for exchange document persistence.
//!
//! Two operations here span more than one record: completing an exchange
//! bumps both parties' counters, and recording feedback refreshes the rated
//! user's aggregate. Each is a single port call so adapters can execute it
//! as one transactional unit instead of leaving a lost-update window between
//! separate round trips.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::exchange::{ExchangeStatus, FeedbackEntry, Side, SkillExchange};

/// Errors raised by exchange repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeStoreError {
    /// Query or mutation failed inside the adapter.
    #[error("exchange store operation failed: {message}")]
    Backend { message: String },
}

/// CRUD plus the two transactional lifecycle operations.
#[async_trait]
pub trait ExchangeRepository: Send + Sync {
    /// Persist a new exchange.
    async fn insert(&self, exchange: SkillExchange) -> Result<SkillExchange, ExchangeStoreError>;

    /// Fetch an exchange by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<SkillExchange>, ExchangeStoreError>;

    /// Exchanges where the user is requester or receiver, newest first.
    async fn list_for_participant(
        &self,
        user: Uuid,
    ) -> Result<Vec<SkillExchange>, ExchangeStoreError>;

    /// Assign the status unconditionally. When the new status is
    /// `completed`, both parties' completed-exchange counters increment in
    /// the same operation. Returns `None` when the exchange is absent.
    async fn set_status(
        &self,
        id: Uuid,
        status: ExchangeStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<SkillExchange>, ExchangeStoreError>;

    /// Write `entry` into the feedback slot authored by `side`, overwriting
    /// any prior entry, and refresh the rated party's side-scoped rating
    /// aggregate in the same operation. Returns `None` when the exchange is
    /// absent.
    async fn record_feedback(
        &self,
        id: Uuid,
        side: Side,
        entry: FeedbackEntry,
    ) -> Result<Option<SkillExchange>, ExchangeStoreError>;
}
