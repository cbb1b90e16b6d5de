//! Exchange ledger: opening exchanges, listing them, driving the status
//! lifecycle, and recording feedback.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use super::DomainError;
use super::exchange::{
    ExchangeStatus, ExchangeView, FeedbackEntry, RatingScore, SkillExchange, SkillRef,
};
use super::ports::{ExchangeRepository, ExchangeStoreError, UserRepository, UserStoreError};
use super::user::{ParticipantSummary, User};

fn exchange_store_failure(err: &ExchangeStoreError) -> DomainError {
    error!(error = %err, "exchange store operation failed");
    DomainError::internal("exchange store operation failed")
}

fn user_store_failure(err: &UserStoreError) -> DomainError {
    error!(error = %err, "user store operation failed");
    DomainError::internal("user store operation failed")
}

/// Parameter object for opening an exchange.
#[derive(Debug, Clone)]
pub struct NewExchange {
    pub receiver: Uuid,
    pub offered_skill: SkillRef,
    pub requested_skill: SkillRef,
    /// Session length in minutes; must be positive.
    pub duration: u32,
    pub notes: Option<String>,
}

/// CRUD over exchanges plus the status and feedback operations.
#[derive(Clone)]
pub struct ExchangeLedger {
    exchanges: Arc<dyn ExchangeRepository>,
    users: Arc<dyn UserRepository>,
}

impl ExchangeLedger {
    /// Build a ledger over the given stores.
    pub fn new(exchanges: Arc<dyn ExchangeRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { exchanges, users }
    }

    /// Open a new pending exchange from `requester` towards the named
    /// receiver.
    pub async fn open(
        &self,
        requester: &User,
        request: NewExchange,
    ) -> Result<SkillExchange, DomainError> {
        if request.duration == 0 {
            return Err(DomainError::invalid_request(
                "duration must be a positive number of minutes",
            ));
        }
        if request.receiver == requester.id {
            return Err(DomainError::invalid_request(
                "cannot open an exchange with yourself",
            ));
        }
        let receiver = self
            .users
            .find_by_id(request.receiver)
            .await
            .map_err(|err| user_store_failure(&err))?;
        if receiver.is_none() {
            return Err(DomainError::not_found("receiver not found"));
        }

        let exchange = SkillExchange::new(
            requester.id,
            request.receiver,
            request.offered_skill,
            request.requested_skill,
            request.duration,
            request.notes,
            Utc::now(),
        );
        let exchange = self
            .exchanges
            .insert(exchange)
            .await
            .map_err(|err| exchange_store_failure(&err))?;
        info!(exchange = %exchange.id, requester = %exchange.requester, "exchange opened");
        Ok(exchange)
    }

    /// All exchanges the user participates in, newest first, with both
    /// parties resolved to display-safe summaries.
    pub async fn list_for(&self, user: &User) -> Result<Vec<ExchangeView>, DomainError> {
        let exchanges = self
            .exchanges
            .list_for_participant(user.id)
            .await
            .map_err(|err| exchange_store_failure(&err))?;

        let mut summaries: HashMap<Uuid, ParticipantSummary> = HashMap::new();
        summaries.insert(user.id, user.participant_summary());

        let mut views = Vec::with_capacity(exchanges.len());
        for exchange in exchanges {
            let requester = self.summary_for(&mut summaries, exchange.requester).await?;
            let receiver = self.summary_for(&mut summaries, exchange.receiver).await?;
            views.push(ExchangeView::from_parts(exchange, requester, receiver));
        }
        Ok(views)
    }

    async fn summary_for(
        &self,
        cache: &mut HashMap<Uuid, ParticipantSummary>,
        id: Uuid,
    ) -> Result<ParticipantSummary, DomainError> {
        if let Some(summary) = cache.get(&id) {
            return Ok(summary.clone());
        }
        // Users are never hard-deleted in this system; a dangling reference
        // means the store is inconsistent.
        let user = self
            .users
            .find_by_id(id)
            .await
            .map_err(|err| user_store_failure(&err))?
            .ok_or_else(|| DomainError::internal("exchange references a missing user"))?;
        let summary = user.participant_summary();
        cache.insert(id, summary.clone());
        Ok(summary)
    }

    /// Assign a new status. Only participants may do so; the target value is
    /// otherwise unrestricted. Completion bumps both parties' counters.
    pub async fn update_status(
        &self,
        actor: &User,
        exchange_id: Uuid,
        status: ExchangeStatus,
    ) -> Result<SkillExchange, DomainError> {
        let exchange = self
            .exchanges
            .find_by_id(exchange_id)
            .await
            .map_err(|err| exchange_store_failure(&err))?
            .ok_or_else(|| DomainError::not_found("exchange not found"))?;

        if exchange.side_of(actor.id).is_none() {
            return Err(DomainError::forbidden("not a participant in this exchange"));
        }

        let updated = self
            .exchanges
            .set_status(exchange_id, status, Utc::now())
            .await
            .map_err(|err| exchange_store_failure(&err))?
            .ok_or_else(|| DomainError::not_found("exchange not found"))?;
        info!(exchange = %exchange_id, ?status, "exchange status updated");
        Ok(updated)
    }

    /// Record a feedback rating and refresh the rated party's aggregate.
    ///
    /// The slot is chosen by identity comparison: the requester writes the
    /// requester slot, anyone else the receiver slot. Resubmission by the
    /// same side overwrites the prior entry.
    pub async fn submit_feedback(
        &self,
        actor: &User,
        exchange_id: Uuid,
        rating: RatingScore,
        comment: Option<String>,
    ) -> Result<SkillExchange, DomainError> {
        let exchange = self
            .exchanges
            .find_by_id(exchange_id)
            .await
            .map_err(|err| exchange_store_failure(&err))?
            .ok_or_else(|| DomainError::not_found("exchange not found"))?;

        let side = exchange.acting_side(actor.id);
        let entry = FeedbackEntry {
            rating,
            comment,
            date: Utc::now(),
        };
        let updated = self
            .exchanges
            .record_feedback(exchange_id, side, entry)
            .await
            .map_err(|err| exchange_store_failure(&err))?
            .ok_or_else(|| DomainError::not_found("exchange not found"))?;
        info!(exchange = %exchange_id, "feedback recorded");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::user::SkillLevel;
    use crate::outbound::memory::MemoryStore;
    use crate::test_support::sample_user;

    struct Fixture {
        ledger: ExchangeLedger,
        store: MemoryStore,
        alice: User,
        bob: User,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::default();
        let users: Arc<dyn UserRepository> = Arc::new(store.clone());
        let alice = users
            .insert(sample_user("alice", "alice@example.com"))
            .await
            .expect("insert succeeds");
        let bob = users
            .insert(sample_user("bob", "bob@example.com"))
            .await
            .expect("insert succeeds");
        let ledger = ExchangeLedger::new(Arc::new(store.clone()), users);
        Fixture {
            ledger,
            store,
            alice,
            bob,
        }
    }

    fn guitar_for_piano(receiver: Uuid) -> NewExchange {
        NewExchange {
            receiver,
            offered_skill: SkillRef {
                name: "Guitar".into(),
                level: SkillLevel::Intermediate,
            },
            requested_skill: SkillRef {
                name: "Piano".into(),
                level: SkillLevel::Beginner,
            },
            duration: 60,
            notes: None,
        }
    }

    #[tokio::test]
    async fn open_rejects_unknown_receivers() {
        let fx = fixture().await;
        let err = fx
            .ledger
            .open(&fx.alice, guitar_for_piano(Uuid::new_v4()))
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn open_rejects_zero_duration() {
        let fx = fixture().await;
        let mut request = guitar_for_piano(fx.bob.id);
        request.duration = 0;
        let err = fx
            .ledger
            .open(&fx.alice, request)
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn open_rejects_self_exchanges() {
        let fx = fixture().await;
        let err = fx
            .ledger
            .open(&fx.alice, guitar_for_piano(fx.alice.id))
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn listing_resolves_participants_newest_first() {
        let fx = fixture().await;
        let first = fx
            .ledger
            .open(&fx.alice, guitar_for_piano(fx.bob.id))
            .await
            .expect("open succeeds");
        let second = fx
            .ledger
            .open(&fx.bob, guitar_for_piano(fx.alice.id))
            .await
            .expect("open succeeds");

        let views = fx.ledger.list_for(&fx.alice).await.expect("list succeeds");
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].id, second.id);
        assert_eq!(views[1].id, first.id);
        assert_eq!(views[1].requester.username, "alice");
        assert_eq!(views[1].receiver.username, "bob");
    }

    #[tokio::test]
    async fn non_participants_cannot_update_status() {
        let fx = fixture().await;
        let exchange = fx
            .ledger
            .open(&fx.alice, guitar_for_piano(fx.bob.id))
            .await
            .expect("open succeeds");

        let users: Arc<dyn UserRepository> = Arc::new(fx.store.clone());
        let mallory = users
            .insert(sample_user("mallory", "mallory@example.com"))
            .await
            .expect("insert succeeds");

        for status in [
            ExchangeStatus::Accepted,
            ExchangeStatus::Completed,
            ExchangeStatus::Cancelled,
        ] {
            let err = fx
                .ledger
                .update_status(&mallory, exchange.id, status)
                .await
                .expect_err("must fail");
            assert_eq!(err.code(), ErrorCode::Forbidden);
        }
    }

    #[tokio::test]
    async fn completion_bumps_both_counters() {
        let fx = fixture().await;
        let exchange = fx
            .ledger
            .open(&fx.alice, guitar_for_piano(fx.bob.id))
            .await
            .expect("open succeeds");

        let updated = fx
            .ledger
            .update_status(&fx.bob, exchange.id, ExchangeStatus::Completed)
            .await
            .expect("update succeeds");
        assert_eq!(updated.status, ExchangeStatus::Completed);

        let users: Arc<dyn UserRepository> = Arc::new(fx.store.clone());
        let alice = users
            .find_by_id(fx.alice.id)
            .await
            .expect("lookup succeeds")
            .expect("alice exists");
        let bob = users
            .find_by_id(fx.bob.id)
            .await
            .expect("lookup succeeds")
            .expect("bob exists");
        assert_eq!(alice.completed_exchanges, 1);
        assert_eq!(bob.completed_exchanges, 1);
    }

    #[tokio::test]
    async fn status_transitions_are_unrestricted_for_participants() {
        let fx = fixture().await;
        let exchange = fx
            .ledger
            .open(&fx.alice, guitar_for_piano(fx.bob.id))
            .await
            .expect("open succeeds");

        // No transition table: completed may go straight back to pending.
        fx.ledger
            .update_status(&fx.bob, exchange.id, ExchangeStatus::Completed)
            .await
            .expect("update succeeds");
        let reverted = fx
            .ledger
            .update_status(&fx.alice, exchange.id, ExchangeStatus::Pending)
            .await
            .expect("update succeeds");
        assert_eq!(reverted.status, ExchangeStatus::Pending);
    }

    #[tokio::test]
    async fn feedback_resubmission_overwrites_and_recomputes() {
        let fx = fixture().await;
        let exchange = fx
            .ledger
            .open(&fx.alice, guitar_for_piano(fx.bob.id))
            .await
            .expect("open succeeds");

        fx.ledger
            .submit_feedback(
                &fx.alice,
                exchange.id,
                RatingScore::try_new(2).expect("in range"),
                None,
            )
            .await
            .expect("first submission succeeds");
        let updated = fx
            .ledger
            .submit_feedback(
                &fx.alice,
                exchange.id,
                RatingScore::try_new(5).expect("in range"),
                Some("much better than expected".into()),
            )
            .await
            .expect("second submission succeeds");

        let entry = updated
            .feedback
            .requester_rating
            .expect("requester slot populated");
        assert_eq!(entry.rating.value(), 5);

        let users: Arc<dyn UserRepository> = Arc::new(fx.store.clone());
        let bob = users
            .find_by_id(fx.bob.id)
            .await
            .expect("lookup succeeds")
            .expect("bob exists");
        assert_eq!(bob.rating.count, 1);
        assert!((bob.rating.average - 5.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn feedback_on_missing_exchange_is_not_found() {
        let fx = fixture().await;
        let err = fx
            .ledger
            .submit_feedback(
                &fx.alice,
                Uuid::new_v4(),
                RatingScore::try_new(4).expect("in range"),
                None,
            )
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
