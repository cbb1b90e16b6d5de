//! In-memory document store implementing both repository ports.
//!
//! All collections sit behind one `RwLock`, so each port method executes as
//! a single transactional unit: the multi-record operations (completion
//! counters, rating aggregates) never expose a half-applied state to a
//! concurrent reader.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::exchange::{ExchangeStatus, FeedbackEntry, Side, SkillExchange};
use crate::domain::ports::{
    ExchangeRepository, ExchangeStoreError, SkillNameFilter, UserRepository, UserStoreError,
};
use crate::domain::user::{EmailAddress, Rating, User};

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    exchanges: HashMap<Uuid, SkillExchange>,
}

/// Process-local store backing both repository ports.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

fn skill_matches(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(&needle.to_lowercase())
}

/// Recompute the side-scoped rating aggregate for `user` seated on `side`
/// across every exchange in the collection.
fn recompute_rating(exchanges: &HashMap<Uuid, SkillExchange>, user: Uuid, side: Side) -> Rating {
    let scores: Vec<u8> = exchanges
        .values()
        .filter_map(|exchange| exchange.rating_received_by(user, side))
        .collect();
    Rating::from_scores(&scores)
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: User) -> Result<User, UserStoreError> {
        let mut inner = self.inner.write().await;
        if inner
            .users
            .values()
            .any(|existing| existing.username == user.username)
        {
            return Err(UserStoreError::DuplicateUsername);
        }
        if inner
            .users
            .values()
            .any(|existing| existing.email == user.email)
        {
            return Err(UserStoreError::DuplicateEmail);
        }
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserStoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserStoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|user| &user.email == email).cloned())
    }

    async fn save(&self, user: User) -> Result<User, UserStoreError> {
        let mut inner = self.inner.write().await;
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn search_by_skill(&self, needle: &str) -> Result<Vec<User>, UserStoreError> {
        let inner = self.inner.read().await;
        let mut matches: Vec<User> = inner
            .users
            .values()
            .filter(|user| {
                user.skills
                    .iter()
                    .any(|skill| skill_matches(&skill.name, needle))
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.username.as_ref().cmp(b.username.as_ref()));
        Ok(matches)
    }

    async fn skill_names(&self, filter: SkillNameFilter) -> Result<Vec<String>, UserStoreError> {
        let inner = self.inner.read().await;
        let mut names: Vec<String> = inner
            .users
            .values()
            .flat_map(|user| user.skills.iter())
            .filter(|skill| match &filter {
                SkillNameFilter::All => true,
                SkillNameFilter::Level(level) => skill.level == *level,
                SkillNameFilter::Matching(needle) => skill_matches(&skill.name, needle),
            })
            .map(|skill| skill.name.clone())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}

#[async_trait]
impl ExchangeRepository for MemoryStore {
    async fn insert(&self, exchange: SkillExchange) -> Result<SkillExchange, ExchangeStoreError> {
        let mut inner = self.inner.write().await;
        inner.exchanges.insert(exchange.id, exchange.clone());
        Ok(exchange)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SkillExchange>, ExchangeStoreError> {
        let inner = self.inner.read().await;
        Ok(inner.exchanges.get(&id).cloned())
    }

    async fn list_for_participant(
        &self,
        user: Uuid,
    ) -> Result<Vec<SkillExchange>, ExchangeStoreError> {
        let inner = self.inner.read().await;
        let mut exchanges: Vec<SkillExchange> = inner
            .exchanges
            .values()
            .filter(|exchange| exchange.requester == user || exchange.receiver == user)
            .cloned()
            .collect();
        exchanges.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(exchanges)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ExchangeStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<SkillExchange>, ExchangeStoreError> {
        let mut inner = self.inner.write().await;
        let Some(exchange) = inner.exchanges.get_mut(&id) else {
            return Ok(None);
        };
        exchange.status = status;
        exchange.updated_at = now;
        let snapshot = exchange.clone();

        if status == ExchangeStatus::Completed {
            for party in [snapshot.requester, snapshot.receiver] {
                if let Some(user) = inner.users.get_mut(&party) {
                    user.completed_exchanges += 1;
                    user.updated_at = now;
                }
            }
        }
        Ok(Some(snapshot))
    }

    async fn record_feedback(
        &self,
        id: Uuid,
        side: Side,
        entry: FeedbackEntry,
    ) -> Result<Option<SkillExchange>, ExchangeStoreError> {
        let mut inner = self.inner.write().await;
        let now = entry.date;
        let snapshot = {
            let Some(exchange) = inner.exchanges.get_mut(&id) else {
                return Ok(None);
            };
            *exchange.feedback_slot_mut(side) = Some(entry);
            exchange.updated_at = now;
            exchange.clone()
        };

        let rated_side = side.opposite();
        let rated_party = snapshot.participant(rated_side);
        let rating = recompute_rating(&inner.exchanges, rated_party, rated_side);
        if let Some(user) = inner.users.get_mut(&rated_party) {
            user.rating = rating;
            user.updated_at = now;
        }
        Ok(Some(snapshot))
    }
}
