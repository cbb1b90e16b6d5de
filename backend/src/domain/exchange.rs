//! Skill exchange entity, status lifecycle, and feedback slots.
//!
//! Status transitions are caller-driven: any enum value is accepted from any
//! current state. The lifecycle is advisory, not enforced — preserving the
//! observed wire behaviour of the service this replaces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::{ParticipantSummary, SkillLevel};

/// Lifecycle state of an exchange. Wire values are lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
    Cancelled,
}

/// Which seat a user occupies within one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Requester,
    Receiver,
}

impl Side {
    /// The other seat.
    pub fn opposite(self) -> Self {
        match self {
            Self::Requester => Self::Receiver,
            Self::Receiver => Self::Requester,
        }
    }
}

/// Skill named in an exchange offer or request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkillRef {
    pub name: String,
    pub level: SkillLevel,
}

/// Score in the inclusive 1..=5 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "u8", into = "u8")]
#[schema(value_type = u8)]
pub struct RatingScore(u8);

/// Error raised for out-of-range rating scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rating must be between 1 and 5")]
pub struct InvalidRatingScore;

impl RatingScore {
    /// Validate a raw score.
    pub fn try_new(raw: u8) -> Result<Self, InvalidRatingScore> {
        if (1..=5).contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(InvalidRatingScore)
        }
    }

    /// The numeric score.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<RatingScore> for u8 {
    fn from(value: RatingScore) -> Self {
        value.0
    }
}

impl TryFrom<u8> for RatingScore {
    type Error = InvalidRatingScore;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

/// One party's rating of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub rating: RatingScore,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub date: DateTime<Utc>,
}

/// Feedback slots, one per side. Resubmission by the same side overwrites;
/// at most one entry per side ever exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_rating: Option<FeedbackEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_rating: Option<FeedbackEntry>,
}

/// A proposed or agreed skill-swap session between two users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkillExchange {
    pub id: Uuid,
    pub requester: Uuid,
    pub receiver: Uuid,
    pub offered_skill: SkillRef,
    pub requested_skill: SkillRef,
    pub status: ExchangeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<DateTime<Utc>>,
    /// Planned session length in minutes. Always positive.
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub feedback: Feedback,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SkillExchange {
    /// Open a new pending exchange.
    pub fn new(
        requester: Uuid,
        receiver: Uuid,
        offered_skill: SkillRef,
        requested_skill: SkillRef,
        duration: u32,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            requester,
            receiver,
            offered_skill,
            requested_skill,
            status: ExchangeStatus::Pending,
            scheduled_date: None,
            duration,
            meeting_link: None,
            notes,
            feedback: Feedback::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The seat `user` occupies, if they are a participant.
    pub fn side_of(&self, user: Uuid) -> Option<Side> {
        if self.requester == user {
            Some(Side::Requester)
        } else if self.receiver == user {
            Some(Side::Receiver)
        } else {
            None
        }
    }

    /// Seat used for a feedback submission: the requester slot when the
    /// actor is the requester, the receiver slot otherwise. Matches the
    /// original identity-comparison rule, which never rejects the actor.
    pub fn acting_side(&self, actor: Uuid) -> Side {
        if self.requester == actor {
            Side::Requester
        } else {
            Side::Receiver
        }
    }

    /// Participant seated on `side`.
    pub fn participant(&self, side: Side) -> Uuid {
        match side {
            Side::Requester => self.requester,
            Side::Receiver => self.receiver,
        }
    }

    /// Mutable access to the feedback slot authored by `side`.
    pub fn feedback_slot_mut(&mut self, side: Side) -> &mut Option<FeedbackEntry> {
        match side {
            Side::Requester => &mut self.feedback.requester_rating,
            Side::Receiver => &mut self.feedback.receiver_rating,
        }
    }

    /// Score `user` received in this exchange while seated on `side`, if
    /// any. The rating of a side is authored by the opposite side, so this
    /// reads the opposite slot.
    pub fn rating_received_by(&self, user: Uuid, side: Side) -> Option<u8> {
        if self.participant(side) != user {
            return None;
        }
        let slot = match side {
            Side::Requester => &self.feedback.receiver_rating,
            Side::Receiver => &self.feedback.requester_rating,
        };
        slot.as_ref().map(|entry| entry.rating.value())
    }
}

/// Exchange with both parties resolved to display-safe summaries, as
/// returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeView {
    pub id: Uuid,
    pub requester: ParticipantSummary,
    pub receiver: ParticipantSummary,
    pub offered_skill: SkillRef,
    pub requested_skill: SkillRef,
    pub status: ExchangeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<DateTime<Utc>>,
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub feedback: Feedback,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExchangeView {
    /// Combine a stored exchange with the resolved party summaries.
    pub fn from_parts(
        exchange: SkillExchange,
        requester: ParticipantSummary,
        receiver: ParticipantSummary,
    ) -> Self {
        Self {
            id: exchange.id,
            requester,
            receiver,
            offered_skill: exchange.offered_skill,
            requested_skill: exchange.requested_skill,
            status: exchange.status,
            scheduled_date: exchange.scheduled_date,
            duration: exchange.duration,
            meeting_link: exchange.meeting_link,
            notes: exchange.notes,
            feedback: exchange.feedback,
            created_at: exchange.created_at,
            updated_at: exchange.updated_at,
        }
    }
}
