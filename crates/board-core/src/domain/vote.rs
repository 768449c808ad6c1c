//! Like/dislike votes and the transition table that drives post counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A user's vote on a post. Unique per `(post_id, user_id)`.
///
/// `is_like` is tri-state: `Some(true)` liked, `Some(false)` disliked, `None`
/// neutral (toggled off). Rows are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: i32,
    pub post_id: i32,
    pub user_id: i32,
    pub is_like: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated vote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteCommand {
    pub post_id: i32,
    pub user_id: i32,
    pub is_like: bool,
}

impl VoteCommand {
    /// Validate a raw payload where every field may be missing.
    pub fn parse(
        target_id: Option<i32>,
        user_id: Option<i32>,
        is_like: Option<bool>,
    ) -> Result<Self, DomainError> {
        let post_id =
            target_id.ok_or_else(|| DomainError::Validation("targetId is required".into()))?;
        let user_id =
            user_id.ok_or_else(|| DomainError::Validation("userId is required".into()))?;
        let is_like =
            is_like.ok_or_else(|| DomainError::Validation("isLike is required".into()))?;
        Ok(Self {
            post_id,
            user_id,
            is_like,
        })
    }
}

/// Change applied to a post's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterDelta {
    pub likes: i32,
    pub dislikes: i32,
}

/// Result of applying a vote request to the stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTransition {
    pub next: Option<bool>,
    pub delta: CounterDelta,
}

impl VoteTransition {
    /// Compute the next stored value and the counter change.
    ///
    /// A missing vote row and a neutral row transition identically; only the
    /// persistence path (insert vs. update) differs.
    pub fn apply(current: Option<bool>, is_like: bool) -> Self {
        let (next, likes, dislikes) = match (current, is_like) {
            (None, true) => (Some(true), 1, 0),
            (None, false) => (Some(false), 0, 1),
            (Some(true), true) => (None, -1, 0),
            (Some(true), false) => (Some(false), -1, 1),
            (Some(false), true) => (Some(true), 1, -1),
            (Some(false), false) => (None, 0, -1),
        };
        Self {
            next,
            delta: CounterDelta { likes, dislikes },
        }
    }
}

/// What the store persisted for one vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    pub previous: Option<bool>,
    pub transition: VoteTransition,
    /// Whether a new vote row was inserted.
    pub created: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(likes: i32, dislikes: i32) -> CounterDelta {
        CounterDelta { likes, dislikes }
    }

    #[test]
    fn transition_table() {
        let cases = [
            (None, true, Some(true), delta(1, 0)),
            (None, false, Some(false), delta(0, 1)),
            (Some(true), true, None, delta(-1, 0)),
            (Some(true), false, Some(false), delta(-1, 1)),
            (Some(false), true, Some(true), delta(1, -1)),
            (Some(false), false, None, delta(0, -1)),
        ];

        for (current, is_like, next, expected) in cases {
            let t = VoteTransition::apply(current, is_like);
            assert_eq!(t.next, next, "{current:?} + {is_like}");
            assert_eq!(t.delta, expected, "{current:?} + {is_like}");
        }
    }

    #[test]
    fn repeating_a_vote_toggles_it_off() {
        for is_like in [true, false] {
            let first = VoteTransition::apply(None, is_like);
            let second = VoteTransition::apply(first.next, is_like);
            assert_eq!(second.next, None);
            assert_eq!(first.delta.likes + second.delta.likes, 0);
            assert_eq!(first.delta.dislikes + second.delta.dislikes, 0);
        }
    }

    #[test]
    fn flips_move_both_counters() {
        let t = VoteTransition::apply(Some(true), false);
        assert_eq!(t.delta.likes.abs(), 1);
        assert_eq!(t.delta.dislikes.abs(), 1);

        let t = VoteTransition::apply(Some(false), true);
        assert_eq!(t.delta.likes.abs(), 1);
        assert_eq!(t.delta.dislikes.abs(), 1);
    }

    #[test]
    fn counters_track_vote_state_over_any_sequence() {
        // Every vote sequence of length 6 for a single user.
        for mask in 0u32..64 {
            let mut state = None;
            let (mut likes, mut dislikes) = (0, 0);
            for bit in 0..6 {
                let t = VoteTransition::apply(state, mask & (1 << bit) != 0);
                state = t.next;
                likes += t.delta.likes;
                dislikes += t.delta.dislikes;
                assert_eq!(likes, i32::from(state == Some(true)));
                assert_eq!(dislikes, i32::from(state == Some(false)));
            }
        }
    }

    #[test]
    fn parse_rejects_missing_fields() {
        assert!(matches!(
            VoteCommand::parse(None, Some(1), Some(true)),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            VoteCommand::parse(Some(1), None, Some(true)),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            VoteCommand::parse(Some(1), Some(2), None),
            Err(DomainError::Validation(_))
        ));

        let cmd = VoteCommand::parse(Some(3), Some(4), Some(false)).unwrap();
        assert_eq!(
            cmd,
            VoteCommand {
                post_id: 3,
                user_id: 4,
                is_like: false
            }
        );
    }
}
