//! URL lifecycle definitions for the frontier
//!
//! A URL moves `Unseen -> Queued -> InFlight -> (Known | Failed)`; only the
//! Store can confirm `Known`, every other state is owned by the scheduler.
//!
//! ```
//! use deep_mapsite::state::UrlState;
//!
//! assert!(UrlState::Queued.can_transition_to(UrlState::InFlight));
//! assert!(!UrlState::Known.can_transition_to(UrlState::Queued));
//! ```

use std::fmt;

/// Represents where a URL currently sits in the discovery lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlState {
    /// Never seen by the scheduler or the Store
    Unseen,

    /// Waiting in the frontier queue
    Queued,

    /// Popped from the queue and currently being fetched
    InFlight,

    /// Recorded in the Store
    Known,

    /// Fetch failed; kept for reporting, never retried
    Failed,
}

impl UrlState {
    /// Returns true if this is a terminal state (the URL will never be queued again)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Known | Self::Failed)
    }

    /// Returns true if the URL may still be enqueued
    pub fn is_enqueueable(&self) -> bool {
        matches!(self, Self::Unseen)
    }

    /// Returns true if the transition `self -> next` is part of the lifecycle
    pub fn can_transition_to(&self, next: UrlState) -> bool {
        matches!(
            (self, next),
            (Self::Unseen, Self::Queued)
                | (Self::Unseen, Self::Known)
                | (Self::Queued, Self::InFlight)
                | (Self::Queued, Self::Known)
                | (Self::InFlight, Self::Known)
                | (Self::InFlight, Self::Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unseen => "unseen",
            Self::Queued => "queued",
            Self::InFlight => "in_flight",
            Self::Known => "known",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for UrlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
