use std::fmt::{self, Display, Formatter};

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The lifecycle of a tournament.
///
/// A tournament starts in [`Registration`], moves to [`InProgress`] once its bracket has been
/// generated and ends as [`Completed`] when the winner of the final is known. No other
/// transitions exist.
///
/// [`Registration`]: Self::Registration
/// [`InProgress`]: Self::InProgress
/// [`Completed`]: Self::Completed
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TournamentStatus {
    #[default]
    Registration,
    InProgress,
    Completed,
}

impl TournamentStatus {
    /// Returns `true` if a tournament in this status may move to `next`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sporttek_core::TournamentStatus;
    /// assert!(TournamentStatus::Registration.can_transition_to(TournamentStatus::InProgress));
    /// assert!(!TournamentStatus::Completed.can_transition_to(TournamentStatus::InProgress));
    /// ```
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Registration, Self::InProgress) | (Self::InProgress, Self::Completed)
        )
    }

    /// Returns `next` if the transition is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] if `self` cannot move to `next`.
    pub fn transition(self, next: Self) -> Result<Self> {
        if self.can_transition_to(next) {
            log::debug!("Tournament status {} -> {}", self, next);
            Ok(next)
        } else {
            Err(Error::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registration => "REGISTRATION",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        }
    }
}

impl Display for TournamentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
