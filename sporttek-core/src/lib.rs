//! # sporttek-core
//!
//! This crate contains the competition engines used by SportTek: an Elo based [`rating`] engine
//! and a single elimination [`Bracket`] engine. Both engines are pure: they never persist
//! anything themselves and return plain data that the caller applies inside its own
//! transaction.
//!
//! Important types:
//! - [`Competitor`]: A participant with its current rating and number of played matches.
//! - [`Entrants`]: A wrapper around `Vec<T>` holding the competitors of a bracket in seed order.
//! - [`Bracket`]: A single elimination bracket. Built once with [`Bracket::generate`] and
//! advanced with [`Bracket::advance_winner`].
//! - [`BracketNode`]: A single match slot in the bracket.
//! - [`EntrantSpot`]: A *spot* within a match, which can contain an entrant, be permanently empty
//! (a bye) or contain a to-be-decided spot.
//! - [`TournamentStatus`]: The lifecycle of a tournament.
//!
//! ## Feature Flags
//!
//! `serde`: Adds `Serialize` and `Deserialize` impls to all public data types.
//!
pub mod rating;
pub mod standings;
pub mod tournament;

mod bracket;
mod utils;

pub use bracket::{Advancement, Bracket, BracketNode, NextMatch};
pub use rating::{EloOptions, MatchOutcome, MatchRatings, RatingChange, Score};
pub use standings::{Placement, Standings};
pub use tournament::TournamentStatus;

use thiserror::Error;

use std::ops::Deref;
use std::result;
use std::vec::IntoIter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A participant of a tournament as stored by the profile store.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Competitor<C> {
    pub id: C,
    pub rating: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub matches_played: u32,
}

impl<C> Competitor<C> {
    #[inline]
    pub fn new(id: C, rating: i32, matches_played: u32) -> Self {
        Self {
            id,
            rating,
            matches_played,
        }
    }
}

/// A wrapper around a `Vec<T>` where `T` should be considered an entrant for a tournament. The
/// entrants are stored in seed order, the first entrant being the top seed.
///
/// This is a wrapper around a `Vec<T>` and has the same layout as a `Vec<T>`.
#[derive(Clone, Debug, Default)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Entrants<T> {
    entrants: Vec<T>,
}

impl<T> Entrants<T> {
    /// Seeds the given `competitors` by descending rating.
    ///
    /// Competitors with equal ratings are ordered by ascending id, so the resulting order never
    /// depends on the order in which the competitors were given.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sporttek_core::{Competitor, Entrants};
    /// let entrants = Entrants::seeded(vec![
    ///     Competitor::new("c", 1400, 0),
    ///     Competitor::new("b", 1600, 0),
    ///     Competitor::new("a", 1400, 0),
    /// ]);
    ///
    /// assert_eq!(entrants, ["b", "a", "c"]);
    /// ```
    pub fn seeded<I>(competitors: I) -> Self
    where
        I: IntoIterator<Item = Competitor<T>>,
        T: Ord,
    {
        let mut competitors: Vec<_> = competitors.into_iter().collect();
        competitors.sort_by(|a, b| b.rating.cmp(&a.rating).then_with(|| a.id.cmp(&b.id)));

        competitors.into_iter().map(|c| c.id).collect()
    }

    /// Returns the seed (starting at 0) of `entrant`, or `None` if it is not contained.
    pub fn seed_of(&self, entrant: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.entrants.iter().position(|e| e == entrant)
    }
}

impl<T> FromIterator<T> for Entrants<T> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let entrants = iter.into_iter().collect();

        Self { entrants }
    }
}

impl<T> IntoIterator for Entrants<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entrants.into_iter()
    }
}

impl<T> Deref for Entrants<T> {
    type Target = Vec<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.entrants
    }
}

impl<T, U> PartialEq<U> for Entrants<T>
where
    T: PartialEq,
    U: AsRef<[T]>,
{
    #[inline]
    fn eq(&self, other: &U) -> bool {
        self.entrants == other.as_ref()
    }
}

impl<T> From<Vec<T>> for Entrants<T> {
    #[inline]
    fn from(entrants: Vec<T>) -> Self {
        Self { entrants }
    }
}

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

/// An invalid state transition rejected by the bracket engine.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("not enough participants: at least 2 are required, found {0}")]
    NotEnoughParticipants(usize),
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: TournamentStatus,
        to: TournamentStatus,
    },
    #[error("tournament is not in progress: {0}")]
    NotInProgress(TournamentStatus),
    #[error("a bracket already exists for this tournament")]
    BracketExists,
    #[error("no match at round {round}, position {position}")]
    UnknownNode { round: u32, position: u32 },
    #[error("match at round {round}, position {position} is still waiting for a player")]
    NodeNotReady { round: u32, position: u32 },
    #[error("match at round {round}, position {position} already has a winner")]
    WinnerAlreadySet { round: u32, position: u32 },
    #[error("winner is not a player of the match at round {round}, position {position}")]
    InvalidWinner { round: u32, position: u32 },
    #[error("invalid number of matches: expected {expected}, found {found}")]
    InvalidNumberOfMatches { expected: usize, found: usize },
    #[error("duplicate match at round {round}, position {position}")]
    DuplicateNode { round: u32, position: u32 },
    #[error("match at round {round}, position {position} refers to an unknown competitor")]
    UnknownCompetitor { round: u32, position: u32 },
    #[error("competitor seeded {0} is already in the bracket")]
    DuplicateCompetitor(usize),
}

/// A spot for an Entrant in the bracket.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntrantSpot<T> {
    Entrant(T),
    /// A bye: no entrant will ever take this spot.
    Empty,
    TBD,
}

impl<T> EntrantSpot<T> {
    /// Creates a new `EntrantSpot` from an [`Option`]. A `Some(T)` value will translate into
    /// a `Entrant(T)` value, a `None` value will translate into a `Empty` value.
    pub fn new(entrant: Option<T>) -> Self {
        match entrant {
            Some(entrant) => Self::Entrant(entrant),
            None => Self::Empty,
        }
    }

    /// Returns `true` if the `EntrantSpot` is [`Entrant`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use sporttek_core::EntrantSpot;
    /// let spot = EntrantSpot::Entrant(());
    /// assert!(spot.is_entrant());
    /// ```
    /// [`Entrant`]: Self::Entrant
    pub fn is_entrant(&self) -> bool {
        matches!(self, Self::Entrant(_))
    }

    /// Returns the contained entrant, or `None` for [`Empty`] and [`TBD`] spots.
    ///
    /// [`Empty`]: Self::Empty
    /// [`TBD`]: Self::TBD
    pub fn entrant(&self) -> Option<&T> {
        match self {
            Self::Entrant(entrant) => Some(entrant),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Competitor, EntrantSpot, Entrants};

    #[macro_export]
    macro_rules! competitors {
        ($($id:expr => $rating:expr),*$(,)?) => {
            vec![$($crate::Competitor::new($id, $rating, 0)),*]
        };
    }

    #[test]
    fn test_entrants_seeded() {
        let entrants = Entrants::seeded(competitors![
            1 => 1200,
            2 => 1800,
            3 => 1500,
            4 => 1650,
        ]);

        assert_eq!(entrants, [2, 4, 3, 1]);
        assert_eq!(entrants.seed_of(&2), Some(0));
        assert_eq!(entrants.seed_of(&1), Some(3));
        assert_eq!(entrants.seed_of(&5), None);
    }

    #[test]
    fn test_entrants_seeded_tiebreak() {
        let forward = Entrants::seeded(competitors![
            "anna" => 1500,
            "bert" => 1500,
            "carl" => 1700,
        ]);
        let backward = Entrants::seeded(competitors![
            "carl" => 1700,
            "bert" => 1500,
            "anna" => 1500,
        ]);

        assert_eq!(forward, ["carl", "anna", "bert"]);
        assert_eq!(forward, *backward);
    }

    #[test]
    fn test_entrants_seeded_negative_ratings() {
        let entrants = Entrants::seeded(vec![
            Competitor::new('a', -20, 40),
            Competitor::new('b', 0, 3),
        ]);

        assert_eq!(entrants, ['b', 'a']);
    }

    #[test]
    fn test_entrant_spot() {
        assert_eq!(EntrantSpot::new(Some(3)), EntrantSpot::Entrant(3));
        assert_eq!(EntrantSpot::<i32>::new(None), EntrantSpot::Empty);

        assert_eq!(EntrantSpot::Entrant(3).entrant(), Some(&3));
        assert_eq!(EntrantSpot::<i32>::Empty.entrant(), None);
        assert_eq!(EntrantSpot::<i32>::TBD.entrant(), None);

        assert!(EntrantSpot::Entrant(3).is_entrant());
        assert!(!EntrantSpot::<i32>::TBD.is_entrant());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_entrant_spot_serde() {
        use serde_test::{assert_tokens, Token};

        assert_tokens(
            &EntrantSpot::Entrant(7u64),
            &[
                Token::NewtypeVariant {
                    name: "EntrantSpot",
                    variant: "Entrant",
                },
                Token::U64(7),
            ],
        );
        assert_tokens(
            &EntrantSpot::<u64>::Empty,
            &[Token::UnitVariant {
                name: "EntrantSpot",
                variant: "Empty",
            }],
        );
        assert_tokens(
            &EntrantSpot::<u64>::TBD,
            &[Token::UnitVariant {
                name: "EntrantSpot",
                variant: "TBD",
            }],
        );
    }
}
