//! # Elo Ratings
//!
//! Ratings are updated after every confirmed match using the standard Elo formula. The maximum
//! change per match, the K-factor, depends on how many matches a competitor has played:
//! provisional competitors (less than [`PROVISIONAL_MATCHES`] matches) move faster than
//! established ones.
//!
//! There is no rating floor. A competitor who keeps losing can end up with a negative rating.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// K-factor used for competitors with less than [`PROVISIONAL_MATCHES`] played matches.
pub const PROVISIONAL_K: u32 = 32;

/// K-factor used for established competitors.
pub const ESTABLISHED_K: u32 = 16;

/// Number of played matches after which a competitor is considered established.
pub const PROVISIONAL_MATCHES: u32 = 30;

/// The actual score of a competitor in a single match.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Score {
    Loss,
    Draw,
    Win,
}

impl Score {
    #[inline]
    pub const fn value(self) -> f64 {
        match self {
            Self::Loss => 0.0,
            Self::Draw => 0.5,
            Self::Win => 1.0,
        }
    }
}

/// The updated rating of a single competitor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RatingChange {
    pub new_rating: i32,
    pub delta: i32,
}

/// The ratings and experience of both competitors of a finished match.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchOutcome {
    pub winner_rating: i32,
    pub loser_rating: i32,
    pub winner_matches: u32,
    pub loser_matches: u32,
}

/// The rating changes of both competitors of a match.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchRatings {
    pub winner: RatingChange,
    pub loser: RatingChange,
}

/// The constants of the rating engine.
///
/// The free functions of this module use [`EloOptions::default`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EloOptions {
    pub provisional_k: u32,
    pub established_k: u32,
    pub provisional_matches: u32,
}

impl EloOptions {
    #[inline]
    pub const fn new() -> Self {
        Self {
            provisional_k: PROVISIONAL_K,
            established_k: ESTABLISHED_K,
            provisional_matches: PROVISIONAL_MATCHES,
        }
    }

    /// Returns the K-factor for a competitor with `matches_played` matches.
    #[inline]
    pub const fn k_factor(&self, matches_played: u32) -> u32 {
        if matches_played < self.provisional_matches {
            self.provisional_k
        } else {
            self.established_k
        }
    }

    /// Calculates the new rating of a competitor rated `rating` after scoring `score` against
    /// an opponent rated `opponent_rating`.
    pub fn calculate(
        &self,
        rating: i32,
        opponent_rating: i32,
        score: Score,
        matches_played: u32,
    ) -> RatingChange {
        let expected = expected_score(rating, opponent_rating);
        let k = f64::from(self.k_factor(matches_played));

        let delta = (k * (score.value() - expected)).round() as i32;

        RatingChange {
            new_rating: rating.saturating_add(delta),
            delta,
        }
    }

    /// Calculates the new ratings of both competitors of a decided match.
    pub fn rate_match(&self, outcome: &MatchOutcome) -> MatchRatings {
        self.rate(outcome, Score::Win, Score::Loss)
    }

    /// Calculates the new ratings of both competitors of a drawn match. The `winner` fields
    /// of `outcome` and of the result refer to the first competitor.
    pub fn rate_draw(&self, outcome: &MatchOutcome) -> MatchRatings {
        self.rate(outcome, Score::Draw, Score::Draw)
    }

    fn rate(&self, outcome: &MatchOutcome, first: Score, second: Score) -> MatchRatings {
        let winner = self.calculate(
            outcome.winner_rating,
            outcome.loser_rating,
            first,
            outcome.winner_matches,
        );
        let loser = self.calculate(
            outcome.loser_rating,
            outcome.winner_rating,
            second,
            outcome.loser_matches,
        );

        log::debug!(
            "Rated match {:?}: winner {:+}, loser {:+}",
            outcome,
            winner.delta,
            loser.delta
        );

        MatchRatings { winner, loser }
    }
}

impl Default for EloOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the expected score (between 0 and 1) of a competitor rated `rating` against an
/// opponent rated `opponent_rating`.
pub fn expected_score(rating: i32, opponent_rating: i32) -> f64 {
    let diff = f64::from(opponent_rating) - f64::from(rating);
    1.0 / (1.0 + 10_f64.powf(diff / 400.0))
}

/// Returns the default K-factor for a competitor with `matches_played` matches.
#[inline]
pub const fn k_factor(matches_played: u32) -> u32 {
    EloOptions::new().k_factor(matches_played)
}

/// Calculates a new rating using the default [`EloOptions`].
///
/// # Examples
///
/// ```
/// # use sporttek_core::rating::calculate_elo;
/// # use sporttek_core::Score;
/// let change = calculate_elo(1500, 1500, Score::Win, 10);
///
/// assert_eq!(change.delta, 16);
/// assert_eq!(change.new_rating, 1516);
/// ```
#[inline]
pub fn calculate_elo(
    rating: i32,
    opponent_rating: i32,
    score: Score,
    matches_played: u32,
) -> RatingChange {
    EloOptions::new().calculate(rating, opponent_rating, score, matches_played)
}

/// Calculates the new ratings of both competitors using the default [`EloOptions`].
#[inline]
pub fn rate_match(outcome: &MatchOutcome) -> MatchRatings {
    EloOptions::new().rate_match(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATINGS: [i32; 9] = [-150, 0, 800, 1200, 1499, 1500, 1850, 2400, 3000];

    #[test]
    fn test_k_factor() {
        for matches in [0, 15, 29] {
            assert_eq!(k_factor(matches), 32);
        }

        for matches in [30, 100] {
            assert_eq!(k_factor(matches), 16);
        }
    }

    #[test]
    fn test_expected_score() {
        assert!((expected_score(1500, 1500) - 0.5).abs() < 1e-9);
        assert!(expected_score(1700, 1500) > 0.75);
        assert!(expected_score(1300, 1500) < 0.25);

        for a in RATINGS {
            for b in RATINGS {
                let sum = expected_score(a, b) + expected_score(b, a);
                assert!((sum - 1.0).abs() < 1e-9, "{} vs {}: {}", a, b, sum);
            }
        }
    }

    #[test]
    fn test_calculate_elo() {
        assert_eq!(
            calculate_elo(1500, 1500, Score::Win, 10),
            RatingChange {
                new_rating: 1516,
                delta: 16
            }
        );
        assert_eq!(
            calculate_elo(1500, 1500, Score::Loss, 10),
            RatingChange {
                new_rating: 1484,
                delta: -16
            }
        );
        assert_eq!(calculate_elo(1500, 1500, Score::Win, 50).delta, 8);
        assert_eq!(calculate_elo(1500, 1500, Score::Draw, 50).delta, 0);

        // The underdog gains more than the favourite would.
        let upset = calculate_elo(1300, 1500, Score::Win, 50);
        let expected = calculate_elo(1500, 1300, Score::Win, 50);
        assert!(upset.delta > expected.delta);
    }

    #[test]
    fn test_rate_match_zero_sum() {
        for matches in [0, 10, 29, 30, 50] {
            for winner_rating in RATINGS {
                for loser_rating in RATINGS {
                    let ratings = rate_match(&MatchOutcome {
                        winner_rating,
                        loser_rating,
                        winner_matches: matches,
                        loser_matches: matches,
                    });

                    assert_eq!(
                        ratings.winner.delta + ratings.loser.delta,
                        0,
                        "{} beats {} after {} matches",
                        winner_rating,
                        loser_rating,
                        matches
                    );
                    assert!(ratings.winner.delta >= 0);
                }
            }
        }
    }

    #[test]
    fn test_rate_match_mixed_k_factor() {
        let ratings = rate_match(&MatchOutcome {
            winner_rating: 1500,
            loser_rating: 1500,
            winner_matches: 3,
            loser_matches: 120,
        });

        assert_eq!(ratings.winner.delta, 16);
        assert_eq!(ratings.loser.delta, -8);
        assert_eq!(ratings.winner.new_rating, 1516);
        assert_eq!(ratings.loser.new_rating, 1492);
    }

    #[test]
    fn test_rating_below_zero() {
        let change = calculate_elo(5, 5, Score::Loss, 50);

        assert_eq!(change.delta, -8);
        assert_eq!(change.new_rating, -3);
    }

    #[test]
    fn test_rate_draw() {
        let ratings = EloOptions::default().rate_draw(&MatchOutcome {
            winner_rating: 1400,
            loser_rating: 1600,
            winner_matches: 40,
            loser_matches: 40,
        });

        assert!(ratings.winner.delta > 0);
        assert_eq!(ratings.winner.delta + ratings.loser.delta, 0);
    }

    #[test]
    fn test_custom_options() {
        let options = EloOptions {
            provisional_k: 40,
            established_k: 20,
            provisional_matches: 10,
        };

        assert_eq!(options.k_factor(9), 40);
        assert_eq!(options.k_factor(10), 20);
        assert_eq!(options.calculate(1500, 1500, Score::Win, 5).delta, 20);
        assert_eq!(options.calculate(1500, 1500, Score::Win, 10).delta, 10);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_rating_change_serde() {
        use serde_test::{assert_tokens, Token};

        assert_tokens(
            &RatingChange {
                new_rating: 1516,
                delta: 16,
            },
            &[
                Token::Struct {
                    name: "RatingChange",
                    len: 2,
                },
                Token::Str("new_rating"),
                Token::I32(1516),
                Token::Str("delta"),
                Token::I32(16),
                Token::StructEnd,
            ],
        );
    }
}
