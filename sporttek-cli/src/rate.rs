use clap::Args;
use sporttek_core::{MatchOutcome, MatchRatings};

use crate::config::Config;
use crate::utils::print_json;
use crate::Error;

#[derive(Debug, Args)]
pub struct Command {
    #[clap(long, allow_hyphen_values = true)]
    winner_rating: i32,
    #[clap(long, allow_hyphen_values = true)]
    loser_rating: i32,
    #[clap(long, default_value_t = 0)]
    winner_matches: u32,
    #[clap(long, default_value_t = 0)]
    loser_matches: u32,
    /// The match ended in a draw. The "winner" is then the first competitor.
    #[clap(long)]
    draw: bool,
}

impl Command {
    pub fn run(&self, config: &Config) -> Result<(), Error> {
        let ratings = self.ratings(config);
        print_json(&ratings)
    }

    fn ratings(&self, config: &Config) -> MatchRatings {
        let outcome = MatchOutcome {
            winner_rating: self.winner_rating,
            loser_rating: self.loser_rating,
            winner_matches: self.winner_matches,
            loser_matches: self.loser_matches,
        };

        if self.draw {
            config.elo.rate_draw(&outcome)
        } else {
            config.elo.rate_match(&outcome)
        }
    }
}
