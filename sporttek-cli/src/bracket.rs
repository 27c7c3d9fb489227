use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde::{Deserialize, Serialize};
use sporttek_core::{
    Advancement, Bracket, BracketNode, Competitor, Entrants, Placement, TournamentStatus,
};

use crate::utils::{print_json, read_json};
use crate::Error;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Seeds the participants of a JSON file and prints the generated bracket.
    Generate { participants: PathBuf },
    /// Sets the winner of a match and prints the updated bracket with all changes.
    Advance {
        bracket: PathBuf,
        #[clap(long)]
        round: u32,
        #[clap(long)]
        position: u32,
        #[clap(long)]
        winner: String,
    },
    /// Prints the final placements of a bracket.
    Standings { bracket: PathBuf },
}

impl Command {
    pub fn run(&self) -> Result<(), Error> {
        match self {
            Self::Generate { participants } => print_json(&generate(participants)?),
            Self::Advance {
                bracket,
                round,
                position,
                winner,
            } => print_json(&advance(bracket, *round, *position, winner)?),
            Self::Standings { bracket } => print_json(&standings(bracket)?),
        }
    }
}

fn generate(participants: &Path) -> Result<BracketFile, Error> {
    let participants: Vec<Competitor<String>> = read_json(participants)?;
    let bracket = Bracket::generate(participants)?;

    Ok(BracketFile::from(&bracket))
}

fn advance(path: &Path, round: u32, position: u32, winner: &str) -> Result<AdvanceOutput, Error> {
    let file: BracketFile = read_json(path)?;
    let mut bracket = file.into_bracket()?;

    let advancement = bracket.advance_winner(round, position, winner.to_owned())?;

    Ok(AdvanceOutput {
        bracket: BracketFile::from(&bracket),
        advancement,
    })
}

fn standings(path: &Path) -> Result<Vec<Placement<String>>, Error> {
    let file: BracketFile = read_json(path)?;
    let bracket = file.into_bracket()?;

    Ok(bracket.standings().into_vec())
}

/// The stored form of a [`Bracket`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BracketFile {
    /// Derived from `nodes` when reading the file.
    #[serde(default)]
    pub status: TournamentStatus,
    pub entrants: Entrants<String>,
    pub nodes: Vec<BracketNode<String>>,
}

impl BracketFile {
    pub fn into_bracket(self) -> Result<Bracket<String>, Error> {
        Ok(Bracket::resume(self.entrants, self.nodes)?)
    }
}

impl From<&Bracket<String>> for BracketFile {
    fn from(bracket: &Bracket<String>) -> Self {
        Self {
            status: bracket.status(),
            entrants: bracket.entrants().clone(),
            nodes: bracket.nodes().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
struct AdvanceOutput {
    bracket: BracketFile,
    advancement: Advancement<String>,
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use sporttek_core::{Bracket, Competitor, EntrantSpot, Placement, TournamentStatus};
    use tempfile::TempDir;

    use super::{advance, standings, BracketFile, Command};
    use crate::Error;

    fn write_json<T>(path: &Path, value: &T)
    where
        T: serde::Serialize,
    {
        fs::write(path, serde_json::to_vec(value).unwrap()).unwrap();
    }

    #[test]
    fn test_bracket_file_json() {
        let participants: Vec<Competitor<String>> = serde_json::from_str(
            r#"[
                {"id": "ana", "rating": 1620, "matches_played": 41},
                {"id": "ben", "rating": 1580},
                {"id": "cleo", "rating": 1710, "matches_played": 3}
            ]"#,
        )
        .unwrap();

        let bracket = Bracket::generate(participants).unwrap();
        let json = serde_json::to_string(&BracketFile::from(&bracket)).unwrap();

        let file: BracketFile = serde_json::from_str(&json).unwrap();
        assert_eq!(file.status, TournamentStatus::InProgress);

        let mut resumed = file.into_bracket().unwrap();
        assert_eq!(resumed.nodes(), bracket.nodes());
        assert_eq!(
            resumed
                .entrants()
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>(),
            ["cleo", "ana", "ben"]
        );

        let advancement = resumed.advance_winner(1, 1, "ben".to_owned()).unwrap();
        assert_eq!(advancement.updated.len(), 2);
        assert_eq!(
            resumed.node(2, 0).unwrap().entrants,
            [
                EntrantSpot::Entrant("cleo".to_owned()),
                EntrantSpot::Entrant("ben".to_owned())
            ]
        );
    }

    #[test]
    fn test_bracket_file_json_format() {
        let file: BracketFile = serde_json::from_str(
            r#"{
                "entrants": ["a", "b"],
                "nodes": [
                    {"round": 1, "position": 0, "entrants": [{"Entrant": "a"}, {"Entrant": "b"}], "winner": "b"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(file.status, TournamentStatus::Registration);

        let bracket = file.into_bracket().unwrap();
        assert_eq!(bracket.status(), TournamentStatus::Completed);
        assert_eq!(bracket.champion().map(String::as_str), Some("b"));
    }

    #[test]
    fn test_bracket_command_run() {
        let temp = TempDir::new().unwrap();
        let participants = temp.path().join("participants.json");
        let path = temp.path().join("bracket.json");

        fs::write(
            &participants,
            r#"[{"id": "a", "rating": 1500}, {"id": "b", "rating": 1600}]"#,
        )
        .unwrap();

        Command::Generate {
            participants: participants.clone(),
        }
        .run()
        .unwrap();

        let bracket = super::generate(&participants).unwrap();
        assert_eq!(bracket.status, TournamentStatus::InProgress);
        write_json(&path, &bracket);

        Command::Standings {
            bracket: path.clone(),
        }
        .run()
        .unwrap();
        assert_eq!(standings(&path).unwrap(), vec![]);

        Command::Advance {
            bracket: path.clone(),
            round: 1,
            position: 0,
            winner: "a".to_owned(),
        }
        .run()
        .unwrap();

        let output = advance(&path, 1, 0, "a").unwrap();
        assert_eq!(output.bracket.status, TournamentStatus::Completed);
        assert_eq!(output.advancement.status, Some(TournamentStatus::Completed));
        write_json(&path, &output.bracket);

        assert_eq!(
            standings(&path).unwrap(),
            vec![
                Placement::new("a".to_owned(), 1),
                Placement::new("b".to_owned(), 2),
            ]
        );

        // The stored match already has a winner.
        let err = Command::Advance {
            bracket: path.clone(),
            round: 1,
            position: 0,
            winner: "b".to_owned(),
        }
        .run()
        .unwrap_err();

        assert!(
            matches!(
                err,
                Error::Bracket(sporttek_core::Error::WinnerAlreadySet {
                    round: 1,
                    position: 0
                })
            ),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn test_bracket_command_run_missing_file() {
        let temp = TempDir::new().unwrap();

        let err = Command::Standings {
            bracket: temp.path().join("missing.json"),
        }
        .run()
        .unwrap_err();

        assert!(matches!(err, Error::Io(_)), "unexpected error: {}", err);
    }
}
