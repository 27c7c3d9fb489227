use std::env;
use std::fs;
use std::io;
use std::path::Path;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use sporttek_core::EloOptions;
use thiserror::Error;

macro_rules! from_environment {
    ($config:expr, $($key:expr, $name:tt),*$(,)?) => {{
        $(
            {
                if let Ok(value) = env::var($key) {
                    $config.$name = value
                        .parse()
                        .map_err(|_| ConfigError::InvalidEnvironment { key: $key, value })?;
                }
            }
        )*
    }};
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loglevel: LevelFilter,
    pub elo: EloOptions,
}

impl Config {
    pub fn from_file<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let buf = fs::read_to_string(path)?;

        Ok(toml::from_str(&buf)?)
    }

    /// Reads the config at `path` and applies the environment on top of it. A missing file is
    /// not an error, the defaults are used instead.
    pub fn load<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let this = match Self::from_file(path) {
            Ok(this) => this,
            Err(ConfigError::Io(err)) if err.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(err) => return Err(err),
        };

        this.with_environment()
    }

    /// Overrides values with the `ST_*` environment variables that are set.
    pub fn with_environment(mut self) -> Result<Self, ConfigError> {
        from_environment!(self, "ST_LOGLEVEL", loglevel);
        from_environment!(
            self.elo,
            "ST_ELO_PROVISIONAL_K",
            provisional_k,
            "ST_ELO_ESTABLISHED_K",
            established_k,
            "ST_ELO_PROVISIONAL_MATCHES",
            provisional_matches,
        );

        Ok(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: LevelFilter::Warn,
            elo: EloOptions::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error("invalid value for {key}: {value:?}")]
    InvalidEnvironment { key: &'static str, value: String },
}
