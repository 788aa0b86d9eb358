//! Errors surfaced by the `flowfield` binary and the exit code of each.
//!
//! | code | variant | typical cause |
//! |---|---|---|
//! | 2 | (clap) | unknown flag or subcommand, rejected before `run` |
//! | 10 | `Engine` | unknown engine, rejected param, plane or resolution |
//! | 11 | `Io` | seed file unreadable, snapshot path unwritable |
//! | 12 | `Input` | `--params` not a JSON object, malformed seed file |
//! | 13 | `Serialization` | stdout summary could not be encoded |

use flowfield_core::EngineError;
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    /// The engine refused to build or step.
    Engine(EngineError),
    /// Reading the seed file or writing the snapshot failed.
    Io(String),
    /// What the user typed or pointed at could not be parsed into a run.
    Input(String),
    /// Encoding `--json` output failed.
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }

    /// True when the run was rejected before any simulation work, so
    /// retrying with the same arguments cannot succeed.
    pub fn is_configuration(&self) -> bool {
        match self {
            CliError::Engine(e) => e.is_configuration(),
            CliError::Input(_) => true,
            CliError::Io(_) | CliError::Serialization(_) => false,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Engine(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "bad input: {msg}"),
            CliError::Serialization(msg) => write!(f, "could not encode output: {msg}"),
        }
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Io(msg) => CliError::Io(msg),
            EngineError::InvalidSeed(msg) => {
                CliError::Input(format!("invalid seed file: {msg}"))
            }
            other => CliError::Engine(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
