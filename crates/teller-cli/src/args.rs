//! Command-line arguments.

use std::path::PathBuf;

use teller_core::{BranchBuilder, ConfigError, SelectorKind};

pub const USAGE: &str = "\
usage:
  teller-cli [repl] [--tellers N] [--selector lazy|indexed]
  teller-cli simulate [--config PATH]
  teller-cli help";

#[derive(Debug, thiserror::Error)]
pub enum ArgsError {
    #[error("unknown argument {0:?}")]
    Unknown(String),

    #[error("{0} expects a value")]
    MissingValue(&'static str),

    #[error("--tellers expects a positive number, got {0:?}")]
    BadTellers(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone)]
pub enum Command {
    Help,
    Repl(BranchBuilder),
    Simulate { config: Option<PathBuf> },
}

impl Command {
    pub fn parse() -> Result<Self, ArgsError> {
        Self::parse_from(std::env::args().skip(1))
    }

    pub fn parse_from(args: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut args = args.into_iter().peekable();

        match args.peek().map(String::as_str) {
            Some("-h" | "--help" | "help") => Ok(Self::Help),
            Some("simulate") => {
                args.next();
                parse_simulate(args)
            }
            Some("repl") => {
                args.next();
                parse_repl(args)
            }
            _ => parse_repl(args),
        }
    }
}

fn parse_repl(mut args: impl Iterator<Item = String>) -> Result<Command, ArgsError> {
    let mut builder = BranchBuilder::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--tellers" => {
                let raw = args.next().ok_or(ArgsError::MissingValue("--tellers"))?;
                let tellers = raw
                    .parse::<usize>()
                    .ok()
                    .filter(|&n| n > 0)
                    .ok_or(ArgsError::BadTellers(raw))?;
                builder = builder.tellers(tellers);
            }
            "--selector" => {
                let raw = args.next().ok_or(ArgsError::MissingValue("--selector"))?;
                builder = builder.selector(raw.parse::<SelectorKind>()?);
            }
            _ => return Err(ArgsError::Unknown(arg)),
        }
    }
    Ok(Command::Repl(builder))
}

fn parse_simulate(mut args: impl Iterator<Item = String>) -> Result<Command, ArgsError> {
    let mut config = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or(ArgsError::MissingValue("--config"))?;
                config = Some(PathBuf::from(path));
            }
            _ => return Err(ArgsError::Unknown(arg)),
        }
    }
    Ok(Command::Simulate { config })
}
