//! CLI wiring: read the rule mapping from an input stream, run the mine,
//! render the affected-rules report.

pub mod input;

pub use input::{read_rules, InputError};

use crate::api::{mine, MineConfig, MineError};
use crate::symbol::SymbolStore;
use std::fmt;
use std::io::{Read, Write};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

/// Errors surfaced by the CLI entry point.
#[derive(Debug)]
pub enum CliError {
    Input(InputError),
    Mine(MineError),
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Input(e) => write!(f, "{}", e),
            CliError::Mine(e) => write!(f, "{}", e),
            CliError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<InputError> for CliError {
    fn from(e: InputError) -> Self {
        CliError::Input(e)
    }
}

impl From<MineError> for CliError {
    fn from(e: MineError) -> Self {
        CliError::Mine(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

/// Read rules from `reader`, mine them, write the report to `writer`.
pub fn run<R: Read, W: Write>(
    reader: R,
    mut writer: W,
    mode: OutputMode,
    config: &MineConfig,
) -> Result<(), CliError> {
    let rules = read_rules(reader)?;

    if mode == OutputMode::Text {
        writeln!(writer, "viable rule count: {}", rules.len())?;
    }

    let symbols = SymbolStore::new();
    let report = mine(rules, &symbols, config)?.resolve(&symbols);

    match mode {
        OutputMode::Text => write!(writer, "{}", report)?,
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut writer, &report)
                .map_err(|e| CliError::Io(e.into()))?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
