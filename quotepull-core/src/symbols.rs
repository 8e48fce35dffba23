//! Symbol sources: generated numeric ranges or plain-text symbol lists.
//!
//! The generated range covers exchange codes `0001..=upper`, zero-padded to
//! four digits. List files hold one symbol per line; surrounding whitespace
//! is trimmed, blank lines are skipped, order and duplicates are kept.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Upper bound of the generated range when none is configured.
pub const DEFAULT_MAX_SYMBOL: u32 = 8356;

#[derive(Debug, Error)]
pub enum SymbolError {
    #[error("read symbol file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the symbol list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolSource {
    /// `0001` through `upper`, ascending.
    Generated { upper: u32 },
    /// One symbol per line.
    File(PathBuf),
}

impl SymbolSource {
    /// File mode when a path is given, otherwise the generated range.
    pub fn from_args(file: Option<PathBuf>, upper: u32) -> Self {
        match file {
            Some(path) => SymbolSource::File(path),
            None => SymbolSource::Generated { upper },
        }
    }

    pub fn load(&self) -> Result<Vec<String>, SymbolError> {
        match self {
            SymbolSource::Generated { upper } => Ok(generate_symbols(*upper)),
            SymbolSource::File(path) => read_symbols(path),
        }
    }
}

/// `["0001", "0002", ..., upper]`. Widths grow past four digits above 9999.
pub fn generate_symbols(upper: u32) -> Vec<String> {
    (1..=upper).map(|i| format!("{i:04}")).collect()
}

/// Load a symbol list from a file.
pub fn read_symbols(path: &Path) -> Result<Vec<String>, SymbolError> {
    let content = std::fs::read_to_string(path).map_err(|source| SymbolError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_symbols(&content))
}

/// Parse a symbol list: trimmed, non-blank lines in file order.
pub fn parse_symbols(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
