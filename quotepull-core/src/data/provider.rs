//! Fetcher trait and structured error types.
//!
//! The SymbolFetcher trait abstracts over where a symbol's CSV comes from
//! (the Yahoo HTTP endpoint in production, a scripted fetcher in tests) so the
//! retry and batch logic never touches the network directly.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a single fetch attempt failed.
///
/// Every variant is treated the same by the retry logic: record, retry once,
/// then drop. The variants only shape the diagnostic message.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("write to {} failed: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Trait for anything that can turn a symbol into `<dir>/<symbol>.csv`.
///
/// Implementations must not create `dir`; the batch runner does that once
/// before any fetch starts.
pub trait SymbolFetcher: Send + Sync {
    /// Human-readable name of this fetcher.
    fn name(&self) -> &str;

    /// Fetch one symbol and write its CSV into `dir`.
    fn fetch(&self, symbol: &str, dir: &Path) -> Result<(), FetchError>;
}

/// Output path for a symbol: `{dir}/{symbol}.csv`.
pub fn csv_path(dir: &Path, symbol: &str) -> PathBuf {
    dir.join(format!("{symbol}.csv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_path_uses_bare_symbol() {
        let p = csv_path(Path::new("out"), "0700");
        assert_eq!(p, Path::new("out").join("0700.csv"));
    }

    #[test]
    fn status_error_mentions_url() {
        let e = FetchError::Status {
            status: 404,
            url: "http://example.test/x".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("http://example.test/x"));
    }
}
