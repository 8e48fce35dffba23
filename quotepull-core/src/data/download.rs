//! Sequential download with a single retry pass.
//!
//! First pass fetches every symbol in order and collects failures. Second pass
//! fetches each failure exactly once, in the same relative order. Whatever
//! still fails is recorded as unresolved and otherwise dropped.

use super::provider::SymbolFetcher;
use std::path::Path;
use tracing::debug;

/// Outcome of a chunk (or a merged batch) of downloads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub total: usize,
    /// Symbols that failed the first pass, in list order.
    pub first_pass_failed: Vec<String>,
    /// Symbols that also failed the retry pass.
    pub unresolved: Vec<String>,
}

impl DownloadSummary {
    pub fn succeeded(&self) -> usize {
        self.total - self.unresolved.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Fold another chunk's outcome into this one. Chunks are merged in
    /// partition order, so list order is preserved across the batch.
    pub fn merge(&mut self, other: DownloadSummary) {
        self.total += other.total;
        self.first_pass_failed.extend(other.first_pass_failed);
        self.unresolved.extend(other.unresolved);
    }
}

/// One pass over `symbols`; returns the ones that failed.
fn fetch_pass(fetcher: &dyn SymbolFetcher, dir: &Path, symbols: &[String]) -> Vec<String> {
    symbols
        .iter()
        .filter(|symbol| fetcher.fetch(symbol, dir).is_err())
        .cloned()
        .collect()
}

/// Download every symbol in `symbols`, then retry the failures once.
///
/// `dir` must already exist.
pub fn download_with_retry(
    fetcher: &dyn SymbolFetcher,
    dir: &Path,
    symbols: &[String],
) -> DownloadSummary {
    let first_pass_failed = fetch_pass(fetcher, dir, symbols);

    let unresolved = if first_pass_failed.is_empty() {
        Vec::new()
    } else {
        debug!(count = first_pass_failed.len(), "retrying failed symbols");
        fetch_pass(fetcher, dir, &first_pass_failed)
    };

    DownloadSummary {
        total: symbols.len(),
        first_pass_failed,
        unresolved,
    }
}
