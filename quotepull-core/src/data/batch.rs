//! Batch runner: split the symbol list into contiguous chunks and download
//! each chunk on its own worker.
//!
//! Multi-worker batches run on a private rayon pool sized to the worker count
//! and built fresh per batch (never the global pool). Each worker owns its
//! chunk's failure list and hands back a `DownloadSummary`; the join step
//! merges them in chunk order.

use super::download::{download_with_retry, DownloadSummary};
use super::provider::SymbolFetcher;
use rayon::prelude::*;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Setup failures. Per-symbol failures never surface here.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to create download dir {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Split `symbols` into exactly `workers` contiguous chunks.
///
/// Every chunk but the last holds `n / workers` symbols; the last chunk takes
/// the remainder. With fewer symbols than workers the leading chunks are empty.
pub fn partition(symbols: &[String], workers: NonZeroUsize) -> Vec<&[String]> {
    let workers = workers.get();
    let per_worker = symbols.len() / workers;

    let mut chunks: Vec<&[String]> = (0..workers - 1)
        .map(|i| &symbols[i * per_worker..(i + 1) * per_worker])
        .collect();
    chunks.push(&symbols[(workers - 1) * per_worker..]);
    chunks
}

/// Create the download directory. An existing directory is fine.
pub fn ensure_dir(dir: &Path) -> Result<(), BatchError> {
    std::fs::create_dir_all(dir).map_err(|source| BatchError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Single-worker batch: one chunk covering the whole list.
pub fn run_single(
    fetcher: &dyn SymbolFetcher,
    dir: &Path,
    symbols: &[String],
) -> Result<DownloadSummary, BatchError> {
    ensure_dir(dir)?;
    info!(
        fetcher = fetcher.name(),
        symbols = symbols.len(),
        dir = %dir.display(),
        "starting single-threaded download"
    );

    let summary = download_with_retry(fetcher, dir, symbols);
    info!(total = summary.total, "download finished");
    Ok(summary)
}

/// Download `symbols` across `workers` chunks and block until every chunk is
/// done. Final failures are reported in the summary, never as an error.
pub fn run_batch(
    fetcher: &dyn SymbolFetcher,
    dir: &Path,
    symbols: &[String],
    workers: NonZeroUsize,
) -> Result<DownloadSummary, BatchError> {
    if workers.get() == 1 {
        return run_single(fetcher, dir, symbols);
    }

    ensure_dir(dir)?;
    info!(
        fetcher = fetcher.name(),
        symbols = symbols.len(),
        workers = workers.get(),
        dir = %dir.display(),
        "starting multi-threaded download"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.get())
        .thread_name(|i| format!("quotepull-worker-{i}"))
        .build()?;

    let chunks = partition(symbols, workers);

    // with_max_len(1): every chunk is its own rayon job.
    let outcomes: Vec<DownloadSummary> = pool.install(|| {
        chunks
            .into_par_iter()
            .with_max_len(1)
            .enumerate()
            .map(|(worker, chunk)| {
                debug!(worker, len = chunk.len(), "chunk started");
                download_with_retry(fetcher, dir, chunk)
            })
            .collect()
    });

    let summary = outcomes
        .into_iter()
        .fold(DownloadSummary::default(), |mut acc, chunk| {
            acc.merge(chunk);
            acc
        });

    info!(total = summary.total, "download finished");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::super::download::testing::ScriptedFetcher;
    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn numbered(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("{i:04}")).collect()
    }

    #[test]
    fn last_chunk_absorbs_remainder() {
        let symbols = numbered(10);
        let chunks = partition(&symbols, nz(4));
        let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![2, 2, 2, 4]);
        assert_eq!(chunks[3][0], "0007");
    }

    #[test]
    fn even_split() {
        let symbols = numbered(8);
        let sizes: Vec<usize> = partition(&symbols, nz(4)).iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![2, 2, 2, 2]);
    }

    #[test]
    fn fewer_symbols_than_workers() {
        let symbols = numbered(3);
        let chunks = partition(&symbols, nz(5));
        assert_eq!(chunks.len(), 5);
        assert!(chunks[..4].iter().all(|c| c.is_empty()));
        assert_eq!(chunks[4], &symbols[..]);
    }

    #[test]
    fn single_worker_gets_everything() {
        let symbols = numbered(7);
        let chunks = partition(&symbols, nz(1));
        assert_eq!(chunks, vec![&symbols[..]]);
    }

    #[test]
    fn empty_list() {
        let chunks = partition(&[], nz(3));
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.is_empty()));
    }

    #[test]
    fn multi_worker_fetches_each_symbol_once() {
        let dir = tempfile::tempdir().unwrap();
        let symbols = numbered(23);
        let f = ScriptedFetcher::default();

        let summary = run_batch(&f, dir.path(), &symbols, nz(4)).unwrap();

        let mut calls = f.calls();
        calls.sort();
        assert_eq!(calls, symbols);
        assert_eq!(summary.total, 23);
        assert!(summary.all_succeeded());
    }

    #[test]
    fn retries_are_per_chunk_and_merged_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let symbols = numbered(9);
        // chunks: [0001..0003] [0004..0006] [0007..0009]
        let f = ScriptedFetcher::failing(&[("0008", 1), ("0002", usize::MAX)]);

        let summary = run_batch(&f, dir.path(), &symbols, nz(3)).unwrap();

        assert_eq!(f.attempts("0002"), 2);
        assert_eq!(f.attempts("0008"), 2);
        assert_eq!(summary.first_pass_failed, vec!["0002", "0008"]);
        assert_eq!(summary.unresolved, vec!["0002"]);
    }

    #[test]
    fn creates_missing_nested_dir() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("a").join("b");
        let f = ScriptedFetcher::default();

        run_batch(&f, &dir, &numbered(2), nz(2)).unwrap();
        assert!(dir.is_dir());

        // second run over an existing dir is not an error
        run_single(&f, &dir, &numbered(2)).unwrap();
    }

    #[test]
    fn dir_blocked_by_file_is_fatal() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("taken");
        std::fs::write(&blocker, b"x").unwrap();
        let f = ScriptedFetcher::default();

        let err = run_batch(&f, &blocker.join("sub"), &numbered(2), nz(2)).unwrap_err();
        assert!(matches!(err, BatchError::CreateDir { .. }));
        assert!(f.calls().is_empty());
    }
}
