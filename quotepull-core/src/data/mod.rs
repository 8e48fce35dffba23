//! Fetching, retrying and batching symbol downloads

pub mod batch;
pub mod download;
pub mod provider;
pub mod update;
pub mod yahoo;

pub use batch::{ensure_dir, partition, run_batch, run_single, BatchError};
pub use download::{download_with_retry, DownloadSummary};
pub use provider::{csv_path, FetchError, SymbolFetcher};
pub use update::{update_symbols, UpdateError};
pub use yahoo::YahooFetcher;
