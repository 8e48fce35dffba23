//! quotepull core: symbol sources, CSV fetcher, chunked batch downloads.
//!
//! - Symbol lists from a generated `0001..NNNN` range or a text file
//! - `SymbolFetcher` trait with a blocking-HTTP Yahoo implementation
//! - Two-pass download (one retry over first-pass failures) per chunk
//! - Batch runner that fans contiguous chunks out over a private worker pool

pub mod config;
pub mod data;
pub mod symbols;

pub use config::{ConfigError, FetchConfig};
pub use data::{
    run_batch, run_single, update_symbols, BatchError, DownloadSummary, FetchError,
    SymbolFetcher, UpdateError, YahooFetcher,
};
pub use symbols::{SymbolError, SymbolSource};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything handed to worker threads is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<YahooFetcher>();
        require_sync::<YahooFetcher>();
        require_send::<DownloadSummary>();
        require_sync::<DownloadSummary>();
        require_send::<FetchError>();
        require_sync::<FetchError>();
        require_send::<FetchConfig>();
        require_sync::<FetchConfig>();
    }
}
