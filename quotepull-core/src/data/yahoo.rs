//! Yahoo Finance CSV fetcher.
//!
//! Issues one GET per symbol against a table-download endpoint and writes the
//! body verbatim. No parsing, no internal retries: the download layer owns the
//! retry policy.
//!
//! The body is streamed into a per-attempt temp file next to the target and
//! renamed into place, so a failed attempt never leaves a truncated
//! `{symbol}.csv` behind.

use super::provider::{csv_path, FetchError, SymbolFetcher};
use crate::config::FetchConfig;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Placeholder replaced by the suffixed symbol in the URL template.
pub const SYMBOL_PLACEHOLDER: &str = "{symbol}";

const COPY_BUF_LEN: usize = 64 * 1024;

/// Fetches `table.csv` style downloads over blocking HTTP.
pub struct YahooFetcher {
    client: reqwest::blocking::Client,
    url_template: String,
    market_suffix: String,
}

impl YahooFetcher {
    /// Build a fetcher with the client's default timeout and redirect policy.
    pub fn new(
        url_template: impl Into<String>,
        market_suffix: impl Into<String>,
        user_agent: Option<&str>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(ua) = user_agent {
            builder = builder.user_agent(ua);
        }

        Ok(Self {
            client: builder.build()?,
            url_template: url_template.into(),
            market_suffix: market_suffix.into(),
        })
    }

    pub fn from_config(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.url_template.as_str(),
            config.market_suffix.as_str(),
            config.user_agent.as_deref(),
        )
    }

    /// Request URL for a symbol: the template with `{symbol}` replaced by
    /// the symbol plus the market suffix (e.g. `0700` -> `0700.hk`).
    pub fn symbol_url(&self, symbol: &str) -> String {
        let query_symbol = format!("{symbol}{}", self.market_suffix);
        self.url_template.replace(SYMBOL_PLACEHOLDER, &query_symbol)
    }

    fn download(&self, url: &str, dir: &Path, symbol: &str) -> Result<u64, FetchError> {
        let transport = |e: &dyn std::fmt::Display| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let mut resp = self.client.get(url).send().map_err(|e| transport(&e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        // Unique per attempt, so concurrent fetches of one symbol never share
        // a temp file. Dropping it on any error path deletes it.
        let prefix = format!(".{symbol}.");
        let mut tmp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".csv.tmp")
            .tempfile_in(dir)
            .map_err(|e| FetchError::io(dir, e))?;
        let tmp_path = tmp.path().to_path_buf();

        let mut buf = vec![0u8; COPY_BUF_LEN];
        let mut written: u64 = 0;
        loop {
            let n = resp.read(&mut buf).map_err(|e| transport(&e))?;
            if n == 0 {
                break;
            }
            tmp.write_all(&buf[..n]).map_err(|e| FetchError::io(&tmp_path, e))?;
            written += n as u64;
        }
        tmp.flush().map_err(|e| FetchError::io(&tmp_path, e))?;

        // Atomic rename
        let dest = csv_path(dir, symbol);
        tmp.persist(&dest).map_err(|e| FetchError::io(&dest, e.error))?;

        Ok(written)
    }
}

impl SymbolFetcher for YahooFetcher {
    fn name(&self) -> &str {
        "yahoo_csv"
    }

    fn fetch(&self, symbol: &str, dir: &Path) -> Result<(), FetchError> {
        let url = self.symbol_url(symbol);

        match self.download(&url, dir, symbol) {
            Ok(bytes) => {
                debug!(symbol, bytes, dir = %dir.display(), "saved");
                Ok(())
            }
            Err(e) => {
                warn!(symbol, url = %url, error = %e, "unable to fetch data");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(template: &str, suffix: &str) -> YahooFetcher {
        YahooFetcher::new(template, suffix, None).unwrap()
    }

    #[test]
    fn url_appends_market_suffix() {
        let f = fetcher("http://host/table.csv?s={symbol}", ".hk");
        assert_eq!(f.symbol_url("0001"), "http://host/table.csv?s=0001.hk");
    }

    #[test]
    fn url_without_suffix() {
        let f = fetcher("http://host/{symbol}/daily.csv", "");
        assert_eq!(f.symbol_url("SPY"), "http://host/SPY/daily.csv");
    }

    #[test]
    fn url_from_default_config() {
        let f = YahooFetcher::from_config(&FetchConfig::default()).unwrap();
        assert_eq!(
            f.symbol_url("0700"),
            "http://ichart.finance.yahoo.com/table.csv?s=0700.hk"
        );
    }
}
