//! Download configuration, loadable from TOML.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```toml
//! market_suffix = ".ss"
//! threads = 8
//! download_dir = "data/csv"
//! ```

use crate::data::yahoo::SYMBOL_PLACEHOLDER;
use crate::symbols::DEFAULT_MAX_SYMBOL;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_URL_TEMPLATE: &str = "http://ichart.finance.yahoo.com/table.csv?s={symbol}";
pub const DEFAULT_MARKET_SUFFIX: &str = ".hk";
pub const DEFAULT_THREADS: NonZeroUsize = match NonZeroUsize::new(4) {
    Some(n) => n,
    None => panic!("default thread count must be non-zero"),
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request URL with a `{symbol}` placeholder.
    pub url_template: String,
    /// Appended to each symbol in the request only, never in the filename.
    pub market_suffix: String,
    /// Upper bound of the generated symbol range.
    pub max_symbol: u32,
    /// Worker count for multi-threaded downloads.
    pub threads: NonZeroUsize,
    pub download_dir: PathBuf,
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            market_suffix: DEFAULT_MARKET_SUFFIX.to_string(),
            max_symbol: DEFAULT_MAX_SYMBOL,
            threads: DEFAULT_THREADS,
            download_dir: PathBuf::from("."),
            user_agent: None,
        }
    }
}

impl FetchConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FetchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.url_template.contains(SYMBOL_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "url_template '{}' has no {SYMBOL_PLACEHOLDER} placeholder",
                self.url_template
            )));
        }
        Ok(())
    }
}
