//! Update mode.
//!
//! Refreshing already-downloaded files has no defined behaviour yet, so this
//! entry point refuses instead of guessing at incremental semantics.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("update mode is not implemented (download dir: {})", directory.display())]
    NotImplemented { directory: PathBuf },
}

pub fn update_symbols(directory: &Path) -> Result<(), UpdateError> {
    Err(UpdateError::NotImplemented {
        directory: directory.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_is_refused() {
        let err = update_symbols(Path::new("data")).unwrap_err();
        assert!(err.to_string().contains("not implemented"));
    }
}
