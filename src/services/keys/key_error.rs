use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyError {
    /// The key material is not a PEM encoded RSA key. Never retried automatically.
    #[error("unable to parse PEM for key id {key_id}: {reason}")]
    Parse { key_id: String, reason: String },

    /// The key directory or one of its files could not be read.
    #[error("unable to read keys from {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("key reload task did not complete: {0}")]
    ReloadTask(#[from] tokio::task::JoinError),
}

impl KeyError {
    pub(crate) fn parse(key_id: &str, reason: impl Display) -> Self {
        KeyError::Parse {
            key_id: key_id.to_owned(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        KeyError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
