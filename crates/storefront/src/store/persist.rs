//! JSON-file persistence for the entity store.
//!
//! Every mutation rewrites the affected collection's file wholesale. The
//! in-memory state stays authoritative while the process lives; the files
//! only become the source of truth again at the next startup. Writes settle
//! asynchronously when a runtime is present (the caller does not wait on the
//! disk), and inline otherwise so the CLI and plain tests see files
//! immediately. Write failures are logged, never surfaced, and never retried.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Products collection file.
pub const PRODUCTS_FILE: &str = "products.json";
/// Users collection file (credentials stripped before write).
pub const USERS_FILE: &str = "users.json";
/// Ratings file, keyed by product ID.
pub const RATINGS_FILE: &str = "ratings.json";
/// Wishlists file, keyed by user ID.
pub const WISHLISTS_FILE: &str = "wishlists.json";
/// Giveaway entries file.
pub const GIVEAWAYS_FILE: &str = "giveaways.json";
/// Session records file, keyed by session ID.
pub const SESSIONS_FILE: &str = "sessions.json";

/// Errors that can occur while rehydrating the store from disk.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The data directory or a data file could not be read or created.
    #[error("data directory I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A data file exists but does not parse.
    #[error("corrupt data file {file}: {source}")]
    Decode {
        /// File name within the data directory.
        file: String,
        /// Underlying parse error.
        source: serde_json::Error,
    },
}

/// Load a collection file, returning the collection's default (empty) value
/// when the file does not exist yet.
///
/// # Errors
///
/// Returns [`PersistError`] if the file cannot be read or does not parse.
pub fn load_collection<T>(dir: &Path, file: &str) -> Result<T, PersistError>
where
    T: DeserializeOwned + Default,
{
    let path = dir.join(file);
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(PersistError::Io(e)),
    };

    serde_json::from_slice(&bytes).map_err(|source| PersistError::Decode {
        file: file.to_owned(),
        source,
    })
}

/// Serialize a collection for its data file, logging (and swallowing) any
/// encoding failure.
pub fn encode<T: Serialize>(file: &str, value: &T) -> Option<Vec<u8>> {
    match serde_json::to_vec_pretty(value) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::error!(file, error = %e, "failed to encode collection");
            None
        }
    }
}

/// Write a collection file.
///
/// On a runtime the write is spawned and settles after the caller returns;
/// without one (CLI teardown, plain `#[test]`) it happens inline. Either
/// way failures are logged and the in-memory state remains authoritative.
pub fn write_collection(dir: &Path, file: &str, bytes: Vec<u8>) {
    let path: PathBuf = dir.join(file);

    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                if let Err(e) = tokio::fs::write(&path, &bytes).await {
                    tracing::error!(file = %path.display(), error = %e, "failed to persist collection");
                }
            });
        }
        Err(_) => {
            if let Err(e) = std::fs::write(&path, &bytes) {
                tracing::error!(file = %path.display(), error = %e, "failed to persist collection");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gift-grove-persist-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_missing_file_yields_default() {
        let dir = temp_dir();
        let loaded: Vec<String> = load_collection(&dir, "nothing.json").unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_write_then_load_roundtrip() {
        let dir = temp_dir();
        let mut value = BTreeMap::new();
        value.insert(1_i64, "one".to_owned());
        value.insert(2_i64, "two".to_owned());

        let bytes = encode("numbers.json", &value).unwrap();
        // No runtime in a plain #[test], so the write happens inline.
        write_collection(&dir, "numbers.json", bytes);

        let loaded: BTreeMap<i64, String> = load_collection(&dir, "numbers.json").unwrap();
        assert_eq!(loaded, value);
    }

    #[test]
    fn test_load_corrupt_file_is_an_error() {
        let dir = temp_dir();
        std::fs::write(dir.join("bad.json"), b"{not json").unwrap();

        let result: Result<Vec<String>, _> = load_collection(&dir, "bad.json");
        assert!(matches!(result, Err(PersistError::Decode { .. })));
    }
}
