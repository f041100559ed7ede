// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Resilient JSON document store over an ordered list of candidate directories.
//!
//! Managed hosting may mount the working directory read-only, so each operation
//! walks a fallback chain: an explicitly configured directory, or else the local
//! `data/` directory followed by the platform temp directory. A candidate that
//! is missing, unwritable, or read-only is skipped; any other I/O error aborts.
//!
//! No locking is performed. Writers do read-modify-write on whole documents and
//! the last writer wins; write frequency (preference edits, admin grants) is low
//! enough that this is accepted.

use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;

/// Storage errors surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(
        "no candidate directory was writable for store '{store}' \
         (set DATA_DIR to an explicit writable directory): {source}"
    )]
    Unavailable {
        store: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error for store '{store}' at {path}: {source}")]
    Io {
        store: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize store '{store}': {source}")]
    Serialize {
        store: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of one attempt against one candidate directory.
enum Attempt {
    /// Expected-unusable candidate; move on to the next one.
    Skip(io::Error),
    /// Unexpected failure; abort the whole operation.
    Fatal(io::Error),
}

/// Classify an I/O error as skip-to-next-candidate or fatal.
fn classify(err: io::Error) -> Attempt {
    match err.kind() {
        io::ErrorKind::NotFound
        | io::ErrorKind::PermissionDenied
        | io::ErrorKind::ReadOnlyFilesystem => Attempt::Skip(err),
        _ => Attempt::Fatal(err),
    }
}

/// Generic JSON document store keyed by a logical store name.
///
/// Documents are stored as pretty-printed `<name>.json` files in the first
/// usable candidate directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    candidates: Vec<PathBuf>,
}

impl JsonStore {
    /// Build the candidate chain from the config.
    ///
    /// An explicit `DATA_DIR` is the sole candidate: when the operator names a
    /// directory, silently degrading to temp storage would hide misconfiguration.
    pub fn new(config: &Config) -> Self {
        let candidates = match &config.data_dir {
            Some(dir) => vec![dir.clone()],
            None => vec![
                PathBuf::from("data"),
                std::env::temp_dir().join("quantboard"),
            ],
        };
        Self { candidates }
    }

    /// Build a store over an explicit candidate list (tests).
    pub fn with_candidates(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    fn file_path(dir: &Path, store: &str) -> PathBuf {
        dir.join(format!("{store}.json"))
    }

    /// Read a document, returning `T::default()` when no candidate has data.
    ///
    /// The first candidate yielding a parseable file wins. A corrupt file is
    /// skipped like a missing one; a later candidate may still hold a good copy.
    pub async fn read<T>(&self, store: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        for dir in &self.candidates {
            let path = Self::file_path(dir, store);
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(err) => match classify(err) {
                    Attempt::Skip(err) => {
                        tracing::debug!(store, path = %path.display(), error = %err, "Skipping candidate on read");
                        continue;
                    }
                    Attempt::Fatal(err) => {
                        return Err(StoreError::Io {
                            store: store.to_string(),
                            path,
                            source: err,
                        });
                    }
                },
            };

            match serde_json::from_slice(&bytes) {
                Ok(doc) => return Ok(doc),
                Err(err) => {
                    tracing::warn!(store, path = %path.display(), error = %err, "Unparseable store file, trying next candidate");
                    continue;
                }
            }
        }

        Ok(T::default())
    }

    /// Write a document to the first candidate that accepts it.
    ///
    /// The file is replaced atomically (write to a sibling temp file, then
    /// rename) so readers never observe a half-written document.
    pub async fn write<T>(&self, store: &str, doc: &T) -> Result<(), StoreError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec_pretty(doc).map_err(|err| StoreError::Serialize {
            store: store.to_string(),
            source: err,
        })?;

        let mut last_skip: Option<io::Error> = None;

        for dir in &self.candidates {
            match self.try_write_dir(dir, store, &bytes).await {
                Ok(()) => return Ok(()),
                Err(Attempt::Skip(err)) => {
                    tracing::debug!(store, dir = %dir.display(), error = %err, "Skipping candidate on write");
                    last_skip = Some(err);
                }
                Err(Attempt::Fatal(err)) => {
                    return Err(StoreError::Io {
                        store: store.to_string(),
                        path: Self::file_path(dir, store),
                        source: err,
                    });
                }
            }
        }

        Err(StoreError::Unavailable {
            store: store.to_string(),
            source: last_skip
                .unwrap_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no candidates configured")),
        })
    }

    async fn try_write_dir(&self, dir: &Path, store: &str, bytes: &[u8]) -> Result<(), Attempt> {
        // create_dir_all is idempotent; AlreadyExists is success.
        if let Err(err) = tokio::fs::create_dir_all(dir).await {
            if err.kind() != io::ErrorKind::AlreadyExists {
                return Err(classify(err));
            }
        }

        let path = Self::file_path(dir, store);
        let tmp = dir.join(format!("{store}.json.tmp"));

        tokio::fs::write(&tmp, bytes).await.map_err(classify)?;
        tokio::fs::rename(&tmp, &path).await.map_err(classify)?;
        Ok(())
    }
}
