use std::path::PathBuf;

use thiserror::Error;

use crate::models::store::Store;

pub mod json;
pub mod memory;
pub mod migrations;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to load store from '{path}': {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON from '{path}': {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to save store to '{path}': {source}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize store to JSON: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to create backup at '{path}': {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to cleanup old backups in '{dir}': {source}")]
    CleanupFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store file has a malformed version field: {0}")]
    MalformedVersion(String),

    #[error("Migration from version {version} failed: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error(
        "Store file was created by a newer version of organazr (version {0}). Please upgrade to open this file."
    )]
    FutureVersion(u32),

    #[error("Store file has unsupported version {0}. This version of organazr cannot read this file.")]
    UnsupportedVersion(u32),

    #[error("Save rejected by in-memory storage")]
    Rejected,
}

/// The durable side of the store: everything is loaded at once and every
/// logical mutation is committed with a single `save`.
pub trait Storage {
    fn load(&self) -> Result<Store, StorageError>;
    fn save(&self, store: &Store) -> Result<(), StorageError>;
}
