//! Remote store port (driven/secondary port)
//!
//! This module defines the interface for the remote file store. The store
//! is reached through an asynchronous request/response transport; there
//! are no server-pushed events, so callers observe it by polling. The
//! trait is constructed once per session and injected wherever it is
//! needed - nothing references it ambiently.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are
//!   adapter-specific and don't need domain-level classification.
//! - Content is addressed by [`ContentHash`] wherever possible; an entry
//!   without a hash has nothing durably stored to address.
//! - `find_files` and `get_favorite_folders` return fresh snapshots that
//!   callers replace wholesale; nothing returned here is kept
//!   authoritative on the client side.

use serde::{Deserialize, Serialize};

use crate::domain::{ContentHash, EntryId, EntryKind, FavoriteFolder, FileEntry, RemotePath};

/// Payload for importing an externally-dropped file
///
/// This is a port-level DTO describing a file that still lives on the
/// host filesystem; the store reads the bytes from `system_path` and
/// creates the entry under `path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFile {
    /// Entry name to create
    pub name: String,
    /// Absolute host-filesystem location of the dropped file
    pub system_path: String,
    /// Destination parent path in the remote tree
    pub path: RemotePath,
    /// Declared content type of the file
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Size in bytes
    pub size: u64,
}

/// Port trait for all remote store operations
///
/// ## Implementation Notes
///
/// - Calls suspend the caller without blocking other concurrent
///   operations; the transport owns timeout handling.
/// - The client issues no explicit cancellation for in-flight calls.
#[async_trait::async_trait]
pub trait IRemoteStore: Send + Sync {
    /// Returns whether the network client is connected and usable
    async fn is_client_connected(&self) -> anyhow::Result<bool>;

    /// Lists the entries directly under `path`
    ///
    /// Well-known paths are valid arguments; the store decides which
    /// listing source backs them.
    async fn find_files(&self, path: &RemotePath) -> anyhow::Result<Vec<FileEntry>>;

    /// Returns the favorite folders, in insertion order
    async fn get_favorite_folders(&self) -> anyhow::Result<Vec<FavoriteFolder>>;

    /// Adds the folder with `id` to the favorites set
    async fn set_folder_favorite(&self, id: &EntryId) -> anyhow::Result<()>;

    /// Removes the folder with `id` from the favorites set
    async fn remove_folder_favorite(&self, id: &EntryId) -> anyhow::Result<()>;

    /// Creates a file entry from a host-filesystem source
    async fn create_file(&self, file: &NewFile) -> anyhow::Result<()>;

    /// Creates an empty folder named `name` under `path`
    async fn create_folder(&self, name: &str, path: &RemotePath) -> anyhow::Result<()>;

    /// Opens the content identified by `hash` with the host's default handler
    async fn open_file(&self, hash: &ContentHash) -> anyhow::Result<()>;

    /// Fetches the content identified by `hash` into the local cache
    async fn fetch_file(&self, hash: &ContentHash) -> anyhow::Result<()>;

    /// Removes the locally-cached copy of the content identified by `hash`
    ///
    /// Remote status is unaffected.
    async fn delete_file_locally(&self, hash: &ContentHash) -> anyhow::Result<()>;

    /// Deletes the remotely-stored content identified by `hash`
    async fn delete_file(&self, hash: &ContentHash) -> anyhow::Result<()>;

    /// Removes all locally-cached content
    async fn clear_cache(&self) -> anyhow::Result<()>;

    /// Shares the content identified by `hash` with another client
    ///
    /// Returns the store's result message, if it produced one.
    async fn share_file(
        &self,
        hash: &ContentHash,
        recipient_address: &str,
    ) -> anyhow::Result<Option<String>>;
}
