//! File entry domain entity
//!
//! This module defines the `FileEntry` entity, one node of the remotely
//! backed tree. Every entry the client holds is a cache snapshot with a
//! bounded freshness window - the listing poller replaces entries
//! wholesale on each successful refetch, so the entity carries no
//! mutation methods, only derivations.
//!
//! ## Remote status
//!
//! ```text
//!     ┌─────────┐   accepted    ┌─────────┐   durably stored   ┌────────┐
//!     │ Pending │ ────────────► │ Syncing │ ─────────────────► │ Stored │
//!     └─────────┘               └─────────┘                    └────────┘
//! ```
//!
//! The content hash is assigned once the store has durably accepted the
//! bytes; an entry without a hash cannot be opened, fetched, shared or
//! remotely deleted. Local availability (`temporary_local_path`) and the
//! fetch-in-progress flag are tracked independently of remote status.

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::path::RemotePath;

/// Stable identifier assigned by the remote store once an entry persists
///
/// Local-only entries that have not completed their first sync do not
/// have one yet; identity falls back to name + parent path until it is
/// assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Wraps a remote-assigned identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque content identifier assigned once content is durably stored
///
/// All fetch/open/delete/share calls address content by this hash. The
/// client never computes one; it only carries what the store assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Wraps a store-assigned content hash
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Returns the hash as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of a file entry: a folder, or content with a type tag
///
/// Modelled as a tagged variant rather than a class hierarchy; permitted
/// operations are derived from the kind through the capability predicates
/// on [`FileEntry`]. On the wire a folder is the literal string `FOLDER`
/// and anything else is a content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryKind {
    /// A navigable directory
    Folder,
    /// File content with its declared content type (e.g. `text/plain`)
    Content(String),
}

impl EntryKind {
    /// Returns true for folders
    pub fn is_folder(&self) -> bool {
        matches!(self, EntryKind::Folder)
    }
}

impl From<String> for EntryKind {
    fn from(s: String) -> Self {
        if s == "FOLDER" {
            EntryKind::Folder
        } else {
            EntryKind::Content(s)
        }
    }
}

impl From<EntryKind> for String {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Folder => "FOLDER".to_string(),
            EntryKind::Content(t) => t,
        }
    }
}

/// Remote sync status of an entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    /// Submitted but not yet accepted by the store
    #[default]
    Pending,
    /// Accepted, bytes still being stored
    Syncing,
    /// Durably stored
    Stored,
}

impl SyncStatus {
    /// Returns true while the entry has not been accepted by the store
    pub fn is_pending(&self) -> bool {
        matches!(self, SyncStatus::Pending)
    }
}

impl Display for SyncStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Pending => write!(f, "PENDING"),
            SyncStatus::Syncing => write!(f, "SYNCING"),
            SyncStatus::Stored => write!(f, "STORED"),
        }
    }
}

/// One node of the remote tree, as last reported by the store
///
/// A plain data snapshot: the listing poller replaces the whole
/// collection per resolution, so nothing here is mutated in place.
/// The capability predicates derive which operations the entry permits;
/// they are the only place that knowledge lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Remote identifier; None until the first sync completes
    #[serde(default)]
    pub id: Option<EntryId>,
    /// Entry name, unique (case-sensitive) within its parent path
    pub name: String,
    /// Parent directory path
    pub path: RemotePath,
    /// Folder or typed content
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Content size in bytes (0 for folders)
    #[serde(default)]
    pub size: u64,
    /// Content hash; None while the store has not durably accepted the bytes
    #[serde(default)]
    pub hash: Option<ContentHash>,
    /// Remote sync status (folders are implicitly stored)
    #[serde(default)]
    pub status: SyncStatus,
    /// Last modification timestamp reported by the store
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Local cache location; present iff the content has been fetched
    #[serde(default)]
    pub temporary_local_path: Option<String>,
    /// True only while a fetch-to-local-cache is in flight
    #[serde(default)]
    pub is_fetching: bool,
}

impl FileEntry {
    /// Creates a folder entry snapshot
    pub fn folder(name: impl Into<String>, path: RemotePath) -> Self {
        Self {
            id: None,
            name: name.into(),
            path,
            kind: EntryKind::Folder,
            size: 0,
            hash: None,
            status: SyncStatus::Stored,
            updated_at: None,
            temporary_local_path: None,
            is_fetching: false,
        }
    }

    /// Creates a content entry snapshot
    pub fn content(
        name: impl Into<String>,
        path: RemotePath,
        content_type: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            path,
            kind: EntryKind::Content(content_type.into()),
            size,
            hash: None,
            status: SyncStatus::Pending,
            updated_at: None,
            temporary_local_path: None,
            is_fetching: false,
        }
    }

    /// Returns true for folders
    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }

    // --- Capability predicates ---

    /// Any entry may be selected
    pub fn is_selectable(&self) -> bool {
        true
    }

    /// The local cached copy may be deleted: files with a cached copy only
    pub fn is_deletable_locally(&self) -> bool {
        !self.is_folder() && self.temporary_local_path.is_some()
    }

    /// The remote copy may be deleted: files the store has accepted
    ///
    /// An entry still pending has nothing durably stored to remove.
    pub fn is_removable_remotely(&self) -> bool {
        !self.is_folder() && !self.status.is_pending()
    }

    /// The content may be opened or fetched: requires an assigned hash
    pub fn is_openable(&self) -> bool {
        !self.is_folder() && self.hash.is_some()
    }

    /// The entry may be dragged out of the window
    ///
    /// Folders drag as favorite payloads; files only once their content
    /// is available in the local cache.
    pub fn is_draggable_out(&self) -> bool {
        self.is_folder() || self.temporary_local_path.is_some()
    }

    /// Returns true if `other` refers to the same remote node
    ///
    /// Compares ids when both entries have one; otherwise falls back to
    /// name + parent path, the identity of a not-yet-synced entry.
    pub fn same_entry(&self, other: &FileEntry) -> bool {
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self.name == other.name && self.path == other.path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_file(name: &str) -> FileEntry {
        FileEntry {
            id: Some(EntryId::new("e-1")),
            hash: Some(ContentHash::new("h-1")),
            status: SyncStatus::Stored,
            ..FileEntry::content(name, RemotePath::home(), "text/plain", 64)
        }
    }

    #[test]
    fn test_entry_kind_wire_format() {
        assert_eq!(EntryKind::from("FOLDER".to_string()), EntryKind::Folder);
        assert_eq!(
            EntryKind::from("text/plain".to_string()),
            EntryKind::Content("text/plain".to_string())
        );
        assert_eq!(String::from(EntryKind::Folder), "FOLDER");
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&SyncStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
        let back: SyncStatus = serde_json::from_str("\"STORED\"").unwrap();
        assert_eq!(back, SyncStatus::Stored);
    }

    #[test]
    fn test_every_entry_is_selectable() {
        assert!(FileEntry::folder("Docs", RemotePath::home()).is_selectable());
        assert!(stored_file("a.txt").is_selectable());
    }

    #[test]
    fn test_deletable_locally_requires_cached_file() {
        let mut file = stored_file("a.txt");
        assert!(!file.is_deletable_locally());

        file.temporary_local_path = Some("/tmp/veildrive/h-1".to_string());
        assert!(file.is_deletable_locally());

        let mut folder = FileEntry::folder("Docs", RemotePath::home());
        folder.temporary_local_path = Some("/tmp/veildrive/x".to_string());
        assert!(!folder.is_deletable_locally());
    }

    #[test]
    fn test_removable_remotely_excludes_pending_and_folders() {
        let mut file = stored_file("a.txt");
        assert!(file.is_removable_remotely());

        file.status = SyncStatus::Syncing;
        assert!(file.is_removable_remotely());

        file.status = SyncStatus::Pending;
        assert!(!file.is_removable_remotely());

        assert!(!FileEntry::folder("Docs", RemotePath::home()).is_removable_remotely());
    }

    #[test]
    fn test_openable_requires_hash() {
        let mut file = stored_file("a.txt");
        assert!(file.is_openable());

        file.hash = None;
        assert!(!file.is_openable());
    }

    #[test]
    fn test_fetching_without_local_path_is_tolerated() {
        // Fetch started but not finished: flag set, no cached path yet.
        let mut file = stored_file("a.txt");
        file.is_fetching = true;
        assert!(!file.is_deletable_locally());
        assert!(!file.is_draggable_out());
    }

    #[test]
    fn test_draggable_out() {
        assert!(FileEntry::folder("Docs", RemotePath::home()).is_draggable_out());

        let mut file = stored_file("a.txt");
        assert!(!file.is_draggable_out());
        file.temporary_local_path = Some("/tmp/veildrive/h-1".to_string());
        assert!(file.is_draggable_out());
    }

    #[test]
    fn test_identity_falls_back_to_name_and_path() {
        let a = FileEntry::content("a.txt", RemotePath::home(), "text/plain", 1);
        let b = FileEntry::content("a.txt", RemotePath::home(), "text/plain", 2);
        assert!(a.same_entry(&b));

        let mut c = a.clone();
        c.id = Some(EntryId::new("e-9"));
        let mut d = b.clone();
        d.id = Some(EntryId::new("e-9"));
        assert!(c.same_entry(&d));

        d.id = Some(EntryId::new("e-10"));
        assert!(!c.same_entry(&d));
    }

    #[test]
    fn test_serde_camel_case_wire_names() {
        let mut file = stored_file("a.txt");
        file.temporary_local_path = Some("/tmp/veildrive/h-1".to_string());
        let json = serde_json::to_value(&file).unwrap();
        assert!(json.get("temporaryLocalPath").is_some());
        assert!(json.get("isFetching").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json.get("type").unwrap(), "text/plain");
    }
}
