//! File operation orchestration use case
//!
//! Validates and dispatches every user-initiated file action against the
//! remote store: create folder, import dropped files, favorite add and
//! remove, open, download, delete (local and remote), clear cache, share
//! and drag-export.
//!
//! Two rules hold for every operation:
//!
//! 1. Validation and precondition checks run against the *last known*
//!    listing, before any remote call. A true race between two clients is
//!    accepted as a residual inconsistency that the next poll resolves.
//! 2. Writes are never applied optimistically to local state. On success
//!    the caller is told which refetch makes the write visible; on
//!    failure nothing is touched beyond reporting.

use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::domain::{ActionError, EntryId, FavoriteFolder, FileEntry, RemotePath};
use crate::ports::{IDragExport, IRemoteStore, IUserInteraction, NewFile, PromptRequest};

/// Which poller the caller should refetch after a completed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Nothing to refetch; the next regular poll is soon enough
    None,
    /// The current-path listing changed
    Listing,
    /// The favorites set changed
    Favorites,
}

/// Result of a completed user action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation ran to completion
    Completed(Refresh),
    /// The user declined a prompt or confirmation; nothing happened
    Aborted,
}

impl Outcome {
    /// The refetch the caller owes, if any
    pub fn refresh(&self) -> Refresh {
        match self {
            Outcome::Completed(refresh) => *refresh,
            Outcome::Aborted => Refresh::None,
        }
    }
}

/// How a drag gesture on an entry should proceed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragAction {
    /// Folder drag: carry the folder id so a drop on the favorites
    /// region can pin it
    FavoritePayload(EntryId),
    /// The entry was handed to the native drag-export hook
    Exported,
    /// Not draggable out (no cached copy, or no export hook installed)
    Denied,
}

/// An externally-dropped file, as reported by the host environment
#[derive(Debug, Clone)]
pub struct DroppedFile {
    /// File name
    pub name: String,
    /// Absolute host-filesystem location
    pub system_path: String,
    /// Declared content type
    pub content_type: String,
    /// Size in bytes
    pub size: u64,
}

/// Use case for orchestrating user-initiated file operations
///
/// Holds the injected ports and exposes one method per user action. The
/// caller threads in the current view snapshots (path, listing,
/// selection) and performs the refetch named by the returned [`Outcome`].
pub struct FileOperations {
    store: Arc<dyn IRemoteStore>,
    interact: Arc<dyn IUserInteraction>,
    drag_export: Option<Arc<dyn IDragExport>>,
}

impl FileOperations {
    /// Creates a new FileOperations use case
    ///
    /// # Arguments
    ///
    /// * `store` - Remote store for all persisted file state
    /// * `interact` - Host UI surface for prompts, confirmations, notices
    /// * `drag_export` - Optional native drag-out hook
    pub fn new(
        store: Arc<dyn IRemoteStore>,
        interact: Arc<dyn IUserInteraction>,
        drag_export: Option<Arc<dyn IDragExport>>,
    ) -> Self {
        Self {
            store,
            interact,
            drag_export,
        }
    }

    /// Creates a folder in the current path
    ///
    /// Prompts for a name, rejects duplicates against the current listing
    /// before issuing any remote call, then creates the folder.
    ///
    /// # Errors
    ///
    /// `ActionError::DuplicateName` on a collision; `ActionError::Remote`
    /// if the create call is rejected.
    pub async fn create_folder(
        &self,
        current_path: &RemotePath,
        listing: &[FileEntry],
    ) -> Result<Outcome, ActionError> {
        let name = match self
            .interact
            .prompt(PromptRequest::new(
                "Create folder",
                "Enter the name of the folder you want to create",
            ))
            .await
        {
            Some(name) if !name.is_empty() => name,
            _ => return Ok(Outcome::Aborted),
        };

        if listing.iter().any(|entry| entry.name == name) {
            return Err(ActionError::DuplicateName { name });
        }

        info!(folder = %name, path = %current_path, "Creating folder");
        self.store
            .create_folder(&name, current_path)
            .await
            .context("Failed to create folder")?;

        Ok(Outcome::Completed(Refresh::Listing))
    }

    /// Imports a batch of externally-dropped files into the current path
    ///
    /// The whole batch is checked against the current listing first: any
    /// collision rejects the entire batch with no files imported. Past
    /// that check, each file is submitted individually and failures are
    /// independent - a rejected create does not roll back its siblings.
    ///
    /// # Errors
    ///
    /// `ActionError::ImportNotPermitted` when dropping into a restricted
    /// well-known path; `ActionError::ImportCollision` when any dropped
    /// name already exists in the listing.
    pub async fn import_files(
        &self,
        current_path: &RemotePath,
        listing: &[FileEntry],
        dropped: &[DroppedFile],
    ) -> Result<Outcome, ActionError> {
        if !current_path.allows_import() {
            return Err(ActionError::ImportNotPermitted {
                path: current_path.to_string(),
            });
        }

        // All-or-nothing precheck: one collision refuses the whole batch.
        if let Some(existing) = dropped
            .iter()
            .find(|d| listing.iter().any(|entry| entry.name == d.name))
        {
            return Err(ActionError::ImportCollision {
                name: existing.name.clone(),
            });
        }

        info!(count = dropped.len(), path = %current_path, "Importing dropped files");
        for file in dropped {
            let new_file = NewFile {
                name: file.name.clone(),
                system_path: file.system_path.clone(),
                path: current_path.clone(),
                kind: file.content_type.clone().into(),
                size: file.size,
            };
            if let Err(error) = self.store.create_file(&new_file).await {
                warn!(name = %file.name, error = %format!("{error:#}"), "Import failed for one file");
            }
        }

        Ok(Outcome::Completed(Refresh::Listing))
    }

    /// Pins the folder with `id` to the favorites set
    pub async fn add_favorite(&self, id: &EntryId) -> Result<Outcome, ActionError> {
        debug!(%id, "Adding favorite");
        self.store
            .set_folder_favorite(id)
            .await
            .context("Failed to add favorite")?;
        Ok(Outcome::Completed(Refresh::Favorites))
    }

    /// Removes a favorite
    ///
    /// Removal is an explicit action on the favorite row; it carries no
    /// navigation side effect.
    pub async fn remove_favorite(&self, favorite: &FavoriteFolder) -> Result<Outcome, ActionError> {
        debug!(id = %favorite.id, "Removing favorite");
        self.store
            .remove_folder_favorite(&favorite.id)
            .await
            .context("Failed to remove favorite")?;
        Ok(Outcome::Completed(Refresh::Favorites))
    }

    /// Opens a content entry with the host's default handler
    ///
    /// # Errors
    ///
    /// `ActionError::NotStored` for entries without a content hash - a
    /// pending entry has nothing addressable to open.
    pub async fn open_file(&self, entry: &FileEntry) -> Result<Outcome, ActionError> {
        let hash = entry.hash.as_ref().ok_or_else(|| ActionError::NotStored {
            name: entry.name.clone(),
        })?;

        debug!(name = %entry.name, %hash, "Opening file");
        self.store
            .open_file(hash)
            .await
            .context("Failed to open file")?;
        Ok(Outcome::Completed(Refresh::None))
    }

    /// Fetches the selected entry's content into the local cache
    ///
    /// The listing poller picks up the `is_fetching` flag and, later, the
    /// cached path on its regular cycle; no forced refetch is needed.
    ///
    /// # Errors
    ///
    /// `ActionError::NoSelection` without a selection;
    /// `ActionError::NotStored` when the entry has no content hash.
    pub async fn download(&self, selection: Option<&FileEntry>) -> Result<Outcome, ActionError> {
        let entry = selection.ok_or(ActionError::NoSelection)?;
        let hash = entry.hash.as_ref().ok_or_else(|| ActionError::NotStored {
            name: entry.name.clone(),
        })?;

        info!(name = %entry.name, %hash, "Fetching file into local cache");
        self.store
            .fetch_file(hash)
            .await
            .context("Failed to fetch file")?;
        Ok(Outcome::Completed(Refresh::None))
    }

    /// Deletes the locally-cached copy of the selected entry
    ///
    /// Asks for confirmation (naming the cached path), then clears the
    /// cache entry by content hash. Remote status is unaffected.
    ///
    /// # Errors
    ///
    /// `ActionError::NoSelection` without a selection;
    /// `ActionError::NoLocalCopy` when nothing is cached;
    /// `ActionError::NotStored` when the entry has no content hash.
    pub async fn delete_local(&self, selection: Option<&FileEntry>) -> Result<Outcome, ActionError> {
        let entry = selection.ok_or(ActionError::NoSelection)?;
        if !entry.is_deletable_locally() {
            return Err(ActionError::NoLocalCopy {
                name: entry.name.clone(),
            });
        }
        let local_path = entry.temporary_local_path.as_deref().unwrap_or_default();
        let hash = entry.hash.as_ref().ok_or_else(|| ActionError::NotStored {
            name: entry.name.clone(),
        })?;

        let message = format!("Are you sure you want to delete the local copy {local_path}?");
        if !self.interact.confirm(&message).await {
            return Ok(Outcome::Aborted);
        }

        info!(name = %entry.name, %hash, "Deleting local copy");
        self.store
            .delete_file_locally(hash)
            .await
            .context("Failed to delete local copy")?;
        Ok(Outcome::Completed(Refresh::None))
    }

    /// Deletes the selected entry from the remote store
    ///
    /// Asks for confirmation, then removes by content hash and asks the
    /// caller to refetch the listing.
    ///
    /// # Errors
    ///
    /// `ActionError::NoSelection` without a selection;
    /// `ActionError::SelectionIsFolder` for folders;
    /// `ActionError::NotStored` for pending entries - nothing is durably
    /// stored yet, so there is nothing to remove.
    pub async fn delete_remote(
        &self,
        selection: Option<&FileEntry>,
    ) -> Result<Outcome, ActionError> {
        let entry = selection.ok_or(ActionError::NoSelection)?;
        if entry.is_folder() {
            return Err(ActionError::SelectionIsFolder {
                name: entry.name.clone(),
            });
        }
        if !entry.is_removable_remotely() {
            return Err(ActionError::NotStored {
                name: entry.name.clone(),
            });
        }
        let hash = entry.hash.as_ref().ok_or_else(|| ActionError::NotStored {
            name: entry.name.clone(),
        })?;

        if !self
            .interact
            .confirm("Are you sure you want to delete the file stored in the cloud?")
            .await
        {
            return Ok(Outcome::Aborted);
        }

        info!(name = %entry.name, %hash, "Deleting remote file");
        self.store
            .delete_file(hash)
            .await
            .context("Failed to delete remote file")?;
        Ok(Outcome::Completed(Refresh::Listing))
    }

    /// Removes all locally-cached content and notifies the user
    pub async fn clear_cache(&self) -> Result<Outcome, ActionError> {
        info!("Clearing local cache");
        self.store
            .clear_cache()
            .await
            .context("Failed to clear cache")?;
        self.interact
            .notify("All temporary files have been deleted")
            .await;
        Ok(Outcome::Completed(Refresh::None))
    }

    /// Shares the selected entry with another client
    ///
    /// Prompts for the recipient address, issues the share call and
    /// surfaces the store's result message verbatim, falling back to a
    /// generic success notice when the call returns none.
    ///
    /// # Errors
    ///
    /// `ActionError::NoSelection` without a selection;
    /// `ActionError::SelectionIsFolder` for folders;
    /// `ActionError::NotStored` when the entry has no content hash.
    pub async fn share(&self, selection: Option<&FileEntry>) -> Result<Outcome, ActionError> {
        let entry = selection.ok_or(ActionError::NoSelection)?;
        if entry.is_folder() {
            return Err(ActionError::SelectionIsFolder {
                name: entry.name.clone(),
            });
        }
        let hash = entry.hash.as_ref().ok_or_else(|| ActionError::NotStored {
            name: entry.name.clone(),
        })?;

        let recipient = match self
            .interact
            .prompt(PromptRequest::new(
                format!("Share {}", entry.name),
                "Enter the client address of the person you want to share this file with",
            ))
            .await
        {
            Some(address) if !address.is_empty() => address,
            _ => return Ok(Outcome::Aborted),
        };

        info!(name = %entry.name, %hash, "Sharing file");
        let message = self
            .store
            .share_file(hash, &recipient)
            .await
            .context("Failed to share file")?;

        self.interact
            .notify(message.as_deref().unwrap_or("File shared successfully"))
            .await;
        Ok(Outcome::Completed(Refresh::None))
    }

    /// Decides how a drag gesture on `entry` proceeds
    ///
    /// Folders drag as in-window favorite payloads. Files with a cached
    /// local copy are handed to the native drag-export hook; anything
    /// else is not draggable out.
    pub async fn begin_drag(&self, entry: &FileEntry) -> Result<DragAction, ActionError> {
        if entry.is_folder() {
            return Ok(match &entry.id {
                Some(id) => DragAction::FavoritePayload(id.clone()),
                // A folder that has not completed its first sync has no
                // id to pin yet.
                None => DragAction::Denied,
            });
        }

        if entry.temporary_local_path.is_none() {
            return Ok(DragAction::Denied);
        }

        match &self.drag_export {
            Some(hook) => {
                debug!(name = %entry.name, "Starting native drag export");
                hook.start_drag(entry)
                    .await
                    .context("Failed to start native drag")?;
                Ok(DragAction::Exported)
            }
            None => Ok(DragAction::Denied),
        }
    }
}
