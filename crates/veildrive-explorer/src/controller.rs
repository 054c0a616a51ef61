//! Explorer controller
//!
//! Binds user actions to the core [`FileOperations`] use case: every
//! handler snapshots what the view currently knows (path, listing,
//! selection), runs the operation, reports failures to the user and
//! performs the refetch the outcome names. Writes stay visible through
//! the ordinary poll cycle; the forced refetch only shortens the wait.

use std::sync::Arc;

use tracing::{info, warn};

use veildrive_core::domain::{ActionError, EntryId, FavoriteFolder, FileEntry, RemotePath};
use veildrive_core::ports::{IDragExport, IRemoteStore, IUserInteraction};
use veildrive_core::usecases::{DragAction, DroppedFile, FileOperations, Outcome, Refresh};

use crate::view_model::FileTreeViewModel;

/// User-action entry points for one explorer window
pub struct ExplorerController {
    view: Arc<FileTreeViewModel>,
    operations: FileOperations,
    interact: Arc<dyn IUserInteraction>,
}

impl ExplorerController {
    /// Creates a controller over an existing view-model
    ///
    /// # Arguments
    ///
    /// * `view` - The window's view-model
    /// * `store` - Remote store the operations write to
    /// * `interact` - Host UI surface for prompts and notices
    /// * `drag_export` - Optional native drag-out hook
    pub fn new(
        view: Arc<FileTreeViewModel>,
        store: Arc<dyn IRemoteStore>,
        interact: Arc<dyn IUserInteraction>,
        drag_export: Option<Arc<dyn IDragExport>>,
    ) -> Self {
        let operations = FileOperations::new(store, interact.clone(), drag_export);
        Self {
            view,
            operations,
            interact,
        }
    }

    /// The view-model this controller drives
    pub fn view(&self) -> &Arc<FileTreeViewModel> {
        &self.view
    }

    /// Creates a folder in the current path
    pub async fn create_folder(&self) -> Result<Outcome, ActionError> {
        let path = self.view.current_path();
        let listing = self.view.current_entries();
        let result = self.operations.create_folder(&path, &listing).await;
        self.finish(result).await
    }

    /// Imports a batch of externally-dropped files into the current path
    pub async fn drop_files(&self, dropped: Vec<DroppedFile>) -> Result<Outcome, ActionError> {
        let path = self.view.current_path();
        let listing = self.view.current_entries();
        let result = self.operations.import_files(&path, &listing, &dropped).await;
        self.finish(result).await
    }

    /// Double-activation on an entry
    ///
    /// Folders navigate (no remote call; the listing poller reacts to
    /// the path change); content entries open by hash.
    pub async fn activate(&self, entry: &FileEntry) -> Result<Outcome, ActionError> {
        if entry.is_folder() {
            return match self.view.navigate_into(entry) {
                Ok(path) => {
                    info!(path = %path, "Entered folder");
                    Ok(Outcome::Completed(Refresh::None))
                }
                Err(error) => {
                    let error = ActionError::from(error);
                    self.report(&error).await;
                    Err(error)
                }
            };
        }
        let result = self.operations.open_file(entry).await;
        self.finish(result).await
    }

    /// Fetches the selected entry into the local cache
    pub async fn download(&self) -> Result<Outcome, ActionError> {
        let selection = self.view.selected();
        let result = self.operations.download(selection.as_ref()).await;
        self.finish(result).await
    }

    /// Deletes the selected entry's locally-cached copy
    pub async fn delete_local(&self) -> Result<Outcome, ActionError> {
        let selection = self.view.selected();
        let result = self.operations.delete_local(selection.as_ref()).await;
        self.finish(result).await
    }

    /// Deletes the selected entry from the remote store
    pub async fn delete_remote(&self) -> Result<Outcome, ActionError> {
        let selection = self.view.selected();
        let result = self.operations.delete_remote(selection.as_ref()).await;
        self.finish(result).await
    }

    /// Removes all locally-cached content
    pub async fn clear_cache(&self) -> Result<Outcome, ActionError> {
        let result = self.operations.clear_cache().await;
        self.finish(result).await
    }

    /// Shares the selected entry with another client
    pub async fn share(&self) -> Result<Outcome, ActionError> {
        let selection = self.view.selected();
        let result = self.operations.share(selection.as_ref()).await;
        self.finish(result).await
    }

    /// A folder id was dropped on the favorites region
    pub async fn drop_on_favorites(&self, id: EntryId) -> Result<Outcome, ActionError> {
        let result = self.operations.add_favorite(&id).await;
        self.finish(result).await
    }

    /// Removes a favorite
    ///
    /// The remove control sits on the favorite row; this handler never
    /// navigates, so the row's navigation action must not fire with it.
    pub async fn remove_favorite(&self, favorite: &FavoriteFolder) -> Result<Outcome, ActionError> {
        let result = self.operations.remove_favorite(favorite).await;
        self.finish(result).await
    }

    /// Navigates into a favorite folder
    pub async fn open_favorite(&self, favorite: &FavoriteFolder) -> Result<RemotePath, ActionError> {
        match favorite.folder_path() {
            Ok(path) => {
                self.view.navigate_to(path.clone());
                Ok(path)
            }
            Err(error) => {
                let error = ActionError::from(error);
                self.report(&error).await;
                Err(error)
            }
        }
    }

    /// A drag gesture started on an entry
    pub async fn drag(&self, entry: &FileEntry) -> Result<DragAction, ActionError> {
        match self.operations.begin_drag(entry).await {
            Ok(action) => Ok(action),
            Err(error) => {
                self.report(&error).await;
                Err(error)
            }
        }
    }

    /// Reports failures and runs the refetch a completed outcome names
    async fn finish(&self, result: Result<Outcome, ActionError>) -> Result<Outcome, ActionError> {
        match result {
            Ok(outcome) => {
                match outcome.refresh() {
                    Refresh::Listing => self.view.refetch_listing(),
                    // The favorites pane is small and refreshed rarely;
                    // waiting keeps the drop gesture's result on screen
                    // when the handler returns.
                    Refresh::Favorites => self.view.refetch_favorites_and_wait().await,
                    Refresh::None => {}
                }
                Ok(outcome)
            }
            Err(error) => {
                self.report(&error).await;
                Err(error)
            }
        }
    }

    async fn report(&self, error: &ActionError) {
        if error.is_local() {
            info!(error = %error, "Operation refused");
        } else {
            warn!(error = %error, "Operation failed");
        }
        self.interact.notify(&error.to_string()).await;
    }
}
