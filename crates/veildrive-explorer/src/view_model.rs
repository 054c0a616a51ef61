//! File tree view-model
//!
//! Composes the polling data layer for one explorer window: a
//! connectivity probe, the current-path listing and the favorites set,
//! plus navigation history and the path-scoped selection.
//!
//! ## Flow
//!
//! ```text
//! connectivity poller ──► connected gate ──┐
//!                                          ├──► listing poller ──► ListingView
//! history stack ──► current-path watch ────┘          ▲
//!                        (dependency)                 │ refetch after writes
//! favorites poller ──────────────────────────────► favorites
//! ```
//!
//! The listing poller is gated on connectivity and re-queries whenever
//! the current path changes; while disconnected the view reports
//! [`ListingView::Disconnected`] rather than passing off a frozen listing
//! as current. Well-known paths flow through the same poller - only the
//! query parameter differs.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::debug;

use veildrive_core::config::PollingConfig;
use veildrive_core::domain::{DomainError, FavoriteFolder, FileEntry, RemotePath};
use veildrive_core::ports::IRemoteStore;

use crate::history::HistoryStack;
use crate::poller::Poller;

/// What the file pane should render
#[derive(Debug, Clone, PartialEq)]
pub enum ListingView {
    /// The transport is not connected; no listing can be called current
    Disconnected,
    /// The last resolved listing for the current path
    Entries(Vec<FileEntry>),
}

/// View-model for one explorer window
///
/// Construction spawns the poll tasks, so it must happen inside a tokio
/// runtime. Dropping the view-model stops them.
pub struct FileTreeViewModel {
    history: Mutex<HistoryStack<RemotePath>>,
    path_tx: watch::Sender<RemotePath>,
    selection: Mutex<Option<FileEntry>>,
    connectivity: Poller<bool>,
    listing: Poller<Vec<FileEntry>>,
    favorites: Poller<Vec<FavoriteFolder>>,
}

impl FileTreeViewModel {
    /// Creates the view-model and starts its pollers
    ///
    /// # Arguments
    ///
    /// * `store` - Remote store the pollers query
    /// * `polling` - Refresh intervals for the three pollers
    pub fn new(store: Arc<dyn IRemoteStore>, polling: &PollingConfig) -> Self {
        let (path_tx, path_rx) = watch::channel(RemotePath::home());

        let connectivity = {
            let store = store.clone();
            Poller::builder("connectivity", false, move || {
                let store = store.clone();
                async move { store.is_client_connected().await }
            })
            .interval(polling.connectivity_interval())
            .spawn()
        };

        // Project the connectivity snapshot into a plain boolean gate for
        // the listing poller.
        let (gate_tx, gate_rx) = watch::channel(false);
        let mut connectivity_rx = connectivity.subscribe();
        tokio::spawn(async move {
            // Publish the value seen at subscription time before waiting;
            // the first probe may already have resolved.
            loop {
                let connected = connectivity_rx.borrow_and_update().value;
                let _ = gate_tx.send_if_modified(|gate| {
                    if *gate != connected {
                        *gate = connected;
                        true
                    } else {
                        false
                    }
                });
                if connectivity_rx.changed().await.is_err() {
                    break;
                }
            }
        });

        let listing = {
            let store = store.clone();
            let producer_path_rx = path_rx.clone();
            Poller::builder("listing", Vec::new(), move || {
                // The path is read at invocation start, so a dependency
                // trigger always queries the value that caused it.
                let path = producer_path_rx.borrow().clone();
                let store = store.clone();
                async move { store.find_files(&path).await }
            })
            .interval(polling.listing_interval())
            .gate(gate_rx)
            .dependency(path_rx)
            .spawn()
        };

        let favorites = {
            let store = store.clone();
            Poller::builder("favorites", Vec::new(), move || {
                let store = store.clone();
                async move { store.get_favorite_folders().await }
            })
            .interval(polling.favorites_interval())
            .spawn()
        };

        Self {
            history: Mutex::new(HistoryStack::new(RemotePath::home())),
            path_tx,
            selection: Mutex::new(None),
            connectivity,
            listing,
            favorites,
        }
    }

    // --- Navigation ---

    /// The path the window is currently showing
    pub fn current_path(&self) -> RemotePath {
        self.path_tx.borrow().clone()
    }

    /// Navigates to `path`, recording it in the history
    pub fn navigate_to(&self, path: RemotePath) {
        let mut history = self.history.lock().unwrap();
        history.set(path);
        let current = history.current().clone();
        drop(history);
        self.apply_navigation(current);
    }

    /// Navigates into a child folder of the current path
    ///
    /// Callers pass folder entries from the current listing; the child
    /// path is formed from the current path and the entry name.
    pub fn navigate_into(&self, entry: &FileEntry) -> Result<RemotePath, DomainError> {
        let child = self.current_path().join_dir(&entry.name)?;
        self.navigate_to(child.clone());
        Ok(child)
    }

    /// Steps back in the history, returning the now-current path
    pub fn go_back(&self) -> Option<RemotePath> {
        let mut history = self.history.lock().unwrap();
        let path = history.undo()?.clone();
        drop(history);
        self.apply_navigation(path.clone());
        Some(path)
    }

    /// Steps forward in the history, returning the now-current path
    pub fn go_forward(&self) -> Option<RemotePath> {
        let mut history = self.history.lock().unwrap();
        let path = history.redo()?.clone();
        drop(history);
        self.apply_navigation(path.clone());
        Some(path)
    }

    /// Whether a back step is available
    pub fn can_go_back(&self) -> bool {
        self.history.lock().unwrap().can_undo()
    }

    /// Whether a forward step is available
    pub fn can_go_forward(&self) -> bool {
        self.history.lock().unwrap().can_redo()
    }

    fn apply_navigation(&self, path: RemotePath) {
        debug!(path = %path, "Navigating");
        // Selection is path-scoped; it never carries across a change.
        self.selection.lock().unwrap().take();
        self.path_tx.send_replace(path);
    }

    // --- Selection ---

    /// Selects an entry, replacing any prior selection
    pub fn select(&self, entry: FileEntry) {
        *self.selection.lock().unwrap() = Some(entry);
    }

    /// The selected entry, if any
    pub fn selected(&self) -> Option<FileEntry> {
        self.selection.lock().unwrap().clone()
    }

    /// Clears the selection
    pub fn clear_selection(&self) {
        self.selection.lock().unwrap().take();
    }

    // --- Observed state ---

    /// Whether the transport is connected, as last probed
    pub fn is_connected(&self) -> bool {
        self.connectivity.value()
    }

    /// What the file pane should render right now
    pub fn listing(&self) -> ListingView {
        if !self.is_connected() {
            return ListingView::Disconnected;
        }
        ListingView::Entries(self.listing.value())
    }

    /// The last known listing, connected or not
    ///
    /// Operation prechecks validate against this snapshot; a true race
    /// with another writer is resolved by the next poll, not prevented.
    pub fn current_entries(&self) -> Vec<FileEntry> {
        self.listing.value()
    }

    /// True when the most recent listing refresh failed
    pub fn is_listing_stale(&self) -> bool {
        self.listing.latest().failed
    }

    /// The favorites set, in the store's display order
    pub fn favorites(&self) -> Vec<FavoriteFolder> {
        self.favorites.value()
    }

    // --- Forced refreshes, used after writes ---

    /// Forces an immediate listing refresh
    pub fn refetch_listing(&self) {
        self.listing.refetch();
    }

    /// Forces a listing refresh and waits for it to complete
    pub async fn refetch_listing_and_wait(&self) {
        self.listing.refetch_and_wait().await;
    }

    /// Forces an immediate favorites refresh
    pub fn refetch_favorites(&self) {
        self.favorites.refetch();
    }

    /// Forces a favorites refresh and waits for it to complete
    pub async fn refetch_favorites_and_wait(&self) {
        self.favorites.refetch_and_wait().await;
    }
}
