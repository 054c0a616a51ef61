//! User interaction port (driven/secondary port)
//!
//! This module defines the interface through which operations ask the
//! host UI for input or show a notice. Prompts and confirmations suspend
//! only the initiating action; background polling keeps running while a
//! dialog is open.
//!
//! ## Design Notes
//!
//! - Declining a prompt or confirmation is a normal outcome, not an
//!   error; the operation aborts without side effects.
//! - Notices are fire-and-forget; the caller does not wait for the user
//!   to acknowledge them.

use serde::{Deserialize, Serialize};

/// Content of a text prompt dialog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRequest {
    /// Dialog title (short, e.g. "Create folder")
    pub title: String,
    /// Explanatory text under the title
    pub description: String,
}

impl PromptRequest {
    /// Creates a prompt request
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Port trait for host UI dialogs and notices
#[async_trait::async_trait]
pub trait IUserInteraction: Send + Sync {
    /// Asks the user for a line of text
    ///
    /// Returns `None` when the user dismisses the dialog.
    async fn prompt(&self, request: PromptRequest) -> Option<String>;

    /// Asks the user to confirm a destructive action
    async fn confirm(&self, message: &str) -> bool;

    /// Shows a notice to the user
    async fn notify(&self, message: &str);
}
