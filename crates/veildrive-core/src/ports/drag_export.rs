//! Drag-export port (driven/secondary port)
//!
//! This module defines the optional hook for handing a dragged entry off
//! to the host environment as a native file drag. The hook is only
//! consulted for entries whose content is available in the local cache;
//! anything else either drags as an in-window favorite payload (folders)
//! or is not draggable out at all.

use crate::domain::FileEntry;

/// Port trait for the native drag-out handoff
#[async_trait::async_trait]
pub trait IDragExport: Send + Sync {
    /// Starts a native drag for `entry` in place of the default behavior
    async fn start_drag(&self, entry: &FileEntry) -> anyhow::Result<()>;
}
