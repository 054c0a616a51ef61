//! Favorite folder references
//!
//! A favorite is a reference to a folder entry, not ownership of it: the
//! store keeps the set, keyed by folder id, and returns it in insertion
//! order for display. The client only ever adds, removes and navigates.

use serde::{Deserialize, Serialize};

use super::entry::EntryId;
use super::errors::DomainError;
use super::path::RemotePath;

/// A folder the user pinned to the sidebar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteFolder {
    /// Id of the referenced folder entry
    pub id: EntryId,
    /// Folder name, for display
    pub name: String,
    /// Parent path of the referenced folder
    pub path: RemotePath,
}

impl FavoriteFolder {
    /// The navigable path of the referenced folder itself
    pub fn folder_path(&self) -> Result<RemotePath, DomainError> {
        self.path.join_dir(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_path() {
        let fav = FavoriteFolder {
            id: EntryId::new("e-7"),
            name: "Reports".to_string(),
            path: RemotePath::new("/Docs/").unwrap(),
        };
        assert_eq!(fav.folder_path().unwrap().as_str(), "/Docs/Reports/");
    }
}
