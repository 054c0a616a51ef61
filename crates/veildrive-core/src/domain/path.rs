//! Remote path newtype and well-known navigation roots
//!
//! Paths in the remote tree are absolute, slash-delimited strings that
//! always terminate in a separator: `/`, `/Docs/`, `/Docs/Reports/`.
//! The trailing separator is an invariant, not a convention - every
//! navigable location is a directory, and child paths are formed by
//! appending `name + "/"` to the parent.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// An absolute, slash-terminated directory path in the remote tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemotePath(String);

impl RemotePath {
    /// Creates a validated remote path
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPath` if the string is not absolute,
    /// does not end in `/`, or contains an empty segment.
    pub fn new(path: impl Into<String>) -> Result<Self, DomainError> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(DomainError::InvalidPath(path));
        }
        if !path.ends_with('/') {
            return Err(DomainError::InvalidPath(path));
        }
        if path.contains("//") {
            return Err(DomainError::InvalidPath(path));
        }
        Ok(Self(path))
    }

    /// The root of the user's own tree
    pub fn home() -> Self {
        Self("/".to_string())
    }

    /// The distinguished location holding entries shared by other users
    pub fn shared_with_me() -> Self {
        Self("/shared-with-me/".to_string())
    }

    /// Returns the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Appends a child directory name, keeping the trailing separator
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidName` if `name` is empty or contains `/`.
    pub fn join_dir(&self, name: &str) -> Result<Self, DomainError> {
        if name.is_empty() || name.contains('/') {
            return Err(DomainError::InvalidName(name.to_string()));
        }
        Ok(Self(format!("{}{}/", self.0, name)))
    }

    /// Returns the enclosing directory, or None for the root
    pub fn parent(&self) -> Option<Self> {
        if self.0 == "/" {
            return None;
        }
        let trimmed = &self.0[..self.0.len() - 1];
        let cut = trimmed.rfind('/').unwrap_or(0);
        Some(Self(trimmed[..=cut].to_string()))
    }

    /// Returns the well-known root this path is, if it is one
    pub fn well_known(&self) -> Option<WellKnownPath> {
        WellKnownPath::all()
            .iter()
            .copied()
            .find(|w| w.path() == *self)
    }

    /// Returns true if externally-dropped files may be imported here
    ///
    /// Shared-with-me is a read-oriented view; drops into it are refused
    /// before any remote call.
    pub fn allows_import(&self) -> bool {
        match self.well_known() {
            Some(w) => w.allows_import(),
            None => true,
        }
    }
}

impl Display for RemotePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RemotePath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Distinguished navigable locations with their own listing source
///
/// Well-known paths are never created or deleted by the user. They appear
/// as fixed sidebar entries and restrict which operations are permitted
/// inside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnownPath {
    /// The user's own tree, rooted at `/`
    Home,
    /// Entries other users have shared with this client
    SharedWithMe,
}

impl WellKnownPath {
    /// All well-known paths, in sidebar display order
    pub fn all() -> &'static [WellKnownPath] {
        &[WellKnownPath::Home, WellKnownPath::SharedWithMe]
    }

    /// The navigable path of this location
    pub fn path(&self) -> RemotePath {
        match self {
            WellKnownPath::Home => RemotePath::home(),
            WellKnownPath::SharedWithMe => RemotePath::shared_with_me(),
        }
    }

    /// Human-readable label for display
    pub fn label(&self) -> &'static str {
        match self {
            WellKnownPath::Home => "Home",
            WellKnownPath::SharedWithMe => "Shared with me",
        }
    }

    /// Whether drop-to-import is permitted inside this location
    pub fn allows_import(&self) -> bool {
        match self {
            WellKnownPath::Home => true,
            WellKnownPath::SharedWithMe => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_well_formed_paths() {
        assert!(RemotePath::new("/").is_ok());
        assert!(RemotePath::new("/Docs/").is_ok());
        assert!(RemotePath::new("/Docs/Reports/").is_ok());
    }

    #[test]
    fn test_new_rejects_malformed_paths() {
        assert!(RemotePath::new("Docs/").is_err());
        assert!(RemotePath::new("/Docs").is_err());
        assert!(RemotePath::new("//Docs/").is_err());
        assert!(RemotePath::new("").is_err());
    }

    #[test]
    fn test_join_dir() {
        let root = RemotePath::home();
        let docs = root.join_dir("Docs").unwrap();
        assert_eq!(docs.as_str(), "/Docs/");

        let reports = docs.join_dir("Reports").unwrap();
        assert_eq!(reports.as_str(), "/Docs/Reports/");
    }

    #[test]
    fn test_join_dir_rejects_bad_names() {
        let root = RemotePath::home();
        assert!(root.join_dir("").is_err());
        assert!(root.join_dir("a/b").is_err());
    }

    #[test]
    fn test_parent() {
        let reports = RemotePath::new("/Docs/Reports/").unwrap();
        assert_eq!(reports.parent().unwrap().as_str(), "/Docs/");
        assert_eq!(RemotePath::new("/Docs/").unwrap().parent().unwrap().as_str(), "/");
        assert!(RemotePath::home().parent().is_none());
    }

    #[test]
    fn test_well_known() {
        assert_eq!(RemotePath::home().well_known(), Some(WellKnownPath::Home));
        assert_eq!(
            RemotePath::shared_with_me().well_known(),
            Some(WellKnownPath::SharedWithMe)
        );
        assert_eq!(RemotePath::new("/Docs/").unwrap().well_known(), None);
    }

    #[test]
    fn test_allows_import() {
        assert!(RemotePath::home().allows_import());
        assert!(RemotePath::new("/Docs/").unwrap().allows_import());
        assert!(!RemotePath::shared_with_me().allows_import());
    }

    #[test]
    fn test_well_known_labels() {
        let labels: Vec<&str> = WellKnownPath::all().iter().map(|w| w.label()).collect();
        assert_eq!(labels, vec!["Home", "Shared with me"]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let path = RemotePath::new("/Docs/").unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"/Docs/\"");
        let back: RemotePath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
