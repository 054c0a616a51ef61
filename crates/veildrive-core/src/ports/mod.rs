//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live outside it.
//!
//! ## Ports Overview
//!
//! - [`IRemoteStore`] - The remote store API surface, reached through the
//!   privacy-preserving network client
//! - [`IUserInteraction`] - Prompts, confirmations and notices shown by
//!   the host UI
//! - [`IDragExport`] - Native drag-out handoff to the host environment

pub mod drag_export;
pub mod interaction;
pub mod remote_store;

pub use drag_export::IDragExport;
pub use interaction::{IUserInteraction, PromptRequest};
pub use remote_store::{IRemoteStore, NewFile};
