//! Veildrive Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `FileEntry`, `FavoriteFolder`, `RemotePath`
//! - **Use cases** - `FileOperations`, the user-action orchestrator
//! - **Port definitions** - Traits for adapters: `IRemoteStore`, `IUserInteraction`, `IDragExport`
//! - **Capability model** - Per-entry predicates deriving which operations are permitted
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no external dependencies.
//! Ports define trait interfaces that adapter crates implement. The remote
//! store is always injected explicitly; nothing in this crate reaches for an
//! ambient client. Use cases orchestrate domain entities through port
//! interfaces.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
