//! Coordinator Module
//!
//! The coordinator owns the file-level view of the system. It never stores
//! chunk bytes itself; it decides where chunks go, records where they went,
//! and pulls them back together on download.
//!
//! ## Operations
//! - **Upload** (`replication`): split the file, require at least R healthy
//!   nodes, place every chunk on R distinct nodes chosen by the
//!   `PlacementStrategy`, then record whatever stores succeeded. Failed
//!   stores only degrade replication; they never fail the upload.
//! - **Download** (`reconstruction`): for every chunk, try the recorded
//!   replicas until one answers. A single chunk with no reachable replica
//!   fails the whole download; partial files are never returned.
//! - **Delete** (`service`): best-effort chunk removal on every recorded
//!   node, then unconditional removal of the file's metadata.
//!
//! ## Submodules
//! - **`placement`**: pluggable replica selection.
//! - **`protocol`**: HTTP endpoints and DTOs.
//! - **`handlers`**: axum handlers and the router.

pub mod error;
pub mod handlers;
pub mod placement;
pub mod protocol;
pub mod reconstruction;
pub mod replication;
pub mod service;
pub mod types;

pub use error::CoordinatorError;
pub use service::Coordinator;
