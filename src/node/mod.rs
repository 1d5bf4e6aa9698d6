//! Storage Node Module
//!
//! A storage node is an independent process that keeps chunks in a local
//! directory and serves them over HTTP. It knows nothing about files, only
//! about chunk identifiers.
//!
//! ## Lifecycle
//! 1. **Open**: the chunk directory is created if missing.
//! 2. **Register**: the node announces its URL to the coordinator, retrying a
//!    fixed number of times. A node that never gets through keeps serving but
//!    stays invisible to the coordinator until it is restarted.
//! 3. **Serve**: store / fetch / delete / health requests.
//!
//! `client` holds the other side of the wire: the HTTP calls the coordinator
//! makes against nodes.

pub mod client;
pub mod handlers;
pub mod protocol;
pub mod registration;
pub mod service;
pub mod store;
