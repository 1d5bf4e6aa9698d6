//! Chunked Replicated File Storage Library
//!
//! This library crate defines the modules shared by the two process roles of
//! the binary (`main.rs`): one coordinator and any number of storage nodes.
//!
//! ## Architecture Modules
//! - **`chunking`**: Splits files into fixed-size chunks, names them and puts
//!   them back together.
//! - **`config`**: Command-line/environment settings for both roles.
//! - **`coordinator`**: The file-level API. Places chunk replicas on nodes,
//!   reconstructs files on download, deletes them best-effort.
//! - **`metadata`**: Durable file name -> placement records, kept in one JSON
//!   document.
//! - **`node`**: The storage node process: a local chunk directory behind an
//!   HTTP API, plus the client the coordinator uses to talk to it.
//! - **`registry`**: Which nodes have registered, and which of them answer
//!   health probes right now.

pub mod chunking;
pub mod config;
pub mod coordinator;
pub mod metadata;
pub mod node;
pub mod registry;
