//! Node Registry Module
//!
//! Tracks the storage nodes that announced themselves to this coordinator
//! and answers "which of them are reachable right now".
//!
//! ## Core Concepts
//! - **Registration**: explicit and idempotent; an address is never checked
//!   when it is registered and never removed afterwards.
//! - **Health**: computed fresh on every call by probing each registered node
//!   in parallel. Nothing is cached, so a slow node only drops out of the
//!   healthy set for the call that timed out on it.
//! - **Lifetime**: in memory only. After a coordinator restart nodes must
//!   register again.

pub mod service;

pub use service::NodeRegistry;

#[cfg(test)]
mod tests;
