//! Storage Node Protocol
//!
//! Endpoints and DTOs of the node HTTP API. Chunk payloads travel as raw
//! request/response bodies; everything else is JSON.

use serde::{Deserialize, Serialize};

use super::registration::RegistrationState;

// --- API Endpoints ---

/// Stores the request body under `?filename=<chunk identifier>`.
pub const ENDPOINT_STORE_CHUNK: &str = "/store_chunk";
/// Returns the raw bytes of `/get_chunk/{chunk identifier}`.
pub const ENDPOINT_GET_CHUNK: &str = "/get_chunk";
/// Removes `/delete_chunk/{chunk identifier}`.
pub const ENDPOINT_DELETE_CHUNK: &str = "/delete_chunk";
/// Liveness probe.
pub const ENDPOINT_HEALTH: &str = "/health";

// --- Data Transfer Objects ---

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreChunkParams {
    pub filename: String,
}

/// Acknowledgment for store and delete calls.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChunkStatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Whether this node made it into the coordinator's registry.
    pub registration: RegistrationState,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
