//! Coordinator Protocol
//!
//! Endpoints and DTOs of the coordinator HTTP API. Storage nodes use
//! `ENDPOINT_REGISTER` to announce themselves; everything else is the
//! client-facing surface.

use serde::{Deserialize, Serialize};

use super::types::{DeleteSummary, UploadSummary};

// --- API Endpoints ---

/// Storage nodes announce their base URL here on startup.
pub const ENDPOINT_REGISTER: &str = "/register";
/// Registered node addresses.
pub const ENDPOINT_NODES: &str = "/nodes";
/// Names of all stored files.
pub const ENDPOINT_FILES: &str = "/files";
/// Multipart upload; the file travels in the `file` field.
pub const ENDPOINT_UPLOAD: &str = "/upload";
/// `/download/{file name}` streams the reconstructed file.
pub const ENDPOINT_DOWNLOAD: &str = "/download";
/// `/delete/{file name}`.
pub const ENDPOINT_DELETE: &str = "/delete";
/// Cluster overview: nodes, health and per-file replication.
pub const ENDPOINT_STATUS: &str = "/status";

/// Name of the multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

// --- Data Transfer Objects ---

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub node_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    /// Number of registered nodes after this registration.
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NodesResponse {
    pub nodes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilesResponse {
    pub files: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    #[serde(flatten)]
    pub summary: UploadSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    #[serde(flatten)]
    pub summary: DeleteSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
