use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Extension, Multipart, Path},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    routing::{delete, get, post},
};
use std::sync::Arc;

use super::error::CoordinatorError;
use super::protocol::{
    DeleteResponse, ENDPOINT_DELETE, ENDPOINT_DOWNLOAD, ENDPOINT_FILES, ENDPOINT_NODES,
    ENDPOINT_REGISTER, ENDPOINT_STATUS, ENDPOINT_UPLOAD, ErrorResponse, FilesResponse,
    NodesResponse, RegisterRequest, RegisterResponse, UPLOAD_FIELD, UploadResponse,
};
use super::service::Coordinator;
use super::types::ClusterStatus;
use crate::chunking::CodecError;

type HandlerError = (StatusCode, Json<ErrorResponse>);

pub fn router(coordinator: Arc<Coordinator>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route(ENDPOINT_REGISTER, post(handle_register))
        .route(ENDPOINT_NODES, get(handle_list_nodes))
        .route(ENDPOINT_FILES, get(handle_list_files))
        .route(ENDPOINT_UPLOAD, post(handle_upload))
        .route(
            &format!("{}/:file_name", ENDPOINT_DOWNLOAD),
            get(handle_download),
        )
        .route(
            &format!("{}/:file_name", ENDPOINT_DELETE),
            delete(handle_delete),
        )
        .route(ENDPOINT_STATUS, get(handle_status))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(Extension(coordinator))
}

pub async fn handle_register(
    Extension(coordinator): Extension<Arc<Coordinator>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, HandlerError> {
    if req.node_url.trim().is_empty() {
        return Err(bad_request("node_url must not be empty".to_string()));
    }

    let total = coordinator.register_node(&req.node_url);
    Ok(Json(RegisterResponse {
        message: format!("Node {} registered", req.node_url.trim()),
        total,
    }))
}

pub async fn handle_list_nodes(
    Extension(coordinator): Extension<Arc<Coordinator>>,
) -> Json<NodesResponse> {
    Json(NodesResponse {
        nodes: coordinator.list_nodes(),
    })
}

pub async fn handle_list_files(
    Extension(coordinator): Extension<Arc<Coordinator>>,
) -> Result<Json<FilesResponse>, HandlerError> {
    let files = coordinator.list_files().await.map_err(error_response)?;
    Ok(Json(FilesResponse { files }))
}

pub async fn handle_upload(
    Extension(coordinator): Extension<Arc<Coordinator>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, HandlerError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Malformed upload body: {}", e);
        (
            e.status(),
            Json(ErrorResponse {
                error: e.body_text(),
            }),
        )
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let Some(file_name) = field.file_name().map(upload_base_name) else {
            return Err(bad_request("file part has no file name".to_string()));
        };
        let data = field.bytes().await.map_err(|e| {
            (
                e.status(),
                Json(ErrorResponse {
                    error: e.body_text(),
                }),
            )
        })?;

        let summary = coordinator
            .upload(&file_name, data)
            .await
            .map_err(error_response)?;
        tracing::info!(
            "Uploaded {} ({} bytes, {} chunks) to {:?}",
            summary.file_name,
            summary.size,
            summary.chunk_count,
            summary.nodes_used
        );

        return Ok(Json(UploadResponse {
            message: "File uploaded successfully".to_string(),
            summary,
        }));
    }

    Err(bad_request(format!(
        "multipart field {:?} is missing",
        UPLOAD_FIELD
    )))
}

pub async fn handle_download(
    Extension(coordinator): Extension<Arc<Coordinator>>,
    Path(file_name): Path<String>,
) -> Result<(HeaderMap, Bytes), HandlerError> {
    let data = coordinator
        .download(&file_name)
        .await
        .map_err(error_response)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    let disposition = HeaderValue::from_str(&content_disposition(&file_name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    headers.insert(header::CONTENT_DISPOSITION, disposition);

    Ok((headers, data))
}

pub async fn handle_delete(
    Extension(coordinator): Extension<Arc<Coordinator>>,
    Path(file_name): Path<String>,
) -> Result<Json<DeleteResponse>, HandlerError> {
    let summary = coordinator
        .delete(&file_name)
        .await
        .map_err(error_response)?;

    Ok(Json(DeleteResponse {
        message: format!("File {} deleted", file_name),
        summary,
    }))
}

pub async fn handle_status(
    Extension(coordinator): Extension<Arc<Coordinator>>,
) -> Result<Json<ClusterStatus>, HandlerError> {
    let status = coordinator.status().await.map_err(error_response)?;
    Ok(Json(status))
}

/// Browsers may send a full client-side path; only the last component names
/// the file.
fn upload_base_name(file_name: &str) -> String {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .to_string()
}

/// `filename` carries an ASCII-safe fallback, `filename*` the exact name
/// (RFC 6266).
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            let safe = c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\');
            if safe { c } else { '_' }
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(file_name)
    )
}

fn bad_request(error: String) -> HandlerError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
}

fn error_response(e: CoordinatorError) -> HandlerError {
    let status = match &e {
        CoordinatorError::InvalidFileName(_) => StatusCode::BAD_REQUEST,
        CoordinatorError::InsufficientNodes { .. } => StatusCode::SERVICE_UNAVAILABLE,
        CoordinatorError::FileNotFound(_) => StatusCode::NOT_FOUND,
        CoordinatorError::ChunkUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        CoordinatorError::TooManyChunks(_) => StatusCode::PAYLOAD_TOO_LARGE,
        CoordinatorError::Codec(CodecError::InvalidChunkSize) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        CoordinatorError::Codec(_) => StatusCode::BAD_REQUEST,
        CoordinatorError::Metadata(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!("Request failed: {}", e);
    } else {
        tracing::warn!("Request rejected: {}", e);
    }

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}
