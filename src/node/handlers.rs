use axum::{
    Json,
    body::Bytes,
    extract::{Extension, Path, Query},
    http::StatusCode,
};
use std::sync::Arc;

use super::protocol::{ChunkStatusResponse, ErrorResponse, HealthResponse, StoreChunkParams};
use super::service::NodeService;
use super::store::ChunkStoreError;

type HandlerError = (StatusCode, Json<ErrorResponse>);

pub async fn handle_store_chunk(
    Extension(node): Extension<Arc<NodeService>>,
    Query(params): Query<StoreChunkParams>,
    body: Bytes,
) -> Result<Json<ChunkStatusResponse>, HandlerError> {
    match node.store.store(&params.filename, &body).await {
        Ok(()) => Ok(Json(ChunkStatusResponse {
            status: "stored".to_string(),
        })),
        Err(e) => Err(store_error(&params.filename, e)),
    }
}

pub async fn handle_get_chunk(
    Extension(node): Extension<Arc<NodeService>>,
    Path(filename): Path<String>,
) -> Result<Bytes, HandlerError> {
    match node.store.fetch(&filename).await {
        Ok(Some(data)) => Ok(data),
        Ok(None) => Err(not_found(&filename)),
        Err(e) => Err(store_error(&filename, e)),
    }
}

pub async fn handle_delete_chunk(
    Extension(node): Extension<Arc<NodeService>>,
    Path(filename): Path<String>,
) -> Result<Json<ChunkStatusResponse>, HandlerError> {
    match node.store.delete(&filename).await {
        Ok(true) => {
            tracing::debug!("Deleted chunk {}", filename);
            Ok(Json(ChunkStatusResponse {
                status: "deleted".to_string(),
            }))
        }
        Ok(false) => Err(not_found(&filename)),
        Err(e) => Err(store_error(&filename, e)),
    }
}

pub async fn handle_health(Extension(node): Extension<Arc<NodeService>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        registration: node.registration_state().await,
    })
}

fn not_found(filename: &str) -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("chunk not found: {}", filename),
        }),
    )
}

fn store_error(filename: &str, e: ChunkStoreError) -> HandlerError {
    let status = match &e {
        ChunkStoreError::InvalidChunkName(_) => {
            tracing::warn!("Rejected chunk name {:?}", filename);
            StatusCode::BAD_REQUEST
        }
        ChunkStoreError::Io(_) => {
            tracing::error!("Chunk storage failure for {}: {}", filename, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}
