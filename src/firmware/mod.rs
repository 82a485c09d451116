use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use crate::store::{StoreError, UploadBatch, UploadFile};
use crate::AppState;

/// Hard cap on the total add-files payload, matching the original contract.
pub const MAX_UPLOAD_BYTES: usize = 50_000_000;

pub fn routes() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/files", axum::routing::get(list_files))
        .route("/remove-file", axum::routing::post(remove_file))
        .route(
            "/add-files",
            axum::routing::post(add_files).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}

#[derive(Debug, Deserialize)]
struct RemoveFileRequest {
    filename: String,
}

/// GET /firmware/files
/// List every artifact name across both store directories
async fn list_files(State(state): State<AppState>) -> impl IntoResponse {
    debug!("Running /firmware/files");

    match state.store.list().await {
        Ok(files) => Ok(Json(files)),
        Err(e) => Err(store_error(e)),
    }
}

/// POST /firmware/remove-file
/// Delete one artifact by name, firmware directory checked first
async fn remove_file(
    State(state): State<AppState>,
    Json(req): Json<RemoveFileRequest>,
) -> impl IntoResponse {
    debug!("Running /firmware/remove-file for {}", req.filename);

    match state.store.remove(&req.filename).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(e) => Err(store_error(e)),
    }
}

/// POST /firmware/add-files
/// Accept a multipart batch under the `files` field and write every member
/// into its suffix-determined directory
async fn add_files(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut batch = UploadBatch::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return (e.status(), e.to_string()).into_response(),
        };
        if field.name() != Some("files") {
            continue;
        }

        // A part without a filename cannot be classified.
        let name = match field.file_name() {
            Some(name) => name.to_string(),
            None => {
                return store_error(StoreError::UnsupportedArtifactType {
                    name: "<missing filename>".to_string(),
                })
                .into_response();
            }
        };

        match field.bytes().await {
            Ok(data) => batch.files.push(UploadFile { name, data }),
            Err(e) => return (e.status(), e.to_string()).into_response(),
        }
    }

    // Log names only, never file contents.
    let names: Vec<&str> = batch.files.iter().map(|f| f.name.as_str()).collect();
    debug!("Running /firmware/add-files with {:?}", names);

    match state.store.write_batch(batch).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => store_error(e).into_response(),
    }
}

/// Map a store error to its HTTP status and the standard error body shape.
fn store_error(err: StoreError) -> (StatusCode, Json<serde_json::Value>) {
    let (status, code) = match &err {
        StoreError::UnsupportedArtifactType { .. } => {
            (StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported_artifact_type")
        }
        // Not-found stays a 500 to preserve the remove-file status contract.
        StoreError::ArtifactNotFound { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "artifact_not_found")
        }
        StoreError::StorageUnavailable(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "storage_unavailable")
        }
        StoreError::StorageWriteFailure { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "storage_write_failure")
        }
    };

    if status.is_server_error() {
        tracing::error!("{}", err);
    }

    (
        status,
        Json(serde_json::json!({
            "error": code,
            "message": err.to_string()
        })),
    )
}
