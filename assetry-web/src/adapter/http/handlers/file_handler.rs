use std::path::Path as FsPath;

use crate::adapter::http::handlers::crud::current_user;
use crate::adapter::Response;
use crate::config::AppState;
use crate::error::AppError;
use crate::repo::model::attachment;
use crate::service::attachment::AttachmentService;
use axum::extract::{Multipart, Path, State};
use axum::http::HeaderMap;
use axum::Json;
use futures_util::StreamExt;

const FILE_FIELD: &str = "file";

/// Stores every `file` part of the upload and links it to the asset.
pub async fn upload_attachment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(asset_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Response<Vec<attachment::Model>>>, AppError> {
    let user = current_user(&headers);
    let root = FsPath::new(&state.config.server.attachment_path);
    let mut stored = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload.bin").to_string();
        let mut field = field; // 它本身就是一个 Stream
        let mut content = Vec::new();
        while let Some(chunk) = field.next().await {
            content.extend_from_slice(&chunk?);
        }
        stored.push(AttachmentService::store(&state.conn, root, &asset_id, &file_name, &content, &user).await?);
    }
    if stored.is_empty() {
        return Err(AppError::field(FILE_FIELD, "No file was submitted."));
    }
    Ok(Json(Response::success(stored)))
}
