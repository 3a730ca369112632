//! Handler for `POST /v1/upload`.
//!
//! Every `file` field of the multipart form is sniffed and must be a JPEG
//! or PNG image. Accepted files are written to the upload directory under
//! a stamp-based name and served back from `/v1/images/`. A batch is all
//! or nothing: the first rejected file removes the ones already written.

use std::path::PathBuf;

use axum::extract::{Multipart, State};
use axum::Json;
use indexmap::IndexMap;
use misarfeh_core::upload::sniff_image;

use crate::error::{AppError, AppResult};
use crate::response::Envelope;
use crate::state::AppState;

/// Multipart field carrying an image.
const FILE_FIELD: &str = "file";

/// Largest accepted request body: 32 MiB of files plus form overhead.
pub const UPLOAD_BODY_LIMIT: usize = 32 * 1024 * 1024 + 512;

/// Upload position (`"1"`, `"2"`, ...) to public image URL.
pub type ImageUrls = IndexMap<String, String>;

/// POST /v1/upload
pub async fn upload_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<Envelope<ImageUrls>>> {
    let mut written = Vec::new();

    match store_files(&state, &mut multipart, &mut written).await {
        Ok(urls) => {
            tracing::info!(count = urls.len(), "Images uploaded");
            Ok(Json(Envelope::new("img_urls", urls)))
        }
        Err(err) => {
            remove_files(&written).await;
            Err(err)
        }
    }
}

/// Write each `file` field to disk, recording every path in `written` as
/// soon as it exists so the caller can undo a partial batch.
async fn store_files(
    state: &AppState,
    multipart: &mut Multipart,
    written: &mut Vec<PathBuf>,
) -> AppResult<ImageUrls> {
    let upload_dir = &state.config.upload_dir;
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("creating upload dir: {e}")))?;

    let mut urls = ImageUrls::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;

        let kind = sniff_image(&data).ok_or_else(|| {
            AppError::BadRequest(format!(
                "file '{original}' is not a supported image (only JPEG and PNG are accepted)"
            ))
        })?;

        let stored_name = state.upload_namer.file_name(&original, kind);
        write_file(upload_dir.join(&stored_name), &data, written).await?;

        tracing::debug!(file = %stored_name, mime = kind.mime_type(), "Stored upload");

        let position = urls.len() + 1;
        urls.insert(
            position.to_string(),
            format!("{}/v1/images/{stored_name}", state.config.public_base_url),
        );
    }

    if urls.is_empty() {
        return Err(AppError::BadRequest(format!(
            "at least one '{FILE_FIELD}' field must be provided"
        )));
    }

    Ok(urls)
}

/// Record `path` in `written` before writing, so a write that fails midway
/// still leaves its partial file for [`remove_files`].
async fn write_file(path: PathBuf, data: &[u8], written: &mut Vec<PathBuf>) -> AppResult<()> {
    written.push(path);
    let path = &written[written.len() - 1];
    tokio::fs::write(path, data)
        .await
        .map_err(|e| AppError::InternalError(format!("writing {}: {e}", path.display())))
}

async fn remove_files(paths: &[PathBuf]) {
    for path in paths {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove upload");
            }
        }
    }
}
