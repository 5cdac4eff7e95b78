//! Handlers for the `/analyses` resource: upload and the caller's records.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use deepguard_core::error::CoreError;
use deepguard_core::types::DbId;
use deepguard_core::upload::{validate_content_type, validate_size};
use deepguard_db::models::video_analysis::VideoAnalysis;
use serde::Serialize;

use crate::analysis::UploadedVideo;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of a `202 Accepted` upload response.
#[derive(Debug, Serialize)]
pub struct UploadAccepted {
    pub analysis: VideoAnalysis,
    /// Always `"analyzing"`: the verdict arrives later.
    pub state: &'static str,
}

/// POST /api/v1/analyses
///
/// Accepts a multipart upload with a `file` field. The content type is
/// checked from the field header before the body is read, and the size is
/// checked while streaming, so invalid uploads are rejected early.
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadAccepted>>)> {
    let mut video: Option<UploadedVideo> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some("file") {
            continue; // ignore unknown fields
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        validate_content_type(content_type.as_deref())?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(multipart_error)?
        {
            validate_size((bytes.len() + chunk.len()) as u64)?;
            bytes.extend_from_slice(&chunk);
        }

        video = Some(UploadedVideo {
            file_name,
            content_type: content_type.unwrap_or_default(),
            bytes,
        });
    }

    let video =
        video.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    let analysis = state.uploads.submit(auth.user_id, video).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: UploadAccepted {
                analysis,
                state: "analyzing",
            },
        }),
    ))
}

/// A body over the route's byte limit counts as an oversized file.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::Core(CoreError::Validation(
            "File too large. Please select a video smaller than 100MB".into(),
        ));
    }
    AppError::BadRequest(err.body_text())
}

/// GET /api/v1/analyses
///
/// The caller's records, newest first.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<VideoAnalysis>>>> {
    let analyses = state.analyses.list_for_user(auth.user_id).await?;
    Ok(Json(DataResponse { data: analyses }))
}

/// GET /api/v1/analyses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<VideoAnalysis>>> {
    let analysis = state
        .analyses
        .find_for_user(auth.user_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "VideoAnalysis",
            id,
        }))?;
    Ok(Json(DataResponse { data: analysis }))
}
