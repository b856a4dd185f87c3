//! Upload receiver: stores the file, runs the transcode job, reports the result.

use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinError;
use tracing::{error, info};
use uuid::Uuid;

use ladderline_core::{JobId, TranscodeError};

use crate::metrics::UPLOAD_BYTES;
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const NO_FILE: &str = "No file provided";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    /// `<public>/uploads/<output_subdir>/<jobId>`
    pub video_url: String,
    pub job_id: JobId,
    pub renditions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub stage: String,
    pub detail: String,
}

/// Failure of an upload request, rendered as JSON.
#[derive(Debug)]
pub struct UploadError {
    status: StatusCode,
    body: ErrorResponse,
}

impl UploadError {
    fn new(status: StatusCode, message: &str, stage: &str, detail: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                message: message.to_string(),
                stage: stage.to_string(),
                detail: detail.into(),
            },
        }
    }

    fn bad_request(message: &str, detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "upload", detail)
    }

    fn storage(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error processing video",
            "upload",
            detail,
        )
    }
}

impl From<TranscodeError> for UploadError {
    fn from(err: TranscodeError) -> Self {
        if err.is_client_error() {
            Self::new(
                StatusCode::BAD_REQUEST,
                "Invalid video resolution",
                err.stage(),
                err.to_string(),
            )
        } else {
            Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error processing video",
                err.stage(),
                err.detail(),
            )
        }
    }
}

/// The job task died before reporting a stage.
impl From<JoinError> for UploadError {
    fn from(err: JoinError) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error processing video",
            "job",
            err.to_string(),
        )
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// POST /upload
///
/// Multipart form with a single `file` field. The job runs on its own task,
/// so it finishes even if the client goes away.
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, UploadError> {
    let mut saved: Option<PathBuf> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::bad_request("Malformed upload", e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) || saved.is_some() {
            continue;
        }

        let path = state
            .uploads_dir()
            .join(upload_file_name(field.file_name()));
        let bytes = save_field(field, &path).await?;
        UPLOAD_BYTES.with_label_values(&[]).observe(bytes as f64);
        info!(path = %path.display(), bytes, "Upload stored");
        saved = Some(path);
    }

    let input = saved.ok_or_else(|| UploadError::bad_request(NO_FILE, "No file provided"))?;

    let job_id = JobId::new();
    let pipeline = state.pipeline();
    let task_job_id = job_id.clone();
    let job = tokio::spawn(async move { pipeline.process(&input, &task_job_id).await });

    let outcome = job
        .await
        .map_err(|e| {
            error!(job_id = %job_id, error = %e, "Transcode task panicked");
            UploadError::from(e)
        })??;

    Ok(Json(UploadResponse {
        message: "uploaded".to_string(),
        video_url: outcome.base_url,
        job_id: outcome.job_id,
        renditions: outcome.renditions,
    }))
}

/// `file-<uuid><.ext>`, keeping the original extension when it is plain.
fn upload_file_name(original: Option<&str>) -> String {
    let extension = original
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();
    format!("file-{}{}", Uuid::new_v4(), extension)
}

/// Streams a multipart field to `path`, returning the number of bytes written.
async fn save_field(mut field: Field<'_>, path: &Path) -> Result<u64, UploadError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| UploadError::storage(format!("Failed to create upload directory: {}", e)))?;
    }

    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| UploadError::storage(format!("Failed to create upload file: {}", e)))?;

    let mut written: u64 = 0;
    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                drop(file);
                let _ = tokio::fs::remove_file(path).await;
                return Err(UploadError::bad_request("Malformed upload", format!("Failed to read upload: {}", e)));
            }
        };
        file.write_all(&chunk)
            .await
            .map_err(|e| UploadError::storage(format!("Failed to write upload: {}", e)))?;
        written += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|e| UploadError::storage(format!("Failed to write upload: {}", e)))?;

    if written == 0 {
        let _ = tokio::fs::remove_file(path).await;
        return Err(UploadError::bad_request(NO_FILE, "Uploaded file is empty"));
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_file_name_keeps_extension() {
        let name = upload_file_name(Some("lecture 01.MP4"));
        assert!(name.starts_with("file-"));
        assert!(name.ends_with(".mp4"));
    }

    #[test]
    fn test_upload_file_name_drops_odd_extension() {
        assert!(!upload_file_name(Some("x.m p4")).contains(' '));
        assert!(!upload_file_name(None).contains('.'));
        assert!(!upload_file_name(Some("../../etc/passwd")).contains('/'));
    }

    #[test]
    fn test_client_errors_map_to_bad_request() {
        use ladderline_core::{LadderError, Resolution, SourceResolution};

        let err: UploadError = TranscodeError::from(LadderError::UnsupportedResolution {
            found: SourceResolution::new(200, 100),
            lowest: Resolution::new("320p", 512, 320),
        })
        .into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.message, "Invalid video resolution");
        assert_eq!(err.body.stage, "resolve");
    }

    #[test]
    fn test_server_errors_map_to_internal_error() {
        use ladderline_core::EncodeError;

        let err: UploadError =
            TranscodeError::from(EncodeError::failed(Some(1), "Invalid argument")).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body.message, "Error processing video");
        assert_eq!(err.body.stage, "encode");
        assert_eq!(err.body.detail, "Invalid argument");
    }

    #[tokio::test]
    async fn test_panicked_job_is_not_tagged_with_a_stage() {
        let join_err = tokio::spawn(async { panic!("probe blew up") })
            .await
            .unwrap_err();

        let err = UploadError::from(join_err);
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body.message, "Error processing video");
        assert_eq!(err.body.stage, "job");
    }
}
