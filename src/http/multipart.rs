//! Multipart intake.
//!
//! Every matching file is read to completion before anything is forwarded;
//! a failure on any one of them fails the whole request.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;

use crate::error::GatewayError;
use crate::forward::Upload;

/// Read every part named `field`, in arrival order. Other parts are skipped.
pub async fn read_uploads(multipart: &mut Multipart, field: &str) -> Result<Vec<Upload>, GatewayError> {
    let mut uploads = Vec::new();
    while let Some(upload) = next_upload(multipart, field).await? {
        uploads.push(upload);
    }
    Ok(uploads)
}

/// Read the first part named `field`. The rest of the body is left unread.
pub async fn read_single_upload(multipart: &mut Multipart, field: &str) -> Result<Upload, GatewayError> {
    next_upload(multipart, field)
        .await?
        .ok_or_else(|| GatewayError::ClientInput(format!("Missing file field '{field}'")))
}

async fn next_upload(multipart: &mut Multipart, field: &str) -> Result<Option<Upload>, GatewayError> {
    while let Some(part) = multipart.next_field().await.map_err(read_failed)? {
        if part.name() != Some(field) {
            tracing::debug!(name = ?part.name(), "Skipping unrelated multipart field");
            continue;
        }
        return read_part(part).await.map(Some);
    }
    Ok(None)
}

async fn read_part(part: Field<'_>) -> Result<Upload, GatewayError> {
    let filename = part.file_name().map(str::to_string);
    let content_type = part.content_type().map(str::to_string);
    let data = part.bytes().await.map_err(read_failed)?;
    Ok(Upload::new(filename, content_type, data))
}

fn read_failed(err: MultipartError) -> GatewayError {
    // A body without Content-Length only hits the size limit mid-stream.
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(error = %err, "Upload exceeds the body limit");
        return GatewayError::PayloadTooLarge(err.body_text());
    }
    tracing::warn!(error = %err, "Failed to read multipart body");
    GatewayError::ClientInput(format!("Failed to read uploaded file: {}", err.body_text()))
}
