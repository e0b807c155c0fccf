//! Multipart form extraction for file uploads.

use axum::extract::Multipart;
use bytes::Bytes;
use clipdock_core::AppError;

/// A file pulled out of a multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    pub media_type: String,
    pub bytes: Bytes,
}

/// Read exactly one file from the named multipart field.
///
/// Other fields are ignored. A missing field or a second occurrence of the
/// named field is rejected, so clients can't smuggle two files into one
/// upload.
pub async fn read_file_field(
    mut multipart: Multipart,
    field_name: &str,
) -> Result<UploadedFile, AppError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some(field_name) {
            continue;
        }
        if file.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Multiple '{}' fields are not allowed; send exactly one",
                field_name
            )));
        }

        let media_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

        file = Some(UploadedFile { media_type, bytes });
    }

    file.ok_or_else(|| AppError::InvalidInput(format!("No '{}' file provided", field_name)))
}
