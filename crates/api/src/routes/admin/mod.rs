//! Admin console routes. Every handler takes [`RequireAdmin`].
//!
//! Catalog mutations arrive as `multipart/form-data` because they mix text
//! fields with image uploads; everything else is plain JSON.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::{AppError, Result};

pub mod categories;
pub mod info;
pub mod orders;
pub mod products;
pub mod themes;
pub mod users;

/// One uploaded file from a multipart form.
pub struct UploadedFile {
    /// Form field name the file arrived under.
    pub field: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Drain a multipart form into text fields and uploaded files.
///
/// # Errors
///
/// Returns `AppError::Validation` on a malformed multipart stream.
pub async fn collect_multipart(
    mut multipart: Multipart,
) -> Result<(HashMap<String, String>, Vec<UploadedFile>)> {
    let mut fields = HashMap::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::Validation("Malformed multipart payload".to_owned()))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        if let Some(filename) = field.file_name().map(ToOwned::to_owned) {
            let content_type = field.content_type().map(ToOwned::to_owned);
            let bytes = field
                .bytes()
                .await
                .map_err(|_| AppError::Validation("Malformed multipart payload".to_owned()))?;
            files.push(UploadedFile {
                field: name,
                filename,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|_| AppError::Validation("Malformed multipart payload".to_owned()))?;
            fields.insert(name, value);
        }
    }

    Ok((fields, files))
}
