pub mod file;
pub mod form;
pub mod registration;
pub mod response;

use actix_multipart::Multipart;
use futures_util::TryStreamExt;

use crate::core::ports::uploader::FileUpload;
use crate::error::Error;

/// Drains a multipart payload into named parts. JSON parts come through the
/// same way as binaries; callers pick them apart by field name.
pub(crate) async fn collect_parts(mut payload: Multipart) -> Result<Vec<(String, FileUpload)>, Error> {
    let mut parts = Vec::new();
    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().to_owned();
        let file_name = field.content_disposition().get_filename().unwrap_or_default().to_owned();
        let content_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_owned());
        let mut content = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            content.extend_from_slice(&chunk);
        }
        parts.push((
            name,
            FileUpload {
                name: file_name,
                content_type,
                content,
            },
        ));
    }
    Ok(parts)
}
