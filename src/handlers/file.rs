use actix_web::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION};
use actix_web::web::{Data, Path};
use actix_web::HttpResponse;

use crate::core::ports::uploader::Uploader;
use crate::core::services::viewer::{file_disposition, FileDisposition};
use crate::error::Error;

/// Content type recovered from the stored extension. Uploads carry their
/// declared type only inside the response document, not in the blob path.
fn content_type_for(path: &str) -> &'static str {
    let extension = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();
    match extension.to_ascii_lowercase().as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "zip" => "application/zip",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit_once('/').map(|(_, name)| name).unwrap_or(path)
}

async fn serve<U: Uploader>(uploader: &U, path: &str, forced: Option<FileDisposition>) -> Result<HttpResponse, Error> {
    let content = uploader.get(path).await?;
    let content_type = content_type_for(path);
    let disposition = forced.unwrap_or_else(|| file_disposition(content_type));
    let header = match disposition {
        FileDisposition::Inline => "inline".to_owned(),
        FileDisposition::Attachment => format!("attachment; filename=\"{}\"", file_name(path)),
    };
    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((CONTENT_DISPOSITION, header))
        .insert_header((CACHE_CONTROL, "private, max-age=3600"))
        .body(content))
}

/// Opens viewable types (images, PDFs) in the browser; anything else falls
/// back to a download.
pub async fn view<U: Uploader>(path: Path<(String,)>, uploader: Data<U>) -> Result<HttpResponse, Error> {
    serve(uploader.get_ref(), &path.into_inner().0, None).await
}

pub async fn download<U: Uploader>(path: Path<(String,)>, uploader: Data<U>) -> Result<HttpResponse, Error> {
    serve(uploader.get_ref(), &path.into_inner().0, Some(FileDisposition::Attachment)).await
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(content_type_for("form-uploads/f1/1700000000000_ab12c.pdf"), "application/pdf");
        assert_eq!(content_type_for("papers/u1/slides.PNG"), "image/png");
        assert_eq!(content_type_for("no-extension"), "application/octet-stream");
    }

    #[test]
    fn test_file_name_is_last_segment() {
        assert_eq!(file_name("papers/u1/paper.pdf"), "paper.pdf");
        assert_eq!(file_name("bare.pdf"), "bare.pdf");
    }
}
