use std::collections::HashMap;

use serde::Serialize;

use crate::core::models::form::{AnswerValue, FileInfo, Form, FormResponse, FormResponseAnswer};
use crate::core::ports::repository::{FormCommon, ResponseCommon, ResponseEvent};
use crate::core::ports::uploader::Uploader;
use crate::error::Error;

/// A response joined with the title of the form it answers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedResponse {
    #[serde(flatten)]
    pub response: FormResponse,
    pub form_title: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EnhancedEvent {
    Added(EnhancedResponse),
    Modified(EnhancedResponse),
    Removed { id: String },
}

/// Read side of the response collection: an id-keyed form lookup joined onto
/// the response list and the live event feed.
pub struct ResponseViewer {
    forms: HashMap<String, Form>,
}

impl ResponseViewer {
    pub async fn load<S: FormCommon>(store: &S) -> Result<Self, Error> {
        let forms = FormCommon::list(store).await?.into_iter().map(|f| (f.id.clone(), f)).collect();
        Ok(ResponseViewer { forms })
    }

    pub fn form_title(&self, form_id: &str) -> String {
        self.forms.get(form_id).map(|f| f.title.clone()).unwrap_or_else(|| "Unknown Form".into())
    }

    pub fn question_text(&self, form_id: &str, question_id: u32) -> String {
        self.forms
            .get(form_id)
            .and_then(|f| f.questions.iter().find(|q| q.id == question_id))
            .map(|q| q.text.clone())
            .unwrap_or_else(|| "Unknown Question".into())
    }

    pub fn enhance(&self, response: FormResponse) -> EnhancedResponse {
        let form_title = self.form_title(&response.form_id);
        EnhancedResponse { response, form_title }
    }

    pub fn enhance_event(&self, event: ResponseEvent) -> EnhancedEvent {
        match event {
            ResponseEvent::Added(r) => EnhancedEvent::Added(self.enhance(r)),
            ResponseEvent::Modified(r) => EnhancedEvent::Modified(self.enhance(r)),
            ResponseEvent::Removed { id } => EnhancedEvent::Removed { id },
        }
    }

    /// Current snapshot of all responses, joined with their form titles.
    pub async fn responses<S: ResponseCommon>(&self, store: &S) -> Result<Vec<EnhancedResponse>, Error> {
        let responses = ResponseCommon::list(store).await?;
        Ok(responses.into_iter().map(|r| self.enhance(r)).collect())
    }
}

/// Pure rendering of one answer for a listing.
pub fn format_answer(answer: &FormResponseAnswer) -> String {
    match &answer.answer {
        None => "No answer".into(),
        Some(AnswerValue::Bool(b)) => if *b { "Yes" } else { "No" }.into(),
        Some(AnswerValue::Selection(items)) => items.join(", "),
        Some(AnswerValue::Text(s)) => match &answer.file_info {
            Some(info) => uploaded_name(info),
            None => s.clone(),
        },
        Some(AnswerValue::Number(n)) => match &answer.file_info {
            Some(info) => uploaded_name(info),
            None => n.to_string(),
        },
    }
}

fn uploaded_name(info: &FileInfo) -> String {
    if info.name.is_empty() {
        "Uploaded File".into()
    } else {
        info.name.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileDisposition {
    Inline,
    Attachment,
}

const VIEWABLE_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];
const VIEWABLE_PDF_TYPES: [&str; 1] = ["application/pdf"];

/// Known image and PDF types open inline; everything else is handed out as a
/// forced download.
pub fn file_disposition(content_type: &str) -> FileDisposition {
    if VIEWABLE_IMAGE_TYPES.contains(&content_type) || VIEWABLE_PDF_TYPES.contains(&content_type) {
        FileDisposition::Inline
    } else {
        FileDisposition::Attachment
    }
}

/// Deletes the response document and any files its answers reference. A file
/// that is already gone is not an error.
pub async fn delete_response<S, U>(store: &S, uploader: &U, response_id: &str) -> Result<u64, Error>
where
    S: ResponseCommon,
    U: Uploader,
{
    let response = ResponseCommon::get(store, response_id).await?;
    let deleted = ResponseCommon::delete(store, &response.id).await?;
    for info in response.answers.iter().filter_map(|a| a.file_info.as_ref()) {
        match uploader.delete(&info.path).await {
            Ok(()) => {}
            Err(Error::NotFound(_)) => log::info!("file {} already deleted or does not exist", info.path),
            Err(e) => log::error!("file deletion error for {}: {}", info.path, e),
        }
    }
    Ok(deleted)
}
