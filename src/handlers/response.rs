use actix_multipart::Multipart;
use actix_web::web::{Data, Json, Path};
use actix_web::HttpResponse;
use bytes::Bytes;
use futures::stream;
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;

use crate::core::models::form::{AnswerValue, FormResponse};
use crate::core::ports::repository::{FormCommon, ResponseCommon};
use crate::core::ports::uploader::{FileUpload, Uploader};
use crate::core::services::collector::ResponseCollector;
use crate::core::services::viewer::{self, EnhancedResponse, ResponseViewer};
use crate::error::Error;
use crate::handlers::collect_parts;
use crate::response::{CreateResponse, DeleteResponse, List};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePayload {
    #[serde(default)]
    answers: Vec<AnswerField>,
    #[serde(default)]
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerField {
    question_id: u32,
    #[serde(default)]
    answer: Option<AnswerValue>,
}

/// Splits a multipart submission into the `response` JSON document and the
/// `file_{question_id}` binaries.
async fn parse_submission(payload: Multipart) -> Result<(ResponsePayload, Vec<(u32, FileUpload)>), Error> {
    let mut document = None;
    let mut files = Vec::new();
    for (name, part) in collect_parts(payload).await? {
        if name == "response" {
            document = Some(serde_json::from_slice(&part.content)?);
        } else if let Some(id) = name.strip_prefix("file_") {
            let question_id = id
                .parse()
                .map_err(|_| Error::Validation(format!("invalid file field {}", name)))?;
            files.push((question_id, part));
        }
    }
    Ok((document.unwrap_or_default(), files))
}

fn fill_collector(collector: &mut ResponseCollector, document: ResponsePayload, files: Vec<(u32, FileUpload)>) -> Result<(), Error> {
    collector.set_user_id(document.user_id);
    for field in document.answers {
        collector.set_answer(field.question_id, field.answer)?;
    }
    for (question_id, file) in files {
        collector.attach_file(question_id, file)?;
    }
    Ok(())
}

pub async fn submit<S, U>(form_id: Path<(String,)>, payload: Multipart, store: Data<S>, uploader: Data<U>) -> Result<Json<CreateResponse>, Error>
where
    S: FormCommon + ResponseCommon,
    U: Uploader,
{
    let (document, files) = parse_submission(payload).await?;
    let mut collector = ResponseCollector::load(store.get_ref(), &form_id.into_inner().0).await?;
    fill_collector(&mut collector, document, files)?;
    let response = collector.submit(store.get_ref(), uploader.get_ref()).await?;
    Ok(Json(CreateResponse { id: response.id }))
}

pub async fn update<S, U>(path: Path<(String, String)>, payload: Multipart, store: Data<S>, uploader: Data<U>) -> Result<Json<CreateResponse>, Error>
where
    S: FormCommon + ResponseCommon,
    U: Uploader,
{
    let (form_id, response_id) = path.into_inner();
    let (document, files) = parse_submission(payload).await?;
    let mut collector = ResponseCollector::load(store.get_ref(), &form_id).await?;
    collector.lookup_response(store.get_ref(), &response_id).await?;
    fill_collector(&mut collector, document, files)?;
    let response = collector.submit(store.get_ref(), uploader.get_ref()).await?;
    Ok(Json(CreateResponse { id: response.id }))
}

pub async fn detail<S>(path: Path<(String, String)>, store: Data<S>) -> Result<Json<FormResponse>, Error>
where
    S: FormCommon + ResponseCommon,
{
    let (form_id, response_id) = path.into_inner();
    let mut collector = ResponseCollector::load(store.get_ref(), &form_id).await?;
    let response = collector.lookup_response(store.get_ref(), &response_id).await?;
    Ok(Json(response))
}

pub async fn list<S>(store: Data<S>) -> Result<Json<List<EnhancedResponse>>, Error>
where
    S: FormCommon + ResponseCommon,
{
    let viewer = ResponseViewer::load(store.get_ref()).await?;
    let responses = viewer.responses(store.get_ref()).await?;
    let total = responses.len() as i64;
    Ok(Json(List::new(responses, total)))
}

/// Server-sent events feed of response changes, joined with form titles the
/// same way the listing is. A lagging subscriber skips the missed events and
/// keeps streaming.
pub async fn live<S>(store: Data<S>) -> Result<HttpResponse, Error>
where
    S: FormCommon + ResponseCommon,
{
    let viewer = ResponseViewer::load(store.get_ref()).await?;
    let receiver = store.subscribe();
    let events = stream::unfold((receiver, viewer), |(mut receiver, viewer)| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let enhanced = viewer.enhance_event(event);
                    match serde_json::to_string(&enhanced) {
                        Ok(data) => {
                            let chunk = Bytes::from(format!("data: {}\n\n", data));
                            return Some((Ok::<_, Error>(chunk), (receiver, viewer)));
                        }
                        Err(e) => {
                            log::error!("failed to serialize response event: {}", e);
                            continue;
                        }
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("live response feed lagged, skipped {} events", skipped);
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });
    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(events))
}

pub async fn delete<S, U>(response_id: Path<(String,)>, store: Data<S>, uploader: Data<U>) -> Result<Json<DeleteResponse>, Error>
where
    S: ResponseCommon,
    U: Uploader,
{
    let deleted = viewer::delete_response(store.get_ref(), uploader.get_ref(), &response_id.into_inner().0).await?;
    Ok(Json(DeleteResponse::new(deleted)))
}
