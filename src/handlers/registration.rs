use actix_multipart::Multipart;
use actix_web::web::{Data, Json};

use crate::core::ports::repository::{RegistrationCommon, UserCommon};
use crate::core::ports::uploader::Uploader;
use crate::core::services::registration::{register, RegistrationOutcome, RegistrationRequest};
use crate::error::Error;
use crate::handlers::collect_parts;

/// Multipart registration: a `registration` JSON part plus an optional
/// `paper` binary for authors submitting a document up front.
pub async fn create<S, U>(payload: Multipart, store: Data<S>, uploader: Data<U>) -> Result<Json<RegistrationOutcome>, Error>
where
    S: UserCommon + RegistrationCommon,
    U: Uploader,
{
    let mut request: Option<RegistrationRequest> = None;
    let mut paper_file = None;
    for (name, part) in collect_parts(payload).await? {
        match name.as_str() {
            "registration" => request = Some(serde_json::from_slice(&part.content)?),
            "paper" => paper_file = Some(part),
            _ => {}
        }
    }
    let request = request.ok_or_else(|| Error::Validation("missing registration details".into()))?;
    let outcome = register(store.get_ref(), uploader.get_ref(), request, paper_file).await?;
    Ok(Json(outcome))
}
