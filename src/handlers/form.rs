use actix_web::web::{Data, Json, Path};
use serde::Serialize;

use crate::core::models::form::Form;
use crate::core::ports::repository::FormCommon;
use crate::core::services::builder::{delete_form, share_link, FormBuilder};
use crate::error::Error;
use crate::response::{DeleteResponse, List};
use crate::PublicBaseUrl;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedForm {
    pub id: String,
    pub link: String,
}

pub async fn create<S: FormCommon>(Json(mut builder): Json<FormBuilder>, store: Data<S>, base: Data<PublicBaseUrl>) -> Result<Json<SavedForm>, Error> {
    let form = builder.save(store.get_ref()).await?;
    Ok(Json(SavedForm {
        link: share_link(&base.0, &form.id),
        id: form.id,
    }))
}

pub async fn update<S: FormCommon>(
    form_id: Path<(String,)>,
    Json(mut builder): Json<FormBuilder>,
    store: Data<S>,
    base: Data<PublicBaseUrl>,
) -> Result<Json<SavedForm>, Error> {
    let stored = FormCommon::get(store.get_ref(), &form_id.into_inner().0).await?;
    builder.edit_existing(&stored);
    let form = builder.save(store.get_ref()).await?;
    Ok(Json(SavedForm {
        link: share_link(&base.0, &form.id),
        id: form.id,
    }))
}

pub async fn detail<S: FormCommon>(form_id: Path<(String,)>, store: Data<S>) -> Result<Json<Form>, Error> {
    let form = FormCommon::get(store.get_ref(), &form_id.into_inner().0).await?;
    Ok(Json(form))
}

pub async fn list<S: FormCommon>(store: Data<S>) -> Result<Json<List<Form>>, Error> {
    let forms = FormCommon::list(store.get_ref()).await?;
    let total = forms.len() as i64;
    Ok(Json(List::new(forms, total)))
}

pub async fn delete<S: FormCommon>(form_id: Path<(String,)>, store: Data<S>) -> Result<Json<DeleteResponse>, Error> {
    let deleted = delete_form(store.get_ref(), &form_id.into_inner().0).await?;
    if deleted == 0 {
        return Err(Error::NotFound("form".into()));
    }
    Ok(Json(DeleteResponse::new(deleted)))
}
