use serde::Serialize;
use tokio::sync::broadcast;

use crate::core::models::form::{Form, FormResponse};
use crate::core::models::registration::{Author, Paper, Speaker, UserInsert};
use crate::error::Error;

/// One change to the response collection, in the shape a live subscriber
/// consumes them.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResponseEvent {
    Added(FormResponse),
    Modified(FormResponse),
    Removed { id: String },
}

pub trait FormCommon {
    /// Create-or-merge by id. An existing document keeps its `created_at`.
    async fn upsert(&self, form: &Form) -> Result<(), Error>;
    async fn get(&self, id: &str) -> Result<Form, Error>;
    /// All forms, oldest first.
    async fn list(&self) -> Result<Vec<Form>, Error>;
    async fn delete(&self, id: &str) -> Result<u64, Error>;
}

pub trait ResponseCommon {
    async fn insert(&self, response: &FormResponse) -> Result<(), Error>;
    async fn get(&self, id: &str) -> Result<FormResponse, Error>;
    async fn update(&self, response: &FormResponse) -> Result<(), Error>;
    /// All responses, most recent first.
    async fn list(&self) -> Result<Vec<FormResponse>, Error>;
    async fn delete(&self, id: &str) -> Result<u64, Error>;
    fn subscribe(&self) -> broadcast::Receiver<ResponseEvent>;
}

pub trait UserCommon {
    async fn insert(&self, user: &UserInsert) -> Result<(), Error>;
    async fn email_exists(&self, email: &str) -> Result<bool, Error>;
}

pub trait RegistrationCommon {
    async fn insert_author(&self, author: &Author) -> Result<(), Error>;
    async fn insert_speaker(&self, speaker: &Speaker) -> Result<(), Error>;
    async fn insert_paper(&self, paper: &Paper) -> Result<(), Error>;
}

pub trait Store: FormCommon + ResponseCommon + UserCommon + RegistrationCommon {}
