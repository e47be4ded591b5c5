use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{query, query_as, query_scalar, FromRow, PgPool};
use tokio::sync::broadcast;

use crate::core::models::form::{Form, FormQuestion, FormResponse, FormResponseAnswer, ResponseStatus};
use crate::core::models::registration::{Author, Paper, Speaker, UserInsert};
use crate::core::ports::repository::{FormCommon, RegistrationCommon, ResponseCommon, ResponseEvent, Store, UserCommon};
use crate::error::Error;

/// Document store over Postgres. Question and answer documents are kept as
/// JSONB so stored forms round-trip byte-for-byte through serde. Writes to
/// the response collection are fanned out on a broadcast channel for live
/// subscribers.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    events: broadcast::Sender<ResponseEvent>,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        let (events, _) = broadcast::channel(64);
        PgStore { pool, events }
    }
}

#[derive(FromRow)]
struct FormRow {
    id: String,
    title: String,
    description: String,
    is_author: bool,
    is_paper: bool,
    is_speaker: bool,
    questions: Json<Vec<FormQuestion>>,
    created_at: DateTime<Utc>,
}

impl From<FormRow> for Form {
    fn from(row: FormRow) -> Self {
        Form {
            id: row.id,
            title: row.title,
            description: row.description,
            is_author: row.is_author,
            is_paper: row.is_paper,
            is_speaker: row.is_speaker,
            questions: row.questions.0,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct ResponseRow {
    id: String,
    form_id: String,
    user_id: Option<String>,
    answers: Json<Vec<FormResponseAnswer>>,
    submitted_at: DateTime<Utc>,
    status: String,
}

impl TryFrom<ResponseRow> for FormResponse {
    type Error = Error;

    fn try_from(row: ResponseRow) -> Result<Self, Error> {
        let status = ResponseStatus::parse(&row.status).ok_or_else(|| Error::ServerError(format!("unknown response status {}", row.status)))?;
        Ok(FormResponse {
            id: row.id,
            form_id: row.form_id,
            user_id: row.user_id,
            answers: row.answers.0,
            submitted_at: row.submitted_at,
            status,
        })
    }
}

impl FormCommon for PgStore {
    async fn upsert(&self, form: &Form) -> Result<(), Error> {
        query(
            "
        INSERT INTO forms (id, title, description, is_author, is_paper, is_speaker, questions, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id) DO UPDATE SET
            title = EXCLUDED.title,
            description = EXCLUDED.description,
            is_author = EXCLUDED.is_author,
            is_paper = EXCLUDED.is_paper,
            is_speaker = EXCLUDED.is_speaker,
            questions = EXCLUDED.questions",
        )
        .bind(&form.id)
        .bind(&form.title)
        .bind(&form.description)
        .bind(form.is_author)
        .bind(form.is_paper)
        .bind(form.is_speaker)
        .bind(Json(&form.questions))
        .bind(form.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Form, Error> {
        let row: Option<FormRow> = query_as("SELECT * FROM forms WHERE id = $1").bind(id).fetch_optional(&self.pool).await?;
        row.map(Form::from).ok_or_else(|| Error::NotFound("form".into()))
    }

    async fn list(&self) -> Result<Vec<Form>, Error> {
        let rows: Vec<FormRow> = query_as("SELECT * FROM forms ORDER BY created_at").fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Form::from).collect())
    }

    async fn delete(&self, id: &str) -> Result<u64, Error> {
        let result = query("DELETE FROM forms WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

impl ResponseCommon for PgStore {
    async fn insert(&self, response: &FormResponse) -> Result<(), Error> {
        query(
            "
        INSERT INTO form_responses (id, form_id, user_id, answers, submitted_at, status)
        VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&response.id)
        .bind(&response.form_id)
        .bind(&response.user_id)
        .bind(Json(&response.answers))
        .bind(response.submitted_at)
        .bind(response.status.as_str())
        .execute(&self.pool)
        .await?;
        let _ = self.events.send(ResponseEvent::Added(response.clone()));
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<FormResponse, Error> {
        let row: Option<ResponseRow> = query_as("SELECT * FROM form_responses WHERE id = $1").bind(id).fetch_optional(&self.pool).await?;
        row.ok_or_else(|| Error::NotFound("response".into()))?.try_into()
    }

    async fn update(&self, response: &FormResponse) -> Result<(), Error> {
        let result = query(
            "
        UPDATE form_responses
        SET user_id = $2, answers = $3, submitted_at = $4, status = $5
        WHERE id = $1",
        )
        .bind(&response.id)
        .bind(&response.user_id)
        .bind(Json(&response.answers))
        .bind(response.submitted_at)
        .bind(response.status.as_str())
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("response".into()));
        }
        let _ = self.events.send(ResponseEvent::Modified(response.clone()));
        Ok(())
    }

    async fn list(&self) -> Result<Vec<FormResponse>, Error> {
        let rows: Vec<ResponseRow> = query_as("SELECT * FROM form_responses ORDER BY submitted_at DESC").fetch_all(&self.pool).await?;
        rows.into_iter().map(FormResponse::try_from).collect()
    }

    async fn delete(&self, id: &str) -> Result<u64, Error> {
        let result = query("DELETE FROM form_responses WHERE id = $1").bind(id).execute(&self.pool).await?;
        let deleted = result.rows_affected();
        if deleted > 0 {
            let _ = self.events.send(ResponseEvent::Removed { id: id.to_owned() });
        }
        Ok(deleted)
    }

    fn subscribe(&self) -> broadcast::Receiver<ResponseEvent> {
        self.events.subscribe()
    }
}

impl UserCommon for PgStore {
    async fn insert(&self, user: &UserInsert) -> Result<(), Error> {
        query(
            "
        INSERT INTO users (id, email, first_name, last_name, role, organization, phone_number, password, salt, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role.as_str())
        .bind(&user.organization)
        .bind(&user.phone_number)
        .bind(&user.password)
        .bind(&user.salt)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT id FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

impl RegistrationCommon for PgStore {
    async fn insert_author(&self, author: &Author) -> Result<(), Error> {
        query(
            "
        INSERT INTO authors (id, name, email, organization, title, bio, is_presenting)
        VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&author.id)
        .bind(&author.name)
        .bind(&author.email)
        .bind(&author.organization)
        .bind(&author.title)
        .bind(&author.bio)
        .bind(author.is_presenting)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_speaker(&self, speaker: &Speaker) -> Result<(), Error> {
        query(
            "
        INSERT INTO speakers (id, user_id, name, organization, bio, expertise, social_links, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(&speaker.id)
        .bind(&speaker.user_id)
        .bind(&speaker.name)
        .bind(&speaker.organization)
        .bind(&speaker.bio)
        .bind(&speaker.expertise)
        .bind(Json(&speaker.social_links))
        .bind(speaker.created_at)
        .bind(speaker.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_paper(&self, paper: &Paper) -> Result<(), Error> {
        query(
            "
        INSERT INTO papers (id, title, abstract, keywords, author_id, submission_type, presentation_type, status, review_status, document_url, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(&paper.id)
        .bind(&paper.title)
        .bind(&paper.abstract_text)
        .bind(&paper.keywords)
        .bind(&paper.author_id)
        .bind(paper.submission_type.as_str())
        .bind(paper.presentation_type.as_str())
        .bind(paper.status.as_str())
        .bind(paper.review_status.as_str())
        .bind(&paper.document_url)
        .bind(paper.created_at)
        .bind(paper.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

impl Store for PgStore {}
