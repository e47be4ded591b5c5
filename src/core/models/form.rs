use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormOption {
    pub id: u32,
    pub text: String,
}

/// Closed set of question shapes. The wire tag matches the document field
/// `type`, so stored forms stay readable by any client of the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum QuestionKind {
    #[serde(rename_all = "camelCase")]
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    LongText {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<u32>,
    },
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    MultipleChoice {
        options: Vec<FormOption>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_selections: Option<u32>,
    },
    SingleChoice { options: Vec<FormOption> },
    TrueOrFalse,
    #[serde(rename_all = "camelCase")]
    FileUpload {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_file_size: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        allowed_file_types: Option<Vec<String>>,
    },
}

impl QuestionKind {
    pub fn is_file_upload(&self) -> bool {
        matches!(self, QuestionKind::FileUpload { .. })
    }

    pub fn options(&self) -> Option<&[FormOption]> {
        match self {
            QuestionKind::MultipleChoice { options, .. } | QuestionKind::SingleChoice { options } => Some(options),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormQuestion {
    /// 1-based position within the owning form, re-derived at save time.
    pub id: u32,
    pub text: String,
    pub required: bool,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: String,
    pub title: String,
    pub description: String,
    pub is_author: bool,
    pub is_paper: bool,
    pub is_speaker: bool,
    pub questions: Vec<FormQuestion>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Selection(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub path: String,
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponseAnswer {
    pub question_id: u32,
    pub answer: Option<AnswerValue>,
    /// Present only after a successful upload; `answer` then holds the
    /// resolved download reference, never the raw binary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_info: Option<FileInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Draft,
    Submitted,
    Reviewed,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Draft => "draft",
            ResponseStatus::Submitted => "submitted",
            ResponseStatus::Reviewed => "reviewed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(ResponseStatus::Draft),
            "submitted" => Some(ResponseStatus::Submitted),
            "reviewed" => Some(ResponseStatus::Reviewed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub id: String,
    pub form_id: String,
    /// Omitted entirely when the respondent is unknown, never stored as null.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub answers: Vec<FormResponseAnswer>,
    pub submitted_at: DateTime<Utc>,
    pub status: ResponseStatus,
}

#[derive(Debug, Clone)]
pub struct NewForm {
    pub title: String,
    pub description: String,
    pub is_author: bool,
    pub is_paper: bool,
    pub is_speaker: bool,
    pub questions: Vec<FormQuestion>,
}

/// Assigns a fresh identifier and timestamp and re-sequences question ids
/// from array position. Option ids are left as given.
pub fn create_form(data: NewForm) -> Form {
    Form {
        id: Uuid::new_v4().to_string(),
        title: data.title,
        description: data.description,
        is_author: data.is_author,
        is_paper: data.is_paper,
        is_speaker: data.is_speaker,
        questions: resequence(data.questions),
        created_at: Utc::now(),
    }
}

pub fn resequence(questions: Vec<FormQuestion>) -> Vec<FormQuestion> {
    questions
        .into_iter()
        .enumerate()
        .map(|(i, mut q)| {
            q.id = i as u32 + 1;
            q
        })
        .collect()
}

fn non_empty(user_id: Option<&str>) -> Option<String> {
    user_id.map(str::trim).filter(|u| !u.is_empty()).map(ToOwned::to_owned)
}

pub fn create_form_response(form_id: &str, answers: Vec<FormResponseAnswer>, user_id: Option<&str>) -> FormResponse {
    FormResponse {
        id: Uuid::new_v4().to_string(),
        form_id: form_id.to_owned(),
        user_id: non_empty(user_id),
        answers,
        submitted_at: Utc::now(),
        status: ResponseStatus::Submitted,
    }
}

/// Replaces answers and the submission timestamp in place, forcing the status
/// back to submitted. Identifier and form linkage are preserved.
pub fn update_form_response(existing: FormResponse, new_answers: Vec<FormResponseAnswer>, user_id: Option<&str>) -> FormResponse {
    FormResponse {
        answers: new_answers,
        user_id: non_empty(user_id).or(existing.user_id.clone()),
        submitted_at: Utc::now(),
        status: ResponseStatus::Submitted,
        ..existing
    }
}
