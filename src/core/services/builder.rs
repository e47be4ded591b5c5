use chrono::{DateTime, Utc};
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};

use crate::core::models::form::{resequence, Form, FormOption, FormQuestion, QuestionKind};
use crate::core::ports::repository::FormCommon;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionType {
    Text,
    LongText,
    Number,
    MultipleChoice,
    SingleChoice,
    TrueOrFalse,
    FileUpload,
}

impl QuestionType {
    pub fn is_choice(&self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::SingleChoice)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDraft {
    pub id: u32,
    pub text: String,
}

/// One question under construction. All type-conditional sub-fields live
/// side by side; only the ones matching `type_` make it into the saved form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub id: u32,
    #[serde(rename = "type")]
    pub type_: QuestionType,
    pub text: String,
    pub required: bool,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub options: Vec<OptionDraft>,
    #[serde(default)]
    pub max_selections: Option<u32>,
    #[serde(default)]
    pub max_file_size: Option<u64>,
    #[serde(default)]
    pub allowed_file_types: Option<Vec<String>>,
}

impl QuestionDraft {
    fn blank(id: u32) -> Self {
        QuestionDraft {
            id,
            type_: QuestionType::Text,
            text: String::new(),
            required: false,
            max_length: None,
            min: None,
            max: None,
            options: Vec::new(),
            max_selections: None,
            max_file_size: None,
            allowed_file_types: None,
        }
    }

    fn kind(&self) -> QuestionKind {
        match self.type_ {
            QuestionType::Text => QuestionKind::Text { max_length: self.max_length },
            QuestionType::LongText => QuestionKind::LongText { max_length: self.max_length },
            QuestionType::Number => QuestionKind::Number { min: self.min, max: self.max },
            QuestionType::MultipleChoice => QuestionKind::MultipleChoice {
                options: self.options.iter().map(|o| FormOption { id: o.id, text: o.text.clone() }).collect(),
                max_selections: self.max_selections,
            },
            QuestionType::SingleChoice => QuestionKind::SingleChoice {
                options: self.options.iter().map(|o| FormOption { id: o.id, text: o.text.clone() }).collect(),
            },
            QuestionType::TrueOrFalse => QuestionKind::TrueOrFalse,
            QuestionType::FileUpload => QuestionKind::FileUpload {
                max_file_size: self.max_file_size,
                allowed_file_types: self.allowed_file_types.clone(),
            },
        }
    }

    fn from_question(q: &FormQuestion) -> Self {
        let mut draft = QuestionDraft::blank(q.id);
        draft.text = q.text.clone();
        draft.required = q.required;
        match &q.kind {
            QuestionKind::Text { max_length } => {
                draft.type_ = QuestionType::Text;
                draft.max_length = *max_length;
            }
            QuestionKind::LongText { max_length } => {
                draft.type_ = QuestionType::LongText;
                draft.max_length = *max_length;
            }
            QuestionKind::Number { min, max } => {
                draft.type_ = QuestionType::Number;
                draft.min = *min;
                draft.max = *max;
            }
            QuestionKind::MultipleChoice { options, max_selections } => {
                draft.type_ = QuestionType::MultipleChoice;
                draft.options = options.iter().map(|o| OptionDraft { id: o.id, text: o.text.clone() }).collect();
                draft.max_selections = *max_selections;
            }
            QuestionKind::SingleChoice { options } => {
                draft.type_ = QuestionType::SingleChoice;
                draft.options = options.iter().map(|o| OptionDraft { id: o.id, text: o.text.clone() }).collect();
            }
            QuestionKind::TrueOrFalse => {
                draft.type_ = QuestionType::TrueOrFalse;
            }
            QuestionKind::FileUpload { max_file_size, allowed_file_types } => {
                draft.type_ = QuestionType::FileUpload;
                draft.max_file_size = *max_file_size;
                draft.allowed_file_types = allowed_file_types.clone();
            }
        }
        draft
    }
}

/// Mutable builder state for one form. Presentation layers mutate it through
/// the operations below and persist it with [`FormBuilder::save`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormBuilder {
    pub title: String,
    pub description: String,
    pub is_author: bool,
    pub is_paper: bool,
    pub is_speaker: bool,
    pub questions: Vec<QuestionDraft>,
    #[serde(default)]
    edit_id: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl Default for FormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FormBuilder {
    /// Starts with a single blank text question.
    pub fn new() -> Self {
        FormBuilder {
            title: String::new(),
            description: String::new(),
            is_author: false,
            is_paper: false,
            is_speaker: false,
            questions: vec![QuestionDraft::blank(1)],
            edit_id: None,
            created_at: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.edit_id.is_some()
    }

    pub fn add_question(&mut self) {
        let id = self.questions.len() as u32 + 1;
        self.questions.push(QuestionDraft::blank(id));
    }

    /// Later questions keep their ids until the next save re-sequences them.
    pub fn remove_question(&mut self, index: usize) {
        if index < self.questions.len() {
            self.questions.remove(index);
        }
    }

    pub fn add_option(&mut self, question_index: usize) {
        if let Some(question) = self.questions.get_mut(question_index) {
            let id = question.options.len() as u32 + 1;
            question.options.push(OptionDraft { id, text: String::new() });
        }
    }

    pub fn remove_option(&mut self, question_index: usize, option_index: usize) {
        if let Some(question) = self.questions.get_mut(question_index) {
            if option_index < question.options.len() {
                question.options.remove(option_index);
            }
        }
    }

    /// Switching onto a choice type replaces the option list with one blank
    /// option; switching away drops it.
    pub fn on_question_type_change(&mut self, question_index: usize) {
        let is_choice = match self.questions.get(question_index) {
            Some(q) => q.type_.is_choice(),
            None => return,
        };
        if is_choice {
            self.questions[question_index].options.clear();
            self.add_option(question_index);
        } else {
            self.questions[question_index].options.clear();
        }
    }

    /// Marks the builder as editing `form` while keeping its current field
    /// values. The next save reuses the stored id and `created_at`.
    pub fn edit_existing(&mut self, form: &Form) {
        self.edit_id = Some(form.id.clone());
        self.created_at = Some(form.created_at);
    }

    /// Re-hydrates the builder from a stored form for edit-in-place. The
    /// subsequent save keeps the original id and `created_at`.
    pub fn edit_form(&mut self, form: &Form) {
        self.title = form.title.clone();
        self.description = form.description.clone();
        self.is_author = form.is_author;
        self.is_paper = form.is_paper;
        self.is_speaker = form.is_speaker;
        self.questions = form.questions.iter().map(QuestionDraft::from_question).collect();
        self.edit_id = Some(form.id.clone());
        self.created_at = Some(form.created_at);
    }

    fn validate(&self) -> Result<(), Error> {
        let invalid = self.title.trim().chars().count() < 3
            || self.description.trim().chars().count() < 10
            || self.questions.iter().any(|q| {
                q.text.trim().is_empty()
                    || (q.type_.is_choice() && (q.options.is_empty() || q.options.iter().any(|o| o.text.trim().is_empty())))
            });
        if invalid {
            return Err(Error::Validation("please fill in all required fields correctly".into()));
        }
        Ok(())
    }

    /// Validates the builder state and assembles the form document. Question
    /// ids are re-derived from array position; option ids stay as entered.
    pub fn build(&self) -> Result<Form, Error> {
        self.validate()?;
        let id = match &self.edit_id {
            Some(id) => id.clone(),
            None => generate_custom_id(&self.title),
        };
        let questions = self.questions.iter().map(|q| FormQuestion {
            id: q.id,
            text: q.text.trim().to_owned(),
            required: q.required,
            kind: q.kind(),
        });
        Ok(Form {
            id,
            title: self.title.trim().to_owned(),
            description: self.description.trim().to_owned(),
            is_author: self.is_author,
            is_paper: self.is_paper,
            is_speaker: self.is_speaker,
            questions: resequence(questions.collect()),
            created_at: self.created_at.unwrap_or_else(Utc::now),
        })
    }

    /// Persists the form as a merge-upsert and resets the builder back to a
    /// single blank question. Returns the saved document.
    pub async fn save<S: FormCommon>(&mut self, store: &S) -> Result<Form, Error> {
        let form = self.build()?;
        store.upsert(&form).await?;
        *self = FormBuilder::new();
        Ok(form)
    }
}

pub async fn delete_form<S: FormCommon>(store: &S, id: &str) -> Result<u64, Error> {
    store.delete(id).await
}

pub fn share_link(base_url: &str, form_id: &str) -> String {
    format!("{}/form/{}", base_url.trim_end_matches('/'), form_id)
}

/// URL-safe slug from the title plus a 5-character random suffix. The suffix
/// guards against collisions without a uniqueness check against the store.
pub fn generate_custom_id(title: &str) -> String {
    let mut slug = String::new();
    let mut pending_sep = false;
    for c in title.trim().chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_sep = true;
        } else if c.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c);
        }
        // everything else is stripped without acting as a separator
    }
    format!("{}-{}", slug, random_suffix(5))
}

pub(crate) fn random_suffix(len: usize) -> String {
    const CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = thread_rng();
    (0..len).map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char).collect()
}
