use chrono::Utc;

use crate::core::models::form::{
    create_form_response, update_form_response, AnswerValue, FileInfo, Form, FormQuestion, FormResponse, FormResponseAnswer, QuestionKind,
};
use crate::core::ports::repository::{FormCommon, ResponseCommon};
use crate::core::ports::uploader::{FileUpload, Uploader};
use crate::core::services::builder::random_suffix;
use crate::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum SlotValue {
    Empty,
    Value(AnswerValue),
    /// A binary waiting for its deferred upload at submission time.
    PendingFile(FileUpload),
}

#[derive(Debug, Clone)]
pub struct AnswerSlot {
    pub question_id: u32,
    pub value: SlotValue,
    /// Carried over from a resumed response or filled after an upload.
    pub file_info: Option<FileInfo>,
}

/// Collects one response against a loaded form: one slot per question with a
/// type-appropriate default, validated as a whole before anything is written.
pub struct ResponseCollector {
    form: Form,
    slots: Vec<AnswerSlot>,
    existing_response_id: Option<String>,
    user_id: Option<String>,
}

fn default_slot(question: &FormQuestion) -> AnswerSlot {
    let value = match &question.kind {
        QuestionKind::MultipleChoice { .. } => SlotValue::Value(AnswerValue::Selection(Vec::new())),
        _ => SlotValue::Empty,
    };
    AnswerSlot {
        question_id: question.id,
        value,
        file_info: None,
    }
}

impl ResponseCollector {
    /// Fetches the form and derives the answer slots.
    pub async fn load<S: FormCommon>(store: &S, form_id: &str) -> Result<Self, Error> {
        let form = FormCommon::get(store, form_id).await.map_err(|e| match e {
            Error::NotFound(_) => Error::NotFound("form".into()),
            other => {
                log::error!("error loading form details: {}", other);
                Error::Storage("could not load form details".into())
            }
        })?;
        let slots = form.questions.iter().map(default_slot).collect();
        Ok(ResponseCollector {
            form,
            slots,
            existing_response_id: None,
            user_id: None,
        })
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn slots(&self) -> &[AnswerSlot] {
        &self.slots
    }

    pub fn existing_response_id(&self) -> Option<&str> {
        self.existing_response_id.as_deref()
    }

    pub fn set_user_id(&mut self, user_id: Option<String>) {
        self.user_id = user_id;
    }

    pub fn set_answer(&mut self, question_id: u32, answer: Option<AnswerValue>) -> Result<(), Error> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.question_id == question_id)
            .ok_or_else(|| Error::Validation(format!("no question with id {}", question_id)))?;
        slot.value = match answer {
            Some(v) => SlotValue::Value(v),
            None => SlotValue::Empty,
        };
        Ok(())
    }

    /// Stages a binary for a file-upload question. The actual upload is
    /// deferred until submission.
    pub fn attach_file(&mut self, question_id: u32, file: FileUpload) -> Result<(), Error> {
        let question = self
            .form
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| Error::Validation(format!("no question with id {}", question_id)))?;
        if !question.kind.is_file_upload() {
            return Err(Error::Validation(format!("question {} does not accept file uploads", question_id)));
        }
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.question_id == question_id)
            .ok_or_else(|| Error::Validation(format!("no question with id {}", question_id)))?;
        slot.value = SlotValue::PendingFile(file);
        slot.file_info = None;
        Ok(())
    }

    fn validate_slots(&self) -> Result<(), Error> {
        for (question, slot) in self.form.questions.iter().zip(&self.slots) {
            let missing = match &slot.value {
                SlotValue::Empty => true,
                SlotValue::Value(AnswerValue::Text(s)) => s.is_empty(),
                SlotValue::Value(AnswerValue::Selection(v)) => v.is_empty(),
                _ => false,
            };
            if question.required && missing {
                return Err(Error::Validation("please fill in all required fields".into()));
            }
            if missing {
                continue;
            }
            match (&question.kind, &slot.value) {
                (QuestionKind::Text { max_length: Some(max) }, SlotValue::Value(AnswerValue::Text(s)))
                | (QuestionKind::LongText { max_length: Some(max) }, SlotValue::Value(AnswerValue::Text(s))) => {
                    if s.chars().count() as u32 > *max {
                        return Err(Error::Validation(format!("answer to question {} exceeds {} characters", question.id, max)));
                    }
                }
                (QuestionKind::Number { min, max }, SlotValue::Value(AnswerValue::Number(n))) => {
                    if min.map_or(false, |m| *n < m) || max.map_or(false, |m| *n > m) {
                        return Err(Error::Validation(format!("answer to question {} is out of bounds", question.id)));
                    }
                }
                (QuestionKind::MultipleChoice { max_selections: Some(k), .. }, SlotValue::Value(AnswerValue::Selection(v))) => {
                    if v.len() as u32 > *k {
                        return Err(Error::Validation(format!("question {} allows at most {} selections", question.id, k)));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Stores the blob under a collision-resistant path and returns the
    /// finished answer. Constraints are enforced before the uploader is
    /// touched.
    async fn upload_file<U: Uploader>(&self, uploader: &U, question: &FormQuestion, file: &FileUpload) -> Result<FormResponseAnswer, Error> {
        check_upload(question, file)?;
        let path = format!(
            "form-uploads/{}/{}_{}.{}",
            self.form.id,
            Utc::now().timestamp_millis(),
            random_suffix(5),
            file.extension()
        );
        let url = uploader.put(&path, &file.content).await?;
        Ok(FormResponseAnswer {
            question_id: question.id,
            answer: Some(AnswerValue::Text(url)),
            file_info: Some(FileInfo {
                path,
                name: file.name.clone(),
                content_type: file.content_type.clone(),
                size: file.size(),
            }),
        })
    }

    /// Validates every slot and writes the whole answer set as one document.
    /// A collector that was resumed via [`lookup_response`] updates in place,
    /// otherwise a new response is created.
    ///
    /// [`lookup_response`]: ResponseCollector::lookup_response
    pub async fn submit<S, U>(&mut self, store: &S, uploader: &U) -> Result<FormResponse, Error>
    where
        S: ResponseCommon,
        U: Uploader,
    {
        self.validate_slots()?;
        let response = match self.existing_response_id.clone() {
            Some(id) => self.update_existing_response(store, uploader, &id).await?,
            None => {
                let mut answers = Vec::with_capacity(self.slots.len());
                for (question, slot) in self.form.questions.iter().zip(&self.slots) {
                    answers.push(self.finalize_slot(uploader, question, slot).await?);
                }
                let response = create_form_response(&self.form.id, answers, self.user_id.as_deref());
                ResponseCommon::insert(store, &response).await?;
                response
            }
        };
        self.existing_response_id = Some(response.id.clone());
        Ok(response)
    }

    async fn finalize_slot<U: Uploader>(&self, uploader: &U, question: &FormQuestion, slot: &AnswerSlot) -> Result<FormResponseAnswer, Error> {
        match &slot.value {
            SlotValue::PendingFile(file) => self.upload_file(uploader, question, file).await,
            SlotValue::Value(v) => Ok(FormResponseAnswer {
                question_id: question.id,
                answer: Some(v.clone()),
                file_info: slot.file_info.clone(),
            }),
            SlotValue::Empty => Ok(FormResponseAnswer {
                question_id: question.id,
                answer: None,
                file_info: None,
            }),
        }
    }

    /// Update-in-place: a file-upload answer replaced by a new binary has its
    /// previous blob deleted first, tolerating one that is already gone. The
    /// delete-then-upload sequence is best-effort, not transactional.
    async fn update_existing_response<S, U>(&self, store: &S, uploader: &U, response_id: &str) -> Result<FormResponse, Error>
    where
        S: ResponseCommon,
        U: Uploader,
    {
        let existing = ResponseCommon::get(store, response_id).await.map_err(|e| match e {
            Error::NotFound(_) => Error::NotFound("response".into()),
            other => other,
        })?;
        // every replacement binary is checked before any previous blob is
        // deleted, so a rejected resubmission leaves the stored files intact
        for (question, slot) in self.form.questions.iter().zip(&self.slots) {
            if let SlotValue::PendingFile(file) = &slot.value {
                check_upload(question, file)?;
            }
        }
        let mut answers = Vec::with_capacity(self.slots.len());
        for (question, slot) in self.form.questions.iter().zip(&self.slots) {
            if let SlotValue::PendingFile(_) = &slot.value {
                let previous = existing
                    .answers
                    .iter()
                    .find(|a| a.question_id == question.id)
                    .and_then(|a| a.file_info.as_ref());
                if let Some(info) = previous {
                    match uploader.delete(&info.path).await {
                        Ok(()) => {}
                        Err(Error::NotFound(_)) => log::info!("file {} already deleted or does not exist", info.path),
                        Err(e) => log::error!("file deletion error for {}: {}", info.path, e),
                    }
                }
            }
            answers.push(self.finalize_slot(uploader, question, slot).await?);
        }
        let updated = update_form_response(existing, answers, self.user_id.as_deref());
        ResponseCommon::update(store, &updated).await?;
        Ok(updated)
    }

    /// Resumes a previously submitted response. A response belonging to a
    /// different form is reported as not found, regardless of whether the id
    /// itself exists.
    pub async fn lookup_response<S: ResponseCommon>(&mut self, store: &S, response_id: &str) -> Result<FormResponse, Error> {
        let response = ResponseCommon::get(store, response_id).await.map_err(|e| match e {
            Error::NotFound(_) => Error::NotFound("response".into()),
            other => other,
        })?;
        if response.form_id != self.form.id {
            return Err(Error::NotFound("response".into()));
        }
        for saved in &response.answers {
            if let Some(slot) = self.slots.iter_mut().find(|s| s.question_id == saved.question_id) {
                slot.value = match &saved.answer {
                    Some(v) => SlotValue::Value(v.clone()),
                    None => SlotValue::Empty,
                };
                slot.file_info = saved.file_info.clone();
            }
        }
        self.existing_response_id = Some(response.id.clone());
        Ok(response)
    }
}

/// Size and content-type constraints from the question definition.
fn check_upload(question: &FormQuestion, file: &FileUpload) -> Result<(), Error> {
    let (max_file_size, allowed_file_types) = match &question.kind {
        QuestionKind::FileUpload { max_file_size, allowed_file_types } => (max_file_size, allowed_file_types),
        _ => return Err(Error::Validation(format!("question {} does not accept file uploads", question.id))),
    };
    if let Some(limit) = max_file_size {
        if file.size() > *limit {
            return Err(Error::Validation(format!("file must be less than {}KB", limit / 1024)));
        }
    }
    if let Some(allowed) = allowed_file_types {
        if !allowed.iter().any(|t| t == &file.content_type) {
            return Err(Error::Validation("unsupported file type".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::form::{FormOption, ResponseStatus};
    use crate::core::ports::repository::ResponseEvent;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::broadcast;

    struct MemStore {
        forms: Mutex<HashMap<String, Form>>,
        responses: Mutex<HashMap<String, FormResponse>>,
        events: broadcast::Sender<ResponseEvent>,
    }

    impl MemStore {
        fn new() -> Self {
            let (events, _) = broadcast::channel(16);
            MemStore {
                forms: Mutex::new(HashMap::new()),
                responses: Mutex::new(HashMap::new()),
                events,
            }
        }

        fn with_form(form: Form) -> Self {
            let store = Self::new();
            store.forms.lock().unwrap().insert(form.id.clone(), form);
            store
        }
    }

    impl FormCommon for MemStore {
        async fn upsert(&self, form: &Form) -> Result<(), Error> {
            self.forms.lock().unwrap().insert(form.id.clone(), form.clone());
            Ok(())
        }

        async fn get(&self, id: &str) -> Result<Form, Error> {
            self.forms.lock().unwrap().get(id).cloned().ok_or_else(|| Error::NotFound("form".into()))
        }

        async fn list(&self) -> Result<Vec<Form>, Error> {
            Ok(self.forms.lock().unwrap().values().cloned().collect())
        }

        async fn delete(&self, id: &str) -> Result<u64, Error> {
            Ok(self.forms.lock().unwrap().remove(id).map(|_| 1).unwrap_or(0))
        }
    }

    impl ResponseCommon for MemStore {
        async fn insert(&self, response: &FormResponse) -> Result<(), Error> {
            self.responses.lock().unwrap().insert(response.id.clone(), response.clone());
            Ok(())
        }

        async fn get(&self, id: &str) -> Result<FormResponse, Error> {
            self.responses.lock().unwrap().get(id).cloned().ok_or_else(|| Error::NotFound("response".into()))
        }

        async fn update(&self, response: &FormResponse) -> Result<(), Error> {
            self.responses.lock().unwrap().insert(response.id.clone(), response.clone());
            Ok(())
        }

        async fn list(&self) -> Result<Vec<FormResponse>, Error> {
            Ok(self.responses.lock().unwrap().values().cloned().collect())
        }

        async fn delete(&self, id: &str) -> Result<u64, Error> {
            Ok(self.responses.lock().unwrap().remove(id).map(|_| 1).unwrap_or(0))
        }

        fn subscribe(&self) -> broadcast::Receiver<ResponseEvent> {
            self.events.subscribe()
        }
    }

    #[derive(Default)]
    struct MemUploader {
        blobs: Mutex<HashMap<String, Vec<u8>>>,
        deleted: Mutex<Vec<String>>,
        put_calls: Mutex<u32>,
    }

    impl Uploader for MemUploader {
        async fn put(&self, path: &str, content: &[u8]) -> Result<String, Error> {
            *self.put_calls.lock().unwrap() += 1;
            self.blobs.lock().unwrap().insert(path.to_owned(), content.to_vec());
            Ok(format!("mem://{}", path))
        }

        async fn get(&self, path: &str) -> Result<Vec<u8>, Error> {
            self.blobs.lock().unwrap().get(path).cloned().ok_or_else(|| Error::NotFound("file".into()))
        }

        async fn delete(&self, path: &str) -> Result<(), Error> {
            self.deleted.lock().unwrap().push(path.to_owned());
            self.blobs.lock().unwrap().remove(path).map(|_| ()).ok_or_else(|| Error::NotFound("file".into()))
        }

        async fn download_url(&self, path: &str) -> Result<String, Error> {
            if self.blobs.lock().unwrap().contains_key(path) {
                Ok(format!("mem://{}", path))
            } else {
                Err(Error::NotFound("file".into()))
            }
        }
    }

    fn form_with(questions: Vec<FormQuestion>) -> Form {
        Form {
            id: "conf-survey-ab1cd".into(),
            title: "Conference survey".into(),
            description: "A survey about the conference".into(),
            is_author: false,
            is_paper: false,
            is_speaker: false,
            questions,
            created_at: Utc::now(),
        }
    }

    fn question(id: u32, required: bool, kind: QuestionKind) -> FormQuestion {
        FormQuestion {
            id,
            text: format!("question {}", id),
            required,
            kind,
        }
    }

    fn options(texts: &[&str]) -> Vec<FormOption> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| FormOption {
                id: i as u32 + 1,
                text: (*t).into(),
            })
            .collect()
    }

    fn upload(name: &str, content_type: &str, size: usize) -> FileUpload {
        FileUpload {
            name: name.into(),
            content_type: content_type.into(),
            content: vec![0u8; size],
        }
    }

    #[tokio::test]
    async fn test_load_missing_form_is_not_found() {
        let store = MemStore::new();
        match ResponseCollector::load(&store, "nope").await {
            Err(Error::NotFound(what)) => assert_eq!(what, "form"),
            other => panic!("expected not found, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_max_selections_boundary() {
        let form = form_with(vec![question(
            1,
            false,
            QuestionKind::MultipleChoice {
                options: options(&["a", "b", "c"]),
                max_selections: Some(2),
            },
        )]);
        let store = MemStore::with_form(form);
        let uploader = MemUploader::default();

        let mut collector = ResponseCollector::load(&store, "conf-survey-ab1cd").await.unwrap();
        collector
            .set_answer(1, Some(AnswerValue::Selection(vec!["a".into(), "b".into(), "c".into()])))
            .unwrap();
        assert!(matches!(collector.submit(&store, &uploader).await, Err(Error::Validation(_))));

        collector.set_answer(1, Some(AnswerValue::Selection(vec!["a".into(), "b".into()]))).unwrap();
        assert!(collector.submit(&store, &uploader).await.is_ok());
    }

    #[tokio::test]
    async fn test_required_bool_and_optional_text() {
        let form = form_with(vec![
            question(1, true, QuestionKind::TrueOrFalse),
            question(2, false, QuestionKind::Text { max_length: None }),
        ]);
        let store = MemStore::with_form(form);
        let uploader = MemUploader::default();

        let mut collector = ResponseCollector::load(&store, "conf-survey-ab1cd").await.unwrap();
        assert!(matches!(collector.submit(&store, &uploader).await, Err(Error::Validation(_))));

        collector.set_answer(1, Some(AnswerValue::Bool(true))).unwrap();
        let response = collector.submit(&store, &uploader).await.unwrap();
        assert_eq!(response.status, ResponseStatus::Submitted);
        assert_eq!(response.answers.len(), 2);
        assert_eq!(response.answers[1].answer, None);
        assert_eq!(ResponseCommon::list(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_number_bounds_and_text_length() {
        let form = form_with(vec![
            question(1, false, QuestionKind::Number { min: Some(1.0), max: Some(5.0) }),
            question(2, false, QuestionKind::Text { max_length: Some(3) }),
        ]);
        let store = MemStore::with_form(form);
        let uploader = MemUploader::default();
        let mut collector = ResponseCollector::load(&store, "conf-survey-ab1cd").await.unwrap();

        collector.set_answer(1, Some(AnswerValue::Number(9.0))).unwrap();
        assert!(matches!(collector.submit(&store, &uploader).await, Err(Error::Validation(_))));
        collector.set_answer(1, Some(AnswerValue::Number(5.0))).unwrap();

        collector.set_answer(2, Some(AnswerValue::Text("abcd".into()))).unwrap();
        assert!(matches!(collector.submit(&store, &uploader).await, Err(Error::Validation(_))));
        collector.set_answer(2, Some(AnswerValue::Text("abc".into()))).unwrap();
        assert!(collector.submit(&store, &uploader).await.is_ok());
    }

    #[tokio::test]
    async fn test_oversized_file_rejected_before_upload() {
        let form = form_with(vec![question(
            1,
            true,
            QuestionKind::FileUpload {
                max_file_size: Some(16),
                allowed_file_types: None,
            },
        )]);
        let store = MemStore::with_form(form);
        let uploader = MemUploader::default();
        let mut collector = ResponseCollector::load(&store, "conf-survey-ab1cd").await.unwrap();

        collector.attach_file(1, upload("big.pdf", "application/pdf", 17)).unwrap();
        assert!(matches!(collector.submit(&store, &uploader).await, Err(Error::Validation(_))));
        assert_eq!(*uploader.put_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_disallowed_content_type_rejected() {
        let form = form_with(vec![question(
            1,
            true,
            QuestionKind::FileUpload {
                max_file_size: None,
                allowed_file_types: Some(vec!["application/pdf".into()]),
            },
        )]);
        let store = MemStore::with_form(form);
        let uploader = MemUploader::default();
        let mut collector = ResponseCollector::load(&store, "conf-survey-ab1cd").await.unwrap();

        collector.attach_file(1, upload("x.exe", "application/octet-stream", 4)).unwrap();
        assert!(matches!(collector.submit(&store, &uploader).await, Err(Error::Validation(_))));
        assert_eq!(*uploader.put_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_lookup_rejects_cross_form_response() {
        let form = form_with(vec![question(1, false, QuestionKind::Text { max_length: None })]);
        let store = MemStore::with_form(form);
        let foreign = create_form_response("some-other-form", vec![], None);
        ResponseCommon::insert(&store, &foreign).await.unwrap();

        let mut collector = ResponseCollector::load(&store, "conf-survey-ab1cd").await.unwrap();
        match collector.lookup_response(&store, &foreign.id).await {
            Err(Error::NotFound(_)) => {}
            other => panic!("expected not found, got {:?}", other.map(|_| ())),
        }
        assert!(collector.existing_response_id().is_none());
    }

    #[tokio::test]
    async fn test_resubmission_replaces_stored_file() {
        let form = form_with(vec![question(
            1,
            true,
            QuestionKind::FileUpload {
                max_file_size: None,
                allowed_file_types: None,
            },
        )]);
        let store = MemStore::with_form(form);
        let uploader = MemUploader::default();

        let mut collector = ResponseCollector::load(&store, "conf-survey-ab1cd").await.unwrap();
        collector.attach_file(1, upload("slides.pdf", "application/pdf", 8)).unwrap();
        let first = collector.submit(&store, &uploader).await.unwrap();
        let first_path = first.answers[0].file_info.as_ref().unwrap().path.clone();

        let mut resumed = ResponseCollector::load(&store, "conf-survey-ab1cd").await.unwrap();
        resumed.lookup_response(&store, &first.id).await.unwrap();
        resumed.attach_file(1, upload("slides-v2.pdf", "application/pdf", 8)).unwrap();
        let second = resumed.submit(&store, &uploader).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.form_id, first.form_id);
        let second_path = &second.answers[0].file_info.as_ref().unwrap().path;
        assert_ne!(second_path, &first_path);
        assert!(uploader.deleted.lock().unwrap().contains(&first_path));
        assert!(uploader.blobs.lock().unwrap().contains_key(second_path));
        assert!(!uploader.blobs.lock().unwrap().contains_key(&first_path));
    }

    #[tokio::test]
    async fn test_rejected_replacement_keeps_previous_file() {
        let form = form_with(vec![question(
            1,
            true,
            QuestionKind::FileUpload {
                max_file_size: Some(16),
                allowed_file_types: None,
            },
        )]);
        let store = MemStore::with_form(form);
        let uploader = MemUploader::default();

        let mut collector = ResponseCollector::load(&store, "conf-survey-ab1cd").await.unwrap();
        collector.attach_file(1, upload("slides.pdf", "application/pdf", 8)).unwrap();
        let first = collector.submit(&store, &uploader).await.unwrap();
        let first_path = first.answers[0].file_info.as_ref().unwrap().path.clone();

        let mut resumed = ResponseCollector::load(&store, "conf-survey-ab1cd").await.unwrap();
        resumed.lookup_response(&store, &first.id).await.unwrap();
        resumed.attach_file(1, upload("huge.pdf", "application/pdf", 32)).unwrap();
        assert!(matches!(resumed.submit(&store, &uploader).await, Err(Error::Validation(_))));

        // the old blob and the stored response both survive the rejection
        assert!(uploader.deleted.lock().unwrap().is_empty());
        assert!(uploader.blobs.lock().unwrap().contains_key(&first_path));
        let stored = ResponseCommon::get(&store, &first.id).await.unwrap();
        assert_eq!(stored.answers[0].file_info, first.answers[0].file_info);
    }

    #[tokio::test]
    async fn test_resume_keeps_file_answer_without_new_binary() {
        let form = form_with(vec![
            question(1, false, QuestionKind::FileUpload { max_file_size: None, allowed_file_types: None }),
            question(2, false, QuestionKind::Text { max_length: None }),
        ]);
        let store = MemStore::with_form(form);
        let uploader = MemUploader::default();

        let mut collector = ResponseCollector::load(&store, "conf-survey-ab1cd").await.unwrap();
        collector.attach_file(1, upload("paper.pdf", "application/pdf", 8)).unwrap();
        let first = collector.submit(&store, &uploader).await.unwrap();

        let mut resumed = ResponseCollector::load(&store, "conf-survey-ab1cd").await.unwrap();
        resumed.lookup_response(&store, &first.id).await.unwrap();
        resumed.set_answer(2, Some(AnswerValue::Text("updated".into()))).unwrap();
        let second = resumed.submit(&store, &uploader).await.unwrap();

        // untouched file answer keeps its reference and metadata
        assert_eq!(second.answers[0].file_info, first.answers[0].file_info);
        assert_eq!(second.answers[0].answer, first.answers[0].answer);
        assert!(uploader.deleted.lock().unwrap().is_empty());
    }
}
