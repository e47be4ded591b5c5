use chrono::Utc;
use hex::ToHex;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::core::models::registration::{Author, Paper, PaperStatus, PresentationType, ReviewStatus, SocialLinks, Speaker, SubmissionType, UserInsert, UserRole};
use crate::core::ports::repository::{RegistrationCommon, UserCommon};
use crate::core::ports::uploader::{FileUpload, Uploader};
use crate::core::services::builder::random_suffix;
use crate::error::Error;

pub fn hash_password(pass: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(slt);
    hasher.finalize().encode_hex()
}

pub(crate) fn random_salt() -> String {
    const CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = thread_rng();
    (0..32).map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char).collect()
}

/// Initial account password; the attendee resets it out of band.
fn temporary_password() -> String {
    random_suffix(8)
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',').map(str::trim).filter(|p| !p.is_empty()).map(ToOwned::to_owned).collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDetails {
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub is_presenting: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerDetails {
    #[serde(default)]
    pub bio: String,
    /// Comma-separated in the submitted form.
    #[serde(default)]
    pub expertise: String,
    #[serde(default)]
    pub social_links: SocialLinks,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperDetails {
    pub title: String,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    #[serde(default)]
    pub keywords: String,
    pub submission_type: Option<SubmissionType>,
    pub presentation_type: Option<PresentationType>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub organization: String,
    #[serde(default)]
    pub phone_number: String,
    pub role: UserRole,
    pub author_details: Option<AuthorDetails>,
    pub speaker_details: Option<SpeakerDetails>,
    pub paper_details: Option<PaperDetails>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOutcome {
    pub user_id: String,
    pub author_id: Option<String>,
    pub speaker_id: Option<String>,
    pub paper_id: Option<String>,
}

fn validate(request: &RegistrationRequest) -> Result<(), Error> {
    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(Error::Validation("a valid email address is required".into()));
    }
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() || request.organization.trim().is_empty() {
        return Err(Error::Validation("name and organization are required".into()));
    }
    // delegates carry no author, speaker or paper details
    if request.role == UserRole::Delegate
        && (request.author_details.is_some() || request.speaker_details.is_some() || request.paper_details.is_some())
    {
        return Err(Error::Validation("delegates cannot register author or speaker details".into()));
    }
    Ok(())
}

/// Registers an attendee: creates the account with a temporary password,
/// stores the user document, and fans out author/speaker/paper documents
/// according to the chosen role. An author who is presenting is registered
/// as a speaker.
pub async fn register<S, U>(store: &S, uploader: &U, mut request: RegistrationRequest, paper_file: Option<FileUpload>) -> Result<RegistrationOutcome, Error>
where
    S: UserCommon + RegistrationCommon,
    U: Uploader,
{
    validate(&request)?;
    if request.role == UserRole::Author && request.author_details.as_ref().map_or(false, |d| d.is_presenting) {
        request.role = UserRole::Speaker;
    }
    if store.email_exists(&request.email).await? {
        return Err(Error::Validation("email already registered".into()));
    }

    let user_id = Uuid::new_v4().to_string();
    let salt = random_salt();
    let user = UserInsert {
        id: user_id.clone(),
        email: request.email.trim().to_owned(),
        first_name: request.first_name.trim().to_owned(),
        last_name: request.last_name.trim().to_owned(),
        role: request.role,
        organization: request.organization.trim().to_owned(),
        phone_number: request.phone_number.trim().to_owned(),
        password: hash_password(&temporary_password(), &salt),
        salt,
    };
    UserCommon::insert(store, &user).await?;
    let full_name = format!("{} {}", user.first_name, user.last_name);

    let mut outcome = RegistrationOutcome {
        user_id: user_id.clone(),
        author_id: None,
        speaker_id: None,
        paper_id: None,
    };

    if request.role == UserRole::Author {
        let details = request.author_details.clone().unwrap_or_default();
        let author = Author {
            id: Uuid::new_v4().to_string(),
            name: full_name.clone(),
            email: user.email.clone(),
            organization: user.organization.clone(),
            title: String::new(),
            bio: details.bio,
            is_presenting: details.is_presenting,
        };
        store.insert_author(&author).await?;
        outcome.author_id = Some(author.id);
    }

    if request.role == UserRole::Speaker {
        let details = request.speaker_details.clone().unwrap_or_default();
        let now = Utc::now();
        let speaker = Speaker {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.clone(),
            name: full_name.clone(),
            organization: user.organization.clone(),
            bio: details.bio,
            expertise: split_list(&details.expertise),
            social_links: details.social_links,
            created_at: now,
            updated_at: now,
        };
        store.insert_speaker(&speaker).await?;
        outcome.speaker_id = Some(speaker.id);
    }

    if request.role == UserRole::Author {
        if let Some(details) = request.paper_details.as_ref().filter(|d| !d.title.trim().is_empty()) {
            let submission_type = details
                .submission_type
                .ok_or_else(|| Error::Validation("submission type is required for a paper".into()))?;
            let presentation_type = details
                .presentation_type
                .ok_or_else(|| Error::Validation("presentation type is required for a paper".into()))?;
            let document_url = match &paper_file {
                Some(file) => {
                    let path = format!("papers/{}/{}", user_id, file.name);
                    uploader.put(&path, &file.content).await?
                }
                None => String::new(),
            };
            let now = Utc::now();
            let paper = Paper {
                id: Uuid::new_v4().to_string(),
                title: details.title.trim().to_owned(),
                abstract_text: details.abstract_text.clone(),
                keywords: split_list(&details.keywords),
                author_id: user_id.clone(),
                submission_type,
                presentation_type,
                status: PaperStatus::Draft,
                review_status: ReviewStatus::Pending,
                document_url,
                created_at: now,
                updated_at: now,
            };
            store.insert_paper(&paper).await?;
            outcome.paper_id = Some(paper.id);
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemRegistry {
        users: Mutex<Vec<UserInsert>>,
        authors: Mutex<Vec<Author>>,
        speakers: Mutex<Vec<Speaker>>,
        papers: Mutex<Vec<Paper>>,
    }

    impl UserCommon for MemRegistry {
        async fn insert(&self, user: &UserInsert) -> Result<(), Error> {
            self.users.lock().unwrap().push(user.clone());
            Ok(())
        }

        async fn email_exists(&self, email: &str) -> Result<bool, Error> {
            Ok(self.users.lock().unwrap().iter().any(|u| u.email == email))
        }
    }

    impl RegistrationCommon for MemRegistry {
        async fn insert_author(&self, author: &Author) -> Result<(), Error> {
            self.authors.lock().unwrap().push(author.clone());
            Ok(())
        }

        async fn insert_speaker(&self, speaker: &Speaker) -> Result<(), Error> {
            self.speakers.lock().unwrap().push(speaker.clone());
            Ok(())
        }

        async fn insert_paper(&self, paper: &Paper) -> Result<(), Error> {
            self.papers.lock().unwrap().push(paper.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemUploader {
        blobs: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl Uploader for MemUploader {
        async fn put(&self, path: &str, content: &[u8]) -> Result<String, Error> {
            self.blobs.lock().unwrap().insert(path.to_owned(), content.to_vec());
            Ok(format!("mem://{}", path))
        }

        async fn get(&self, path: &str) -> Result<Vec<u8>, Error> {
            self.blobs.lock().unwrap().get(path).cloned().ok_or_else(|| Error::NotFound("file".into()))
        }

        async fn delete(&self, path: &str) -> Result<(), Error> {
            self.blobs.lock().unwrap().remove(path).map(|_| ()).ok_or_else(|| Error::NotFound("file".into()))
        }

        async fn download_url(&self, path: &str) -> Result<String, Error> {
            Ok(format!("mem://{}", path))
        }
    }

    fn author_request() -> RegistrationRequest {
        RegistrationRequest {
            email: "ada@conf.example".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            organization: "Analytical Engines".into(),
            phone_number: String::new(),
            role: UserRole::Author,
            author_details: Some(AuthorDetails {
                bio: "Mathematician".into(),
                is_presenting: false,
            }),
            speaker_details: None,
            paper_details: None,
        }
    }

    #[test]
    fn test_hash_password_depends_on_salt() {
        let a = hash_password("secret", "salt-one");
        let b = hash_password("secret", "salt-two");
        assert_ne!(a, b);
        assert_eq!(a, hash_password("secret", "salt-one"));
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_random_salt_shape() {
        let salt = random_salt();
        assert_eq!(salt.len(), 32);
        assert!(salt.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(salt, random_salt());
    }

    #[tokio::test]
    async fn test_author_registration_creates_author_doc() {
        let store = MemRegistry::default();
        let uploader = MemUploader::default();
        let outcome = register(&store, &uploader, author_request(), None).await.unwrap();
        assert!(outcome.author_id.is_some());
        assert!(outcome.speaker_id.is_none());
        let authors = store.authors.lock().unwrap();
        assert_eq!(authors[0].name, "Ada Lovelace");
        let users = store.users.lock().unwrap();
        assert_eq!(users[0].role, UserRole::Author);
        assert_ne!(users[0].password, "");
    }

    #[tokio::test]
    async fn test_presenting_author_becomes_speaker() {
        let store = MemRegistry::default();
        let uploader = MemUploader::default();
        let mut request = author_request();
        request.author_details.as_mut().unwrap().is_presenting = true;
        request.speaker_details = Some(SpeakerDetails {
            bio: "Speaker bio".into(),
            expertise: "computing, mathematics".into(),
            social_links: SocialLinks::default(),
        });
        let outcome = register(&store, &uploader, request, None).await.unwrap();
        assert!(outcome.speaker_id.is_some());
        assert!(outcome.author_id.is_none());
        let speakers = store.speakers.lock().unwrap();
        assert_eq!(speakers[0].expertise, vec!["computing", "mathematics"]);
        assert_eq!(store.users.lock().unwrap()[0].role, UserRole::Speaker);
    }

    #[tokio::test]
    async fn test_delegate_with_details_is_rejected() {
        let store = MemRegistry::default();
        let uploader = MemUploader::default();
        let mut request = author_request();
        request.role = UserRole::Delegate;
        assert!(matches!(register(&store, &uploader, request, None).await, Err(Error::Validation(_))));
        assert!(store.users.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = MemRegistry::default();
        let uploader = MemUploader::default();
        register(&store, &uploader, author_request(), None).await.unwrap();
        assert!(matches!(
            register(&store, &uploader, author_request(), None).await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_paper_submission_uploads_document() {
        let store = MemRegistry::default();
        let uploader = MemUploader::default();
        let mut request = author_request();
        request.paper_details = Some(PaperDetails {
            title: "Notes on the Analytical Engine".into(),
            abstract_text: "An early program".into(),
            keywords: "computing, history".into(),
            submission_type: Some(SubmissionType::FullPaper),
            presentation_type: Some(PresentationType::Oral),
        });
        let file = FileUpload {
            name: "notes.pdf".into(),
            content_type: "application/pdf".into(),
            content: vec![1, 2, 3],
        };
        let outcome = register(&store, &uploader, request, Some(file)).await.unwrap();
        assert!(outcome.paper_id.is_some());
        let papers = store.papers.lock().unwrap();
        assert_eq!(papers[0].status, PaperStatus::Draft);
        assert_eq!(papers[0].review_status, ReviewStatus::Pending);
        let expected_path = format!("papers/{}/notes.pdf", outcome.user_id);
        assert_eq!(papers[0].document_url, format!("mem://{}", expected_path));
        assert!(uploader.blobs.lock().unwrap().contains_key(&expected_path));
    }
}
