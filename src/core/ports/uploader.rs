use crate::error::Error;

/// A binary attachment as received from the client, before it has been
/// handed to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub name: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl FileUpload {
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn extension(&self) -> &str {
        self.name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("bin")
    }
}

pub trait Uploader {
    /// Stores the blob under `path` and returns a resolvable download
    /// reference for it.
    async fn put(&self, path: &str, content: &[u8]) -> Result<String, Error>;
    /// Fails with `Error::NotFound` when no blob exists at `path`.
    async fn get(&self, path: &str) -> Result<Vec<u8>, Error>;
    /// Fails with `Error::NotFound` when no blob exists at `path`.
    async fn delete(&self, path: &str) -> Result<(), Error>;
    async fn download_url(&self, path: &str) -> Result<String, Error>;
}
