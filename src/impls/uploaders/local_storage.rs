use std::fs::{create_dir_all, read, remove_file, write};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::core::ports::uploader::Uploader;
use crate::error::Error;

/// Blob storage on the local filesystem, addressed by the same slash-separated
/// paths the store records in `file_info`. Download references point at the
/// service's own `/files/{path}` surface.
pub struct LocalStorage {
    root: PathBuf,
    public_base: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, public_base: &str) -> Self {
        LocalStorage {
            root: root.into(),
            public_base: public_base.trim_end_matches('/').to_owned(),
        }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, Error> {
        let relative = Path::new(path);
        if path.is_empty() || !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(Error::Storage(format!("invalid storage path {}", path)));
        }
        Ok(self.root.join(relative))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/files/{}", self.public_base, path)
    }
}

impl Uploader for LocalStorage {
    async fn put(&self, path: &str, content: &[u8]) -> Result<String, Error> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            create_dir_all(parent)?;
        }
        write(target, content)?;
        Ok(self.url(path))
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, Error> {
        let target = self.resolve(path)?;
        read(target).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::NotFound("file".into()),
            _ => Error::IO(e),
        })
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let target = self.resolve(path)?;
        remove_file(target).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::NotFound("file".into()),
            _ => Error::IO(e),
        })
    }

    async fn download_url(&self, path: &str) -> Result<String, Error> {
        let target = self.resolve(path)?;
        if !target.is_file() {
            return Err(Error::NotFound("file".into()));
        }
        Ok(self.url(path))
    }
}
