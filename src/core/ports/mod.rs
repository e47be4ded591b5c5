pub mod repository;
pub mod uploader;
