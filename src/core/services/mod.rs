pub mod builder;
pub mod collector;
pub mod registration;
pub mod viewer;
