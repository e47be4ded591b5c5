pub mod form;
pub mod registration;
