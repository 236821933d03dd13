// src/application/mod.rs
pub mod note_sender;
pub mod validator;

pub use note_sender::{NoteSender, PayloadSender};
pub use validator::ValidationReport;
