// src/domain/mod.rs
pub mod error;
pub mod field;
pub mod note;
pub mod template;

pub use error::{BatchError, DomainError, SendError, TransportError};
pub use field::{format_tag, parse_field, Field};
pub use note::{Child, Note};
pub use template::{apply_template, Template};
