// src/ports/mod.rs
pub mod api_payload;
pub mod paste;

pub use api_payload::{batch_payloads, ApiNode, DataType, Payload, PayloadBuilder};
pub use paste::PasteGenerator;
