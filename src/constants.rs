// src/constants.rs
//
// Application-wide constants shared by the serializers, the API client and the validator.

/// First line of every Tana Paste document.
///
/// Used in: `ports/paste.rs`, `application/validator.rs`
pub const PASTE_HEADER: &str = "%%tana%%";

/// Maximum note nesting the serializers will follow before failing.
///
/// Both serializers recurse once per level; the guard turns a pathological tree
/// into a `DomainError::Render` instead of a stack overflow.
///
/// Used in: `ports/paste.rs`, `ports/api_payload.rs`
pub const MAX_RENDER_DEPTH: usize = 1000;

/// Node the API inserts into when no target is given.
pub const DEFAULT_TARGET: &str = "INBOX";

/// Tana Input API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://europe-west1-tagr-prod.cloudfunctions.net/addToNodeV2";

/// Default number of top-level nodes per API call in batched sends.
///
/// Used in: `application/note_sender.rs`
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Default calls per second for one API client.
pub const DEFAULT_RATE_LIMIT: f64 = 1.0;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Nodes per call the API accepts.
///
/// Used in: `application/validator.rs`
pub const API_MAX_NODES_PER_CALL: usize = 100;

/// Serialized payload size, in characters, the API accepts.
///
/// Used in: `application/validator.rs`
pub const API_MAX_PAYLOAD_CHARS: usize = 5000;

/// Data types the API understands for `dataType`.
pub const API_DATA_TYPES: &[&str] = &["plain", "field", "url", "date", "reference", "boolean", "file"];
