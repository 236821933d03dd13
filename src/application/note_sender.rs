// src/application/note_sender.rs
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::constants::DEFAULT_TARGET;
use crate::domain::{BatchError, Note, SendError, TransportError};
use crate::ports::{batch_payloads, ApiNode, Payload, PayloadBuilder};

/// Delivers one payload to the Tana Input API.
///
/// Calls take `&mut self`: an implementation sees its calls one at a time, in
/// the order they were issued.
#[allow(async_fn_in_trait)]
pub trait PayloadSender {
    async fn make_request(&mut self, payload: &Payload) -> Result<Value, TransportError>;
}

pub struct NoteSender<S: PayloadSender> {
    sender: S,
    builder: PayloadBuilder,
}

impl<S: PayloadSender> NoteSender<S> {
    pub fn new(sender: S) -> Self {
        Self {
            sender,
            builder: PayloadBuilder::new(),
        }
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Build a single-note payload and send it.
    #[instrument(level = "debug", skip(self, note), fields(content = %note.content))]
    pub async fn add_content(&mut self, note: &Note, target: Option<&str>) -> Result<Value, SendError> {
        let payload = self.builder.create_payload(note, target)?;
        debug!(target_node = %payload.target_node_id, "Sending note");
        let response = self.sender.make_request(&payload).await?;
        info!(target_node = %payload.target_node_id, "Note added");
        Ok(response)
    }

    /// Send `nodes` in consecutive chunks of at most `batch_size`, one call per chunk.
    ///
    /// Chunks go out strictly one after another. The first failing chunk stops the
    /// run; responses of the chunks sent before it are returned inside the error.
    pub async fn add_multiple_nodes(
        &mut self,
        nodes: Vec<ApiNode>,
        target: Option<&str>,
        batch_size: usize,
    ) -> Result<Vec<Value>, BatchError> {
        let payloads = batch_payloads(nodes, target.unwrap_or(DEFAULT_TARGET), batch_size)
            .map_err(|source| BatchError {
                chunk: 0,
                completed: Vec::new(),
                source,
            })?;
        let total = payloads.len();
        let mut results = Vec::with_capacity(total);

        for (chunk, payload) in payloads.iter().enumerate() {
            debug!(chunk, total, nodes = payload.nodes.len(), "Sending batch");
            match self.sender.make_request(payload).await {
                Ok(response) => results.push(response),
                Err(source) => {
                    return Err(BatchError {
                        chunk,
                        completed: results,
                        source,
                    })
                }
            }
        }

        info!(batches = total, "All batches sent");
        Ok(results)
    }

    /// Convert notes to API nodes and send them batched.
    pub async fn add_notes(
        &mut self,
        notes: &[Note],
        target: Option<&str>,
        batch_size: usize,
    ) -> Result<Vec<Value>, SendError> {
        let nodes = notes
            .iter()
            .map(|note| self.builder.create_node(note))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.add_multiple_nodes(nodes, target, batch_size).await?)
    }
}
