// src/util/testing.rs

use anyhow::Result;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::env;
use tokio::time::{sleep, Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::PayloadSender;
use crate::domain::TransportError;
use crate::ports::Payload;

/// One call seen by [`MockPayloadSender`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub payload: Payload,
    pub started: Instant,
    pub finished: Instant,
}

/// In-memory [`PayloadSender`] that records every payload it receives.
///
/// # Examples
///
/// ```
/// use tana_cli::domain::TransportError;
/// use tana_cli::util::testing::MockPayloadSender;
/// use serde_json::json;
///
/// let mock = MockPayloadSender::builder()
///     .with_response(json!({"ok": true}))
///     .with_failure_on_call(2, TransportError::Network("down".to_string()))
///     .build();
/// assert!(mock.calls().is_empty());
/// ```
#[derive(Debug)]
pub struct MockPayloadSender {
    response: Value,
    failures: HashMap<usize, TransportError>,
    latency: Duration,
    calls: Vec<RecordedCall>,
}

impl MockPayloadSender {
    pub fn builder() -> MockPayloadSenderBuilder {
        MockPayloadSenderBuilder::new()
    }

    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }
}

impl PayloadSender for MockPayloadSender {
    async fn make_request(&mut self, payload: &Payload) -> Result<Value, TransportError> {
        let index = self.calls.len();
        let started = Instant::now();
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }
        self.calls.push(RecordedCall {
            payload: payload.clone(),
            started,
            finished: Instant::now(),
        });

        match self.failures.get(&index) {
            Some(error) => Err(error.clone()),
            None => Ok(self.response.clone()),
        }
    }
}

/// Builder for MockPayloadSender
pub struct MockPayloadSenderBuilder {
    response: Value,
    failures: HashMap<usize, TransportError>,
    latency: Duration,
}

impl MockPayloadSenderBuilder {
    pub fn new() -> Self {
        Self {
            response: json!({}),
            failures: HashMap::new(),
            latency: Duration::ZERO,
        }
    }

    /// Body returned by every successful call
    pub fn with_response(mut self, response: Value) -> Self {
        self.response = response;
        self
    }

    /// Fail the call with zero-based index `call`
    pub fn with_failure_on_call(mut self, call: usize, error: TransportError) -> Self {
        self.failures.insert(call, error);
        self
    }

    /// Simulated time each call takes
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn build(self) -> MockPayloadSender {
        MockPayloadSender {
            response: self.response,
            failures: self.failures,
            latency: self.latency,
            calls: Vec::new(),
        }
    }
}

impl Default for MockPayloadSenderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "hyper_util", "reqwest", "rustls", "mio"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Set up the subscriber with environment filter
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    // Build and set the subscriber
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
