//! Ollama transport session and streaming decoder.
//!
//! One [`Session`] lives for the whole process and carries the HTTP client
//! plus the retry policy. Responses arrive as newline-delimited JSON
//! fragments which are reassembled and accumulated into the final text.

use crate::error::ChatError;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Per-attempt bound on connecting and on reads between response chunks.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Automatic re-attempt rules for the POST path.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    /// Base delay; doubles after every failed attempt.
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep after `attempt` failed attempts (1-based).
    fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_base * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Statuses that indicate a transient condition worth retrying.
fn is_retryable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}

/// Transport faults worth retrying: the server may simply not be up yet.
fn is_retryable_transport(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}

/// Long-lived transport handle, reused across all requests in the process.
pub struct Session {
    http: Client,
    retry: RetryPolicy,
}

impl Session {
    /// Create a session with the given retry policy.
    pub fn new(retry: RetryPolicy) -> Self {
        // connect/read bounds rather than a whole-request deadline: an
        // actively streaming response may legitimately run past 10s.
        let http = Client::builder()
            .connect_timeout(REQUEST_TIMEOUT)
            .read_timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { http, retry }
    }

    /// Send a generate request and accumulate the streamed response text.
    pub async fn generate(&self, url: &str, request: &GenerateRequest) -> Result<String, ChatError> {
        debug!(url, model = %request.model, "sending generate request");
        let response = self.post_with_retry(url, request).await?;

        let mut stream = response.bytes_stream();
        let mut accumulator = StreamAccumulator::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            accumulator.push_chunk(&chunk);
            if accumulator.is_done() {
                break;
            }
        }

        Ok(accumulator.finish())
    }

    /// Issue the POST, re-attempting transient failures per the policy.
    async fn post_with_retry(
        &self,
        url: &str,
        request: &GenerateRequest,
    ) -> Result<reqwest::Response, ChatError> {
        let mut attempt = 1u32;
        loop {
            match self.http.post(url).json(request).send().await {
                Ok(response) => {
                    let status = response.status();
                    if !is_retryable_status(status) || attempt >= self.retry.max_attempts {
                        return check_status(response);
                    }
                    warn!(%status, attempt, "server unavailable, will retry");
                }
                Err(err) => {
                    if !is_retryable_transport(&err) || attempt >= self.retry.max_attempts {
                        error!(error = %err, attempt, "request failed");
                        return Err(ChatError::from(err));
                    }
                    warn!(error = %err, attempt, "request failed, will retry");
                }
            }

            tokio::time::sleep(self.retry.delay_after(attempt)).await;
            attempt += 1;
        }
    }
}

/// Fail on any non-success status once retries are spent.
fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ChatError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ChatError::Http(format!(
            "{} {} for url: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            response.url()
        )))
    }
}

/// Outbound payload for the Ollama generate endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    /// Attached only when a syllabus was actually loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syllabus: Option<Value>,
}

impl GenerateRequest {
    /// Assemble a payload; an empty syllabus is left off entirely.
    pub fn new(model: &str, prompt: &str, syllabus: &Value) -> Self {
        let syllabus = if is_empty_context(syllabus) {
            None
        } else {
            Some(syllabus.clone())
        };

        Self {
            model: model.to_string(),
            prompt: prompt.to_string(),
            syllabus,
        }
    }
}

fn is_empty_context(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// One decoded line of the streamed response.
///
/// Both fields are optional on the wire; a fragment carrying neither is a
/// valid empty contribution.
#[derive(Debug, Default, Deserialize)]
struct Fragment {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
}

/// Accumulates fragment text from a stream of arbitrary byte chunks.
///
/// Chunk boundaries do not align with line boundaries, so complete lines are
/// reassembled in a buffer before decoding. A malformed line is logged and
/// skipped; it never aborts the rest of the stream.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    buffer: String,
    text: String,
    done: bool,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of response bytes, consuming any completed lines.
    pub fn push_chunk(&mut self, chunk: &[u8]) {
        if self.done {
            return;
        }
        self.buffer.push_str(&String::from_utf8_lossy(chunk));
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            self.push_line(line.trim());
            if self.done {
                return;
            }
        }
    }

    /// True once a fragment with `done` has been seen; no further input is
    /// consumed after that.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Flush any trailing unterminated line and return the trimmed text.
    pub fn finish(mut self) -> String {
        if !self.done {
            let rest = std::mem::take(&mut self.buffer);
            self.push_line(rest.trim());
        }
        self.text.trim().to_string()
    }

    fn push_line(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        debug!(line, "decoded stream line");
        match serde_json::from_str::<Fragment>(line) {
            Ok(fragment) => {
                self.text.push_str(&fragment.response);
                if fragment.done {
                    self.done = true;
                }
            }
            Err(err) => {
                error!(line, error = %err, "failed to decode stream line");
            }
        }
    }
}
