//! Mock LLM for tests and examples.
//!
//! Plays back a scripted sequence of responses, one per `generate` call, with
//! an optional fallback once the script runs out. Counts calls so tests can
//! assert how many generations a run needed.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{LlmClient, LlmError, LlmResponse};
use crate::message::Message;
use crate::schema::OutputSchema;
use crate::tool::ToolSpec;

/// Scripted adapter: pops one response per call.
///
/// With an exhausted script and no fallback, `generate` fails with
/// `LlmError::Api`, which makes over-long runs visible in tests.
pub struct MockLlm {
    script: Mutex<VecDeque<LlmResponse>>,
    fallback: Option<LlmResponse>,
    calls: AtomicUsize,
}

impl MockLlm {
    /// Plays the given responses in order.
    pub fn script(responses: Vec<LlmResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            fallback: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns the same response on every call.
    pub fn always(response: LlmResponse) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(response),
            calls: AtomicUsize::new(0),
        }
    }

    /// Plain-text single response, repeated forever.
    pub fn text(content: impl Into<String>) -> Self {
        Self::always(LlmResponse::text(content))
    }

    /// Keeps returning `response` after the script is exhausted (builder).
    pub fn with_fallback(mut self, response: LlmResponse) -> Self {
        self.fallback = Some(response);
        self
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn generate(
        &self,
        _messages: &[Message],
        _tools: Option<&[ToolSpec]>,
        _schema: Option<&OutputSchema>,
    ) -> Result<LlmResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .script
            .lock()
            .map_err(|_| LlmError::Api("mock script lock poisoned".into()))?
            .pop_front();
        match next.or_else(|| self.fallback.clone()) {
            Some(resp) => Ok(resp),
            None => Err(LlmError::Api("mock script exhausted".into())),
        }
    }
}
