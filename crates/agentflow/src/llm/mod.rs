//! LLM call adapter boundary.
//!
//! - `LlmClient`: the single abstract capability the core consumes
//! - `LlmResponse` / `ToolCall`: what an adapter returns
//! - `LlmError`: adapter failures, surfaced immediately (no retry in the core)
//! - `MockLlm`: scripted adapter for tests and examples

mod client;
mod error;
mod mock;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use mock::MockLlm;
pub use types::{LlmResponse, ToolCall};
