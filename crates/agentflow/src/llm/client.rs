//! The adapter trait the core calls into.

use async_trait::async_trait;

use super::{LlmError, LlmResponse};
use crate::message::Message;
use crate::schema::OutputSchema;
use crate::tool::ToolSpec;

/// Abstract LLM capability: `generate(messages, tools?, schema?) -> response`.
///
/// Provider specifics (transport, auth, retry, timeout) live in concrete
/// implementations outside the core. The call is synchronous from the calling
/// node's perspective: the node suspends until a response or failure arrives.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// One generation turn over the given history.
    ///
    /// `tools` is the set the model may request; `schema` the shape a
    /// structured response should take. Both are advisory for the adapter
    /// (e.g. rendered into the request); the core enforces them on the way
    /// back via the registry and the schema engine.
    async fn generate(
        &self,
        messages: &[Message],
        tools: Option<&[ToolSpec]>,
        schema: Option<&OutputSchema>,
    ) -> Result<LlmResponse, LlmError>;
}
