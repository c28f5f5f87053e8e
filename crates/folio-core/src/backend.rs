//! Request/response contract with the assistant backend.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::tools::RawToolCall;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantRequest {
    pub user_text: String,
    /// Serialized `UiContextSnapshot`
    pub context_snapshot: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    /// May be empty when the model only acted
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tool_calls: Vec<RawToolCall>,
}

/// Anything that can answer a user question with text plus tool calls
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    async fn respond(&self, request: &AssistantRequest) -> Result<AssistantReply>;

    /// Short label for status lines and logs
    fn describe(&self) -> String;
}
