use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::backend::{AssistantBackend, AssistantReply, AssistantRequest};
use crate::tools::{declarations, RawToolCall, ToolDeclaration};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    function_declarations: Vec<ToolDeclaration>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    tools: Vec<GeminiTool>,
}

#[derive(Deserialize)]
struct GeminiFunctionCall {
    name: String,
    #[serde(default)]
    args: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Deserialize, Default)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: GeminiResponseContent,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

impl GeminiResponse {
    /// Text parts joined with spaces, function-call parts as tool calls
    fn into_reply(self) -> AssistantReply {
        let parts = self
            .candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts)
            .unwrap_or_default();

        let mut texts = Vec::new();
        let mut tool_calls = Vec::new();
        for part in parts {
            if let Some(text) = part.text.filter(|t| !t.is_empty()) {
                texts.push(text);
            }
            if let Some(call) = part.function_call {
                tool_calls.push(RawToolCall {
                    name: call.name,
                    args: call.args,
                });
            }
        }

        AssistantReply {
            text: texts.join(" ").trim().to_string(),
            tool_calls,
        }
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    pub async fn generate(&self, system: &str, prompt: &str) -> Result<AssistantReply> {
        let request = GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: system.to_string(),
                }],
            },
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            tools: vec![GeminiTool {
                function_declarations: declarations(),
            }],
        };

        let url = format!("{}/models/{}:generateContent", GEMINI_API_BASE, self.model);
        let response = self.client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini API error {}: {}", status, text));
        }

        let gemini_response: GeminiResponse = response.json().await?;
        Ok(gemini_response.into_reply())
    }

    pub fn list_models() -> Vec<String> {
        vec![
            "gemini-2.5-flash".to_string(),
            "gemini-2.5-pro".to_string(),
            "gemini-2.0-flash".to_string(),
        ]
    }
}

#[async_trait]
impl AssistantBackend for GeminiClient {
    async fn respond(&self, request: &AssistantRequest) -> Result<AssistantReply> {
        let system = super::system_instruction(&request.context_snapshot);
        self.generate(&system, &request.user_text).await
    }

    fn describe(&self) -> String {
        format!("Gemini: {}", self.model)
    }
}
