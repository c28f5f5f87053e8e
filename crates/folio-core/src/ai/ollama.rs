use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::backend::{AssistantBackend, AssistantReply, AssistantRequest};
use crate::tools::{declarations, RawToolCall, ToolDeclaration};

#[derive(Serialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct OllamaTool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: ToolDeclaration,
}

#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    tools: Vec<OllamaTool>,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaFunction {
    name: String,
    #[serde(default)]
    arguments: Map<String, Value>,
}

#[derive(Deserialize)]
struct OllamaToolCall {
    function: OllamaFunction,
}

#[derive(Deserialize, Default)]
struct OllamaResponseMessage {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tool_calls: Vec<OllamaToolCall>,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    #[serde(default)]
    message: OllamaResponseMessage,
}

impl OllamaChatResponse {
    fn into_reply(self) -> AssistantReply {
        AssistantReply {
            text: self.message.content.trim().to_string(),
            tool_calls: self
                .message
                .tool_calls
                .into_iter()
                .map(|call| RawToolCall {
                    name: call.function.name,
                    args: call.function.arguments,
                })
                .collect(),
        }
    }
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

#[derive(Deserialize)]
struct OllamaModelsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub async fn chat(&self, system: &str, prompt: &str) -> Result<AssistantReply> {
        let url = format!("{}/api/chat", self.base_url);

        let request = OllamaChatRequest {
            model: self.model.clone(),
            messages: vec![
                OllamaMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                OllamaMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            tools: declarations()
                .into_iter()
                .map(|function| OllamaTool {
                    kind: "function",
                    function,
                })
                .collect(),
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Ollama request failed with status: {}. Make sure Ollama is running with: ollama serve",
                response.status()
            ));
        }

        let chat_response: OllamaChatResponse = response.json().await?;
        Ok(chat_response.into_reply())
    }

    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("Failed to list models: {}", response.status()));
        }

        let models_response: OllamaModelsResponse = response.json().await?;
        let model_names: Vec<String> = models_response
            .models
            .into_iter()
            .map(|model| model.name)
            .collect();

        Ok(model_names)
    }
}

#[async_trait]
impl AssistantBackend for OllamaClient {
    async fn respond(&self, request: &AssistantRequest) -> Result<AssistantReply> {
        let system = super::system_instruction(&request.context_snapshot);
        self.chat(&system, &request.user_text).await
    }

    fn describe(&self) -> String {
        format!("Ollama: {}", self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reply_maps_tool_calls() {
        let response: OllamaChatResponse = serde_json::from_value(json!({
            "model": "llama3.2",
            "message": {
                "role": "assistant",
                "content": "Your CGPA was 9.02.\n",
                "tool_calls": [
                    {"function": {"name": "navigate", "arguments": {"sectionId": "education"}}},
                    {"function": {"name": "highlightElement", "arguments": {"selector": "#edu-be"}}}
                ]
            },
            "done": true
        }))
        .unwrap();

        let reply = response.into_reply();
        assert_eq!(reply.text, "Your CGPA was 9.02.");
        assert_eq!(reply.tool_calls[0].name, "navigate");
        assert_eq!(reply.tool_calls[1].args["selector"], "#edu-be");
    }

    #[test]
    fn test_reply_without_tool_calls() {
        let response: OllamaChatResponse =
            serde_json::from_value(json!({"message": {"content": "Hi!"}})).unwrap();
        let reply = response.into_reply();
        assert_eq!(reply.text, "Hi!");
        assert!(reply.tool_calls.is_empty());
    }

    #[test]
    fn test_tools_are_wrapped_as_functions() {
        let tool = OllamaTool {
            kind: "function",
            function: declarations().remove(0),
        };
        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "navigate");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = OllamaClient::new("http://localhost:11434/", "llama3.2");
        assert_eq!(client.base_url, "http://localhost:11434");
    }
}
