pub mod gemini;
pub mod ollama;

use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::backend::{AssistantBackend, AssistantReply, AssistantRequest};
use crate::config::Config;
use crate::portfolio::OWNER_NAME;
use crate::provider::Provider;

pub use gemini::GeminiClient;
pub use ollama::OllamaClient;

pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:latest";

/// System instruction wrapped around the current page context
pub fn system_instruction(context: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "You are {}'s portfolio assistant. Answer questions about {}'s projects, \
         education and contact details using the page context below.\n\n",
        OWNER_NAME, OWNER_NAME
    ));

    prompt.push_str("Always reply in two parts:\n");
    prompt.push_str("1. A complete conversational sentence that answers the question with the \
                     specific numbers or names from the context.\n");
    prompt.push_str("2. Tool calls that show the answer on the page: navigate to the right \
                     section, then highlight or scroll to the element ids listed in \
                     interactiveElements, projectsData or educationData (use '#id' selectors).\n");
    prompt.push_str("Never answer with tool calls alone.\n\n");

    prompt.push_str("Example: asked for the 10th grade percentage, say it was 79% at \
                     Godavari English Medium CBSE School, then call navigate(sectionId: \
                     'education') and highlightElement(selector: '#edu-10th').\n\n");

    prompt.push_str("To help a visitor get in touch, fill the contact form with fillForm \
                     (fields: name, email, message) and submit it with clickElement \
                     (selector: '#submit-btn') only when asked to send it.\n\n");

    prompt.push_str("CURRENT PAGE CONTEXT:\n");
    prompt.push_str(context);

    prompt
}

/// Stands in for a provider that cannot be reached; every request fails
pub struct Unconfigured {
    reason: String,
}

impl Unconfigured {
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl AssistantBackend for Unconfigured {
    async fn respond(&self, _request: &AssistantRequest) -> Result<AssistantReply> {
        Err(anyhow!("{}", self.reason))
    }

    fn describe(&self) -> String {
        format!("not configured: {}", self.reason)
    }
}

pub fn default_model(provider: Provider) -> String {
    match provider {
        Provider::Gemini => GeminiClient::list_models()
            .into_iter()
            .next()
            .unwrap_or_default(),
        Provider::Ollama => DEFAULT_OLLAMA_MODEL.to_string(),
    }
}

/// Backend for `provider`, or an `Unconfigured` one when its key is missing
pub fn build_backend(provider: Provider, model: &str, config: &Config) -> Arc<dyn AssistantBackend> {
    match provider {
        Provider::Gemini => match config.gemini_api_key() {
            Some(key) => Arc::new(GeminiClient::new(&key, model)),
            None => Arc::new(Unconfigured::new(
                "Gemini API key not found. Set GEMINI_API_KEY or add gemini_api_key to the config file.",
            )),
        },
        Provider::Ollama => Arc::new(OllamaClient::new(config.ollama_url(), model)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_instruction_embeds_context() {
        let prompt = system_instruction("{\"currentTab\":\"education\"}");
        assert!(prompt.ends_with("{\"currentTab\":\"education\"}"));
        assert!(prompt.contains("highlightElement"));
    }

    #[tokio::test]
    async fn test_unconfigured_backend_always_fails() {
        let backend = Unconfigured::new("no key");
        let request = AssistantRequest {
            user_text: "hi".into(),
            context_snapshot: "{}".into(),
        };
        let err = backend.respond(&request).await.unwrap_err();
        assert_eq!(err.to_string(), "no key");
        assert!(backend.describe().contains("no key"));
    }

    #[test]
    fn test_ollama_backend_needs_no_key() {
        let config = Config {
            ollama_url: Some("http://localhost:1".into()),
            ..Config::default()
        };
        let backend = build_backend(Provider::Ollama, "llama3.2:latest", &config);
        assert_eq!(backend.describe(), "Ollama: llama3.2:latest");
    }

    #[test]
    fn test_default_models() {
        assert_eq!(default_model(Provider::Ollama), DEFAULT_OLLAMA_MODEL);
        assert!(default_model(Provider::Gemini).starts_with("gemini"));
    }
}
