pub mod ai;
pub mod backend;
pub mod config;
pub mod context;
pub mod controller;
pub mod document;
pub mod executor;
pub mod highlight;
pub mod portfolio;
pub mod provider;
pub mod selector;
pub mod state;
pub mod tools;

// Re-export main types for convenience
pub use ai::{build_backend, default_model, GeminiClient, OllamaClient};
pub use backend::{AssistantBackend, AssistantReply, AssistantRequest};
pub use config::Config;
pub use context::UiContextSnapshot;
pub use controller::{SubmitError, TurnController};
pub use document::{Document, Element, ElementAction, ElementKind};
pub use executor::ToolExecutor;
pub use provider::Provider;
pub use state::{ChatMessage, ChatRole, Tab, TurnStatus, UiState};
pub use tools::{RawToolCall, ToolCall};
