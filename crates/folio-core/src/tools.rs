//! The tool vocabulary shared by the assistant backend and the executor.
//!
//! Backends hand over loosely-typed `RawToolCall`s; they are decoded into the
//! closed `ToolCall` enum here and nowhere else.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    Navigate,
    ScrollToElement,
    HighlightElement,
    FillForm,
    ClickElement,
}

impl ToolName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::Navigate => "navigate",
            ToolName::ScrollToElement => "scrollToElement",
            ToolName::HighlightElement => "highlightElement",
            ToolName::FillForm => "fillForm",
            ToolName::ClickElement => "clickElement",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "navigate" => Some(ToolName::Navigate),
            "scrollToElement" => Some(ToolName::ScrollToElement),
            "highlightElement" => Some(ToolName::HighlightElement),
            "fillForm" => Some(ToolName::FillForm),
            "clickElement" => Some(ToolName::ClickElement),
            _ => None,
        }
    }

    pub fn all() -> Vec<ToolName> {
        vec![
            ToolName::Navigate,
            ToolName::ScrollToElement,
            ToolName::HighlightElement,
            ToolName::FillForm,
            ToolName::ClickElement,
        ]
    }
}

/// A tool call as it arrives from a backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawToolCall {
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl RawToolCall {
    pub fn new(name: &str, args: Value) -> Self {
        let args = match args {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            name: name.to_string(),
            args,
        }
    }

    /// Argument as a string; absent or null is empty, other values are stringified
    fn arg(&self, key: &str) -> String {
        match self.args.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolCallError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    Navigate { section_id: String },
    ScrollToElement { selector: String },
    HighlightElement { selector: String },
    FillForm { field: String, value: String },
    ClickElement { selector: String },
}

impl ToolCall {
    pub fn decode(raw: &RawToolCall) -> Result<Self, ToolCallError> {
        let name = ToolName::parse(&raw.name).ok_or_else(|| ToolCallError::UnknownTool {
            name: raw.name.clone(),
        })?;
        Ok(match name {
            ToolName::Navigate => ToolCall::Navigate {
                section_id: raw.arg("sectionId"),
            },
            ToolName::ScrollToElement => ToolCall::ScrollToElement {
                selector: raw.arg("selector"),
            },
            ToolName::HighlightElement => ToolCall::HighlightElement {
                selector: raw.arg("selector"),
            },
            ToolName::FillForm => ToolCall::FillForm {
                field: raw.arg("field"),
                value: raw.arg("value"),
            },
            ToolName::ClickElement => ToolCall::ClickElement {
                selector: raw.arg("selector"),
            },
        })
    }

    pub fn name(&self) -> ToolName {
        match self {
            ToolCall::Navigate { .. } => ToolName::Navigate,
            ToolCall::ScrollToElement { .. } => ToolName::ScrollToElement,
            ToolCall::HighlightElement { .. } => ToolName::HighlightElement,
            ToolCall::FillForm { .. } => ToolName::FillForm,
            ToolCall::ClickElement { .. } => ToolName::ClickElement,
        }
    }

    pub fn is_navigation(&self) -> bool {
        matches!(self, ToolCall::Navigate { .. })
    }
}

/// Decode a backend batch, dropping calls outside the vocabulary
pub fn decode_batch(raw: &[RawToolCall]) -> Vec<ToolCall> {
    raw.iter()
        .filter_map(|call| match ToolCall::decode(call) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(error = %e, "Ignoring tool call");
                None
            }
        })
        .collect()
}

/// Move every `navigate` call to the front; both groups keep their order
pub fn order_batch(calls: Vec<ToolCall>) -> Vec<ToolCall> {
    let (mut ordered, rest): (Vec<_>, Vec<_>) =
        calls.into_iter().partition(ToolCall::is_navigation);
    ordered.extend(rest);
    ordered
}

/// Function declaration handed to the model
#[derive(Debug, Clone, Serialize)]
pub struct ToolDeclaration {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

fn string_params(props: &[(&str, &str)]) -> Value {
    let properties: Map<String, Value> = props
        .iter()
        .map(|(key, description)| {
            (
                key.to_string(),
                json!({ "type": "string", "description": description }),
            )
        })
        .collect();
    let required: Vec<&str> = props.iter().map(|(key, _)| *key).collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

pub fn declarations() -> Vec<ToolDeclaration> {
    ToolName::all()
        .into_iter()
        .map(|name| match name {
            ToolName::Navigate => ToolDeclaration {
                name: name.as_str(),
                description: "Switch the portfolio to another section.",
                parameters: string_params(&[(
                    "sectionId",
                    "Section to show: 'dashboard', 'education' or 'contact'.",
                )]),
            },
            ToolName::ScrollToElement => ToolDeclaration {
                name: name.as_str(),
                description: "Scroll an element into view.",
                parameters: string_params(&[(
                    "selector",
                    "Id selector of the element, e.g. '#proj-mern-1' or '#edu-be'.",
                )]),
            },
            ToolName::HighlightElement => ToolDeclaration {
                name: name.as_str(),
                description: "Briefly highlight an element so the visitor can spot it.",
                parameters: string_params(&[("selector", "Id selector of the element to highlight.")]),
            },
            ToolName::FillForm => ToolDeclaration {
                name: name.as_str(),
                description: "Fill one field of the contact form.",
                parameters: string_params(&[
                    ("field", "Field to fill: 'name', 'email' or 'message'."),
                    ("value", "Text to put in the field."),
                ]),
            },
            ToolName::ClickElement => ToolDeclaration {
                name: name.as_str(),
                description: "Click a button or link.",
                parameters: string_params(&[("selector", "Id selector of the element to click.")]),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav(id: &str) -> ToolCall {
        ToolCall::Navigate {
            section_id: id.to_string(),
        }
    }

    fn highlight(sel: &str) -> ToolCall {
        ToolCall::HighlightElement {
            selector: sel.to_string(),
        }
    }

    #[test]
    fn test_decode_each_tool() {
        let call = RawToolCall::new("fillForm", json!({"field": "email", "value": "a@b.com"}));
        assert_eq!(
            ToolCall::decode(&call).unwrap(),
            ToolCall::FillForm {
                field: "email".into(),
                value: "a@b.com".into()
            }
        );
        let call = RawToolCall::new("navigate", json!({"sectionId": "education"}));
        assert_eq!(ToolCall::decode(&call).unwrap(), nav("education"));
        let call = RawToolCall::new("clickElement", json!({"selector": "#submit-btn"}));
        assert_eq!(ToolCall::decode(&call).unwrap().name(), ToolName::ClickElement);
    }

    #[test]
    fn test_decode_rejects_unknown_name() {
        let call = RawToolCall::new("deleteEverything", json!({}));
        assert_eq!(
            ToolCall::decode(&call),
            Err(ToolCallError::UnknownTool {
                name: "deleteEverything".into()
            })
        );
    }

    #[test]
    fn test_decode_is_permissive_about_arguments() {
        let call = RawToolCall::new("highlightElement", json!({}));
        assert_eq!(ToolCall::decode(&call).unwrap(), highlight(""));

        let call = RawToolCall::new("fillForm", json!({"field": "message", "value": 42}));
        assert_eq!(
            ToolCall::decode(&call).unwrap(),
            ToolCall::FillForm {
                field: "message".into(),
                value: "42".into()
            }
        );

        let call = RawToolCall::new("navigate", Value::Null);
        assert_eq!(ToolCall::decode(&call).unwrap(), nav(""));
    }

    #[test]
    fn test_decode_batch_drops_unknown() {
        let raw = vec![
            RawToolCall::new("navigate", json!({"sectionId": "dashboard"})),
            RawToolCall::new("openPopup", json!({})),
            RawToolCall::new("highlightElement", json!({"selector": "#proj-rn-1"})),
        ];
        assert_eq!(decode_batch(&raw), vec![nav("dashboard"), highlight("#proj-rn-1")]);
    }

    #[test]
    fn test_order_batch_is_stable_partition() {
        let batch = vec![
            highlight("#a"),
            nav("education"),
            highlight("#b"),
            nav("contact"),
            ToolCall::ScrollToElement {
                selector: "#c".into(),
            },
        ];
        let ordered = order_batch(batch);
        assert_eq!(
            ordered,
            vec![
                nav("education"),
                nav("contact"),
                highlight("#a"),
                highlight("#b"),
                ToolCall::ScrollToElement {
                    selector: "#c".into()
                },
            ]
        );
    }

    #[test]
    fn test_order_batch_without_navigation_is_unchanged() {
        let batch = vec![highlight("#a"), highlight("#b")];
        assert_eq!(order_batch(batch.clone()), batch);
        assert!(order_batch(Vec::new()).is_empty());
    }

    #[test]
    fn test_declarations_cover_vocabulary() {
        let decls = declarations();
        let names: Vec<_> = decls.iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec!["navigate", "scrollToElement", "highlightElement", "fillForm", "clickElement"]
        );
        let fill = &decls[3].parameters;
        assert_eq!(fill["required"], json!(["field", "value"]));
        assert_eq!(fill["properties"]["field"]["type"], "string");
    }

    #[test]
    fn test_raw_tool_call_deserializes_without_args() {
        let raw: RawToolCall = serde_json::from_str(r#"{"name":"navigate"}"#).unwrap();
        assert!(raw.args.is_empty());
    }
}
