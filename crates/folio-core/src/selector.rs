//! Element selectors as emitted by the assistant.
//!
//! Only id selectors are meaningful in the portfolio document: `#edu-be`,
//! `[id="edu-be"]`, `[id='edu-be']` or `[id=edu-be]`. Anything else parses
//! to `None` and matches nothing.

use std::sync::OnceLock;

use regex::Regex;

fn id_selector_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"^\s*(?:#([A-Za-z][\w-]*)|\[\s*id\s*=\s*(?:"([^"]+)"|'([^']+)'|([A-Za-z][\w-]*))\s*\])\s*$"#,
        )
        .expect("id selector pattern is valid")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    id: String,
}

impl Selector {
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = id_selector_pattern().captures(raw)?;
        let id = (1..=4).find_map(|i| caps.get(i))?.as_str();
        Some(Self { id: id.to_string() })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_selector() {
        assert_eq!(Selector::parse("#proj-rn-1").unwrap().id(), "proj-rn-1");
        assert_eq!(Selector::parse("  #edu-be ").unwrap().id(), "edu-be");
    }

    #[test]
    fn test_attribute_selectors() {
        assert_eq!(Selector::parse("[id=\"edu-10th\"]").unwrap().id(), "edu-10th");
        assert_eq!(Selector::parse("[id='submit-btn']").unwrap().id(), "submit-btn");
        assert_eq!(Selector::parse("[id=form-email]").unwrap().id(), "form-email");
    }

    #[test]
    fn test_unsupported_selectors() {
        assert!(Selector::parse("proj-rn-1").is_none());
        assert!(Selector::parse(".card").is_none());
        assert!(Selector::parse("#a #b").is_none());
        assert!(Selector::parse("").is_none());
    }
}
