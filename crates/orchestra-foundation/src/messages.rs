//! Flash messages and translation lines

use orchestra_core::Result;
use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value as YamlValue;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

const ENGLISH_LINES: &str = include_str!("../resources/lang/en.yaml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

/// Messages shown to the user on the next rendered page
#[derive(Debug, Default)]
pub struct Messages {
    items: Mutex<Vec<Message>>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, kind: MessageKind, text: impl Into<String>) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Message {
                kind,
                text: text.into(),
            });
    }

    /// Take every pending message, oldest first
    pub fn drain(&self) -> Vec<Message> {
        std::mem::take(&mut *self.items.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn is_empty(&self) -> bool {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

/// Resolves a translation key to a line
pub trait Translator: Send + Sync {
    /// Unknown keys are returned unchanged
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String;
}

/// Translator over a flat table of dotted keys.
///
/// Lines may contain `:placeholder` markers that are replaced with the
/// matching parameter.
#[derive(Debug, Clone, Default)]
pub struct LineTranslator {
    lines: HashMap<String, String>,
}

impl LineTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in English lines
    pub fn english() -> Result<Self> {
        Self::from_yaml(ENGLISH_LINES)
    }

    /// Load nested YAML mappings, flattening keys with `.`
    pub fn from_yaml(content: &str) -> Result<Self> {
        let root: YamlValue = serde_yaml_ng::from_str(content)?;
        let mut translator = Self::new();
        flatten("", &root, &mut translator.lines);
        Ok(translator)
    }

    pub fn with_line(mut self, key: impl Into<String>, line: impl Into<String>) -> Self {
        self.lines.insert(key.into(), line.into());
        self
    }
}

impl Translator for LineTranslator {
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String {
        let Some(line) = self.lines.get(key) else {
            return key.to_string();
        };

        // Longest placeholder first so `:name` does not clobber `:names`
        let mut params = params.to_vec();
        params.sort_by_key(|(name, _)| std::cmp::Reverse(name.len()));
        params.iter().fold(line.clone(), |line, (name, value)| {
            line.replace(&format!(":{}", name), value)
        })
    }
}

fn flatten(prefix: &str, node: &YamlValue, lines: &mut HashMap<String, String>) {
    match node {
        YamlValue::Mapping(mapping) => {
            for (key, value) in mapping {
                let Some(key) = key.as_str() else { continue };
                let path = if prefix.is_empty() {
                    key.to_string()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&path, value, lines);
            }
        }
        YamlValue::String(line) => {
            lines.insert(prefix.to_string(), line.clone());
        }
        YamlValue::Number(_) | YamlValue::Bool(_) => {
            if let Ok(line) = serde_yaml_ng::to_string(node) {
                lines.insert(prefix.to_string(), line.trim().to_string());
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_drain_in_order() {
        let messages = Messages::new();
        messages.add(MessageKind::Success, "first");
        messages.add(MessageKind::Error, "second");

        let drained = messages.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].text, "first");
        assert_eq!(drained[1].kind, MessageKind::Error);
        assert!(messages.is_empty());
    }

    #[test]
    fn test_english_lines_are_flattened() {
        let translator = LineTranslator::english().unwrap();
        assert_eq!(translator.translate("title.extensions.list", &[]), "Extensions");
        assert_eq!(
            translator.translate("response.extensions.activate", &[("name", "acme/blog")]),
            "Extension acme/blog activated"
        );
    }

    #[test]
    fn test_missing_key_is_echoed() {
        let translator = LineTranslator::new();
        assert_eq!(translator.translate("title.unknown", &[]), "title.unknown");
    }

    #[test]
    fn test_longer_placeholders_win() {
        let translator = LineTranslator::new().with_line("greeting", ":names and :name");
        assert_eq!(
            translator.translate("greeting", &[("name", "A"), ("names", "B")]),
            "B and A"
        );
    }
}
