//! Configuration form building
//!
//! The presenter turns an extension's effective configuration into a
//! renderer-agnostic [`FormDescriptor`]. Rendering it is up to the host.

use crate::manifest::url_name;
use orchestra_core::ConfigMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Strings longer than this are edited in a textarea
const TEXTAREA_THRESHOLD: usize = 80;

/// Kind of input control for one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Textarea,
    Number,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub value: Value,
}

impl Field {
    /// Build a field whose control is picked from the value's JSON type
    pub fn for_value(name: impl Into<String>, value: Value) -> Self {
        let name = name.into();
        let kind = match &value {
            Value::Bool(_) => FieldKind::Checkbox,
            Value::Number(_) => FieldKind::Number,
            Value::String(s) if s.len() > TEXTAREA_THRESHOLD || s.contains('\n') => {
                FieldKind::Textarea
            }
            Value::Array(_) | Value::Object(_) => FieldKind::Textarea,
            _ => FieldKind::Text,
        };
        Self {
            label: label_for(&name),
            name,
            kind,
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fieldset {
    pub name: String,
    pub fields: Vec<Field>,
}

/// Presentable description of an extension configuration form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDescriptor {
    /// Extension the form configures
    pub name: String,
    /// URL the form submits to
    pub action: String,
    pub method: String,
    pub fieldsets: Vec<Fieldset>,
}

impl FormDescriptor {
    /// Look up a field by name across all fieldsets
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fieldsets
            .iter()
            .flat_map(|fieldset| fieldset.fields.iter())
            .find(|field| field.name == name)
    }

    /// Append a field to the named fieldset, creating it if needed
    pub fn add_field(&mut self, fieldset: &str, field: Field) {
        match self.fieldsets.iter_mut().find(|f| f.name == fieldset) {
            Some(existing) => existing.fields.push(field),
            None => self.fieldsets.push(Fieldset {
                name: fieldset.to_string(),
                fields: vec![field],
            }),
        }
    }
}

/// Builds the configuration form for an extension
pub trait FormBuilder: Send + Sync {
    fn build_form(&self, config: &ConfigMap, name: &str) -> FormDescriptor;
}

/// Default form builder: one fieldset with a field per configuration key
pub struct ExtensionPresenter {
    handles: String,
}

impl ExtensionPresenter {
    /// Fieldset holding the configuration keys
    pub const FIELDSET: &'static str = "Extension Configuration";

    /// `handles` is the admin URL prefix, e.g. `admin`
    pub fn new(handles: impl Into<String>) -> Self {
        Self {
            handles: handles.into().trim_matches('/').to_string(),
        }
    }
}

impl FormBuilder for ExtensionPresenter {
    fn build_form(&self, config: &ConfigMap, name: &str) -> FormDescriptor {
        let mut keys: Vec<&String> = config.keys().collect();
        keys.sort();

        // `handles` is always offered so extensions can be mounted elsewhere
        let mut fields: Vec<Field> = keys
            .into_iter()
            .filter(|key| key.as_str() != "handles")
            .map(|key| Field::for_value(key.clone(), config[key.as_str()].clone()))
            .collect();
        if let Some(handles) = config.get("handles") {
            fields.insert(0, Field::for_value("handles", handles.clone()));
        }

        FormDescriptor {
            name: name.to_string(),
            action: format!("/{}/extensions/configure/{}", self.handles, url_name(name)),
            method: "POST".to_string(),
            fieldsets: vec![Fieldset {
                name: Self::FIELDSET.to_string(),
                fields,
            }],
        }
    }
}

fn label_for(key: &str) -> String {
    let words = key
        .split(['_', '-'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>();
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> ConfigMap {
        orchestra_core::types::config_from_value(value)
    }

    #[test]
    fn test_form_has_one_field_per_key_sorted() {
        let presenter = ExtensionPresenter::new("/admin/");
        let form = presenter.build_form(
            &config(json!({"title": "A", "enabled": true, "per_page": 10})),
            "acme/blog",
        );

        assert_eq!(form.action, "/admin/extensions/configure/acme.blog");
        assert_eq!(form.fieldsets.len(), 1);
        let names: Vec<&str> = form.fieldsets[0]
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["enabled", "per_page", "title"]);
        assert_eq!(form.field("enabled").unwrap().kind, FieldKind::Checkbox);
        assert_eq!(form.field("per_page").unwrap().kind, FieldKind::Number);
        assert_eq!(form.field("per_page").unwrap().label, "Per Page");
    }

    #[test]
    fn test_handles_field_comes_first() {
        let presenter = ExtensionPresenter::new("admin");
        let form = presenter.build_form(
            &config(json!({"author": "X", "handles": "blog"})),
            "acme/blog",
        );
        assert_eq!(form.fieldsets[0].fields[0].name, "handles");
    }

    #[test]
    fn test_empty_config_builds_empty_fieldset() {
        let form = ExtensionPresenter::new("admin").build_form(&ConfigMap::new(), "acme/blog");
        assert!(form.fieldsets[0].fields.is_empty());
    }

    #[test]
    fn test_long_strings_use_textarea() {
        let field = Field::for_value("body", json!("line one\nline two"));
        assert_eq!(field.kind, FieldKind::Textarea);
        let field = Field::for_value("tags", json!(["a", "b"]));
        assert_eq!(field.kind, FieldKind::Textarea);
    }

    #[test]
    fn test_add_field_creates_fieldset() {
        let mut form = ExtensionPresenter::new("admin").build_form(&ConfigMap::new(), "acme/blog");
        form.add_field("SEO", Field::for_value("meta", json!("")));
        assert_eq!(form.fieldsets.len(), 2);
        assert!(form.field("meta").is_some());
    }
}
