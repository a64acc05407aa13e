//! Admin request handling for the extensions screens
//!
//! Actions take the extension name as it appears in URLs (`acme.blog`) and
//! return a transport-neutral [`Response`]. Lifecycle errors that mean "no
//! such extension in that state" become [`Response::NotFound`]; anything else
//! is returned as an error.

use crate::messages::{MessageKind, Messages, Translator};
use orchestra_core::{ConfigMap, Result};
use orchestra_extensions::manifest::normalize_name;
use orchestra_extensions::ExtensionLifecycle;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Outcome of an admin action
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Render `view` with `data`
    View {
        view: String,
        title: String,
        description: Option<String>,
        data: Value,
    },
    Redirect {
        to: String,
    },
    NotFound,
}

impl Response {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Response::NotFound)
    }
}

/// Handles the extensions admin screens
pub struct ExtensionsController {
    extensions: Arc<ExtensionLifecycle>,
    messages: Arc<Messages>,
    translator: Arc<dyn Translator>,
    /// Where state changing actions redirect to
    index_url: String,
}

impl ExtensionsController {
    pub fn new(
        extensions: Arc<ExtensionLifecycle>,
        messages: Arc<Messages>,
        translator: Arc<dyn Translator>,
        index_url: impl Into<String>,
    ) -> Self {
        Self {
            extensions,
            messages,
            translator,
            index_url: index_url.into(),
        }
    }

    /// List every detected extension
    pub fn index(&self) -> Result<Response> {
        let extensions = self.extensions.detect()?;
        Ok(Response::View {
            view: "extensions.index".to_string(),
            title: self.translator.translate("title.extensions.list", &[]),
            description: None,
            data: json!({ "extensions": extensions }),
        })
    }

    pub fn activate(&self, raw_name: &str) -> Result<Response> {
        let name = normalize_name(raw_name);
        let result = self.extensions.activate(&name);
        self.redirect_with(result, "response.extensions.activate", &name)
    }

    pub fn deactivate(&self, raw_name: &str) -> Result<Response> {
        let name = normalize_name(raw_name);
        let result = self.extensions.deactivate(&name);
        self.redirect_with(result, "response.extensions.deactivate", &name)
    }

    /// Show the configuration form
    pub fn configure(&self, raw_name: &str) -> Result<Response> {
        let name = normalize_name(raw_name);
        let configuration = match self.extensions.get_configuration(&name) {
            Ok(configuration) => configuration,
            Err(e) if e.is_not_found() => return Ok(not_found(&e)),
            Err(e) => return Err(e),
        };

        Ok(Response::View {
            view: "extensions.configure".to_string(),
            title: configuration.display_name.clone(),
            description: Some(
                self.translator
                    .translate("title.extensions.configure", &[]),
            ),
            data: json!({
                "name": configuration.name,
                "config": configuration.config,
                "form": configuration.form,
            }),
        })
    }

    /// Save submitted configuration
    pub fn save_configuration(&self, raw_name: &str, input: ConfigMap) -> Result<Response> {
        let name = normalize_name(raw_name);
        let result = self.extensions.save_configuration(&name, input);
        self.redirect_with(result, "response.extensions.configure", &name)
    }

    /// Publish assets
    pub fn update(&self, raw_name: &str) -> Result<Response> {
        let name = normalize_name(raw_name);
        let result = self.extensions.publish(&name);
        self.redirect_with(result, "response.extensions.update", &name)
    }

    fn redirect_with<T>(&self, result: Result<T>, line: &str, name: &str) -> Result<Response> {
        match result {
            Ok(_) => {
                let text = self.translator.translate(line, &[("name", name)]);
                self.messages.add(MessageKind::Success, text);
                Ok(Response::Redirect {
                    to: self.index_url.clone(),
                })
            }
            Err(e) if e.is_not_found() => Ok(not_found(&e)),
            Err(e) => Err(e),
        }
    }
}

fn not_found(error: &orchestra_core::Error) -> Response {
    debug!("Responding not found: {}", error);
    Response::NotFound
}

impl std::fmt::Debug for ExtensionsController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionsController")
            .field("index_url", &self.index_url)
            .finish_non_exhaustive()
    }
}
