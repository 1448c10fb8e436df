//! Page rendering behind a small trait so handlers never depend on the engine.

use std::path::Path;
use std::sync::Arc;

use handlebars::Handlebars;
use serde_json::Value;
use tracing::info;

use crate::error::{AppError, AppResult};

pub mod templates;

pub trait Renderer: Send + Sync {
    /// Render `template` with `values`; the output is opaque markup.
    fn render(&self, template: &str, values: &Value) -> AppResult<String>;
}

pub type SharedRenderer = Arc<dyn Renderer>;

/// Handlebars registry loaded with the built-in templates. Values are HTML-escaped
/// unless a template uses a triple-stash.
pub struct TemplateRenderer {
    registry: Handlebars<'static>,
}

impl TemplateRenderer {
    pub fn new() -> AppResult<Self> {
        let mut registry = Handlebars::new();
        for (name, source) in templates::BUILTIN {
            registry
                .register_template_string(name, *source)
                .map_err(|e| AppError::render(*name, e.to_string()))?;
        }
        Ok(Self { registry })
    }

    /// Built-ins, with any file in `dir` named after a template (`blog.html`, or
    /// `header.html` for the `header` partial) replacing it.
    pub fn with_overrides(dir: &Path) -> AppResult<Self> {
        let mut r = Self::new()?;
        for (name, _) in templates::BUILTIN {
            let direct = dir.join(name);
            let candidate = if direct.is_file() { direct } else { dir.join(format!("{}.html", name)) };
            if !candidate.is_file() { continue; }
            let source = std::fs::read_to_string(&candidate)
                .map_err(|e| AppError::render(*name, format!("{}: {}", candidate.display(), e)))?;
            r.registry
                .register_template_string(name, source)
                .map_err(|e| AppError::render(*name, e.to_string()))?;
            info!(target: "quill::render", "template override {} <- {}", name, candidate.display());
        }
        Ok(r)
    }

    pub fn has_template(&self, name: &str) -> bool { self.registry.has_template(name) }
}

impl Renderer for TemplateRenderer {
    fn render(&self, template: &str, values: &Value) -> AppResult<String> {
        self.registry.render(template, values).map_err(|e| AppError::render(template, e.to_string()))
    }
}
