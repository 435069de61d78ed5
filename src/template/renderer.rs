//! Template rendering.
//!
//! Artifacts are rendered through the [`Renderer`] trait. [`TeraRenderer`]
//! ships every template compiled into the binary; a template directory may
//! override any of them by id, so `<dir>/php/model.php.tera` replaces the
//! built-in `php/model.php`.

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use tera::{Tera, Value};

use super::context::RenderContext;
use super::escape::{js_str, php_str};
use crate::error::{IoResultExt, ScaffoldError, ScaffoldResult};

/// Renders one artifact from its context.
pub trait Renderer: Send + Sync {
    fn render(&self, template_id: &str, context: &RenderContext) -> ScaffoldResult<String>;
}

macro_rules! builtin {
    ($id:literal) => {
        ($id, include_str!(concat!("../../templates/", $id, ".tera")))
    };
}

/// Template id and source of every built-in template.
pub const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    builtin!("php/controller.php"),
    builtin!("php/request/BulkDestroyRequest.php"),
    builtin!("php/request/DestroyRequest.php"),
    builtin!("php/request/IndexRequest.php"),
    builtin!("php/request/QueryRequest.php"),
    builtin!("php/request/ShowRequest.php"),
    builtin!("php/request/StoreRequest.php"),
    builtin!("php/request/UpdateRequest.php"),
    builtin!("php/resource.php"),
    builtin!("php/model.php"),
    builtin!("php/service.php"),
    builtin!("php/route.php"),
    builtin!("web/api.js"),
    builtin!("web/view/index.vue"),
    builtin!("web/structure.js"),
    builtin!("web/menu.js"),
    builtin!("web/router.js"),
];

pub const OVERRIDE_EXTENSION: &str = "tera";

pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    /// Renderer over the built-in templates only.
    pub fn builtin() -> ScaffoldResult<Self> {
        Self::from_sources(
            BUILTIN_TEMPLATES
                .iter()
                .map(|(id, source)| (id.to_string(), source.to_string()))
                .collect(),
        )
    }

    /// Built-in templates, each replaced by `<dir>/<id>.tera` when that file
    /// exists. Files in `dir` that match no built-in id are ignored.
    pub fn with_overrides(dir: &Path) -> ScaffoldResult<Self> {
        let mut sources = Vec::with_capacity(BUILTIN_TEMPLATES.len());
        for (id, builtin) in BUILTIN_TEMPLATES {
            let candidate = dir.join(format!("{id}.{OVERRIDE_EXTENSION}"));
            if candidate.is_file() {
                let source = std::fs::read_to_string(&candidate).at(&candidate)?;
                tracing::debug!(template = id, path = %candidate.display(), "using template override");
                sources.push((id.to_string(), source));
            } else {
                sources.push((id.to_string(), builtin.to_string()));
            }
        }
        Self::from_sources(sources)
    }

    fn from_sources(sources: Vec<(String, String)>) -> ScaffoldResult<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.register_filter("php_str", string_filter(php_str));
        tera.register_filter("js_str", string_filter(js_str));
        tera.add_raw_templates(sources)
            .map_err(|source| ScaffoldError::Render {
                template: "<templates>".to_string(),
                source,
            })?;
        Ok(Self { tera })
    }

    pub fn has_template(&self, template_id: &str) -> bool {
        self.tera.get_template_names().any(|name| name == template_id)
    }
}

/// Lifts a string escaper into a Tera filter, e.g. `{{ display_title | js_str }}`.
fn string_filter(escape: fn(&str) -> String) -> impl tera::Filter {
    move |value: &Value, _: &HashMap<String, Value>| -> tera::Result<Value> {
        let text = value
            .as_str()
            .ok_or_else(|| tera::Error::msg("escape filters only apply to strings"))?;
        Ok(Value::String(escape(text)))
    }
}

impl Renderer for TeraRenderer {
    fn render(&self, template_id: &str, context: &RenderContext) -> ScaffoldResult<String> {
        if !self.has_template(template_id) {
            return Err(ScaffoldError::TemplateNotFound {
                template: template_id.to_string(),
            });
        }

        let start = Instant::now();
        let render_error = |source: tera::Error| ScaffoldError::Render {
            template: template_id.to_string(),
            source,
        };
        let tera_context = context.to_tera().map_err(render_error)?;
        let output = self
            .tera
            .render(template_id, &tera_context)
            .map_err(render_error)?;

        tracing::trace!(
            template = template_id,
            bytes = output.len(),
            duration_us = start.elapsed().as_micros() as u64,
            "rendered template"
        );
        Ok(output)
    }
}
