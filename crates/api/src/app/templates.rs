//! Page templates.
//!
//! Templates are compiled into the binary and registered once at startup.
//! Handlebars HTML-escapes every `{{value}}`, so question and choice texts
//! are safe to interpolate.

use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;

pub const INDEX: &str = "polls/index";
pub const DETAIL: &str = "polls/detail";
pub const RESULTS: &str = "polls/results";

const SOURCES: &[(&str, &str)] = &[
    ("layout", include_str!("../../templates/layout.hbs")),
    (INDEX, include_str!("../../templates/polls/index.hbs")),
    (DETAIL, include_str!("../../templates/polls/detail.hbs")),
    (RESULTS, include_str!("../../templates/polls/results.hbs")),
];

pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        for (name, source) in SOURCES {
            registry.register_template_string(name, source)?;
        }
        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String, RenderError> {
        self.registry.render(name, context)
    }
}
