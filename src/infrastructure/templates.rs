use handlebars::{handlebars_helper, Handlebars, JsonValue};
use serde::Serialize;

use crate::errors::TemplateError;

const PARTIALS: &[(&str, &str)] = &[
    ("header", include_str!("../../templates/partials/header.hbs")),
    ("footer", include_str!("../../templates/partials/footer.hbs")),
];

const PAGES: &[(&str, &str)] = &[
    ("home", include_str!("../../templates/home.hbs")),
    ("about", include_str!("../../templates/about.hbs")),
    ("contact", include_str!("../../templates/contact.hbs")),
    ("students", include_str!("../../templates/students.hbs")),
    ("for_loop", include_str!("../../templates/for_loop.hbs")),
    ("error", include_str!("../../templates/error.hbs")),
];

/// Page templates compiled into the binary so every entry point renders the
/// same markup without touching the filesystem.
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();

        for (name, source) in PARTIALS {
            registry.register_partial(name, *source)?;
        }
        for (name, source) in PAGES {
            registry.register_template_string(name, *source)?;
        }

        handlebars_helper!(eq: |a: JsonValue, b: JsonValue| a == b);
        handlebars_helper!(inc: |n: u64| n + 1);
        handlebars_helper!(times: |a: u64, b: u64| a * b);
        handlebars_helper!(contains: |list: JsonValue, item: JsonValue| {
            list.as_array().is_some_and(|values| values.contains(&item))
        });
        registry.register_helper("eq", Box::new(eq));
        registry.register_helper("inc", Box::new(inc));
        registry.register_helper("times", Box::new(times));
        registry.register_helper("contains", Box::new(contains));

        Ok(Renderer { registry })
    }

    pub fn render<T: Serialize>(&self, template: &str, context: &T) -> Result<String, TemplateError> {
        self.registry.render(template, context).map_err(TemplateError::from)
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }

    pub fn template_names(&self) -> Vec<&'static str> {
        PAGES.iter().map(|(name, _)| *name).collect()
    }
}
