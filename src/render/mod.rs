//! Template rendering.
//!
//! Templates are embedded at compile time and rendered with Handlebars in
//! strict mode: a placeholder that does not resolve against the context is a
//! [`ConfigError::Render`] rather than an empty string. HTML escaping is
//! disabled since the output is YAML or shell.
//!
//! Durations reach the templates as whole milliseconds and are formatted by
//! the `minutes`, `seconds` and `millis` helpers, e.g.
//! `{{minutes enrollment.identity_duration}}` renders `180m`.
//!
//! Text values in the YAML templates go through `quote` (or `tls`, which
//! adds the `tls:` scheme) so they always form a valid double-quoted scalar.

use std::time::Duration;

use handlebars::{Handlebars, handlebars_helper};
use serde::Serialize;

use crate::config::{ConfigError, format_millis, format_minutes, format_seconds};
use crate::tree::{EnvironmentListing, OsTokens, ValueTree};

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

const CONTROLLER_TEMPLATE: &str = include_str!("templates/controller.yml");
const ROUTER_TEMPLATE: &str = include_str!("templates/router.yml");
const ENVIRONMENT_TEMPLATE: &str = include_str!("templates/environment.txt");

handlebars_helper!(minutes: |ms: u64| format_minutes(Duration::from_millis(ms)));
handlebars_helper!(seconds: |ms: u64| format_seconds(Duration::from_millis(ms)));
handlebars_helper!(millis: |ms: u64| format_millis(Duration::from_millis(ms)));
handlebars_helper!(quote: |text: str| yaml_quote(text));
handlebars_helper!(tls: |address: str| yaml_quote(&format!("tls:{address}")));

/// Renders text as a YAML double-quoted scalar, quotes included.
#[must_use]
pub fn yaml_quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Embedded document templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// Controller YAML.
    Controller,
    /// Router YAML, with or without the edge sections.
    Router,
    /// Shell environment listing.
    Environment,
}

impl Template {
    /// Every embedded template.
    pub const ALL: [Self; 3] = [Self::Controller, Self::Router, Self::Environment];

    /// Registry name of the template.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Controller => "controller",
            Self::Router => "router",
            Self::Environment => "environment",
        }
    }

    const fn source(self) -> &'static str {
        match self {
            Self::Controller => CONTROLLER_TEMPLATE,
            Self::Router => ROUTER_TEMPLATE,
            Self::Environment => ENVIRONMENT_TEMPLATE,
        }
    }
}

/// Data handed to a template: the value tree plus shell tokens.
#[derive(Debug, Serialize)]
pub struct RenderContext<'a, T: Serialize> {
    /// Tree whose fields sit at the template root
    #[serde(flatten)]
    pub tree: &'a T,
    /// Shell tokens, read as `@root.os`
    pub os: OsTokens,
}

impl<'a, T: Serialize> RenderContext<'a, T> {
    /// Wraps a tree with the tokens of the current platform.
    #[must_use]
    pub const fn new(tree: &'a T) -> Self {
        Self::with_tokens(tree, OsTokens::current())
    }

    /// Wraps a tree with explicit tokens.
    #[must_use]
    pub const fn with_tokens(tree: &'a T, os: OsTokens) -> Self {
        Self { tree, os }
    }
}

/// Strict Handlebars registry holding the embedded templates.
#[derive(Debug)]
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    /// Creates a renderer with every embedded template registered.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Template`] if an embedded template fails to
    /// compile.
    pub fn new() -> Result<Self, ConfigError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry.register_helper("minutes", Box::new(minutes));
        registry.register_helper("seconds", Box::new(seconds));
        registry.register_helper("millis", Box::new(millis));
        registry.register_helper("quote", Box::new(quote));
        registry.register_helper("tls", Box::new(tls));

        for template in Template::ALL {
            registry.register_template_string(template.name(), template.source())?;
        }

        Ok(Self { registry })
    }

    /// Renders an embedded template.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Render`] if a placeholder does not resolve or a
    /// helper receives a value of the wrong type.
    pub fn render<T: Serialize>(&self, template: Template, data: &T) -> Result<String, ConfigError> {
        let document = self.registry.render(template.name(), data)?;
        tracing::debug!(
            template = template.name(),
            bytes = document.len(),
            "rendered template"
        );
        Ok(document)
    }

    /// Renders an ad hoc template with the same helpers and strictness.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Render`] for malformed templates and unresolved
    /// placeholders.
    pub fn render_str<T: Serialize>(&self, text: &str, data: &T) -> Result<String, ConfigError> {
        Ok(self.registry.render_template(text, data)?)
    }

    /// Renders the controller or router document for a built tree.
    ///
    /// # Errors
    ///
    /// Same as [`Self::render`].
    pub fn render_tree(&self, tree: &ValueTree) -> Result<String, ConfigError> {
        match tree {
            ValueTree::Controller(c) => self.render(Template::Controller, &RenderContext::new(c)),
            ValueTree::Router(r) => self.render(Template::Router, &RenderContext::new(r)),
        }
    }

    /// Renders the environment listing with the given shell tokens.
    ///
    /// # Errors
    ///
    /// Same as [`Self::render`].
    pub fn render_environment(
        &self,
        listing: &EnvironmentListing,
        os: OsTokens,
    ) -> Result<String, ConfigError> {
        self.render(Template::Environment, &RenderContext::with_tokens(listing, os))
    }
}
