//! One generation run: resolve, build, render.

use crate::config::{ConfigError, EnvSource, FlagOverrides};
use crate::host::HostInfo;
use crate::render::Renderer;
use crate::tree::{Component, EnvironmentListing, OsTokens, TreeBuilder, ValueTree};

#[cfg(test)]
#[path = "generate_tests.rs"]
mod tests;

/// Document to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Controller YAML.
    Controller,
    /// Router YAML; `--fabric` selects the fabric-only variant.
    Router,
    /// Environment variable listing covering both components.
    Environment,
}

/// Runs the generation pipeline against one environment and host.
///
/// Every call to [`Generator::generate`] builds fresh trees; nothing is
/// shared between calls.
pub struct Generator<'a, E: ?Sized, H: ?Sized> {
    env: &'a E,
    host: &'a H,
    os: OsTokens,
}

impl<'a, E, H> Generator<'a, E, H>
where
    E: EnvSource + ?Sized,
    H: HostInfo + ?Sized,
{
    /// Creates a generator using the current platform's shell tokens.
    pub const fn new(env: &'a E, host: &'a H) -> Self {
        Self {
            env,
            host,
            os: OsTokens::current(),
        }
    }

    /// Overrides the shell tokens used by the environment listing.
    #[must_use]
    pub const fn with_os_tokens(mut self, os: OsTokens) -> Self {
        self.os = os;
        self
    }

    /// Builds the value tree for a component without rendering it.
    ///
    /// # Errors
    ///
    /// Returns the first coercion or required-field error.
    pub fn tree(&self, component: Component, flags: &FlagOverrides) -> Result<ValueTree, ConfigError> {
        TreeBuilder::new(flags, self.env, self.host).build(component)
    }

    /// Builds the environment listing without rendering it.
    ///
    /// # Errors
    ///
    /// Returns the first coercion or required-field error from either tree.
    pub fn environment(&self, flags: &FlagOverrides) -> Result<EnvironmentListing, ConfigError> {
        let mut builder = TreeBuilder::new(flags, self.env, self.host);
        let controller = builder.controller()?;
        let router = builder.router()?;

        Ok(EnvironmentListing::from_trees(&controller, &router))
    }

    /// Produces the rendered document for a request.
    ///
    /// # Errors
    ///
    /// Returns coercion, required-field and template errors.
    pub fn generate(&self, request: Request, flags: &FlagOverrides) -> Result<String, ConfigError> {
        tracing::debug!(?request, flags = flags.len(), "generating");
        let renderer = Renderer::new()?;

        match request {
            Request::Controller => renderer.render_tree(&self.tree(Component::Controller, flags)?),
            Request::Router => renderer.render_tree(&self.tree(Component::Router, flags)?),
            Request::Environment => {
                renderer.render_environment(&self.environment(flags)?, self.os)
            }
        }
    }
}
