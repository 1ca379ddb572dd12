//! Error types for value resolution, rendering and output.

use std::path::PathBuf;

use thiserror::Error;

use super::field::FieldId;

/// Error type for configuration generation.
///
/// Covers coercion failures, unfilled required fields, template problems and
/// output destination failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A duration override could not be parsed.
    #[error("Invalid duration for {field}: '{value}' ({reason})")]
    InvalidDuration {
        /// Field being resolved
        field: FieldId,
        /// Raw override text
        value: String,
        /// Reason for invalidity
        reason: String,
    },

    /// An integer override could not be parsed.
    #[error("Invalid integer for {field}: '{value}' ({reason})")]
    InvalidInteger {
        /// Field being resolved
        field: FieldId,
        /// Raw override text
        value: String,
        /// Reason for invalidity
        reason: String,
    },

    /// A port override could not be parsed.
    #[error("Invalid port for {field}: '{value}' ({reason})")]
    InvalidPort {
        /// Field being resolved
        field: FieldId,
        /// Raw override text
        value: String,
        /// Reason for invalidity
        reason: String,
    },

    /// A boolean override could not be parsed.
    #[error("Invalid boolean for {field}: '{value}' (expected true or false)")]
    InvalidBoolean {
        /// Field being resolved
        field: FieldId,
        /// Raw override text
        value: String,
    },

    /// A combined `host:port` override could not be parsed.
    #[error("Invalid address for {field}: '{value}' ({reason})")]
    InvalidAddress {
        /// Field being resolved
        field: FieldId,
        /// Raw override text
        value: String,
        /// Reason for invalidity
        reason: String,
    },

    /// A required field ended up empty or zero after resolution.
    #[error("Missing required value for {field}: {reason}")]
    MissingRequired {
        /// Field that is unfilled
        field: FieldId,
        /// What was wrong with the value
        reason: &'static str,
    },

    /// The working directory, used as the default home, could not be read.
    #[error("Unable to determine the working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),

    /// A template failed to compile.
    #[error("Unable to parse template: {0}")]
    Template(#[source] Box<handlebars::TemplateError>),

    /// A template failed to render, e.g. it references a missing placeholder.
    #[error("Unable to execute template: {0}")]
    Render(#[source] Box<handlebars::RenderError>),

    /// The parent directory of the output path does not exist.
    #[error("Provided path: [{}] does not exist", path.display())]
    PathDoesNotExist {
        /// The missing parent directory
        path: PathBuf,
    },

    /// The output file could not be created.
    #[error("Unable to create config file '{}': {source}", path.display())]
    FileCreate {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The rendered document could not be written.
    #[error("Unable to write config to {destination}: {source}")]
    FileWrite {
        /// Destination description
        destination: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Creates a `MissingRequired` error for a field.
    #[must_use]
    pub const fn missing(field: FieldId, reason: &'static str) -> Self {
        Self::MissingRequired { field, reason }
    }

    /// Returns the field this error is about, if any.
    #[must_use]
    pub const fn field(&self) -> Option<FieldId> {
        match self {
            Self::InvalidDuration { field, .. }
            | Self::InvalidInteger { field, .. }
            | Self::InvalidPort { field, .. }
            | Self::InvalidBoolean { field, .. }
            | Self::InvalidAddress { field, .. }
            | Self::MissingRequired { field, .. } => Some(*field),
            _ => None,
        }
    }

    /// Returns true if the error concerns the output destination.
    #[must_use]
    pub const fn is_output_error(&self) -> bool {
        matches!(
            self,
            Self::PathDoesNotExist { .. } | Self::FileCreate { .. } | Self::FileWrite { .. }
        )
    }
}

impl From<handlebars::TemplateError> for ConfigError {
    fn from(error: handlebars::TemplateError) -> Self {
        Self::Template(Box::new(error))
    }
}

impl From<handlebars::RenderError> for ConfigError {
    fn from(error: handlebars::RenderError) -> Self {
        Self::Render(Box::new(error))
    }
}
