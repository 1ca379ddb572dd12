//! Writing rendered documents to their destination.

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::ConfigError;

#[cfg(test)]
#[path = "emit_tests.rs"]
mod tests;

/// Where a rendered document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Standard output.
    Stdout,
    /// A file, created or truncated.
    File(PathBuf),
}

impl Destination {
    /// Parses an `--output` value; `stdout` in any case means standard output.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("stdout") {
            Self::Stdout
        } else {
            Self::File(PathBuf::from(raw))
        }
    }

    /// Returns true for standard output.
    #[must_use]
    pub const fn is_stdout(&self) -> bool {
        matches!(self, Self::Stdout)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Writes a document to its destination.
///
/// For a file, the parent directory must already exist; nothing is created
/// or written otherwise.
///
/// # Errors
///
/// Returns [`ConfigError::PathDoesNotExist`] for a missing parent directory,
/// [`ConfigError::FileCreate`] if the file cannot be opened and
/// [`ConfigError::FileWrite`] if writing fails.
pub fn emit(document: &str, destination: &Destination) -> Result<(), ConfigError> {
    match destination {
        Destination::Stdout => {
            let mut stdout = io::stdout().lock();
            write_document(&mut stdout, document, destination)
        }
        Destination::File(path) => {
            ensure_parent_exists(path)?;
            let mut file = File::create(path).map_err(|source| ConfigError::FileCreate {
                path: path.clone(),
                source,
            })?;
            tracing::debug!("Created output file: {}", path.display());
            write_document(&mut file, document, destination)?;
            tracing::debug!("Configuration written to: {}", path.display());
            Ok(())
        }
    }
}

/// Writes a document to any writer, flushing before returning.
///
/// # Errors
///
/// Returns [`ConfigError::FileWrite`] naming `destination` on I/O failure.
pub fn write_document<W: Write>(
    writer: &mut W,
    document: &str,
    destination: &Destination,
) -> Result<(), ConfigError> {
    writer
        .write_all(document.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|source| ConfigError::FileWrite {
            destination: destination.to_string(),
            source,
        })
}

fn ensure_parent_exists(path: &Path) -> Result<(), ConfigError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };

    if parent.is_dir() {
        Ok(())
    } else {
        Err(ConfigError::PathDoesNotExist {
            path: PathBuf::from(format!("{}/", parent.display())),
        })
    }
}
