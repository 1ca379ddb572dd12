//! Host facts abstraction for testability.
//!
//! This module provides a [`HostInfo`] trait that allows injecting a fixed
//! hostname and working directory in tests while reading the real values in
//! production.

use std::io;
use std::path::PathBuf;

/// Abstraction over the facts about the machine a config is generated on.
///
/// # Example
///
/// ```
/// use ziti_config_gen::host::{HostInfo, SystemHost};
///
/// let host = SystemHost;
/// assert!(host.working_dir().is_ok());
/// ```
pub trait HostInfo {
    /// Returns the OS-reported hostname.
    ///
    /// # Errors
    ///
    /// Returns an error if the hostname cannot be read or is not valid UTF-8.
    fn hostname(&self) -> io::Result<String>;

    /// Returns the process working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be read.
    fn working_dir(&self) -> io::Result<PathBuf>;
}

/// Production host using the OS hostname and the process working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl HostInfo for SystemHost {
    fn hostname(&self) -> io::Result<String> {
        hostname::get()?.into_string().map_err(|raw| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("hostname is not valid UTF-8: {}", raw.to_string_lossy()),
            )
        })
    }

    fn working_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }
}

/// Host with fixed answers.
///
/// Used by tests and by callers that generate configs for a different machine.
#[derive(Debug, Clone, Default)]
pub struct FixedHost {
    hostname: Option<String>,
    working_dir: PathBuf,
}

impl FixedHost {
    /// Creates a host with the given hostname and working directory.
    #[must_use]
    pub fn new(hostname: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            hostname: Some(hostname.into()),
            working_dir: working_dir.into(),
        }
    }

    /// Creates a host whose hostname lookup fails.
    #[must_use]
    pub fn without_hostname(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            hostname: None,
            working_dir: working_dir.into(),
        }
    }
}

impl HostInfo for FixedHost {
    fn hostname(&self) -> io::Result<String> {
        self.hostname
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "hostname unavailable"))
    }

    fn working_dir(&self) -> io::Result<PathBuf> {
        Ok(self.working_dir.clone())
    }
}

impl<H: HostInfo + ?Sized> HostInfo for &H {
    fn hostname(&self) -> io::Result<String> {
        (**self).hostname()
    }

    fn working_dir(&self) -> io::Result<PathBuf> {
        (**self).working_dir()
    }
}
