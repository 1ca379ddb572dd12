//! Ziti config generator
//!
//! A library for resolving controller and router configuration values from
//! CLI flags, environment variables and built-in defaults, and rendering them
//! into YAML configs and shell environment listings.

pub mod config;
pub mod emit;
pub mod generate;
pub mod host;
pub mod render;
pub mod tree;
