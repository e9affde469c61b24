//! The `artisync` command line.
//!
//! Reads desired records from a file, connects to Artifactory with
//! settings from flags, environment, or `~/.artisync/config.toml`, and
//! reconciles one resource kind.

pub mod app;
pub mod cli;
pub mod config;
pub mod desired;
pub mod output;

pub use app::run;
