//! Configuration module for the phonemizer CLI.
//!
//! Provides CLI argument parsing, validation, and locale metadata.

#[allow(clippy::module_inception)]
mod config;
mod locales;

pub use config::{AppConfig, Engine};
pub use locales::{get_locale, print_locale_info, print_locales};
