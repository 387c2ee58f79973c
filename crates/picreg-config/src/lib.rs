// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the picreg registry tool.
//!
//! TOML configuration with strict key checking (`deny_unknown_fields`),
//! user/local file lookup, `PICREG_*` environment overrides, and miette
//! diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! let config = picreg_config::load_and_validate(None).expect("config errors");
//! println!("registry: {}", config.registry.path);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::PicregConfig;

/// Load configuration and validate it.
///
/// With `explicit_path`, only that file (plus env overrides) is read;
/// otherwise the standard lookup applies. Figment errors are converted into
/// diagnostics with source spans where the offending file can be found.
pub fn load_and_validate(explicit_path: Option<&Path>) -> Result<PicregConfig, Vec<ConfigError>> {
    let loaded = match explicit_path {
        Some(path) => loader::load_config_from_path(path),
        None => loader::load_config(),
    };

    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            tracing::debug!(registry = %config.registry.path, "configuration loaded");
            Ok(config)
        }
        Err(err) => {
            let sources = collect_toml_sources(explicit_path);
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<PicregConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![(diagnostic::INLINE_SOURCE.to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Collect config file contents for error span resolution.
fn collect_toml_sources(explicit_path: Option<&Path>) -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Some(path) = explicit_path {
        if let Ok(content) = std::fs::read_to_string(path) {
            sources.push((path.display().to_string(), content));
        }
        return sources;
    }

    if let Ok(content) = std::fs::read_to_string(loader::CONFIG_FILE_NAME) {
        let path = std::env::current_dir()
            .map(|d| d.join(loader::CONFIG_FILE_NAME).display().to_string())
            .unwrap_or_else(|_| loader::CONFIG_FILE_NAME.to_string());
        sources.push((path, content));
    }

    if let Some(path) = loader::user_config_path() {
        if let Ok(content) = std::fs::read_to_string(&path) {
            sources.push((path.display().to_string(), content));
        }
    }

    sources
}
