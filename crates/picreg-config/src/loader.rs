// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup: `./picreg.toml` > `~/.config/picreg/picreg.toml`, with environment
//! variable overrides via the `PICREG_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PicregConfig;

/// File name looked up in the working directory and the user config dir.
pub const CONFIG_FILE_NAME: &str = "picreg.toml";

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("picreg").join(CONFIG_FILE_NAME))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `~/.config/picreg/picreg.toml`
/// 3. `./picreg.toml`
/// 4. `PICREG_*` environment variables
pub fn load_config() -> Result<PicregConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an explicit file, still honoring env overrides.
pub fn load_config_from_path(path: &Path) -> Result<PicregConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PicregConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PicregConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PicregConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Build the Figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(PicregConfig::default()));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "PICREG_";

/// Config sections an environment key may address.
const SECTIONS: [&str; 3] = ["registry", "fetch", "logging"];

/// Environment provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `PICREG_FETCH_TIMEOUT_SECS` must become `fetch.timeout_secs`,
/// not `fetch.timeout.secs`.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).map(|key| env_key(key.as_str()).into())
}

/// Maps a prefix-stripped variable name to its dotted config key.
///
/// Figment passes the name in its original case, so it is lowercased here.
/// Names that start with no known section are returned lowercased and are
/// later rejected as unknown keys.
pub fn env_key(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    for section in SECTIONS {
        let rest = lower
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'));
        if let Some(rest) = rest {
            return format!("{section}.{rest}");
        }
    }
    lower
}

/// The environment variable that sets the dotted config `key`.
pub fn env_var_name(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.replace('.', "_").to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_key_maps_uppercase_names_into_sections() {
        assert_eq!(env_key("FETCH_TIMEOUT_SECS"), "fetch.timeout_secs");
        assert_eq!(env_key("FETCH_USER_AGENT"), "fetch.user_agent");
        assert_eq!(env_key("REGISTRY_PATH"), "registry.path");
        assert_eq!(env_key("logging_level"), "logging.level");
    }

    #[test]
    fn env_key_leaves_unknown_sections_alone() {
        assert_eq!(env_key("FETCHER_TIMEOUT"), "fetcher_timeout");
        assert_eq!(env_key("VERBOSE"), "verbose");
    }

    #[test]
    fn env_var_name_inverts_env_key() {
        assert_eq!(env_var_name("fetch.timeout_secs"), "PICREG_FETCH_TIMEOUT_SECS");
        assert_eq!(env_var_name(&env_key("REGISTRY_PATH")), "PICREG_REGISTRY_PATH");
    }
}
