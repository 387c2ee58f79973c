// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Previous repository URLs kept for plugins that moved.

use picreg_core::RegistryError;
use tracing::info;

use crate::model::{PluginEntry, Registry};

fn plugin_mut<'a>(registry: &'a mut Registry, plugin_id: &str) -> Result<&'a mut PluginEntry, RegistryError> {
    registry
        .find_by_id_mut(plugin_id)
        .ok_or_else(|| RegistryError::plugin_not_found(plugin_id))
}

/// Records `old_url` as a former location. Adding a known URL is a no-op
/// apart from the timestamp.
pub fn add_redirect(registry: &mut Registry, plugin_id: &str, old_url: &str) -> Result<(), RegistryError> {
    if old_url.is_empty() {
        return Err(RegistryError::InvalidArgument(
            "a redirect URL is required".to_string(),
        ));
    }
    let plugin = plugin_mut(registry, plugin_id)?;
    if !plugin.redirect_from.iter().any(|u| u == old_url) {
        plugin.redirect_from.push(old_url.to_string());
    }
    plugin.touch();
    info!(id = plugin_id, from = old_url, to = %plugin.git_url, "added redirect");
    Ok(())
}

/// Forgets a former location.
pub fn remove_redirect(registry: &mut Registry, plugin_id: &str, old_url: &str) -> Result<(), RegistryError> {
    let plugin = plugin_mut(registry, plugin_id)?;
    let before = plugin.redirect_from.len();
    plugin.redirect_from.retain(|u| u != old_url);
    if plugin.redirect_from.len() == before {
        return Err(RegistryError::NotFound {
            kind: "Redirect",
            name: old_url.to_string(),
        });
    }
    plugin.touch();
    info!(id = plugin_id, from = old_url, "removed redirect");
    Ok(())
}

/// Former locations, oldest first.
pub fn list_redirects<'a>(registry: &'a Registry, plugin_id: &str) -> Result<&'a [String], RegistryError> {
    registry
        .find_by_id(plugin_id)
        .map(|p| p.redirect_from.as_slice())
        .ok_or_else(|| RegistryError::plugin_not_found(plugin_id))
}

#[cfg(test)]
mod tests {
    use picreg_test_utils::{ManifestBuilder, MockFetcher};

    use super::*;
    use crate::plugin::{AddPlugin, add_plugin};

    const URL: &str = "https://github.com/new/picard-plugin-moved";
    const OLD: &str = "https://github.com/old/picard-plugin-moved";

    async fn registry() -> Registry {
        let fetcher = MockFetcher::with_manifest(URL, ManifestBuilder::new().build());
        let mut registry = Registry::default();
        add_plugin(&mut registry, &fetcher, AddPlugin::new(URL)).await.unwrap();
        registry
    }

    #[tokio::test]
    async fn add_is_idempotent() {
        let mut registry = registry().await;
        add_redirect(&mut registry, "moved", OLD).unwrap();
        add_redirect(&mut registry, "moved", OLD).unwrap();
        assert_eq!(list_redirects(&registry, "moved").unwrap(), [OLD]);
    }

    #[tokio::test]
    async fn remove_drops_list_when_empty() {
        let mut registry = registry().await;
        add_redirect(&mut registry, "moved", OLD).unwrap();
        remove_redirect(&mut registry, "moved", OLD).unwrap();
        assert!(list_redirects(&registry, "moved").unwrap().is_empty());

        let toml = crate::store::to_toml_string(&registry).unwrap();
        assert!(!toml.contains("redirect_from"));
    }

    #[tokio::test]
    async fn remove_unknown_redirect_fails() {
        let mut registry = registry().await;
        let err = remove_redirect(&mut registry, "moved", OLD).unwrap_err();
        assert_eq!(err.to_string(), format!("Redirect {OLD} not found"));
    }

    #[test]
    fn unknown_plugin_fails() {
        let mut registry = Registry::default();
        assert!(add_redirect(&mut registry, "ghost", OLD).is_err());
        assert!(list_redirects(&registry, "ghost").is_err());
    }
}
