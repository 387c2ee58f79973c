// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory registry document.
//!
//! The on-disk shape is `{ api_version, plugins = [..], blacklist = [..] }`.
//! Optional fields are omitted when absent and list fields are never written
//! empty, so a registry that round-trips through the store stays diff-stable.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use picreg_core::{DEFAULT_REF, REGISTRY_API_VERSION, TrustLevel, VersioningScheme};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A named branch or tag a manifest can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ref {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Inclusive lower API bound. Compared lexically, never parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_api_version: Option<String>,
    /// Inclusive upper API bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_api_version: Option<String>,
}

impl Ref {
    /// A ref with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            min_api_version: None,
            max_api_version: None,
        }
    }

    /// The implicit ref used when a plugin stores none.
    pub fn default_ref() -> Self {
        Self::named(DEFAULT_REF)
    }

    /// True for a plain `main` with no description or bounds.
    pub fn is_bare_default(&self) -> bool {
        self.name == DEFAULT_REF
            && self.description.is_none()
            && self.min_api_version.is_none()
            && self.max_api_version.is_none()
    }
}

/// One plugin admitted to the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginEntry {
    pub id: String,
    pub uuid: String,
    pub name: String,
    pub description: String,
    pub git_url: String,
    #[serde(default)]
    pub categories: Vec<String>,
    pub trust_level: TrustLevel,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_i18n: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_i18n: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versioning_scheme: Option<VersioningScheme>,
    /// Empty means the implicit `main` ref.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refs: Vec<Ref>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub redirect_from: Vec<String>,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PluginEntry {
    /// Stored refs, or the implicit `[main]` when none are stored.
    pub fn effective_refs(&self) -> Vec<Ref> {
        if self.refs.is_empty() {
            vec![Ref::default_ref()]
        } else {
            self.refs.clone()
        }
    }

    /// Name of the ref manifests are fetched from by default.
    pub fn primary_ref(&self) -> &str {
        self.refs.first().map_or(DEFAULT_REF, |r| r.name.as_str())
    }

    pub fn find_ref(&self, name: &str) -> Option<&Ref> {
        self.refs.iter().find(|r| r.name == name)
    }

    /// Marks the entry as modified now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A rule marking a plugin as disallowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_regex: Option<String>,
    pub reason: String,
    pub blacklisted_at: DateTime<Utc>,
}

impl BlacklistEntry {
    /// True if at least one of `url`, `uuid`, `url_regex` is set.
    pub fn has_identifier(&self) -> bool {
        self.url.is_some() || self.uuid.is_some() || self.url_regex.is_some()
    }

    /// True if the rule covers a plugin with this URL and uuid.
    ///
    /// An entry whose `url_regex` does not compile never matches on the regex.
    pub fn matches_plugin(&self, git_url: &str, uuid: &str) -> bool {
        if self.url.as_deref() == Some(git_url) || self.uuid.as_deref() == Some(uuid) {
            return true;
        }
        self.url_regex
            .as_deref()
            .and_then(|pattern| Regex::new(pattern).ok())
            .is_some_and(|re| re.is_match(git_url))
    }

    /// Lookup match used by remove and show: exact `url` OR exact `uuid`.
    pub fn matches_identifier(&self, url: Option<&str>, uuid: Option<&str>) -> bool {
        (url.is_some() && self.url.as_deref() == url)
            || (uuid.is_some() && self.uuid.as_deref() == uuid)
    }
}

fn default_api_version() -> String {
    REGISTRY_API_VERSION.to_string()
}

/// The whole registry document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<PluginEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blacklist: Vec<BlacklistEntry>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            plugins: Vec::new(),
            blacklist: Vec::new(),
        }
    }
}

impl Registry {
    pub fn find_by_id(&self, id: &str) -> Option<&PluginEntry> {
        self.plugins.iter().find(|p| p.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut PluginEntry> {
        self.plugins.iter_mut().find(|p| p.id == id)
    }

    pub fn find_by_uuid(&self, uuid: &str) -> Option<&PluginEntry> {
        self.plugins.iter().find(|p| p.uuid == uuid)
    }

    pub fn find_by_git_url(&self, git_url: &str) -> Option<&PluginEntry> {
        self.plugins.iter().find(|p| p.git_url == git_url)
    }

    /// Appends without checking uniqueness; callers enforce invariants.
    pub fn append_plugin(&mut self, entry: PluginEntry) {
        self.plugins.push(entry);
    }

    /// Removes the plugin with `id`, returning it if present.
    pub fn remove_plugin(&mut self, id: &str) -> Option<PluginEntry> {
        let index = self.plugins.iter().position(|p| p.id == id)?;
        Some(self.plugins.remove(index))
    }

    pub fn append_blacklist(&mut self, entry: BlacklistEntry) {
        self.blacklist.push(entry);
    }

    /// Removes every blacklist entry matching `url` OR `uuid`; returns the count.
    pub fn remove_blacklist(&mut self, url: Option<&str>, uuid: Option<&str>) -> usize {
        let before = self.blacklist.len();
        self.blacklist
            .retain(|entry| !entry.matches_identifier(url, uuid));
        before - self.blacklist.len()
    }

    /// First blacklist entry matching `url` OR `uuid`.
    pub fn find_blacklist(&self, url: Option<&str>, uuid: Option<&str>) -> Option<&BlacklistEntry> {
        self.blacklist
            .iter()
            .find(|entry| entry.matches_identifier(url, uuid))
    }

    /// First blacklist rule that would reject a plugin with this URL and uuid.
    pub fn blacklist_match(&self, git_url: &str, uuid: &str) -> Option<&BlacklistEntry> {
        self.blacklist
            .iter()
            .find(|entry| entry.matches_plugin(git_url, uuid))
    }

    /// Orders plugins by id, the canonical on-disk order.
    pub fn sort_plugins(&mut self) {
        self.plugins.sort_by(|a, b| a.id.cmp(&b.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, uuid: &str, url: &str) -> PluginEntry {
        let now = Utc::now();
        PluginEntry {
            id: id.to_string(),
            uuid: uuid.to_string(),
            name: id.to_string(),
            description: String::new(),
            git_url: url.to_string(),
            categories: Vec::new(),
            trust_level: TrustLevel::Community,
            authors: Vec::new(),
            maintainers: None,
            name_i18n: None,
            description_i18n: None,
            versioning_scheme: None,
            refs: Vec::new(),
            redirect_from: Vec::new(),
            added_at: now,
            updated_at: now,
        }
    }

    fn blacklisted(url: Option<&str>, uuid: Option<&str>, url_regex: Option<&str>) -> BlacklistEntry {
        BlacklistEntry {
            url: url.map(str::to_string),
            uuid: uuid.map(str::to_string),
            url_regex: url_regex.map(str::to_string),
            reason: "test".to_string(),
            blacklisted_at: Utc::now(),
        }
    }

    #[test]
    fn default_registry_uses_current_api_version() {
        let registry = Registry::default();
        assert_eq!(registry.api_version, "3.0");
        assert!(registry.plugins.is_empty());
    }

    #[test]
    fn missing_sections_deserialize_to_defaults() {
        let registry: Registry = toml::from_str("").unwrap();
        assert_eq!(registry, Registry::default());
    }

    #[test]
    fn remove_plugin_returns_removed_entry() {
        let mut registry = Registry::default();
        registry.append_plugin(entry("a", "u1", "https://github.com/x/a"));
        registry.append_plugin(entry("b", "u2", "https://github.com/x/b"));

        let removed = registry.remove_plugin("a").unwrap();
        assert_eq!(removed.id, "a");
        assert!(registry.find_by_id("a").is_none());
        assert!(registry.remove_plugin("a").is_none());
    }

    #[test]
    fn effective_refs_fall_back_to_main() {
        let mut plugin = entry("a", "u1", "https://github.com/x/a");
        assert_eq!(plugin.effective_refs(), vec![Ref::named("main")]);
        assert_eq!(plugin.primary_ref(), "main");

        plugin.refs = vec![Ref::named("dev"), Ref::named("main")];
        assert_eq!(plugin.primary_ref(), "dev");
    }

    #[test]
    fn bare_default_requires_no_extras() {
        assert!(Ref::named("main").is_bare_default());
        let mut bounded = Ref::named("main");
        bounded.min_api_version = Some("3.0".to_string());
        assert!(!bounded.is_bare_default());
        assert!(!Ref::named("dev").is_bare_default());
    }

    #[test]
    fn blacklist_remove_matches_url_or_uuid() {
        let mut registry = Registry::default();
        registry.append_blacklist(blacklisted(Some("https://github.com/x/a"), None, None));
        registry.append_blacklist(blacklisted(None, Some("u2"), None));
        registry.append_blacklist(blacklisted(None, None, Some("^https://evil")));

        let removed = registry.remove_blacklist(Some("https://github.com/x/a"), Some("u2"));
        assert_eq!(removed, 2);
        assert_eq!(registry.blacklist.len(), 1);
        assert_eq!(registry.remove_blacklist(None, None), 0);
    }

    #[test]
    fn blacklist_match_covers_regex() {
        let mut registry = Registry::default();
        registry.append_blacklist(blacklisted(None, None, Some(r"^https://github\.com/evil/")));
        registry.append_blacklist(blacklisted(None, None, Some("([")));

        assert!(registry.blacklist_match("https://github.com/evil/p", "u").is_some());
        assert!(registry.blacklist_match("https://github.com/good/p", "u").is_none());
    }

    #[test]
    fn sort_plugins_orders_by_id() {
        let mut registry = Registry::default();
        registry.append_plugin(entry("zeta", "u1", "https://github.com/x/z"));
        registry.append_plugin(entry("alpha", "u2", "https://github.com/x/a"));
        registry.sort_plugins();
        let ids: Vec<_> = registry.plugins.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["alpha", "zeta"]);
    }
}
