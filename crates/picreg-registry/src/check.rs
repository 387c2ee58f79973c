// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Whole-registry consistency checks and statistics.

use std::collections::{BTreeMap, HashSet};

use regex::Regex;

use crate::model::Registry;

fn duplicates<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    values
        .filter(|v| !seen.insert(*v) && reported.insert(*v))
        .collect()
}

/// Returns every consistency problem in the registry. Empty means consistent.
pub fn check_registry(registry: &Registry) -> Vec<String> {
    let mut errors = Vec::new();
    let plugins = &registry.plugins;

    for id in duplicates(plugins.iter().map(|p| p.id.as_str())) {
        errors.push(format!("Duplicate plugin ID: {id}"));
    }
    for uuid in duplicates(plugins.iter().map(|p| p.uuid.as_str())) {
        errors.push(format!("Duplicate plugin UUID: {uuid}"));
    }
    for url in duplicates(plugins.iter().map(|p| p.git_url.as_str())) {
        errors.push(format!("Duplicate git URL: {url}"));
    }

    for plugin in plugins {
        if let Some(rule) = registry.blacklist_match(&plugin.git_url, &plugin.uuid) {
            errors.push(format!(
                "Plugin {} is blacklisted: {}",
                plugin.id, rule.reason
            ));
        }
        for name in duplicates(plugin.refs.iter().map(|r| r.name.as_str())) {
            errors.push(format!("Plugin {} has duplicate ref: {name}", plugin.id));
        }
    }

    for (index, entry) in registry.blacklist.iter().enumerate() {
        if !entry.has_identifier() {
            errors.push(format!("Blacklist entry {} has no url, uuid, or url_regex", index + 1));
        }
        if let Some(pattern) = &entry.url_regex {
            if let Err(e) = Regex::new(pattern) {
                errors.push(format!(
                    "Blacklist entry {} has invalid url_regex '{pattern}': {e}",
                    index + 1
                ));
            }
        }
    }

    errors
}

/// Plugin counts for the `stats` report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub total_plugins: usize,
    pub blacklist_entries: usize,
    /// Trust level name to count, sorted by name.
    pub by_trust: BTreeMap<String, usize>,
    /// Category to count, sorted by name.
    pub by_category: BTreeMap<String, usize>,
}

pub fn registry_stats(registry: &Registry) -> RegistryStats {
    let mut stats = RegistryStats {
        total_plugins: registry.plugins.len(),
        blacklist_entries: registry.blacklist.len(),
        ..RegistryStats::default()
    };
    for plugin in &registry.plugins {
        *stats
            .by_trust
            .entry(plugin.trust_level.to_string())
            .or_default() += 1;
        for category in &plugin.categories {
            *stats.by_category.entry(category.clone()).or_default() += 1;
        }
    }
    stats
}
