// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ref specification parsing and per-plugin ref management.

use std::collections::HashSet;

use picreg_core::RegistryError;
use tracing::info;

use crate::model::{PluginEntry, Ref, Registry};

/// Parses a comma-separated ref specification.
///
/// Each segment is `name`, `name:min` or `name:min-max`. The constraint is
/// split at its first hyphen, so a version token that itself contains a
/// hyphen (`4.0-beta`) is split in the wrong place. Version tokens are
/// otherwise taken verbatim.
///
/// ```
/// use picreg_registry::parse_refs;
///
/// let refs = parse_refs("main:4.0,picard-v3:3.0-3.99").unwrap();
/// assert_eq!(refs[0].min_api_version.as_deref(), Some("4.0"));
/// assert_eq!(refs[1].max_api_version.as_deref(), Some("3.99"));
/// ```
pub fn parse_refs(spec: &str) -> Result<Vec<Ref>, RegistryError> {
    let mut refs = Vec::new();
    let mut seen = HashSet::new();

    for segment in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let parsed = parse_segment(segment)?;
        if !seen.insert(parsed.name.clone()) {
            return Err(RegistryError::InvalidArgument(format!(
                "ref {} is listed more than once",
                parsed.name
            )));
        }
        refs.push(parsed);
    }

    if refs.is_empty() {
        refs.push(Ref::default_ref());
    }
    Ok(refs)
}

fn parse_segment(segment: &str) -> Result<Ref, RegistryError> {
    let (name, constraint) = match segment.split_once(':') {
        Some((name, constraint)) => (name.trim(), Some(constraint.trim())),
        None => (segment, None),
    };
    if name.is_empty() {
        return Err(RegistryError::InvalidArgument(format!(
            "ref segment '{segment}' has an empty name"
        )));
    }

    let mut parsed = Ref::named(name);
    if let Some(constraint) = constraint {
        match constraint.split_once('-') {
            Some((min, max)) => {
                parsed.min_api_version = non_empty(min);
                parsed.max_api_version = non_empty(max);
            }
            None => parsed.min_api_version = non_empty(constraint),
        }
    }
    Ok(parsed)
}

fn non_empty(token: &str) -> Option<String> {
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Changes applied by [`edit_ref`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct RefEdit {
    pub new_name: Option<String>,
    /// An empty string removes the description.
    pub description: Option<String>,
    pub min_api_version: Option<String>,
    pub max_api_version: Option<String>,
}

/// Result of [`list_refs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefList {
    pub refs: Vec<Ref>,
    /// True when the plugin stores no refs and `refs` is the implicit `[main]`.
    pub implicit_default: bool,
}

fn plugin_mut<'a>(registry: &'a mut Registry, plugin_id: &str) -> Result<&'a mut PluginEntry, RegistryError> {
    registry
        .find_by_id_mut(plugin_id)
        .ok_or_else(|| RegistryError::plugin_not_found(plugin_id))
}

/// Appends a ref to a plugin. Fails `DuplicateEntry` if the name exists.
pub fn add_ref(registry: &mut Registry, plugin_id: &str, new_ref: Ref) -> Result<(), RegistryError> {
    let name = new_ref.name.trim();
    if name.is_empty() {
        return Err(RegistryError::InvalidArgument(
            "ref name must not be empty".to_string(),
        ));
    }
    let new_ref = Ref {
        name: name.to_string(),
        ..new_ref
    };
    let plugin = plugin_mut(registry, plugin_id)?;
    if plugin.find_ref(&new_ref.name).is_some() {
        return Err(RegistryError::DuplicateEntry {
            field: "Ref",
            value: new_ref.name,
        });
    }

    info!(plugin = plugin_id, git_ref = %new_ref.name, "adding ref");
    plugin.refs.push(Ref {
        description: new_ref.description.filter(|d| !d.is_empty()),
        min_api_version: new_ref.min_api_version.filter(|v| !v.is_empty()),
        max_api_version: new_ref.max_api_version.filter(|v| !v.is_empty()),
        ..new_ref
    });
    plugin.touch();
    Ok(())
}

/// Edits a stored ref in place and returns its (possibly new) name.
pub fn edit_ref(
    registry: &mut Registry,
    plugin_id: &str,
    ref_name: &str,
    edit: RefEdit,
) -> Result<String, RegistryError> {
    let plugin = plugin_mut(registry, plugin_id)?;
    let index = plugin
        .refs
        .iter()
        .position(|r| r.name == ref_name)
        .ok_or_else(|| RegistryError::ref_not_found(ref_name))?;

    let new_name = edit
        .new_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty() && n != ref_name);
    if let Some(new_name) = &new_name {
        if plugin.find_ref(new_name).is_some() {
            return Err(RegistryError::DuplicateEntry {
                field: "Ref",
                value: new_name.clone(),
            });
        }
    }

    let target = &mut plugin.refs[index];
    if let Some(new_name) = new_name {
        target.name = new_name;
    }
    if let Some(description) = edit.description {
        target.description = (!description.is_empty()).then_some(description);
    }
    if let Some(min) = edit.min_api_version.filter(|v| !v.is_empty()) {
        target.min_api_version = Some(min);
    }
    if let Some(max) = edit.max_api_version.filter(|v| !v.is_empty()) {
        target.max_api_version = Some(max);
    }
    let name = target.name.clone();

    info!(plugin = plugin_id, git_ref = %name, "updated ref");
    plugin.touch();
    Ok(name)
}

/// Removes a stored ref. The `refs` list is dropped once empty.
pub fn remove_ref(registry: &mut Registry, plugin_id: &str, ref_name: &str) -> Result<(), RegistryError> {
    let plugin = plugin_mut(registry, plugin_id)?;
    let before = plugin.refs.len();
    plugin.refs.retain(|r| r.name != ref_name);
    if plugin.refs.len() == before {
        return Err(RegistryError::ref_not_found(ref_name));
    }

    info!(plugin = plugin_id, git_ref = ref_name, "removed ref");
    plugin.touch();
    Ok(())
}

/// Lists a plugin's refs, substituting the implicit `main` when none are stored.
pub fn list_refs(registry: &Registry, plugin_id: &str) -> Result<RefList, RegistryError> {
    let plugin = registry
        .find_by_id(plugin_id)
        .ok_or_else(|| RegistryError::plugin_not_found(plugin_id))?;
    Ok(RefList {
        refs: plugin.effective_refs(),
        implicit_default: plugin.refs.is_empty(),
    })
}
