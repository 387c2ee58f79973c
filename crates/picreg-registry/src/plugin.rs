// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin admission and maintenance.
//!
//! Every operation validates all of its inputs before touching the registry,
//! so a failed call leaves the registry exactly as it was.

use chrono::Utc;
use picreg_core::{
    Category, Manifest, ManifestFetcher, RegistryError, TrustLevel, VersioningScheme,
};
use picreg_manifest::ensure_valid;
use tracing::{debug, info};

use crate::ident::derive_plugin_id;
use crate::model::{PluginEntry, Registry};
use crate::refs::parse_refs;

/// Copies one optional manifest field onto an entry, clearing it when absent.
type Reconcile = fn(&mut PluginEntry, &Manifest);

fn reconcile_maintainers(entry: &mut PluginEntry, manifest: &Manifest) {
    entry.maintainers = manifest.string_list("maintainers");
}

fn reconcile_name_i18n(entry: &mut PluginEntry, manifest: &Manifest) {
    entry.name_i18n = manifest.string_map("name_i18n");
}

fn reconcile_description_i18n(entry: &mut PluginEntry, manifest: &Manifest) {
    entry.description_i18n = manifest.string_map("description_i18n");
}

/// Optional manifest keys mirrored onto the registry entry.
const OPTIONAL_FIELDS: [(&str, Reconcile); 3] = [
    ("maintainers", reconcile_maintainers),
    ("name_i18n", reconcile_name_i18n),
    ("description_i18n", reconcile_description_i18n),
];

fn reconcile_optional_fields(entry: &mut PluginEntry, manifest: &Manifest) {
    for (key, apply) in OPTIONAL_FIELDS {
        debug!(field = key, present = manifest.contains(key), "reconciling manifest field");
        apply(entry, manifest);
    }
}

/// Parameters for [`add_plugin`].
#[derive(Debug, Clone)]
pub struct AddPlugin {
    pub git_url: String,
    pub trust_level: String,
    /// Overrides the manifest's categories when non-empty.
    pub categories: Option<Vec<String>>,
    /// Ref specification, see [`parse_refs`]. Defaults to `main`.
    pub refs: Option<String>,
    pub versioning_scheme: Option<String>,
}

impl AddPlugin {
    /// A request at the lowest trust level with everything else defaulted.
    pub fn new(git_url: impl Into<String>) -> Self {
        Self {
            git_url: git_url.into(),
            trust_level: TrustLevel::lowest().to_string(),
            categories: None,
            refs: None,
            versioning_scheme: None,
        }
    }

    pub fn trust_level(mut self, trust_level: impl Into<String>) -> Self {
        self.trust_level = trust_level.into();
        self
    }

    pub fn categories(mut self, categories: Vec<String>) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn refs(mut self, refs: impl Into<String>) -> Self {
        self.refs = Some(refs.into());
        self
    }

    pub fn versioning_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.versioning_scheme = Some(scheme.into());
        self
    }
}

/// Parameters for [`edit_plugin`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct PluginEdit {
    pub trust_level: Option<String>,
    pub categories: Option<Vec<String>>,
    pub git_url: Option<String>,
    /// An empty string removes the scheme.
    pub versioning_scheme: Option<String>,
}

fn validate_categories(categories: &[String]) -> Result<(), RegistryError> {
    let invalid: Vec<&str> = categories
        .iter()
        .map(String::as_str)
        .filter(|c| !Category::is_valid(c))
        .collect();
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(RegistryError::InvalidArgument(format!(
            "Invalid category: {}",
            invalid.join(", ")
        )))
    }
}

fn required_str(manifest: &Manifest, key: &str) -> Result<String, RegistryError> {
    manifest
        .str_field(key)
        .map(str::to_string)
        .ok_or_else(|| RegistryError::ValidationFailed {
            errors: vec![format!("Invalid {key}: expected a string")],
        })
}

fn check_duplicates(registry: &Registry, git_url: &str, uuid: &str, id: &str) -> Result<(), RegistryError> {
    if registry.find_by_git_url(git_url).is_some() {
        return Err(RegistryError::DuplicateEntry {
            field: "Plugin with git_url",
            value: git_url.to_string(),
        });
    }
    if registry.find_by_uuid(uuid).is_some() {
        return Err(RegistryError::DuplicateEntry {
            field: "Plugin with uuid",
            value: uuid.to_string(),
        });
    }
    if registry.find_by_id(id).is_some() {
        return Err(RegistryError::DuplicateEntry {
            field: "Plugin",
            value: id.to_string(),
        });
    }
    Ok(())
}

/// Fetches, validates and admits a new plugin. Returns the stored entry.
pub async fn add_plugin(
    registry: &mut Registry,
    fetcher: &dyn ManifestFetcher,
    request: AddPlugin,
) -> Result<PluginEntry, RegistryError> {
    let trust_level = TrustLevel::parse(&request.trust_level)?;
    let categories = request.categories.filter(|c| !c.is_empty());
    if let Some(categories) = &categories {
        validate_categories(categories)?;
    }
    let versioning_scheme = request
        .versioning_scheme
        .as_deref()
        .map(str::parse::<VersioningScheme>)
        .transpose()?;
    let refs = parse_refs(request.refs.as_deref().unwrap_or_default())?;

    let git_url = request.git_url;
    let fetch_ref = refs[0].name.as_str();
    debug!(%git_url, git_ref = fetch_ref, "fetching manifest for new plugin");
    let manifest = fetcher.fetch(&git_url, fetch_ref).await?;
    ensure_valid(&manifest)?;

    let id = derive_plugin_id(&git_url)?;
    let uuid = required_str(&manifest, "uuid")?;
    check_duplicates(registry, &git_url, &uuid, &id)?;
    if let Some(rule) = registry.blacklist_match(&git_url, &uuid) {
        return Err(RegistryError::Blacklisted {
            target: git_url,
            reason: rule.reason.clone(),
        });
    }

    let categories = categories
        .or_else(|| manifest.string_list("categories"))
        .unwrap_or_default();
    let refs = match refs.as_slice() {
        [only] if only.is_bare_default() => Vec::new(),
        _ => refs,
    };

    let now = Utc::now();
    let mut entry = PluginEntry {
        id,
        uuid,
        name: required_str(&manifest, "name")?,
        description: required_str(&manifest, "description")?,
        git_url,
        categories,
        trust_level,
        authors: manifest.string_list("authors").unwrap_or_default(),
        maintainers: None,
        name_i18n: None,
        description_i18n: None,
        versioning_scheme,
        refs,
        redirect_from: Vec::new(),
        added_at: now,
        updated_at: now,
    };
    reconcile_optional_fields(&mut entry, &manifest);

    info!(id = %entry.id, trust = %entry.trust_level, "adding plugin");
    registry.append_plugin(entry.clone());
    Ok(entry)
}

/// Re-fetches a plugin's manifest and refreshes its metadata.
///
/// The manifest is read from `git_ref` when given, else the first stored
/// ref, else `main`. Identity fields (`id`, `uuid`, `git_url`, `added_at`)
/// never change.
pub async fn update_plugin(
    registry: &mut Registry,
    fetcher: &dyn ManifestFetcher,
    plugin_id: &str,
    git_ref: Option<&str>,
) -> Result<PluginEntry, RegistryError> {
    let (git_url, fetch_ref, expected_uuid) = {
        let plugin = registry
            .find_by_id(plugin_id)
            .ok_or_else(|| RegistryError::plugin_not_found(plugin_id))?;
        let fetch_ref = git_ref
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| plugin.primary_ref())
            .to_string();
        (plugin.git_url.clone(), fetch_ref, plugin.uuid.clone())
    };

    debug!(plugin = plugin_id, git_ref = %fetch_ref, "fetching manifest for update");
    let manifest = fetcher.fetch(&git_url, &fetch_ref).await?;
    ensure_valid(&manifest)?;

    let uuid = required_str(&manifest, "uuid")?;
    if uuid != expected_uuid {
        return Err(RegistryError::UuidMismatch {
            expected: expected_uuid,
            found: uuid,
        });
    }
    let name = required_str(&manifest, "name")?;
    let description = required_str(&manifest, "description")?;

    let plugin = registry
        .find_by_id_mut(plugin_id)
        .ok_or_else(|| RegistryError::plugin_not_found(plugin_id))?;
    plugin.name = name;
    plugin.description = description;
    plugin.authors = manifest.string_list("authors").unwrap_or_default();
    reconcile_optional_fields(plugin, &manifest);
    plugin.touch();

    info!(id = plugin_id, "updated plugin metadata");
    Ok(plugin.clone())
}

/// Applies operator edits to a plugin's registry-owned fields.
pub fn edit_plugin(
    registry: &mut Registry,
    plugin_id: &str,
    edit: PluginEdit,
) -> Result<PluginEntry, RegistryError> {
    if registry.find_by_id(plugin_id).is_none() {
        return Err(RegistryError::plugin_not_found(plugin_id));
    }

    let trust_level = edit
        .trust_level
        .as_deref()
        .map(TrustLevel::parse)
        .transpose()?;
    if let Some(categories) = &edit.categories {
        validate_categories(categories)?;
    }
    // Outer None: untouched. Inner None: remove.
    let versioning_scheme = edit
        .versioning_scheme
        .as_deref()
        .map(|s| {
            if s.is_empty() {
                Ok(None)
            } else {
                s.parse::<VersioningScheme>().map(Some)
            }
        })
        .transpose()?;
    if let Some(git_url) = &edit.git_url {
        if git_url.is_empty() {
            return Err(RegistryError::InvalidArgument(
                "git_url must not be empty".to_string(),
            ));
        }
        if registry
            .find_by_git_url(git_url)
            .is_some_and(|other| other.id != plugin_id)
        {
            return Err(RegistryError::DuplicateEntry {
                field: "Plugin with git_url",
                value: git_url.clone(),
            });
        }
    }

    let plugin = registry
        .find_by_id_mut(plugin_id)
        .ok_or_else(|| RegistryError::plugin_not_found(plugin_id))?;
    if let Some(trust_level) = trust_level {
        plugin.trust_level = trust_level;
    }
    if let Some(categories) = edit.categories {
        plugin.categories = categories;
    }
    if let Some(git_url) = edit.git_url {
        plugin.git_url = git_url;
    }
    if let Some(scheme) = versioning_scheme {
        plugin.versioning_scheme = scheme;
    }
    plugin.touch();

    info!(id = plugin_id, "edited plugin");
    Ok(plugin.clone())
}

/// Removes a plugin. Fails `NotFound` when absent.
pub fn remove_plugin(registry: &mut Registry, plugin_id: &str) -> Result<PluginEntry, RegistryError> {
    let removed = registry
        .remove_plugin(plugin_id)
        .ok_or_else(|| RegistryError::plugin_not_found(plugin_id))?;
    info!(id = plugin_id, "removed plugin");
    Ok(removed)
}
