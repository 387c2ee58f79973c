// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry persistence.
//!
//! [`TomlRegistryStore`] keeps the registry as a single TOML document. Saves
//! write a temp file next to the target and rename it into place, so a failed
//! write never leaves a truncated registry behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use picreg_core::RegistryError;
use tracing::debug;

use crate::model::Registry;

/// Loads and saves the whole registry document.
pub trait RegistryStore {
    /// Reads the registry. A missing file yields an empty registry.
    fn load(&self) -> Result<Registry, RegistryError>;

    /// Writes the registry, sorting plugins by id first.
    fn save(&self, registry: &mut Registry) -> Result<(), RegistryError>;
}

/// File-backed TOML store.
#[derive(Debug, Clone)]
pub struct TomlRegistryStore {
    path: PathBuf,
}

fn storage_error(
    message: String,
    source: impl std::error::Error + Send + Sync + 'static,
) -> RegistryError {
    RegistryError::Storage {
        message,
        source: Some(Box::new(source)),
    }
}

impl TomlRegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegistryStore for TomlRegistryStore {
    fn load(&self) -> Result<Registry, RegistryError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "registry file missing, starting empty");
                return Ok(Registry::default());
            }
            Err(e) => {
                return Err(storage_error(
                    format!("failed to read {}: {e}", self.path.display()),
                    e,
                ));
            }
        };

        let registry: Registry = toml::from_str(&content).map_err(|e| {
            storage_error(format!("Invalid TOML in {}: {e}", self.path.display()), e)
        })?;
        debug!(
            path = %self.path.display(),
            plugins = registry.plugins.len(),
            blacklist = registry.blacklist.len(),
            "registry loaded"
        );
        Ok(registry)
    }

    fn save(&self, registry: &mut Registry) -> Result<(), RegistryError> {
        registry.sort_plugins();
        let body = to_toml_string(registry)?;

        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| {
            storage_error(
                format!("failed to create temp file in {}: {e}", parent.display()),
                e,
            )
        })?;
        tmp.write_all(body.as_bytes())
            .map_err(|e| storage_error(format!("failed to write registry: {e}"), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| storage_error(format!("failed to sync registry: {e}"), e))?;
        tmp.persist(&self.path).map_err(|e| {
            storage_error(
                format!("failed to replace {}: {}", self.path.display(), e.error),
                e.error,
            )
        })?;

        debug!(path = %self.path.display(), plugins = registry.plugins.len(), "registry saved");
        Ok(())
    }
}

/// Serializes the registry in its on-disk form.
pub fn to_toml_string(registry: &Registry) -> Result<String, RegistryError> {
    toml::to_string_pretty(registry)
        .map_err(|e| storage_error(format!("failed to serialize registry: {e}"), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_empty_registry() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlRegistryStore::new(dir.path().join("plugins.toml"));
        assert_eq!(store.load().unwrap(), Registry::default());
    }

    #[test]
    fn malformed_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plugins.toml");
        std::fs::write(&path, "api_version = ").unwrap();

        let err = TomlRegistryStore::new(&path).load().unwrap_err();
        assert!(matches!(err, RegistryError::Storage { .. }));
        assert!(err.to_string().contains("Invalid TOML"));
    }

    #[test]
    fn empty_registry_writes_only_api_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plugins.toml");
        let store = TomlRegistryStore::new(&path);

        store.save(&mut Registry::default()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.trim(), r#"api_version = "3.0""#);
        assert!(!written.contains("plugins"));
        assert!(!written.contains("blacklist"));
    }

    #[test]
    fn save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlRegistryStore::new(dir.path().join("plugins.toml"));
        store.save(&mut Registry::default()).unwrap();
        store.save(&mut Registry::default()).unwrap();

        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn save_replaces_previous_contents_whole() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plugins.toml");
        std::fs::write(&path, "x".repeat(4096)).unwrap();

        let store = TomlRegistryStore::new(&path);
        store.save(&mut Registry::default()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.trim(), "api_version = \"3.0\"");
        assert_eq!(store.load().unwrap(), Registry::default());
    }
}
