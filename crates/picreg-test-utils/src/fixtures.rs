// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manifest builders.

use picreg_core::Manifest;

/// UUID used by [`ManifestBuilder::new`].
pub const TEST_UUID: &str = "12345678-1234-4234-8234-123456789abc";

/// Builds valid manifests with optional extras.
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    manifest: Manifest,
}

impl ManifestBuilder {
    /// A valid manifest with the fixed [`TEST_UUID`].
    pub fn new() -> Self {
        let mut manifest = Manifest::default();
        manifest.insert("uuid", TEST_UUID);
        manifest.insert("name", "Test Plugin");
        manifest.insert("version", "1.0.0");
        manifest.insert("description", "A test plugin");
        manifest.insert("api", vec!["3.0"]);
        Self { manifest }
    }

    /// A valid manifest with a freshly generated v4 UUID.
    pub fn random() -> Self {
        Self::new().uuid(&uuid::Uuid::new_v4().to_string())
    }

    pub fn uuid(mut self, uuid: &str) -> Self {
        self.manifest.insert("uuid", uuid);
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.manifest.insert("name", name);
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.manifest.insert("description", description);
        self
    }

    pub fn authors(mut self, authors: &[&str]) -> Self {
        self.manifest.insert("authors", authors.to_vec());
        self
    }

    pub fn maintainers(mut self, maintainers: &[&str]) -> Self {
        self.manifest.insert("maintainers", maintainers.to_vec());
        self
    }

    pub fn categories(mut self, categories: &[&str]) -> Self {
        self.manifest.insert("categories", categories.to_vec());
        self
    }

    /// Adds `name_i18n` with the given locale/translation pairs.
    pub fn name_i18n(mut self, pairs: &[(&str, &str)]) -> Self {
        self.manifest.insert("name_i18n", table(pairs));
        self
    }

    /// Adds `description_i18n` with the given locale/translation pairs.
    pub fn description_i18n(mut self, pairs: &[(&str, &str)]) -> Self {
        self.manifest.insert("description_i18n", table(pairs));
        self
    }

    pub fn long_description(mut self, text: &str) -> Self {
        self.manifest.insert("long_description", text);
        self
    }

    /// Drops a key, e.g. to produce an invalid manifest.
    pub fn without(mut self, key: &str) -> Self {
        self.manifest.remove(key);
        self
    }

    pub fn build(self) -> Manifest {
        self.manifest
    }
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn table(pairs: &[(&str, &str)]) -> toml::Table {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), toml::Value::from(*v)))
        .collect()
}
