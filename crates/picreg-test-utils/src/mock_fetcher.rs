// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock manifest fetcher for deterministic testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use picreg_core::{Manifest, ManifestFetcher, RegistryError};

/// A fetcher that serves manifests registered per repository URL.
///
/// Every call is recorded as `(git_url, git_ref)` so tests can assert which
/// ref an operation fetched from. Unknown URLs fail with a `Fetch` error.
#[derive(Clone, Default)]
pub struct MockFetcher {
    manifests: Arc<Mutex<HashMap<String, Manifest>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockFetcher {
    /// Create a fetcher with no manifests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fetcher serving a single manifest for `git_url`.
    pub fn with_manifest(git_url: &str, manifest: Manifest) -> Self {
        let mut manifests = HashMap::new();
        manifests.insert(git_url.to_string(), manifest);
        Self {
            manifests: Arc::new(Mutex::new(manifests)),
            calls: Arc::default(),
        }
    }

    /// Register or replace the manifest served for `git_url`.
    pub async fn set_manifest(&self, git_url: &str, manifest: Manifest) {
        self.manifests
            .lock()
            .await
            .insert(git_url.to_string(), manifest);
    }

    /// All `(git_url, git_ref)` pairs fetched so far, in order.
    pub async fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl ManifestFetcher for MockFetcher {
    async fn fetch(&self, git_url: &str, git_ref: &str) -> Result<Manifest, RegistryError> {
        self.calls
            .lock()
            .await
            .push((git_url.to_string(), git_ref.to_string()));

        self.manifests
            .lock()
            .await
            .get(git_url)
            .cloned()
            .ok_or_else(|| RegistryError::Fetch {
                message: format!("no mock manifest for {git_url}"),
                source: None,
            })
    }
}
