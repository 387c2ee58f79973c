// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manifest fetch trait.

use async_trait::async_trait;

use crate::error::RegistryError;
use crate::types::Manifest;

/// Retrieves a plugin's manifest from its source repository at a given ref.
///
/// The core only relies on a successful result being a parsed table; how the
/// document was retrieved (hosting provider, timeout, caching) is entirely the
/// implementor's business. Failures should surface as [`RegistryError::Fetch`].
#[async_trait]
pub trait ManifestFetcher: Send + Sync {
    /// Fetches and parses the manifest of `git_url` at `git_ref`.
    async fn fetch(&self, git_url: &str, git_ref: &str) -> Result<Manifest, RegistryError>;
}
