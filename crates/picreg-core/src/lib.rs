// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the picreg plugin registry.
//!
//! Provides the error taxonomy, the types shared between the manifest
//! validator and the registry model, and the trait through which the core
//! reaches the manifest fetch collaborator.

pub mod error;
pub mod traits;
pub mod types;

pub use error::RegistryError;
pub use traits::ManifestFetcher;
pub use types::{Category, Manifest, TrustLevel, VersioningScheme};

/// Name of the manifest file looked up in plugin repositories.
pub const MANIFEST_FILE_NAME: &str = "MANIFEST.toml";

/// Ref used when a plugin declares none.
pub const DEFAULT_REF: &str = "main";

/// Schema version written to new registry files.
pub const REGISTRY_API_VERSION: &str = "3.0";
