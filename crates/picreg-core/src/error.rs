// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the picreg plugin registry.

use thiserror::Error;

/// The error type returned by every registry operation.
///
/// Variants carry the structured detail needed to rebuild the user-facing
/// message (field names, offending values). Nothing here prints or exits;
/// mapping to stderr and exit codes belongs to the binary.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Bad or missing user input (no blacklist identifier, empty reason, etc.).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Trust level outside the ranked set.
    #[error("Invalid trust level: {0}")]
    InvalidTrustLevel(String),

    /// No plugin identifier could be derived from a repository URL.
    #[error("cannot derive plugin ID from URL {url}: {reason}")]
    InvalidIdentifier { url: String, reason: String },

    /// Unknown plugin, ref, redirect, or blacklist entry.
    #[error("{kind} {name} not found")]
    NotFound { kind: &'static str, name: String },

    /// An id, uuid, git URL, or ref name collides with an existing one.
    #[error("{field} {value} already exists")]
    DuplicateEntry { field: &'static str, value: String },

    /// A re-fetched manifest carries a different uuid than the stored entry.
    #[error("UUID mismatch: registry has {expected}, manifest has {found}")]
    UuidMismatch { expected: String, found: String },

    /// The manifest failed schema validation. Carries every problem found.
    #[error("Manifest validation failed: {}", errors.join(", "))]
    ValidationFailed { errors: Vec<String> },

    /// The manifest could not be retrieved or parsed.
    #[error("failed to fetch manifest: {message}")]
    Fetch {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A blacklist rule matches the plugin being admitted.
    #[error("{target} is blacklisted: {reason}")]
    Blacklisted { target: String, reason: String },

    /// Registry file I/O or (de)serialization failure.
    #[error("storage error: {message}")]
    Storage {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Loaded settings that a component cannot use, e.g. an invalid User-Agent.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RegistryError {
    /// Shorthand for a plugin lookup miss.
    pub fn plugin_not_found(id: &str) -> Self {
        RegistryError::NotFound {
            kind: "Plugin",
            name: id.to_string(),
        }
    }

    /// Shorthand for a ref lookup miss.
    pub fn ref_not_found(name: &str) -> Self {
        RegistryError::NotFound {
            kind: "Ref",
            name: name.to_string(),
        }
    }
}
