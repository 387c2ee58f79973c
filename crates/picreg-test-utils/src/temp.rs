// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temporary registry locations.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temp directory with a registry path inside it.
///
/// The directory (and the file, once written) is deleted on drop.
pub struct TempRegistry {
    _dir: TempDir,
    path: PathBuf,
}

impl TempRegistry {
    /// Create a fresh directory; the registry file does not exist yet.
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("plugins.toml");
        Ok(Self { _dir: dir, path })
    }

    /// Create a directory whose registry file holds `content`.
    pub fn with_content(content: &str) -> std::io::Result<Self> {
        let registry = Self::new()?;
        std::fs::write(&registry.path, content)?;
        Ok(registry)
    }

    /// Path to the registry file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current file contents.
    pub fn read(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.path)
    }
}
