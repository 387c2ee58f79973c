// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin identifier derivation from repository URLs.

use picreg_core::RegistryError;

/// Repository name prefixes dropped from ids. Only the first match is stripped.
const STRIPPED_PREFIXES: [&str; 3] = ["picard-plugin-", "picard-", "plugin-"];

/// Derives the registry id from a repository URL.
///
/// Uses the last path segment (ignoring a trailing `/` and `.git`), strips one
/// known prefix, lowercases, maps anything outside `[a-z0-9-]` to `-`,
/// collapses runs of `-` and trims them from both ends.
///
/// ```
/// use picreg_registry::derive_plugin_id;
///
/// let id = derive_plugin_id("https://github.com/user/picard-plugin-Last_FM.git").unwrap();
/// assert_eq!(id, "last-fm");
/// ```
pub fn derive_plugin_id(git_url: &str) -> Result<String, RegistryError> {
    let invalid = |reason: &str| RegistryError::InvalidIdentifier {
        url: git_url.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = git_url.trim_end_matches('/');
    let (_, segment) = trimmed
        .rsplit_once('/')
        .ok_or_else(|| invalid("no path segment"))?;
    let repo_name = match segment.strip_suffix(".git") {
        Some(stem) if !stem.is_empty() => stem,
        _ => segment,
    };
    if repo_name.is_empty() {
        return Err(invalid("no path segment"));
    }

    let lowered = repo_name.to_lowercase();
    let stem = STRIPPED_PREFIXES
        .iter()
        .find_map(|prefix| lowered.strip_prefix(prefix))
        .unwrap_or(&lowered);

    let mut id = String::with_capacity(stem.len());
    for c in stem.chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            c
        } else {
            '-'
        };
        if c == '-' && id.ends_with('-') {
            continue;
        }
        id.push(c);
    }

    let id = id.trim_matches('-');
    if id.is_empty() {
        return Err(invalid("name normalizes to an empty id"));
    }
    Ok(id.to_string())
}
