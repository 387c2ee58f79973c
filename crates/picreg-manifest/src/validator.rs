// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manifest schema validation.
//!
//! Every check runs on every call and all failures are returned together, so
//! a plugin author sees the whole list of problems at once. Malformed input
//! never panics: a field of the wrong type is either reported or treated as
//! absent.

use std::sync::LazyLock;

use picreg_core::{Category, Manifest, RegistryError};
use regex::Regex;

use crate::markdown::{ComrakRenderer, MarkdownRenderer, contains_raw_html};

/// Keys every manifest must carry.
pub const REQUIRED_FIELDS: [&str; 5] = ["uuid", "name", "version", "description", "api"];

/// Canonical 8-4-4-4-12 grouping. Any version and variant is accepted.
static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("uuid pattern is a valid regex")
});

/// Validates a manifest with the default comrak renderer.
///
/// Returns the list of error messages; an empty list means the manifest is valid.
pub fn validate_manifest(manifest: &Manifest) -> Vec<String> {
    validate_manifest_with(manifest, &ComrakRenderer)
}

/// Validates a manifest, rendering `long_description` with `renderer`.
pub fn validate_manifest_with(manifest: &Manifest, renderer: &dyn MarkdownRenderer) -> Vec<String> {
    let mut errors = Vec::new();

    check_required(manifest, &mut errors);
    check_uuid(manifest, &mut errors);
    check_categories(manifest, &mut errors);
    check_long_description(manifest, renderer, &mut errors);

    errors
}

/// Validates and converts a non-empty error list into `ValidationFailed`.
pub fn ensure_valid(manifest: &Manifest) -> Result<(), RegistryError> {
    let errors = validate_manifest(manifest);
    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(count = errors.len(), "manifest rejected");
        Err(RegistryError::ValidationFailed { errors })
    }
}

fn check_required(manifest: &Manifest, errors: &mut Vec<String>) {
    for field in REQUIRED_FIELDS {
        if !manifest.contains(field) {
            errors.push(format!("Missing required field: {field}"));
        }
    }
}

fn check_uuid(manifest: &Manifest, errors: &mut Vec<String>) {
    let Some(value) = manifest.get("uuid") else {
        return;
    };
    match value.as_str() {
        Some(uuid) if UUID_PATTERN.is_match(uuid) => {}
        Some(uuid) => errors.push(format!("Invalid uuid: '{uuid}' is not a valid UUID")),
        None => errors.push("Invalid uuid: expected a string".to_string()),
    }
}

fn check_categories(manifest: &Manifest, errors: &mut Vec<String>) {
    let Some(categories) = manifest.get("categories").and_then(|v| v.as_array()) else {
        return;
    };
    for category in categories {
        match category.as_str() {
            Some(name) if Category::is_valid(name) => {}
            Some(name) => errors.push(format!("Invalid category: {name}")),
            None => errors.push(format!("Invalid category: {category}")),
        }
    }
}

fn check_long_description(
    manifest: &Manifest,
    renderer: &dyn MarkdownRenderer,
    errors: &mut Vec<String>,
) {
    let Some(text) = manifest.str_field("long_description") else {
        return;
    };
    let html = renderer.render(text);
    if contains_raw_html(&html) {
        errors.push("Invalid long_description: HTML tags are not allowed".to_string());
    }
}
