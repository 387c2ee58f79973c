// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `MANIFEST.toml` validation and retrieval.
//!
//! The validator checks a fetched manifest against the registry's schema
//! contract and reports every problem at once. The fetcher retrieves the
//! manifest from GitHub or GitLab at a given ref.

pub mod fetch;
pub mod markdown;
pub mod validator;

pub use fetch::{HttpManifestFetcher, manifest_url};
pub use markdown::{ComrakRenderer, MarkdownRenderer};
pub use validator::{REQUIRED_FIELDS, ensure_valid, validate_manifest, validate_manifest_with};
