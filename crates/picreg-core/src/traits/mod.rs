// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seams to the collaborators the registry core depends on.

pub mod fetcher;

pub use fetcher::ManifestFetcher;
