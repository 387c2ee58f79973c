// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for picreg integration tests.
//!
//! - [`MockFetcher`] - manifest fetcher serving pre-registered manifests
//! - [`fixtures`] - manifest builders
//! - [`TempRegistry`] - throwaway directory holding a registry file

pub mod fixtures;
pub mod mock_fetcher;
pub mod temp;

pub use fixtures::ManifestBuilder;
pub use mock_fetcher::MockFetcher;
pub use temp::TempRegistry;
