// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry model and operations for picreg.
//!
//! The [`Registry`] is a plain value: load it through a [`RegistryStore`],
//! mutate it with the operation functions, then save it back. Operations that
//! need a manifest take a [`ManifestFetcher`](picreg_core::ManifestFetcher)
//! so tests can substitute a mock.

pub mod blacklist;
pub mod check;
pub mod ident;
pub mod model;
pub mod plugin;
pub mod redirect;
pub mod refs;
pub mod store;

pub use blacklist::{NewBlacklistEntry, add_blacklist, find_blacklist, remove_blacklist};
pub use check::{RegistryStats, check_registry, registry_stats};
pub use ident::derive_plugin_id;
pub use model::{BlacklistEntry, PluginEntry, Ref, Registry};
pub use plugin::{AddPlugin, PluginEdit, add_plugin, edit_plugin, remove_plugin, update_plugin};
pub use redirect::{add_redirect, list_redirects, remove_redirect};
pub use refs::{RefEdit, RefList, add_ref, edit_ref, list_refs, parse_refs, remove_ref};
pub use store::{RegistryStore, TomlRegistryStore, to_toml_string};
