// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `picreg ref` subcommands.

use clap::Subcommand;
use picreg_core::{DEFAULT_REF, RegistryError};
use picreg_registry::{Ref, RefEdit, RegistryStore, TomlRegistryStore, add_ref, edit_ref, list_refs, remove_ref};

#[derive(Subcommand, Debug)]
pub enum RefCommand {
    /// Add a ref to a plugin.
    Add {
        plugin_id: String,
        /// Ref name (e.g. main, develop).
        ref_name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        min_api_version: Option<String>,
        #[arg(long)]
        max_api_version: Option<String>,
    },
    /// Edit a plugin ref.
    Edit {
        plugin_id: String,
        /// Current ref name.
        ref_name: String,
        /// New ref name.
        #[arg(long = "name")]
        new_name: Option<String>,
        /// Description, or an empty string to remove it.
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        min_api_version: Option<String>,
        #[arg(long)]
        max_api_version: Option<String>,
    },
    /// Remove a ref from a plugin.
    Remove { plugin_id: String, ref_name: String },
    /// List plugin refs.
    List { plugin_id: String },
}

pub fn run(command: RefCommand, store: &TomlRegistryStore) -> Result<(), RegistryError> {
    let mut registry = store.load()?;

    match command {
        RefCommand::Add {
            plugin_id,
            ref_name,
            description,
            min_api_version,
            max_api_version,
        } => {
            let new_ref = Ref {
                name: ref_name,
                description,
                min_api_version,
                max_api_version,
            };
            let name = new_ref.name.clone();
            add_ref(&mut registry, &plugin_id, new_ref)?;
            store.save(&mut registry)?;
            println!("Added ref: {name}");
        }
        RefCommand::Edit {
            plugin_id,
            ref_name,
            new_name,
            description,
            min_api_version,
            max_api_version,
        } => {
            let edit = RefEdit {
                new_name,
                description,
                min_api_version,
                max_api_version,
            };
            let name = edit_ref(&mut registry, &plugin_id, &ref_name, edit)?;
            store.save(&mut registry)?;
            println!("Updated ref: {name}");
        }
        RefCommand::Remove {
            plugin_id,
            ref_name,
        } => {
            remove_ref(&mut registry, &plugin_id, &ref_name)?;
            store.save(&mut registry)?;
            println!("Removed ref: {ref_name}");
        }
        RefCommand::List { plugin_id } => {
            let listed = list_refs(&registry, &plugin_id)?;
            if listed.implicit_default {
                println!("No refs defined (using default: {DEFAULT_REF})");
            } else {
                for r in &listed.refs {
                    println!("{}", format_ref(r));
                }
            }
        }
    }

    Ok(())
}

/// `name [- description] [(API bounds)]`.
pub fn format_ref(r: &Ref) -> String {
    let mut parts = vec![r.name.clone()];
    if let Some(description) = &r.description {
        parts.push(format!("- {description}"));
    }
    match (&r.min_api_version, &r.max_api_version) {
        (Some(min), Some(max)) => parts.push(format!("(API {min}-{max})")),
        (Some(min), None) => parts.push(format!("(API {min}+)")),
        (None, Some(max)) => parts.push(format!("(API <={max})")),
        (None, None) => {}
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded(min: Option<&str>, max: Option<&str>) -> Ref {
        Ref {
            name: "main".to_string(),
            description: None,
            min_api_version: min.map(str::to_string),
            max_api_version: max.map(str::to_string),
        }
    }

    #[test]
    fn formats_api_bounds() {
        assert_eq!(format_ref(&bounded(None, None)), "main");
        assert_eq!(format_ref(&bounded(Some("3.0"), Some("3.99"))), "main (API 3.0-3.99)");
        assert_eq!(format_ref(&bounded(Some("4.0"), None)), "main (API 4.0+)");
        assert_eq!(format_ref(&bounded(None, Some("3.99"))), "main (API <=3.99)");
    }

    #[test]
    fn formats_description_before_bounds() {
        let mut r = bounded(Some("4.0"), None);
        r.description = Some("Stable".to_string());
        assert_eq!(format_ref(&r), "main - Stable (API 4.0+)");
    }
}
