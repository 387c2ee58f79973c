// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `picreg plugin` subcommands.

use clap::Subcommand;
use picreg_core::{ManifestFetcher, RegistryError, TrustLevel};
use picreg_registry::{
    AddPlugin, PluginEdit, PluginEntry, RegistryStore, TomlRegistryStore, add_plugin,
    add_redirect, edit_plugin, list_redirects, remove_plugin, remove_redirect, update_plugin,
};

#[derive(Subcommand, Debug)]
pub enum PluginCommand {
    /// Fetch a plugin's MANIFEST.toml and add it to the registry.
    Add {
        /// Git repository URL.
        url: String,
        /// Trust level: official, trusted, or community.
        #[arg(long, default_value_t = TrustLevel::lowest().to_string())]
        trust: String,
        /// Categories, comma-separated (default: from the manifest).
        #[arg(long, value_delimiter = ',')]
        categories: Option<Vec<String>>,
        /// Refs with optional API bounds, e.g. 'main:4.0,picard-v3:3.0-3.99'.
        #[arg(long)]
        refs: Option<String>,
        /// Version tagging scheme: 'semver', 'calver', or 'regex:<pattern>'.
        #[arg(long)]
        versioning_scheme: Option<String>,
    },
    /// Refresh plugin metadata from its MANIFEST.toml.
    Update {
        plugin_id: String,
        /// Ref to fetch from (default: first ref, or main).
        #[arg(long = "ref")]
        git_ref: Option<String>,
    },
    /// Edit registry-owned plugin fields.
    Edit {
        plugin_id: String,
        #[arg(long)]
        trust: Option<String>,
        #[arg(long, value_delimiter = ',')]
        categories: Option<Vec<String>>,
        #[arg(long)]
        git_url: Option<String>,
        /// New scheme, or an empty string to remove it.
        #[arg(long)]
        versioning_scheme: Option<String>,
    },
    /// Manage previous URLs of a plugin that moved.
    Redirect {
        plugin_id: String,
        /// Old git URL to redirect from.
        old_url: Option<String>,
        /// Remove the redirect instead of adding it.
        #[arg(long)]
        remove: bool,
        /// List all redirects.
        #[arg(long, conflicts_with = "remove")]
        list: bool,
    },
    /// Remove a plugin.
    Remove { plugin_id: String },
    /// List plugins.
    List {
        /// Show full details for each plugin.
        #[arg(short, long)]
        verbose: bool,
        /// Only plugins with this trust level.
        #[arg(long)]
        trust: Option<String>,
        /// Only plugins in this category.
        #[arg(long)]
        category: Option<String>,
    },
    /// Show plugin details.
    Show { plugin_id: String },
}

pub async fn run(
    command: PluginCommand,
    store: &TomlRegistryStore,
    fetcher: &dyn ManifestFetcher,
) -> Result<(), RegistryError> {
    let mut registry = store.load()?;

    match command {
        PluginCommand::Add {
            url,
            trust,
            categories,
            refs,
            versioning_scheme,
        } => {
            let request = AddPlugin {
                git_url: url,
                trust_level: trust,
                categories,
                refs,
                versioning_scheme,
            };
            let plugin = add_plugin(&mut registry, fetcher, request).await?;
            store.save(&mut registry)?;
            println!("Added plugin: {} ({})", plugin.name, plugin.id);
        }
        PluginCommand::Update { plugin_id, git_ref } => {
            let plugin =
                update_plugin(&mut registry, fetcher, &plugin_id, git_ref.as_deref()).await?;
            store.save(&mut registry)?;
            println!("Updated plugin: {} ({})", plugin.name, plugin.id);
        }
        PluginCommand::Edit {
            plugin_id,
            trust,
            categories,
            git_url,
            versioning_scheme,
        } => {
            let edit = PluginEdit {
                trust_level: trust,
                categories,
                git_url,
                versioning_scheme,
            };
            let plugin = edit_plugin(&mut registry, &plugin_id, edit)?;
            store.save(&mut registry)?;
            println!("Updated plugin: {} ({})", plugin.name, plugin.id);
        }
        PluginCommand::Redirect {
            plugin_id,
            old_url,
            remove,
            list,
        } => {
            if list {
                let plugin = registry
                    .find_by_id(&plugin_id)
                    .ok_or_else(|| RegistryError::plugin_not_found(&plugin_id))?;
                let redirects = list_redirects(&registry, &plugin_id)?;
                if redirects.is_empty() {
                    println!("No redirects defined");
                }
                for url in redirects {
                    println!("{url} -> {}", plugin.git_url);
                }
                return Ok(());
            }

            let old_url = old_url.ok_or_else(|| {
                RegistryError::InvalidArgument("an old URL is required".to_string())
            })?;
            if remove {
                remove_redirect(&mut registry, &plugin_id, &old_url)?;
                store.save(&mut registry)?;
                println!("Removed redirect: {old_url}");
            } else {
                add_redirect(&mut registry, &plugin_id, &old_url)?;
                store.save(&mut registry)?;
                if let Some(plugin) = registry.find_by_id(&plugin_id) {
                    println!("Added redirect: {old_url} -> {}", plugin.git_url);
                }
            }
        }
        PluginCommand::Remove { plugin_id } => {
            remove_plugin(&mut registry, &plugin_id)?;
            store.save(&mut registry)?;
            println!("Removed plugin: {plugin_id}");
        }
        PluginCommand::List {
            verbose,
            trust,
            category,
        } => {
            let trust = trust.as_deref().map(TrustLevel::parse).transpose()?;
            let mut plugins: Vec<&PluginEntry> = registry
                .plugins
                .iter()
                .filter(|p| trust.is_none_or(|t| p.trust_level == t))
                .filter(|p| {
                    category
                        .as_ref()
                        .is_none_or(|c| p.categories.contains(c))
                })
                .collect();
            plugins.sort_by(|a, b| a.id.cmp(&b.id));

            for (i, plugin) in plugins.iter().enumerate() {
                if verbose {
                    if i > 0 {
                        println!();
                    }
                    print!("{}", format_details(plugin));
                } else {
                    println!("{}", format_summary(plugin));
                }
            }
        }
        PluginCommand::Show { plugin_id } => {
            let plugin = registry
                .find_by_id(&plugin_id)
                .ok_or_else(|| RegistryError::plugin_not_found(&plugin_id))?;
            print!("{}", format_details(plugin));
        }
    }

    Ok(())
}

/// One-line listing: `id: name (trust)`.
pub fn format_summary(plugin: &PluginEntry) -> String {
    format!("{}: {} ({})", plugin.id, plugin.name, plugin.trust_level)
}

/// Multi-line detail block, newline-terminated.
pub fn format_details(plugin: &PluginEntry) -> String {
    let mut lines = vec![
        format!("ID: {}", plugin.id),
        format!("Name: {}", plugin.name),
        format!("UUID: {}", plugin.uuid),
        format!("Description: {}", plugin.description),
        format!("URL: {}", plugin.git_url),
        format!("Trust Level: {}", plugin.trust_level),
        format!("Categories: {}", plugin.categories.join(", ")),
        format!("Authors: {}", plugin.authors.join(", ")),
    ];
    if let Some(maintainers) = &plugin.maintainers {
        lines.push(format!("Maintainers: {}", maintainers.join(", ")));
    }
    if let Some(scheme) = &plugin.versioning_scheme {
        lines.push(format!("Versioning Scheme: {scheme}"));
    }
    if !plugin.redirect_from.is_empty() {
        lines.push(format!("Redirects from: {}", plugin.redirect_from.join(", ")));
    }
    lines.push(format!("Added: {}", plugin.added_at.to_rfc3339()));
    lines.push(format!("Updated: {}", plugin.updated_at.to_rfc3339()));
    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use picreg_core::VersioningScheme;
    use picreg_registry::Registry;
    use picreg_test_utils::{ManifestBuilder, MockFetcher};

    use super::*;

    async fn sample() -> PluginEntry {
        let url = "https://github.com/user/picard-plugin-example";
        let fetcher = MockFetcher::with_manifest(
            url,
            ManifestBuilder::new().authors(&["Alice", "Bob"]).categories(&["metadata"]).build(),
        );
        let mut registry = Registry::default();
        add_plugin(&mut registry, &fetcher, AddPlugin::new(url)).await.unwrap()
    }

    #[tokio::test]
    async fn summary_line_shows_id_name_and_trust() {
        assert_eq!(format_summary(&sample().await), "example: Test Plugin (community)");
    }

    #[tokio::test]
    async fn details_include_optional_fields_only_when_set() {
        let mut plugin = sample().await;
        let details = format_details(&plugin);
        assert!(details.contains("Authors: Alice, Bob\n"));
        assert!(details.contains("Categories: metadata\n"));
        assert!(!details.contains("Maintainers"));
        assert!(!details.contains("Versioning Scheme"));
        assert!(details.starts_with("ID: example\nName: Test Plugin\n"));
        assert_eq!(details.lines().count(), 10);
        assert!(details.ends_with(&format!("Updated: {}\n", plugin.updated_at.to_rfc3339())));

        plugin.versioning_scheme = Some(VersioningScheme::Calver);
        plugin.redirect_from = vec!["https://github.com/old/x".to_string()];
        let details = format_details(&plugin);
        assert!(details.contains("Versioning Scheme: calver\n"));
        assert!(details.contains("Redirects from: https://github.com/old/x\n"));
    }
}
