// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `picreg blacklist` subcommands.

use clap::Subcommand;
use picreg_core::RegistryError;
use picreg_registry::{
    BlacklistEntry, NewBlacklistEntry, RegistryStore, TomlRegistryStore, add_blacklist,
    find_blacklist, remove_blacklist,
};
use tracing::warn;

#[derive(Subcommand, Debug)]
pub enum BlacklistCommand {
    /// Add a blacklist rule.
    Add {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        uuid: Option<String>,
        /// URL regex pattern.
        #[arg(long)]
        url_regex: Option<String>,
        /// Why the plugin is blacklisted.
        #[arg(long)]
        reason: String,
    },
    /// Remove every rule matching the URL or UUID.
    Remove {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        uuid: Option<String>,
    },
    /// List blacklist rules.
    List,
    /// Show the first rule matching the URL or UUID.
    Show {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        uuid: Option<String>,
    },
}

pub fn run(command: BlacklistCommand, store: &TomlRegistryStore) -> Result<(), RegistryError> {
    let mut registry = store.load()?;

    match command {
        BlacklistCommand::Add {
            url,
            uuid,
            url_regex,
            reason,
        } => {
            let entry = add_blacklist(
                &mut registry,
                NewBlacklistEntry {
                    url,
                    uuid,
                    url_regex,
                    reason,
                },
            )?;
            store.save(&mut registry)?;
            let identifier = entry
                .uuid
                .as_deref()
                .or(entry.url.as_deref())
                .or(entry.url_regex.as_deref())
                .unwrap_or_default();
            println!("Blacklisted: {identifier}");
        }
        BlacklistCommand::Remove { url, uuid } => {
            let removed = remove_blacklist(&mut registry, url.as_deref(), uuid.as_deref())?;
            if removed == 0 {
                warn!("no blacklist entries matched");
            }
            store.save(&mut registry)?;
            let identifier = uuid.or(url).unwrap_or_default();
            println!("Removed from blacklist: {identifier}");
        }
        BlacklistCommand::List => {
            for entry in &registry.blacklist {
                println!("{}", format_entry_line(entry));
            }
        }
        BlacklistCommand::Show { url, uuid } => {
            let entry = find_blacklist(&registry, url.as_deref(), uuid.as_deref())?;
            print!("{}", format_entry_details(entry));
        }
    }

    Ok(())
}

/// `UUID:x, URL:y, REGEX:z: reason`.
pub fn format_entry_line(entry: &BlacklistEntry) -> String {
    let mut identifiers = Vec::new();
    if let Some(uuid) = &entry.uuid {
        identifiers.push(format!("UUID:{uuid}"));
    }
    if let Some(url) = &entry.url {
        identifiers.push(format!("URL:{url}"));
    }
    if let Some(pattern) = &entry.url_regex {
        identifiers.push(format!("REGEX:{pattern}"));
    }
    format!("{}: {}", identifiers.join(", "), entry.reason)
}

pub fn format_entry_details(entry: &BlacklistEntry) -> String {
    let mut lines = Vec::new();
    if let Some(uuid) = &entry.uuid {
        lines.push(format!("UUID: {uuid}"));
    }
    if let Some(url) = &entry.url {
        lines.push(format!("URL: {url}"));
    }
    if let Some(pattern) = &entry.url_regex {
        lines.push(format!("URL Regex: {pattern}"));
    }
    lines.push(format!("Reason: {}", entry.reason));
    lines.push(format!("Blacklisted at: {}", entry.blacklisted_at.to_rfc3339()));
    lines.join("\n") + "\n"
}
