// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `picreg validate`, `stats` and `output`.

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::ValueEnum;
use picreg_core::RegistryError;
use picreg_registry::{
    RegistryStats, RegistryStore, TomlRegistryStore, check_registry, registry_stats,
    to_toml_string,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Toml,
    Json,
}

/// Reports every consistency problem on stderr. Exit code 1 if any.
pub fn validate(store: &TomlRegistryStore) -> Result<ExitCode, RegistryError> {
    let registry = store.load()?;
    let errors = check_registry(&registry);
    let use_color = std::io::stdout().is_terminal();

    if errors.is_empty() {
        let mark = if use_color {
            use colored::Colorize;
            "✓".green().to_string()
        } else {
            "✓".to_string()
        };
        println!(
            "{mark} Registry valid: {} plugins, {} blacklist entries",
            registry.plugins.len(),
            registry.blacklist.len()
        );
        return Ok(ExitCode::SUCCESS);
    }

    for error in &errors {
        eprintln!("Error: {error}");
    }
    Ok(ExitCode::FAILURE)
}

pub fn stats(store: &TomlRegistryStore) -> Result<(), RegistryError> {
    let registry = store.load()?;
    print!("{}", format_stats(&registry_stats(&registry)));
    Ok(())
}

pub fn format_stats(stats: &RegistryStats) -> String {
    let mut lines = vec![
        format!("Total plugins: {}", stats.total_plugins),
        format!("Blacklist entries: {}", stats.blacklist_entries),
        String::new(),
        "By trust level:".to_string(),
    ];
    lines.extend(stats.by_trust.iter().map(|(k, v)| format!("  {k}: {v}")));
    lines.push(String::new());
    lines.push("By category:".to_string());
    lines.extend(stats.by_category.iter().map(|(k, v)| format!("  {k}: {v}")));
    lines.join("\n") + "\n"
}

/// Prints the registry document as loaded.
pub fn output(store: &TomlRegistryStore, format: OutputFormat) -> Result<(), RegistryError> {
    let registry = store.load()?;
    let rendered = match format {
        OutputFormat::Toml => to_toml_string(&registry)?,
        OutputFormat::Json => serde_json::to_string_pretty(&registry).map_err(|e| {
            RegistryError::Storage {
                message: format!("failed to serialize registry as JSON: {e}"),
                source: Some(Box::new(e)),
            }
        })?,
    };
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn stats_report_lists_sorted_sections() {
        let stats = RegistryStats {
            total_plugins: 3,
            blacklist_entries: 1,
            by_trust: BTreeMap::from([("community".to_string(), 2), ("official".to_string(), 1)]),
            by_category: BTreeMap::from([("metadata".to_string(), 3)]),
        };
        assert_eq!(
            format_stats(&stats),
            "Total plugins: 3\nBlacklist entries: 1\n\nBy trust level:\n  community: 2\n  official: 1\n\nBy category:\n  metadata: 3\n"
        );
    }

    #[test]
    fn validate_missing_registry_succeeds() {
        let dir = picreg_test_utils::TempRegistry::new().unwrap();
        let store = TomlRegistryStore::new(dir.path());
        assert!(validate(&store).is_ok());
    }
}
