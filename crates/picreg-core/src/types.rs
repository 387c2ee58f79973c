// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the validator, the registry model, and the CLI.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::RegistryError;

/// How much vetting a plugin has received.
///
/// Declaration order is lowest to highest, so the derived `Ord` ranks
/// `Official > Trusted > Community`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    Community,
    Trusted,
    Official,
}

impl TrustLevel {
    /// All levels, highest first.
    pub const RANKED: [TrustLevel; 3] = [
        TrustLevel::Official,
        TrustLevel::Trusted,
        TrustLevel::Community,
    ];

    /// Parses a user-supplied level, failing with `InvalidTrustLevel`.
    pub fn parse(value: &str) -> Result<Self, RegistryError> {
        TrustLevel::from_str(value).map_err(|_| RegistryError::InvalidTrustLevel(value.to_string()))
    }

    /// The lowest level, used when the operator does not pick one.
    pub fn lowest() -> Self {
        TrustLevel::Community
    }
}

/// The fixed category enumeration a manifest may declare.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Metadata,
    Coverart,
    Ui,
    Scripting,
    Formats,
    Tagging,
    Fingerprinting,
    Lyrics,
    /// Catch-all for plugins that fit nowhere else.
    Other,
}

impl Category {
    /// Returns true if `value` names a member of the enumeration (exact, lowercase).
    pub fn is_valid(value: &str) -> bool {
        Category::from_str(value).is_ok()
    }
}

/// Version tagging scheme declared for a plugin's releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VersioningScheme {
    Semver,
    Calver,
    /// Custom tag pattern, stored as `regex:<pattern>`.
    Regex(String),
}

impl FromStr for VersioningScheme {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "semver" => Ok(VersioningScheme::Semver),
            "calver" => Ok(VersioningScheme::Calver),
            other => {
                let Some(pattern) = other.strip_prefix("regex:") else {
                    return Err(RegistryError::InvalidArgument(format!(
                        "versioning scheme must be 'semver', 'calver', or 'regex:<pattern>', got '{other}'"
                    )));
                };
                if pattern.is_empty() {
                    return Err(RegistryError::InvalidArgument(
                        "versioning scheme regex must not be empty".to_string(),
                    ));
                }
                Regex::new(pattern).map_err(|e| {
                    RegistryError::InvalidArgument(format!(
                        "versioning scheme regex '{pattern}' does not compile: {e}"
                    ))
                })?;
                Ok(VersioningScheme::Regex(pattern.to_string()))
            }
        }
    }
}

impl TryFrom<String> for VersioningScheme {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VersioningScheme> for String {
    fn from(value: VersioningScheme) -> Self {
        value.to_string()
    }
}

impl fmt::Display for VersioningScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersioningScheme::Semver => write!(f, "semver"),
            VersioningScheme::Calver => write!(f, "calver"),
            VersioningScheme::Regex(pattern) => write!(f, "regex:{pattern}"),
        }
    }
}

/// A plugin manifest as fetched from its repository.
///
/// The document is untrusted, so it is kept as a raw TOML table and read
/// through lenient accessors: a key holding the wrong type reads as absent
/// instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(toml::Table);

impl Manifest {
    /// Wraps an already parsed table.
    pub fn new(table: toml::Table) -> Self {
        Self(table)
    }

    /// Parses manifest TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content).map(Self)
    }

    /// Returns true if the key is present with any value.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Raw access to a value.
    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.0.get(key)
    }

    /// A string value, or `None` when absent or not a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(toml::Value::as_str)
    }

    /// A sequence of strings. Non-string elements are skipped.
    pub fn string_list(&self, key: &str) -> Option<Vec<String>> {
        let array = self.0.get(key)?.as_array()?;
        Some(
            array
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        )
    }

    /// A table of strings (e.g. locale to translation). Non-string values are skipped.
    pub fn string_map(&self, key: &str) -> Option<BTreeMap<String, String>> {
        let table = self.0.get(key)?.as_table()?;
        Some(
            table
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect(),
        )
    }

    /// Sets a value, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<toml::Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Removes a key.
    pub fn remove(&mut self, key: &str) -> Option<toml::Value> {
        self.0.remove(key)
    }

    /// The underlying table.
    pub fn as_table(&self) -> &toml::Table {
        &self.0
    }
}

impl From<toml::Table> for Manifest {
    fn from(table: toml::Table) -> Self {
        Self(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trust_levels_rank_official_highest() {
        assert!(TrustLevel::Official > TrustLevel::Trusted);
        assert!(TrustLevel::Trusted > TrustLevel::Community);
        assert_eq!(TrustLevel::RANKED[0], TrustLevel::Official);
        assert_eq!(TrustLevel::lowest(), TrustLevel::Community);
    }

    #[test]
    fn trust_level_parse_rejects_unknown() {
        assert_eq!(TrustLevel::parse("trusted").unwrap(), TrustLevel::Trusted);
        let err = TrustLevel::parse("invalid").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidTrustLevel(ref v) if v == "invalid"));
        assert!(err.to_string().contains("Invalid trust level"));
    }

    #[test]
    fn trust_level_serializes_lowercase() {
        let json = serde_json::to_string(&TrustLevel::Official).unwrap();
        assert_eq!(json, "\"official\"");
        assert_eq!(TrustLevel::Community.to_string(), "community");
    }

    #[test]
    fn category_membership() {
        assert!(Category::is_valid("metadata"));
        assert!(Category::is_valid("other"));
        assert!(!Category::is_valid("invalid_category"));
        assert!(!Category::is_valid("Metadata"));
    }

    #[test]
    fn versioning_scheme_parses_all_forms() {
        assert_eq!("semver".parse::<VersioningScheme>().unwrap(), VersioningScheme::Semver);
        assert_eq!("calver".parse::<VersioningScheme>().unwrap(), VersioningScheme::Calver);
        let scheme: VersioningScheme = r"regex:^version\d+\.\d+\.\d+$".parse().unwrap();
        assert_eq!(scheme.to_string(), r"regex:^version\d+\.\d+\.\d+$");
    }

    #[test]
    fn versioning_scheme_rejects_bad_input() {
        assert!("date".parse::<VersioningScheme>().is_err());
        assert!("regex:".parse::<VersioningScheme>().is_err());
        assert!("regex:([".parse::<VersioningScheme>().is_err());
    }

    #[test]
    fn manifest_accessors_are_lenient() {
        let manifest = Manifest::from_toml_str(
            r#"
name = "Test"
version = 3
authors = ["Alice", 7, "Bob"]
name_i18n = { de = "Test DE", fr = 1 }
"#,
        )
        .unwrap();
        assert_eq!(manifest.str_field("name"), Some("Test"));
        assert_eq!(manifest.str_field("version"), None);
        assert!(manifest.contains("version"));
        assert_eq!(
            manifest.string_list("authors"),
            Some(vec!["Alice".to_string(), "Bob".to_string()])
        );
        let i18n = manifest.string_map("name_i18n").unwrap();
        assert_eq!(i18n.len(), 1);
        assert_eq!(i18n["de"], "Test DE");
        assert!(manifest.string_list("name").is_none());
    }
}
