// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blacklist management.

use chrono::Utc;
use picreg_core::RegistryError;
use regex::Regex;
use tracing::info;

use crate::model::{BlacklistEntry, Registry};

/// Parameters for [`add_blacklist`]. Empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct NewBlacklistEntry {
    pub url: Option<String>,
    pub uuid: Option<String>,
    pub url_regex: Option<String>,
    pub reason: String,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Adds a blacklist rule and returns it.
pub fn add_blacklist(
    registry: &mut Registry,
    request: NewBlacklistEntry,
) -> Result<BlacklistEntry, RegistryError> {
    if request.reason.trim().is_empty() {
        return Err(RegistryError::InvalidArgument(
            "Reason is required for blacklisting".to_string(),
        ));
    }
    let url = present(request.url);
    let uuid = present(request.uuid);
    let url_regex = present(request.url_regex);
    if url.is_none() && uuid.is_none() && url_regex.is_none() {
        return Err(RegistryError::InvalidArgument(
            "At least one of url, uuid, or url_regex must be provided".to_string(),
        ));
    }
    if let Some(pattern) = &url_regex {
        Regex::new(pattern).map_err(|e| {
            RegistryError::InvalidArgument(format!("url_regex '{pattern}' does not compile: {e}"))
        })?;
    }

    let entry = BlacklistEntry {
        url,
        uuid,
        url_regex,
        reason: request.reason,
        blacklisted_at: Utc::now(),
    };
    info!(reason = %entry.reason, "adding blacklist entry");
    registry.append_blacklist(entry.clone());
    Ok(entry)
}

fn require_identifier(url: Option<&str>, uuid: Option<&str>) -> Result<(), RegistryError> {
    if url.is_none() && uuid.is_none() {
        return Err(RegistryError::InvalidArgument(
            "At least one of url or uuid must be provided".to_string(),
        ));
    }
    Ok(())
}

/// Removes every entry matching `url` OR `uuid`. Returns how many were removed.
pub fn remove_blacklist(
    registry: &mut Registry,
    url: Option<&str>,
    uuid: Option<&str>,
) -> Result<usize, RegistryError> {
    let url = url.filter(|u| !u.is_empty());
    let uuid = uuid.filter(|u| !u.is_empty());
    require_identifier(url, uuid)?;

    let removed = registry.remove_blacklist(url, uuid);
    info!(removed, "removed blacklist entries");
    Ok(removed)
}

/// First entry matching `url` OR `uuid`.
pub fn find_blacklist<'a>(
    registry: &'a Registry,
    url: Option<&str>,
    uuid: Option<&str>,
) -> Result<&'a BlacklistEntry, RegistryError> {
    let url = url.filter(|u| !u.is_empty());
    let uuid = uuid.filter(|u| !u.is_empty());
    require_identifier(url, uuid)?;

    registry
        .find_blacklist(url, uuid)
        .ok_or_else(|| RegistryError::NotFound {
            kind: "Blacklist entry",
            name: uuid.or(url).unwrap_or_default().to_string(),
        })
}
