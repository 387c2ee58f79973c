// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end registry behavior: operations followed by persistence.

use picreg_core::{RegistryError, TrustLevel};
use picreg_registry::{
    AddPlugin, NewBlacklistEntry, Ref, RegistryStore, TomlRegistryStore, add_blacklist,
    add_plugin, add_redirect, add_ref, update_plugin,
};
use picreg_test_utils::{ManifestBuilder, MockFetcher, TempRegistry};

const URL: &str = "https://github.com/user/picard-plugin-example";

#[tokio::test]
async fn save_and_load_round_trip_sorted_by_id() {
    let temp = TempRegistry::new().unwrap();
    let store = TomlRegistryStore::new(temp.path());
    let fetcher = MockFetcher::new();
    let mut registry = store.load().unwrap();

    for (url, name) in [
        ("https://github.com/user/zeta", "Zeta"),
        ("https://github.com/user/alpha", "Alpha"),
        ("https://github.com/user/mid", "Mid"),
    ] {
        fetcher
            .set_manifest(url, ManifestBuilder::random().name(name).build())
            .await;
        add_plugin(&mut registry, &fetcher, AddPlugin::new(url)).await.unwrap();
    }
    add_ref(&mut registry, "mid", Ref::named("dev")).unwrap();
    add_redirect(&mut registry, "alpha", "https://github.com/old/alpha").unwrap();
    store.save(&mut registry).unwrap();

    let loaded = store.load().unwrap();
    let ids: Vec<_> = loaded.plugins.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["alpha", "mid", "zeta"]);
    assert_eq!(loaded, registry);

    let text = temp.read().unwrap();
    assert!(text.starts_with("api_version = \"3.0\""));
    assert!(!text.contains("blacklist"));
}

#[tokio::test]
async fn optional_fields_survive_round_trip() {
    let temp = TempRegistry::new().unwrap();
    let store = TomlRegistryStore::new(temp.path());
    let manifest = ManifestBuilder::new()
        .maintainers(&["Bob"])
        .name_i18n(&[("de", "Beispiel"), ("fr", "Exemple")])
        .description_i18n(&[("de", "Ein Beispiel")])
        .build();
    let fetcher = MockFetcher::with_manifest(URL, manifest);

    let mut registry = store.load().unwrap();
    let request = AddPlugin::new(URL)
        .trust_level("official")
        .refs("main:4.0,picard-v3:3.0-3.99")
        .versioning_scheme(r"regex:^v\d+$");
    add_plugin(&mut registry, &fetcher, request).await.unwrap();
    store.save(&mut registry).unwrap();

    let loaded = store.load().unwrap();
    let plugin = loaded.find_by_id("example").unwrap();
    assert_eq!(plugin.trust_level, TrustLevel::Official);
    assert_eq!(plugin.name_i18n.as_ref().unwrap().len(), 2);
    assert_eq!(plugin.refs[1].max_api_version.as_deref(), Some("3.99"));
    assert_eq!(
        plugin.versioning_scheme.as_ref().unwrap().to_string(),
        r"regex:^v\d+$"
    );
}

#[tokio::test]
async fn duplicate_add_leaves_registry_unchanged() {
    let fetcher = MockFetcher::with_manifest(URL, ManifestBuilder::new().build());
    let mut registry = picreg_registry::Registry::default();
    add_plugin(&mut registry, &fetcher, AddPlugin::new(URL)).await.unwrap();
    let snapshot = registry.clone();

    let err = add_plugin(&mut registry, &fetcher, AddPlugin::new(URL))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateEntry { .. }));
    assert_eq!(registry, snapshot);

    // Same uuid under a different URL.
    let moved = "https://github.com/other/picard-plugin-example";
    fetcher.set_manifest(moved, ManifestBuilder::new().build()).await;
    let err = add_plugin(&mut registry, &fetcher, AddPlugin::new(moved))
        .await
        .unwrap_err();
    assert!(
        matches!(err, RegistryError::DuplicateEntry { field, .. } if field.contains("uuid"))
    );
    assert_eq!(registry, snapshot);
}

#[tokio::test]
async fn update_preserves_identity_and_bumps_timestamp() {
    let fetcher = MockFetcher::with_manifest(URL, ManifestBuilder::new().build());
    let mut registry = picreg_registry::Registry::default();
    add_plugin(&mut registry, &fetcher, AddPlugin::new(URL).refs("stable"))
        .await
        .unwrap();
    let old = chrono::DateTime::parse_from_rfc3339("2020-01-01T00:00:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);
    registry.plugins[0].updated_at = old;
    let before = registry.plugins[0].clone();

    fetcher
        .set_manifest(URL, ManifestBuilder::new().description("New text").build())
        .await;
    let updated = update_plugin(&mut registry, &fetcher, "example", None)
        .await
        .unwrap();

    assert_eq!(updated.id, before.id);
    assert_eq!(updated.uuid, before.uuid);
    assert_eq!(updated.git_url, before.git_url);
    assert_eq!(updated.added_at, before.added_at);
    assert_eq!(updated.description, "New text");
    assert!(updated.updated_at > old);
    assert_eq!(fetcher.calls().await.last().unwrap().1, "stable");
}

#[tokio::test]
async fn blacklisted_url_pattern_blocks_admission() {
    let fetcher = MockFetcher::with_manifest(URL, ManifestBuilder::new().build());
    let mut registry = picreg_registry::Registry::default();
    add_blacklist(
        &mut registry,
        NewBlacklistEntry {
            url_regex: Some(r"^https://github\.com/user/".to_string()),
            reason: "Compromised account".to_string(),
            ..NewBlacklistEntry::default()
        },
    )
    .unwrap();

    let err = add_plugin(&mut registry, &fetcher, AddPlugin::new(URL))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("{URL} is blacklisted: Compromised account")
    );
    assert!(registry.plugins.is_empty());
}

#[test]
fn hand_written_registry_loads() {
    let temp = TempRegistry::with_content(
        r#"
api_version = "3.0"

[[plugins]]
id = "example"
uuid = "12345678-1234-4234-8234-123456789abc"
name = "Example"
description = "Example plugin"
git_url = "https://github.com/user/picard-plugin-example"
categories = ["metadata"]
trust_level = "trusted"
authors = ["Alice"]
added_at = "2026-01-01T00:00:00+00:00"
updated_at = "2026-01-02T00:00:00+00:00"

[[plugins.refs]]
name = "main"
min_api_version = "3.0"

[[blacklist]]
url = "https://github.com/bad/plugin"
reason = "Malicious"
blacklisted_at = "2026-01-03T00:00:00+00:00"
"#,
    )
    .unwrap();

    let registry = TomlRegistryStore::new(temp.path()).load().unwrap();
    let plugin = registry.find_by_id("example").unwrap();
    assert_eq!(plugin.trust_level, TrustLevel::Trusted);
    assert_eq!(plugin.refs.len(), 1);
    assert_eq!(registry.blacklist[0].reason, "Malicious");
}
