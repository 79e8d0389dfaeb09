// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::fs;

use serial_test::serial;
use zf_config::{Scope, load_all, paths::Paths};

fn paths_in(dir: &std::path::Path) -> Paths {
    Paths {
        system: dir.join("system.toml"),
        user: dir.join("user.toml"),
        project: Some(dir.join("project").join(".zipfill").join("config.toml")),
    }
}

#[test]
#[serial]
fn files_env_and_flags_merge_in_precedence_order() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths_in(dir.path());
    fs::write(&paths.system, "max-results = 5\ndefault-county = \"System\"\n").unwrap();
    fs::write(&paths.user, "max-results = 6\n[lookup]\nbase-url = \"http://user.local\"\n")
        .unwrap();
    let project = paths.project.clone().unwrap();
    fs::create_dir_all(project.parent().unwrap()).unwrap();
    fs::write(&project, "debounce-ms = 200\n").unwrap();

    std::env::set_var("ZF_DEBOUNCE_MS", "250");
    let resolved = load_all(&paths, None, &[("max-results", "9")]);
    std::env::remove_var("ZF_DEBOUNCE_MS");
    let resolved = resolved.unwrap();

    assert_eq!(resolved.settings.max_results, 9);
    assert_eq!(resolved.settings.debounce_ms, 250);
    assert_eq!(resolved.settings.default_county, "System");
    assert_eq!(resolved.settings.lookup.base_url, "http://user.local");
    assert_eq!(resolved.provenance.winner["max-results"], Scope::Flags);
    assert_eq!(resolved.provenance.winner["debounce-ms"], Scope::Env);
    assert_eq!(resolved.provenance.winner["default-county"], Scope::System);
}

#[test]
#[serial]
fn broken_user_file_is_skipped_but_broken_cli_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths_in(dir.path());
    fs::write(&paths.user, "not-a-setting = true\n").unwrap();

    let resolved = load_all(&paths, None, &[]).unwrap();
    assert_eq!(resolved.settings.max_results, 8);

    let cli = dir.path().join("cli.toml");
    fs::write(&cli, "max-results = \"many\"\n").unwrap();
    assert!(load_all(&paths, Some(&cli), &[]).is_err());
}

#[test]
#[serial]
fn fallback_entries_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths_in(dir.path());
    let cli = dir.path().join("cli.toml");
    fs::write(
        &cli,
        r#"
        [fallback]
        limit = 3

        [[fallback.entries]]
        zip-code = "02108"
        city = "Boston"
        state = "MA"
        county = "Suffolk"
        "#,
    )
    .unwrap();

    let resolved = load_all(&paths, Some(&cli), &[]).unwrap();
    let entries = resolved.settings.fallback.entries.unwrap();
    assert_eq!(resolved.settings.fallback.limit, 3);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].city, "Boston");
}
