// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;
use tempfile::tempdir;
use zkl_core::config::ADDRESS_ENV;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_without_any_file() {
    let config = resolve_config(None, None, no_env, None).unwrap();
    assert_eq!(config, ZkConfig::default());
}

#[test]
fn missing_fallback_file_is_ignored() {
    let dir = tempdir().unwrap();
    let fallback = dir.path().join("absent.toml");

    let config = resolve_config(None, Some(fallback), no_env, None).unwrap();
    assert_eq!(config, ZkConfig::default());
}

#[test]
fn fallback_file_is_read_when_present() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[zookeeper]\naddress = \"zk-a:2181\"\n").unwrap();

    let config = resolve_config(None, Some(path), no_env, None).unwrap();
    assert_eq!(config.address, "zk-a:2181");
}

#[test]
fn explicit_file_must_exist() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.toml");

    let err = resolve_config(Some(&path), None, no_env, None).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn flag_beats_environment_beats_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[zookeeper]\naddress = \"from-file:2181\"\n").unwrap();
    let env = |name: &str| (name == ADDRESS_ENV).then(|| "from-env:2181".to_string());

    let config = resolve_config(Some(&path), None, env, None).unwrap();
    assert_eq!(config.address, "from-env:2181");

    let config =
        resolve_config(Some(&path), None, env, Some("from-flag:2181".to_string())).unwrap();
    assert_eq!(config.address, "from-flag:2181");
}

#[test]
fn blank_address_flag_is_rejected() {
    let err = resolve_config(None, None, no_env, Some("  ".to_string())).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}
