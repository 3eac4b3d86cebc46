// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn error_display() {
    let err = CliError::new("Something went wrong")
        .with_context("First context")
        .with_context("Second context")
        .with_suggestion("Try this")
        .with_suggestion("Or this");

    let output = format!("{}", err);
    assert!(output.contains("error: Something went wrong"));
    assert!(output.contains("-> First context"));
    assert!(output.contains("-> Second context"));
    assert!(output.contains("1. Try this"));
    assert!(output.contains("2. Or this"));
}

#[test]
fn timeout_is_reported_with_wait() {
    let err = CliError::lock(
        "zk:2181",
        LockError::AcquireTimeout {
            key: "/getReceiveQuantity/1/2/lock-".to_string(),
            waited: Duration::from_millis(1500),
        },
    );
    let output = err.to_string();
    assert!(output.contains("Timed out waiting for lock '/getReceiveQuantity/1/2/lock-'"));
    assert!(output.contains("1s 500ms"));
}

#[test]
fn unavailable_names_address_and_env() {
    let err = CliError::lock(
        "zk:2181",
        LockError::CoordinationUnavailable(CoordinationError::Unavailable(
            "connection loss".to_string(),
        )),
    );
    let output = err.to_string();
    assert!(output.contains("Cannot reach ZooKeeper at 'zk:2181'"));
    assert!(output.contains(ADDRESS_ENV));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn unavailable_bootstrap_is_reported_as_unreachable() {
    let err = CliError::bootstrap(
        "zk:2181",
        BootstrapError::Root {
            lock_type: zkl_core::LockType::ReceiveQuantity,
            root: "/getReceiveQuantity".to_string(),
            source: CoordinationError::Unavailable("session expired".to_string()),
        },
    );
    assert!(err.message.starts_with("Cannot reach ZooKeeper"));
}

#[test]
fn report_falls_back_for_plain_errors() {
    let err = anyhow::anyhow!("boom");
    assert_eq!(report(&err), "error: boom\n");

    let err = anyhow::Error::new(CliError::new("typed"));
    assert_eq!(report(&err), "error: typed\n");
}
