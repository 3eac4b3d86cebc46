// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use zkl_adapters::{CoordinationCall, FakeCoordinationAdapter};

#[tokio::test]
async fn creates_missing_roots() {
    let fake = FakeCoordinationAdapter::new();
    let bootstrapper = RootBootstrapper::new(fake.clone());

    for (lock_type, root) in [
        (LockType::ReceiveQuantity, "/getReceiveQuantity"),
        (LockType::ReleaseCouponStock, "/releaseCouponStuckNum"),
    ] {
        assert!(!fake.node_exists(root));
        assert!(bootstrapper.ensure_root(lock_type).await.unwrap());
        assert!(fake.node_exists(root));
    }
}

#[tokio::test]
async fn existing_root_is_left_alone() {
    let fake = FakeCoordinationAdapter::new();
    fake.create_persistent("/getReceiveQuantity").await.unwrap();
    let bootstrapper = RootBootstrapper::new(fake.clone());

    assert!(!bootstrapper
        .ensure_root(LockType::ReceiveQuantity)
        .await
        .unwrap());

    let creates = fake
        .calls()
        .into_iter()
        .filter(|c| matches!(c, CoordinationCall::CreatePersistent { .. }))
        .count();
    // Only the setup call above
    assert_eq!(creates, 1);
}

#[tokio::test]
async fn ensure_all_is_idempotent() {
    let fake = FakeCoordinationAdapter::new();
    let bootstrapper = RootBootstrapper::new(fake.clone());

    bootstrapper.ensure_all().await.unwrap();
    bootstrapper.ensure_all().await.unwrap();

    for lock_type in LockType::ALL {
        assert!(fake.node_exists(lock_type.root()));
    }
}

#[tokio::test]
async fn unavailable_service_is_fatal() {
    let fake = FakeCoordinationAdapter::new();
    fake.set_unavailable(true);
    let bootstrapper = RootBootstrapper::new(fake);

    let err = bootstrapper.ensure_all().await.unwrap_err();
    match err {
        BootstrapError::Root {
            lock_type,
            root,
            source,
        } => {
            assert_eq!(lock_type, LockType::ReceiveQuantity);
            assert_eq!(root, "/getReceiveQuantity");
            assert!(source.is_unavailable());
        }
    }
}
