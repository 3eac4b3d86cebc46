// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use zkl_adapters::FakeCoordinationAdapter;
use zkl_core::LockType;

fn key() -> LockKey {
    LockKey::release_coupon_stock("A100").unwrap()
}

#[tokio::test]
async fn start_bootstraps_roots() {
    let fake = FakeCoordinationAdapter::new();
    ZkLockFacade::start(fake.clone()).await.unwrap();

    for lock_type in LockType::ALL {
        assert!(fake.node_exists(lock_type.root()));
    }
}

#[tokio::test]
async fn start_fails_when_service_is_down() {
    let fake = FakeCoordinationAdapter::new();
    fake.set_unavailable(true);

    assert!(ZkLockFacade::start(fake).await.is_err());
}

#[tokio::test]
async fn acquire_and_release_through_trait_object() {
    let fake = FakeCoordinationAdapter::new();
    let facade: Box<dyn LockFacade> = Box::new(ZkLockFacade::start(fake).await.unwrap());

    let token = facade.acquire(&key()).await.unwrap();
    assert!(facade.has_key(&key()).await.unwrap());
    assert!(facade.release(token).await.unwrap());
    assert!(!facade.has_key(&key()).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn acquire_timeout_reports_timeout() {
    let fake = FakeCoordinationAdapter::new();
    let facade = ZkLockFacade::start(fake.clone()).await.unwrap();
    let _held = facade.acquire(&key()).await.unwrap();

    let err = facade
        .acquire_timeout(&key(), Duration::from_millis(200))
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(fake.children("/releaseCouponStuckNum/A100").len(), 1);
}
