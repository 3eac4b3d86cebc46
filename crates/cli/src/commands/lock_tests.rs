// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;
use zkl_adapters::FakeCoordinationAdapter;
use zkl_engine::DistributedMutex;

fn key_args(lock_type: LockType, keys: &[&str]) -> KeyArgs {
    KeyArgs {
        lock_type,
        keys: keys.iter().map(|k| k.to_string()).collect(),
    }
}

#[parameterized(
    two_keys = { LockType::ReceiveQuantity, &["123", "456"], "/getReceiveQuantity/123/456/lock-" },
    one_key = { LockType::ReleaseCouponStock, &["789"], "/releaseCouponStuckNum/789/lock-" },
)]
fn key_args_build_queue_prefix(lock_type: LockType, keys: &[&str], expected: &str) {
    let key = key_args(lock_type, keys).lock_key().unwrap();
    assert_eq!(key.as_str(), expected);
}

#[parameterized(
    separator = { &["12/3"] },
    empty = { &[""] },
    reserved = { &["lock-1"] },
)]
fn key_args_reject_bad_segments(keys: &[&str]) {
    let err = key_args(LockType::ReceiveQuantity, keys)
        .lock_key()
        .unwrap_err();
    assert_eq!(err.message, "Invalid lock key");
}

#[test]
fn participant_rows_mark_holder() {
    let holder = Participant {
        rank: 0,
        token: "/getReceiveQuantity/1/2/lock-0000000003".to_string(),
    };
    let waiting = Participant {
        rank: 1,
        token: "/getReceiveQuantity/1/2/lock-0000000004".to_string(),
    };
    assert!(holder.to_string().contains("holder"));
    assert!(waiting.to_string().contains("waiting"));
}

#[test]
fn token_info_carries_sequence() {
    let token = LockToken::from_path("/getReceiveQuantity/1/2/lock-0000000042").unwrap();
    let info = TokenInfo::new(&token);
    assert_eq!(info.sequence, 42);
    assert_eq!(info.to_string(), "/getReceiveQuantity/1/2/lock-0000000042");
}

#[tokio::test]
async fn work_finishes_without_interrupt() {
    let (_tx, mut interrupts) = tokio::sync::mpsc::unbounded_channel::<()>();
    assert_eq!(until_interrupted(async { 7 }, &mut interrupts).await, Some(7));
}

#[tokio::test]
async fn interrupt_abandons_queued_acquire() {
    let fake = FakeCoordinationAdapter::new();
    let mutex = DistributedMutex::new(fake.clone());
    let key = LockKey::receive_quantity("1", "2").unwrap();
    let holder = mutex.acquire(&key, None).await.unwrap();

    let (tx, mut interrupts) = tokio::sync::mpsc::unbounded_channel();
    let watcher = fake.clone();
    let holder_path = holder.to_string();
    tokio::spawn(async move {
        // Interrupt once the second contender is queued behind the holder
        while watcher.watch_count(&holder_path) == 0 {
            tokio::task::yield_now().await;
        }
        tx.send(()).unwrap();
    });

    let outcome = until_interrupted(mutex.acquire(&key, None), &mut interrupts).await;
    assert!(outcome.is_none());

    for _ in 0..1000 {
        if fake.children(key.base_path()).len() == 1 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(fake.children(key.base_path()), vec!["lock-0000000000"]);
}

#[test]
fn interrupted_error_explains_cleanup() {
    let err = CliError::interrupted("/getReceiveQuantity/1/2/lock-");
    let output = err.to_string();
    assert!(output.contains("Interrupted while waiting for lock '/getReceiveQuantity/1/2/lock-'"));
    assert!(output.contains("queue entry was removed"));
}
