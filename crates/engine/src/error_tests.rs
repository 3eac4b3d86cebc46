// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    unavailable = { CoordinationError::Unavailable("connection loss".into()), true },
    no_node = { CoordinationError::NoNode("/a".into()), false },
    node_exists = { CoordinationError::NodeExists("/a".into()), false },
    watch_closed = { CoordinationError::WatchClosed("/a".into()), false },
)]
fn coordination_errors_classify(err: CoordinationError, unavailable: bool) {
    assert_eq!(LockError::from(err.clone()).is_unavailable(), unavailable);
    assert_eq!(
        LockError::during_acquire("/a/lock-1", err).is_unavailable(),
        unavailable
    );
}

#[test]
fn loop_failures_keep_their_node() {
    let err = LockError::during_acquire("/a/lock-1", CoordinationError::NoNode("/a".into()));
    assert!(matches!(err, LockError::AcquireError { ref node, .. } if node == "/a/lock-1"));
}

#[test]
fn malformed_path_errors_are_lifted() {
    let err = LockError::from(PathError::MalformedQueueEntry("stray".into()));
    assert!(matches!(err, LockError::MalformedQueueEntry { ref name } if name == "stray"));

    let err = LockError::from(PathError::EmptySegment);
    assert!(matches!(err, LockError::InvalidPath(PathError::EmptySegment)));
}

#[test]
fn timeout_is_distinguishable() {
    let err = LockError::AcquireTimeout {
        key: "/getReceiveQuantity/1/2/lock-".into(),
        waited: Duration::from_millis(200),
    };
    assert!(err.is_timeout());
    assert!(!err.is_unavailable());
    assert_eq!(
        err.to_string(),
        "timed out after 200ms waiting for lock /getReceiveQuantity/1/2/lock-"
    );
}
