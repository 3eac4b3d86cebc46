// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn namespace_prefixes_and_strips_paths() {
    let ns = Namespace::new(Some("/locks".to_string()));
    assert_eq!(ns.absolute("/getReceiveQuantity/1"), "/locks/getReceiveQuantity/1");
    assert_eq!(ns.absolute("/"), "/locks");
    assert_eq!(
        ns.relative("/locks/getReceiveQuantity/1/lock-0000000001"),
        "/getReceiveQuantity/1/lock-0000000001"
    );
}

#[test]
fn namespace_relative_requires_segment_boundary() {
    let ns = Namespace::new(Some("/locks".to_string()));
    assert_eq!(ns.relative("/locksmith/a"), "/locksmith/a");
}

#[test]
fn empty_namespace_is_identity() {
    let ns = Namespace::new(None);
    assert_eq!(ns.absolute("/a/b"), "/a/b");
    assert_eq!(ns.relative("/a/b"), "/a/b");
}

#[test]
fn transport_faults_map_to_unavailable() {
    for err in [
        ZkError::ConnectionLoss,
        ZkError::SessionExpired,
        ZkError::OperationTimeout,
    ] {
        assert!(map_zk_error("/a", err).is_unavailable());
    }
}

#[test]
fn node_errors_keep_their_kind() {
    assert_eq!(
        map_zk_error("/a", ZkError::NoNode),
        CoordinationError::NoNode("/a".to_string())
    );
    assert_eq!(
        map_zk_error("/a", ZkError::NodeExists),
        CoordinationError::NodeExists("/a".to_string())
    );
    assert!(matches!(
        map_zk_error("/a", ZkError::NotEmpty),
        CoordinationError::NodeState { path, .. } if path == "/a"
    ));
}

#[test]
fn watch_event_kinds() {
    assert_eq!(
        event_kind(WatchedEventType::NodeDeleted),
        WatchEventKind::Deleted
    );
    assert_eq!(
        event_kind(WatchedEventType::NodeDataChanged),
        WatchEventKind::DataChanged
    );
    assert_eq!(event_kind(WatchedEventType::None), WatchEventKind::Other);
}
