// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake coordination adapter for testing
//!
//! An in-memory node tree shared by every clone, standing in for one client
//! session. Sequence numbers are assigned per parent, watches fire on delete,
//! and faults can be injected.
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{
    CoordinationAdapter, CoordinationError, Watch, WatchEvent, WatchEventKind, WatchTrigger,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

/// Recorded coordination call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinationCall {
    CreateEphemeralSequential { path: String },
    CreatePersistent { path: String },
    Delete { path: String },
    Exists { path: String },
    ListChildren { path: String },
    WatchOnce { path: String },
}

#[derive(Debug, Clone, Copy)]
struct FakeNode {
    ephemeral: bool,
}

struct FakeState {
    nodes: BTreeMap<String, FakeNode>,
    next_sequence: HashMap<String, u64>,
    watches: HashMap<String, Vec<WatchTrigger>>,
    sequence_width: usize,
    unavailable: bool,
    vanish_next_create: bool,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_sequence: HashMap::new(),
            watches: HashMap::new(),
            sequence_width: 10,
            unavailable: false,
            vanish_next_create: false,
        }
    }
}

impl FakeState {
    fn contains(&self, path: &str) -> bool {
        path == "/" || self.nodes.contains_key(path)
    }

    fn children(&self, path: &str) -> Vec<String> {
        let prefix = if path == "/" {
            "/".to_string()
        } else {
            format!("{}/", path)
        };
        self.nodes
            .range(prefix.clone()..)
            .take_while(|(p, _)| p.starts_with(&prefix))
            .filter_map(|(p, _)| {
                let rest = &p[prefix.len()..];
                (!rest.contains('/')).then(|| rest.to_string())
            })
            .collect()
    }

    fn ensure_ancestors(&mut self, path: &str) {
        if !path.starts_with('/') {
            return;
        }
        let mut end = 0;
        while let Some(offset) = path[end + 1..].find('/') {
            end += offset + 1;
            self.nodes
                .entry(path[..end].to_string())
                .or_insert(FakeNode { ephemeral: false });
        }
    }

    fn remove(&mut self, path: &str) -> bool {
        if self.nodes.remove(path).is_none() {
            return false;
        }
        if let Some(triggers) = self.watches.remove(path) {
            for trigger in triggers {
                trigger.fire(WatchEvent {
                    path: path.to_string(),
                    kind: WatchEventKind::Deleted,
                });
            }
        }
        true
    }

    fn check_available(&self) -> Result<(), CoordinationError> {
        if self.unavailable {
            return Err(CoordinationError::Unavailable(
                "fake session disconnected".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fake coordination adapter for testing
#[derive(Clone, Default)]
pub struct FakeCoordinationAdapter {
    state: Arc<Mutex<FakeState>>,
    calls: Arc<Mutex<Vec<CoordinationCall>>>,
}

impl FakeCoordinationAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-pad sequence suffixes to `width` digits (10 by default, 0 for none)
    pub fn with_sequence_width(self, width: usize) -> Self {
        self.state().sequence_width = width;
        self
    }

    /// Start the sequence counter under `parent` at `start`
    pub fn with_sequence_start(self, parent: &str, start: u64) -> Self {
        self.state().next_sequence.insert(parent.to_string(), start);
        self
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: CoordinationCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<CoordinationCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Whether a node currently exists
    pub fn node_exists(&self, path: &str) -> bool {
        self.state().contains(path)
    }

    /// Child names of `path`, in lexical order
    pub fn children(&self, path: &str) -> Vec<String> {
        self.state().children(path)
    }

    /// Number of pending watches on `path`
    pub fn watch_count(&self, path: &str) -> usize {
        self.state().watches.get(path).map_or(0, Vec::len)
    }

    /// Delete a node as some other actor would, firing its watches
    pub fn delete_out_of_band(&self, path: &str) -> bool {
        self.state().remove(path)
    }

    /// Drop every ephemeral node, as the service does when a session expires
    pub fn expire_session(&self) {
        let mut state = self.state();
        let ephemeral: Vec<String> = state
            .nodes
            .iter()
            .filter(|(_, node)| node.ephemeral)
            .map(|(path, _)| path.clone())
            .collect();
        for path in ephemeral {
            state.remove(&path);
        }
    }

    /// Make every subsequent call fail with `Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    /// Remove the next ephemeral node right after it is created
    pub fn vanish_next_create(&self) {
        self.state().vanish_next_create = true;
    }
}

#[async_trait]
impl CoordinationAdapter for FakeCoordinationAdapter {
    async fn create_ephemeral_sequential(&self, path: &str) -> Result<String, CoordinationError> {
        self.record(CoordinationCall::CreateEphemeralSequential {
            path: path.to_string(),
        });

        let mut state = self.state();
        state.check_available()?;
        state.ensure_ancestors(path);

        let parent = path
            .rsplit_once('/')
            .map(|(parent, _)| if parent.is_empty() { "/" } else { parent })
            .unwrap_or("/")
            .to_string();
        let counter = state.next_sequence.entry(parent).or_insert(0);
        let sequence = *counter;
        *counter += 1;

        let width = state.sequence_width;
        let created = format!("{}{:0width$}", path, sequence, width = width);
        state
            .nodes
            .insert(created.clone(), FakeNode { ephemeral: true });

        if state.vanish_next_create {
            state.vanish_next_create = false;
            state.remove(&created);
        }

        Ok(created)
    }

    async fn create_persistent(&self, path: &str) -> Result<(), CoordinationError> {
        self.record(CoordinationCall::CreatePersistent {
            path: path.to_string(),
        });

        let mut state = self.state();
        state.check_available()?;
        if state.contains(path) {
            return Err(CoordinationError::NodeExists(path.to_string()));
        }
        state.ensure_ancestors(path);
        state
            .nodes
            .insert(path.to_string(), FakeNode { ephemeral: false });
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), CoordinationError> {
        self.record(CoordinationCall::Delete {
            path: path.to_string(),
        });

        let mut state = self.state();
        state.check_available()?;
        if !state.nodes.contains_key(path) {
            return Err(CoordinationError::NoNode(path.to_string()));
        }
        if !state.children(path).is_empty() {
            return Err(CoordinationError::NodeState {
                path: path.to_string(),
                reason: "node has children".to_string(),
            });
        }
        state.remove(path);
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool, CoordinationError> {
        self.record(CoordinationCall::Exists {
            path: path.to_string(),
        });

        let state = self.state();
        state.check_available()?;
        Ok(state.contains(path))
    }

    async fn list_children(&self, path: &str) -> Result<Vec<String>, CoordinationError> {
        self.record(CoordinationCall::ListChildren {
            path: path.to_string(),
        });

        let state = self.state();
        state.check_available()?;
        if !state.contains(path) {
            return Err(CoordinationError::NoNode(path.to_string()));
        }
        Ok(state.children(path))
    }

    async fn watch_once(&self, path: &str) -> Result<Watch, CoordinationError> {
        self.record(CoordinationCall::WatchOnce {
            path: path.to_string(),
        });

        let mut state = self.state();
        state.check_available()?;
        if !state.contains(path) {
            return Err(CoordinationError::NoNode(path.to_string()));
        }
        let (trigger, watch) = Watch::channel(path);
        state
            .watches
            .entry(path.to_string())
            .or_default()
            .push(trigger);
        Ok(watch)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
