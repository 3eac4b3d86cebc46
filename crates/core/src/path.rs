// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock path codec
//!
//! Maps `(lock type, business keys)` to a hierarchical lock key and back.
//! A lock key is the queue's base path followed by the queue-entry marker:
//!
//! ```text
//! /getReceiveQuantity/<activity>/<coupon>/lock-
//! ```
//!
//! The coordination service appends a sequence number to that marker when a
//! contender joins the queue, producing a queue-entry node such as
//! `/getReceiveQuantity/7/42/lock-0000000003`.

use crate::lock_type::LockType;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between path segments
pub const PATH_SEPARATOR: char = '/';

/// Name prefix of every queue-entry node
pub const QUEUE_PREFIX: &str = "lock-";

/// Errors from building or parsing lock paths
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("business key must not be empty")]
    EmptySegment,
    #[error("business key '{0}' contains the path separator")]
    SeparatorInSegment(String),
    #[error("business key '{0}' starts with the reserved prefix '{QUEUE_PREFIX}'")]
    ReservedPrefix(String),
    #[error("'{0}' is not a lock key (expected /<root>/<keys...>/{QUEUE_PREFIX})")]
    NotALockKey(String),
    #[error("'{0}' is not a queue-entry path")]
    NotAQueueEntry(String),
    #[error("malformed queue entry '{0}': expected {QUEUE_PREFIX}<digits>")]
    MalformedQueueEntry(String),
}

/// A validated lock key: `<base path>/lock-`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LockKey {
    path: String,
}

impl LockKey {
    /// Build a key from a lock type and ordered business keys
    pub fn new<I, S>(lock_type: LockType, keys: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = String::from(lock_type.root());
        for key in keys {
            let key = key.as_ref();
            validate_segment(key)?;
            path.push(PATH_SEPARATOR);
            path.push_str(key);
        }
        path.push(PATH_SEPARATOR);
        path.push_str(QUEUE_PREFIX);
        Ok(Self { path })
    }

    /// `/getReceiveQuantity/<activity_no>/<coupon_no>/lock-`
    pub fn receive_quantity(activity_no: &str, coupon_no: &str) -> Result<Self, PathError> {
        Self::new(LockType::ReceiveQuantity, [activity_no, coupon_no])
    }

    /// `/releaseCouponStuckNum/<activity_no>/lock-`
    pub fn release_coupon_stock(activity_no: &str) -> Result<Self, PathError> {
        Self::new(LockType::ReleaseCouponStock, [activity_no])
    }

    /// Reconstruct a key from its queue base path
    pub fn from_base_path(base: &str) -> Result<Self, PathError> {
        let rest = base
            .strip_prefix(PATH_SEPARATOR)
            .ok_or_else(|| PathError::NotALockKey(base.to_string()))?;
        for segment in rest.split(PATH_SEPARATOR) {
            validate_segment(segment).map_err(|_| PathError::NotALockKey(base.to_string()))?;
        }
        Ok(Self {
            path: format!("{}{}{}", base, PATH_SEPARATOR, QUEUE_PREFIX),
        })
    }

    /// Full key, including the trailing queue marker
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// The queue's parent path (the key without `/lock-`)
    pub fn base_path(&self) -> &str {
        &self.path[..self.path.len() - QUEUE_PREFIX.len() - 1]
    }

    /// Path of a sibling queue entry given its bare child name
    pub fn child_path(&self, child_name: &str) -> String {
        format!("{}{}{}", self.base_path(), PATH_SEPARATOR, child_name)
    }

    /// Lock type owning this key's root, if it is a known one
    pub fn lock_type(&self) -> Option<LockType> {
        LockType::from_path(&self.path)
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl FromStr for LockKey {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let base = s
            .strip_suffix(QUEUE_PREFIX)
            .and_then(|b| b.strip_suffix(PATH_SEPARATOR))
            .ok_or_else(|| PathError::NotALockKey(s.to_string()))?;
        Self::from_base_path(base).map_err(|_| PathError::NotALockKey(s.to_string()))
    }
}

impl AsRef<str> for LockKey {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

/// A queue-entry node: `<base path>/lock-<sequence>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueNode {
    key: LockKey,
    name: String,
    sequence: u64,
}

impl QueueNode {
    /// Parse the full path returned by a sequential create
    pub fn parse(full_path: &str) -> Result<Self, PathError> {
        let (key, digits) = split_full_path(full_path)?;
        let name = format!("{}{}", QUEUE_PREFIX, digits);
        let sequence = sequence_number(&name)?;
        Ok(Self {
            key,
            name,
            sequence,
        })
    }

    pub fn key(&self) -> &LockKey {
        &self.key
    }

    pub fn base_path(&self) -> &str {
        self.key.base_path()
    }

    /// Bare child name, e.g. `lock-0000000003`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Full node path
    pub fn path(&self) -> String {
        self.key.child_path(&self.name)
    }
}

/// Build the lock key for `lock_type` and `keys`
pub fn build_path<S: AsRef<str>>(lock_type: LockType, keys: &[S]) -> Result<LockKey, PathError> {
    LockKey::new(lock_type, keys)
}

/// Split a queue-entry path into its lock key and bare sequence suffix
///
/// `/a/b/lock-0000000012` becomes (`/a/b/lock-`, `0000000012`).
pub fn split_full_path(full_path: &str) -> Result<(LockKey, String), PathError> {
    let (base, name) = full_path
        .rsplit_once(PATH_SEPARATOR)
        .ok_or_else(|| PathError::NotAQueueEntry(full_path.to_string()))?;
    let digits = name
        .strip_prefix(QUEUE_PREFIX)
        .ok_or_else(|| PathError::NotAQueueEntry(full_path.to_string()))?;
    if !is_decimal(digits) {
        return Err(PathError::MalformedQueueEntry(name.to_string()));
    }
    let key = LockKey::from_base_path(base)
        .map_err(|_| PathError::NotAQueueEntry(full_path.to_string()))?;
    Ok((key, digits.to_string()))
}

/// Parse the sequence number of a bare child name such as `lock-12`
pub fn sequence_number(child_name: &str) -> Result<u64, PathError> {
    child_name
        .strip_prefix(QUEUE_PREFIX)
        .filter(|digits| is_decimal(digits))
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| PathError::MalformedQueueEntry(child_name.to_string()))
}

/// Sort child names by numeric sequence, ascending
///
/// Sequence suffixes are not guaranteed to share a width, so lexical order
/// is wrong. Any name that does not parse fails the whole sort.
pub fn sort_children(children: Vec<String>) -> Result<Vec<String>, PathError> {
    let mut numbered = children
        .into_iter()
        .map(|name| sequence_number(&name).map(|seq| (seq, name)))
        .collect::<Result<Vec<_>, _>>()?;
    numbered.sort_unstable_by_key(|(seq, _)| *seq);
    Ok(numbered.into_iter().map(|(_, name)| name).collect())
}

fn validate_segment(segment: &str) -> Result<(), PathError> {
    if segment.is_empty() {
        return Err(PathError::EmptySegment);
    }
    if segment.contains(PATH_SEPARATOR) {
        return Err(PathError::SeparatorInSegment(segment.to_string()));
    }
    if segment.starts_with(QUEUE_PREFIX) {
        return Err(PathError::ReservedPrefix(segment.to_string()));
    }
    Ok(())
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
