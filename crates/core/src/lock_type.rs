// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logical lock types
//!
//! Each lock type owns one permanent root node. Every queue for that type
//! lives somewhere below it.

use std::fmt;
use std::str::FromStr;

/// A logical lock type bound to a fixed root path segment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LockType {
    /// Coupon claim quantity per activity and coupon
    ReceiveQuantity,
    /// Coupon stock release per activity
    ReleaseCouponStock,
}

impl LockType {
    /// Every lock type, in declaration order
    pub const ALL: [LockType; 2] = [LockType::ReceiveQuantity, LockType::ReleaseCouponStock];

    /// Root path segment, including the leading separator
    pub fn root(self) -> &'static str {
        match self {
            LockType::ReceiveQuantity => "/getReceiveQuantity",
            LockType::ReleaseCouponStock => "/releaseCouponStuckNum",
        }
    }

    /// Short name used on the command line and in logs
    pub fn name(self) -> &'static str {
        match self {
            LockType::ReceiveQuantity => "receive-quantity",
            LockType::ReleaseCouponStock => "release-coupon-stock",
        }
    }

    /// Find the lock type whose root is the first segment of `path`
    pub fn from_path(path: &str) -> Option<LockType> {
        Self::ALL.into_iter().find(|t| {
            path.strip_prefix(t.root())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}

impl fmt::Display for LockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for LockType {
    type Err = String;

    /// Accepts the short name or the root segment, with or without its slash
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_start_matches('/');
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s || t.root().trim_start_matches('/') == trimmed)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|t| t.name()).collect();
                format!("unknown lock type '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

#[cfg(test)]
#[path = "lock_type_tests.rs"]
mod tests;
