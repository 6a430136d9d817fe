// SPDX-FileCopyrightText: 2024 Rot127 <unisono@quyllur.org>
// SPDX-License-Identifier: LGPL-3.0-only

//! Signed, fixed-width path weights with explicit overflow detection.
//!
//! `bda::weight::WeightMap` backs node weights with `rug::Integer`
//! (unbounded precision, memoized as an expression DAG). That is the
//! right tool when weights get reused and composed symbolically across
//! an inter-procedural call graph, as `bda` does. This crate's weights
//! are a strict reverse-topological running sum per procedure with no
//! sharing, and spec §4.3/§8 pin an exact overflow boundary at `2^63` —
//! a property an unbounded integer can never exhibit. `PathWeight` is
//! therefore a signed 64-bit counter with `checked_add`, the same
//! contract as the reference implementation's `llvm::APInt(64).sadd_ov`.

use std::fmt;
use std::ops::Deref;

/// A path weight or path count, always representable in a signed 64-bit
/// integer. `TotalPaths = 0` is the reserved overflow sentinel (spec
/// §4.3, §7); every other CFG has at least one entry-to-exit path so a
/// genuine zero-path count never arises.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct PathWeight(i64);

impl PathWeight {
    pub const ZERO: PathWeight = PathWeight(0);
    pub const ONE: PathWeight = PathWeight(1);

    pub const fn new(value: i64) -> PathWeight {
        PathWeight(value)
    }

    pub const fn get(&self) -> i64 {
        self.0
    }

    /// Checked addition. `None` on signed overflow, mirroring
    /// `APInt::sadd_ov`.
    pub fn checked_add(self, rhs: PathWeight) -> Option<PathWeight> {
        self.0.checked_add(rhs.0).map(PathWeight)
    }
}

impl Deref for PathWeight {
    type Target = i64;

    fn deref(&self) -> &i64 {
        &self.0
    }
}

impl From<i64> for PathWeight {
    fn from(value: i64) -> PathWeight {
        PathWeight(value)
    }
}

impl fmt::Display for PathWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
