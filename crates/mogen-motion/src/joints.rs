// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! Joint order tables and the remap index between them.
//!
//! A [`RemapIndex`] is a fixed permutation built once at startup and reused
//! for every converted frame: `target[i] == source[index[i]]`.

use crate::MotionError;
use ndarray::{Array2, ArrayView2, Axis};

/// An ordered sequence of joint names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointOrderTable {
    names: Vec<String>,
}

impl JointOrderTable {
    /// Build a table from joint names, rejecting duplicates.
    pub fn new<I, S>(names: I) -> Result<Self, MotionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        for (i, name) in names.iter().enumerate() {
            if names[..i].iter().any(|n| n == name) {
                return Err(MotionError::DuplicateJoint { name: name.clone() });
            }
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

/// Permutation from a source joint order into a target joint order.
///
/// Immutable once built; element `i` is the source position of the joint
/// that occupies target slot `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapIndex {
    index: Vec<usize>,
}

impl RemapIndex {
    /// Build the permutation so that `target[i] == source[index[i]]`.
    ///
    /// # Errors
    ///
    /// `MotionError::LengthMismatch` if the tables differ in size, and
    /// `MotionError::JointNotFound` naming the first target joint absent
    /// from the source order. Both are fatal configuration errors.
    pub fn build(source: &JointOrderTable, target: &JointOrderTable) -> Result<Self, MotionError> {
        if source.len() != target.len() {
            return Err(MotionError::LengthMismatch {
                expected: source.len(),
                found: target.len(),
            });
        }
        let mut index = Vec::with_capacity(target.len());
        for name in target.names() {
            match source.position(name) {
                Some(pos) => index.push(pos),
                None => {
                    return Err(MotionError::JointNotFound { name: name.clone() });
                }
            }
        }
        Ok(Self { index })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.index
    }

    /// Reorder one frame of joint values from source order to target order.
    pub fn apply(&self, frame: &[f32]) -> Vec<f32> {
        self.index.iter().map(|&i| frame[i]).collect()
    }

    /// Reorder every row of a frames-by-joints matrix.
    pub fn apply_matrix(&self, frames: ArrayView2<'_, f32>) -> Array2<f32> {
        frames.select(Axis(1), &self.index)
    }

    /// The inverse permutation (target order back to source order).
    pub fn inverse(&self) -> RemapIndex {
        let mut inv = vec![0usize; self.index.len()];
        for (target_slot, &source_slot) in self.index.iter().enumerate() {
            inv[source_slot] = target_slot;
        }
        RemapIndex { index: inv }
    }
}
