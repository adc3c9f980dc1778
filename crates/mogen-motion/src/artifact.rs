// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! The canonical in-memory motion unit exchanged between pipeline stages.

use crate::MotionError;
use ndarray::Array2;

/// One converted motion trajectory, ready for the control process.
///
/// Invariants enforced at construction:
/// - `dof_pos`, `root_pos`, and `root_rot` agree on frame count
/// - `root_pos` has 3 columns, `root_rot` has 4 (scalar-last)
/// - `joint_names` length matches the `dof_pos` column count
#[derive(Debug, Clone, PartialEq)]
pub struct MotionArtifact {
    fps: u32,
    dof_pos: Array2<f32>,
    root_pos: Array2<f32>,
    root_rot: Array2<f32>,
    joint_names: Vec<String>,
}

impl MotionArtifact {
    pub fn new(
        fps: u32,
        dof_pos: Array2<f32>,
        root_pos: Array2<f32>,
        root_rot: Array2<f32>,
        joint_names: Vec<String>,
    ) -> Result<Self, MotionError> {
        if fps == 0 {
            return Err(MotionError::Format("fps must be positive".to_string()));
        }
        let frames = dof_pos.nrows();
        if root_pos.nrows() != frames || root_rot.nrows() != frames {
            return Err(MotionError::Format(format!(
                "frame count mismatch: dof_pos {}, root_pos {}, root_rot {}",
                frames,
                root_pos.nrows(),
                root_rot.nrows()
            )));
        }
        if root_pos.ncols() != 3 {
            return Err(MotionError::Format(format!(
                "root_pos must have 3 columns, got {}",
                root_pos.ncols()
            )));
        }
        if root_rot.ncols() != 4 {
            return Err(MotionError::Format(format!(
                "root_rot must have 4 columns, got {}",
                root_rot.ncols()
            )));
        }
        if joint_names.len() != dof_pos.ncols() {
            return Err(MotionError::Format(format!(
                "joint_names has {} entries for {} joint columns",
                joint_names.len(),
                dof_pos.ncols()
            )));
        }
        Ok(Self {
            fps,
            dof_pos,
            root_pos,
            root_rot,
            joint_names,
        })
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Number of frames in the trajectory.
    pub fn frames(&self) -> usize {
        self.dof_pos.nrows()
    }

    pub fn joint_count(&self) -> usize {
        self.dof_pos.ncols()
    }

    /// Per-frame joint angles in deployment order.
    pub fn dof_pos(&self) -> &Array2<f32> {
        &self.dof_pos
    }

    pub fn root_pos(&self) -> &Array2<f32> {
        &self.root_pos
    }

    /// Per-frame root orientations, scalar-last (x, y, z, w).
    pub fn root_rot(&self) -> &Array2<f32> {
        &self.root_rot
    }

    /// Deployment-order joint names, one per `dof_pos` column.
    pub fn joint_names(&self) -> &[String] {
        &self.joint_names
    }
}
