// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! Fixed joint orderings for the Unitree G1 (29 DoF).
//!
//! Both tables are externally defined contracts: the service order is what
//! the motion-generation service emits (simulator convention, left/right
//! interleaved); the deployment order is what the robot's control process
//! expects (grouped by body part). Neither may be edited independently of
//! the processes that define them.

/// Joint order produced by the motion-generation service.
pub const SERVICE_JOINT_ORDER: &[&str] = &[
    "left_hip_pitch_joint",
    "right_hip_pitch_joint",
    "waist_yaw_joint",
    "left_hip_roll_joint",
    "right_hip_roll_joint",
    "waist_roll_joint",
    "left_hip_yaw_joint",
    "right_hip_yaw_joint",
    "waist_pitch_joint",
    "left_knee_joint",
    "right_knee_joint",
    "left_shoulder_pitch_joint",
    "right_shoulder_pitch_joint",
    "left_ankle_pitch_joint",
    "right_ankle_pitch_joint",
    "left_shoulder_roll_joint",
    "right_shoulder_roll_joint",
    "left_ankle_roll_joint",
    "right_ankle_roll_joint",
    "left_shoulder_yaw_joint",
    "right_shoulder_yaw_joint",
    "left_elbow_joint",
    "right_elbow_joint",
    "left_wrist_roll_joint",
    "right_wrist_roll_joint",
    "left_wrist_pitch_joint",
    "right_wrist_pitch_joint",
    "left_wrist_yaw_joint",
    "right_wrist_yaw_joint",
];

/// Joint order required by the robot's control process.
pub const DEPLOY_JOINT_ORDER: &[&str] = &[
    "left_hip_pitch_joint",
    "left_hip_roll_joint",
    "left_hip_yaw_joint",
    "left_knee_joint",
    "left_ankle_pitch_joint",
    "left_ankle_roll_joint",
    "right_hip_pitch_joint",
    "right_hip_roll_joint",
    "right_hip_yaw_joint",
    "right_knee_joint",
    "right_ankle_pitch_joint",
    "right_ankle_roll_joint",
    "waist_yaw_joint",
    "waist_roll_joint",
    "waist_pitch_joint",
    "left_shoulder_pitch_joint",
    "left_shoulder_roll_joint",
    "left_shoulder_yaw_joint",
    "left_elbow_joint",
    "left_wrist_roll_joint",
    "left_wrist_pitch_joint",
    "left_wrist_yaw_joint",
    "right_shoulder_pitch_joint",
    "right_shoulder_roll_joint",
    "right_shoulder_yaw_joint",
    "right_elbow_joint",
    "right_wrist_roll_joint",
    "right_wrist_pitch_joint",
    "right_wrist_yaw_joint",
];

/// Number of actuated joints.
pub const JOINT_COUNT: usize = 29;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tables_are_permutations_of_each_other() {
        assert_eq!(SERVICE_JOINT_ORDER.len(), JOINT_COUNT);
        assert_eq!(DEPLOY_JOINT_ORDER.len(), JOINT_COUNT);
        let service: HashSet<_> = SERVICE_JOINT_ORDER.iter().collect();
        let deploy: HashSet<_> = DEPLOY_JOINT_ORDER.iter().collect();
        assert_eq!(service.len(), JOINT_COUNT); // no duplicates
        assert_eq!(service, deploy);
    }
}
