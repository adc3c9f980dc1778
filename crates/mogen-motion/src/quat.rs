// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! Quaternion component-convention conversion.
//!
//! The generation service emits root orientations scalar-first (w, x, y, z);
//! the deployment format stores them scalar-last (x, y, z, w). Conversion is
//! a fixed 4-way component rotation applied per frame; applying the two
//! directions in sequence is the identity.

use ndarray::{s, Array2, ArrayView2};

/// Tolerance on |q| - 1 when validating a rotation.
pub const UNIT_NORM_TOLERANCE: f32 = 1e-3;

/// Convert scalar-first (w, x, y, z) rows to scalar-last (x, y, z, w).
pub fn wxyz_to_xyzw(rot: ArrayView2<'_, f32>) -> Array2<f32> {
    let mut out = Array2::zeros(rot.raw_dim());
    out.slice_mut(s![.., 0..3]).assign(&rot.slice(s![.., 1..4]));
    out.slice_mut(s![.., 3..4]).assign(&rot.slice(s![.., 0..1]));
    out
}

/// Convert scalar-last (x, y, z, w) rows to scalar-first (w, x, y, z).
pub fn xyzw_to_wxyz(rot: ArrayView2<'_, f32>) -> Array2<f32> {
    let mut out = Array2::zeros(rot.raw_dim());
    out.slice_mut(s![.., 0..1]).assign(&rot.slice(s![.., 3..4]));
    out.slice_mut(s![.., 1..4]).assign(&rot.slice(s![.., 0..3]));
    out
}

/// Squared-norm based unit check: all components finite and |q| within
/// [`UNIT_NORM_TOLERANCE`] of 1.
pub fn is_unit(q: &[f32]) -> bool {
    if q.len() != 4 || q.iter().any(|c| !c.is_finite()) {
        return false;
    }
    (norm(q) - 1.0).abs() <= UNIT_NORM_TOLERANCE
}

/// Euclidean norm of a 4-component quaternion.
pub fn norm(q: &[f32]) -> f32 {
    q.iter().map(|c| c * c).sum::<f32>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_wxyz_to_xyzw_rotates_components() {
        let wxyz = array![[1.0f32, 2.0, 3.0, 4.0]];
        let xyzw = wxyz_to_xyzw(wxyz.view());
        assert_eq!(xyzw, array![[2.0f32, 3.0, 4.0, 1.0]]);
    }

    #[test]
    fn test_conversion_roundtrip_is_exact() {
        let wxyz = array![
            [0.5f32, 0.5, 0.5, 0.5],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.70710678, 0.0, 0.70710678],
        ];
        let back = xyzw_to_wxyz(wxyz_to_xyzw(wxyz.view()).view());
        assert_eq!(back, wxyz);
    }

    #[test]
    fn test_is_unit() {
        assert!(is_unit(&[0.0, 0.0, 0.0, 1.0]));
        assert!(is_unit(&[0.5, 0.5, 0.5, 0.5]));
        assert!(!is_unit(&[0.0, 0.0, 0.0, 0.5]));
        assert!(!is_unit(&[f32::NAN, 0.0, 0.0, 1.0]));
        assert!(!is_unit(&[0.0, 0.0, 1.0]));
    }
}
