// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! NPZ motion archive codec.
//!
//! Wire layout (generation service): `fps` int32, `joint_pos` in service
//! order, `root_pos`, `root_rot` scalar-first. Deployment layout (persisted
//! and loaded by the control process): `fps` float32 scalar, `dof_pos` in
//! deployment order, `root_pos`, `root_rot` scalar-last, plus `joint_names`
//! for self-description. Both are NPZ containers (ZIP of NPY members).

use crate::joints::{JointOrderTable, RemapIndex};
use crate::{npy_str, quat, MotionArtifact, MotionError};
use ndarray::{arr0, Array0, Array1, Array2};
use ndarray_npy::{ReadNpyExt, WriteNpyExt};
use std::io::{Cursor, Read, Write};
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Decode a wire archive into a deployment-order [`MotionArtifact`].
///
/// Steps, in order: parse the named members, rotate the orientation
/// components to scalar-last, validate the result as a unit quaternion
/// (falling back once to treating the wire data as already scalar-last),
/// then apply `remap` to every frame's joint vector.
pub fn decode(
    raw: &[u8],
    remap: &RemapIndex,
    deploy: &JointOrderTable,
) -> Result<MotionArtifact, MotionError> {
    let mut archive = ZipArchive::new(Cursor::new(raw))
        .map_err(|e| MotionError::Format(format!("not an NPZ archive: {e}")))?;

    let fps = read_fps(&mut archive)?;
    let joint_pos = read_matrix(&mut archive, &["joint_pos", "dof_pos"], "joint_pos")?;
    let root_pos = read_matrix(&mut archive, &["root_pos"], "root_pos")?;
    let root_rot_wire = read_matrix(&mut archive, &["root_rot"], "root_rot")?;

    let frames = joint_pos.nrows();
    if frames == 0 {
        return Err(MotionError::Format("archive contains no frames".to_string()));
    }
    debug!(frames, fps, "decoding motion archive");

    if joint_pos.ncols() != remap.len() {
        return Err(MotionError::Format(format!(
            "archive has {} joints, remap table expects {}",
            joint_pos.ncols(),
            remap.len()
        )));
    }
    if root_rot_wire.nrows() == 0 {
        return Err(MotionError::Format("root_rot contains no frames".to_string()));
    }
    if root_rot_wire.ncols() != 4 {
        return Err(MotionError::Format(format!(
            "root_rot must have 4 columns, got {}",
            root_rot_wire.ncols()
        )));
    }

    let root_rot = convert_root_rot(&root_rot_wire)?;
    let dof_pos = remap.apply_matrix(joint_pos.view());
    let joint_names = deploy.names().to_vec();

    MotionArtifact::new(fps, dof_pos, root_pos, root_rot, joint_names)
}

/// Encode an artifact into the deployment NPZ layout.
///
/// The artifact already holds deployment order and scalar-last rotations, so
/// no remapping happens on the way out.
pub fn encode(artifact: &MotionArtifact) -> Result<Vec<u8>, MotionError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    // np.savez stores members uncompressed
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    start_member(&mut writer, "fps.npy", options)?;
    let fps = arr0(artifact.fps() as f32);
    write_member(&fps, &mut writer, "fps")?;

    start_member(&mut writer, "dof_pos.npy", options)?;
    write_member(artifact.dof_pos(), &mut writer, "dof_pos")?;

    start_member(&mut writer, "root_pos.npy", options)?;
    write_member(artifact.root_pos(), &mut writer, "root_pos")?;

    start_member(&mut writer, "root_rot.npy", options)?;
    write_member(artifact.root_rot(), &mut writer, "root_rot")?;

    start_member(&mut writer, "joint_names.npy", options)?;
    npy_str::write_str_array(&mut writer, artifact.joint_names())?;

    let cursor = writer
        .finish()
        .map_err(|e| MotionError::Format(format!("failed to finalize archive: {e}")))?;
    Ok(cursor.into_inner())
}

/// Rotate wire rotations (scalar-first) to scalar-last, validating the first
/// frame. If that fails, try the wire data as already scalar-last before
/// giving up - do not guess further.
fn convert_root_rot(wire: &Array2<f32>) -> Result<Array2<f32>, MotionError> {
    let rotated = quat::wxyz_to_xyzw(wire.view());
    let first = rotated.row(0);
    if quat::is_unit(first.as_slice().unwrap_or(&[])) {
        return Ok(rotated);
    }
    let wire_first: Vec<f32> = wire.row(0).to_vec();
    if quat::is_unit(&wire_first) {
        warn!("root_rot appears to be scalar-last already; skipping component rotation");
        return Ok(wire.clone());
    }
    Err(MotionError::InvalidQuaternion {
        norm: quat::norm(&wire_first),
    })
}

fn member_bytes(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    names: &[&str],
) -> Result<Option<Vec<u8>>, MotionError> {
    for name in names {
        for candidate in [format!("{name}.npy"), (*name).to_string()] {
            if let Ok(mut file) = archive.by_name(&candidate) {
                let mut bytes = Vec::with_capacity(file.size() as usize);
                file.read_to_end(&mut bytes)?;
                return Ok(Some(bytes));
            }
        }
    }
    Ok(None)
}

fn read_matrix(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    names: &[&str],
    field: &'static str,
) -> Result<Array2<f32>, MotionError> {
    let bytes = member_bytes(archive, names)?.ok_or(MotionError::MissingField(field))?;
    Array2::<f32>::read_npy(Cursor::new(&bytes))
        .map_err(|e| MotionError::Format(format!("failed to parse '{field}': {e}")))
}

/// The wire `fps` member is a 1-element int32 array, but tolerate the scalar
/// and float spellings NumPy produces depending on how it was saved.
fn read_fps(archive: &mut ZipArchive<Cursor<&[u8]>>) -> Result<u32, MotionError> {
    let bytes = member_bytes(archive, &["fps"])?.ok_or(MotionError::MissingField("fps"))?;

    if let Ok(arr) = Array1::<i32>::read_npy(Cursor::new(&bytes)) {
        if let Some(&v) = arr.first() {
            return fps_from_i64(v as i64);
        }
    }
    if let Ok(arr) = Array0::<i32>::read_npy(Cursor::new(&bytes)) {
        return fps_from_i64(arr.into_scalar() as i64);
    }
    if let Ok(arr) = Array1::<f32>::read_npy(Cursor::new(&bytes)) {
        if let Some(&v) = arr.first() {
            return fps_from_i64(v as i64);
        }
    }
    if let Ok(arr) = Array0::<f32>::read_npy(Cursor::new(&bytes)) {
        return fps_from_i64(arr.into_scalar() as i64);
    }
    Err(MotionError::Format(
        "could not parse 'fps' as an int32 or float32 scalar".to_string(),
    ))
}

fn fps_from_i64(v: i64) -> Result<u32, MotionError> {
    if v <= 0 {
        return Err(MotionError::Format(format!("fps must be positive, got {v}")));
    }
    u32::try_from(v).map_err(|_| MotionError::Format(format!("fps out of range: {v}")))
}

fn start_member(
    writer: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    options: SimpleFileOptions,
) -> Result<(), MotionError> {
    writer
        .start_file(name, options)
        .map_err(|e| MotionError::Format(format!("failed to start member '{name}': {e}")))
}

fn write_member<A, D, W>(
    array: &ndarray::ArrayBase<ndarray::OwnedRepr<A>, D>,
    writer: &mut W,
    field: &str,
) -> Result<(), MotionError>
where
    A: ndarray_npy::WritableElement,
    D: ndarray::Dimension,
    W: Write,
{
    array
        .write_npy(writer)
        .map_err(|e| MotionError::Format(format!("failed to write '{field}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::g1;
    use ndarray::{arr1, Array2};

    fn tables() -> (JointOrderTable, JointOrderTable, RemapIndex) {
        let source = JointOrderTable::new(g1::SERVICE_JOINT_ORDER.iter().copied()).unwrap();
        let target = JointOrderTable::new(g1::DEPLOY_JOINT_ORDER.iter().copied()).unwrap();
        let remap = RemapIndex::build(&source, &target).unwrap();
        (source, target, remap)
    }

    /// Build a wire archive the way the generation service does: fps as a
    /// 1-element int32 array, joint_pos in service order, root_rot
    /// scalar-first.
    fn wire_archive(frames: usize, fps: i32, root_rot_row: [f32; 4]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        writer.start_file("fps.npy", options).unwrap();
        arr1(&[fps]).write_npy(&mut writer).unwrap();

        writer.start_file("joint_pos.npy", options).unwrap();
        let joint_pos = Array2::from_shape_fn((frames, g1::JOINT_COUNT), |(f, j)| {
            (f * 100 + j) as f32
        });
        joint_pos.write_npy(&mut writer).unwrap();

        writer.start_file("root_pos.npy", options).unwrap();
        Array2::<f32>::zeros((frames, 3)).write_npy(&mut writer).unwrap();

        writer.start_file("root_rot.npy", options).unwrap();
        let root_rot = Array2::from_shape_fn((frames, 4), |(_, c)| root_rot_row[c]);
        root_rot.write_npy(&mut writer).unwrap();

        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_decode_remaps_and_rotates() {
        let (source, target, remap) = tables();
        // wire rotation is identity in wxyz; deploy stores xyzw
        let raw = wire_archive(3, 30, [1.0, 0.0, 0.0, 0.0]);
        let artifact = decode(&raw, &remap, &target).unwrap();

        assert_eq!(artifact.fps(), 30);
        assert_eq!(artifact.frames(), 3);
        assert_eq!(artifact.root_rot().row(0).to_vec(), vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(artifact.joint_names(), target.names());

        // column j of frame 0 must hold the service-order value of the
        // joint occupying deploy slot j
        for (j, name) in target.names().iter().enumerate() {
            let src = source.names().iter().position(|n| n == name).unwrap();
            assert_eq!(artifact.dof_pos()[[0, j]], src as f32);
        }
    }

    #[test]
    fn test_decode_missing_member_errors() {
        let (_, target, remap) = tables();
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        writer.start_file("fps.npy", options).unwrap();
        arr1(&[30i32]).write_npy(&mut writer).unwrap();
        let raw = writer.finish().unwrap().into_inner();

        let err = decode(&raw, &remap, &target).unwrap_err();
        assert!(matches!(err, MotionError::MissingField("joint_pos")));
    }

    #[test]
    fn test_decode_invalid_quaternion_aborts() {
        let (_, target, remap) = tables();
        let raw = wire_archive(2, 30, [9.0, 9.0, 9.0, 9.0]);
        let err = decode(&raw, &remap, &target).unwrap_err();
        assert!(matches!(err, MotionError::InvalidQuaternion { .. }));
    }

    #[test]
    fn test_decode_garbage_is_format_error() {
        let (_, target, remap) = tables();
        let err = decode(b"definitely not a zip", &remap, &target).unwrap_err();
        assert!(matches!(err, MotionError::Format(_)));
    }

    #[test]
    fn test_encode_roundtrips_through_decode_layout() {
        let (_, target, remap) = tables();
        let raw = wire_archive(2, 25, [1.0, 0.0, 0.0, 0.0]);
        let artifact = decode(&raw, &remap, &target).unwrap();
        let encoded = encode(&artifact).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(encoded.as_slice())).unwrap();
        for member in [
            "fps.npy",
            "dof_pos.npy",
            "root_pos.npy",
            "root_rot.npy",
            "joint_names.npy",
        ] {
            assert!(archive.by_name(member).is_ok(), "missing {member}");
        }

        // dof_pos is written as-is (already deployment order)
        let bytes = member_bytes(&mut archive, &["dof_pos"]).unwrap().unwrap();
        let dof = Array2::<f32>::read_npy(Cursor::new(&bytes)).unwrap();
        assert_eq!(&dof, artifact.dof_pos());

        let bytes = member_bytes(&mut archive, &["joint_names"]).unwrap().unwrap();
        let names = npy_str::read_str_array(Cursor::new(&bytes)).unwrap();
        assert_eq!(names, artifact.joint_names());
    }
}
