// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! NPY reader/writer for one-dimensional NumPy unicode string arrays.
//!
//! The deployment archive's `joint_names` member is saved by NumPy with a
//! fixed-width unicode dtype (e.g. `<U26`): each element is `width` UTF-32
//! little-endian code units, NUL-padded. `ndarray-npy` does not model this
//! dtype, so this module implements exactly the subset the archive needs:
//! NPY format version 1.0, little-endian `U` descr, 1-D shape.

use crate::MotionError;
use std::io::{Read, Write};

const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Serialize joint names as a 1-D `<U{width}` NPY array.
pub fn write_str_array<W: Write>(mut out: W, values: &[String]) -> Result<(), MotionError> {
    let width = values.iter().map(|v| v.chars().count()).max().unwrap_or(1).max(1);

    let mut header = format!(
        "{{'descr': '<U{}', 'fortran_order': False, 'shape': ({},), }}",
        width,
        values.len()
    );
    // Pad with spaces so magic + version + length + header is 64-aligned,
    // terminated by a newline, as NumPy itself writes.
    let unpadded = MAGIC.len() + 2 + 2 + header.len() + 1;
    let padding = (64 - unpadded % 64) % 64;
    header.extend(std::iter::repeat(' ').take(padding));
    header.push('\n');

    out.write_all(MAGIC)?;
    out.write_all(&[1u8, 0u8])?;
    let header_len = u16::try_from(header.len())
        .map_err(|_| MotionError::Format("joint_names header too large".to_string()))?;
    out.write_all(&header_len.to_le_bytes())?;
    out.write_all(header.as_bytes())?;

    let mut element = vec![0u8; width * 4];
    for value in values {
        element.fill(0);
        for (i, ch) in value.chars().enumerate() {
            element[i * 4..i * 4 + 4].copy_from_slice(&(ch as u32).to_le_bytes());
        }
        out.write_all(&element)?;
    }
    Ok(())
}

/// Parse a 1-D `<U{width}` NPY array back into strings.
pub fn read_str_array<R: Read>(mut input: R) -> Result<Vec<String>, MotionError> {
    let mut magic = [0u8; 6];
    input.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(MotionError::Format("not an NPY member".to_string()));
    }
    let mut version = [0u8; 2];
    input.read_exact(&mut version)?;
    let header_len = match version[0] {
        1 => {
            let mut len = [0u8; 2];
            input.read_exact(&mut len)?;
            u16::from_le_bytes(len) as usize
        }
        2 | 3 => {
            let mut len = [0u8; 4];
            input.read_exact(&mut len)?;
            u32::from_le_bytes(len) as usize
        }
        v => {
            return Err(MotionError::Format(format!("unsupported NPY version {v}")));
        }
    };
    let mut header = vec![0u8; header_len];
    input.read_exact(&mut header)?;
    let header = String::from_utf8_lossy(&header);

    let descr = extract_quoted(&header, "descr")
        .ok_or_else(|| MotionError::Format("NPY header missing descr".to_string()))?;
    let width: usize = descr
        .strip_prefix("<U")
        .and_then(|w| w.parse().ok())
        .ok_or_else(|| MotionError::Format(format!("expected unicode descr, got '{descr}'")))?;
    if width == 0 {
        return Err(MotionError::Format("zero-width unicode descr".to_string()));
    }
    let count = extract_shape_1d(&header)
        .ok_or_else(|| MotionError::Format("NPY header has no 1-D shape".to_string()))?;

    let mut values = Vec::with_capacity(count);
    let mut element = vec![0u8; width * 4];
    for _ in 0..count {
        input.read_exact(&mut element)?;
        let mut value = String::new();
        for unit in element.chunks_exact(4) {
            let code = u32::from_le_bytes([unit[0], unit[1], unit[2], unit[3]]);
            if code == 0 {
                break;
            }
            let ch = char::from_u32(code).ok_or_else(|| {
                MotionError::Format(format!("invalid code point {code:#x} in joint name"))
            })?;
            value.push(ch);
        }
        values.push(value);
    }
    Ok(values)
}

fn extract_quoted(header: &str, key: &str) -> Option<String> {
    let start = header.find(&format!("'{key}'"))?;
    let rest = &header[start + key.len() + 2..];
    let open = rest.find('\'')?;
    let rest = &rest[open + 1..];
    let close = rest.find('\'')?;
    Some(rest[..close].to_string())
}

fn extract_shape_1d(header: &str) -> Option<usize> {
    let start = header.find("'shape'")?;
    let rest = &header[start..];
    let open = rest.find('(')?;
    let close = rest.find(')')?;
    let inner = &rest[open + 1..close];
    let dims: Vec<&str> = inner
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .collect();
    if dims.len() != 1 {
        return None;
    }
    dims[0].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_roundtrip() {
        let names = vec![
            "left_hip_pitch_joint".to_string(),
            "right_wrist_yaw_joint".to_string(),
            "waist_yaw_joint".to_string(),
        ];
        let mut buf = Vec::new();
        write_str_array(&mut buf, &names).unwrap();
        let parsed = read_str_array(Cursor::new(&buf)).unwrap();
        assert_eq!(parsed, names);
    }

    #[test]
    fn test_header_is_aligned() {
        let mut buf = Vec::new();
        write_str_array(&mut buf, &["abc".to_string()]).unwrap();
        let header_len = u16::from_le_bytes([buf[8], buf[9]]) as usize;
        assert_eq!((10 + header_len) % 64, 0);
        assert_eq!(buf[10 + header_len - 1], b'\n');
    }

    #[test]
    fn test_rejects_non_npy() {
        let err = read_str_array(Cursor::new(b"not an npy file")).unwrap_err();
        assert!(matches!(err, MotionError::Format(_)));
    }

    #[test]
    fn test_rejects_numeric_descr() {
        // Hand-built header describing a float array.
        let mut buf = Vec::new();
        let header = "{'descr': '<f4', 'fortran_order': False, 'shape': (1,), }";
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&[1, 0]);
        buf.extend_from_slice(&(header.len() as u16).to_le_bytes());
        buf.extend_from_slice(header.as_bytes());
        buf.extend_from_slice(&0f32.to_le_bytes());
        assert!(read_str_array(Cursor::new(&buf)).is_err());
    }

    #[test]
    fn test_empty_string_element() {
        let names = vec![String::new(), "x".to_string()];
        let mut buf = Vec::new();
        write_str_array(&mut buf, &names).unwrap();
        assert_eq!(read_str_array(Cursor::new(&buf)).unwrap(), names);
    }
}
