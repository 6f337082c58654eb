use super::{CompareError, not_equivalent, read_bytes};
use crate::domain::ComparatorKind;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// How closely reproducible binaries such as HISAT2 indices are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexStrictness {
    #[default]
    SizeOnly,
    ByteExact,
}

pub fn compare_index_file(
    expected: &Path,
    actual: &Path,
    strictness: IndexStrictness,
) -> Result<(), CompareError> {
    match strictness {
        IndexStrictness::SizeOnly => compare_sizes(expected, actual),
        IndexStrictness::ByteExact => compare_bytes(expected, actual),
    }
}

pub fn compare_sizes(expected: &Path, actual: &Path) -> Result<(), CompareError> {
    let expected_len = file_len(expected)?;
    let actual_len = file_len(actual)?;
    if expected_len == actual_len {
        return Ok(());
    }

    Err(not_equivalent(
        ComparatorKind::FileSize,
        expected,
        actual,
        format!(
            "size differs (expected {} bytes, actual {} bytes)",
            expected_len, actual_len
        ),
    ))
}

pub fn compare_bytes(expected: &Path, actual: &Path) -> Result<(), CompareError> {
    let expected_bytes = read_bytes(expected)?;
    let actual_bytes = read_bytes(actual)?;
    match first_mismatch_offset(&expected_bytes, &actual_bytes) {
        None => Ok(()),
        Some(offset) => Err(not_equivalent(
            ComparatorKind::Bytes,
            expected,
            actual,
            format!(
                "first difference at byte {} (expected {} bytes, actual {} bytes)",
                offset,
                expected_bytes.len(),
                actual_bytes.len()
            ),
        )),
    }
}

pub(crate) fn first_mismatch_offset(left: &[u8], right: &[u8]) -> Option<usize> {
    left.iter()
        .zip(right.iter())
        .position(|(left_byte, right_byte)| left_byte != right_byte)
        .or_else(|| (left.len() != right.len()).then_some(left.len().min(right.len())))
}

fn file_len(path: &Path) -> Result<u64, CompareError> {
    fs::metadata(path)
        .map(|metadata| metadata.len())
        .map_err(|source| CompareError::Read {
            path: path.to_path_buf(),
            source,
        })
}
