//! Format-aware equivalence checks between an expected and an actual file.
//!
//! Every comparator returns `Ok(())` for equivalent files and
//! [`CompareError::NotEquivalent`] naming the first divergence otherwise.
//! Any other [`CompareError`] means the comparison could not be carried out.

pub mod bedgraph;
pub mod bytes;
pub mod fastq;
pub mod hdf5;
pub mod html;
pub mod numeric;
pub mod read_counts;
pub mod sam;
pub mod tsv;

pub use bytes::IndexStrictness;
pub use numeric::NumericTolerance;
pub use tsv::TsvOptions;

use crate::domain::{ComparatorKind, RibovizError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_H5DIFF_PROGRAM: &str = "h5diff";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} files differ ('{}' vs '{}'): {divergence}", expected.display(), actual.display())]
pub struct EquivalenceError {
    pub kind: ComparatorKind,
    pub expected: PathBuf,
    pub actual: PathBuf,
    pub divergence: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error(transparent)]
    NotEquivalent(#[from] EquivalenceError),
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("failed to prepare scratch directory '{}': {source}", path.display())]
    Scratch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to launch '{program}': {source}")]
    Tool {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{program}' could not compare '{}' and '{}': {status}", expected.display(), actual.display())]
    ToolFailed {
        program: String,
        expected: PathBuf,
        actual: PathBuf,
        status: String,
    },
}

impl CompareError {
    pub const fn is_mismatch(&self) -> bool {
        matches!(self, Self::NotEquivalent(_))
    }
}

impl From<CompareError> for RibovizError {
    fn from(error: CompareError) -> Self {
        let message = error.to_string();
        match error {
            CompareError::NotEquivalent(_) => RibovizError::computation("RUN.EQUIVALENCE", message),
            CompareError::Read { .. } | CompareError::Scratch { .. } => {
                RibovizError::io_system("IO.COMPARATOR_ACCESS", message)
            }
            CompareError::Parse { .. } => {
                RibovizError::input_validation("INPUT.COMPARATOR_PARSE", message)
            }
            CompareError::Tool { .. } | CompareError::ToolFailed { .. } => {
                RibovizError::io_system("IO.COMPARATOR_TOOL", message)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompareOptions {
    pub tsv: TsvOptions,
    pub index_strictness: IndexStrictness,
    pub h5diff_program: String,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            tsv: TsvOptions::default(),
            index_strictness: IndexStrictness::default(),
            h5diff_program: DEFAULT_H5DIFF_PROGRAM.to_string(),
        }
    }
}

/// Compares `expected` against `actual` with the comparator for `kind`.
///
/// `scratch_dir` is only used by the alignment comparators, which create
/// `expected/` and `actual/` beneath it and fail if either already exists.
pub fn compare_files(
    kind: ComparatorKind,
    expected: &Path,
    actual: &Path,
    options: &CompareOptions,
    scratch_dir: &Path,
) -> Result<(), CompareError> {
    debug!(%kind, expected = %expected.display(), actual = %actual.display(), "comparing");
    match kind {
        ComparatorKind::Bytes => bytes::compare_bytes(expected, actual),
        ComparatorKind::FileSize => bytes::compare_sizes(expected, actual),
        ComparatorKind::IndexFile => {
            bytes::compare_index_file(expected, actual, options.index_strictness)
        }
        ComparatorKind::Fastq => fastq::compare_fastq(expected, actual),
        ComparatorKind::Sam => sam::compare_sam(expected, actual, scratch_dir),
        ComparatorKind::Bam => sam::compare_bam(expected, actual, scratch_dir),
        ComparatorKind::Tsv => tsv::compare_tsv(expected, actual, &options.tsv),
        ComparatorKind::Bedgraph => {
            bedgraph::compare_bedgraph(expected, actual, options.tsv.tolerance)
        }
        ComparatorKind::Hdf5 => hdf5::compare_h5(expected, actual, &options.h5diff_program),
        ComparatorKind::Html => html::compare_html(expected, actual),
        ComparatorKind::ReadCounts => {
            read_counts::compare_read_counts(expected, actual, &options.tsv)
        }
    }
}

pub(crate) fn not_equivalent(
    kind: ComparatorKind,
    expected: &Path,
    actual: &Path,
    divergence: impl Into<String>,
) -> CompareError {
    CompareError::NotEquivalent(EquivalenceError {
        kind,
        expected: expected.to_path_buf(),
        actual: actual.to_path_buf(),
        divergence: divergence.into(),
    })
}

pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>, CompareError> {
    fs::read(path).map_err(|source| CompareError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn read_text(path: &Path) -> Result<String, CompareError> {
    let bytes = read_bytes(path)?;
    String::from_utf8(bytes).map_err(|source| CompareError::Parse {
        path: path.to_path_buf(),
        message: format!("not valid UTF-8: {}", source),
    })
}

pub(crate) fn parse_error(path: &Path, message: impl Into<String>) -> CompareError {
    CompareError::Parse {
        path: path.to_path_buf(),
        message: message.into(),
    }
}
