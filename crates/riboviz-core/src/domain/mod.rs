pub mod errors;

pub use errors::{RibovizError, RibovizErrorCategory, RibovizResult};

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Which configured directory an artifact lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirRole {
    Index,
    Temporary,
    Output,
}

impl DirRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Temporary => "tmp",
            Self::Output => "output",
        }
    }

    /// Index and temporary artifacts are only checked on request.
    pub const fn is_index_or_tmp(self) -> bool {
        matches!(self, Self::Index | Self::Temporary)
    }
}

impl Display for DirRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ArtifactRef {
    pub role: DirRole,
    pub sample: Option<String>,
    pub file_name: String,
}

impl ArtifactRef {
    pub fn shared(role: DirRole, file_name: impl Into<String>) -> Self {
        Self {
            role,
            sample: None,
            file_name: file_name.into(),
        }
    }

    pub fn per_sample(role: DirRole, sample: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            role,
            sample: Some(sample.into()),
            file_name: file_name.into(),
        }
    }

    /// Path relative to the role directory, using `/` separators.
    pub fn relative_path(&self) -> String {
        match &self.sample {
            Some(sample) => format!("{}/{}", sample, self.file_name),
            None => self.file_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparatorKind {
    Bytes,
    FileSize,
    IndexFile,
    Fastq,
    Sam,
    Bam,
    Tsv,
    Bedgraph,
    Hdf5,
    Html,
    ReadCounts,
}

impl ComparatorKind {
    pub const ALL: [ComparatorKind; 11] = [
        Self::Bytes,
        Self::FileSize,
        Self::IndexFile,
        Self::Fastq,
        Self::Sam,
        Self::Bam,
        Self::Tsv,
        Self::Bedgraph,
        Self::Hdf5,
        Self::Html,
        Self::ReadCounts,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bytes => "bytes",
            Self::FileSize => "size",
            Self::IndexFile => "index",
            Self::Fastq => "fastq",
            Self::Sam => "sam",
            Self::Bam => "bam",
            Self::Tsv => "tsv",
            Self::Bedgraph => "bedgraph",
            Self::Hdf5 => "hdf5",
            Self::Html => "html",
            Self::ReadCounts => "read-counts",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Alignment comparators sort into a scratch directory first.
    pub const fn needs_scratch(self) -> bool {
        matches!(self, Self::Sam | Self::Bam)
    }
}

impl Display for ComparatorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{ArtifactRef, ComparatorKind, DirRole};

    #[test]
    fn comparator_kind_parses_its_own_names() {
        for kind in ComparatorKind::ALL {
            assert_eq!(ComparatorKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ComparatorKind::parse(" TSV "), Some(ComparatorKind::Tsv));
        assert_eq!(ComparatorKind::parse("parquet"), None);
    }

    #[test]
    fn relative_path_includes_sample_directory() {
        let shared = ArtifactRef::shared(DirRole::Output, "read_counts_per_file.tsv");
        let sample = ArtifactRef::per_sample(DirRole::Temporary, "WTnone", "trim.fq");

        assert_eq!(shared.relative_path(), "read_counts_per_file.tsv");
        assert_eq!(sample.relative_path(), "WTnone/trim.fq");
        assert!(DirRole::Temporary.is_index_or_tmp());
        assert!(!DirRole::Output.is_index_or_tmp());
    }
}
