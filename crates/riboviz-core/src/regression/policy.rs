//! Which artifacts are checked, how, and under which feature flags.

use self::ArtifactFiles::{Aggregate, IndexFiles, PerSample, SampleNamed};
use super::plan::FeatureFlag;
use super::plan::FeatureFlag::{
    BuildIndices, CountReads, DedupStats, DedupUmis, ExtractUmis, GroupUmis, MakeBedgraph,
    OutputPdfs, RunStaticHtml,
};
use crate::artifacts;
use crate::domain::ComparatorKind as Kind;
use crate::domain::DirRole::{Index, Output, Temporary};
use crate::domain::{ComparatorKind, DirRole};

#[derive(Debug, Clone, Copy)]
pub enum ArtifactFiles {
    /// HISAT2 index files for both configured prefixes.
    IndexFiles,
    /// Fixed file names inside each sample directory.
    PerSample(&'static [&'static str]),
    /// A file named after the sample, inside its directory.
    SampleNamed(fn(&str) -> String),
    /// A single file directly under the role directory.
    Aggregate(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    Compare(ComparatorKind),
    ExistsOnly,
    /// Compare with the kind, degrading to existence when the flag is set.
    CompareUnless(ComparatorKind, FeatureFlag),
}

/// What a missing expected-side file means for a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedFile {
    /// Missing expected data fails the check.
    Required,
    /// Missing expected data skips the check; the expected set may predate the output.
    SkipIfMissing,
    /// Only the actual side is looked at.
    Unused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TsvProfile {
    pub ignore_row_order: bool,
    pub na_to_empty_str: bool,
}

impl TsvProfile {
    pub const STRICT: Self = Self {
        ignore_row_order: false,
        na_to_empty_str: false,
    };

    pub const COLLATED: Self = Self {
        ignore_row_order: true,
        na_to_empty_str: true,
    };
}

#[derive(Debug, Clone, Copy)]
pub struct ArtifactPolicy {
    pub id: &'static str,
    pub role: DirRole,
    pub files: ArtifactFiles,
    /// All must be enabled for the check to run.
    pub flags: &'static [FeatureFlag],
    pub check: CheckMode,
    pub expected: ExpectedFile,
    pub tsv: TsvProfile,
}

impl ArtifactPolicy {
    const fn compare(
        id: &'static str,
        role: DirRole,
        files: ArtifactFiles,
        flags: &'static [FeatureFlag],
        kind: ComparatorKind,
    ) -> Self {
        Self {
            id,
            role,
            files,
            flags,
            check: CheckMode::Compare(kind),
            expected: ExpectedFile::Required,
            tsv: TsvProfile::STRICT,
        }
    }

    const fn skip_if_missing(self) -> Self {
        Self {
            expected: ExpectedFile::SkipIfMissing,
            ..self
        }
    }

    const fn exists(
        id: &'static str,
        role: DirRole,
        files: ArtifactFiles,
        flags: &'static [FeatureFlag],
        expected: ExpectedFile,
    ) -> Self {
        Self {
            id,
            role,
            files,
            flags,
            check: CheckMode::ExistsOnly,
            expected,
            tsv: TsvProfile::STRICT,
        }
    }
}

pub static POLICIES: [ArtifactPolicy; 22] = [
    ArtifactPolicy::compare("index_ht2", Index, IndexFiles, &[BuildIndices], Kind::IndexFile),
    ArtifactPolicy::compare(
        "cutadapt_fq",
        Temporary,
        PerSample(&[artifacts::TRIM_FQ]),
        &[],
        Kind::Fastq,
    ),
    ArtifactPolicy::compare(
        "umi_extract_fq",
        Temporary,
        PerSample(&[artifacts::EXTRACT_TRIM_FQ]),
        &[ExtractUmis],
        Kind::Fastq,
    ),
    ArtifactPolicy::compare(
        "hisat_fq",
        Temporary,
        PerSample(&[artifacts::NON_RRNA_FQ, artifacts::UNALIGNED_FQ]),
        &[],
        Kind::Fastq,
    ),
    ArtifactPolicy::compare(
        "hisat2_sam",
        Temporary,
        PerSample(&[artifacts::ORF_MAP_SAM, artifacts::RRNA_MAP_SAM]),
        &[],
        Kind::Sam,
    ),
    ArtifactPolicy::compare(
        "trim_5p_mismatch_sam",
        Temporary,
        PerSample(&[artifacts::ORF_MAP_CLEAN_SAM]),
        &[],
        Kind::Sam,
    ),
    ArtifactPolicy::compare(
        "trim_5p_mismatch_tsv",
        Temporary,
        PerSample(&[artifacts::TRIM_5P_MISMATCH_TSV]),
        &[],
        Kind::Tsv,
    ),
    ArtifactPolicy::compare(
        "samtools_bam",
        Temporary,
        PerSample(&[artifacts::ORF_MAP_CLEAN_BAM]),
        &[],
        Kind::Bam,
    ),
    ArtifactPolicy::compare(
        "samtools_bai",
        Temporary,
        PerSample(&[artifacts::ORF_MAP_CLEAN_BAI]),
        &[],
        Kind::FileSize,
    ),
    ArtifactPolicy::exists(
        "umi_dedup_bam",
        Temporary,
        PerSample(&[artifacts::DEDUP_BAM, artifacts::DEDUP_BAI]),
        &[DedupUmis],
        ExpectedFile::Unused,
    ),
    ArtifactPolicy::exists(
        "umi_dedup_stats",
        Temporary,
        PerSample(&artifacts::DEDUP_STATS_FILES),
        &[DedupUmis, DedupStats],
        ExpectedFile::SkipIfMissing,
    ),
    ArtifactPolicy::compare(
        "umi_group_pre_dedup",
        Temporary,
        PerSample(&[artifacts::PRE_DEDUP_GROUPS_TSV]),
        &[DedupUmis, GroupUmis],
        Kind::Tsv,
    ),
    ArtifactPolicy::exists(
        "umi_group_post_dedup",
        Temporary,
        PerSample(&[artifacts::POST_DEDUP_GROUPS_TSV]),
        &[DedupUmis, GroupUmis],
        ExpectedFile::Unused,
    ),
    ArtifactPolicy {
        id: "output_bam",
        role: Output,
        files: SampleNamed(artifacts::sample_bam),
        flags: &[],
        check: CheckMode::CompareUnless(Kind::Bam, DedupUmis),
        expected: ExpectedFile::SkipIfMissing,
        tsv: TsvProfile::STRICT,
    },
    ArtifactPolicy {
        id: "output_bai",
        role: Output,
        files: SampleNamed(artifacts::sample_bai),
        flags: &[],
        check: CheckMode::CompareUnless(Kind::FileSize, DedupUmis),
        expected: ExpectedFile::SkipIfMissing,
        tsv: TsvProfile::STRICT,
    },
    ArtifactPolicy::compare(
        "bedgraph",
        Output,
        PerSample(&[artifacts::MINUS_BEDGRAPH, artifacts::PLUS_BEDGRAPH]),
        &[MakeBedgraph],
        Kind::Bedgraph,
    ),
    ArtifactPolicy::compare("bam_to_h5", Output, SampleNamed(artifacts::sample_h5), &[], Kind::Hdf5)
        .skip_if_missing(),
    ArtifactPolicy::compare(
        "generate_stats_figs_tsv",
        Output,
        PerSample(&artifacts::SAMPLE_STATS_TSVS),
        &[],
        Kind::Tsv,
    )
    .skip_if_missing(),
    ArtifactPolicy::exists(
        "generate_stats_figs_pdf",
        Output,
        PerSample(&artifacts::SAMPLE_STATS_PDFS),
        &[OutputPdfs],
        ExpectedFile::SkipIfMissing,
    ),
    ArtifactPolicy::compare(
        "static_html",
        Output,
        SampleNamed(artifacts::sample_report_html),
        &[RunStaticHtml],
        Kind::Html,
    ),
    ArtifactPolicy {
        id: "collate_tpms",
        role: Output,
        files: Aggregate(artifacts::TPMS_ALL_CDS_ALL_SAMPLES_TSV),
        flags: &[],
        check: CheckMode::Compare(Kind::Tsv),
        expected: ExpectedFile::SkipIfMissing,
        tsv: TsvProfile::COLLATED,
    },
    ArtifactPolicy::compare(
        "read_counts",
        Output,
        Aggregate(artifacts::READ_COUNTS_PER_FILE_TSV),
        &[CountReads],
        Kind::ReadCounts,
    ),
];
