//! File names the workflow writes, shared by planning and reporting.

pub mod paths;

pub use paths::{ResolvedDirs, expected_directory};

pub const TRIM_FQ: &str = "trim.fq";
pub const EXTRACT_TRIM_FQ: &str = "extract_trim.fq";
pub const NON_RRNA_FQ: &str = "nonrRNA.fq";
pub const UNALIGNED_FQ: &str = "unaligned.fq";
pub const RRNA_MAP_SAM: &str = "rRNA_map.sam";
pub const ORF_MAP_SAM: &str = "orf_map.sam";
pub const ORF_MAP_CLEAN_SAM: &str = "orf_map_clean.sam";
pub const ORF_MAP_CLEAN_BAM: &str = "orf_map_clean.bam";
pub const ORF_MAP_CLEAN_BAI: &str = "orf_map_clean.bam.bai";
pub const TRIM_5P_MISMATCH_TSV: &str = "trim_5p_mismatch.tsv";
pub const DEDUP_BAM: &str = "dedup.bam";
pub const DEDUP_BAI: &str = "dedup.bam.bai";
pub const PRE_DEDUP_GROUPS_TSV: &str = "pre_dedup_groups.tsv";
pub const POST_DEDUP_GROUPS_TSV: &str = "post_dedup_groups.tsv";
pub const MINUS_BEDGRAPH: &str = "minus.bedgraph";
pub const PLUS_BEDGRAPH: &str = "plus.bedgraph";

pub const BAI_EXT: &str = "bai";
pub const HT2_EXT: &str = "ht2";
pub const HT2_INDEX_COUNT: u32 = 8;

pub const DEDUP_STATS_PREFIX: &str = "dedup_stats";
pub const DEDUP_STATS_FILES: [&str; 3] = [
    "dedup_stats_edit_distance.tsv",
    "dedup_stats_per_umi.tsv",
    "dedup_stats_per_umi_per_position.tsv",
];

pub const TPMS_ALL_CDS_ALL_SAMPLES_TSV: &str = "TPMs_all_CDS_all_samples.tsv";
pub const READ_COUNTS_PER_FILE_TSV: &str = "read_counts_per_file.tsv";

/// Per-sample statistics tables written by the analysis step.
pub const SAMPLE_STATS_TSVS: [&str; 11] = [
    "metagene_start_stop_read_counts.tsv",
    "normalized_density_apesites_per_codon.tsv",
    "nt_freq_per_read_position.tsv",
    "metagene_normalized_profile_start_stop.tsv",
    "read_counts_by_length.tsv",
    "read_frame_per_orf.tsv",
    "read_frame_per_orf_filtered.tsv",
    "ORF_TPMs_vs_features.tsv",
    "gene_position_length_counts_5start.tsv",
    "normalized_density_apesites_per_codon_long.tsv",
    "ORF_TPMs_and_counts.tsv",
];

pub const SAMPLE_STATS_PDFS: [&str; 8] = [
    "metagene_start_stop_read_counts.pdf",
    "normalized_density_apesites_per_codon.pdf",
    "ORF_TPMs_vs_features.pdf",
    "metagene_normalized_profile_start_stop.pdf",
    "read_counts_by_length.pdf",
    "metagene_start_barplot_by_length.pdf",
    "metagene_start_ribogrid_by_length.pdf",
    "frame_proportions_per_ORF.pdf",
];

/// `<file>.bai` for a BAM file name.
pub fn bai_file(bam_file: &str) -> String {
    format!("{}.{}", bam_file, BAI_EXT)
}

/// HISAT2 index files `<prefix>.1.ht2` through `<prefix>.8.ht2`.
pub fn ht2_files(prefix: &str) -> Vec<String> {
    (1..=HT2_INDEX_COUNT)
        .map(|index| format!("{}.{}.{}", prefix, index, HT2_EXT))
        .collect()
}

pub fn sample_bam(sample: &str) -> String {
    format!("{}.bam", sample)
}

pub fn sample_bai(sample: &str) -> String {
    bai_file(&sample_bam(sample))
}

pub fn sample_h5(sample: &str) -> String {
    format!("{}.h5", sample)
}

pub fn sample_report_html(sample: &str) -> String {
    format!("{}_output_report.html", sample)
}

#[cfg(test)]
mod tests {
    use super::{
        DEDUP_BAI, DEDUP_BAM, DEDUP_STATS_FILES, DEDUP_STATS_PREFIX, ORF_MAP_CLEAN_BAI,
        ORF_MAP_CLEAN_BAM, bai_file, ht2_files, sample_bai, sample_report_html,
    };

    #[test]
    fn derived_names_follow_workflow_conventions() {
        assert_eq!(sample_bai("WTnone"), "WTnone.bam.bai");
        assert_eq!(bai_file(ORF_MAP_CLEAN_BAM), ORF_MAP_CLEAN_BAI);
        assert_eq!(bai_file(DEDUP_BAM), DEDUP_BAI);
        assert_eq!(sample_report_html("WT3AT"), "WT3AT_output_report.html");

        let files = ht2_files("YAL_CDS_w_250");
        assert_eq!(files.len(), 8);
        assert_eq!(files[0], "YAL_CDS_w_250.1.ht2");
        assert_eq!(files[7], "YAL_CDS_w_250.8.ht2");
    }

    #[test]
    fn dedup_stats_share_prefix() {
        for file in DEDUP_STATS_FILES {
            assert!(file.starts_with(DEDUP_STATS_PREFIX), "{file}");
            assert!(file.ends_with(".tsv"), "{file}");
        }
    }
}
