//! Workflow parameter names.

pub const DIR_IN: &str = "dir_in";
pub const DIR_INDEX: &str = "dir_index";
pub const DIR_TMP: &str = "dir_tmp";
pub const DIR_OUT: &str = "dir_out";

pub const ORF_INDEX_PREFIX: &str = "orf_index_prefix";
pub const RRNA_INDEX_PREFIX: &str = "rrna_index_prefix";
pub const ORF_FASTA_FILE: &str = "orf_fasta_file";
pub const RRNA_FASTA_FILE: &str = "rrna_fasta_file";

pub const FQ_FILES: &str = "fq_files";
pub const MULTIPLEX_FQ_FILES: &str = "multiplex_fq_files";
pub const SAMPLE_SHEET: &str = "sample_sheet";

pub const BUILD_INDICES: &str = "build_indices";
pub const EXTRACT_UMIS: &str = "extract_umis";
pub const DEDUP_UMIS: &str = "dedup_umis";
pub const GROUP_UMIS: &str = "group_umis";
pub const DEDUP_STATS: &str = "dedup_stats";
pub const MAKE_BEDGRAPH: &str = "make_bedgraph";
pub const RUN_STATIC_HTML: &str = "run_static_html";
pub const OUTPUT_PDFS: &str = "output_pdfs";
pub const COUNT_READS: &str = "count_reads";

pub const ASITE_DISP_LENGTH_FILE: &str = "asite_disp_length_file";
pub const BUFFER: &str = "buffer";
pub const CODON_POSITIONS_FILE: &str = "codon_positions_file";
pub const COUNT_THRESHOLD: &str = "count_threshold";
pub const FEATURE: &str = "feature";
pub const FEATURES_FILE: &str = "features_file";
pub const IS_RIBOVIZ_GFF: &str = "is_riboviz_gff";
pub const MAX_READ_LENGTH: &str = "max_read_length";
pub const MIN_READ_LENGTH: &str = "min_read_length";
pub const NUM_PROCESSES: &str = "num_processes";
pub const OUTPUT_METAGENE_NORMALIZED_PROFILE: &str = "output_metagene_normalized_profile";
pub const PRIMARY_ID: &str = "primary_id";
pub const PUBLISH_INDEX_TMP: &str = "publish_index_tmp";
pub const SAMSORT_MEMORY: &str = "samsort_memory";
pub const SECONDARY_ID: &str = "secondary_id";
pub const STOP_IN_FEATURE: &str = "stop_in_feature";
pub const T_RNA_FILE: &str = "t_rna_file";
pub const TRIM_5P_MISMATCHES: &str = "trim_5p_mismatches";
pub const UMI_REGEXP: &str = "umi_regexp";

pub const JOB_EMAIL: &str = "job_email";
pub const JOB_EMAIL_EVENTS: &str = "job_email_events";
pub const JOB_MEMORY: &str = "job_memory";
pub const JOB_NAME: &str = "job_name";
pub const JOB_NUM_CPUS: &str = "job_num_cpus";
pub const JOB_PARALLEL_ENV: &str = "job_parallel_env";
pub const JOB_RUNTIME: &str = "job_runtime";
pub const NEXTFLOW_DAG_FILE: &str = "nextflow_dag_file";
pub const NEXTFLOW_REPORT_FILE: &str = "nextflow_report_file";
pub const NEXTFLOW_TIMELINE_FILE: &str = "nextflow_timeline_file";
pub const NEXTFLOW_TRACE_FILE: &str = "nextflow_trace_file";
pub const NEXTFLOW_WORK_DIR: &str = "nextflow_work_dir";
pub const VALIDATE_ONLY: &str = "validate_only";

/// Sample sheet column holding sample names.
pub const SAMPLE_ID_COLUMN: &str = "SampleID";
