use riboviz_core::config::{ConfigError, ParamValue, WorkflowConfig, upgrade_config_file};
use riboviz_core::domain::RibovizError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LEGACY_CONFIG: &str = r#"
dir_in: vignette/input
dir_index: vignette/index
dir_tmp: vignette/tmp
dir_out: vignette/output
dir_logs: vignette/logs
cmd_file: run_riboviz_vignette.sh
rRNA_fasta: vignette/input/yeast_rRNA_R64-1-1.fa
orf_fasta: vignette/input/yeast_YAL_CDS_w_250utrs.fa
rRNA_index: vignette/index/yeast_rRNA
orf_index: vignette/index/YAL_CDS_w_250
nprocesses: 1
MinReadLen: 10
MaxReadLen: 50
Buffer: 250
PrimaryID: Name
SecondID: null
StopInCDS: false
ribovizGFF: true
isTestRun: false
aligner: hisat2
fq_files:
  WTnone: SRR1042855_s1mi.fastq.gz
  WT3AT: SRR1042864_s1mi.fastq.gz
"#;

#[test]
fn legacy_vignette_config_upgrades_to_current_schema() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = write_file(temp.path(), "vignette_config.yaml", LEGACY_CONFIG);
    let output = temp.path().join("upgraded.yaml");

    upgrade_config_file(&input, Some(&output)).expect("upgrade should succeed");
    let upgraded = WorkflowConfig::from_path(&output).expect("upgraded config should load");

    assert_eq!(upgraded.str_param("rrna_index_prefix").expect("prefix"), "yeast_rRNA");
    assert_eq!(upgraded.str_param("orf_index_prefix").expect("prefix"), "YAL_CDS_w_250");
    assert_eq!(
        upgraded.str_param("orf_fasta_file").expect("orf fasta"),
        "vignette/input/yeast_YAL_CDS_w_250utrs.fa"
    );
    assert_eq!(upgraded.int_param("num_processes").expect("processes"), 1);
    assert_eq!(upgraded.int_param("min_read_length").expect("min length"), 10);
    assert_eq!(upgraded.int_param("buffer").expect("buffer"), 250);
    assert!(!upgraded.bool_param("stop_in_feature").expect("stop flag"));
    assert!(upgraded.bool_param("is_riboviz_gff").expect("gff flag"));
    assert_eq!(upgraded.get("secondary_id"), Some(&ParamValue::Null));
    assert_eq!(upgraded.str_param("feature").expect("feature default"), "CDS");
    assert_eq!(upgraded.int_param("count_threshold").expect("threshold"), 64);
    assert_eq!(upgraded.str_param("job_runtime").expect("runtime"), "48:00:00");

    for removed in ["dir_logs", "cmd_file", "isTestRun", "aligner", "rRNA_index", "Buffer"] {
        assert!(!upgraded.contains(removed), "{removed} should be gone");
    }

    let samples = upgraded
        .map_param("fq_files")
        .expect("fq_files should be a mapping")
        .expect("fq_files should be present");
    assert_eq!(samples.keys().collect::<Vec<_>>(), ["WTnone", "WT3AT"]);
}

#[test]
fn upgraded_file_is_a_fixed_point() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = write_file(temp.path(), "config.yaml", LEGACY_CONFIG);
    let once = temp.path().join("once.yaml");
    let twice = temp.path().join("twice.yaml");

    upgrade_config_file(&input, Some(&once)).expect("first upgrade should succeed");
    upgrade_config_file(&once, Some(&twice)).expect("second upgrade should succeed");

    assert_eq!(
        fs::read_to_string(&once).expect("first output should be readable"),
        fs::read_to_string(&twice).expect("second output should be readable")
    );
}

#[test]
fn directories_and_missing_files_are_rejected_before_reading() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = temp.path().join("out.yaml");

    for input in [temp.path().to_path_buf(), temp.path().join("missing.yaml")] {
        let error = upgrade_config_file(&input, Some(&output)).expect_err("input is not a file");
        assert!(matches!(error, ConfigError::InputNotAFile { .. }), "{error}");
        assert_eq!(RibovizError::from(error).exit_code(), 2);
    }
    assert!(!output.exists(), "nothing is written for rejected input");
}

#[test]
fn non_mapping_document_is_a_parse_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = write_file(temp.path(), "list.yaml", "- a\n- b\n");

    let error = upgrade_config_file(&input, Some(&temp.path().join("out.yaml")))
        .expect_err("a list is not a configuration");
    assert!(matches!(error, ConfigError::NotAMapping { .. }), "{error}");
}

fn write_file(root: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = root.join(name);
    fs::write(&path, content).expect("file should be written");
    path
}
