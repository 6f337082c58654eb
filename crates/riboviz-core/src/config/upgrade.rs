//! Upgrades legacy workflow configurations to the current parameter set.

use super::{ConfigError, ParamValue, WorkflowConfig, params};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
struct Rename {
    legacy: &'static str,
    current: &'static str,
}

/// Applied in order; the first legacy spelling of a current key wins.
const RENAMES: [Rename; 17] = [
    Rename {
        legacy: "Buffer",
        current: params::BUFFER,
    },
    Rename {
        legacy: "MaxReadLen",
        current: params::MAX_READ_LENGTH,
    },
    Rename {
        legacy: "MinReadLen",
        current: params::MIN_READ_LENGTH,
    },
    Rename {
        legacy: "PrimaryID",
        current: params::PRIMARY_ID,
    },
    Rename {
        legacy: "SecondID",
        current: params::SECONDARY_ID,
    },
    Rename {
        legacy: "StopInCDS",
        current: params::STOP_IN_FEATURE,
    },
    Rename {
        legacy: "StopInFeature",
        current: params::STOP_IN_FEATURE,
    },
    Rename {
        legacy: "stop_in_cds",
        current: params::STOP_IN_FEATURE,
    },
    Rename {
        legacy: "codon_pos",
        current: params::CODON_POSITIONS_FILE,
    },
    Rename {
        legacy: "nprocesses",
        current: params::NUM_PROCESSES,
    },
    Rename {
        legacy: "orf_fasta",
        current: params::ORF_FASTA_FILE,
    },
    Rename {
        legacy: "orf_index",
        current: params::ORF_INDEX_PREFIX,
    },
    Rename {
        legacy: "rRNA_fasta",
        current: params::RRNA_FASTA_FILE,
    },
    Rename {
        legacy: "rRNA_index",
        current: params::RRNA_INDEX_PREFIX,
    },
    Rename {
        legacy: "ribovizGFF",
        current: params::IS_RIBOVIZ_GFF,
    },
    Rename {
        legacy: "t_rna",
        current: params::T_RNA_FILE,
    },
    Rename {
        legacy: "do_pos_sp_nt_freq",
        current: params::OUTPUT_METAGENE_NORMALIZED_PROFILE,
    },
];

#[derive(Debug, Clone, Copy)]
enum DefaultValue {
    Null,
    Bool(bool),
    Integer(i64),
    Text(&'static str),
}

impl DefaultValue {
    fn to_param(self) -> ParamValue {
        match self {
            Self::Null => ParamValue::Null,
            Self::Bool(value) => ParamValue::Bool(value),
            Self::Integer(value) => ParamValue::Integer(value),
            Self::Text(value) => ParamValue::String(value.to_string()),
        }
    }
}

const DEFAULTS: [(&str, DefaultValue); 35] = [
    (params::ASITE_DISP_LENGTH_FILE, DefaultValue::Null),
    (params::CODON_POSITIONS_FILE, DefaultValue::Null),
    (params::COUNT_READS, DefaultValue::Bool(true)),
    (params::COUNT_THRESHOLD, DefaultValue::Integer(64)),
    (params::DEDUP_STATS, DefaultValue::Bool(false)),
    (params::DEDUP_UMIS, DefaultValue::Bool(false)),
    (params::EXTRACT_UMIS, DefaultValue::Bool(false)),
    (params::FEATURE, DefaultValue::Text("CDS")),
    (params::FEATURES_FILE, DefaultValue::Null),
    (params::FQ_FILES, DefaultValue::Null),
    (params::GROUP_UMIS, DefaultValue::Bool(false)),
    (params::MULTIPLEX_FQ_FILES, DefaultValue::Null),
    (params::OUTPUT_METAGENE_NORMALIZED_PROFILE, DefaultValue::Bool(true)),
    (params::OUTPUT_PDFS, DefaultValue::Bool(true)),
    (params::PUBLISH_INDEX_TMP, DefaultValue::Bool(false)),
    (params::RUN_STATIC_HTML, DefaultValue::Bool(true)),
    (params::SAMPLE_SHEET, DefaultValue::Null),
    (params::SAMSORT_MEMORY, DefaultValue::Null),
    (params::STOP_IN_FEATURE, DefaultValue::Bool(false)),
    (params::T_RNA_FILE, DefaultValue::Null),
    (params::TRIM_5P_MISMATCHES, DefaultValue::Bool(true)),
    (params::UMI_REGEXP, DefaultValue::Null),
    (params::JOB_EMAIL, DefaultValue::Null),
    (params::JOB_EMAIL_EVENTS, DefaultValue::Text("beas")),
    (params::JOB_MEMORY, DefaultValue::Text("8G")),
    (params::JOB_NAME, DefaultValue::Text("riboviz")),
    (params::JOB_NUM_CPUS, DefaultValue::Integer(4)),
    (params::JOB_PARALLEL_ENV, DefaultValue::Text("mpi")),
    (params::JOB_RUNTIME, DefaultValue::Text("48:00:00")),
    (params::NEXTFLOW_DAG_FILE, DefaultValue::Text("nextflow-dag.html")),
    (params::NEXTFLOW_REPORT_FILE, DefaultValue::Text("nextflow-report.html")),
    (params::NEXTFLOW_TIMELINE_FILE, DefaultValue::Text("nextflow-timeline.html")),
    (params::NEXTFLOW_TRACE_FILE, DefaultValue::Text("nextflow-trace.tsv")),
    (params::NEXTFLOW_WORK_DIR, DefaultValue::Text("work")),
    (params::VALIDATE_ONLY, DefaultValue::Bool(false)),
];

const INDEX_PREFIX_KEYS: [&str; 2] = [params::RRNA_INDEX_PREFIX, params::ORF_INDEX_PREFIX];

const OBSOLETE: [&str; 5] = ["aligner", "isTestRun", "is_test_run", "cmd_file", "dir_logs"];

/// Upgrades `config` in place.
///
/// Legacy names are renamed, missing parameters get their defaults, index
/// prefixes are reduced to their final path segment and obsolete parameters
/// are dropped. Applying it twice yields the same configuration as once.
pub fn upgrade_config(config: &mut WorkflowConfig) {
    apply_renames(config);
    apply_defaults(config);
    normalize_index_prefixes(config);
    remove_obsolete(config);
}

/// Parses, upgrades and re-serializes a YAML document.
pub fn upgrade_config_str(content: &str) -> Result<String, ConfigError> {
    let mut config = WorkflowConfig::from_yaml_str(content)?;
    upgrade_config(&mut config);
    config.to_yaml_string()
}

/// Upgrades `input`, writing YAML to `output` or to standard output.
pub fn upgrade_config_file(input: &Path, output: Option<&Path>) -> Result<(), ConfigError> {
    if !input.is_file() {
        return Err(ConfigError::InputNotAFile {
            path: input.to_path_buf(),
        });
    }

    let mut config = WorkflowConfig::from_path(input)?;
    upgrade_config(&mut config);

    match output {
        Some(path) => {
            config.write_to_path(path)?;
            info!(input = %input.display(), output = %path.display(), "upgraded configuration");
        }
        None => {
            let yaml = config.to_yaml_string()?;
            std::io::stdout()
                .lock()
                .write_all(yaml.as_bytes())
                .map_err(|source| ConfigError::Write {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
        }
    }
    Ok(())
}

fn apply_renames(config: &mut WorkflowConfig) {
    let mut renamed: Vec<&str> = Vec::new();
    for rename in RENAMES {
        if !config.contains(rename.legacy) {
            continue;
        }
        if renamed.contains(&rename.current) {
            debug!(
                legacy = rename.legacy,
                current = rename.current,
                "dropping later synonym"
            );
            config.remove(rename.legacy);
            continue;
        }
        debug!(legacy = rename.legacy, current = rename.current, "renaming parameter");
        config.rename(rename.legacy, rename.current);
        renamed.push(rename.current);
    }
}

fn apply_defaults(config: &mut WorkflowConfig) {
    for (key, default) in DEFAULTS {
        if !config.contains(key) {
            config.insert(key, default.to_param());
        }
    }
}

fn normalize_index_prefixes(config: &mut WorkflowConfig) {
    for key in INDEX_PREFIX_KEYS {
        let Some(prefix) = config.get(key).and_then(ParamValue::as_str) else {
            continue;
        };
        let file_name = final_path_segment(prefix).to_string();
        if file_name != prefix {
            config.insert(key, file_name);
        }
    }
}

fn remove_obsolete(config: &mut WorkflowConfig) {
    for key in OBSOLETE {
        if config.remove(key).is_some() {
            debug!(key, "removed obsolete parameter");
        }
    }
}

/// Text after the last `/`; empty when the value ends with a separator.
fn final_path_segment(value: &str) -> &str {
    value.rsplit('/').next().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULTS, OBSOLETE, RENAMES, final_path_segment, upgrade_config, upgrade_config_str};
    use crate::config::{ParamValue, WorkflowConfig, params};

    fn upgraded(yaml: &str) -> WorkflowConfig {
        let mut config = WorkflowConfig::from_yaml_str(yaml).expect("config should parse");
        upgrade_config(&mut config);
        config
    }

    #[test]
    fn legacy_names_are_renamed_and_values_kept() {
        let config = upgraded(
            "Buffer: 250\nMaxReadLen: 50\nMinReadLen: 10\nPrimaryID: Name\nnprocesses: 4\nribovizGFF: true\n",
        );

        assert_eq!(config.get("buffer"), Some(&ParamValue::Integer(250)));
        assert_eq!(config.get("max_read_length"), Some(&ParamValue::Integer(50)));
        assert_eq!(config.get("min_read_length"), Some(&ParamValue::Integer(10)));
        assert_eq!(config.get("primary_id"), Some(&ParamValue::from("Name")));
        assert_eq!(config.get("num_processes"), Some(&ParamValue::Integer(4)));
        assert_eq!(config.get("is_riboviz_gff"), Some(&ParamValue::Bool(true)));
        for legacy in ["Buffer", "MaxReadLen", "MinReadLen", "PrimaryID", "nprocesses", "ribovizGFF"] {
            assert!(!config.contains(legacy), "{legacy} should be removed");
        }
    }

    #[test]
    fn every_legacy_name_is_renamed_and_its_value_kept() {
        for (index, rename) in RENAMES.iter().enumerate() {
            let value = ParamValue::Integer(index as i64 + 1);
            let mut config = WorkflowConfig::new();
            config.insert(rename.legacy, value.clone());
            upgrade_config(&mut config);

            assert_eq!(config.get(rename.current), Some(&value), "{} should be renamed", rename.legacy);
            assert!(!config.contains(rename.legacy), "{} should be removed", rename.legacy);
        }
    }

    #[test]
    fn renamed_parameters_keep_their_position() {
        let config = upgraded("dir_in: input\nBuffer: 250\ndir_out: output\nnprocesses: 4\n");

        let leading = config.keys().take(4).collect::<Vec<_>>();
        assert_eq!(leading, vec!["dir_in", "buffer", "dir_out", "num_processes"]);
    }

    #[test]
    fn first_legacy_synonym_wins() {
        let config = upgraded("stop_in_cds: false\nStopInFeature: true\nStopInCDS: true\n");

        assert_eq!(config.get("stop_in_feature"), Some(&ParamValue::Bool(true)));
        assert!(!config.contains("StopInCDS"));
        assert!(!config.contains("StopInFeature"));
        assert!(!config.contains("stop_in_cds"));

        let config = upgraded("StopInFeature: false\nstop_in_cds: true\n");
        assert_eq!(config.get("stop_in_feature"), Some(&ParamValue::Bool(false)));
    }

    #[test]
    fn legacy_value_replaces_current_key() {
        let config = upgraded("buffer: 100\nBuffer: 250\n");
        assert_eq!(config.get("buffer"), Some(&ParamValue::Integer(250)));
    }

    #[test]
    fn missing_parameters_receive_defaults_without_overwriting() {
        let config = upgraded("count_threshold: 10\nfeature: UTR5\n");

        assert_eq!(config.get("count_threshold"), Some(&ParamValue::Integer(10)));
        assert_eq!(config.get("feature"), Some(&ParamValue::from("UTR5")));
        assert_eq!(config.get("dedup_umis"), Some(&ParamValue::Bool(false)));
        assert_eq!(config.get("job_runtime"), Some(&ParamValue::from("48:00:00")));
        assert_eq!(config.get("job_num_cpus"), Some(&ParamValue::Integer(4)));
        assert_eq!(config.get("sample_sheet"), Some(&ParamValue::Null));
        for (key, _) in DEFAULTS {
            assert!(config.contains(key), "{key} should be defaulted");
        }
    }

    #[test]
    fn index_prefixes_keep_only_final_segment() {
        let config = upgraded("orf_index: vignette/index/YAL_CDS_w_250\nrRNA_index: vignette/index/\n");

        assert_eq!(
            config.get(params::ORF_INDEX_PREFIX),
            Some(&ParamValue::from("YAL_CDS_w_250"))
        );
        assert_eq!(config.get(params::RRNA_INDEX_PREFIX), Some(&ParamValue::from("")));
        assert_eq!(final_path_segment("yeast_rRNA"), "yeast_rRNA");
    }

    #[test]
    fn absent_or_non_string_prefixes_are_left_alone() {
        let config = upgraded("orf_index_prefix: 7\n");

        assert_eq!(config.get(params::ORF_INDEX_PREFIX), Some(&ParamValue::Integer(7)));
        assert!(!config.contains(params::RRNA_INDEX_PREFIX));
    }

    #[test]
    fn obsolete_parameters_are_removed() {
        let mut config = WorkflowConfig::new();
        config.insert("dir_in", "input");
        for key in OBSOLETE {
            config.insert(key, true);
        }
        upgrade_config(&mut config);

        for key in OBSOLETE {
            assert!(!config.contains(key), "{key} should be removed");
        }
        assert_eq!(config.get("dir_in"), Some(&ParamValue::from("input")));
    }

    #[test]
    fn upgrading_twice_matches_upgrading_once() {
        let legacy = "Buffer: 250\norf_index: vignette/index/YAL_CDS_w_250\nis_test_run: false\nStopInCDS: false\n";
        let once = upgrade_config_str(legacy).expect("first upgrade should succeed");
        let twice = upgrade_config_str(&once).expect("second upgrade should succeed");

        assert_eq!(once, twice);
    }
}
