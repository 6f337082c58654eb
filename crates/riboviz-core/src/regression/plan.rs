use super::policy::{ArtifactFiles, ArtifactPolicy, POLICIES};
use crate::artifacts::{self, ResolvedDirs};
use crate::config::{ConfigError, WorkflowConfig, params};
use crate::domain::{ArtifactRef, RibovizError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Workflow switches that decide whether an artifact is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureFlag {
    BuildIndices,
    ExtractUmis,
    DedupUmis,
    GroupUmis,
    DedupStats,
    MakeBedgraph,
    RunStaticHtml,
    OutputPdfs,
    CountReads,
}

impl FeatureFlag {
    pub const ALL: [FeatureFlag; 9] = [
        Self::BuildIndices,
        Self::ExtractUmis,
        Self::DedupUmis,
        Self::GroupUmis,
        Self::DedupStats,
        Self::MakeBedgraph,
        Self::RunStaticHtml,
        Self::OutputPdfs,
        Self::CountReads,
    ];

    pub const fn param_name(self) -> &'static str {
        match self {
            Self::BuildIndices => params::BUILD_INDICES,
            Self::ExtractUmis => params::EXTRACT_UMIS,
            Self::DedupUmis => params::DEDUP_UMIS,
            Self::GroupUmis => params::GROUP_UMIS,
            Self::DedupStats => params::DEDUP_STATS,
            Self::MakeBedgraph => params::MAKE_BEDGRAPH,
            Self::RunStaticHtml => params::RUN_STATIC_HTML,
            Self::OutputPdfs => params::OUTPUT_PDFS,
            Self::CountReads => params::COUNT_READS,
        }
    }

    /// Value the workflow assumes when the parameter is absent.
    pub const fn default_value(self) -> bool {
        match self {
            Self::BuildIndices
            | Self::MakeBedgraph
            | Self::RunStaticHtml
            | Self::OutputPdfs
            | Self::CountReads => true,
            Self::ExtractUmis | Self::DedupUmis | Self::GroupUmis | Self::DedupStats => false,
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    enabled: [bool; FeatureFlag::ALL.len()],
}

impl Default for FeatureFlags {
    fn default() -> Self {
        let mut enabled = [false; FeatureFlag::ALL.len()];
        for flag in FeatureFlag::ALL {
            enabled[flag.slot()] = flag.default_value();
        }
        Self { enabled }
    }
}

impl FeatureFlags {
    pub fn from_config(config: &WorkflowConfig) -> Result<Self, ConfigError> {
        let mut flags = Self::default();
        for flag in FeatureFlag::ALL {
            let value = config.bool_param_or(flag.param_name(), flag.default_value())?;
            flags.set(flag, value);
        }
        Ok(flags)
    }

    pub const fn is_enabled(&self, flag: FeatureFlag) -> bool {
        self.enabled[flag.slot()]
    }

    pub fn set(&mut self, flag: FeatureFlag, enabled: bool) {
        self.enabled[flag.slot()] = enabled;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read sample sheet '{}': {source}", path.display())]
    SampleSheet {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("sample sheet '{}' has no '{column}' column", path.display())]
    MissingSampleColumn { path: PathBuf, column: &'static str },
    #[error(
        "index and temporary files are not checked for multiplexed runs; drop the index/tmp check option"
    )]
    MultiplexedIndexTmp,
}

impl From<PlanError> for RibovizError {
    fn from(error: PlanError) -> Self {
        let message = error.to_string();
        match error {
            PlanError::Config(source) => source.into(),
            PlanError::SampleSheet { ref source, .. } if source.is_io_error() => {
                RibovizError::io_system("IO.SAMPLE_SHEET", message)
            }
            PlanError::SampleSheet { .. } | PlanError::MissingSampleColumn { .. } => {
                RibovizError::input_validation("INPUT.SAMPLE_SHEET", message)
            }
            PlanError::MultiplexedIndexTmp => {
                RibovizError::input_validation("INPUT.CHECK_INDEX_TMP", message)
            }
        }
    }
}

/// Everything needed to enumerate the checks for one workflow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckPlan {
    pub dirs: ResolvedDirs,
    pub orf_index_prefix: Option<String>,
    pub rrna_index_prefix: Option<String>,
    pub samples: Vec<String>,
    pub flags: FeatureFlags,
    pub multiplexed: bool,
    pub check_index_tmp: bool,
}

/// One artifact to check, with both resolved locations.
#[derive(Debug, Clone)]
pub struct PlannedCheck {
    pub id: String,
    pub policy: &'static ArtifactPolicy,
    pub artifact: ArtifactRef,
    pub expected_path: PathBuf,
    pub actual_path: PathBuf,
}

impl PlannedCheck {
    /// `<role>/<sample>/<file>`, matched by artifact filters.
    pub fn filter_path(&self) -> String {
        format!("{}/{}", self.artifact.role.as_str(), self.artifact.relative_path())
    }
}

impl CheckPlan {
    pub fn from_config(
        config: &WorkflowConfig,
        expected_root: &Path,
        check_index_tmp: bool,
    ) -> Result<Self, PlanError> {
        let dirs = ResolvedDirs::new(
            Path::new(config.str_param(params::DIR_INDEX)?),
            Path::new(config.str_param(params::DIR_TMP)?),
            Path::new(config.str_param(params::DIR_OUT)?),
            expected_root,
        );
        debug!(
            index = %dirs.expected_index.display(),
            tmp = %dirs.expected_tmp.display(),
            output = %dirs.expected_output.display(),
            "resolved expected directories"
        );

        let multiplexed = config
            .get(params::MULTIPLEX_FQ_FILES)
            .is_some_and(|value| !value.is_null());
        if multiplexed && check_index_tmp {
            return Err(PlanError::MultiplexedIndexTmp);
        }

        let samples = if multiplexed {
            let dir_in = config.str_param(params::DIR_IN)?;
            let sample_sheet = config.str_param(params::SAMPLE_SHEET)?;
            read_sample_sheet(&Path::new(dir_in).join(sample_sheet))?
        } else {
            config
                .map_param(params::FQ_FILES)?
                .map(|samples| samples.keys().cloned().collect())
                .unwrap_or_default()
        };

        Ok(Self {
            dirs,
            orf_index_prefix: config.opt_str_param(params::ORF_INDEX_PREFIX)?.map(str::to_string),
            rrna_index_prefix: config
                .opt_str_param(params::RRNA_INDEX_PREFIX)?
                .map(str::to_string),
            samples,
            flags: FeatureFlags::from_config(config)?,
            multiplexed,
            check_index_tmp,
        })
    }

    /// Every (policy, artifact) pair in policy-table order.
    pub fn planned_checks(&self) -> Vec<PlannedCheck> {
        POLICIES
            .iter()
            .flat_map(|policy| {
                self.artifacts_for(policy)
                    .into_iter()
                    .map(move |artifact| self.planned_check(policy, artifact))
            })
            .collect()
    }

    fn planned_check(&self, policy: &'static ArtifactPolicy, artifact: ArtifactRef) -> PlannedCheck {
        PlannedCheck {
            id: format!("{}:{}", policy.id, artifact.relative_path()),
            expected_path: self.dirs.expected_path(&artifact),
            actual_path: self.dirs.actual_path(&artifact),
            policy,
            artifact,
        }
    }

    fn artifacts_for(&self, policy: &ArtifactPolicy) -> Vec<ArtifactRef> {
        let role = policy.role;
        match policy.files {
            ArtifactFiles::IndexFiles => [&self.orf_index_prefix, &self.rrna_index_prefix]
                .into_iter()
                .flatten()
                .filter(|prefix| !prefix.is_empty())
                .flat_map(|prefix| artifacts::ht2_files(prefix))
                .map(|file_name| ArtifactRef::shared(role, file_name))
                .collect(),
            ArtifactFiles::PerSample(file_names) => self
                .samples
                .iter()
                .flat_map(|sample| {
                    file_names
                        .iter()
                        .map(move |file_name| ArtifactRef::per_sample(role, sample.as_str(), *file_name))
                })
                .collect(),
            ArtifactFiles::SampleNamed(file_name) => self
                .samples
                .iter()
                .map(|sample| ArtifactRef::per_sample(role, sample.as_str(), file_name(sample)))
                .collect(),
            ArtifactFiles::Aggregate(file_name) => vec![ArtifactRef::shared(role, file_name)],
        }
    }
}

fn read_sample_sheet(path: &Path) -> Result<Vec<String>, PlanError> {
    let sheet_error = |source: csv::Error| PlanError::SampleSheet {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .comment(Some(b'#'))
        .flexible(true)
        .quoting(false)
        .from_path(path)
        .map_err(sheet_error)?;

    let column = reader
        .headers()
        .map_err(sheet_error)?
        .iter()
        .position(|header| header.trim() == params::SAMPLE_ID_COLUMN)
        .ok_or_else(|| PlanError::MissingSampleColumn {
            path: path.to_path_buf(),
            column: params::SAMPLE_ID_COLUMN,
        })?;

    let mut samples = Vec::new();
    for record in reader.records() {
        let record = record.map_err(sheet_error)?;
        if let Some(sample) = record.get(column).map(str::trim).filter(|name| !name.is_empty()) {
            samples.push(sample.to_string());
        }
    }
    Ok(samples)
}
