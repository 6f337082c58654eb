//! Runs the workflow, then checks each produced artifact against expected data.

pub mod plan;
pub mod policy;

pub use plan::{CheckPlan, FeatureFlag, FeatureFlags, PlanError, PlannedCheck};
pub use policy::{ArtifactPolicy, CheckMode, ExpectedFile, POLICIES, TsvProfile};

use crate::compare::{
    CompareError, CompareOptions, DEFAULT_H5DIFF_PROGRAM, IndexStrictness, TsvOptions,
    compare_files,
};
use crate::config::WorkflowConfig;
use crate::domain::{DirRole, RibovizError, RibovizResult};
use crate::workflow::{RunnerError, WorkflowRunner};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct CheckSettings {
    /// Root of the expected-data tree (`index/`, `tmp/`, `output/`, ...).
    pub expected_root: PathBuf,
    pub config_path: PathBuf,
    pub skip_workflow: bool,
    pub check_index_tmp: bool,
    /// Parent for per-check alignment scratch directories.
    pub scratch_root: PathBuf,
    pub report_path: Option<PathBuf>,
    pub index_strictness: IndexStrictness,
    pub h5diff_program: String,
    /// Glob filters over `<role>/<sample>/<file>`; empty selects every check.
    pub only: Vec<String>,
}

impl CheckSettings {
    pub fn new(expected_root: impl Into<PathBuf>, config_path: impl Into<PathBuf>) -> Self {
        Self {
            expected_root: expected_root.into(),
            config_path: config_path.into(),
            skip_workflow: false,
            check_index_tmp: false,
            scratch_root: default_scratch_root(),
            report_path: None,
            index_strictness: IndexStrictness::default(),
            h5diff_program: DEFAULT_H5DIFF_PROGRAM.to_string(),
            only: Vec::new(),
        }
    }
}

/// A fresh directory name under the system temporary directory.
pub fn default_scratch_root() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    std::env::temp_dir().join(format!(
        "riboviz-rs-scratch-{}-{}",
        std::process::id(),
        nanos
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    Passed,
    Failed { reason: String },
    Skipped { reason: String },
}

impl CheckOutcome {
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub id: String,
    pub role: DirRole,
    pub sample: Option<String>,
    pub file_name: String,
    pub expected_path: String,
    pub actual_path: String,
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub generated_at_unix_seconds: u64,
    pub passed: bool,
    pub config_path: String,
    pub expected_root: String,
    pub check_count: usize,
    pub passed_count: usize,
    pub failed_count: usize,
    pub skipped_count: usize,
    pub checks: Vec<CheckResult>,
}

impl CheckReport {
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|check| check.outcome.is_failure())
    }
}

pub fn run_checks(
    settings: &CheckSettings,
    runner: &dyn WorkflowRunner,
) -> RibovizResult<CheckReport> {
    let config = WorkflowConfig::from_path(&settings.config_path).map_err(RibovizError::from)?;
    let filter = build_filter(&settings.only).map_err(RibovizError::from)?;
    let plan = CheckPlan::from_config(&config, &settings.expected_root, settings.check_index_tmp)
        .map_err(RibovizError::from)?;

    if settings.skip_workflow {
        info!("skipping workflow run");
    } else {
        let code = runner.run(&settings.config_path).map_err(RibovizError::from)?;
        if code != 0 {
            return Err(RunnerError::NonZeroExit {
                code,
                config: settings.config_path.clone(),
            }
            .into());
        }
    }

    let options = CompareOptions {
        tsv: TsvOptions::default(),
        index_strictness: settings.index_strictness,
        h5diff_program: settings.h5diff_program.clone(),
    };
    let mut scratch = ScratchArea::new(&settings.scratch_root);
    let mut checks = Vec::new();
    for check in plan.planned_checks() {
        if filter
            .as_ref()
            .is_some_and(|filter| !filter.is_match(check.filter_path()))
        {
            continue;
        }

        let outcome = evaluate(&check, &plan, &options, &mut scratch);
        match &outcome {
            CheckOutcome::Passed => debug!(check = %check.id, "passed"),
            CheckOutcome::Skipped { reason } => debug!(check = %check.id, %reason, "skipped"),
            CheckOutcome::Failed { reason } => warn!(check = %check.id, %reason, "failed"),
        }
        checks.push(CheckResult {
            id: check.id,
            role: check.artifact.role,
            sample: check.artifact.sample,
            file_name: check.artifact.file_name,
            expected_path: normalize_path(&check.expected_path),
            actual_path: normalize_path(&check.actual_path),
            outcome,
        });
    }

    let check_count = checks.len();
    let failed_count = checks.iter().filter(|check| check.outcome.is_failure()).count();
    let skipped_count = checks
        .iter()
        .filter(|check| matches!(check.outcome, CheckOutcome::Skipped { .. }))
        .count();
    let passed_count = check_count - failed_count - skipped_count;
    info!(
        total = check_count,
        passed = passed_count,
        failed = failed_count,
        skipped = skipped_count,
        "checks complete"
    );

    let report = CheckReport {
        generated_at_unix_seconds: current_unix_timestamp_seconds(),
        passed: failed_count == 0,
        config_path: normalize_path(&settings.config_path),
        expected_root: normalize_path(&settings.expected_root),
        check_count,
        passed_count,
        failed_count,
        skipped_count,
        checks,
    };

    if let Some(report_path) = &settings.report_path {
        write_report_file(report_path, &report).map_err(RibovizError::from)?;
    }
    Ok(report)
}

fn evaluate(
    check: &PlannedCheck,
    plan: &CheckPlan,
    options: &CompareOptions,
    scratch: &mut ScratchArea,
) -> CheckOutcome {
    let policy = check.policy;
    if policy.role.is_index_or_tmp() && !plan.check_index_tmp {
        return CheckOutcome::skipped("index and temporary files are not checked");
    }
    if let Some(flag) = policy.flags.iter().find(|flag| !plan.flags.is_enabled(**flag)) {
        return CheckOutcome::skipped(format!("{} is false", flag.param_name()));
    }
    if policy.expected != ExpectedFile::Unused && !check.expected_path.exists() {
        let reason = format!("no expected file '{}'", normalize_path(&check.expected_path));
        // Demultiplexing decides at run time which samples receive reads.
        let demultiplexed = plan.multiplexed && check.artifact.sample.is_some();
        return if policy.expected == ExpectedFile::SkipIfMissing || demultiplexed {
            CheckOutcome::skipped(reason)
        } else {
            CheckOutcome::failed(reason)
        };
    }

    let kind = match policy.check {
        CheckMode::ExistsOnly => return existence(&check.actual_path),
        CheckMode::CompareUnless(_, flag) if plan.flags.is_enabled(flag) => {
            return existence(&check.actual_path);
        }
        CheckMode::Compare(kind) | CheckMode::CompareUnless(kind, _) => kind,
    };
    if !check.actual_path.exists() {
        return existence(&check.actual_path);
    }

    let scratch_dir = if kind.needs_scratch() {
        match scratch.allocate(&check.id) {
            Ok(dir) => dir,
            Err(error) => return CheckOutcome::failed(error.to_string()),
        }
    } else {
        scratch.root.clone()
    };
    let options = CompareOptions {
        tsv: TsvOptions {
            ignore_row_order: policy.tsv.ignore_row_order,
            na_to_empty_str: policy.tsv.na_to_empty_str,
            ..options.tsv
        },
        ..options.clone()
    };
    match compare_files(
        kind,
        &check.expected_path,
        &check.actual_path,
        &options,
        &scratch_dir,
    ) {
        Ok(()) => CheckOutcome::Passed,
        Err(error) => CheckOutcome::failed(error.to_string()),
    }
}

fn existence(actual: &Path) -> CheckOutcome {
    if actual.exists() {
        CheckOutcome::Passed
    } else {
        CheckOutcome::failed(format!("Non-existent file: {}", normalize_path(actual)))
    }
}

/// Hands out one fresh scratch directory per alignment comparison.
///
/// Directory names carry a random suffix, so a root can be shared between runs.
struct ScratchArea {
    root: PathBuf,
    allocated: usize,
}

impl ScratchArea {
    fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            allocated: 0,
        }
    }

    fn allocate(&mut self, check_id: &str) -> Result<PathBuf, CompareError> {
        let scratch_error = |source| CompareError::Scratch {
            path: self.root.clone(),
            source,
        };
        fs::create_dir_all(&self.root).map_err(scratch_error)?;

        self.allocated += 1;
        let slug = check_id
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() || ch == '.' { ch } else { '-' })
            .collect::<String>();
        let dir = tempfile::Builder::new()
            .prefix(&format!("{:04}-{}-", self.allocated, slug))
            .tempdir_in(&self.root)
            .map_err(scratch_error)?;
        Ok(dir.keep())
    }
}

fn build_filter(patterns: &[String]) -> Result<Option<GlobSet>, CheckError> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| CheckError::InvalidFilter {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map(Some)
        .map_err(|source| CheckError::InvalidFilter {
            pattern: patterns.join(", "),
            source,
        })
}

pub fn render_human_summary(report: &CheckReport) -> String {
    let mut lines = Vec::new();
    let status = if report.passed { "PASS" } else { "FAIL" };
    lines.push(format!("Check status: {}", status));
    lines.push(format!(
        "Checks: {} total ({} passed, {} failed, {} skipped)",
        report.check_count, report.passed_count, report.failed_count, report.skipped_count
    ));
    for check in report.failures() {
        if let CheckOutcome::Failed { reason } = &check.outcome {
            lines.push(format!("FAIL {}: {}", check.id, reason));
        }
    }
    lines.join("\n")
}

#[derive(Debug)]
pub enum CheckError {
    InvalidFilter {
        pattern: String,
        source: globset::Error,
    },
    ReportDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    SerializeReport {
        path: PathBuf,
        source: serde_json::Error,
    },
    WriteReport {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for CheckError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFilter { pattern, source } => {
                write!(f, "invalid artifact filter '{}': {}", pattern, source)
            }
            Self::ReportDirectory { path, source } => write!(
                f,
                "failed to create report directory '{}': {}",
                path.display(),
                source
            ),
            Self::SerializeReport { path, source } => write!(
                f,
                "failed to serialize report '{}': {}",
                path.display(),
                source
            ),
            Self::WriteReport { path, source } => {
                write!(f, "failed to write report '{}': {}", path.display(), source)
            }
        }
    }
}

impl Error for CheckError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidFilter { source, .. } => Some(source),
            Self::ReportDirectory { source, .. } | Self::WriteReport { source, .. } => Some(source),
            Self::SerializeReport { source, .. } => Some(source),
        }
    }
}

impl From<CheckError> for RibovizError {
    fn from(error: CheckError) -> Self {
        let message = error.to_string();
        match error {
            CheckError::InvalidFilter { .. } => {
                RibovizError::input_validation("INPUT.CHECK_FILTER", message)
            }
            CheckError::ReportDirectory { .. } | CheckError::WriteReport { .. } => {
                RibovizError::io_system("IO.CHECK_REPORT", message)
            }
            CheckError::SerializeReport { .. } => {
                RibovizError::internal("SYS.CHECK_REPORT", message)
            }
        }
    }
}

fn write_report_file(report_path: &Path, report: &CheckReport) -> Result<(), CheckError> {
    if let Some(parent_dir) = report_path.parent() {
        fs::create_dir_all(parent_dir).map_err(|source| CheckError::ReportDirectory {
            path: parent_dir.to_path_buf(),
            source,
        })?;
    }

    let report_json =
        serde_json::to_string_pretty(report).map_err(|source| CheckError::SerializeReport {
            path: report_path.to_path_buf(),
            source,
        })?;
    fs::write(report_path, report_json).map_err(|source| CheckError::WriteReport {
        path: report_path.to_path_buf(),
        source,
    })
}

fn current_unix_timestamp_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
