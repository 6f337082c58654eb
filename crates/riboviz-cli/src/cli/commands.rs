use super::CliError;
use super::helpers::{ScratchDir, parse_comparator_kind};
use riboviz_core::compare::{CompareError, CompareOptions, IndexStrictness, compare_files};
use riboviz_core::config::upgrade_config_file;
use riboviz_core::domain::{ComparatorKind, RibovizError};
use riboviz_core::regression::{CheckSettings, render_human_summary, run_checks};
use riboviz_core::workflow::{DEFAULT_NEXTFLOW_PROGRAM, DEFAULT_WORKFLOW_FILE, NextflowRunner};
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct UpgradeConfigArgs {
    /// Configuration file to upgrade
    #[arg(short, long)]
    input: PathBuf,

    /// Write the upgraded configuration here instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct CheckArgs {
    /// Directory holding the expected index/, tmp/ and output/ trees
    #[arg(long)]
    expected: PathBuf,

    /// Workflow configuration file
    #[arg(long, default_value = "vignette/vignette_config.yaml")]
    config_file: PathBuf,

    /// Check existing outputs without running the workflow first
    #[arg(long)]
    skip_workflow: bool,

    /// Also check index and temporary files
    #[arg(long)]
    check_index_tmp: bool,

    /// JSON report output path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Scratch directory for sorted alignment copies
    #[arg(long)]
    scratch: Option<PathBuf>,

    /// Compare index files byte for byte instead of by size
    #[arg(long)]
    strict_index: bool,

    /// Nextflow executable
    #[arg(long, default_value = DEFAULT_NEXTFLOW_PROGRAM)]
    nextflow: String,

    /// Workflow script passed to nextflow
    #[arg(long, default_value = DEFAULT_WORKFLOW_FILE)]
    nextflow_workflow: PathBuf,

    /// h5diff executable used for HDF5 comparisons
    #[arg(long, default_value = riboviz_core::compare::DEFAULT_H5DIFF_PROGRAM)]
    h5diff: String,

    /// Only run checks whose <role>/<sample>/<file> path matches this glob
    #[arg(long, value_name = "GLOB")]
    only: Vec<String>,
}

impl CheckArgs {
    fn into_settings(self, scratch_root: PathBuf) -> (CheckSettings, NextflowRunner) {
        let mut settings = CheckSettings::new(self.expected, self.config_file);
        settings.skip_workflow = self.skip_workflow;
        settings.check_index_tmp = self.check_index_tmp;
        settings.scratch_root = scratch_root;
        settings.report_path = self.report;
        settings.index_strictness = index_strictness(self.strict_index);
        settings.h5diff_program = self.h5diff;
        settings.only = self.only;

        let runner = NextflowRunner {
            program: self.nextflow,
            workflow: self.nextflow_workflow,
        };
        (settings, runner)
    }
}

#[derive(clap::Args)]
pub(super) struct CompareArgs {
    /// Comparator: bytes, size, index, fastq, sam, bam, tsv, bedgraph, hdf5, html or read-counts
    #[arg(value_parser = parse_comparator_kind)]
    kind: ComparatorKind,

    /// Expected file
    expected: PathBuf,

    /// Actual file
    actual: PathBuf,

    /// Sort TSV rows before comparing
    #[arg(long)]
    ignore_row_order: bool,

    /// Treat NA markers and empty TSV cells as equal
    #[arg(long)]
    na_to_empty_str: bool,

    /// Compare index files byte for byte instead of by size
    #[arg(long)]
    strict: bool,

    /// Scratch directory for sorted alignment copies
    #[arg(long)]
    scratch: Option<PathBuf>,

    /// h5diff executable used for HDF5 comparisons
    #[arg(long, default_value = riboviz_core::compare::DEFAULT_H5DIFF_PROGRAM)]
    h5diff: String,
}

pub(super) fn run_upgrade_config_command(args: UpgradeConfigArgs) -> Result<i32, CliError> {
    upgrade_config_file(&args.input, args.output.as_deref()).map_err(RibovizError::from)?;
    if let Some(output) = &args.output {
        println!("Upgraded configuration: {}", output.display());
    }
    Ok(0)
}

pub(super) fn run_check_command(args: CheckArgs) -> Result<i32, CliError> {
    let scratch = ScratchDir::new(args.scratch.clone());
    let (settings, runner) = args.into_settings(scratch.path().to_path_buf());

    let result = run_checks(&settings, &runner);
    scratch.finish()?;
    let report = result?;
    println!("{}", render_human_summary(&report));
    if let Some(report_path) = &settings.report_path {
        println!("JSON report: {}", report_path.display());
    }

    if report.passed { Ok(0) } else { Ok(1) }
}

pub(super) fn run_compare_command(args: CompareArgs) -> Result<i32, CliError> {
    let scratch = ScratchDir::new(args.scratch);
    let mut options = CompareOptions {
        index_strictness: index_strictness(args.strict),
        h5diff_program: args.h5diff,
        ..CompareOptions::default()
    };
    options.tsv.ignore_row_order = args.ignore_row_order;
    options.tsv.na_to_empty_str = args.na_to_empty_str;

    let result = compare_files(
        args.kind,
        &args.expected,
        &args.actual,
        &options,
        scratch.path(),
    );
    scratch.finish()?;

    match result {
        Ok(()) => {
            println!("Equivalent: {}", args.kind);
            Ok(0)
        }
        Err(CompareError::NotEquivalent(mismatch)) => {
            println!("{}", mismatch);
            Ok(1)
        }
        Err(error) => Err(RibovizError::from(error).into()),
    }
}

fn index_strictness(strict: bool) -> IndexStrictness {
    if strict {
        IndexStrictness::ByteExact
    } else {
        IndexStrictness::SizeOnly
    }
}
