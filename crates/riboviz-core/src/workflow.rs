//! Launching the analysis workflow whose outputs are checked.

use crate::domain::RibovizError;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

pub const DEFAULT_NEXTFLOW_PROGRAM: &str = "nextflow";
pub const DEFAULT_WORKFLOW_FILE: &str = "prep_riboviz.nf";

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("failed to execute workflow command '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("workflow command '{program}' was terminated by signal")]
    Signalled { program: String },
    #[error("workflow returned non-zero exit code {code} for configuration '{}'", config.display())]
    NonZeroExit { code: i32, config: PathBuf },
}

impl From<RunnerError> for RibovizError {
    fn from(error: RunnerError) -> Self {
        let message = error.to_string();
        match error {
            RunnerError::Launch { .. } => RibovizError::io_system("IO.WORKFLOW_EXEC", message),
            RunnerError::Signalled { .. } | RunnerError::NonZeroExit { .. } => {
                RibovizError::computation("RUN.WORKFLOW", message)
            }
        }
    }
}

/// Runs the workflow once for a configuration and reports its exit status.
pub trait WorkflowRunner {
    fn run(&self, config_path: &Path) -> Result<i32, RunnerError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextflowRunner {
    pub program: String,
    pub workflow: PathBuf,
}

impl Default for NextflowRunner {
    fn default() -> Self {
        Self {
            program: DEFAULT_NEXTFLOW_PROGRAM.to_string(),
            workflow: PathBuf::from(DEFAULT_WORKFLOW_FILE),
        }
    }
}

impl NextflowRunner {
    pub fn command(&self, config_path: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("run")
            .arg(&self.workflow)
            .arg("-params-file")
            .arg(config_path)
            .arg("-ansi-log")
            .arg("false");
        command
    }
}

impl WorkflowRunner for NextflowRunner {
    fn run(&self, config_path: &Path) -> Result<i32, RunnerError> {
        info!(
            program = %self.program,
            workflow = %self.workflow.display(),
            config = %config_path.display(),
            "running workflow"
        );
        let status = self
            .command(config_path)
            .status()
            .map_err(|source| RunnerError::Launch {
                program: self.program.clone(),
                source,
            })?;

        status.code().ok_or_else(|| RunnerError::Signalled {
            program: self.program.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{NextflowRunner, RunnerError, WorkflowRunner};
    use crate::domain::RibovizError;
    use std::path::{Path, PathBuf};

    #[test]
    fn nextflow_command_passes_params_file() {
        let runner = NextflowRunner::default();
        let command = runner.command(Path::new("vignette/vignette_config.yaml"));

        assert_eq!(command.get_program(), "nextflow");
        let args = command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(
            args,
            vec![
                "run",
                "prep_riboviz.nf",
                "-params-file",
                "vignette/vignette_config.yaml",
                "-ansi-log",
                "false"
            ]
        );
    }

    #[test]
    fn missing_program_is_a_launch_error() {
        let runner = NextflowRunner {
            program: "riboviz-rs-missing-nextflow".to_string(),
            workflow: PathBuf::from("prep_riboviz.nf"),
        };

        let error = runner
            .run(Path::new("config.yaml"))
            .expect_err("missing program should fail");
        assert!(matches!(error, RunnerError::Launch { .. }));
        assert_eq!(RibovizError::from(error).placeholder(), "IO.WORKFLOW_EXEC");
    }

    #[test]
    fn non_zero_exit_maps_to_workflow_failure() {
        let error = RunnerError::NonZeroExit {
            code: 1,
            config: PathBuf::from("config.yaml"),
        };
        let converted = RibovizError::from(error);

        assert_eq!(converted.placeholder(), "RUN.WORKFLOW");
        assert_eq!(converted.exit_code(), 4);
    }
}
