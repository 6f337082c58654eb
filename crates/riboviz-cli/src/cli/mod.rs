mod commands;
mod helpers;

use clap::Parser;
use riboviz_core::domain::RibovizError;

pub fn run_from_env() -> i32 {
    helpers::init_tracing();
    let args = std::env::args().collect::<Vec<_>>();

    match parse_and_dispatch(args) {
        Ok(code) => code,
        Err(error) => {
            let riboviz_error = error.as_riboviz_error();
            eprintln!("{}", riboviz_error.diagnostic_line());
            if let Some(summary_line) = riboviz_error.fatal_exit_line() {
                eprintln!("{}", summary_line);
            }
            riboviz_error.exit_code()
        }
    }
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => dispatch_parsed(cli.command),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "riboviz-rs",
    version,
    about = "RiboViz configuration upgrade and output verification"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Upgrade a workflow configuration file to the current schema
    UpgradeConfig(commands::UpgradeConfigArgs),
    /// Run the workflow and check its outputs against expected data
    Check(commands::CheckArgs),
    /// Compare one expected file against one actual file
    Compare(commands::CompareArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::UpgradeConfig(args) => commands::run_upgrade_config_command(args),
        CliCommand::Check(args) => commands::run_check_command(args),
        CliCommand::Compare(args) => commands::run_compare_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Core(RibovizError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<RibovizError> for CliError {
    fn from(error: RibovizError) -> Self {
        Self::Core(error)
    }
}

impl CliError {
    fn as_riboviz_error(&self) -> RibovizError {
        match self {
            Self::Usage(message) => {
                RibovizError::input_validation("INPUT.CLI_USAGE", message.clone())
            }
            Self::Core(error) => error.clone(),
            Self::Internal(error) => RibovizError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
