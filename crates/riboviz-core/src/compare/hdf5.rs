use super::{CompareError, not_equivalent};
use crate::domain::ComparatorKind;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Compares HDF5 datasets with `h5diff`: exit 0 is equal, 1 is different.
pub fn compare_h5(expected: &Path, actual: &Path, program: &str) -> Result<(), CompareError> {
    let output = Command::new(program)
        .arg(expected)
        .arg(actual)
        .output()
        .map_err(|source| CompareError::Tool {
            program: program.to_string(),
            source,
        })?;
    debug!(program, status = ?output.status.code(), "h5diff finished");

    match output.status.code() {
        Some(0) => Ok(()),
        Some(1) => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let summary = stdout
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or("datasets differ");
            Err(not_equivalent(ComparatorKind::Hdf5, expected, actual, summary))
        }
        Some(code) => Err(CompareError::ToolFailed {
            program: program.to_string(),
            expected: expected.to_path_buf(),
            actual: actual.to_path_buf(),
            status: format!(
                "exit code {}: {}",
                code,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        }),
        None => Err(CompareError::ToolFailed {
            program: program.to_string(),
            expected: expected.to_path_buf(),
            actual: actual.to_path_buf(),
            status: "terminated by signal".to_string(),
        }),
    }
}
