use super::tsv::{Table, TsvOptions, compare_tables, read_table};
use super::{CompareError, not_equivalent, parse_error};
use crate::domain::ComparatorKind;
use std::path::Path;

pub const FILE_COLUMN: &str = "File";

/// Compares read count summaries, ignoring the directories in the `File` column.
pub fn compare_read_counts(
    expected: &Path,
    actual: &Path,
    options: &TsvOptions,
) -> Result<(), CompareError> {
    let expected_table = load_with_file_names(expected, options)?;
    let actual_table = load_with_file_names(actual, options)?;
    compare_tables(&expected_table, &actual_table, options).map_err(|divergence| {
        not_equivalent(ComparatorKind::ReadCounts, expected, actual, divergence)
    })
}

fn load_with_file_names(path: &Path, options: &TsvOptions) -> Result<Table, CompareError> {
    let mut table = read_table(path, options)?;
    let column = table
        .column_index(FILE_COLUMN)
        .ok_or_else(|| parse_error(path, format!("missing '{}' column", FILE_COLUMN)))?;
    for row in &mut table.rows {
        if let Some(cell) = row.get_mut(column) {
            *cell = file_name(cell).to_string();
        }
    }
    Ok(table)
}

fn file_name(value: &str) -> &str {
    value.rsplit(['/', '\\']).next().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::compare_read_counts;
    use crate::compare::{CompareError, TsvOptions};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn directories_in_file_column_are_ignored() {
        let temp = TempDir::new().expect("tempdir should be created");
        let expected = temp.path().join("expected.tsv");
        let actual = temp.path().join("actual.tsv");
        fs::write(
            &expected,
            "SampleName\tProgram\tFile\tNumReads\tDescription\n\
             WTnone\tcutadapt\t/home/a/vignette/tmp/WTnone/trim.fq\t952\ttrimmed\n",
        )
        .expect("expected counts should be written");
        fs::write(
            &actual,
            "SampleName\tProgram\tFile\tNumReads\tDescription\n\
             WTnone\tcutadapt\tvignette/tmp/WTnone/trim.fq\t952\ttrimmed\n",
        )
        .expect("actual counts should be written");

        compare_read_counts(&expected, &actual, &TsvOptions::default())
            .expect("counts should match once paths are reduced");
    }

    #[test]
    fn count_changes_and_missing_column_are_reported() {
        let temp = TempDir::new().expect("tempdir should be created");
        let expected = temp.path().join("expected.tsv");
        let actual = temp.path().join("actual.tsv");
        let no_file = temp.path().join("no_file.tsv");
        fs::write(&expected, "SampleName\tFile\tNumReads\nWTnone\ta/trim.fq\t952\n")
            .expect("expected counts should be written");
        fs::write(&actual, "SampleName\tFile\tNumReads\nWTnone\tb/trim.fq\t951\n")
            .expect("actual counts should be written");
        fs::write(&no_file, "SampleName\tNumReads\nWTnone\t952\n")
            .expect("counts without File column should be written");

        let error = compare_read_counts(&expected, &actual, &TsvOptions::default())
            .expect_err("read counts differ");
        assert!(error.to_string().contains("column 'NumReads'"), "{error}");

        let error = compare_read_counts(&no_file, &actual, &TsvOptions::default())
            .expect_err("File column is required");
        assert!(matches!(error, CompareError::Parse { .. }));
    }
}
