use super::numeric::{NumericTolerance, values_within_tolerance};
use super::{CompareError, not_equivalent, parse_error};
use crate::domain::ComparatorKind;
use std::path::Path;

/// Spellings of "not available" that different writers emit.
pub const NA_MARKERS: [&str; 6] = ["", "NA", "NaN", "nan", "N/A", "<NA>"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TsvOptions {
    pub ignore_row_order: bool,
    pub na_to_empty_str: bool,
    pub comment_prefix: Option<u8>,
    pub tolerance: NumericTolerance,
}

impl Default for TsvOptions {
    fn default() -> Self {
        Self {
            ignore_row_order: false,
            na_to_empty_str: false,
            comment_prefix: Some(b'#'),
            tolerance: NumericTolerance::default(),
        }
    }
}

/// A header row plus data rows, cells kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Table {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

impl Table {
    pub(crate) fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}

pub fn compare_tsv(expected: &Path, actual: &Path, options: &TsvOptions) -> Result<(), CompareError> {
    let expected_table = read_table(expected, options)?;
    let actual_table = read_table(actual, options)?;
    compare_tables(&expected_table, &actual_table, options)
        .map_err(|divergence| not_equivalent(ComparatorKind::Tsv, expected, actual, divergence))
}

pub(crate) fn read_table(path: &Path, options: &TsvOptions) -> Result<Table, CompareError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .comment(options.comment_prefix)
        .from_path(path)
        .map_err(|source| table_error(path, source))?;

    let columns = reader
        .headers()
        .map_err(|source| table_error(path, source))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| table_error(path, source))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table { columns, rows })
}

fn table_error(path: &Path, source: csv::Error) -> CompareError {
    let message = source.to_string();
    match source.into_kind() {
        csv::ErrorKind::Io(source) => CompareError::Read {
            path: path.to_path_buf(),
            source,
        },
        _ => parse_error(path, message),
    }
}

/// Returns a description of the first divergence, if any.
pub(crate) fn compare_tables(
    expected: &Table,
    actual: &Table,
    options: &TsvOptions,
) -> Result<(), String> {
    if expected.columns != actual.columns {
        return Err(format!(
            "header differs (expected [{}], actual [{}])",
            expected.columns.join(", "),
            actual.columns.join(", ")
        ));
    }
    if expected.rows.len() != actual.rows.len() {
        return Err(format!(
            "row count differs (expected {}, actual {})",
            expected.rows.len(),
            actual.rows.len()
        ));
    }

    let expected_rows = prepare_rows(&expected.rows, options);
    let actual_rows = prepare_rows(&actual.rows, options);
    compare_rows(&expected.columns, &expected_rows, &actual_rows, options.tolerance)
}

pub(crate) fn compare_rows(
    columns: &[String],
    expected_rows: &[Vec<String>],
    actual_rows: &[Vec<String>],
    tolerance: NumericTolerance,
) -> Result<(), String> {
    if expected_rows.len() != actual_rows.len() {
        return Err(format!(
            "row count differs (expected {}, actual {})",
            expected_rows.len(),
            actual_rows.len()
        ));
    }

    for (row_index, (expected_row, actual_row)) in expected_rows.iter().zip(actual_rows).enumerate() {
        let row_number = row_index + 1;
        if expected_row.len() != actual_row.len() {
            return Err(format!(
                "row {} has {} fields, expected {}",
                row_number,
                actual_row.len(),
                expected_row.len()
            ));
        }

        for (column_index, (expected_cell, actual_cell)) in
            expected_row.iter().zip(actual_row).enumerate()
        {
            if !cells_equivalent(expected_cell, actual_cell, tolerance) {
                let column = columns
                    .get(column_index)
                    .map_or_else(|| format!("#{}", column_index + 1), |name| format!("'{}'", name));
                return Err(format!(
                    "row {} column {}: expected '{}', actual '{}'",
                    row_number, column, expected_cell, actual_cell
                ));
            }
        }
    }

    Ok(())
}

fn prepare_rows(rows: &[Vec<String>], options: &TsvOptions) -> Vec<Vec<String>> {
    let mut prepared = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| normalize_cell(cell, options.na_to_empty_str))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    if options.ignore_row_order {
        prepared.sort();
    }
    prepared
}

fn normalize_cell(cell: &str, na_to_empty_str: bool) -> String {
    let trimmed = cell.trim();
    if na_to_empty_str && NA_MARKERS.contains(&trimmed) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Text-equal cells match; otherwise both must parse as numbers within tolerance.
pub(crate) fn cells_equivalent(expected: &str, actual: &str, tolerance: NumericTolerance) -> bool {
    if expected == actual {
        return true;
    }

    match (expected.parse::<f64>(), actual.parse::<f64>()) {
        (Ok(expected_value), Ok(actual_value)) => {
            values_within_tolerance(expected_value, actual_value, tolerance)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{TsvOptions, cells_equivalent, compare_tsv};
    use crate::compare::{CompareError, NumericTolerance};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const COUNTS: &str = "# generated by collate\nORF\tWTnone\tWT3AT\nYAL001C\t1.5\t0\nYAL003W\t10\tNA\n";

    #[test]
    fn comment_lines_are_skipped_and_small_numeric_drift_is_tolerated() {
        let temp = TempDir::new().expect("tempdir should be created");
        let expected = write_file(temp.path(), "expected.tsv", COUNTS);
        let actual = write_file(
            temp.path(),
            "actual.tsv",
            "ORF\tWTnone\tWT3AT\nYAL001C\t1.50004\t0.0\nYAL003W\t10\tNA\n",
        );

        compare_tsv(&expected, &actual, &TsvOptions::default())
            .expect("tables within tolerance should match");
    }

    #[test]
    fn quote_characters_are_plain_cell_text() {
        let temp = TempDir::new().expect("tempdir should be created");
        let table = "Gene\tNote\tCount\nYAL001C\t\"partial\t4\nYAL003W\tfull\t9\n";
        let expected = write_file(temp.path(), "expected.tsv", table);
        let actual = write_file(temp.path(), "actual.tsv", &table.replace("\t9", "\t8"));

        let error = compare_tsv(&expected, &actual, &TsvOptions::default())
            .expect_err("second row count differs");
        let CompareError::NotEquivalent(mismatch) = error else {
            panic!("expected a mismatch");
        };
        assert_eq!(mismatch.divergence, "row 2 column 'Count': expected '9', actual '8'");
    }

    #[test]
    fn row_order_matters_unless_ignored() {
        let temp = TempDir::new().expect("tempdir should be created");
        let expected = write_file(temp.path(), "expected.tsv", COUNTS);
        let actual = write_file(
            temp.path(),
            "actual.tsv",
            "ORF\tWTnone\tWT3AT\nYAL003W\t10\tNA\nYAL001C\t1.5\t0\n",
        );

        let error = compare_tsv(&expected, &actual, &TsvOptions::default())
            .expect_err("reordered rows should differ by default");
        let CompareError::NotEquivalent(mismatch) = error else {
            panic!("expected a mismatch");
        };
        assert_eq!(
            mismatch.divergence,
            "row 1 column 'ORF': expected 'YAL001C', actual 'YAL003W'"
        );

        let options = TsvOptions {
            ignore_row_order: true,
            ..TsvOptions::default()
        };
        compare_tsv(&expected, &actual, &options).expect("row order should be ignored");
    }

    #[test]
    fn na_markers_match_empty_cells_only_when_requested() {
        let temp = TempDir::new().expect("tempdir should be created");
        let expected = write_file(temp.path(), "expected.tsv", COUNTS);
        let actual = write_file(
            temp.path(),
            "actual.tsv",
            "ORF\tWTnone\tWT3AT\nYAL001C\t1.5\t0\nYAL003W\t10\t\n",
        );

        assert!(compare_tsv(&expected, &actual, &TsvOptions::default()).is_err());

        let options = TsvOptions {
            na_to_empty_str: true,
            ..TsvOptions::default()
        };
        compare_tsv(&expected, &actual, &options).expect("NA should equal empty");
    }

    #[test]
    fn header_and_shape_differences_are_reported() {
        let temp = TempDir::new().expect("tempdir should be created");
        let expected = write_file(temp.path(), "expected.tsv", COUNTS);
        let swapped = write_file(temp.path(), "swapped.tsv", "ORF\tWT3AT\tWTnone\nYAL001C\t0\t1.5\nYAL003W\tNA\t10\n");
        let short = write_file(temp.path(), "short.tsv", "ORF\tWTnone\tWT3AT\nYAL001C\t1.5\t0\n");

        let error = compare_tsv(&expected, &swapped, &TsvOptions::default()).expect_err("column order");
        assert!(error.to_string().contains("header differs"), "{error}");

        let error = compare_tsv(&expected, &short, &TsvOptions::default()).expect_err("row count");
        assert!(error.to_string().contains("row count differs (expected 2, actual 1)"), "{error}");
    }

    #[test]
    fn cell_equivalence_is_textual_for_non_numbers() {
        let tolerance = NumericTolerance::default();
        assert!(cells_equivalent("CDS", "CDS", tolerance));
        assert!(!cells_equivalent("CDS", "UTR5", tolerance));
        assert!(cells_equivalent("1e-5", "0", tolerance));
        assert!(!cells_equivalent("1", "one", tolerance));
    }

    fn write_file(root: &Path, name: &str, content: &str) -> PathBuf {
        let path = root.join(name);
        fs::write(&path, content).expect("file should be written");
        path
    }
}
