use super::numeric::NumericTolerance;
use super::tsv::compare_rows;
use super::{CompareError, not_equivalent, parse_error, read_text};
use crate::domain::ComparatorKind;
use std::path::Path;

const BEDGRAPH_COLUMNS: [&str; 4] = ["chrom", "start", "end", "count"];

pub fn compare_bedgraph(
    expected: &Path,
    actual: &Path,
    tolerance: NumericTolerance,
) -> Result<(), CompareError> {
    let expected_rows = read_bedgraph(expected)?;
    let actual_rows = read_bedgraph(actual)?;
    let columns = BEDGRAPH_COLUMNS.map(str::to_string);
    compare_rows(&columns, &expected_rows, &actual_rows, tolerance)
        .map_err(|divergence| not_equivalent(ComparatorKind::Bedgraph, expected, actual, divergence))
}

fn read_bedgraph(path: &Path) -> Result<Vec<Vec<String>>, CompareError> {
    let content = read_text(path)?;
    let mut rows = Vec::new();
    for (line_index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_metadata_line(trimmed) {
            continue;
        }

        let fields = trimmed.split_whitespace().map(str::to_string).collect::<Vec<_>>();
        if fields.len() != BEDGRAPH_COLUMNS.len() {
            return Err(parse_error(
                path,
                format!(
                    "line {} has {} fields, expected {}",
                    line_index + 1,
                    fields.len(),
                    BEDGRAPH_COLUMNS.len()
                ),
            ));
        }
        rows.push(fields);
    }
    Ok(rows)
}

fn is_metadata_line(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("track") || line.starts_with("browser")
}

#[cfg(test)]
mod tests {
    use super::compare_bedgraph;
    use crate::compare::{CompareError, NumericTolerance};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn track_lines_are_ignored_and_counts_compared() {
        let temp = TempDir::new().expect("tempdir should be created");
        let expected = temp.path().join("expected.bedgraph");
        let actual = temp.path().join("actual.bedgraph");
        fs::write(
            &expected,
            "track type=bedGraph\nYAL001C\t249\t250\t1\nYAL001C\t250\t251\t3\n",
        )
        .expect("expected bedgraph should be written");
        fs::write(&actual, "YAL001C 249 250 1\nYAL001C 250 251 3\n")
            .expect("actual bedgraph should be written");

        compare_bedgraph(&expected, &actual, NumericTolerance::default())
            .expect("bedgraphs should match");

        fs::write(&actual, "YAL001C\t249\t250\t1\nYAL001C\t250\t251\t4\n")
            .expect("actual bedgraph should be rewritten");
        let error = compare_bedgraph(&expected, &actual, NumericTolerance::default())
            .expect_err("count differs");
        assert!(error.to_string().contains("row 2 column 'count'"), "{error}");
    }

    #[test]
    fn malformed_rows_are_parse_errors() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("bad.bedgraph");
        fs::write(&path, "YAL001C\t249\t250\n").expect("bedgraph should be written");

        let error = compare_bedgraph(&path, &path, NumericTolerance::default())
            .expect_err("three columns should be rejected");
        assert!(matches!(error, CompareError::Parse { .. }));
    }
}
