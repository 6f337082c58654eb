use super::{CompareError, not_equivalent, parse_error};
use crate::domain::ComparatorKind;
use noodles::fastq;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Compares FASTQ files record by record; order is significant.
pub fn compare_fastq(expected: &Path, actual: &Path) -> Result<(), CompareError> {
    let mut expected_reader = open_reader(expected)?;
    let mut actual_reader = open_reader(actual)?;
    let mut expected_records = expected_reader.records();
    let mut actual_records = actual_reader.records();

    let mut record_number = 0usize;
    loop {
        record_number += 1;
        let (expected_record, actual_record) = match (expected_records.next(), actual_records.next()) {
            (None, None) => return Ok(()),
            (Some(expected_record), Some(actual_record)) => (
                expected_record.map_err(|source| parse_error(expected, source.to_string()))?,
                actual_record.map_err(|source| parse_error(actual, source.to_string()))?,
            ),
            (Some(_), None) => {
                return Err(not_equivalent(
                    ComparatorKind::Fastq,
                    expected,
                    actual,
                    format!(
                        "actual file ends after {} records, expected has more",
                        record_number - 1
                    ),
                ));
            }
            (None, Some(_)) => {
                return Err(not_equivalent(
                    ComparatorKind::Fastq,
                    expected,
                    actual,
                    format!(
                        "expected file ends after {} records, actual has more",
                        record_number - 1
                    ),
                ));
            }
        };

        if let Some(divergence) = first_field_difference(&expected_record, &actual_record) {
            return Err(not_equivalent(
                ComparatorKind::Fastq,
                expected,
                actual,
                format!("record {}: {}", record_number, divergence),
            ));
        }
    }
}

fn open_reader(path: &Path) -> Result<fastq::io::Reader<BufReader<File>>, CompareError> {
    let file = File::open(path).map_err(|source| CompareError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(fastq::io::Reader::new(BufReader::new(file)))
}

fn first_field_difference(expected: &fastq::Record, actual: &fastq::Record) -> Option<String> {
    let fields: [(&str, &[u8], &[u8]); 4] = [
        ("name", expected.name().as_ref(), actual.name().as_ref()),
        (
            "description",
            expected.description().as_ref(),
            actual.description().as_ref(),
        ),
        ("sequence", expected.sequence(), actual.sequence()),
        (
            "quality",
            expected.quality_scores(),
            actual.quality_scores(),
        ),
    ];

    fields
        .into_iter()
        .find(|(_, left, right)| left != right)
        .map(|(field, left, right)| {
            format!(
                "{} differs (expected '{}', actual '{}')",
                field,
                String::from_utf8_lossy(left),
                String::from_utf8_lossy(right)
            )
        })
}
