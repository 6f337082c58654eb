use super::{CompareError, not_equivalent, parse_error, read_text};
use crate::domain::ComparatorKind;
use noodles::sam::alignment::io::Write as _;
use noodles::{bam, sam};
use std::cmp::Ordering;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

const MANDATORY_FIELDS: [&str; 11] = [
    "QNAME", "FLAG", "RNAME", "POS", "MAPQ", "CIGAR", "RNEXT", "PNEXT", "TLEN", "SEQ", "QUAL",
];

pub const EXPECTED_SCRATCH_DIR: &str = "expected";
pub const ACTUAL_SCRATCH_DIR: &str = "actual";

pub fn compare_sam(expected: &Path, actual: &Path, scratch_dir: &Path) -> Result<(), CompareError> {
    let expected_text = read_text(expected)?;
    let actual_text = read_text(actual)?;
    compare_alignment_text(
        ComparatorKind::Sam,
        (expected, &expected_text),
        (actual, &actual_text),
        scratch_dir,
    )
}

/// Decodes both BAM files to SAM text, then compares as [`compare_sam`] does.
pub fn compare_bam(expected: &Path, actual: &Path, scratch_dir: &Path) -> Result<(), CompareError> {
    let expected_text = bam_to_sam_text(expected)?;
    let actual_text = bam_to_sam_text(actual)?;
    compare_alignment_text(
        ComparatorKind::Bam,
        (expected, &expected_text),
        (actual, &actual_text),
        scratch_dir,
    )
}

fn compare_alignment_text(
    kind: ComparatorKind,
    (expected_path, expected_text): (&Path, &str),
    (actual_path, actual_text): (&Path, &str),
    scratch_dir: &Path,
) -> Result<(), CompareError> {
    let expected_sorted = SortedAlignments::parse(expected_path, expected_text)?;
    let actual_sorted = SortedAlignments::parse(actual_path, actual_text)?;

    let scratch = ScratchPair::create(scratch_dir)?;
    let sorted_name = sorted_file_name(expected_path);
    expected_sorted.write_to(&scratch.expected.join(&sorted_name))?;
    actual_sorted.write_to(&scratch.actual.join(&sorted_name))?;
    debug!(scratch = %scratch_dir.display(), "wrote sorted alignment copies");

    expected_sorted
        .first_difference(&actual_sorted)
        .map_or(Ok(()), |divergence| {
            Err(not_equivalent(kind, expected_path, actual_path, divergence))
        })
}

fn bam_to_sam_text(path: &Path) -> Result<String, CompareError> {
    let file = File::open(path).map_err(|source| CompareError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let decode_error = |source: std::io::Error| parse_error(path, source.to_string());

    let mut reader = bam::io::Reader::new(file);
    let header = reader.read_header().map_err(decode_error)?;

    let mut buffer = Vec::new();
    {
        let mut writer = sam::io::Writer::new(&mut buffer);
        writer.write_header(&header).map_err(decode_error)?;
        for result in reader.records() {
            let record = result.map_err(decode_error)?;
            writer
                .write_alignment_record(&header, &record)
                .map_err(decode_error)?;
        }
    }

    String::from_utf8(buffer).map_err(|source| parse_error(path, source.to_string()))
}

fn sorted_file_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map_or_else(|| "alignments".into(), |stem| stem.to_string_lossy());
    format!("{}.sorted.sam", stem)
}

/// Fresh `expected/` and `actual/` directories for one comparison.
struct ScratchPair {
    expected: PathBuf,
    actual: PathBuf,
}

impl ScratchPair {
    fn create(scratch_dir: &Path) -> Result<Self, CompareError> {
        fs::create_dir_all(scratch_dir).map_err(|source| CompareError::Scratch {
            path: scratch_dir.to_path_buf(),
            source,
        })?;
        let expected = create_fresh_dir(scratch_dir.join(EXPECTED_SCRATCH_DIR))?;
        let actual = create_fresh_dir(scratch_dir.join(ACTUAL_SCRATCH_DIR))?;
        Ok(Self { expected, actual })
    }
}

fn create_fresh_dir(path: PathBuf) -> Result<PathBuf, CompareError> {
    fs::create_dir(&path).map_err(|source| CompareError::Scratch {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Header lines as written plus records in coordinate order.
#[derive(Debug)]
struct SortedAlignments {
    header: Vec<String>,
    records: Vec<String>,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct RecordKey {
    reference: usize,
    position: u64,
}

impl SortedAlignments {
    fn parse(path: &Path, text: &str) -> Result<Self, CompareError> {
        let mut header = Vec::new();
        let mut keyed = Vec::new();
        let mut references: Vec<&str> = Vec::new();

        for (line_index, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            if line.starts_with('@') {
                if let Some(name) = reference_name(line) {
                    references.push(name);
                }
                header.push(line.to_string());
                continue;
            }

            let fields = line.split('\t').collect::<Vec<_>>();
            if fields.len() < MANDATORY_FIELDS.len() {
                return Err(parse_error(
                    path,
                    format!(
                        "line {} has {} fields, expected at least {}",
                        line_index + 1,
                        fields.len(),
                        MANDATORY_FIELDS.len()
                    ),
                ));
            }
            let position = fields[3].parse::<u64>().map_err(|_| {
                parse_error(
                    path,
                    format!("line {} has invalid POS '{}'", line_index + 1, fields[3]),
                )
            })?;
            let reference = references
                .iter()
                .position(|name| *name == fields[2])
                .unwrap_or(usize::MAX);
            keyed.push((RecordKey { reference, position }, line));
        }

        keyed.sort_by(|(left_key, left_line), (right_key, right_line)| {
            match left_key.cmp(right_key) {
                Ordering::Equal => left_line.cmp(right_line),
                other => other,
            }
        });

        Ok(Self {
            header,
            records: keyed.into_iter().map(|(_, line)| line.to_string()).collect(),
        })
    }

    fn write_to(&self, path: &Path) -> Result<(), CompareError> {
        let mut content = String::new();
        for line in self.header.iter().chain(&self.records) {
            content.push_str(line);
            content.push('\n');
        }
        fs::write(path, content).map_err(|source| CompareError::Scratch {
            path: path.to_path_buf(),
            source,
        })
    }

    fn first_difference(&self, actual: &Self) -> Option<String> {
        for (index, (expected_line, actual_line)) in self.header.iter().zip(&actual.header).enumerate() {
            if expected_line != actual_line {
                return Some(format!(
                    "header line {} differs (expected '{}', actual '{}')",
                    index + 1,
                    expected_line,
                    actual_line
                ));
            }
        }
        if self.header.len() != actual.header.len() {
            return Some(format!(
                "header line count differs (expected {}, actual {})",
                self.header.len(),
                actual.header.len()
            ));
        }
        if self.records.len() != actual.records.len() {
            return Some(format!(
                "record count differs (expected {}, actual {})",
                self.records.len(),
                actual.records.len()
            ));
        }

        self.records
            .iter()
            .zip(&actual.records)
            .enumerate()
            .find_map(|(index, (expected_record, actual_record))| {
                record_difference(index + 1, expected_record, actual_record)
            })
    }
}

fn record_difference(record_number: usize, expected: &str, actual: &str) -> Option<String> {
    if expected == actual {
        return None;
    }

    let expected_fields = expected.split('\t').collect::<Vec<_>>();
    let actual_fields = actual.split('\t').collect::<Vec<_>>();
    let read_name = expected_fields.first().copied().unwrap_or("*");

    let differing = (0..expected_fields.len().max(actual_fields.len())).find(|index| {
        expected_fields.get(*index) != actual_fields.get(*index)
    })?;
    let field_name = MANDATORY_FIELDS
        .get(differing)
        .map_or_else(|| format!("tag {}", differing - MANDATORY_FIELDS.len() + 1), |name| name.to_string());

    Some(format!(
        "sorted record {} (read '{}'): {} differs (expected '{}', actual '{}')",
        record_number,
        read_name,
        field_name,
        expected_fields.get(differing).copied().unwrap_or(""),
        actual_fields.get(differing).copied().unwrap_or("")
    ))
}

fn reference_name(header_line: &str) -> Option<&str> {
    let mut fields = header_line.split('\t');
    if fields.next() != Some("@SQ") {
        return None;
    }
    fields.find_map(|field| field.strip_prefix("SN:"))
}
