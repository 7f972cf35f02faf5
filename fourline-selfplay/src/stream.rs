//! Training-row stream I/O
//!
//! One record per line, semicolon separated, appended so several self-play
//! runs can feed the same file.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use fourline_core::TrainingRecord;

/// Append records to `path`, creating the file on first use.
///
/// Returns the number of lines written.
pub fn append_records(path: &Path, records: &[TrainingRecord]) -> Result<usize> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {} for appending", path.display()))?;
    let mut writer = BufWriter::new(file);

    for record in records {
        writeln!(writer, "{}", record.to_line())
            .with_context(|| format!("failed to write to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(records.len())
}

/// Read every record from `path`, skipping blank lines
pub fn read_records(path: &Path) -> Result<Vec<TrainingRecord>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open training data {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = TrainingRecord::parse_line(&line)
            .with_context(|| format!("{}:{}", path.display(), number + 1))?;
        records.push(record);
    }
    Ok(records)
}
