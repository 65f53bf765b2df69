//! Writing records out
//!
//! Files are CSV with a fixed header. The console gets one line per record,
//! either as text or as a JSON object.

use std::{
    fs::File,
    io::{self, Write},
    path::Path,
};

use crate::{
    error::{Error, Result},
    models::{FIELD_NAMES, PaperRecord},
};
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleFormat {
    #[default]
    Text,
    JsonLines,
}

/// Write `records` as CSV: header row, then one row per record.
///
/// Zero records is an error; nothing is written.
pub fn write_csv<W: Write>(records: &[PaperRecord], writer: W) -> Result<()> {
    if records.is_empty() {
        return Err(Error::EmptyResult);
    }
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(FIELD_NAMES)?;
    for record in records {
        csv_writer.write_record(record.values())?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and write `records` to it as CSV.
pub fn save_csv(records: &[PaperRecord], path: &Path) -> Result<()> {
    if records.is_empty() {
        return Err(Error::EmptyResult);
    }
    let file = File::create(path)?;
    write_csv(records, io::BufWriter::new(file))?;
    info!(path = %path.display(), rows = records.len(), "wrote CSV");
    Ok(())
}

/// Read records back from a CSV file written by [`save_csv`].
pub fn read_csv(path: &Path) -> Result<Vec<PaperRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: PaperRecord = row?;
        records.push(record);
    }
    Ok(records)
}

pub fn write_console<W: Write>(
    records: &[PaperRecord],
    format: ConsoleFormat,
    mut writer: W,
) -> Result<()> {
    for record in records {
        match format {
            ConsoleFormat::Text => writeln!(writer, "{}", record)?,
            ConsoleFormat::JsonLines => {
                serde_json::to_writer(&mut writer, record)?;
                writeln!(writer)?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// Save to `destination` when given, otherwise print to stdout.
pub fn export(
    records: &[PaperRecord],
    destination: Option<&Path>,
    format: ConsoleFormat,
) -> Result<()> {
    match destination {
        Some(path) => save_csv(records, path),
        None => write_console(records, format, io::stdout().lock()),
    }
}
