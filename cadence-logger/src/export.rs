use chrono::{DateTime, TimeZone};
use csv::WriterBuilder;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::RecorderError;
use crate::record::{SampleRecord, CSV_HEADER};

pub const CSV_MIME_TYPE: &str = "text/csv";
const FILE_PREFIX: &str = "sensor_data";
const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `sensor_data_{cadence}_{yyyyMMdd_HHmmss}.csv`. Path separators and control characters in
/// the cadence are replaced so the name stays inside the target directory.
pub fn session_file_name<Tz>(cadence: &str, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let cadence: String = cadence
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!(
        "{}_{}_{}.csv",
        FILE_PREFIX,
        cadence,
        at.format(FILE_TIMESTAMP_FORMAT)
    )
}

/// Writes the header and one line per record to `dir/file_name`, creating `dir` if needed.
/// Returns the absolute path of the file.
pub fn write_session_csv(
    dir: &Path,
    file_name: &str,
    records: &[SampleRecord],
) -> Result<PathBuf, RecorderError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_path(&path)?;
    writer.write_record(CSV_HEADER.split(','))?;
    for record in records {
        writer.write_record(record.fields())?;
    }
    writer.flush()?;

    Ok(fs::canonicalize(&path)?)
}

/// Copies `source` under the same name into `downloads_dir`, creating the directory if it
/// does not exist. Returns the path of the copy.
pub fn copy_to_downloads(source: &Path, downloads_dir: &Path) -> Result<PathBuf, RecorderError> {
    let file_name = source.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} is not a file", source.display()),
        )
    })?;
    fs::create_dir_all(downloads_dir)?;
    let destination = downloads_dir.join(file_name);
    fs::copy(source, &destination)?;
    Ok(destination)
}
