//! Write the combined reallocation table as CSV

use crate::error::{ModelError, Result};
use crate::reallocation::CombinedTable;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Output columns, in file order
pub const OUTPUT_COLUMNS: [&str; 10] = [
    "hospital_name",
    "region",
    "service_line",
    "sex",
    "age_band",
    "year",
    "acute_activity",
    "community_activity",
    "revised_acute_activity",
    "revised_community_activity",
];

/// Write all rows to a CSV file, header first
///
/// Rows go to a hidden sibling file that is renamed over `path` only once
/// every row has been written, so a failed write never leaves a partial
/// result at `path`.
pub fn write_combined_csv<P: AsRef<Path>>(path: P, table: &CombinedTable) -> Result<()> {
    let path = path.as_ref();
    let staging = staging_path(path);

    let written = csv::Writer::from_path(&staging)
        .and_then(|writer| write_rows(writer, table))
        .and_then(|()| fs::rename(&staging, path).map_err(csv::Error::from));

    if let Err(source) = written {
        if let Err(e) = fs::remove_file(&staging) {
            if e.kind() != io::ErrorKind::NotFound {
                log::warn!("Could not remove {}: {}", staging.display(), e);
            }
        }
        return Err(ModelError::Output {
            path: path.to_path_buf(),
            source,
        });
    }

    log::info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_else(|| OsStr::new("results.csv")));
    name.push(".partial");
    path.with_file_name(name)
}

/// Write all rows to any writer (e.g., string buffer, stdout)
pub fn write_combined<W: Write>(writer: W, table: &CombinedTable) -> Result<()> {
    write_rows(csv::Writer::from_writer(writer), table).map_err(|source| ModelError::Output {
        path: PathBuf::from("<writer>"),
        source,
    })
}

fn write_rows<W: Write>(mut writer: csv::Writer<W>, table: &CombinedTable) -> csv::Result<()> {
    // serialize() only emits the header alongside the first row
    if table.is_empty() {
        writer.write_record(OUTPUT_COLUMNS)?;
    }
    for record in &table.records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
