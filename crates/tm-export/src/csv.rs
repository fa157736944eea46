//! CSV output backend.
//!
//! One [`Table`] becomes one CSV file: the header row first, then every
//! data row with [`Cell::Empty`] serialised as an empty field.

use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::error::ExportResult;
use crate::table::Table;

/// Serialise `table` into `sink` as CSV.
pub fn write_csv<W: Write>(table: &Table, sink: W) -> ExportResult<()> {
    let mut writer = Writer::from_writer(sink);
    write_into(table, &mut writer)
}

/// Serialise `table` into a file at `path`, creating or truncating it.
pub fn write_csv_path(table: &Table, path: &Path) -> ExportResult<()> {
    let mut writer = Writer::from_path(path)?;
    write_into(table, &mut writer)
}

fn write_into<W: Write>(table: &Table, writer: &mut Writer<W>) -> ExportResult<()> {
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(ToString::to_string))?;
    }
    writer.flush()?;
    Ok(())
}
