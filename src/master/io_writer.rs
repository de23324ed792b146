use log::{debug, info};
use results_master::*;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use snafu::prelude::*;

use std::path::Path;

use crate::master::*;

/// Rows in an xlsx worksheet, header included.
const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    date_format: &Format,
) -> Result<(), XlsxError> {
    match cell {
        Cell::Empty => {}
        // Missing numbers are left blank.
        Cell::Number(x) if !x.is_finite() => {}
        Cell::Number(x) => {
            sheet.write_number(row, col, *x)?;
        }
        Cell::Text(s) => {
            sheet.write_string(row, col, s)?;
        }
        Cell::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
        Cell::DateTime(x) => {
            sheet.write_number_with_format(row, col, *x, date_format)?;
        }
    }
    Ok(())
}

/// Writes a table to a new sheet of the workbook. The first row holds the column names.
pub fn write_table(workbook: &mut Workbook, name: &str, table: &Table) -> Result<(), XlsxError> {
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

    let sheet = workbook.add_worksheet();
    sheet.set_name(name)?;
    for (col, column) in table.columns().iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, column, &header_format)?;
    }
    for (idx, row) in table.rows().iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            write_cell(sheet, (idx + 1) as u32, col as u16, cell, &date_format)?;
        }
    }
    Ok(())
}

/// Writes the non-empty master tables to the workbook at `path`, replacing any existing file.
///
/// Returns the name and the number of rows of each sheet written.
pub fn write_master(tables: &MasterTables, path: &Path) -> MasterResult<Vec<(String, usize)>> {
    let mut workbook = Workbook::new();
    let mut written: Vec<(String, usize)> = Vec::new();
    for (name, table) in tables.sheets() {
        if table.is_empty() {
            debug!("write_master: {} has no rows, not written", name);
            continue;
        }
        ensure!(
            table.len() < MAX_ROWS && table.columns().len() <= MAX_COLUMNS,
            SheetTooLargeSnafu {
                sheet: name,
                rows: table.len(),
                columns: table.columns().len(),
            }
        );
        write_table(&mut workbook, name, table).context(WritingExcelSnafu {
            path: path.display().to_string(),
        })?;
        info!("write_master: {}: {} rows", name, table.len());
        written.push((name.to_string(), table.len()));
    }
    workbook.save(path).context(WritingExcelSnafu {
        path: path.display().to_string(),
    })?;
    Ok(written)
}
