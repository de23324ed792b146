// Primitives for reading the source workbooks.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use log::{debug, info};
use results_master::*;
use snafu::ResultExt;

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::master::locator::SourceFile;
use crate::master::*;

type SourceWorkbook = Xlsx<BufReader<File>>;

/// Cell contents that are read as missing values.
const NA_LABELS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn open_source(path: &Path) -> MasterResult<SourceWorkbook> {
    open_workbook(path).context(OpeningExcelSnafu {
        path: path.display().to_string(),
    })
}

/// Reads one sheet. Ok(None) if the workbook has no sheet with this name.
fn read_sheet(
    workbook: &mut SourceWorkbook,
    path: &Path,
    sheet: &str,
) -> MasterResult<Option<Table>> {
    match workbook.worksheet_range(sheet) {
        None => Ok(None),
        Some(range) => {
            let range = range.context(ReadingSheetSnafu {
                path: path.display().to_string(),
                sheet,
            })?;
            Ok(Some(range_to_table(&range)))
        }
    }
}

fn load_sheet(workbook: &mut SourceWorkbook, path: &Path, sheet: &str) -> SheetLoad {
    match read_sheet(workbook, path, sheet) {
        Ok(Some(t)) => SheetLoad::Loaded(t),
        Ok(None) => SheetLoad::missing(format!("no sheet named '{}'", sheet)),
        Err(e) => SheetLoad::missing(e.to_string()),
    }
}

/// Reads the three expected sheets of a source workbook.
///
/// Never fails: a sheet that cannot be read is reported as missing, and a
/// workbook that cannot be opened has all its sheets missing.
pub fn read_source_tables(source: &SourceFile) -> SourceTables {
    info!("Attempting to read result file {:?}", source.path.display());
    let (comparative, levels, financial) = match open_source(&source.path) {
        Ok(mut workbook) => (
            load_sheet(&mut workbook, &source.path, SHEET_COMPARATIVE),
            load_sheet(&mut workbook, &source.path, SHEET_LEVELS),
            load_sheet(&mut workbook, &source.path, SHEET_FINANCIAL),
        ),
        Err(e) => {
            let reason = e.to_string();
            (
                SheetLoad::missing(reason.clone()),
                SheetLoad::missing(reason.clone()),
                SheetLoad::missing(reason),
            )
        }
    };
    SourceTables {
        group: source.group.clone(),
        comparative,
        levels,
        financial,
    }
}

fn header_name(cell: &DataType, idx: usize) -> String {
    match cell {
        DataType::String(s) if !s.is_empty() => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        _ => format!("Unnamed: {}", idx),
    }
}

/// The column names of the header row. Repeated names get a `.1`, `.2`, ... suffix.
fn header_names(header: &[DataType]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut names: Vec<String> = Vec::new();
    for (idx, cell) in header.iter().enumerate() {
        let base = header_name(cell, idx);
        let mut name = base.clone();
        let mut k = 1;
        while used.contains(&name) {
            name = format!("{}.{}", base, k);
            k += 1;
        }
        used.insert(name.clone());
        names.push(name);
    }
    names
}

fn read_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::Int(i) => Cell::Number(*i as f64),
        DataType::Float(f) => Cell::Number(*f),
        DataType::String(s) if NA_LABELS.contains(&s.as_str()) => Cell::Empty,
        DataType::String(s) => Cell::Text(s.clone()),
        DataType::Bool(b) => Cell::Bool(*b),
        DataType::DateTime(f) => Cell::DateTime(*f),
        DataType::Error(e) => {
            debug!("read_cell: error cell {:?} read as missing", e);
            Cell::Empty
        }
        DataType::Empty => Cell::Empty,
    }
}

/// The first row is the header, every other row is data.
pub fn range_to_table(range: &Range<DataType>) -> Table {
    let mut rows = range.rows();
    let header = match rows.next() {
        Some(h) => h,
        None => return Table::default(),
    };
    let columns = header_names(header);
    debug!("range_to_table: header: {:?}", columns);
    let mut table = Table::new(columns);
    for row in rows {
        table.push_row(row.iter().map(read_cell).collect());
    }
    table
}
