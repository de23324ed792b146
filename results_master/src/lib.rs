mod config;
mod table;

pub mod builder;
pub mod manual;
pub mod normalize;

use log::{debug, info};

use std::cmp::Ordering;

pub use crate::builder::Builder;
pub use crate::config::*;
pub use crate::table::*;

/// Consolidates the tables read from all the sources, in the order given.
///
/// Arguments:
/// * `sources` the tables of each source workbook, tagged with the group of the source.
///
/// Returns an error if no source contributed any row to any of the three tables.
pub fn consolidate(sources: &[SourceTables]) -> Result<MasterTables, ConsolidationErrors> {
    info!("consolidate: processing {} sources", sources.len());
    let mut builder = Builder::new();
    for s in sources {
        builder.add_source(s);
    }
    builder.build()
}

/// The numeric value of a cell, or None if the cell does not hold a number.
///
/// Text is parsed after trimming. Text with separators ("1,234" or "1234,5")
/// is not a number. NaN and infinite values are treated as missing.
pub fn numeric_value(cell: &Cell) -> Option<f64> {
    let x = match cell {
        Cell::Number(x) => *x,
        Cell::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        Cell::Empty | Cell::DateTime(_) => return None,
    };
    if x.is_finite() {
        Some(x)
    } else {
        None
    }
}

/// Puts the group in front of the table, as the first column.
///
/// Any column of the source already named like the group column is replaced.
pub(crate) fn tag_with_group(table: &Table, group: &str) -> Table {
    let mut res = table.clone();
    if res.remove_column(COL_GROUP) {
        debug!(
            "tag_with_group: replacing existing column {:?} for group {:?}",
            COL_GROUP, group
        );
    }
    res.insert_column(0, COL_GROUP, Cell::Text(group.to_string()));
    res
}

pub(crate) fn consolidate_comparative(tables: &[Table]) -> Table {
    let refs: Vec<&Table> = tables.iter().collect();
    Table::concat(&refs)
}

/// The position of a level cell in the category order. None for anything that
/// is not one of the categories: those rows go last.
fn level_of(cell: &Cell) -> Option<Level> {
    cell.as_text().and_then(|s| Level::from_label(s.trim()))
}

fn compare_levels(a: &Cell, b: &Cell) -> Ordering {
    match (level_of(a), level_of(b)) {
        (Some(la), Some(lb)) => la.cmp(&lb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Builds the level master table: the groups sorted by (group, level), followed
/// by the TOTAL rows summed across all the groups.
///
/// The input tables are expected to be tagged and normalized.
pub(crate) fn consolidate_levels(tables: &[Table]) -> Table {
    let refs: Vec<&Table> = tables.iter().collect();
    let mut master = Table::concat(&refs);
    for c in [COL_LEVEL, COL_INITIAL_COUNT, COL_FINAL_COUNT] {
        if !master.has_column(c) {
            debug!("consolidate_levels: column {:?} missing, filling with 0", c);
            master.push_column(c, Cell::Number(0.0));
        }
    }

    // All the columns are present at this point, the inputs being tagged.
    let (group_idx, level_idx, initial_idx, final_idx) = match (
        master.column_index(COL_GROUP),
        master.column_index(COL_LEVEL),
        master.column_index(COL_INITIAL_COUNT),
        master.column_index(COL_FINAL_COUNT),
    ) {
        (Some(g), Some(l), Some(i), Some(f)) => (g, l, i, f),
        _ => return master,
    };

    // The level column only holds the categories. Labels that only differ by
    // surrounding whitespace belong to the same category, anything else is blank.
    for row_idx in 0..master.len() {
        let level = level_of(&master.rows()[row_idx][level_idx]);
        let cell = match level {
            Some(level) => Cell::Text(level.label().to_string()),
            None => {
                debug!(
                    "consolidate_levels: row {}: level {:?} outside the categories",
                    row_idx, master.rows()[row_idx][level_idx]
                );
                Cell::Empty
            }
        };
        master.set(row_idx, level_idx, cell);
    }

    // All the rows are accounted for, including the ones without a level, so
    // that the TOTAL rows sum up to the same counts as the groups.
    let mut totals: Vec<(Cell, f64, f64)> = Vec::new();
    for row in master.rows() {
        let level = &row[level_idx];
        let initial = numeric_value(&row[initial_idx]).unwrap_or(0.0);
        let fin = numeric_value(&row[final_idx]).unwrap_or(0.0);
        match totals.iter_mut().find(|entry| entry.0 == *level) {
            Some(entry) => {
                entry.1 += initial;
                entry.2 += fin;
            }
            None => totals.push((level.clone(), initial, fin)),
        }
    }
    totals.sort_by(|a, b| compare_levels(&a.0, &b.0));

    master.sort_rows_by(|a, b| {
        let ga = a[group_idx].as_text().unwrap_or("");
        let gb = b[group_idx].as_text().unwrap_or("");
        ga.cmp(gb)
            .then_with(|| compare_levels(&a[level_idx], &b[level_idx]))
    });

    for (level, initial, fin) in totals {
        info!(
            "consolidate_levels: TOTAL {:?}: initial {} final {}",
            level, initial, fin
        );
        let mut row = vec![Cell::Empty; master.columns().len()];
        row[group_idx] = Cell::Text(TOTAL_GROUP.to_string());
        row[level_idx] = level;
        row[initial_idx] = Cell::Number(initial);
        row[final_idx] = Cell::Number(fin);
        master.push_row(row);
    }
    master
}

/// The absolute evolution and the percentage over the initial value.
///
/// The percentage is NaN when the initial value is zero.
pub fn evolution(initial: f64, fin: f64) -> (f64, f64) {
    let evo = fin - initial;
    let pct = if initial != 0.0 {
        evo / initial * 100.0
    } else {
        f64::NAN
    };
    (evo, pct)
}

/// Builds the financial master table: the groups in source order, followed by
/// a single TOTAL row.
///
/// The derived columns (absolute evolution, percentage over initial) are
/// computed again from the sums of each row.
pub(crate) fn consolidate_financial(tables: &[Table]) -> Table {
    let refs: Vec<&Table> = tables.iter().collect();
    let mut master = Table::concat(&refs);
    for c in [COL_INITIAL_SUM, COL_FINAL_SUM] {
        if !master.has_column(c) {
            debug!(
                "consolidate_financial: column {:?} missing, filling with 0.0",
                c
            );
            master.push_column(c, Cell::Number(0.0));
        }
    }
    for c in [COL_BLOCK, COL_EVOLUTION, COL_PERCENT] {
        if !master.has_column(c) {
            master.push_column(c, Cell::Empty);
        }
    }

    let (group_idx, block_idx, initial_idx, final_idx, evo_idx, pct_idx) = match (
        master.column_index(COL_GROUP),
        master.column_index(COL_BLOCK),
        master.column_index(COL_INITIAL_SUM),
        master.column_index(COL_FINAL_SUM),
        master.column_index(COL_EVOLUTION),
        master.column_index(COL_PERCENT),
    ) {
        (Some(g), Some(b), Some(i), Some(f), Some(e), Some(p)) => (g, b, i, f, e, p),
        _ => return master,
    };

    let mut sum_initial = 0.0;
    let mut sum_final = 0.0;
    for row_idx in 0..master.len() {
        let row = &master.rows()[row_idx];
        let initial = numeric_value(&row[initial_idx]);
        let fin = numeric_value(&row[final_idx]);
        sum_initial += initial.unwrap_or(0.0);
        sum_final += fin.unwrap_or(0.0);

        let (evo_cell, pct_cell) = match (initial, fin) {
            (Some(i), Some(f)) => {
                let (evo, pct) = evolution(i, f);
                (Cell::Number(evo), Cell::Number(pct))
            }
            _ => {
                debug!(
                    "consolidate_financial: row {}: non-numeric sums {:?} {:?}",
                    row_idx, row[initial_idx], row[final_idx]
                );
                (Cell::Empty, Cell::Empty)
            }
        };
        master.set(row_idx, evo_idx, evo_cell);
        master.set(row_idx, pct_idx, pct_cell);
    }

    let (evo, pct) = evolution(sum_initial, sum_final);
    info!(
        "consolidate_financial: TOTAL initial {} final {} evolution {} ({}%)",
        sum_initial, sum_final, evo, pct
    );
    let mut row = vec![Cell::Empty; master.columns().len()];
    row[group_idx] = Cell::Text(TOTAL_GROUP.to_string());
    row[block_idx] = Cell::Text(TOTAL_BLOCK.to_string());
    row[initial_idx] = Cell::Number(sum_initial);
    row[final_idx] = Cell::Number(sum_final);
    row[evo_idx] = Cell::Number(evo);
    row[pct_idx] = Cell::Number(pct);
    master.push_row(row);
    master
}
