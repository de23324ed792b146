//! Canonical column names for the level summary sheets.
//!
//! The source workbooks are filled by hand, and the level sheets use several
//! spellings for the same columns ("Nivel", "Qtd. Inicial", "Quantidade final", ...).
//! Each canonical column has a rule: an ordered list of lowercase fragments. When the
//! canonical column is absent, the first column whose lowercased name contains one of
//! the fragments is renamed.

use log::debug;

use crate::config::*;
use crate::table::Table;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ColumnRule {
    pub canonical: &'static str,
    /// Lowercase fragments, tried in order.
    pub fragments: &'static [&'static str],
}

impl ColumnRule {
    fn matches(&self, column_name: &str) -> bool {
        let lower = column_name.to_lowercase();
        self.fragments.iter().any(|f| lower.contains(f))
    }
}

/// The rules for the level sheets, applied in this order.
pub const LEVEL_COLUMN_RULES: [ColumnRule; 3] = [
    ColumnRule {
        canonical: COL_LEVEL,
        fragments: &["nível", "nivel"],
    },
    ColumnRule {
        canonical: COL_INITIAL_COUNT,
        fragments: &["inicial"],
    },
    ColumnRule {
        canonical: COL_FINAL_COUNT,
        fragments: &["final"],
    },
];

/// Renames the columns of the table according to the rules.
///
/// A column that already carries one of the canonical names is never renamed.
/// Canonical columns without any candidate are left absent.
pub fn normalize_columns(table: &mut Table, rules: &[ColumnRule]) {
    for rule in rules {
        if table.has_column(rule.canonical) {
            continue;
        }
        let candidate = table.columns().iter().position(|c| {
            !rules.iter().any(|r| r.canonical == c.as_str()) && rule.matches(c)
        });
        match candidate {
            Some(idx) => {
                debug!(
                    "normalize_columns: renaming {:?} -> {:?}",
                    table.columns()[idx],
                    rule.canonical
                );
                table.rename_column(idx, rule.canonical);
            }
            None => {
                debug!("normalize_columns: no candidate for {:?}", rule.canonical);
            }
        }
    }
}

pub fn normalize_level_columns(table: &mut Table) {
    normalize_columns(table, &LEVEL_COLUMN_RULES)
}
