// ********* Schema **********

use std::error::Error;
use std::fmt::Display;

use crate::table::Table;

/// Name of the per-participant sheet in a source workbook.
pub const SHEET_COMPARATIVE: &str = "comparativo";
/// Name of the level summary sheet in a source workbook.
pub const SHEET_LEVELS: &str = "resumo_niveis";
/// Name of the financial summary sheet in a source workbook.
pub const SHEET_FINANCIAL: &str = "financeiro_resumo";

pub const MASTER_SHEET_COMPARATIVE: &str = "comparativo_master";
pub const MASTER_SHEET_LEVELS: &str = "niveis_master";
pub const MASTER_SHEET_FINANCIAL: &str = "financeiro_master";

/// The column injected in front of every consolidated table.
pub const COL_GROUP: &str = "Grupo";
pub const COL_LEVEL: &str = "Nível";
pub const COL_INITIAL_COUNT: &str = "Qtd Inicial";
pub const COL_FINAL_COUNT: &str = "Qtd Final";

pub const COL_BLOCK: &str = "Bloco";
pub const COL_INITIAL_SUM: &str = "Soma Inicial (todos)";
pub const COL_FINAL_SUM: &str = "Soma Final (todos)";
pub const COL_EVOLUTION: &str = "Evolução Absoluta";
pub const COL_PERCENT: &str = "% sobre Inicial";

/// Sentinel group of the synthetic rows summed across all the groups.
pub const TOTAL_GROUP: &str = "TOTAL";
/// Block label of the financial TOTAL row.
pub const TOTAL_BLOCK: &str = "Gestão Financeira";

/// The knowledge tier of a participant.
///
/// The derived ordering is the category order used when sorting the level
/// tables: `Basic < Intermediate < Advanced`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Level {
    Basic,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Basic, Level::Intermediate, Level::Advanced];

    /// The label of this level, as it appears in the spreadsheets.
    pub fn label(&self) -> &'static str {
        match self {
            Level::Basic => "Básico",
            Level::Intermediate => "Intermediário",
            Level::Advanced => "Avançado",
        }
    }

    /// Exact match against the category labels. Anything else is outside the
    /// category and sorts last.
    pub fn from_label(s: &str) -> Option<Level> {
        Level::ALL.iter().copied().find(|l| l.label() == s)
    }
}

// ********* Input data structures ***********

/// The outcome of loading one expected sheet from a source workbook.
///
/// A sheet that is present but has no data rows is `Loaded` with an empty
/// table, which is not the same thing as a `Missing` sheet.
#[derive(PartialEq, Debug, Clone)]
pub enum SheetLoad {
    Missing { reason: String },
    Loaded(Table),
}

impl SheetLoad {
    pub fn missing(reason: impl Into<String>) -> SheetLoad {
        SheetLoad::Missing {
            reason: reason.into(),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, SheetLoad::Missing { .. })
    }

    /// The table, if it was loaded and holds at least one row.
    pub fn rows(&self) -> Option<&Table> {
        match self {
            SheetLoad::Loaded(t) if !t.is_empty() => Some(t),
            _ => None,
        }
    }
}

/// Everything read from one source workbook.
#[derive(PartialEq, Debug, Clone)]
pub struct SourceTables {
    pub group: String,
    pub comparative: SheetLoad,
    pub levels: SheetLoad,
    pub financial: SheetLoad,
}

// ******** Output data structures *********

/// The three consolidated tables. A table without any row is not written out.
#[derive(PartialEq, Debug, Clone)]
pub struct MasterTables {
    pub comparative: Table,
    pub levels: Table,
    pub financial: Table,
}

impl MasterTables {
    /// The tables in output order, paired with their sheet names.
    pub fn sheets(&self) -> [(&'static str, &Table); 3] {
        [
            (MASTER_SHEET_COMPARATIVE, &self.comparative),
            (MASTER_SHEET_LEVELS, &self.levels),
            (MASTER_SHEET_FINANCIAL, &self.financial),
        ]
    }
}

/// Errors that prevent the consolidation from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ConsolidationErrors {
    /// No source contributed a single row to any of the three tables.
    NothingToConsolidate,
}

impl Error for ConsolidationErrors {}

impl Display for ConsolidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsolidationErrors::NothingToConsolidate => write!(
                f,
                "nothing to consolidate: no source provided a '{}', '{}' or '{}' sheet with rows",
                SHEET_COMPARATIVE, SHEET_LEVELS, SHEET_FINANCIAL
            ),
        }
    }
}
