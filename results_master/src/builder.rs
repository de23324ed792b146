use log::{debug, info};

use crate::config::*;
use crate::normalize::normalize_level_columns;
use crate::table::Table;
use crate::{consolidate_comparative, consolidate_financial, consolidate_levels, tag_with_group};

/// Accumulates the tables of the source workbooks, one source at a time.
///
/// ```
/// use results_master::{Builder, Cell, SheetLoad, SourceTables, Table};
///
/// let comparative = Table::from_rows(
///     vec!["Cliente".to_string(), "Pontuação Inicial".to_string()],
///     vec![vec![Cell::from("Ana"), Cell::Number(3.0)]],
/// );
/// let mut builder = Builder::new();
/// builder.add_source(&SourceTables {
///     group: "NorteCoop".to_string(),
///     comparative: SheetLoad::Loaded(comparative),
///     levels: SheetLoad::missing("no such sheet"),
///     financial: SheetLoad::missing("no such sheet"),
/// });
/// let master = builder.build()?;
/// assert_eq!(master.comparative.len(), 1);
/// assert!(master.levels.is_empty());
///
/// # Ok::<(), results_master::ConsolidationErrors>(())
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    comparative: Vec<Table>,
    levels: Vec<Table>,
    financial: Vec<Table>,
    num_sources: usize,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Adds the tables of one source.
    ///
    /// Missing sheets and sheets without rows contribute nothing. The level
    /// table gets its columns normalized.
    pub fn add_source(&mut self, source: &SourceTables) {
        self.num_sources += 1;
        let group = source.group.as_str();

        if let Some(t) = source.comparative.rows() {
            debug!("add_source: {:?}: {} comparative rows", group, t.len());
            self.comparative.push(tag_with_group(t, group));
        }

        if let Some(t) = source.levels.rows() {
            debug!("add_source: {:?}: {} level rows", group, t.len());
            let mut tagged = tag_with_group(t, group);
            normalize_level_columns(&mut tagged);
            self.levels.push(tagged);
        }

        if let Some(t) = source.financial.rows() {
            debug!("add_source: {:?}: {} financial rows", group, t.len());
            self.financial.push(tag_with_group(t, group));
        }
    }

    /// Builds the master tables.
    ///
    /// A category to which no source contributed yields an empty table.
    pub fn build(self) -> Result<MasterTables, ConsolidationErrors> {
        info!(
            "build: {} sources, contributions: {} comparative, {} levels, {} financial",
            self.num_sources,
            self.comparative.len(),
            self.levels.len(),
            self.financial.len()
        );
        if self.comparative.is_empty() && self.levels.is_empty() && self.financial.is_empty() {
            return Err(ConsolidationErrors::NothingToConsolidate);
        }

        let comparative = consolidate_comparative(&self.comparative);
        let levels = if self.levels.is_empty() {
            Table::default()
        } else {
            consolidate_levels(&self.levels)
        };
        let financial = if self.financial.is_empty() {
            Table::default()
        } else {
            consolidate_financial(&self.financial)
        };

        Ok(MasterTables {
            comparative,
            levels,
            financial,
        })
    }
}
