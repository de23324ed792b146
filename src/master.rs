pub mod config_reader;
mod io_common;
mod io_writer;
mod io_xlsx;
pub mod locator;

use log::{info, warn};

use results_master::*;
use serde::Serialize;
use snafu::{prelude::*, Snafu};

use crate::master::config_reader::ConsolidationConfig;
use crate::master::io_common::simplify_file_name;
use crate::master::locator::{find_sources, SourceFile};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MasterError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Error reading sheet '{sheet}' of file {path}"))]
    ReadingSheet {
        source: calamine::XlsxError,
        path: String,
        sheet: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingExcel {
        source: rust_xlsxwriter::XlsxError,
        path: String,
    },
    #[snafu(display("Error opening configuration file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing configuration file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the run summary"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("The root directory {path} does not exist or is not a directory"))]
    MissingRootDir { path: String },
    #[snafu(display("No root directory: pass --root or set rootDirectory in the configuration file"))]
    MissingRootConfig {},
    #[snafu(display(
        "Sheet {sheet} is too large for a workbook: {rows} rows, {columns} columns"
    ))]
    SheetTooLarge {
        sheet: String,
        rows: usize,
        columns: usize,
    },
    #[snafu(display("Consolidation failed"))]
    Consolidation { source: ConsolidationErrors },
}

pub type MasterResult<T> = Result<T, MasterError>;

/// What a source workbook contributed. None for a missing sheet.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub file: String,
    pub group: String,
    #[serde(rename = "comparativo")]
    pub comparative_rows: Option<usize>,
    #[serde(rename = "resumo_niveis")]
    pub levels_rows: Option<usize>,
    #[serde(rename = "financeiro_resumo")]
    pub financial_rows: Option<usize>,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct SheetSummary {
    pub name: String,
    pub rows: usize,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct RunSummary {
    #[serde(rename = "outputPath")]
    pub output_path: String,
    pub sources: Vec<SourceSummary>,
    pub sheets: Vec<SheetSummary>,
}

fn loaded_rows(load: &SheetLoad) -> Option<usize> {
    match load {
        SheetLoad::Missing { .. } => None,
        SheetLoad::Loaded(t) => Some(t.len()),
    }
}

fn log_sheet(file: &str, sheet: &str, load: &SheetLoad) {
    match load {
        SheetLoad::Missing { reason } => {
            info!("{}: sheet '{}' not loaded: {}", file, sheet, reason)
        }
        SheetLoad::Loaded(t) if t.is_empty() => {
            info!("{}: sheet '{}' has no rows", file, sheet)
        }
        SheetLoad::Loaded(t) => info!("{}: sheet '{}': {} rows", file, sheet, t.len()),
    }
}

/// The source workbooks under the root directory, in processing order.
pub fn list_sources(config: &ConsolidationConfig) -> MasterResult<Vec<SourceFile>> {
    let root = &config.root_directory;
    ensure!(
        root.is_dir(),
        MissingRootDirSnafu {
            path: root.display().to_string()
        }
    );
    let sources = find_sources(root, Some(&config.output_path));
    info!(
        "list_sources: {} result files under {:?}",
        sources.len(),
        root.display()
    );
    Ok(sources)
}

/// Consolidates all the result workbooks under the root directory into the master workbook.
///
/// Returns None, and writes nothing, when no result workbook was found.
pub fn run_consolidation(config: &ConsolidationConfig) -> MasterResult<Option<RunSummary>> {
    let sources = list_sources(config)?;
    if sources.is_empty() {
        warn!(
            "No result workbook found under {:?}",
            config.root_directory.display()
        );
        return Ok(None);
    }

    let mut builder = Builder::new();
    let mut source_summaries: Vec<SourceSummary> = Vec::new();
    for source in sources.iter() {
        let file = simplify_file_name(&source.path);
        let tables = io_xlsx::read_source_tables(source);
        log_sheet(&file, SHEET_COMPARATIVE, &tables.comparative);
        log_sheet(&file, SHEET_LEVELS, &tables.levels);
        log_sheet(&file, SHEET_FINANCIAL, &tables.financial);
        source_summaries.push(SourceSummary {
            file,
            group: tables.group.clone(),
            comparative_rows: loaded_rows(&tables.comparative),
            levels_rows: loaded_rows(&tables.levels),
            financial_rows: loaded_rows(&tables.financial),
        });
        builder.add_source(&tables);
    }

    let master = builder.build().context(ConsolidationSnafu {})?;
    let written = io_writer::write_master(&master, &config.output_path)?;
    info!(
        "Master workbook saved to {:?}",
        config.output_path.display()
    );
    Ok(Some(RunSummary {
        output_path: config.output_path.display().to_string(),
        sources: source_summaries,
        sheets: written
            .into_iter()
            .map(|(name, rows)| SheetSummary { name, rows })
            .collect(),
    }))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
    use rust_xlsxwriter::Workbook;
    use std::fs;
    use std::path::Path;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// A sheet of a fixture workbook.
    pub(crate) struct SheetFixture {
        name: String,
        table: Table,
    }

    impl SheetFixture {
        pub(crate) fn new(name: &str, columns: &[&str]) -> SheetFixture {
            SheetFixture {
                name: name.to_string(),
                table: Table::new(columns.iter().map(|c| c.to_string()).collect()),
            }
        }

        pub(crate) fn row(mut self, row: Vec<Cell>) -> SheetFixture {
            self.table.push_row(row);
            self
        }
    }

    pub(crate) fn write_workbook(path: &Path, sheets: &[SheetFixture]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut workbook = Workbook::new();
        for s in sheets {
            io_writer::write_table(&mut workbook, &s.name, &s.table).unwrap();
        }
        workbook.save(path).unwrap();
    }

    fn comparative(n: usize) -> SheetFixture {
        let mut s = SheetFixture::new(SHEET_COMPARATIVE, &["Cliente", "Pontuação Inicial", "Pontuação Final"]);
        for i in 0..n {
            s = s.row(vec![
                format!("cliente {}", i).into(),
                (i as f64).into(),
                (i as f64 + 1.0).into(),
            ]);
        }
        s
    }

    fn levels(rows: &[(&str, f64, f64)]) -> SheetFixture {
        let mut s = SheetFixture::new(SHEET_LEVELS, &["Nivel", "Qtd. Inicial", "Qtd Final"]);
        for (l, i, f) in rows {
            s = s.row(vec![(*l).into(), (*i).into(), (*f).into()]);
        }
        s
    }

    fn financial(initial: f64, fin: f64) -> SheetFixture {
        SheetFixture::new(SHEET_FINANCIAL, &[COL_BLOCK, COL_INITIAL_SUM, COL_FINAL_SUM])
            .row(vec!["Gestão".into(), initial.into(), fin.into()])
    }

    fn read_back(path: &Path) -> (Vec<String>, Xlsx<std::io::BufReader<fs::File>>) {
        let wb: Xlsx<_> = open_workbook(path).unwrap();
        (wb.sheet_names().to_vec(), wb)
    }

    fn sheet(wb: &mut Xlsx<std::io::BufReader<fs::File>>, name: &str) -> Range<DataType> {
        wb.worksheet_range(name).unwrap().unwrap()
    }

    fn column_index(range: &Range<DataType>, name: &str) -> usize {
        range
            .rows()
            .next()
            .unwrap()
            .iter()
            .position(|c| c == &DataType::String(name.to_string()))
            .unwrap()
    }

    fn text(c: &DataType) -> String {
        match c {
            DataType::String(s) => s.clone(),
            x => panic!("not a string: {:?}", x),
        }
    }

    fn float(c: &DataType) -> f64 {
        match c {
            DataType::Float(f) => *f,
            DataType::Int(i) => *i as f64,
            x => panic!("not a number: {:?}", x),
        }
    }

    #[test]
    fn comparative_rows_are_concatenated() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_workbook(&root.join("a/Alfa_resultados.xlsx"), &[comparative(10)]);
        write_workbook(&root.join("b/resultado Beta.xlsx"), &[comparative(5)]);
        write_workbook(
            &root.join("c/Gama_resultados.xlsx"),
            &[SheetFixture::new("outra", &["x"]).row(vec![1.0.into()])],
        );

        let config = ConsolidationConfig::new(root.to_path_buf());
        let summary = run_consolidation(&config).unwrap().unwrap();
        assert_eq!(summary.sources.len(), 3);
        assert_eq!(summary.sources[2].comparative_rows, None);
        assert_eq!(
            summary.sheets,
            vec![SheetSummary {
                name: MASTER_SHEET_COMPARATIVE.to_string(),
                rows: 15
            }]
        );

        let (names, mut wb) = read_back(&config.output_path);
        assert_eq!(names, vec![MASTER_SHEET_COMPARATIVE]);
        let range = sheet(&mut wb, MASTER_SHEET_COMPARATIVE);
        assert_eq!(range.get_size(), (16, 4));
        let groups: Vec<DataType> = range.rows().skip(1).map(|r| r[0].clone()).collect();
        assert_eq!(groups[0], DataType::String("Alfa".to_string()));
        assert_eq!(groups[14], DataType::String("Beta".to_string()));
    }

    #[test]
    fn levels_and_financial_totals() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_workbook(
            &root.join("Norte_resultados.xlsx"),
            &[
                levels(&[("Avançado", 1.0, 3.0), ("Básico", 5.0, 2.0)]),
                financial(100.0, 150.0),
            ],
        );
        write_workbook(
            &root.join("Sul_resultados.xlsx"),
            &[levels(&[("Básico", 4.0, 1.0)]), financial(0.0, 50.0)],
        );

        let config = ConsolidationConfig::new(root.to_path_buf());
        run_consolidation(&config).unwrap().unwrap();
        let (names, mut wb) = read_back(&config.output_path);
        assert_eq!(names, vec![MASTER_SHEET_LEVELS, MASTER_SHEET_FINANCIAL]);

        let range = sheet(&mut wb, MASTER_SHEET_LEVELS);
        let level = column_index(&range, COL_LEVEL);
        let initial = column_index(&range, COL_INITIAL_COUNT);
        let rows: Vec<(String, String, f64)> = range
            .rows()
            .skip(1)
            .map(|r| (text(&r[0]), text(&r[level]), float(&r[initial])))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Norte".to_string(), "Básico".to_string(), 5.0),
                ("Norte".to_string(), "Avançado".to_string(), 1.0),
                ("Sul".to_string(), "Básico".to_string(), 4.0),
                ("TOTAL".to_string(), "Básico".to_string(), 9.0),
                ("TOTAL".to_string(), "Avançado".to_string(), 1.0),
            ]
        );

        let range = sheet(&mut wb, MASTER_SHEET_FINANCIAL);
        let evolution = column_index(&range, COL_EVOLUTION);
        let percent = column_index(&range, COL_PERCENT);
        let total = range.rows().last().unwrap();
        assert_eq!(total[0], DataType::String(TOTAL_GROUP.to_string()));
        assert_eq!(float(&total[evolution]), 100.0);
        assert_eq!(float(&total[percent]), 100.0);
        // Sul starts from zero: no percent.
        let sul = range.rows().nth(2).unwrap();
        assert_eq!(sul[0], DataType::String("Sul".to_string()));
        assert_eq!(sul.get(percent).unwrap_or(&DataType::Empty), &DataType::Empty);
    }

    #[test]
    fn nothing_to_consolidate_writes_nothing() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_workbook(
            &root.join("Norte_resultados.xlsx"),
            &[SheetFixture::new(SHEET_COMPARATIVE, &["Cliente"])],
        );
        fs::write(root.join("Sul_resultados.xlsx"), b"garbage").unwrap();

        let config = ConsolidationConfig::new(root.to_path_buf());
        assert!(matches!(
            run_consolidation(&config),
            Err(MasterError::Consolidation {
                source: ConsolidationErrors::NothingToConsolidate
            })
        ));
        assert!(!config.output_path.exists());
    }

    #[test]
    fn no_sources() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let config = ConsolidationConfig::new(dir.path().to_path_buf());
        assert_eq!(run_consolidation(&config).unwrap(), None);
        assert!(!config.output_path.exists());
    }

    #[test]
    fn rerun_ignores_previous_output() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_workbook(&root.join("Norte_resultados.xlsx"), &[comparative(3)]);

        let config = ConsolidationConfig::new(root.to_path_buf());
        let first = run_consolidation(&config).unwrap().unwrap();
        let second = run_consolidation(&config).unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(second.sources.len(), 1);
        assert_eq!(second.sheets[0].rows, 3);
    }

    #[test]
    fn missing_root_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConsolidationConfig::new(dir.path().join("nope"));
        assert!(matches!(
            run_consolidation(&config),
            Err(MasterError::MissingRootDir { .. })
        ));
    }
}
