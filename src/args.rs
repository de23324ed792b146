use clap::Parser;

/// Consolidates the survey result workbooks of several groups into one master workbook.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the root directory and the output path of the run.
    /// For more information about the file format, read the documentation of `results_master::manual`.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (directory) The directory that will be scanned, recursively, for the '*resultado*.xlsx' files.
    /// Setting this option overrides the root directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub root: Option<String>,

    /// (file path) The master workbook to write. Any existing file is replaced.
    /// Defaults to master_resultados.xlsx in the root directory.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// If passed as an argument, only lists the source workbooks that were found and their groups.
    #[clap(long, takes_value = false)]
    pub list: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
