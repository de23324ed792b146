mod args;
mod master;

use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use snafu::{ErrorCompat, ResultExt};

use crate::args::Args;
use crate::master::config_reader::resolve_config;
use crate::master::*;

fn run(args: &Args) -> MasterResult<()> {
    let config = resolve_config(
        args.config.as_deref(),
        args.root.as_deref(),
        args.out.as_deref(),
    )?;
    debug!("run: config: {:?}", config);

    if args.list {
        for source in list_sources(&config)? {
            println!("{}\t{}", source.group, source.path.display());
        }
        return Ok(());
    }

    match run_consolidation(&config)? {
        Some(summary) => {
            let pretty = serde_json::to_string_pretty(&summary).context(SerializingJsonSnafu {})?;
            println!("{}", pretty);
        }
        None => info!("Nothing was written"),
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        for cause in ErrorCompat::iter_chain(&e).skip(1) {
            eprintln!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}
