use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use divmaze::{
    algorithms::{generate_batch, Maze},
    gameboard::SerializedMaze,
    logging,
    settings::{Settings, SettingsError},
    MazeError,
};

#[derive(Parser, Debug)]
#[clap(version, about, name = "divmaze")]
struct Args {
    #[clap(long, help = "Maze width in cells")]
    width: Option<i32>,
    #[clap(long, help = "Maze height in cells")]
    height: Option<i32>,
    #[clap(short, long, help = "Regions with at most this many cells are not split")]
    threshold: Option<i32>,
    #[clap(short, long, help = "Seed for deterministic generation")]
    seed: Option<u64>,
    #[clap(short = 'n', long, default_value_t = 1, help = "Number of mazes to generate")]
    count: usize,
    #[clap(short, long, action, help = "Pretty print the JSON output")]
    pretty: bool,
    #[clap(short, long, help = "Path to the config file")]
    config: Option<PathBuf>,
    #[clap(long, action, help = "Reset config to default and quit")]
    reset_config: bool,
    #[clap(long, action, help = "Show config path and quit")]
    show_config_path: bool,
    #[clap(short, long, action = clap::ArgAction::Count, help = "More logging, repeatable")]
    verbose: u8,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Maze(#[from] MazeError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("cannot write output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

fn verbosity(base: log::LevelFilter, verbose: u8) -> log::LevelFilter {
    use log::LevelFilter::*;

    let levels = [Off, Error, Warn, Info, Debug, Trace];
    let base = levels.iter().position(|&l| l == base).unwrap_or(2);
    levels[(base + verbose as usize).min(levels.len() - 1)]
}

fn run(args: Args) -> Result<(), CliError> {
    let config_path = args.config.clone().unwrap_or_else(Settings::default_path);

    if args.reset_config {
        Settings::reset_config(config_path)?;
        return Ok(());
    }

    if args.show_config_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    let settings = Settings::load(config_path)?;
    logging::init(verbosity(settings.get_log_level(), args.verbose))?;

    let mut params = settings.maze_params(args.width, args.height, args.threshold);
    params.seed = args.seed;

    let output: Vec<SerializedMaze> = if args.count == 1 {
        vec![Maze::from_params(&params)?.to_serialized()]
    } else {
        generate_batch(&params, args.count)?
            .iter()
            .map(SerializedMaze::from)
            .collect()
    };
    log::info!("generated {} maze(s)", output.len());

    let pretty = args.pretty || settings.get_pretty();
    let json = match (output.as_slice(), pretty) {
        ([single], true) => serde_json::to_string_pretty(single)?,
        ([single], false) => serde_json::to_string(single)?,
        (all, true) => serde_json::to_string_pretty(all)?,
        (all, false) => serde_json::to_string(all)?,
    };
    println!("{}", json);

    Ok(())
}

fn main() {
    better_panic::install();

    if let Err(err) = run(Args::parse()) {
        log::error!("{}", err);
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
