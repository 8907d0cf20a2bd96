use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

use crate::processing::processor::playlist::process_playlist;
use crate::utils::exit;
use crate::utils::{config_reader, file_utils};

mod m3u_combiner_error;
mod model;
mod processing;
mod repository;
mod utils;

#[tokio::main]
async fn main() {
    let args = get_arguments();
    init_logger(args.get_flag("verbose"));

    let default_config = file_utils::get_default_config_path();
    let config_file = args.get_one::<String>("config").map_or(default_config.as_str(), String::as_str);
    let mut cfg = match config_reader::read_config(config_file) {
        Ok(cfg) => cfg,
        Err(err) => exit!("{err}"),
    };
    if args.get_flag("probe") {
        cfg.probe.enabled = true;
    }

    let sources_file = args.get_one::<String>("links").unwrap_or(&cfg.sources_file);
    let priority_file = args.get_one::<String>("order").unwrap_or(&cfg.priority_file);
    let sources = match config_reader::read_list_file(&resolve(&cfg.working_dir, sources_file)) {
        Ok(sources) => sources,
        Err(err) => exit!("{err}"),
    };
    let priorities = match config_reader::read_priority_list(&resolve(&cfg.working_dir, priority_file)) {
        Ok(priorities) => priorities,
        Err(err) => exit!("{err}"),
    };

    if let Err(err) = process_playlist(&cfg, &sources, &priorities).await {
        exit!("{err}");
    }
}

fn resolve(working_dir: &str, filename: &str) -> PathBuf {
    file_utils::get_file_path(working_dir, Some(PathBuf::from(filename)))
        .unwrap_or_else(|| PathBuf::from(filename))
}

fn init_logger(verbose: bool) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "info" }))
        .init();
}

fn get_arguments() -> clap::ArgMatches {
    Command::new("m3u-combiner")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Combines m3u playlists into one filtered, ordered playlist")
        .arg(Arg::new("config")
            .short('c')
            .long("config")
            .help("The config file"))
        .arg(Arg::new("links")
            .short('l')
            .long("links")
            .help("The playlist source list file, overrides config"))
        .arg(Arg::new("order")
            .short('o')
            .long("order")
            .help("The priority term list file, overrides config"))
        .arg(Arg::new("probe")
            .short('P')
            .long("probe")
            .action(ArgAction::SetTrue)
            .help("Keep only streams that pass the liveness probe"))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::SetTrue)
            .help("Print more log!"))
        .get_matches()
}
