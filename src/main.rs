//! comfort-cost entry point: configuration, logging, batch run and summary output.

use std::process;

use tracing::{Level, error, info, warn};

use comfort_cost::analysis::Batch;
use comfort_cost::cli::{self, CliOptions};
use comfort_cost::config::AnalysisConfig;
use comfort_cost::io::summary::export_summary;

fn load_config(opts: &CliOptions) -> AnalysisConfig {
    let mut config = match &opts.config {
        Some(path) => match AnalysisConfig::from_toml_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        },
        None => AnalysisConfig::default(),
    };
    opts.apply(&mut config);
    config
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let opts = cli::parse_args();
    if opts.help {
        cli::print_usage();
        return;
    }

    let mut config = load_config(&opts);
    init_tracing(config.output.verbose);
    for w in &opts.warnings {
        warn!("{w}");
    }
    for e in config.sanitize() {
        warn!("{e}; using default");
    }

    info!(
        runs = config.input.files.len(),
        price = %config.price.mode,
        first_day = config.window.first_day,
        last_day = config.window.last_day,
        timestep_minutes = config.window.timestep_minutes,
        "starting batch"
    );
    if config.input.files.is_empty() {
        warn!("no input runs given; nothing to analyse");
    }

    let batch = match Batch::prepare(&config) {
        Ok(b) => b,
        Err(e) => {
            error!(error = %e, "cannot load shared price/occupancy sources");
            process::exit(1);
        }
    };

    let report = batch.run();
    println!("{report}");

    if let Some(path) = config.output.summary_path() {
        if let Err(e) = export_summary(&report, &path) {
            error!(path = %path.display(), error = %e, "cannot write summary");
            process::exit(1);
        }
        info!(path = %path.display(), "summary written");
    }
}
