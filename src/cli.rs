//! Command-line parsing. Bad values and unknown tokens never abort: they are
//! collected as warnings and the previous setting is kept.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{AnalysisConfig, PriceMode, is_disabled};

/// One command-line override applied on top of the loaded configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    Output(String),
    Price(PriceMode),
    Tariff(String),
    DateRange(String),
    FirstDay(usize),
    LastDay(usize),
    Multiplier(f64),
    Offset(f64),
    CalibrationRows(usize),
    Timestep(usize),
    NativeResolution(usize),
    PriceDir(PathBuf),
    Occupancy(PathBuf),
    /// `None` disables the probability source.
    OccupancyProbability(Option<PathBuf>),
    Detail(String),
    Verbose,
}

#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    /// Runs named on the command line; replace the configured list when non-empty.
    pub inputs: Vec<PathBuf>,
    pub settings: Vec<Setting>,
    pub help: bool,
    /// Problems found while parsing, reported once logging is up.
    pub warnings: Vec<String>,
}

impl CliOptions {
    /// Applies the overrides in command-line order.
    pub fn apply(&self, cfg: &mut AnalysisConfig) {
        if !self.inputs.is_empty() {
            cfg.input.files = self.inputs.clone();
        }
        for setting in &self.settings {
            match setting {
                Setting::Output(v) => cfg.output.summary = v.clone(),
                Setting::Price(mode) => cfg.price.mode = *mode,
                Setting::Tariff(v) => cfg.price.tariff = v.clone(),
                Setting::DateRange(v) => cfg.price.date_range = v.clone(),
                Setting::FirstDay(v) => cfg.window.first_day = *v,
                Setting::LastDay(v) => cfg.window.last_day = *v,
                Setting::Multiplier(v) => cfg.price.multiplier = *v,
                Setting::Offset(v) => cfg.price.offset = *v,
                Setting::CalibrationRows(v) => cfg.input.calibration_rows = *v,
                Setting::Timestep(v) => cfg.window.timestep_minutes = *v,
                Setting::NativeResolution(v) => cfg.price.native_resolution_minutes = *v,
                Setting::PriceDir(v) => cfg.price.dir = v.clone(),
                Setting::Occupancy(v) => cfg.occupancy.binary = v.clone(),
                Setting::OccupancyProbability(v) => cfg.occupancy.probability = v.clone(),
                Setting::Detail(v) => cfg.output.detail_suffix = v.clone(),
                Setting::Verbose => cfg.output.verbose = true,
            }
        }
    }
}

pub fn parse_args() -> CliOptions {
    parse_args_from(env::args().skip(1))
}

pub fn parse_args_from(args: impl IntoIterator<Item = String>) -> CliOptions {
    let args: Vec<String> = args.into_iter().collect();
    let mut opts = CliOptions::default();
    let mut i = 0usize;

    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--help" | "-h" => opts.help = true,
            "--verbose" | "-v" => opts.settings.push(Setting::Verbose),
            "--config" => {
                if let Some(v) = take_value(&args, &mut i, flag, &mut opts.warnings) {
                    opts.config = Some(PathBuf::from(v));
                }
            }
            "--input" | "-i" => {
                if let Some(v) = take_value(&args, &mut i, flag, &mut opts.warnings) {
                    opts.inputs.push(PathBuf::from(v));
                }
            }
            "--output" | "-o" => {
                if let Some(v) = take_value(&args, &mut i, flag, &mut opts.warnings) {
                    opts.settings.push(Setting::Output(v.to_string()));
                }
            }
            "--tariff" => {
                if let Some(v) = take_value(&args, &mut i, flag, &mut opts.warnings) {
                    opts.settings.push(Setting::Tariff(v.to_string()));
                }
            }
            "--date-range" => {
                if let Some(v) = take_value(&args, &mut i, flag, &mut opts.warnings) {
                    opts.settings.push(Setting::DateRange(v.to_string()));
                }
            }
            "--price-dir" => {
                if let Some(v) = take_value(&args, &mut i, flag, &mut opts.warnings) {
                    opts.settings.push(Setting::PriceDir(PathBuf::from(v)));
                }
            }
            "--occupancy" => {
                if let Some(v) = take_value(&args, &mut i, flag, &mut opts.warnings) {
                    opts.settings.push(Setting::Occupancy(PathBuf::from(v)));
                }
            }
            "--occupancy-probability" => {
                if let Some(v) = take_value(&args, &mut i, flag, &mut opts.warnings) {
                    let path = (!is_disabled(v)).then(|| PathBuf::from(v));
                    opts.settings.push(Setting::OccupancyProbability(path));
                }
            }
            "--detail" => {
                if let Some(v) = take_value(&args, &mut i, flag, &mut opts.warnings) {
                    opts.settings.push(Setting::Detail(v.to_string()));
                }
            }
            "--price" | "-p" => {
                if let Some(v) = take_parsed(&args, &mut i, flag, &mut opts.warnings) {
                    opts.settings.push(Setting::Price(v));
                }
            }
            "--days" | "-d" => {
                if let Some(v) = take_parsed(&args, &mut i, "--days <first>", &mut opts.warnings) {
                    opts.settings.push(Setting::FirstDay(v));
                }
                if let Some(v) = take_parsed(&args, &mut i, "--days <last>", &mut opts.warnings) {
                    opts.settings.push(Setting::LastDay(v));
                }
            }
            "--multiplier" | "-m" => {
                if let Some(v) = take_parsed(&args, &mut i, flag, &mut opts.warnings) {
                    opts.settings.push(Setting::Multiplier(v));
                }
            }
            "--offset" => {
                if let Some(v) = take_parsed(&args, &mut i, flag, &mut opts.warnings) {
                    opts.settings.push(Setting::Offset(v));
                }
            }
            "--calibration" | "-c" => {
                if let Some(v) = take_parsed(&args, &mut i, flag, &mut opts.warnings) {
                    opts.settings.push(Setting::CalibrationRows(v));
                }
            }
            "--timestep" => {
                if let Some(v) = take_parsed(&args, &mut i, flag, &mut opts.warnings) {
                    opts.settings.push(Setting::Timestep(v));
                }
            }
            "--native-resolution" => {
                if let Some(v) = take_parsed(&args, &mut i, flag, &mut opts.warnings) {
                    opts.settings.push(Setting::NativeResolution(v));
                }
            }
            other if other.starts_with('-') => {
                opts.warnings.push(format!("unrecognized option \"{other}\" ignored"));
            }
            other if other.to_ascii_lowercase().ends_with(".csv") => {
                opts.inputs.push(PathBuf::from(other));
            }
            other => {
                opts.warnings.push(format!("unrecognized argument \"{other}\" ignored"));
            }
        }
        i += 1;
    }

    opts
}

/// Advances to the next argument and returns it, or records a warning when
/// the value is missing or looks like another option.
fn take_value<'a>(
    args: &'a [String],
    i: &mut usize,
    flag: &str,
    warnings: &mut Vec<String>,
) -> Option<&'a str> {
    match args.get(*i + 1) {
        Some(v) if !v.starts_with("--") => {
            *i += 1;
            Some(v.as_str())
        }
        _ => {
            warnings.push(format!("missing value for {flag}; keeping previous setting"));
            None
        }
    }
}

/// Like [`take_value`], then parses the value. An unparsable value is
/// consumed and warned about, and the previous setting is kept.
fn take_parsed<T: FromStr>(
    args: &[String],
    i: &mut usize,
    flag: &str,
    warnings: &mut Vec<String>,
) -> Option<T> {
    let raw = take_value(args, i, flag, warnings)?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warnings.push(format!(
                "invalid value \"{raw}\" for {flag}; keeping previous setting"
            ));
            None
        }
    }
}

pub fn print_usage() {
    eprintln!("comfort-cost: electricity cost and thermal comfort of building simulation runs");
    eprintln!();
    eprintln!("Usage: comfort-cost [--config <toml>] [OPTIONS] [RUN.csv ...]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>                 Load settings from a TOML file");
    eprintln!("  -i, --input <path>              Add a run table (repeatable)");
    eprintln!("  -o, --output <file|none>        Summary CSV path");
    eprintln!("  -p, --price <mode>              legacy | day-ahead | real-time | tariff");
    eprintln!("  --tariff <name>                 Tariff file name for tariff mode");
    eprintln!("  --date-range <id>               Price file date range (sheet name in legacy mode)");
    eprintln!("  -d, --days <first> <last>       Analysis window [first, last) in days");
    eprintln!("  -m, --multiplier <f64>          Market price multiplier");
    eprintln!("  --offset <f64>                  Market price offset ($/kWh)");
    eprintln!("  -c, --calibration <rows>        Warm-up rows to drop from each table");
    eprintln!("  --timestep <minutes>            Simulation timestep length");
    eprintln!("  --native-resolution <minutes>   Market price file resolution");
    eprintln!("  --price-dir <dir>               Directory holding price files");
    eprintln!("  --occupancy <path>              Binary occupancy CSV");
    eprintln!("  --occupancy-probability <path|none>  Hourly occupancy probability CSV");
    eprintln!("  --detail <suffix|none>          Per-run detail export suffix");
    eprintln!("  -v, --verbose                   Debug logging");
    eprintln!("  -h, --help                      Show this help message");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliOptions {
        parse_args_from(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn positional_runs_and_options() {
        let opts = parse(&[
            "a.csv",
            "--price",
            "d",
            "--days",
            "2",
            "9",
            "B.CSV",
            "--multiplier",
            "2.5",
        ]);
        assert_eq!(opts.inputs, vec![PathBuf::from("a.csv"), PathBuf::from("B.CSV")]);
        assert_eq!(
            opts.settings,
            vec![
                Setting::Price(PriceMode::DayAhead),
                Setting::FirstDay(2),
                Setting::LastDay(9),
                Setting::Multiplier(2.5),
            ]
        );
        assert!(opts.warnings.is_empty());
    }

    #[test]
    fn invalid_number_keeps_previous_value() {
        let opts = parse(&["--days", "two", "9", "--calibration", "many"]);
        assert_eq!(opts.settings, vec![Setting::LastDay(9)]);
        assert_eq!(opts.warnings.len(), 2);

        let mut cfg = AnalysisConfig::default();
        opts.apply(&mut cfg);
        assert_eq!(cfg.window.first_day, 0);
        assert_eq!(cfg.window.last_day, 9);
        assert_eq!(cfg.input.calibration_rows, 2304);
    }

    #[test]
    fn unknown_tokens_are_ignored_with_warning() {
        let opts = parse(&["--graph", "notes.txt", "run.csv"]);
        assert_eq!(opts.inputs, vec![PathBuf::from("run.csv")]);
        assert_eq!(opts.warnings.len(), 2);
        assert!(opts.warnings[0].contains("--graph"));
    }

    #[test]
    fn missing_value_is_warned() {
        let opts = parse(&["--output"]);
        assert!(opts.settings.is_empty());
        assert!(opts.warnings[0].contains("missing value for --output"));
    }

    #[test]
    fn negative_offset_is_a_value() {
        let opts = parse(&["--offset", "-0.05"]);
        assert_eq!(opts.settings, vec![Setting::Offset(-0.05)]);
    }

    #[test]
    fn apply_overrides_config() {
        let opts = parse(&[
            "--config",
            "batch.toml",
            "-i",
            "x.csv",
            "--tariff",
            "TOU",
            "--price",
            "tariff",
            "--occupancy-probability",
            "none",
            "--detail",
            "None",
            "-v",
        ]);
        assert_eq!(opts.config, Some(PathBuf::from("batch.toml")));
        let mut cfg = AnalysisConfig::default();
        cfg.occupancy.probability = Some(PathBuf::from("p.csv"));
        opts.apply(&mut cfg);
        assert_eq!(cfg.input.files, vec![PathBuf::from("x.csv")]);
        assert_eq!(cfg.price.mode, PriceMode::Tariff);
        assert_eq!(cfg.price.tariff, "TOU");
        assert_eq!(cfg.occupancy.probability, None);
        assert_eq!(cfg.output.detail_suffix(), None);
        assert!(cfg.output.verbose);
    }

    #[test]
    fn help_flag() {
        assert!(parse(&["-h"]).help);
    }
}
