//! TOML-based analysis configuration.

use std::fmt;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Top-level analysis configuration parsed from TOML.
///
/// All fields have defaults matching the reference EnergyPlus post-processing
/// setup. Load from TOML with [`AnalysisConfig::from_toml_file`], or start
/// from [`AnalysisConfig::default`] and layer command-line overrides on top.
/// The record is built once per batch and never mutated while runs are processed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Run tables and their column layout.
    pub input: InputConfig,
    /// Analysis day window and timestep length.
    pub window: WindowConfig,
    /// Electricity price source.
    pub price: PriceConfig,
    /// Occupancy sources shared by every run.
    pub occupancy: OccupancyConfig,
    /// Adaptive comfort model coefficients.
    pub comfort: ComfortConfig,
    /// Summary and detail output targets.
    pub output: OutputConfig,
}

/// Run tables and their column layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Simulation tables to analyze, one run each, in processing order.
    pub files: Vec<PathBuf>,
    /// Number of warm-up rows at the top of each table to discard.
    pub calibration_rows: usize,
    /// Column names in the run tables.
    pub columns: ColumnConfig,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            calibration_rows: 2304,
            columns: ColumnConfig::default(),
        }
    }
}

/// Column headers of a simulation table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnConfig {
    pub timestamp: String,
    pub outdoor_temperature: String,
    pub indoor_temperature: String,
    pub heating_energy: String,
    pub cooling_energy: String,
    pub facility_energy: String,
    /// Optional in the table; exported when present.
    pub heating_setpoint: String,
    /// Optional in the table; exported when present.
    pub cooling_setpoint: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            timestamp: "Date/Time".to_string(),
            outdoor_temperature: "Environment:Site Outdoor Air Drybulb Temperature [C](TimeStep)"
                .to_string(),
            indoor_temperature: "LIVING_UNIT1:Zone Air Temperature [C](TimeStep)".to_string(),
            heating_energy: "Heating:Electricity [J](TimeStep)".to_string(),
            cooling_energy: "Cooling:Electricity [J](TimeStep)".to_string(),
            facility_energy: "Electricity:Facility [J](TimeStep)".to_string(),
            heating_setpoint:
                "LIVING_UNIT1:Zone Thermostat Heating Setpoint Temperature [C](TimeStep)"
                    .to_string(),
            cooling_setpoint:
                "LIVING_UNIT1:Zone Thermostat Cooling Setpoint Temperature [C](TimeStep)"
                    .to_string(),
        }
    }
}

/// Analysis day window `[first_day, last_day)` and timestep length.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    /// First analyzed day (inclusive, zero-based).
    pub first_day: usize,
    /// Last analyzed day (exclusive).
    pub last_day: usize,
    /// Timestep length in minutes (must divide 60).
    pub timestep_minutes: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            first_day: 0,
            last_day: 7,
            timestep_minutes: 5,
        }
    }
}

impl WindowConfig {
    /// Timesteps per hour, derived as `60 / timestep_minutes`.
    pub fn steps_per_hour(&self) -> usize {
        60 / self.timestep_minutes.max(1)
    }

    /// Timesteps per day.
    pub fn rows_per_day(&self) -> usize {
        24 * self.steps_per_hour()
    }

    /// Number of days in the window.
    pub fn day_count(&self) -> usize {
        self.last_day.saturating_sub(self.first_day)
    }

    /// Timestep index range of the window on the re-indexed series.
    ///
    /// # Examples
    ///
    /// ```
    /// use comfort_cost::config::WindowConfig;
    ///
    /// let w = WindowConfig { first_day: 1, last_day: 3, timestep_minutes: 5 };
    /// assert_eq!(w.step_range(), 288..864);
    /// ```
    pub fn step_range(&self) -> Range<usize> {
        let rows = self.rows_per_day();
        self.first_day.saturating_mul(rows)..self.last_day.saturating_mul(rows)
    }
}

/// Where per-timestep electricity prices come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceMode {
    /// Wholesale workbook with one sheet per date range.
    Legacy,
    /// Day-ahead market prices.
    DayAhead,
    /// Real-time market prices.
    RealTime,
    /// Fixed retail tariff already in $/kWh.
    Tariff,
}

impl fmt::Display for PriceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Legacy => "legacy",
            Self::DayAhead => "day-ahead",
            Self::RealTime => "real-time",
            Self::Tariff => "tariff",
        };
        f.write_str(name)
    }
}

impl FromStr for PriceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l" | "legacy" => Ok(Self::Legacy),
            "d" | "day-ahead" | "dayahead" => Ok(Self::DayAhead),
            "r" | "real-time" | "realtime" => Ok(Self::RealTime),
            "t" | "tariff" => Ok(Self::Tariff),
            other => Err(format!(
                "unknown price mode \"{other}\", expected legacy, day-ahead, real-time or tariff"
            )),
        }
    }
}

/// Electricity price source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriceConfig {
    pub mode: PriceMode,
    /// Date-range identifier: the wholesale file suffix, or the sheet name
    /// in legacy mode.
    pub date_range: String,
    /// Tariff file stem, used in tariff mode.
    pub tariff: String,
    /// Scale applied to market prices before dividing by 1000.
    pub multiplier: f64,
    /// Flat adder on top of the scaled market price ($/kWh).
    pub offset: f64,
    /// Directory holding the price files.
    pub dir: PathBuf,
    /// Native resolution of market price files in minutes.
    pub native_resolution_minutes: usize,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            mode: PriceMode::RealTime,
            date_range: "2020-6-29_2020-7-05".to_string(),
            tariff: String::new(),
            multiplier: 4.0,
            offset: 0.10,
            dir: PathBuf::from("."),
            native_resolution_minutes: 5,
        }
    }
}

impl PriceConfig {
    /// Path of the price file selected by `mode`.
    pub fn source_path(&self) -> PathBuf {
        let file = match self.mode {
            PriceMode::Legacy => "WholesalePrice.xlsx".to_string(),
            PriceMode::DayAhead => format!("WholesaleDayAhead_{}.csv", self.date_range),
            PriceMode::RealTime => format!("WholesaleRealTime_{}.csv", self.date_range),
            PriceMode::Tariff => with_csv_extension(&self.tariff),
        };
        self.dir.join(file)
    }
}

/// Occupancy sources shared by every run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OccupancyConfig {
    /// Binary 0/1 occupancy per timestep.
    pub binary: PathBuf,
    /// Hourly occupancy probability, interpolated to the timestep grid.
    pub probability: Option<PathBuf>,
}

impl Default for OccupancyConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("occupancy_5min.csv"),
            probability: None,
        }
    }
}

/// Affine band coefficients and clamp ranges for one comfort band.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BandCoefficients {
    pub lower_intercept: f64,
    pub upper_intercept: f64,
    /// `[min, max]` allowed for the lower bound.
    pub lower_clamp: [f64; 2],
    /// `[min, max]` allowed for the upper bound.
    pub upper_clamp: [f64; 2],
}

impl BandCoefficients {
    /// 100% acceptability band.
    pub fn full() -> Self {
        Self {
            lower_intercept: 16.3,
            upper_intercept: 19.3,
            lower_clamp: [18.4, 25.7],
            upper_clamp: [22.4, 29.7],
        }
    }

    /// 90% acceptability band.
    pub fn ninety() -> Self {
        Self {
            lower_intercept: 15.8,
            upper_intercept: 19.8,
            lower_clamp: [18.9, 26.2],
            upper_clamp: [22.9, 30.2],
        }
    }
}

/// Adaptive comfort model coefficients.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComfortConfig {
    /// Standard deviation of the adaptive-comfort normal model (°C).
    pub sigma: f64,
    /// Slope of every band against outdoor temperature.
    pub slope: f64,
    pub full: BandCoefficients,
    pub ninety: BandCoefficients,
    /// Confidence level of the widened band built from the 100% band.
    pub eighty_confidence: f64,
    /// Confidence level used for occupied steps of the occupancy-weighted band.
    pub ninety_confidence: f64,
}

impl Default for ComfortConfig {
    fn default() -> Self {
        Self {
            sigma: 3.937,
            slope: 0.31,
            full: BandCoefficients::full(),
            ninety: BandCoefficients::ninety(),
            eighty_confidence: 0.80,
            ninety_confidence: 0.90,
        }
    }
}

/// Summary and detail output targets. The value `none` disables either file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub summary: String,
    /// Appended to each input stem as `<stem>_<suffix>`.
    pub detail_suffix: String,
    pub verbose: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            summary: "comfort_cost_summary.csv".to_string(),
            detail_suffix: "comfort.csv".to_string(),
            verbose: false,
        }
    }
}

impl OutputConfig {
    /// Summary file path, or `None` when disabled.
    pub fn summary_path(&self) -> Option<PathBuf> {
        (!is_disabled(&self.summary)).then(|| PathBuf::from(with_csv_extension(&self.summary)))
    }

    /// Detail suffix, or `None` when disabled.
    pub fn detail_suffix(&self) -> Option<String> {
        (!is_disabled(&self.detail_suffix)).then(|| with_csv_extension(&self.detail_suffix))
    }
}

/// Returns true for the output value that suppresses writing.
pub fn is_disabled(value: &str) -> bool {
    value.trim().is_empty() || value.trim().eq_ignore_ascii_case("none")
}

/// Appends `.csv` unless already present.
pub fn with_csv_extension(name: &str) -> String {
    if name.to_ascii_lowercase().ends_with(".csv") {
        name.to_string()
    } else {
        format!("{name}.csv")
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"window.last_day"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl AnalysisConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let w = &self.window;
        if w.timestep_minutes == 0 || 60 % w.timestep_minutes != 0 {
            errors.push(ConfigError::new(
                "window.timestep_minutes",
                format!("must divide 60, got {}", w.timestep_minutes),
            ));
        }
        if w.last_day <= w.first_day {
            errors.push(ConfigError::new(
                "window.last_day",
                "must be > window.first_day",
            ));
        }

        let p = &self.price;
        if !p.multiplier.is_finite() {
            errors.push(ConfigError::new("price.multiplier", "must be finite"));
        }
        if !p.offset.is_finite() {
            errors.push(ConfigError::new("price.offset", "must be finite"));
        }
        if p.mode == PriceMode::Tariff && p.tariff.trim().is_empty() {
            errors.push(ConfigError::new(
                "price.tariff",
                "must name a tariff file in tariff mode",
            ));
        }
        if matches!(p.mode, PriceMode::DayAhead | PriceMode::RealTime)
            && p.native_resolution_minutes == 0
        {
            errors.push(ConfigError::new(
                "price.native_resolution_minutes",
                "must be > 0",
            ));
        }

        let c = &self.comfort;
        if !(c.sigma > 0.0 && c.sigma.is_finite()) {
            errors.push(ConfigError::new("comfort.sigma", "must be > 0"));
        }
        if !c.slope.is_finite() {
            errors.push(ConfigError::new("comfort.slope", "must be finite"));
        }
        for (field, p) in [
            ("comfort.eighty_confidence", c.eighty_confidence),
            ("comfort.ninety_confidence", c.ninety_confidence),
        ] {
            if !(p > 0.0 && p < 1.0) {
                errors.push(ConfigError::new(field, "must be in (0.0, 1.0)"));
            }
        }
        for (field, band) in [("comfort.full", &c.full), ("comfort.ninety", &c.ninety)] {
            validate_band(field, band, &mut errors);
        }

        errors
    }

    /// Replaces every invalid field with its default and returns what was
    /// wrong, so a bad value degrades to a warning instead of aborting.
    ///
    /// Related fields reset together: both window days, a whole comfort
    /// band, or the price mode when tariff mode lacks a tariff name.
    pub fn sanitize(&mut self) -> Vec<ConfigError> {
        let errors = self.validate();
        let d = Self::default();
        for e in &errors {
            let field = e.field.as_str();
            match field {
                "window.timestep_minutes" => self.window.timestep_minutes = d.window.timestep_minutes,
                "window.last_day" => {
                    self.window.first_day = d.window.first_day;
                    self.window.last_day = d.window.last_day;
                }
                "price.multiplier" => self.price.multiplier = d.price.multiplier,
                "price.offset" => self.price.offset = d.price.offset,
                "price.tariff" => self.price.mode = d.price.mode,
                "price.native_resolution_minutes" => {
                    self.price.native_resolution_minutes = d.price.native_resolution_minutes;
                }
                "comfort.sigma" => self.comfort.sigma = d.comfort.sigma,
                "comfort.slope" => self.comfort.slope = d.comfort.slope,
                "comfort.eighty_confidence" => {
                    self.comfort.eighty_confidence = d.comfort.eighty_confidence;
                }
                "comfort.ninety_confidence" => {
                    self.comfort.ninety_confidence = d.comfort.ninety_confidence;
                }
                f if f.starts_with("comfort.full.") => self.comfort.full = d.comfort.full,
                f if f.starts_with("comfort.ninety.") => self.comfort.ninety = d.comfort.ninety,
                _ => {}
            }
        }
        errors
    }
}

fn validate_band(field: &str, band: &BandCoefficients, errors: &mut Vec<ConfigError>) {
    let limits = [
        ("lower_intercept", band.lower_intercept),
        ("upper_intercept", band.upper_intercept),
        ("lower_clamp", band.lower_clamp[0]),
        ("lower_clamp", band.lower_clamp[1]),
        ("upper_clamp", band.upper_clamp[0]),
        ("upper_clamp", band.upper_clamp[1]),
    ];
    if let Some((name, _)) = limits.iter().find(|(_, v)| !v.is_finite()) {
        errors.push(ConfigError::new(format!("{field}.{name}"), "must be finite"));
        return;
    }
    let [lo_min, lo_max] = band.lower_clamp;
    let [up_min, up_max] = band.upper_clamp;
    if lo_min > lo_max {
        errors.push(ConfigError::new(
            format!("{field}.lower_clamp"),
            "min must be <= max",
        ));
    }
    if up_min > up_max {
        errors.push(ConfigError::new(
            format!("{field}.upper_clamp"),
            "min must be <= max",
        ));
    }
    if lo_min > up_min || lo_max > up_max {
        errors.push(ConfigError::new(
            format!("{field}.lower_clamp"),
            "must not exceed upper_clamp element-wise",
        ));
    }
    if band.lower_intercept > band.upper_intercept {
        errors.push(ConfigError::new(
            format!("{field}.lower_intercept"),
            "must be <= upper_intercept",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        let errors = AnalysisConfig::default().validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
    }

    #[test]
    fn window_derivations() {
        let w = WindowConfig::default();
        assert_eq!(w.steps_per_hour(), 12);
        assert_eq!(w.rows_per_day(), 288);
        assert_eq!(w.day_count(), 7);
        assert_eq!(w.step_range(), 0..2016);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[input]
files = ["a.csv", "b.csv"]
calibration_rows = 10

[window]
first_day = 1
last_day = 3
timestep_minutes = 15

[price]
mode = "day-ahead"
date_range = "Jan1thru7"
multiplier = 2.0
offset = 0.05
native_resolution_minutes = 60

[occupancy]
binary = "occ.csv"
probability = "occ_prob.csv"

[comfort.ninety]
lower_intercept = 15.0
upper_intercept = 20.0
lower_clamp = [18.0, 26.0]
upper_clamp = [23.0, 31.0]

[output]
summary = "none"
detail_suffix = "detail"
"#;
        let cfg = AnalysisConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        let cfg = cfg.as_ref();
        assert_eq!(cfg.map(|c| c.input.files.len()), Some(2));
        assert_eq!(cfg.map(|c| c.window.steps_per_hour()), Some(4));
        assert_eq!(cfg.map(|c| c.price.mode), Some(PriceMode::DayAhead));
        assert_eq!(cfg.map(|c| c.comfort.ninety.lower_intercept), Some(15.0));
        // untouched band keeps defaults
        assert_eq!(cfg.map(|c| c.comfort.full), Some(BandCoefficients::full()));
        assert_eq!(cfg.and_then(|c| c.output.summary_path()), None);
        assert_eq!(
            cfg.and_then(|c| c.output.detail_suffix()).as_deref(),
            Some("detail.csv")
        );
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[window]
first_day = 0
bogus_field = true
"#;
        assert!(AnalysisConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_band_table_is_rejected() {
        let toml = r#"
[comfort.full]
lower_intercept = 16.0
"#;
        assert!(AnalysisConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_empty_window() {
        let mut cfg = AnalysisConfig::default();
        cfg.window.first_day = 3;
        cfg.window.last_day = 3;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "window.last_day"));
    }

    #[test]
    fn validation_catches_bad_timestep() {
        let mut cfg = AnalysisConfig::default();
        cfg.window.timestep_minutes = 7;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "window.timestep_minutes"));
    }

    #[test]
    fn validation_requires_tariff_name() {
        let mut cfg = AnalysisConfig::default();
        cfg.price.mode = PriceMode::Tariff;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "price.tariff"));
    }

    #[test]
    fn validation_catches_inverted_clamps() {
        let mut cfg = AnalysisConfig::default();
        cfg.comfort.full.lower_clamp = [26.0, 18.0];
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "comfort.full.lower_clamp"));
    }

    #[test]
    fn validation_catches_confidence_out_of_range() {
        let mut cfg = AnalysisConfig::default();
        cfg.comfort.eighty_confidence = 1.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "comfort.eighty_confidence"));
    }

    #[test]
    fn validation_catches_nan_band_limits() {
        let toml = r#"
[comfort.ninety]
lower_intercept = nan
upper_intercept = 19.8
lower_clamp = [18.9, 26.2]
upper_clamp = [22.9, 30.2]
"#;
        let cfg = AnalysisConfig::from_toml_str(toml).unwrap();
        let errors = cfg.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "comfort.ninety.lower_intercept");

        let mut cfg = AnalysisConfig::default();
        cfg.comfort.full.upper_clamp = [22.4, f64::INFINITY];
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "comfort.full.upper_clamp"));
    }

    #[test]
    fn sanitize_restores_defaults_for_invalid_fields() {
        let mut cfg = AnalysisConfig::default();
        cfg.window.first_day = 3;
        cfg.window.last_day = 2;
        cfg.window.timestep_minutes = 7;
        cfg.comfort.eighty_confidence = 1.5;
        cfg.comfort.ninety.lower_intercept = f64::NAN;
        cfg.price.mode = PriceMode::Tariff;
        cfg.price.multiplier = 2.0;

        let warnings = cfg.sanitize();
        assert_eq!(warnings.len(), 5);
        assert!(cfg.validate().is_empty());

        let d = AnalysisConfig::default();
        assert_eq!((cfg.window.first_day, cfg.window.last_day), (0, 7));
        assert_eq!(cfg.window.timestep_minutes, 5);
        assert_eq!(cfg.comfort.eighty_confidence, d.comfort.eighty_confidence);
        assert_eq!(cfg.comfort.ninety, d.comfort.ninety);
        assert_eq!(cfg.price.mode, PriceMode::RealTime);
        // valid fields are left alone
        assert_eq!(cfg.price.multiplier, 2.0);
    }

    #[test]
    fn sanitize_leaves_valid_config_untouched() {
        let mut cfg = AnalysisConfig::default();
        cfg.window.last_day = 3;
        assert!(cfg.sanitize().is_empty());
        assert_eq!(cfg.window.last_day, 3);
    }

    #[test]
    fn price_paths_follow_mode() {
        let mut p = PriceConfig {
            dir: PathBuf::from("prices"),
            date_range: "2020-8-03_2020-8-09".to_string(),
            ..PriceConfig::default()
        };
        assert_eq!(
            p.source_path(),
            Path::new("prices").join("WholesaleRealTime_2020-8-03_2020-8-09.csv")
        );
        p.mode = PriceMode::DayAhead;
        assert_eq!(
            p.source_path(),
            Path::new("prices").join("WholesaleDayAhead_2020-8-03_2020-8-09.csv")
        );
        p.mode = PriceMode::Legacy;
        assert_eq!(p.source_path(), Path::new("prices").join("WholesalePrice.xlsx"));
        p.mode = PriceMode::Tariff;
        p.tariff = "TOU-D".to_string();
        assert_eq!(p.source_path(), Path::new("prices").join("TOU-D.csv"));
    }

    #[test]
    fn price_mode_parses_short_and_long_forms() {
        assert_eq!("r".parse::<PriceMode>(), Ok(PriceMode::RealTime));
        assert_eq!("Day-Ahead".parse::<PriceMode>(), Ok(PriceMode::DayAhead));
        assert_eq!("legacy".parse::<PriceMode>(), Ok(PriceMode::Legacy));
        assert!("weekly".parse::<PriceMode>().is_err());
    }

    #[test]
    fn none_disables_outputs() {
        assert!(is_disabled("none"));
        assert!(is_disabled("None"));
        assert!(!is_disabled("out.csv"));
        assert_eq!(with_csv_extension("summary"), "summary.csv");
        assert_eq!(with_csv_extension("summary.csv"), "summary.csv");
    }
}
