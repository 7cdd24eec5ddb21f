//! Run configuration.
//!
//! Defaults reproduce the stock chart: `Data.xlsx` in, header on the second
//! row, six temperature sources, `temperature_massbalance.gif` out at 5 fps
//! and 300 DPI. A JSON file can override any subset of fields and the command
//! line overrides the file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Names of the input columns and how the table is cleaned.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnConfig {
    /// Year column.
    pub year: String,
    /// Temperature anomaly sources, one line each, in legend order.
    pub temperature: Vec<String>,
    /// Mass-balance column as it appears in the file.
    pub mass_source: String,
    /// Short name the mass-balance column is renamed to.
    pub mass_balance: String,
    /// Columns whose name starts with this are dropped.
    pub unlabeled_prefix: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            year: "year".into(),
            temperature: [
                "Berkeley Earth",
                "ERA5",
                "GISTEMP",
                "HadCRUT5",
                "JRA-3Q",
                "NOAAGlobalTemp",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            mass_source: "World Glacier Monitoring Service".into(),
            mass_balance: "MassBalance".into(),
            unlabeled_prefix: "Unnamed".into(),
        }
    }
}

/// Text drawn on the chart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartLabels {
    pub x_axis: String,
    pub temperature_axis: String,
    pub mass_axis: String,
    /// Legend entry for the mass-balance line.
    pub mass_legend: String,
}

impl Default for ChartLabels {
    fn default() -> Self {
        Self {
            x_axis: "Years".into(),
            temperature_axis: "Global Mean Temperature (°C)".into(),
            mass_axis: "Glacier Cumulative Mass Balance (m w.e.)".into(),
            mass_legend: "World Glacier Monitoring Service".into(),
        }
    }
}

/// Timing, output resolution and axis layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    /// Delay between frames in the preview window, in milliseconds.
    pub interval_ms: u64,
    /// Frame rate of the exported file.
    pub fps: u32,
    pub dpi: u32,
    /// Figure size in inches.
    pub width_in: f64,
    pub height_in: f64,
    /// Years between x-axis ticks.
    pub tick_step: u32,
    /// Fraction of the data span added above and below each y-axis.
    pub padding: f64,
    /// Play the animation in a window before exporting.
    pub preview: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            fps: 5,
            dpi: 300,
            width_in: 9.0,
            height_in: 5.0,
            tick_step: 10,
            padding: 0.1,
            preview: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    /// 0-based row holding the column names.
    pub header_row: usize,
    pub columns: ColumnConfig,
    pub labels: ChartLabels,
    pub animation: AnimationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("Data.xlsx"),
            output: PathBuf::from("temperature_massbalance.gif"),
            header_row: 1,
            columns: ColumnConfig::default(),
            labels: ChartLabels::default(),
            animation: AnimationConfig::default(),
        }
    }
}

impl Config {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let columns = &self.columns;
        if columns.temperature.is_empty() {
            bail!("at least one temperature column must be configured");
        }
        for (i, name) in columns.temperature.iter().enumerate() {
            if columns.temperature[..i].contains(name) {
                bail!("temperature column '{name}' is listed twice");
            }
            if *name == columns.year || *name == columns.mass_balance {
                bail!("temperature column '{name}' clashes with the year or mass-balance column");
            }
        }
        // Every name starts with "", so an empty prefix would drop the table.
        let prefix = &columns.unlabeled_prefix;
        if prefix.is_empty() {
            bail!("unlabeled_prefix must not be empty");
        }
        let required = std::iter::once(&columns.year)
            .chain(&columns.temperature)
            .chain(std::iter::once(&columns.mass_balance));
        for name in required {
            if name.starts_with(prefix.as_str()) {
                bail!("required column '{name}' would be dropped by unlabeled prefix '{prefix}'");
            }
        }

        let anim = &self.animation;
        if anim.fps == 0 {
            bail!("fps must be at least 1");
        }
        if anim.dpi == 0 {
            bail!("dpi must be at least 1");
        }
        if !(anim.width_in > 0.0 && anim.height_in > 0.0) {
            bail!(
                "figure size must be positive, got {}x{} in",
                anim.width_in,
                anim.height_in
            );
        }
        if anim.tick_step == 0 {
            bail!("tick_step must be at least 1");
        }
        if !(anim.padding >= 0.0 && anim.padding.is_finite()) {
            bail!("padding must be a non-negative number, got {}", anim.padding);
        }
        Ok(())
    }
}
