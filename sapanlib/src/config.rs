//! Конфигурация приложения.
//!
//! Порядок приоритета (от высшего):
//! 1. Флаги CLI (бинарник накладывает их на загруженное значение)
//! 2. TOML-файл (`--config` или `sapan.toml` в рабочем каталоге)
//! 3. Значения по умолчанию

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SapanError};

pub const DEFAULT_CONFIG_FILE: &str = "sapan.toml";

/// Inclusive value range for generated quantities and amounts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DecimalRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl DecimalRange {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: Decimal) -> bool {
        self.min <= v && v <= self.max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub records: usize,
    /// Width of the posting-date window, ending the day before `end_date`.
    pub days: u32,
    /// Defaults to today when unset.
    pub end_date: Option<NaiveDate>,
    pub seed: Option<u64>,
    pub quantity: DecimalRange,
    pub amount: DecimalRange,
    pub currency: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            records: 1000,
            days: 730,
            end_date: None,
            seed: None,
            quantity: DecimalRange::new(Decimal::new(100, 2), Decimal::new(100_000, 2)),
            amount: DecimalRange::new(Decimal::new(1_000, 2), Decimal::new(1_000_000, 2)),
            currency: "EUR".to_string(),
        }
    }
}

/// Cumulative-percentage cut-offs for ABC classes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AbcThresholds {
    pub a: f64,
    pub b: f64,
}

impl Default for AbcThresholds {
    fn default() -> Self {
        Self { a: 80.0, b: 95.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub rolling_window: usize,
    pub abc: AbcThresholds,
    /// Bars shown on the cost-center chart.
    pub top_cost_centers: usize,
    /// Rows shown in the data preview table.
    pub preview_rows: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rolling_window: 3,
            abc: AbcThresholds::default(),
            top_cost_centers: 10,
            preview_rows: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    /// Reads `explicit` if given, else `sapan.toml` in `cwd` when it exists, else defaults.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let fallback = cwd.join(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(&fallback)?
                } else {
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading config");
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.generator.validate()?;
        self.analysis.validate()
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.days == 0 {
            return Err(SapanError::Config("generator.days must be at least 1".into()));
        }
        for (name, range) in [("quantity", &self.quantity), ("amount", &self.amount)] {
            if range.min > range.max {
                return Err(SapanError::Config(format!(
                    "generator.{name}: min {} is greater than max {}",
                    range.min, range.max
                )));
            }
        }
        if self.currency.trim().is_empty() {
            return Err(SapanError::Config("generator.currency must not be empty".into()));
        }
        Ok(())
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        let AbcThresholds { a, b } = self.abc;
        if !(a > 0.0 && a <= b && b <= 100.0) {
            return Err(SapanError::Config(format!(
                "analysis.abc: need 0 < a <= b <= 100, got a={a}, b={b}"
            )));
        }
        if self.rolling_window == 0 {
            return Err(SapanError::Config("analysis.rolling_window must be at least 1".into()));
        }
        if self.top_cost_centers == 0 {
            return Err(SapanError::Config("analysis.top_cost_centers must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
[generator]
records = 42
seed = 7

[analysis.abc]
a = 70.0
"#,
        )
        .expect("parse");
        assert_eq!(cfg.generator.records, 42);
        assert_eq!(cfg.generator.seed, Some(7));
        assert_eq!(cfg.generator.days, 730);
        assert_eq!(cfg.analysis.abc.a, 70.0);
        assert_eq!(cfg.analysis.abc.b, 95.0);
        cfg.validate().expect("valid");
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.generator.amount = DecimalRange::new(Decimal::new(10, 0), Decimal::new(1, 0));
        assert!(matches!(cfg.validate(), Err(SapanError::Config(_))));
    }

    #[test]
    fn bad_thresholds_are_rejected() {
        let mut cfg = AppConfig::default();
        cfg.analysis.abc = AbcThresholds { a: 96.0, b: 95.0 };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_default_file_means_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = AppConfig::load(None, dir.path()).expect("load");
        assert_eq!(cfg, AppConfig::default());
    }
}
