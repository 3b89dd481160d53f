// =============================================================================
// Scan Configuration
// =============================================================================
//
// Every tunable used by the indicator engine and the signal cascade lives
// here as a named field. The corpus of scanner variants this crate replaces
// disagreed on several of these values (overextension ceilings of 5/10/12/15%,
// proximity bands of 2/3%); the defaults below are the canonical picks and are
// documented per field.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash. All fields carry `#[serde(default)]` so that adding new fields never
// breaks loading an older config file.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_min_bars() -> usize {
    40
}

fn default_ma_window() -> usize {
    20
}

fn default_vol_ma_window() -> usize {
    5
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_cci_period() -> usize {
    20
}

fn default_atr_period() -> usize {
    14
}

fn default_overextension_ceiling_pct() -> f64 {
    10.0
}

fn default_proximity_band_pct() -> f64 {
    3.0
}

fn default_stop_atr_multiplier() -> f64 {
    2.0
}

fn default_target_atr_multiplier() -> f64 {
    2.0
}

fn default_volume_surge_ratio() -> f64 {
    1.2
}

fn default_cci_breakout_level() -> f64 {
    100.0
}

// =============================================================================
// ScanConfig
// =============================================================================

/// Tunable parameters for one scan run.
///
/// Every field has a serde default so that older JSON files missing new fields
/// still deserialise correctly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    // --- Data sufficiency ----------------------------------------------------

    /// Minimum number of valid daily bars a series must keep after
    /// normalization. Defaults to 40: the longest lookback (20) plus enough
    /// buffer for the multi-bar trend checks of the cascade.
    #[serde(default = "default_min_bars")]
    pub min_bars: usize,

    // --- Indicator windows ---------------------------------------------------

    /// Window of the close-price simple moving average the cascade pivots on.
    #[serde(default = "default_ma_window")]
    pub ma_window: usize,

    /// Window of the volume moving average used for surge confirmation.
    #[serde(default = "default_vol_ma_window")]
    pub vol_ma_window: usize,

    /// MACD fast EMA span.
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    /// MACD slow EMA span.
    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    /// Span of the EMA applied to the MACD line to form the signal line.
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    /// Commodity Channel Index lookback.
    #[serde(default = "default_cci_period")]
    pub cci_period: usize,

    /// Average True Range lookback.
    #[serde(default = "default_atr_period")]
    pub atr_period: usize,

    // --- Cascade thresholds --------------------------------------------------

    /// Disparity ceiling (percent) above which a stock counts as overheated.
    /// Corpus variants used 5/10/12/15; 10.0 is the canonical default.
    #[serde(default = "default_overextension_ceiling_pct")]
    pub overextension_ceiling_pct: f64,

    /// Half-width (percent) of the band around the moving average inside
    /// which price counts as sitting at support.
    #[serde(default = "default_proximity_band_pct")]
    pub proximity_band_pct: f64,

    /// ATR multiplier for the stop side of the protective display band.
    #[serde(default = "default_stop_atr_multiplier")]
    pub stop_atr_multiplier: f64,

    /// ATR multiplier for the target side of the protective display band.
    #[serde(default = "default_target_atr_multiplier")]
    pub target_atr_multiplier: f64,

    /// A breakout is volume-confirmed when the last volume exceeds the volume
    /// moving average times this ratio.
    #[serde(default = "default_volume_surge_ratio")]
    pub volume_surge_ratio: f64,

    /// CCI threshold whose crossings contribute confirmation tokens to the
    /// rationale (crossed at +level and -level).
    #[serde(default = "default_cci_breakout_level")]
    pub cci_breakout_level: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_bars: default_min_bars(),
            ma_window: default_ma_window(),
            vol_ma_window: default_vol_ma_window(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            cci_period: default_cci_period(),
            atr_period: default_atr_period(),
            overextension_ceiling_pct: default_overextension_ceiling_pct(),
            proximity_band_pct: default_proximity_band_pct(),
            stop_atr_multiplier: default_stop_atr_multiplier(),
            target_atr_multiplier: default_target_atr_multiplier(),
            volume_surge_ratio: default_volume_surge_ratio(),
            cci_breakout_level: default_cci_breakout_level(),
        }
    }
}

impl ScanConfig {
    /// Load a configuration from a JSON file at `path`.
    ///
    /// Returns an error when the file is missing or malformed so the caller
    /// can decide whether to fall back to `ScanConfig::default()`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scan config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse scan config from {}", path.display()))?;

        info!(
            path = %path.display(),
            min_bars = config.min_bars,
            ma_window = config.ma_window,
            "scan config loaded"
        );

        Ok(config)
    }

    /// Persist the configuration to `path` using an atomic write (write to a
    /// `.tmp` sibling, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content =
            serde_json::to_string_pretty(self).context("failed to serialise scan config")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "scan config saved (atomic)");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = ScanConfig::default();
        assert_eq!(cfg.min_bars, 40);
        assert_eq!(cfg.ma_window, 20);
        assert_eq!(cfg.vol_ma_window, 5);
        assert_eq!(cfg.macd_fast, 12);
        assert_eq!(cfg.macd_slow, 26);
        assert_eq!(cfg.macd_signal, 9);
        assert_eq!(cfg.cci_period, 20);
        assert_eq!(cfg.atr_period, 14);
        assert!((cfg.overextension_ceiling_pct - 10.0).abs() < f64::EPSILON);
        assert!((cfg.proximity_band_pct - 3.0).abs() < f64::EPSILON);
        assert!((cfg.stop_atr_multiplier - 2.0).abs() < f64::EPSILON);
        assert!((cfg.target_atr_multiplier - 2.0).abs() < f64::EPSILON);
        assert!((cfg.volume_surge_ratio - 1.2).abs() < f64::EPSILON);
        assert!((cfg.cci_breakout_level - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: ScanConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, ScanConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "min_bars": 60, "overextension_ceiling_pct": 15.0 }"#;
        let cfg: ScanConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.min_bars, 60);
        assert!((cfg.overextension_ceiling_pct - 15.0).abs() < f64::EPSILON);
        assert_eq!(cfg.ma_window, 20);
        assert!((cfg.proximity_band_pct - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn roundtrip_serialisation() {
        let cfg = ScanConfig {
            min_bars: 50,
            proximity_band_pct: 2.0,
            ..ScanConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let cfg2: ScanConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, cfg2);
    }
}
