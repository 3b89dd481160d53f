// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free calculators over a normalized price series. Every
// calculator returns an `IndicatorSeries` aligned 1:1 by position with its
// input, with a leading run of `None` equal to the minimum lookback minus one.
// Missing inputs and numerical edge cases (zero deviation, zero averages)
// propagate as `None` so the classifier can treat "undefined" as a
// first-class case.

pub mod atr;
pub mod cci;
pub mod disparity;
pub mod ema;
pub mod macd;
pub mod sma;

use crate::config::ScanConfig;
use crate::series::PriceSeries;

/// A derived series aligned by position with the price series it came from.
pub type IndicatorSeries = Vec<Option<f64>>;

/// Every derived series one classification pass needs, computed in one place
/// and read-only afterwards.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    /// SMA of closes over `config.ma_window`.
    pub sma: IndicatorSeries,
    /// SMA of volumes over `config.vol_ma_window`.
    pub vol_ma: IndicatorSeries,
    /// MACD line / signal line / histogram.
    pub macd: macd::MacdSeries,
    /// Commodity Channel Index over `config.cci_period`.
    pub cci: IndicatorSeries,
    /// Average True Range over `config.atr_period`.
    pub atr: IndicatorSeries,
    /// Percent deviation of close from its SMA.
    pub disparity: IndicatorSeries,
}

impl IndicatorSet {
    /// Compute all indicator series for one price series.
    pub fn compute(series: &PriceSeries, config: &ScanConfig) -> Self {
        let closes = series.closes();

        let sma = sma::calculate_sma(&closes, config.ma_window);
        let vol_ma = sma::calculate_sma_optional(&series.volumes(), config.vol_ma_window);
        let macd = macd::calculate_macd(
            &closes,
            config.macd_fast,
            config.macd_slow,
            config.macd_signal,
        );
        let cci = cci::calculate_cci(series.bars(), config.cci_period);
        let atr = atr::calculate_atr(series.bars(), config.atr_period);
        let disparity = disparity::calculate_disparity(&closes, &sma);

        Self {
            sma,
            vol_ma,
            macd,
            cci,
            atr,
            disparity,
        }
    }
}
