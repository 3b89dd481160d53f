// =============================================================================
// Scan orchestration — per-symbol pipeline and the parallel batch
// =============================================================================
//
// One symbol flows normalize -> indicators -> snapshot -> cascade -> record.
// The batch maps that pipeline across instruments on the rayon pool; symbols
// are independent, so a skip on one never touches the others, and the output
// vectors keep the input order.

use chrono::Utc;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::assemble::{assemble_record, OutputRecord};
use crate::classifier::{classify_snapshot, SignalSnapshot};
use crate::config::ScanConfig;
use crate::indicators::{atr, IndicatorSet};
use crate::series::{PriceSeries, RawBarRow};
use crate::types::{SkipReason, SymbolMeta};

/// Everything the scan needs for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanInput {
    pub meta: SymbolMeta,
    pub rows: Vec<RawBarRow>,
}

/// A skipped instrument and the rendered reason, kept alongside the records
/// so a batch of N symbols always accounts for all N.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkipEntry {
    pub code: String,
    pub reason: String,
}

/// Result envelope for one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Fresh v4 id per run; callers key their caches on it.
    pub run_id: String,
    /// RFC 3339 creation time.
    pub created_at: String,
    pub records: Vec<OutputRecord>,
    pub skips: Vec<SkipEntry>,
}

/// Classify one instrument from its raw scraped rows.
///
/// `Err` is an accounted-for skip, not a failure: thin history and fully
/// unparseable payloads are expected upstream conditions.
pub fn classify(
    meta: &SymbolMeta,
    raw_rows: &[RawBarRow],
    config: &ScanConfig,
) -> Result<OutputRecord, SkipReason> {
    let series = PriceSeries::from_raw_rows(raw_rows, config.min_bars)?;
    let indicators = IndicatorSet::compute(&series, config);

    // Both gates below only trip when `min_bars` is configured below the
    // indicator windows; with the defaults the normalizer has already
    // guaranteed enough history.
    let Some(snapshot) = SignalSnapshot::capture(&series, &indicators) else {
        return Err(SkipReason::InsufficientData {
            have: series.len(),
            need: config.min_bars.max(2),
        });
    };
    let Some(sma) = snapshot.sma else {
        return Err(SkipReason::InsufficientData {
            have: series.len(),
            need: config.min_bars.max(config.ma_window),
        });
    };

    let classification = classify_snapshot(&snapshot, config);

    let band = indicators.atr.last().copied().flatten().map(|atr_value| {
        atr::protective_band(
            snapshot.close,
            atr_value,
            config.stop_atr_multiplier,
            config.target_atr_multiplier,
        )
    });

    let record = assemble_record(
        meta,
        snapshot.close,
        sma,
        snapshot.disparity,
        band,
        &classification,
    );
    debug!(
        code = %meta.code,
        status = %record.status,
        rationale = %record.rationale,
        "classified symbol"
    );
    Ok(record)
}

/// Run the whole batch on the rayon pool.
///
/// Records and skips each keep the input order; together they account for
/// every input exactly once.
pub fn run_scan(inputs: &[ScanInput], config: &ScanConfig) -> ScanReport {
    let outcomes: Vec<Result<OutputRecord, (String, SkipReason)>> = inputs
        .par_iter()
        .map(|input| {
            classify(&input.meta, &input.rows, config)
                .map_err(|reason| (input.meta.code.clone(), reason))
        })
        .collect();

    let mut records = Vec::new();
    let mut skips = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(record) => records.push(record),
            Err((code, reason)) => skips.push(SkipEntry {
                code,
                reason: reason.to_string(),
            }),
        }
    }

    info!(
        total = inputs.len(),
        records = records.len(),
        skips = skips.len(),
        "scan complete"
    );

    ScanReport {
        run_id: Uuid::new_v4().to_string(),
        created_at: Utc::now().to_rfc3339(),
        records,
        skips,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;
    use chrono::NaiveDate;

    /// Raw rows for the given closes, one per day from 2024-01-01, flat OHLC
    /// and constant volume.
    fn rows(closes: &[f64]) -> Vec<RawBarRow> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let date = start + chrono::Duration::days(i as i64);
                let price = format!("{close}");
                RawBarRow::new(
                    date.format("%Y.%m.%d").to_string(),
                    &price,
                    &price,
                    &price,
                    &price,
                    "1000",
                )
            })
            .collect()
    }

    /// 56 bars: long shelf at 100, pullback to 90, recovery close at 120.
    fn breakout_closes() -> Vec<f64> {
        let mut closes = vec![100.0; 45];
        closes.extend(vec![90.0; 10]);
        closes.push(120.0);
        closes
    }

    #[test]
    fn too_few_bars_is_a_skip_not_a_record() {
        let meta = SymbolMeta::new("005930", "Samsung Electronics", "+0.85%");
        let closes = vec![100.0; 39];
        let err = classify(&meta, &rows(&closes), &ScanConfig::default()).unwrap_err();
        assert_eq!(err, SkipReason::InsufficientData { have: 39, need: 40 });
    }

    #[test]
    fn forty_bars_is_enough() {
        let meta = SymbolMeta::new("005930", "Samsung Electronics", "+0.85%");
        let closes = vec![100.0; 40];
        assert!(classify(&meta, &rows(&closes), &ScanConfig::default()).is_ok());
    }

    #[test]
    fn garbage_rows_are_malformed_input() {
        let meta = SymbolMeta::new("000001", "Broken Feed", "");
        let garbage: Vec<RawBarRow> = (0..5)
            .map(|_| RawBarRow::new("??", "", "", "", "n/a", ""))
            .collect();
        let err = classify(&meta, &garbage, &ScanConfig::default()).unwrap_err();
        assert_eq!(err, SkipReason::MalformedInput { total_rows: 5 });
    }

    #[test]
    fn classify_is_deterministic() {
        let meta = SymbolMeta::new("005930", "Samsung Electronics", "+0.85%");
        let config = ScanConfig::default();
        let raw = rows(&breakout_closes());
        let first = classify(&meta, &raw, &config).unwrap();
        let second = classify(&meta, &raw, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn breakout_record_end_to_end() {
        let meta = SymbolMeta::new("005930", "Samsung Electronics", "+0.85%");
        let record = classify(&meta, &rows(&breakout_closes()), &ScanConfig::default()).unwrap();

        assert_eq!(record.code, "005930");
        assert_eq!(record.link_code, "005930");
        assert_eq!(record.change_pct, "+0.85%");
        assert_eq!(record.close, 120);
        // SMA(20) over 9x100 + 10x90 + 120 = 96.
        assert_eq!(record.ma, 96);
        assert_eq!(record.ma_gap, 24);
        assert_eq!(record.disparity, "+25.00%");
        // ATR(14) = (10 + 30) / 14; band = 120 -/+ 2*ATR -> 114.29 / 125.71.
        assert_eq!(record.band, "114 / 126");
        assert_eq!(record.status, Status::Breakout);
        assert_eq!(
            record.rationale,
            "moving-average breakout; CCI +100 breakout; accelerating"
        );
    }

    #[test]
    fn batch_preserves_order_and_isolates_skips() {
        let config = ScanConfig::default();
        let inputs = vec![
            ScanInput {
                meta: SymbolMeta::new("000100", "First", ""),
                rows: rows(&breakout_closes()),
            },
            ScanInput {
                meta: SymbolMeta::new("000200", "Thin History", ""),
                rows: rows(&vec![100.0; 10]),
            },
            ScanInput {
                meta: SymbolMeta::new("000300", "Third", ""),
                rows: rows(&vec![100.0; 60]),
            },
        ];

        let report = run_scan(&inputs, &config);

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].code, "000100");
        assert_eq!(report.records[1].code, "000300");
        assert_eq!(report.skips.len(), 1);
        assert_eq!(report.skips[0].code, "000200");
        assert!(report.skips[0].reason.contains("insufficient data"));
    }

    #[test]
    fn report_envelope_has_id_and_timestamp() {
        let report = run_scan(&[], &ScanConfig::default());
        assert_eq!(report.run_id.len(), 36);
        assert!(chrono::DateTime::parse_from_rfc3339(&report.created_at).is_ok());
        assert!(report.records.is_empty());
        assert!(report.skips.is_empty());
    }

    #[test]
    fn empty_input_list_is_a_valid_batch() {
        let report = run_scan(&[], &ScanConfig::default());
        assert!(report.records.is_empty());
    }
}
