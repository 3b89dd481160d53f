// =============================================================================
// Daybreak Scan — daily-bar indicator and classification core
// =============================================================================
//
// Pure computation core of a KRX end-of-day scanner. Collaborators feed it
// symbol metadata and raw scraped price rows; it normalizes them, derives
// the indicator series, runs the signal cascade, and hands back formatted
// output records. No fetching, no UI, no persistence beyond the config file.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
pub mod assemble;
pub mod classifier;
pub mod config;
pub mod indicators;
pub mod scan;
pub mod series;
pub mod types;

pub use assemble::OutputRecord;
pub use classifier::{classify_snapshot, ClassificationResult, SignalSnapshot};
pub use config::ScanConfig;
pub use indicators::{IndicatorSeries, IndicatorSet};
pub use scan::{classify, run_scan, ScanInput, ScanReport, SkipEntry};
pub use series::{PriceBar, PriceSeries, RawBarRow};
pub use types::{SkipReason, Status, SymbolMeta};
