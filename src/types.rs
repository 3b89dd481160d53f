// =============================================================================
// Shared types used across the Daybreak scanner core
// =============================================================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifying fields for one instrument, handed over by the market-listing
/// collaborator. The core passes them through without validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolMeta {
    /// Exchange symbol code (six digits on KRX, e.g. "005930").
    pub code: String,
    /// Display name of the instrument.
    pub name: String,
    /// Last daily change as delivered upstream (e.g. "+1.23%"). Kept verbatim.
    #[serde(default)]
    pub change_pct: String,
}

impl SymbolMeta {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        change_pct: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            change_pct: change_pct.into(),
        }
    }
}

/// Final verdict of the signal cascade for one instrument.
///
/// Variants are listed from most bullish to most bearish. The cascade picks
/// exactly one per run; `Display` renders the human-readable label shown in
/// result tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Moving-average breakout confirmed by a volume surge.
    StrongBuy,
    /// Moving-average breakout without volume confirmation.
    Breakout,
    /// Price holding within the support band around the moving average.
    BuyInterest,
    /// Uptrend intact, no entry trigger.
    Hold,
    /// Still above the moving average but momentum has faded two bars running.
    HoldFading,
    /// Stretched too far above the moving average to chase.
    Overheated,
    /// Below the moving average but momentum is improving.
    Watch,
    /// No rule matched.
    Neutral,
    /// Downtrend with momentum still deteriorating.
    Sell,
    /// Momentum flipped negative while price sat at or above the average.
    StrongSell,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::StrongBuy => "strong buy",
            Self::Breakout => "breakout",
            Self::BuyInterest => "buy interest",
            Self::Hold => "hold (uptrend intact)",
            Self::HoldFading => "hold (momentum fading)",
            Self::Overheated => "overheated (avoid chasing)",
            Self::Watch => "watch (possible bottoming)",
            Self::Neutral => "neutral (no clear signal)",
            Self::Sell => "sell (downtrend)",
            Self::StrongSell => "strong sell",
        };
        write!(f, "{label}")
    }
}

/// Why a symbol produced no output record.
///
/// Neither variant is a failure of the scan itself: a batch of N symbols
/// always completes and yields at most N records, with skipped symbols
/// reported alongside.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// Fewer valid bars survived normalization than the configured minimum.
    #[error("insufficient data: {have} bars after normalization, need {need}")]
    InsufficientData { have: usize, need: usize },

    /// Raw rows were supplied but none of them had a parseable date and close.
    #[error("malformed input: none of {total_rows} raw rows parsed")]
    MalformedInput { total_rows: usize },
}
