//! Buy/Hold/Sell classification from annualized return and risk.

use std::fmt;

/// Buy when annualized return exceeds this...
pub const BUY_MIN_RETURN: f64 = 0.10;
/// ...and annualized risk stays below this.
pub const BUY_MAX_RISK: f64 = 0.20;
/// Sell when annualized return is below this...
pub const SELL_MAX_RETURN: f64 = 0.05;
/// ...and annualized risk exceeds this.
pub const SELL_MIN_RISK: f64 = 0.30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Recommendation {
    Buy,
    Hold,
    Sell,
}

impl Recommendation {
    pub const ALL: [Recommendation; 3] = [Recommendation::Buy, Recommendation::Hold, Recommendation::Sell];

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Buy => "Buy",
            Recommendation::Hold => "Hold",
            Recommendation::Sell => "Sell",
        }
    }

    /// Chart colour: green / blue / red.
    pub fn color(&self) -> &'static str {
        match self {
            Recommendation::Buy => "#16a34a",
            Recommendation::Hold => "#2563eb",
            Recommendation::Sell => "#dc2626",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict comparisons: boundary values fall through to `Hold`, as do NaNs.
pub fn classify(mean_annual: f64, std_annual: f64) -> Recommendation {
    if mean_annual > BUY_MIN_RETURN && std_annual < BUY_MAX_RISK {
        Recommendation::Buy
    } else if mean_annual < SELL_MAX_RETURN && std_annual > SELL_MIN_RISK {
        Recommendation::Sell
    } else {
        Recommendation::Hold
    }
}
