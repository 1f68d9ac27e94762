//! Rate and frequency normalisation
//!
//! All annual rates on the input side are expressed in percent (5.0 = 5%).
//! The engine works in effective monthly decimal rates.

use serde::{Deserialize, Serialize};

/// Recurrence of an input amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    #[default]
    Monthly,
    Yearly,
    Weekly,
    Daily,
    /// Anything unrecognised is treated as already monthly
    #[serde(other)]
    Other,
}

impl Frequency {
    /// Convert an amount paid at this frequency into its monthly equivalent
    pub fn monthly_equivalent(self, amount: f64) -> f64 {
        match self {
            Frequency::Monthly | Frequency::Other => amount,
            Frequency::Yearly => amount / 12.0,
            Frequency::Weekly => amount * (52.0 / 12.0),
            Frequency::Daily => amount * 30.0,
        }
    }
}

/// Effective monthly rate for an annual percentage rate
///
/// `(1 + pct/100)^(1/12) - 1`, so twelve monthly compoundings reproduce the
/// annual rate exactly.
pub fn monthly_rate(annual_percent: f64) -> f64 {
    if annual_percent == 0.0 {
        return 0.0;
    }
    (1.0 + annual_percent / 100.0).powf(1.0 / 12.0) - 1.0
}

/// Divisor derived from an inflation rate (decimal), floored to 1.0 when it
/// would be non-positive
pub fn inflation_denominator(inflation_decimal: f64) -> f64 {
    let denom = 1.0 + inflation_decimal;
    if denom <= 0.0 {
        1.0
    } else {
        denom
    }
}

/// Real annual return in percent from nominal ROI, dividend yield and inflation
/// (all in percent)
///
/// `((1 + roi) * (1 + dividend) / (1 + inflation) - 1) * 100`
pub fn real_annual_percent(roi_pct: f64, dividend_pct: f64, inflation_pct: f64) -> f64 {
    let roi = roi_pct / 100.0;
    let dividend = dividend_pct / 100.0;
    let denom = inflation_denominator(inflation_pct / 100.0);
    ((1.0 + roi) * (1.0 + dividend) / denom - 1.0) * 100.0
}

/// Round to cents
pub fn round2(value: f64) -> f64 {
    // `+ 0.0` turns -0.0 into 0.0
    (value * 100.0).round() / 100.0 + 0.0
}
