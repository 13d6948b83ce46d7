//! Display formatting for quote values

use serde_json::Value;

use crate::model::NOT_AVAILABLE;

/// Unit appended to the domestic traded value (hundred-million won)
pub const TRADING_VALUE_UNIT: &str = "억원";

/// Change shown when a domestic row has no change figures
pub const FLAT_CHANGE: &str = "0.0%";

/// Format a raw market capitalisation as `$x.xT` / `$x.xB`.
///
/// Anything that is not a finite number renders as `N/A`.
pub fn format_market_cap(raw: Option<&Value>) -> String {
    match raw.and_then(Value::as_f64).filter(|v| v.is_finite()) {
        Some(cap) if cap >= 1e12 => format!("${:.1}T", cap / 1e12),
        Some(cap) => format!("${:.1}B", cap / 1e9),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Percentage change between the two most recent closes, e.g. `+5.0%`.
///
/// `closes` is ordered oldest first.
pub fn format_change_pct(closes: &[f64]) -> String {
    let [.., previous, last] = closes else {
        return NOT_AVAILABLE.to_string();
    };
    if *previous == 0.0 || !previous.is_finite() || !last.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let pct = (last - previous) / previous * 100.0;
    format!("{:+.1}%", pct)
}

/// Dollar price with two decimals
pub fn format_usd_price(price: Option<f64>) -> String {
    match price.filter(|p| p.is_finite()) {
        Some(p) => format!("${:.2}", p),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Domestic change column: `<absolute> (<percent>)` when both are present.
pub fn format_domestic_change(absolute: &str, percent: &str) -> String {
    if absolute.is_empty() || percent.is_empty() {
        FLAT_CHANGE.to_string()
    } else {
        format!("{} ({})", absolute, percent)
    }
}

/// Domestic traded value with its currency unit
pub fn format_trading_value(value: &str) -> String {
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        format!("{}{}", value, TRADING_VALUE_UNIT)
    }
}
