//! Pollution severity scoring
//!
//! Upstream data arrives either as a 1-5 categorical AQI or as raw pollutant
//! concentrations. Both are folded into one 0-100 severity score.

use serde_json::Value;

use crate::models::Components;

/// Component keys accepted for fine particulate matter
pub const PM25_KEYS: [&str; 2] = ["pm2_5", "pm25"];

/// Estimate a 0-100 pollution score.
///
/// AQI wins when present: `(aqi - 1) * 25 + 20`, clamped to `[0, 100]`.
/// Otherwise PM2.5 is bucketed: `<=12 -> 10`, `<=35 -> 40`, `<=55 -> 70`,
/// anything higher `-> 90`. Returns `None` when neither is available.
pub fn estimate_pollution_score(aqi: Option<f64>, components: Option<&Components>) -> Option<f64> {
    if let Some(aqi) = aqi.filter(|v| v.is_finite()) {
        return Some(((aqi - 1.0) * 25.0 + 20.0).clamp(0.0, 100.0));
    }

    let pm25 = components.and_then(fine_particulates)?;
    let score = if pm25 <= 12.0 {
        10.0
    } else if pm25 <= 35.0 {
        40.0
    } else if pm25 <= 55.0 {
        70.0
    } else {
        90.0
    };
    Some(score)
}

/// PM2.5 concentration under either accepted key spelling
pub fn fine_particulates(components: &Components) -> Option<f64> {
    PM25_KEYS
        .iter()
        .find_map(|key| components.get(*key).copied())
        .filter(|v| v.is_finite())
}

/// Read a JSON value as a number, accepting numeric strings
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
