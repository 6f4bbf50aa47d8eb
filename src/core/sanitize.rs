//! Cleanup of the provider's astronomical fields.
//!
//! The forecast API reports missing events with placeholder text such as
//! `"No moonrise"`. Downstream reports expect `null` instead.

use serde_json::{Map, Value};

/// The four time-of-day fields of an `astro` block.
pub const ASTRO_TIME_FIELDS: [&str; 4] = ["sunrise", "sunset", "moonrise", "moonset"];

/// 判斷字串是否為「沒有資料」的佔位字
pub fn is_sentinel(raw: &str) -> bool {
    let value = raw.trim().to_lowercase();
    value.is_empty() || value.starts_with("no ") || value == "null" || value == "none"
}

/// Returns a cleaned copy of one day's `astro` record.
///
/// Each time field becomes `null` when missing, already `null`, or a sentinel
/// string. Non-string values and every other key are copied as-is.
pub fn sanitize_astro(astro: &Map<String, Value>) -> Map<String, Value> {
    let mut cleaned = Map::with_capacity(astro.len() + ASTRO_TIME_FIELDS.len());

    for (key, value) in astro {
        let value = if ASTRO_TIME_FIELDS.contains(&key.as_str()) {
            sanitize_time_value(value)
        } else {
            value.clone()
        };
        cleaned.insert(key.clone(), value);
    }

    for field in ASTRO_TIME_FIELDS {
        if !cleaned.contains_key(field) {
            cleaned.insert(field.to_string(), Value::Null);
        }
    }

    cleaned
}

fn sanitize_time_value(value: &Value) -> Value {
    match value {
        Value::String(s) if is_sentinel(s) => Value::Null,
        other => other.clone(),
    }
}

/// Applies [`sanitize_astro`] to every `forecast.forecastday[*].astro` object.
///
/// Nothing else in the document is touched; days without an `astro` object
/// and documents without a `forecastday` array come back unchanged.
pub fn normalize_forecast(mut document: Value) -> Value {
    let days = document
        .get_mut("forecast")
        .and_then(|forecast| forecast.get_mut("forecastday"))
        .and_then(Value::as_array_mut);

    if let Some(days) = days {
        for day in days.iter_mut() {
            let Some(day) = day.as_object_mut() else {
                continue;
            };
            if let Some(Value::Object(astro)) = day.get("astro") {
                let cleaned = sanitize_astro(astro);
                day.insert("astro".to_string(), Value::Object(cleaned));
            }
        }
    }

    document
}
