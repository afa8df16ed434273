//! Post-processing of raw query rows into the stable shapes the dashboard
//! renders: numeric coercion, derived classification buckets and synthetic
//! display ids for views without a natural key.

use serde_json::{Map, Number, Value};
use sqlx::{Column, Row, TypeInfo, ValueRef, sqlite::SqliteRow};

/// Threshold below which a deficit is flagged as severe.
pub const SEVERE_DEFICIT_THRESHOLD: f64 = -1000.0;
/// Rainfall above this (mm) is bucketed as high.
pub const HIGH_RAINFALL_MM: f64 = 20.0;
/// Temperature above this (°C) is bucketed as high.
pub const HIGH_TEMPERATURE_C: f64 = 35.0;

/// Convert a row into a JSON object, keyed by projected column name.
pub fn row_to_object(row: &SqliteRow) -> Result<Map<String, Value>, sqlx::Error> {
    let mut object = Map::new();
    for column in row.columns() {
        let idx = column.ordinal();
        let raw = row.try_get_raw(idx)?;
        let value = if raw.is_null() {
            Value::Null
        } else {
            match raw.type_info().name() {
                "INTEGER" => Value::Number(row.try_get::<i64, _>(idx)?.into()),
                "REAL" => Number::from_f64(row.try_get::<f64, _>(idx)?)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                "TEXT" => Value::String(row.try_get::<String, _>(idx)?),
                _ => Value::Null,
            }
        };
        object.insert(column.name().to_string(), value);
    }
    Ok(object)
}

/// Force `field` to a JSON number. Strings are parsed; null, missing or
/// unparseable values become zero so downstream arithmetic stays safe.
pub fn coerce_number(object: &mut Map<String, Value>, field: &str) {
    let coerced = match object.get(field) {
        Some(Value::Number(_)) => return,
        Some(Value::String(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::from(0)),
        _ => Value::from(0),
    };
    object.insert(field.to_string(), coerced);
}

/// Numeric value of a field after coercion rules; zero when absent.
pub fn number(object: &Map<String, Value>, field: &str) -> f64 {
    match object.get(field) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Compose a display id out of key fields, e.g. `"1-2-2023-06"` for a
/// price-trend row. Missing fields render as empty segments.
pub fn synthesize_id(object: &Map<String, Value>, fields: &[&str]) -> String {
    let parts: Vec<String> = fields
        .iter()
        .map(|field| match object.get(*field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        })
        .collect();
    parts.join("-")
}

/// Surplus/deficit bucket. Exactly zero is a deficit.
pub fn surplus_status(surplus_deficit: f64) -> &'static str {
    if surplus_deficit > 0.0 {
        "Surplus"
    } else if surplus_deficit < SEVERE_DEFICIT_THRESHOLD {
        "Severe Deficit"
    } else {
        "Deficit"
    }
}

pub fn rainfall_bucket(rainfall_mm: f64) -> &'static str {
    if rainfall_mm > HIGH_RAINFALL_MM {
        "High Rainfall"
    } else {
        "Normal Rainfall"
    }
}

pub fn temperature_bucket(temperature_c: f64) -> &'static str {
    if temperature_c > HIGH_TEMPERATURE_C {
        "High Temperature"
    } else {
        "Normal Temperature"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn coerces_strings_nulls_and_garbage_to_numbers() {
        let mut row = object(json!({
            "a": "12.5",
            "b": null,
            "c": "not a number",
        }));
        for field in ["a", "b", "c", "missing"] {
            coerce_number(&mut row, field);
        }
        assert_eq!(row["a"], json!(12.5));
        assert_eq!(row["b"], json!(0));
        assert_eq!(row["c"], json!(0));
        assert_eq!(row["missing"], json!(0));
    }

    #[test]
    fn coercion_leaves_existing_numbers_alone() {
        let mut row = object(json!({ "a": 7 }));
        coerce_number(&mut row, "a");
        assert_eq!(row["a"], json!(7));
    }

    #[test]
    fn surplus_boundary_at_zero_is_deficit() {
        assert_eq!(surplus_status(0.0), "Deficit");
        assert_eq!(surplus_status(0.001), "Surplus");
        assert_eq!(surplus_status(-1.0), "Deficit");
        assert_eq!(surplus_status(-1000.0), "Deficit");
        assert_eq!(surplus_status(-1000.5), "Severe Deficit");
    }

    #[test]
    fn weather_buckets_use_fixed_thresholds() {
        assert_eq!(rainfall_bucket(20.0), "Normal Rainfall");
        assert_eq!(rainfall_bucket(20.1), "High Rainfall");
        assert_eq!(temperature_bucket(35.0), "Normal Temperature");
        assert_eq!(temperature_bucket(35.1), "High Temperature");
    }

    #[test]
    fn synthesizes_display_ids_from_key_fields() {
        let row = object(json!({
            "product_id": 1,
            "district_id": 2,
            "period": "2023-06",
        }));
        assert_eq!(
            synthesize_id(&row, &["product_id", "district_id", "period"]),
            "1-2-2023-06"
        );
    }
}
