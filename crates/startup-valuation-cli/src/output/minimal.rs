use serde_json::Value;

use super::format_scalar;

/// Keys tried in order when picking the single answer to print.
const PRIORITY_KEYS: [&str; 5] = ["value", "overallRisk", "wacc", "multipliers", "fields"];

/// Print just the key answer from the output.
///
/// A valuation prints its range as `low high confidence`; everything else
/// prints the first priority key present, then falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        if let Some(Value::Object(range)) = map.get("range") {
            let field = |k: &str| range.get(k).map(format_scalar).unwrap_or_default();
            println!("{} {} {}", field("low"), field("high"), field("confidence"));
            return;
        }

        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key) {
                if !val.is_null() {
                    println!("{}", format_scalar(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val));
            return;
        }
    }

    println!("{}", format_scalar(result_obj));
}
