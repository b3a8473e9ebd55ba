use serde_json::Value;
use std::io;

/// Write output as two-column CSV (field, value) to stdout.
///
/// Nested objects and arrays are flattened into dotted paths, so a bracket
/// amount appears as `tax_brackets.1.amount`. Warnings follow the result.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let _ = wtr.write_record(["field", "value"]);

    let mut rows = Vec::new();
    match value.as_object() {
        Some(map) if map.contains_key("result") => {
            if let Some(result) = map.get("result") {
                flatten("", result, &mut rows);
            }
            if let Some(warnings) = map.get("warnings") {
                flatten("warnings", warnings, &mut rows);
            }
        }
        _ => flatten("", value, &mut rows),
    }

    for (field, val) in rows {
        let _ = wtr.write_record([field, val]);
    }
    let _ = wtr.flush();
}

fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                flatten(&join(prefix, key), val, rows);
            }
        }
        Value::Array(arr) => {
            for (i, val) in arr.iter().enumerate() {
                flatten(&join(prefix, &i.to_string()), val, rows);
            }
        }
        Value::String(s) => rows.push((prefix.to_string(), s.clone())),
        Value::Number(n) => rows.push((prefix.to_string(), n.to_string())),
        Value::Bool(b) => rows.push((prefix.to_string(), b.to_string())),
        Value::Null => rows.push((prefix.to_string(), String::new())),
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_paths() {
        let mut rows = Vec::new();
        flatten(
            "",
            &json!({"insurance": {"bhxh": "2800000"}, "tax_brackets": [{"limit": null}]}),
            &mut rows,
        );
        assert_eq!(
            rows,
            vec![
                ("insurance.bhxh".to_string(), "2800000".to_string()),
                ("tax_brackets.0.limit".to_string(), String::new()),
            ]
        );
    }
}
