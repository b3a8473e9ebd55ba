use serde_json::Value;

/// Print just the headline figure: net pay for gross-to-net, gross for
/// net-to-gross.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let solving_gross = value
        .pointer("/assumptions/mode")
        .and_then(Value::as_str)
        .is_some_and(|mode| mode == "NET_TO_GROSS");
    let key = if solving_gross { "gross" } else { "net" };

    match result_obj.get(key) {
        Some(Value::String(s)) => println!("{}", s),
        Some(val) => println!("{}", val),
        None => println!(
            "{}",
            serde_json::to_string(result_obj).unwrap_or_default()
        ),
    }
}
