use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{decimal_field, money};

/// Summary rows: JSON pointer into the result, display label.
const SUMMARY_ROWS: [(&str, &str); 14] = [
    ("/gross", "Gross salary"),
    ("/taxable_allowance", "Taxable allowance"),
    ("/insurance/bhxh", "Social insurance (BHXH)"),
    ("/insurance/bhyt", "Health insurance (BHYT)"),
    ("/insurance/bhtn", "Unemployment insurance (BHTN)"),
    ("/insurance/total", "Employee insurance"),
    ("/income_before_tax", "Income before tax"),
    ("/deductions/personal", "Personal deduction"),
    ("/deductions/dependents", "Dependent deduction"),
    ("/taxable_income", "Taxable income"),
    ("/tax", "Personal income tax"),
    ("/net", "Net salary"),
    ("/employer_insurance", "Employer insurance"),
    ("/employer_cost", "Employer cost"),
];

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) if result.is_object() => print_payroll(result, map),
            _ => print_flat_object(value),
        },
        _ => println!("{}", value),
    }
}

fn print_payroll(result: &Value, envelope: &serde_json::Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Item", "Amount"]);
    for (pointer, label) in SUMMARY_ROWS {
        if let Some(val) = result.pointer(pointer) {
            builder.push_record([label.to_string(), money(val)]);
        }
    }
    if let Some(ratio) = net_ratio(result) {
        builder.push_record(["Net / gross".to_string(), format!("{ratio}%")]);
    }
    println!("{}", Table::from(builder));

    if let Some(Value::Array(brackets)) = result.get("tax_brackets") {
        if !brackets.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Bracket", "Up to", "Rate", "Tax"]);
            for bracket in brackets {
                let limit = match bracket.get("limit") {
                    Some(Value::Null) | None => "no limit".to_string(),
                    Some(val) => money(val),
                };
                builder.push_record([
                    bracket
                        .get("label")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    limit,
                    bracket.get("rate").map(percent).unwrap_or_default(),
                    bracket.get("amount").map(money).unwrap_or_default(),
                ]);
            }
            println!("\n{}", Table::from(builder));
        }
    }

    if let Some(comparison) = result.get("comparison") {
        let prior = comparison
            .get("prior_regime")
            .and_then(Value::as_str)
            .unwrap_or("prior");
        let mut builder = Builder::default();
        builder.push_record(["Comparison", "Amount"]);
        builder.push_record([
            format!("Net under {prior} rules"),
            comparison.get("prior_net").map(money).unwrap_or_default(),
        ]);
        builder.push_record([
            "Increase".to_string(),
            comparison.get("increase").map(money).unwrap_or_default(),
        ]);
        if let Some(pct) = comparison.get("increase_percentage").and_then(decimal_field) {
            builder.push_record(["Increase %".to_string(), format!("{}%", pct.round_dp(1))]);
        }
        println!("\n{}", Table::from(builder));
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

/// Net as a whole percentage of gross.
fn net_ratio(result: &Value) -> Option<Decimal> {
    let gross = result.get("gross").and_then(decimal_field)?;
    let net = result.get("net").and_then(decimal_field)?;
    if gross <= Decimal::ZERO {
        return None;
    }
    Some((net / gross * dec!(100)).round())
}

fn percent(rate: &Value) -> String {
    decimal_field(rate)
        .map(|r| format!("{}%", (r * dec!(100)).normalize()))
        .unwrap_or_default()
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
