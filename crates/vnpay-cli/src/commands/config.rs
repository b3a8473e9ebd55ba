use serde_json::Value;

use vnpay_core::PayrollConfig;

/// Echo the effective statutory tables (defaults or `--config`).
pub fn run_show_config(config: &PayrollConfig) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(config)?)
}
