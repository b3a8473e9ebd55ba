use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

use vnpay_core::display;
use vnpay_core::types::CalculationInput;
use vnpay_core::PayrollConfig;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_payroll(input_json: String) -> NapiResult<String> {
    let input: CalculationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = vnpay_core::calculate_payroll(&input, &PayrollConfig::default())
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_payroll_with_config(input_json: String, config_json: String) -> NapiResult<String> {
    let input: CalculationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = PayrollConfig::from_json(&config_json).map_err(to_napi_error)?;
    let output = vnpay_core::calculate_payroll(&input, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn default_config() -> NapiResult<String> {
    serde_json::to_string(&PayrollConfig::default()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// Amounts cross the boundary as decimal strings to avoid f64.
#[napi]
pub fn format_currency(amount: String) -> NapiResult<String> {
    let amount = Decimal::from_str(amount.trim()).map_err(to_napi_error)?;
    Ok(display::format_currency(amount))
}

#[napi]
pub fn parse_raw_input(value: String) -> NapiResult<String> {
    let amount = display::parse_raw_input(&value).map_err(to_napi_error)?;
    Ok(amount.to_string())
}
