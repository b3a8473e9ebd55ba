use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use vnpay_core::display::parse_raw_input;
use vnpay_core::types::{CalculationInput, CalculationMode, Region};
use vnpay_core::{calculate_payroll, PayrollConfig};

use crate::input;

/// Arguments shared by gross-to-net and net-to-gross
#[derive(Args)]
pub struct SalaryArgs {
    /// Monthly gross (or target net for net-to-gross) in VND; separators are ignored
    #[arg(long, value_parser = parse_amount)]
    pub salary: Decimal,

    /// Taxable allowance outside the insurance base
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub allowance: Decimal,

    /// Number of registered dependents
    #[arg(long, default_value_t = 0)]
    pub dependents: u32,

    /// Minimum-wage region: I, II, III or IV
    #[arg(long, default_value = "I")]
    pub region: Region,

    /// Foreign employee (no unemployment insurance)
    #[arg(long)]
    pub expat: bool,

    /// Probation or casual contract (flat 10% withholding, no insurance)
    #[arg(long)]
    pub probation: bool,
}

/// Arguments for a calculation described by a JSON document
#[derive(Args)]
pub struct CalculateArgs {
    /// Path to JSON file with a CalculationInput (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,
}

fn parse_amount(s: &str) -> Result<Decimal, String> {
    parse_raw_input(s).map_err(|e| e.to_string())
}

impl SalaryArgs {
    fn into_input(self, mode: CalculationMode) -> CalculationInput {
        CalculationInput {
            mode,
            salary: self.salary,
            taxable_allowance: self.allowance,
            dependents: self.dependents,
            region: self.region,
            is_expat: self.expat,
            is_probation: self.probation,
        }
    }
}

pub fn run_gross_to_net(
    args: SalaryArgs,
    config: &PayrollConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let input = args.into_input(CalculationMode::GrossToNet);
    let result = calculate_payroll(&input, config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_net_to_gross(
    args: SalaryArgs,
    config: &PayrollConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let input = args.into_input(CalculationMode::NetToGross);
    let result = calculate_payroll(&input, config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_calculate(
    args: CalculateArgs,
    config: &PayrollConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let calc_input: CalculationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input file is required (or pipe JSON on stdin)".into());
    };

    let result = calculate_payroll(&calc_input, config)?;
    Ok(serde_json::to_value(result)?)
}
