use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PayrollError;

/// All monetary values, in VND. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.08 = 8%). Never as percentages.
pub type Rate = Decimal;

/// Round to the nearest whole VND, halves toward positive infinity.
pub fn round_vnd(amount: Money) -> Money {
    (amount + dec!(0.5)).floor()
}

/// Which figure the entered salary represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculationMode {
    #[default]
    GrossToNet,
    NetToGross,
}

/// Minimum-wage zone (Vùng I–IV).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[default]
    I,
    II,
    III,
    IV,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::I, Region::II, Region::III, Region::IV];
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Region::I => "I",
            Region::II => "II",
            Region::III => "III",
            Region::IV => "IV",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Region {
    type Err = PayrollError;

    /// Accepts roman (`"II"`) or arabic (`"2"`) zone numbers, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "I" | "1" => Ok(Region::I),
            "II" | "2" => Ok(Region::II),
            "III" | "3" => Ok(Region::III),
            "IV" | "4" => Ok(Region::IV),
            other => Err(PayrollError::InvalidInput {
                field: "region".into(),
                reason: format!("Unknown region '{other}', expected I, II, III or IV"),
            }),
        }
    }
}

/// Selects which tax regime of the configuration a resolution runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegimeYear {
    Current,
    Prior,
}

/// Input parameters for a single payroll calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Whether `salary` is the gross contract figure or the target net
    #[serde(default)]
    pub mode: CalculationMode,
    /// Entered amount in VND, interpreted per `mode`
    pub salary: Money,
    /// Allowance subject to PIT but outside the insurance base
    #[serde(default)]
    pub taxable_allowance: Money,
    /// Number of registered dependents
    #[serde(default)]
    pub dependents: u32,
    #[serde(default)]
    pub region: Region,
    /// Foreign employees do not contribute unemployment insurance
    #[serde(default)]
    pub is_expat: bool,
    /// Probation or casual labour: flat withholding, no insurance
    #[serde(default)]
    pub is_probation: bool,
}

/// Employee-side mandatory insurance contributions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceBreakdown {
    /// Social insurance (BHXH)
    pub bhxh: Money,
    /// Health insurance (BHYT)
    pub bhyt: Money,
    /// Unemployment insurance (BHTN)
    pub bhtn: Money,
    pub total: Money,
}

/// One non-empty bracket of an applied tax schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Upper bound of the bracket; `None` for the unbounded top bracket
    pub limit: Option<Money>,
    pub rate: Rate,
    /// Tax allocated to this bracket
    pub amount: Money,
    pub label: String,
}

/// Deductions subtracted from income before tax under one regime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    pub personal: Money,
    pub dependents: Money,
}

/// Current-regime net compared against the prior regime on equal gross.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeComparison {
    /// Name of the prior regime (e.g. "2025")
    pub prior_regime: String,
    pub prior_net: Money,
    /// Current net minus prior net
    pub increase: Money,
    /// (current / prior - 1) x 100, zero when the prior net is zero
    pub increase_percentage: Decimal,
}

/// Output of a full payroll calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub gross: Money,
    pub taxable_allowance: Money,
    pub net: Money,
    pub insurance: InsuranceBreakdown,
    /// Total income less employee insurance
    pub income_before_tax: Money,
    pub deductions: DeductionBreakdown,
    /// Income before tax less deductions, floored at zero
    pub taxable_income: Money,
    pub tax: Money,
    pub tax_brackets: Vec<TaxBracket>,
    /// Employer-side insurance contributions
    pub employer_insurance: Money,
    /// Gross + allowance + employer insurance
    pub employer_cost: Money,
    pub comparison: RegimeComparison,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
