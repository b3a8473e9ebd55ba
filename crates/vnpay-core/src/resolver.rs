use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{PayrollConfig, TaxRegime};
use crate::insurance::compute_insurance;
use crate::tax::allocate_tax;
use crate::types::{CalculationInput, DeductionBreakdown, InsuranceBreakdown, Money, TaxBracket};

/// Payroll figures for one gross salary under one tax regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeResolution {
    pub net: Money,
    pub insurance: InsuranceBreakdown,
    pub income_before_tax: Money,
    pub deductions: DeductionBreakdown,
    pub taxable_income: Money,
    pub tax: Money,
    pub tax_brackets: Vec<TaxBracket>,
}

/// Compose insurance, family deductions and PIT into net pay.
///
/// Region, dependents and the expat/probation flags come from `input`; the
/// salary and mode fields are ignored in favour of the explicit `gross`.
pub fn resolve(
    gross: Money,
    taxable_allowance: Money,
    input: &CalculationInput,
    regime: &TaxRegime,
    config: &PayrollConfig,
) -> RegimeResolution {
    let insurance = compute_insurance(
        gross,
        input.region,
        input.is_expat,
        input.is_probation,
        config,
    );
    let total_income = gross + taxable_allowance;
    let income_before_tax = total_income - insurance.total;

    let deductions = DeductionBreakdown {
        personal: regime.personal_deduction,
        dependents: regime.dependent_total(input.dependents),
    };
    let taxable_income =
        (income_before_tax - deductions.personal - deductions.dependents).max(Decimal::ZERO);

    let tax = allocate_tax(
        taxable_income,
        &regime.brackets,
        input.is_probation,
        total_income,
        &config.probation,
    );

    RegimeResolution {
        net: income_before_tax - tax.total,
        insurance,
        income_before_tax,
        deductions,
        taxable_income,
        tax: tax.total,
        tax_brackets: tax.breakdown,
    }
}
