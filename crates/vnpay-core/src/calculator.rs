use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Instant;

use crate::config::PayrollConfig;
use crate::error::PayrollError;
use crate::insurance::{employer_insurance_total, insurance_bases};
use crate::resolver::resolve;
use crate::solver::{solve_gross_from_net, GrossSolution, MAX_BISECTION_ITERATIONS};
use crate::types::{
    round_vnd, with_metadata, CalculationInput, CalculationMode, CalculationResult,
    ComputationOutput, Money, RegimeComparison, RegimeYear,
};
use crate::PayrollResult;

/// Largest salary or allowance accepted at the validated entry point.
pub const MAX_INPUT_AMOUNT: Money = dec!(100_000_000_000);

/// Run a full calculation: resolve the working gross, price it under the
/// current and prior regimes, and add employer cost.
///
/// In NET_TO_GROSS mode the gross is solved against the current regime only
/// and the prior regime is priced on that same gross.
pub fn perform_calculation(input: &CalculationInput, config: &PayrollConfig) -> CalculationResult {
    run(input, config).0
}

/// Validated calculation wrapped in the standard output envelope.
///
/// Rejects negative, fractional or oversized amounts and invalid
/// configuration tables, then reports solver non-convergence and the
/// ceilings and floors that shaped the figures as warnings.
pub fn calculate_payroll(
    input: &CalculationInput,
    config: &PayrollConfig,
) -> PayrollResult<ComputationOutput<CalculationResult>> {
    let start = Instant::now();

    validate_input(input)?;
    config.validate()?;

    let (result, solution) = run(input, config);
    let warnings = collect_warnings(input, config, &result, solution.as_ref());

    let methodology = match input.mode {
        CalculationMode::GrossToNet => "Gross to net: capped insurance, progressive PIT",
        CalculationMode::NetToGross => {
            "Net to gross: bisection on the current regime, capped insurance, progressive PIT"
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(methodology, input, warnings, elapsed, result))
}

fn run(input: &CalculationInput, config: &PayrollConfig) -> (CalculationResult, Option<GrossSolution>) {
    let current_regime = config.regime(RegimeYear::Current);
    let prior_regime = config.regime(RegimeYear::Prior);

    let (gross, solution) = match input.mode {
        CalculationMode::GrossToNet => (input.salary, None),
        CalculationMode::NetToGross => {
            let solution = solve_gross_from_net(input.salary, input, current_regime, config);
            (solution.gross, Some(solution))
        }
    };

    let current = resolve(gross, input.taxable_allowance, input, current_regime, config);
    let prior = resolve(gross, input.taxable_allowance, input, prior_regime, config);

    let employer_insurance = employer_insurance_total(
        gross,
        input.region,
        input.is_expat,
        input.is_probation,
        config,
    );

    let increase_percentage = if prior.net > Decimal::ZERO {
        (current.net / prior.net - Decimal::ONE) * dec!(100)
    } else {
        Decimal::ZERO
    };

    let result = CalculationResult {
        gross: round_vnd(gross),
        taxable_allowance: input.taxable_allowance,
        net: round_vnd(current.net),
        insurance: current.insurance,
        income_before_tax: round_vnd(current.income_before_tax),
        deductions: current.deductions,
        taxable_income: round_vnd(current.taxable_income),
        tax: round_vnd(current.tax),
        tax_brackets: current.tax_brackets,
        employer_insurance,
        employer_cost: round_vnd(gross + input.taxable_allowance + employer_insurance),
        comparison: RegimeComparison {
            prior_regime: prior_regime.name.clone(),
            prior_net: round_vnd(prior.net),
            increase: round_vnd(current.net - prior.net),
            increase_percentage,
        },
    };

    (result, solution)
}

fn validate_input(input: &CalculationInput) -> PayrollResult<()> {
    validate_amount("salary", input.salary)?;
    validate_amount("taxable_allowance", input.taxable_allowance)?;
    Ok(())
}

fn validate_amount(field: &str, amount: Money) -> PayrollResult<()> {
    if amount < Decimal::ZERO {
        return Err(PayrollError::InvalidInput {
            field: field.into(),
            reason: "Amount cannot be negative".into(),
        });
    }
    if amount > MAX_INPUT_AMOUNT {
        return Err(PayrollError::InvalidInput {
            field: field.into(),
            reason: format!("Amount cannot exceed {MAX_INPUT_AMOUNT} VND"),
        });
    }
    if !amount.fract().is_zero() {
        return Err(PayrollError::InvalidInput {
            field: field.into(),
            reason: "Amount must be a whole number of VND".into(),
        });
    }
    Ok(())
}

fn collect_warnings(
    input: &CalculationInput,
    config: &PayrollConfig,
    result: &CalculationResult,
    solution: Option<&GrossSolution>,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(s) = solution.filter(|s| !s.converged) {
        warnings.push(format!(
            "Gross-from-net search stopped after {MAX_BISECTION_ITERATIONS} iterations without \
             reaching the target; net is off by {} VND",
            s.residual.round_dp(2)
        ));
    }

    if input.is_probation {
        let total_income = result.gross + result.taxable_allowance;
        if total_income < config.probation.threshold {
            warnings.push(format!(
                "Income {total_income} is below the {} flat-withholding threshold; no tax withheld",
                config.probation.threshold
            ));
        }
    } else {
        let bases = insurance_bases(result.gross, input.region, config);
        if bases.social_health < result.gross {
            warnings.push(format!(
                "BHXH/BHYT computed on the {} ceiling rather than gross",
                config.max_insurance_base()
            ));
        }
        if bases.unemployment < result.gross && !input.is_expat {
            warnings.push(format!(
                "BHTN computed on the region {} ceiling of {}",
                input.region,
                config.unemployment_cap(input.region)
            ));
        }
        let deductions = result.deductions.personal + result.deductions.dependents;
        if result.income_before_tax < deductions {
            warnings.push(format!(
                "Deductions of {deductions} exceed income before tax; taxable income is zero"
            ));
        }
    }

    if result.comparison.prior_net <= Decimal::ZERO {
        warnings.push("Prior-regime net is zero; percentage increase reported as 0".into());
    }

    warnings
}
