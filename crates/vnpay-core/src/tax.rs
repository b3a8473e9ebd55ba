use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::{BracketSpec, ProbationRule};
use crate::types::{round_vnd, Money, TaxBracket};

/// Personal income tax owed and how it was allocated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxAllocation {
    /// Sum of the rounded per-bracket amounts
    pub total: Money,
    pub breakdown: Vec<TaxBracket>,
}

/// Allocate PIT for one month.
///
/// Probation income is withheld at a flat rate on `total_income` (gross plus
/// allowance, before deductions) once it reaches the rule's threshold.
/// Otherwise `taxable_income` is walked through the ascending schedule and
/// each bracket's share is rounded on its own; brackets with no income are
/// left out of the breakdown.
pub fn allocate_tax(
    taxable_income: Money,
    brackets: &[BracketSpec],
    is_probation: bool,
    total_income: Money,
    probation: &ProbationRule,
) -> TaxAllocation {
    if is_probation {
        return flat_withholding(total_income, probation);
    }

    if taxable_income <= Decimal::ZERO {
        return TaxAllocation::default();
    }

    let mut remaining = taxable_income;
    let mut previous_limit = Decimal::ZERO;
    let mut allocation = TaxAllocation::default();

    for bracket in brackets {
        let in_bracket = match bracket.limit {
            Some(limit) => remaining.min(limit - previous_limit),
            None => remaining,
        };

        if in_bracket > Decimal::ZERO {
            let tax = round_vnd(in_bracket * bracket.rate);
            let label = format!("Bậc {}", allocation.breakdown.len() + 1);
            trace!(%label, %in_bracket, %tax, "bracket allocated");
            allocation.total += tax;
            allocation.breakdown.push(TaxBracket {
                limit: bracket.limit,
                rate: bracket.rate,
                amount: tax,
                label,
            });
            remaining -= in_bracket;
        }

        if remaining <= Decimal::ZERO {
            break;
        }
        if let Some(limit) = bracket.limit {
            previous_limit = limit;
        }
    }

    allocation
}

fn flat_withholding(total_income: Money, rule: &ProbationRule) -> TaxAllocation {
    if total_income < rule.threshold {
        return TaxAllocation::default();
    }

    let tax = round_vnd(total_income * rule.rate);
    if tax <= Decimal::ZERO {
        return TaxAllocation::default();
    }

    TaxAllocation {
        total: tax,
        breakdown: vec![TaxBracket {
            limit: None,
            rate: rule.rate,
            amount: tax,
            label: rule.label.clone(),
        }],
    }
}
