use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{PayrollConfig, TaxRegime};
use crate::resolver::resolve;
use crate::types::{round_vnd, CalculationInput, Money};

pub const MAX_BISECTION_ITERATIONS: u32 = 100;
const CONVERGENCE_TOLERANCE: Decimal = Decimal::ONE;
const UPPER_BOUND_HEADROOM: Decimal = dec!(10_000_000);

/// Outcome of the gross-from-net search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrossSolution {
    /// Best gross found, rounded to whole VND
    pub gross: Money,
    pub iterations: u32,
    /// Whether the net at the final midpoint was within 1 VND of the target
    pub converged: bool,
    /// Net at the final (unrounded) midpoint minus the target
    pub residual: Money,
}

/// Find the gross salary that yields `net_target` under `regime`.
///
/// Bisects `gross -> net` on `[0, 3 x target + 10M]`, which is monotonic for
/// fixed allowance, region and flags. Exhausting the iteration budget is not
/// an error: the last midpoint is returned with `converged == false`.
pub fn solve_gross_from_net(
    net_target: Money,
    input: &CalculationInput,
    regime: &TaxRegime,
    config: &PayrollConfig,
) -> GrossSolution {
    let mut low = Decimal::ZERO;
    let mut high = net_target * dec!(3) + UPPER_BOUND_HEADROOM;

    for iteration in 1..=MAX_BISECTION_ITERATIONS {
        let mid = (low + high) / dec!(2);
        let net = resolve(mid, input.taxable_allowance, input, regime, config).net;
        let residual = net - net_target;

        if residual.abs() < CONVERGENCE_TOLERANCE {
            debug!(%net_target, gross = %mid, iteration, "gross-from-net converged");
            return GrossSolution {
                gross: round_vnd(mid),
                iterations: iteration,
                converged: true,
                residual,
            };
        }

        if net < net_target {
            low = mid;
        } else {
            high = mid;
        }
    }

    let mid = (low + high) / dec!(2);
    let residual = resolve(mid, input.taxable_allowance, input, regime, config).net - net_target;
    warn!(
        %net_target,
        gross = %mid,
        %residual,
        "gross-from-net did not converge after {MAX_BISECTION_ITERATIONS} iterations"
    );
    GrossSolution {
        gross: round_vnd(mid),
        iterations: MAX_BISECTION_ITERATIONS,
        converged: false,
        residual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CalculationMode, Region};

    fn input() -> CalculationInput {
        CalculationInput {
            mode: CalculationMode::NetToGross,
            salary: Decimal::ZERO,
            taxable_allowance: Decimal::ZERO,
            dependents: 0,
            region: Region::I,
            is_expat: false,
            is_probation: false,
        }
    }

    #[test]
    fn test_inverts_reference_scenario() {
        let config = PayrollConfig::default();
        let solution =
            solve_gross_from_net(dec!(30_242_500), &input(), &config.current, &config);
        assert!(solution.converged);
        assert!(solution.iterations <= MAX_BISECTION_ITERATIONS);
        assert!((solution.gross - dec!(35_000_000)).abs() <= Decimal::ONE);
        assert!(solution.residual.abs() < Decimal::ONE);
    }

    #[test]
    fn test_below_personal_deduction() {
        // No tax: net = 0.895 x gross
        let config = PayrollConfig::default();
        let solution = solve_gross_from_net(dec!(8_950_000), &input(), &config.current, &config);
        assert!(solution.converged);
        assert!((solution.gross - dec!(10_000_000)).abs() <= Decimal::ONE);
    }

    #[test]
    fn test_zero_target() {
        let config = PayrollConfig::default();
        let solution = solve_gross_from_net(Decimal::ZERO, &input(), &config.current, &config);
        assert!(solution.converged);
        assert!(solution.gross <= Decimal::ONE);
    }

    #[test]
    fn test_respects_allowance() {
        let config = PayrollConfig::default();
        let mut with_allowance = input();
        with_allowance.taxable_allowance = dec!(2_000_000);
        // gross 35M with 2M allowance nets 30,242,500 + 1,800,000
        let solution =
            solve_gross_from_net(dec!(32_042_500), &with_allowance, &config.current, &config);
        assert!((solution.gross - dec!(35_000_000)).abs() <= Decimal::ONE);
    }

    #[test]
    fn test_unreachable_target_reports_no_convergence() {
        // 100% social insurance on an uncapped base pins net at zero, so any
        // positive target is out of reach.
        let mut config = PayrollConfig::default();
        config.employee_rates.bhxh = Decimal::ONE;
        config.employee_rates.bhyt = Decimal::ZERO;
        config.employee_rates.bhtn = Decimal::ZERO;
        config.base_salary = dec!(100_000_000_000);
        let solution = solve_gross_from_net(dec!(5_000_000), &input(), &config.current, &config);
        assert!(!solution.converged);
        assert_eq!(solution.iterations, MAX_BISECTION_ITERATIONS);
        assert!(solution.residual < Decimal::ZERO);
    }
}
