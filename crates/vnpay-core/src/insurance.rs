use rust_decimal::Decimal;

use crate::config::{InsuranceRates, PayrollConfig};
use crate::types::{round_vnd, InsuranceBreakdown, Money, Region};

/// Contribution bases after applying the statutory ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsuranceBases {
    /// BHXH/BHYT base, capped at a multiple of the reference wage
    pub social_health: Money,
    /// BHTN base, capped at a multiple of the regional minimum wage
    pub unemployment: Money,
}

pub fn insurance_bases(gross: Money, region: Region, config: &PayrollConfig) -> InsuranceBases {
    InsuranceBases {
        social_health: gross.min(config.max_insurance_base()),
        unemployment: gross.min(config.unemployment_cap(region)),
    }
}

/// Employee insurance contributions.
///
/// Each scheme is rounded on its own and the total is the sum of the rounded
/// parts. Probation workers do not participate; expats skip BHTN.
pub fn compute_insurance(
    gross: Money,
    region: Region,
    is_expat: bool,
    is_probation: bool,
    config: &PayrollConfig,
) -> InsuranceBreakdown {
    if is_probation {
        return InsuranceBreakdown::default();
    }

    let bases = insurance_bases(gross, region, config);
    let rates: &InsuranceRates = &config.employee_rates;

    let bhxh = round_vnd(rates.bhxh * bases.social_health);
    let bhyt = round_vnd(rates.bhyt * bases.social_health);
    let bhtn = if is_expat {
        Decimal::ZERO
    } else {
        round_vnd(rates.bhtn * bases.unemployment)
    };

    InsuranceBreakdown {
        bhxh,
        bhyt,
        bhtn,
        total: bhxh + bhyt + bhtn,
    }
}

/// Employer insurance contributions on the same capped bases, rounded once.
pub fn employer_insurance_total(
    gross: Money,
    region: Region,
    is_expat: bool,
    is_probation: bool,
    config: &PayrollConfig,
) -> Money {
    if is_probation {
        return Decimal::ZERO;
    }

    let bases = insurance_bases(gross, region, config);
    let rates = &config.employer_rates;
    let unemployment = if is_expat {
        Decimal::ZERO
    } else {
        rates.bhtn * bases.unemployment
    };

    round_vnd(rates.bhxh * bases.social_health + rates.bhyt * bases.social_health + unemployment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn config() -> PayrollConfig {
        PayrollConfig::default()
    }

    #[test]
    fn test_uncapped_region_i() {
        let ins = compute_insurance(dec!(35_000_000), Region::I, false, false, &config());
        assert_eq!(ins.bhxh, dec!(2_800_000));
        assert_eq!(ins.bhyt, dec!(525_000));
        assert_eq!(ins.bhtn, dec!(350_000));
        assert_eq!(ins.total, dec!(3_675_000));
    }

    #[test]
    fn test_social_health_capped_unemployment_not() {
        // 60M exceeds 46.8M but not region I's 106.2M BHTN ceiling
        let ins = compute_insurance(dec!(60_000_000), Region::I, false, false, &config());
        assert_eq!(ins.bhxh, dec!(3_744_000));
        assert_eq!(ins.bhyt, dec!(702_000));
        assert_eq!(ins.bhtn, dec!(600_000));
        assert_eq!(ins.total, dec!(5_046_000));
    }

    #[test]
    fn test_unemployment_cap_varies_by_region() {
        let gross = dec!(200_000_000);
        let r1 = compute_insurance(gross, Region::I, false, false, &config());
        let r4 = compute_insurance(gross, Region::IV, false, false, &config());
        assert_eq!(r1.bhtn, dec!(1_062_000));
        assert_eq!(r4.bhtn, dec!(740_000));
        assert_eq!(r1.bhxh, r4.bhxh);
    }

    #[test]
    fn test_probation_is_exempt() {
        let ins = compute_insurance(dec!(35_000_000), Region::II, false, true, &config());
        assert_eq!(ins, InsuranceBreakdown::default());
        assert_eq!(
            employer_insurance_total(dec!(35_000_000), Region::II, false, true, &config()),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_expat_skips_unemployment() {
        let ins = compute_insurance(dec!(35_000_000), Region::I, true, false, &config());
        assert_eq!(ins.bhtn, Decimal::ZERO);
        assert_eq!(ins.total, dec!(3_325_000));
    }

    #[test]
    fn test_parts_rounded_individually() {
        // 1.5% of 1,000,033 = 15,000.495 and 8% = 80,002.64
        let ins = compute_insurance(dec!(1_000_033), Region::I, false, false, &config());
        assert_eq!(ins.bhxh, dec!(80_003));
        assert_eq!(ins.bhyt, dec!(15_000));
        assert_eq!(ins.bhtn, dec!(10_000));
        assert_eq!(ins.total, dec!(105_003));
    }

    #[test]
    fn test_employer_total() {
        // 35M x (17.5% + 3% + 1%)
        let total = employer_insurance_total(dec!(35_000_000), Region::I, false, false, &config());
        assert_eq!(total, dec!(7_525_000));
        let expat = employer_insurance_total(dec!(35_000_000), Region::I, true, false, &config());
        assert_eq!(expat, dec!(7_175_000));
    }

    #[test]
    fn test_employer_total_capped() {
        // 46.8M x 20.5% + 100M x 1%
        let total = employer_insurance_total(dec!(100_000_000), Region::I, false, false, &config());
        assert_eq!(total, dec!(10_594_000));
    }
}
