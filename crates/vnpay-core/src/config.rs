//! Statutory tables: reference wages, insurance rates, deductions and PIT
//! schedules. Everything the calculation reads from law lives here so a new
//! year can be loaded from JSON without touching the algorithms.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PayrollError;
use crate::types::{Money, Rate, RegimeYear, Region};
use crate::PayrollResult;

/// Largest amount any table may carry: wages, deductions, limits, thresholds.
pub const MAX_TABLE_AMOUNT: Money = dec!(100_000_000_000);

/// Largest accepted insurance ceiling multiple.
pub const MAX_CAP_MULTIPLIER: Decimal = dec!(1_000);

/// Contribution rates for the three mandatory insurance schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceRates {
    /// Social insurance (BHXH)
    pub bhxh: Rate,
    /// Health insurance (BHYT)
    pub bhyt: Rate,
    /// Unemployment insurance (BHTN)
    pub bhtn: Rate,
}

impl InsuranceRates {
    pub fn employee() -> Self {
        Self {
            bhxh: dec!(0.08),
            bhyt: dec!(0.015),
            bhtn: dec!(0.01),
        }
    }

    pub fn employer() -> Self {
        Self {
            bhxh: dec!(0.175),
            bhyt: dec!(0.03),
            bhtn: dec!(0.01),
        }
    }
}

/// Regional minimum monthly wage per zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalMinimumWage {
    #[serde(rename = "I")]
    pub region_i: Money,
    #[serde(rename = "II")]
    pub region_ii: Money,
    #[serde(rename = "III")]
    pub region_iii: Money,
    #[serde(rename = "IV")]
    pub region_iv: Money,
}

impl RegionalMinimumWage {
    pub fn get(&self, region: Region) -> Money {
        match region {
            Region::I => self.region_i,
            Region::II => self.region_ii,
            Region::III => self.region_iii,
            Region::IV => self.region_iv,
        }
    }
}

impl Default for RegionalMinimumWage {
    fn default() -> Self {
        Self {
            region_i: dec!(5_310_000),
            region_ii: dec!(4_730_000),
            region_iii: dec!(4_140_000),
            region_iv: dec!(3_700_000),
        }
    }
}

/// One row of a progressive schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSpec {
    /// Cumulative upper bound; `None` marks the unbounded top bracket
    pub limit: Option<Money>,
    pub rate: Rate,
}

impl BracketSpec {
    pub fn bounded(limit: Money, rate: Rate) -> Self {
        Self {
            limit: Some(limit),
            rate,
        }
    }

    pub fn unbounded(rate: Rate) -> Self {
        Self { limit: None, rate }
    }
}

/// A named set of PIT brackets and family deductions tied to one law.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRegime {
    pub name: String,
    /// Monthly personal (self) deduction
    pub personal_deduction: Money,
    /// Monthly deduction per registered dependent
    pub dependent_deduction: Money,
    /// Ascending schedule, last entry unbounded
    pub brackets: Vec<BracketSpec>,
}

impl TaxRegime {
    /// Five-bracket schedule with the raised family deductions effective 2026.
    pub fn vn_2026() -> Self {
        Self {
            name: "2026".into(),
            personal_deduction: dec!(15_500_000),
            dependent_deduction: dec!(6_200_000),
            brackets: vec![
                BracketSpec::bounded(dec!(10_000_000), dec!(0.05)),
                BracketSpec::bounded(dec!(30_000_000), dec!(0.10)),
                BracketSpec::bounded(dec!(60_000_000), dec!(0.20)),
                BracketSpec::bounded(dec!(100_000_000), dec!(0.30)),
                BracketSpec::unbounded(dec!(0.35)),
            ],
        }
    }

    /// Seven-bracket schedule in force through 2025.
    pub fn vn_2025() -> Self {
        Self {
            name: "2025".into(),
            personal_deduction: dec!(11_000_000),
            dependent_deduction: dec!(4_400_000),
            brackets: vec![
                BracketSpec::bounded(dec!(5_000_000), dec!(0.05)),
                BracketSpec::bounded(dec!(10_000_000), dec!(0.10)),
                BracketSpec::bounded(dec!(18_000_000), dec!(0.15)),
                BracketSpec::bounded(dec!(32_000_000), dec!(0.20)),
                BracketSpec::bounded(dec!(52_000_000), dec!(0.25)),
                BracketSpec::bounded(dec!(80_000_000), dec!(0.30)),
                BracketSpec::unbounded(dec!(0.35)),
            ],
        }
    }

    /// Total deduction for the given number of dependents.
    pub fn dependent_total(&self, dependents: u32) -> Money {
        self.dependent_deduction * Decimal::from(dependents)
    }

    fn validate(&self, table: &str) -> PayrollResult<()> {
        if self.personal_deduction < Decimal::ZERO || self.dependent_deduction < Decimal::ZERO {
            return Err(PayrollError::InvalidConfig {
                table: table.into(),
                reason: "Deductions cannot be negative".into(),
            });
        }
        validate_ceiling(table, "Personal deduction", self.personal_deduction)?;
        validate_ceiling(table, "Dependent deduction", self.dependent_deduction)?;
        if self.brackets.is_empty() {
            return Err(PayrollError::InvalidConfig {
                table: table.into(),
                reason: "Bracket schedule is empty".into(),
            });
        }

        let last = self.brackets.len() - 1;
        let mut previous = Decimal::ZERO;
        for (i, bracket) in self.brackets.iter().enumerate() {
            validate_rate(table, bracket.rate)?;
            match bracket.limit {
                Some(limit) if i == last => {
                    return Err(PayrollError::InvalidConfig {
                        table: table.into(),
                        reason: format!("Top bracket must be unbounded, found limit {limit}"),
                    });
                }
                Some(limit) if limit <= previous => {
                    return Err(PayrollError::InvalidConfig {
                        table: table.into(),
                        reason: format!(
                            "Bracket {} limit {limit} is not above the previous limit {previous}",
                            i + 1
                        ),
                    });
                }
                Some(limit) => {
                    validate_ceiling(table, "Bracket limit", limit)?;
                    previous = limit;
                }
                None if i != last => {
                    return Err(PayrollError::InvalidConfig {
                        table: table.into(),
                        reason: format!("Only the top bracket may be unbounded (bracket {})", i + 1),
                    });
                }
                None => {}
            }
        }
        Ok(())
    }
}

/// Flat withholding for probation and casual labour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbationRule {
    pub rate: Rate,
    /// Total income below this amount is not withheld
    pub threshold: Money,
    pub label: String,
}

impl Default for ProbationRule {
    fn default() -> Self {
        Self {
            rate: dec!(0.10),
            threshold: dec!(2_000_000),
            label: "Thuế khoán 10%".into(),
        }
    }
}

/// Every statutory parameter the calculation depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollConfig {
    /// Reference wage (mức lương cơ sở) for the BHXH/BHYT ceiling
    pub base_salary: Money,
    /// Ceiling multiple applied to both the base salary and regional wages
    pub insurance_cap_multiplier: Decimal,
    pub regional_minimum_wage: RegionalMinimumWage,
    pub employee_rates: InsuranceRates,
    pub employer_rates: InsuranceRates,
    pub probation: ProbationRule,
    pub current: TaxRegime,
    pub prior: TaxRegime,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            base_salary: dec!(2_340_000),
            insurance_cap_multiplier: dec!(20),
            regional_minimum_wage: RegionalMinimumWage::default(),
            employee_rates: InsuranceRates::employee(),
            employer_rates: InsuranceRates::employer(),
            probation: ProbationRule::default(),
            current: TaxRegime::vn_2026(),
            prior: TaxRegime::vn_2025(),
        }
    }
}

impl PayrollConfig {
    /// Parse a JSON configuration and validate it.
    pub fn from_json(json: &str) -> PayrollResult<Self> {
        let config: PayrollConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Ceiling on the BHXH/BHYT contribution base.
    ///
    /// Saturates rather than overflowing on tables that never went through
    /// [`PayrollConfig::validate`].
    pub fn max_insurance_base(&self) -> Money {
        self.base_salary.saturating_mul(self.insurance_cap_multiplier)
    }

    /// Ceiling on the BHTN contribution base, tied to the regional wage.
    pub fn unemployment_cap(&self, region: Region) -> Money {
        self.regional_minimum_wage
            .get(region)
            .saturating_mul(self.insurance_cap_multiplier)
    }

    pub fn regime(&self, year: RegimeYear) -> &TaxRegime {
        match year {
            RegimeYear::Current => &self.current,
            RegimeYear::Prior => &self.prior,
        }
    }

    pub fn validate(&self) -> PayrollResult<()> {
        if self.base_salary <= Decimal::ZERO {
            return Err(PayrollError::InvalidConfig {
                table: "base_salary".into(),
                reason: "Base salary must be positive".into(),
            });
        }
        validate_ceiling("base_salary", "Base salary", self.base_salary)?;
        if self.insurance_cap_multiplier <= Decimal::ZERO
            || self.insurance_cap_multiplier > MAX_CAP_MULTIPLIER
        {
            return Err(PayrollError::InvalidConfig {
                table: "insurance_cap_multiplier".into(),
                reason: format!("Cap multiplier must be above 0 and at most {MAX_CAP_MULTIPLIER}"),
            });
        }
        for region in Region::ALL {
            let wage = self.regional_minimum_wage.get(region);
            if wage <= Decimal::ZERO {
                return Err(PayrollError::InvalidConfig {
                    table: "regional_minimum_wage".into(),
                    reason: format!("Minimum wage for region {region} must be positive"),
                });
            }
            validate_ceiling("regional_minimum_wage", "Minimum wage", wage)?;
        }
        for (table, rates) in [
            ("employee_rates", &self.employee_rates),
            ("employer_rates", &self.employer_rates),
        ] {
            validate_rate(table, rates.bhxh)?;
            validate_rate(table, rates.bhyt)?;
            validate_rate(table, rates.bhtn)?;
        }
        validate_rate("probation", self.probation.rate)?;
        if self.probation.threshold < Decimal::ZERO {
            return Err(PayrollError::InvalidConfig {
                table: "probation".into(),
                reason: "Threshold cannot be negative".into(),
            });
        }
        validate_ceiling("probation", "Threshold", self.probation.threshold)?;
        self.current.validate("current")?;
        self.prior.validate("prior")?;
        Ok(())
    }
}

fn validate_rate(table: &str, rate: Rate) -> PayrollResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(PayrollError::InvalidConfig {
            table: table.into(),
            reason: format!("Rate {rate} must be between 0 and 1"),
        });
    }
    Ok(())
}

fn validate_ceiling(table: &str, what: &str, amount: Money) -> PayrollResult<()> {
    if amount > MAX_TABLE_AMOUNT {
        return Err(PayrollError::InvalidConfig {
            table: table.into(),
            reason: format!("{what} {amount} exceeds {MAX_TABLE_AMOUNT}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn huge() -> Money {
        Decimal::from_i128_with_scale(10_i128.pow(28), 0)
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(PayrollConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_caps() {
        let config = PayrollConfig::default();
        assert_eq!(config.max_insurance_base(), dec!(46_800_000));
        assert_eq!(config.unemployment_cap(Region::I), dec!(106_200_000));
        assert_eq!(config.unemployment_cap(Region::IV), dec!(74_000_000));
    }

    #[test]
    fn test_regime_selection() {
        let config = PayrollConfig::default();
        assert_eq!(config.regime(RegimeYear::Current).name, "2026");
        assert_eq!(config.regime(RegimeYear::Prior).brackets.len(), 7);
    }

    #[test]
    fn test_bounded_top_bracket_rejected() {
        let mut config = PayrollConfig::default();
        config.current.brackets.pop();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unbounded"));
    }

    #[test]
    fn test_unordered_brackets_rejected() {
        let mut config = PayrollConfig::default();
        config.prior.brackets.swap(0, 1);
        assert!(matches!(
            config.validate(),
            Err(PayrollError::InvalidConfig { table, .. }) if table == "prior"
        ));
    }

    #[test]
    fn test_unbounded_middle_bracket_rejected() {
        let mut config = PayrollConfig::default();
        config.current.brackets[1].limit = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rate_above_one_rejected() {
        let mut config = PayrollConfig::default();
        config.employer_rates.bhxh = dec!(1.75);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_amounts_rejected() {
        let mut config = PayrollConfig::default();
        config.base_salary = huge();
        assert!(matches!(
            config.validate(),
            Err(PayrollError::InvalidConfig { table, .. }) if table == "base_salary"
        ));

        let mut config = PayrollConfig::default();
        config.insurance_cap_multiplier = dec!(1_001);
        assert!(config.validate().is_err());

        let mut config = PayrollConfig::default();
        config.current.brackets[3].limit = Some(MAX_TABLE_AMOUNT + Decimal::ONE);
        assert!(config.validate().is_err());

        let mut config = PayrollConfig::default();
        config.prior.dependent_deduction = huge();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_caps_saturate_instead_of_overflowing() {
        let mut config = PayrollConfig::default();
        config.base_salary = huge();
        config.regional_minimum_wage.region_ii = huge();
        assert_eq!(config.max_insurance_base(), Decimal::MAX);
        assert_eq!(config.unemployment_cap(Region::II), Decimal::MAX);
    }

    #[test]
    fn test_oversized_base_salary_from_json() {
        let mut value = serde_json::to_value(PayrollConfig::default()).unwrap();
        value["base_salary"] = serde_json::json!("10000000000000000000000000000");
        let err = PayrollConfig::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, PayrollError::InvalidConfig { .. }));
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = PayrollConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = PayrollConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            PayrollConfig::from_json("{\"base_salary\": 1}"),
            Err(PayrollError::SerializationError(_))
        ));
    }
}
