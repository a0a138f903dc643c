//! Household Expenditure Measure (HEM) lookup
//!
//! Simplified annual living-expense benchmarks by household composition,
//! indicative only.

use crate::error::{AssumptionError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Household composition used to estimate living expenses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdProfile {
    pub adult_count: u32,
    pub child_count: u32,
}

impl HouseholdProfile {
    pub fn new(adult_count: u32, child_count: u32) -> Self {
        Self { adult_count, child_count }
    }

    pub fn single() -> Self {
        Self::new(1, 0)
    }

    pub fn couple() -> Self {
        Self::new(2, 0)
    }

    pub fn with_children(mut self, child_count: u32) -> Self {
        self.child_count = child_count;
        self
    }
}

impl Default for HouseholdProfile {
    fn default() -> Self {
        Self::single()
    }
}

/// How households with more than two adults are priced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdultTierPolicy {
    /// Three or more adults use the two-adult figure
    #[default]
    CapAtCouple,
    /// Each adult beyond two adds the couple-minus-single increment
    ExtendLinearly,
}

impl AdultTierPolicy {
    pub const ALL: [AdultTierPolicy; 2] = [AdultTierPolicy::CapAtCouple, AdultTierPolicy::ExtendLinearly];

    /// Wire name, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AdultTierPolicy::CapAtCouple => "capAtCouple",
            AdultTierPolicy::ExtendLinearly => "extendLinearly",
        }
    }
}

impl FromStr for AdultTierPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        AdultTierPolicy::ALL
            .into_iter()
            .find(|policy| policy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown adult tier policy: {}", s))
    }
}

/// Annual HEM figures by household composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HemTable {
    /// Annual expenses for a one-adult household
    pub single_adult: f64,

    /// Annual expenses for a two-adult household
    pub couple: f64,

    /// Added per dependent child, uncapped
    pub per_child: f64,

    #[serde(default)]
    pub adult_policy: AdultTierPolicy,
}

impl Default for HemTable {
    fn default() -> Self {
        Self {
            single_adult: 25_000.0,
            couple: 35_000.0,
            per_child: 5_000.0,
            adult_policy: AdultTierPolicy::CapAtCouple,
        }
    }
}

impl HemTable {
    pub fn with_adult_policy(mut self, adult_policy: AdultTierPolicy) -> Self {
        self.adult_policy = adult_policy;
        self
    }

    /// Annual HEM for a household. An adult count of zero is priced as one adult.
    pub fn lookup(&self, household: &HouseholdProfile) -> f64 {
        let adults_component = match household.adult_count {
            0 | 1 => self.single_adult,
            2 => self.couple,
            extra => match self.adult_policy {
                AdultTierPolicy::CapAtCouple => self.couple,
                AdultTierPolicy::ExtendLinearly => {
                    let increment = self.couple - self.single_adult;
                    self.couple + (extra - 2) as f64 * increment
                }
            },
        };

        adults_component + household.child_count as f64 * self.per_child
    }

    /// Check every figure is a usable amount
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("hem.single_adult", self.single_adult),
            ("hem.couple", self.couple),
            ("hem.per_child", self.per_child),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AssumptionError::InvalidParameter {
                    name,
                    value,
                    reason: "must be a finite, non-negative amount".to_string(),
                });
            }
        }

        if self.couple < self.single_adult {
            log::warn!(
                "HEM couple figure {} is below the single-adult figure {}",
                self.couple,
                self.single_adult
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tiers() {
        let hem = HemTable::default();

        assert_eq!(hem.lookup(&HouseholdProfile::single()), 25_000.0);
        assert_eq!(hem.lookup(&HouseholdProfile::couple()), 35_000.0);
        assert_eq!(hem.lookup(&HouseholdProfile::single().with_children(2)), 35_000.0);
        assert_eq!(hem.lookup(&HouseholdProfile::couple().with_children(3)), 50_000.0);
    }

    #[test]
    fn test_children_are_uncapped() {
        let hem = HemTable::default();
        assert_eq!(hem.lookup(&HouseholdProfile::couple().with_children(12)), 95_000.0);
    }

    #[test]
    fn test_zero_adults_priced_as_single() {
        let hem = HemTable::default();
        assert_eq!(hem.lookup(&HouseholdProfile::new(0, 1)), 30_000.0);
    }

    #[test]
    fn test_large_households() {
        let capped = HemTable::default();
        assert_eq!(capped.lookup(&HouseholdProfile::new(3, 0)), 35_000.0);
        assert_eq!(capped.lookup(&HouseholdProfile::new(5, 1)), 40_000.0);

        let linear = HemTable::default().with_adult_policy(AdultTierPolicy::ExtendLinearly);
        assert_eq!(linear.lookup(&HouseholdProfile::new(2, 0)), 35_000.0);
        assert_eq!(linear.lookup(&HouseholdProfile::new(3, 0)), 45_000.0);
        assert_eq!(linear.lookup(&HouseholdProfile::new(4, 2)), 65_000.0);
    }

    #[test]
    fn test_adult_policy_wire_names() {
        for policy in AdultTierPolicy::ALL {
            let json = serde_json::to_string(&policy).unwrap();
            assert_eq!(json, format!("\"{}\"", policy.as_str()));
            assert_eq!(policy.as_str().parse::<AdultTierPolicy>(), Ok(policy));
        }
        assert!("linear".parse::<AdultTierPolicy>().is_err());
    }

    #[test]
    fn test_validate() {
        assert!(HemTable::default().validate().is_ok());

        let bad = HemTable {
            per_child: f64::NAN,
            ..HemTable::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(AssumptionError::InvalidParameter { name: "hem.per_child", .. })
        ));
    }
}
