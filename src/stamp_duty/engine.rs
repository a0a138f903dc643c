//! Stamp duty engine with the first-home-buyer exemption

use super::schedule::DutySchedule;
use crate::amount::clamp_amount;
use crate::error::{AssumptionError, Result};
use serde::{Deserialize, Serialize};

/// Full exemption for first-home buyers at or below a property value threshold.
///
/// Partial concessions above the threshold are not modelled; those buyers
/// pay the standard schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstHomeBuyerRule {
    pub exemption_threshold: f64,
}

impl Default for FirstHomeBuyerRule {
    fn default() -> Self {
        Self {
            exemption_threshold: 600_000.0,
        }
    }
}

impl FirstHomeBuyerRule {
    pub fn is_exempt(&self, property_value: f64, is_first_home_buyer: bool) -> bool {
        is_first_home_buyer && property_value <= self.exemption_threshold
    }

    pub fn validate(&self) -> Result<()> {
        if !self.exemption_threshold.is_finite() || self.exemption_threshold < 0.0 {
            return Err(AssumptionError::InvalidParameter {
                name: "first_home_buyer.exemption_threshold",
                value: self.exemption_threshold,
                reason: "must be a finite, non-negative amount".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StampDutyInput {
    pub property_value: f64,
    #[serde(default)]
    pub is_first_home_buyer: bool,
}

impl StampDutyInput {
    pub fn new(property_value: f64, is_first_home_buyer: bool) -> Self {
        Self { property_value, is_first_home_buyer }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StampDutyResult {
    pub duty_payable: f64,
    /// True only when the first-home-buyer exemption removed all duty
    pub exemption_applied: bool,
}

/// Stamp duty calculator
#[derive(Debug, Clone, Default)]
pub struct StampDutyEngine {
    schedule: DutySchedule,
    first_home_buyer: FirstHomeBuyerRule,
}

impl StampDutyEngine {
    pub fn new(schedule: DutySchedule, first_home_buyer: FirstHomeBuyerRule) -> Self {
        Self { schedule, first_home_buyer }
    }

    pub fn schedule(&self) -> &DutySchedule {
        &self.schedule
    }

    pub fn first_home_buyer(&self) -> &FirstHomeBuyerRule {
        &self.first_home_buyer
    }

    pub fn compute(&self, input: &StampDutyInput) -> StampDutyResult {
        let property_value = clamp_amount(input.property_value);

        if self.first_home_buyer.is_exempt(property_value, input.is_first_home_buyer) {
            return StampDutyResult {
                duty_payable: 0.0,
                exemption_applied: true,
            };
        }

        StampDutyResult {
            duty_payable: clamp_amount(self.schedule.duty(property_value)),
            exemption_applied: false,
        }
    }
}

/// Stamp duty under the default schedule and exemption threshold
pub fn compute_stamp_duty(input: &StampDutyInput) -> StampDutyResult {
    StampDutyEngine::default().compute(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_first_home_buyer_exemption() {
        let result = compute_stamp_duty(&StampDutyInput::new(600_000.0, true));
        assert_eq!(
            result,
            StampDutyResult {
                duty_payable: 0.0,
                exemption_applied: true
            }
        );
    }

    #[test]
    fn test_non_first_home_buyer_pays_schedule() {
        let result = compute_stamp_duty(&StampDutyInput::new(600_000.0, false));
        assert_abs_diff_eq!(result.duty_payable, 31_070.0, epsilon = 1e-9);
        assert!(!result.exemption_applied);
    }

    #[test]
    fn test_no_concession_above_threshold() {
        for value in [600_000.01, 650_000.0, 750_000.0] {
            let first_home = compute_stamp_duty(&StampDutyInput::new(value, true));
            let standard = compute_stamp_duty(&StampDutyInput::new(value, false));

            assert_eq!(first_home, standard);
            assert!(!first_home.exemption_applied);
        }
    }

    #[test]
    fn test_reference_values() {
        let cases = [
            (0.0, 0.0),
            (10_000.0, 140.0),
            (25_000.0, 350.0),
            (130_000.0, 2_870.0),
            (500_000.0, 25_070.0),
            (960_000.0, 52_670.0),
            (960_100.0, 55_076.5),
            (2_000_000.0, 122_670.0),
        ];
        for (value, expected) in cases {
            let result = compute_stamp_duty(&StampDutyInput::new(value, false));
            assert_abs_diff_eq!(result.duty_payable, expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_invalid_values() {
        for value in [f64::NAN, f64::INFINITY, -50_000.0] {
            let result = compute_stamp_duty(&StampDutyInput::new(value, false));
            assert_eq!(result.duty_payable, 0.0);
            assert!(!result.exemption_applied);
        }
    }

    #[test]
    fn test_custom_threshold() {
        let engine = StampDutyEngine::new(
            DutySchedule::default(),
            FirstHomeBuyerRule {
                exemption_threshold: 750_000.0,
            },
        );
        assert!(engine.compute(&StampDutyInput::new(700_000.0, true)).exemption_applied);
        assert!(FirstHomeBuyerRule { exemption_threshold: -1.0 }.validate().is_err());
    }

    #[test]
    fn test_idempotent() {
        let input = StampDutyInput::new(1_234_567.89, false);
        let first = compute_stamp_duty(&input);
        let second = compute_stamp_duty(&input);
        assert_eq!(first.duty_payable.to_bits(), second.duty_payable.to_bits());
    }
}
