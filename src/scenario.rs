//! Scenario runner for batch calculations
//!
//! Holds one set of assumptions and evaluates many independent inputs
//! against it, in parallel where the batch is large enough to benefit.

use crate::assumptions::Assumptions;
use crate::borrowing::{BorrowingCapacityEngine, BorrowingInput, BorrowingResult};
use crate::repayment::{compute_repayment, LoanInput, RepaymentResult};
use crate::stamp_duty::{StampDutyEngine, StampDutyInput, StampDutyResult};
use rayon::prelude::*;

/// Pre-configured runner for affordability scenarios
///
/// # Example
/// ```
/// use home_loan_estimator::{LoanInput, ScenarioRunner};
///
/// let runner = ScenarioRunner::new();
/// let base = LoanInput::new(500_000.0, 6.0, 30);
/// let results = runner.rate_sensitivity(&base, &[5.5, 6.0, 6.5]);
/// assert!(results[2].periodic_payment > results[0].periodic_payment);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    assumptions: Assumptions,
    borrowing: BorrowingCapacityEngine,
    stamp_duty: StampDutyEngine,
}

impl ScenarioRunner {
    /// Create runner with the built-in indicative assumptions
    pub fn new() -> Self {
        Self::with_assumptions(Assumptions::default_indicative())
    }

    /// Create runner by loading assumptions from CSV files
    pub fn from_csv() -> crate::error::Result<Self> {
        Ok(Self::with_assumptions(Assumptions::from_csv()?))
    }

    /// Create runner from specific assumptions directory
    pub fn from_csv_path(path: &std::path::Path) -> crate::error::Result<Self> {
        Ok(Self::with_assumptions(Assumptions::from_csv_path(path)?))
    }

    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            borrowing: assumptions.borrowing_engine(),
            stamp_duty: assumptions.stamp_duty_engine(),
            assumptions,
        }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn repayment(&self, input: &LoanInput) -> RepaymentResult {
        compute_repayment(input)
    }

    pub fn borrowing_capacity(&self, input: &BorrowingInput) -> BorrowingResult {
        self.borrowing.compute(input)
    }

    pub fn stamp_duty(&self, input: &StampDutyInput) -> StampDutyResult {
        self.stamp_duty.compute(input)
    }

    /// Run many loans, preserving input order
    pub fn run_repayments(&self, inputs: &[LoanInput]) -> Vec<RepaymentResult> {
        inputs.par_iter().map(compute_repayment).collect()
    }

    pub fn run_borrowing(&self, inputs: &[BorrowingInput]) -> Vec<BorrowingResult> {
        inputs.par_iter().map(|input| self.borrowing.compute(input)).collect()
    }

    pub fn run_stamp_duty(&self, inputs: &[StampDutyInput]) -> Vec<StampDutyResult> {
        inputs.par_iter().map(|input| self.stamp_duty.compute(input)).collect()
    }

    /// Reprice one loan at each of several annual rates
    pub fn rate_sensitivity(&self, base: &LoanInput, rates_percent: &[f64]) -> Vec<RepaymentResult> {
        let loans: Vec<LoanInput> = rates_percent
            .iter()
            .map(|&annual_rate_percent| LoanInput {
                annual_rate_percent,
                ..*base
            })
            .collect();
        self.run_repayments(&loans)
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::borrowing::HouseholdProfile;
    use crate::repayment::{Frequency, RepaymentType};

    #[test]
    fn test_batch_matches_sequential() {
        let runner = ScenarioRunner::new();
        let loans: Vec<LoanInput> = (0..200)
            .map(|i| {
                let frequency = Frequency::ALL[i % 3];
                let repayment_type = if i % 2 == 0 {
                    RepaymentType::PrincipalAndInterest
                } else {
                    RepaymentType::InterestOnly
                };
                LoanInput::new(100_000.0 + i as f64 * 5_000.0, (i % 12) as f64, (i % 35) as u32)
                    .with_frequency(frequency)
                    .with_repayment_type(repayment_type)
            })
            .collect();

        let batch = runner.run_repayments(&loans);
        let sequential: Vec<_> = loans.iter().map(compute_repayment).collect();
        assert_eq!(batch, sequential);
    }

    #[test]
    fn test_runner_from_checked_in_assumptions() {
        let runner = ScenarioRunner::from_csv().expect("Failed to load assumptions");
        assert_eq!(runner.assumptions(), &Assumptions::default_indicative());

        let input = BorrowingInput {
            primary_income: 100_000.0,
            ..Default::default()
        };
        assert_eq!(runner.borrowing_capacity(&input), ScenarioRunner::new().borrowing_capacity(&input));
    }

    #[test]
    fn test_rate_sensitivity() {
        let runner = ScenarioRunner::new();
        let results = runner.rate_sensitivity(&LoanInput::new(600_000.0, 6.0, 30), &[4.0, 5.0, 6.0, 7.0]);

        assert_eq!(results.len(), 4);
        assert!(results.windows(2).all(|w| w[1].periodic_payment > w[0].periodic_payment));
    }

    #[test]
    fn test_borrowing_and_duty_batches() {
        let runner = ScenarioRunner::new();

        let applicants: Vec<BorrowingInput> = [60_000.0, 90_000.0, 150_000.0]
            .into_iter()
            .map(|primary_income| BorrowingInput {
                primary_income,
                household: HouseholdProfile::couple(),
                ..Default::default()
            })
            .collect();
        let capacities = runner.run_borrowing(&applicants);
        assert!(capacities.windows(2).all(|w| w[1].max_principal > w[0].max_principal));
        assert!(capacities.iter().all(|c| c.applied_hem_amount == 35_000.0));

        let properties: Vec<StampDutyInput> = [400_000.0, 700_000.0]
            .into_iter()
            .map(|value| StampDutyInput::new(value, true))
            .collect();
        let duties = runner.run_stamp_duty(&properties);
        assert!(duties[0].exemption_applied);
        assert!(!duties[1].exemption_applied);
        assert_eq!(duties[1], runner.stamp_duty(&properties[1]));
    }
}
