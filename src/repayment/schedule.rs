//! Period-by-period amortization schedule

use super::engine::compute_repayment;
use super::types::{LoanInput, RepaymentType};
use crate::amount::clamp_amount;
use log::debug;
use serde::{Deserialize, Serialize};

/// Longest schedule expanded row by row: 100 years of weekly repayments
pub const MAX_SCHEDULE_PERIODS: u32 = 100 * 52;

/// A single repayment period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    /// 1-based period number
    pub period: u32,
    pub opening_balance: f64,
    pub payment: f64,
    pub interest: f64,
    pub principal_repaid: f64,
    pub closing_balance: f64,
}

impl ScheduleRow {
    pub fn new(period: u32, opening_balance: f64) -> Self {
        Self {
            period,
            opening_balance,
            payment: 0.0,
            interest: 0.0,
            principal_repaid: 0.0,
            closing_balance: opening_balance,
        }
    }
}

/// Full schedule for one loan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepaymentSchedule {
    pub loan: LoanInput,
    pub rows: Vec<ScheduleRow>,
}

impl RepaymentSchedule {
    pub fn new(loan: LoanInput) -> Self {
        Self { loan, rows: Vec::new() }
    }

    pub fn add_row(&mut self, row: ScheduleRow) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ScheduleSummary {
        let total_paid: f64 = self.rows.iter().map(|r| r.payment).sum();
        let total_interest: f64 = self.rows.iter().map(|r| r.interest).sum();
        let total_principal: f64 = self.rows.iter().map(|r| r.principal_repaid).sum();
        let final_balance = self.rows.last().map(|r| r.closing_balance).unwrap_or(0.0);

        ScheduleSummary {
            periods: self.rows.len() as u32,
            total_paid,
            total_interest,
            total_principal,
            final_balance,
        }
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub periods: u32,
    pub total_paid: f64,
    pub total_interest: f64,
    pub total_principal: f64,
    pub final_balance: f64,
}

/// Expand a loan into its repayment periods.
///
/// Degenerate loans (zero term, non-finite figures) and terms longer than
/// [`MAX_SCHEDULE_PERIODS`] produce an empty schedule.
pub fn build_schedule(input: &LoanInput) -> RepaymentSchedule {
    let mut schedule = RepaymentSchedule::new(*input);

    let periods = input.effective_term();
    if periods == 0 || !input.is_finite() {
        return schedule;
    }
    if periods > MAX_SCHEDULE_PERIODS {
        debug!("{} periods exceeds schedule limit of {}, returning empty schedule", periods, MAX_SCHEDULE_PERIODS);
        return schedule;
    }

    let repayment = compute_repayment(input);

    let periodic_rate = clamp_amount(input.annual_rate_percent) / 100.0
        / input.frequency.periods_per_year() as f64;
    let mut balance = clamp_amount(input.principal);

    for period in 1..=periods {
        let mut row = ScheduleRow::new(period, balance);
        row.payment = repayment.periodic_payment;
        row.interest = balance * periodic_rate;

        row.principal_repaid = match input.repayment_type {
            RepaymentType::PrincipalAndInterest => (row.payment - row.interest).min(balance).max(0.0),
            RepaymentType::InterestOnly => 0.0,
        };

        balance = clamp_amount(balance - row.principal_repaid);
        row.closing_balance = balance;
        schedule.add_row(row);
    }

    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repayment::Frequency;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_schedule_matches_repayment_totals() {
        let loan = LoanInput::new(500_000.0, 6.5, 30);
        let schedule = build_schedule(&loan);
        let summary = schedule.summary();
        let repayment = compute_repayment(&loan);

        assert_eq!(summary.periods, 360);
        assert_relative_eq!(summary.total_paid, repayment.total_paid, max_relative = 1e-9);
        assert_relative_eq!(summary.total_interest, repayment.total_interest, max_relative = 1e-6);
        assert_abs_diff_eq!(summary.total_principal, 500_000.0, epsilon = 1e-4);
        assert_abs_diff_eq!(summary.final_balance, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_first_period_split() {
        let schedule = build_schedule(&LoanInput::new(500_000.0, 6.5, 30));
        let first = &schedule.rows[0];

        assert_eq!(first.period, 1);
        assert_eq!(first.opening_balance, 500_000.0);
        assert_abs_diff_eq!(first.interest, 2708.33, epsilon = 0.01);
        assert_abs_diff_eq!(first.principal_repaid, 452.01, epsilon = 0.01);
    }

    #[test]
    fn test_balances_chain() {
        let schedule = build_schedule(&LoanInput::new(250_000.0, 4.0, 10).with_frequency(Frequency::Weekly));
        assert_eq!(schedule.rows.len(), 520);

        for pair in schedule.rows.windows(2) {
            assert_eq!(pair[0].closing_balance, pair[1].opening_balance);
            assert!(pair[1].closing_balance <= pair[0].closing_balance);
        }
    }

    #[test]
    fn test_interest_only_keeps_balance() {
        let loan = LoanInput::new(400_000.0, 6.0, 5).with_repayment_type(RepaymentType::InterestOnly);
        let schedule = build_schedule(&loan);
        let summary = schedule.summary();

        assert!(schedule.rows.iter().all(|r| r.closing_balance == 400_000.0));
        assert_eq!(summary.total_principal, 0.0);
        assert_relative_eq!(summary.total_interest, compute_repayment(&loan).total_interest, max_relative = 1e-9);
    }

    #[test]
    fn test_zero_rate_schedule() {
        let schedule = build_schedule(&LoanInput::new(12_000.0, 0.0, 1));
        let summary = schedule.summary();

        assert!(schedule.rows.iter().all(|r| r.interest == 0.0 && r.payment == 1_000.0));
        assert_abs_diff_eq!(summary.final_balance, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_schedule_is_empty() {
        assert!(build_schedule(&LoanInput::new(100_000.0, 5.0, 0)).is_empty());
        assert!(build_schedule(&LoanInput::new(f64::NAN, 5.0, 10)).is_empty());

        let summary = build_schedule(&LoanInput::new(100_000.0, 5.0, 0)).summary();
        assert_eq!(summary.periods, 0);
        assert_eq!(summary.final_balance, 0.0);
    }

    #[test]
    fn test_oversized_term_gives_empty_schedule() {
        let endless = LoanInput::new(500_000.0, 6.5, u32::MAX).with_frequency(Frequency::Weekly);
        assert!(build_schedule(&endless).is_empty());

        let just_over = LoanInput::new(500_000.0, 6.5, 101).with_frequency(Frequency::Weekly);
        assert!(build_schedule(&just_over).is_empty());

        let at_limit = LoanInput::new(500_000.0, 6.5, 100).with_frequency(Frequency::Weekly);
        let schedule = build_schedule(&at_limit);
        assert_eq!(schedule.rows.len(), MAX_SCHEDULE_PERIODS as usize);
        assert_abs_diff_eq!(schedule.summary().final_balance, 0.0, epsilon = 1e-4);
    }
}
