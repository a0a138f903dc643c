//! Amortization engine
//!
//! One implementation of the level-payment formula, used directly by the
//! repayment calculator and in inverted form by the borrowing capacity
//! solver.

use super::types::{LoanInput, RepaymentResult, RepaymentType};
use crate::amount::clamp_amount;
use log::debug;
use serde::{Deserialize, Serialize};

/// Level payment that retires `principal` over `periods` at `periodic_rate`.
///
/// Standard annuity formula: P * r * (1+r)^n / ((1+r)^n - 1).
/// A zero rate falls back to straight-line repayment.
pub fn level_payment(principal: f64, periodic_rate: f64, periods: f64) -> f64 {
    if periods <= 0.0 {
        return 0.0;
    }
    if periodic_rate.abs() < f64::EPSILON {
        return principal / periods;
    }

    let (growth, growth_minus_one) = compound_growth(periodic_rate, periods);
    if growth.is_infinite() {
        // Limit as n -> inf: the payment only services interest
        return principal * periodic_rate;
    }
    principal * periodic_rate * growth / growth_minus_one
}

/// Principal that a level `payment` can retire over `periods` at `periodic_rate`.
///
/// Inverse of [`level_payment`]: A * ((1+r)^n - 1) / (r * (1+r)^n).
pub fn present_value_of_payments(payment: f64, periodic_rate: f64, periods: f64) -> f64 {
    if periods <= 0.0 {
        return 0.0;
    }
    if periodic_rate.abs() < f64::EPSILON {
        return payment * periods;
    }

    let (growth, growth_minus_one) = compound_growth(periodic_rate, periods);
    if growth.is_infinite() {
        return payment / periodic_rate;
    }
    payment * growth_minus_one / (periodic_rate * growth)
}

/// (1+r)^n and (1+r)^n - 1, the latter without cancellation for tiny rates
fn compound_growth(periodic_rate: f64, periods: f64) -> (f64, f64) {
    let growth_minus_one = (periods * periodic_rate.ln_1p()).exp_m1();
    (growth_minus_one + 1.0, growth_minus_one)
}

/// Compute the periodic repayment and lifetime totals for a loan
pub fn compute_repayment(input: &LoanInput) -> RepaymentResult {
    if !input.is_finite() {
        debug!("non-finite loan input {:?}, returning zero repayment", input);
        return RepaymentResult::zero();
    }

    let effective_term = input.effective_term();
    if effective_term == 0 {
        debug!("loan term of zero periods, returning zero repayment");
        return RepaymentResult::zero();
    }

    let principal = clamp_amount(input.principal);
    let annual_rate_percent = clamp_amount(input.annual_rate_percent);
    let periods_per_year = input.frequency.periods_per_year() as f64;
    let n = effective_term as f64;

    match input.repayment_type {
        RepaymentType::PrincipalAndInterest => {
            let effective_rate = annual_rate_percent / 100.0 / periods_per_year;
            if effective_rate > 0.0 {
                let payment = level_payment(principal, effective_rate, n);
                let total_paid = payment * n;
                RepaymentResult::clamped(payment, total_paid, total_paid - principal)
            } else {
                // Straight line: the payments sum back to exactly the principal
                RepaymentResult::clamped(principal / n, principal, 0.0)
            }
        }
        RepaymentType::InterestOnly => {
            let payment = principal * (annual_rate_percent / 100.0) / periods_per_year;
            let total_paid = payment * n;
            RepaymentResult::clamped(payment, total_paid, total_paid)
        }
    }
}

/// Principal-and-interest and interest-only repayments for the same loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepaymentComparison {
    pub principal_and_interest: RepaymentResult,
    pub interest_only: RepaymentResult,

    /// Extra paid each period to retire principal
    pub periodic_difference: f64,
}

/// Price a loan under both repayment types. The input's own type is ignored.
pub fn compare_repayment_types(input: &LoanInput) -> RepaymentComparison {
    let principal_and_interest =
        compute_repayment(&input.with_repayment_type(RepaymentType::PrincipalAndInterest));
    let interest_only = compute_repayment(&input.with_repayment_type(RepaymentType::InterestOnly));

    RepaymentComparison {
        principal_and_interest,
        interest_only,
        periodic_difference: clamp_amount(
            principal_and_interest.periodic_payment - interest_only.periodic_payment,
        ),
    }
}
