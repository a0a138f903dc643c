//! Borrowing capacity engine
//!
//! Serviceability test: income left after living expenses and existing
//! commitments is treated as a monthly repayment at the assessment rate
//! (base rate plus buffer), and the amortization formula is inverted to find
//! the largest principal that repayment could retire over the assessment term.

use super::hem::{HemTable, HouseholdProfile};
use crate::amount::clamp_amount;
use crate::error::{AssumptionError, Result};
use crate::repayment::present_value_of_payments;
use log::debug;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Interpretation of the existing debt repayments figure.
///
/// Living expenses and income are annual, but applicants enter their existing
/// repayments as a monthly amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DebtRepaymentBasis {
    /// Subtract the figure from annual income unchanged
    #[default]
    AsSupplied,
    /// Multiply the figure by 12 before subtracting
    AnnualizeMonthly,
}

impl DebtRepaymentBasis {
    pub const ALL: [DebtRepaymentBasis; 2] = [DebtRepaymentBasis::AsSupplied, DebtRepaymentBasis::AnnualizeMonthly];

    /// Wire name, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtRepaymentBasis::AsSupplied => "asSupplied",
            DebtRepaymentBasis::AnnualizeMonthly => "annualizeMonthly",
        }
    }

    /// Annual cost of the supplied repayments figure
    pub fn annual_cost(&self, supplied: f64) -> f64 {
        match self {
            DebtRepaymentBasis::AsSupplied => supplied,
            DebtRepaymentBasis::AnnualizeMonthly => supplied * 12.0,
        }
    }
}

impl FromStr for DebtRepaymentBasis {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        DebtRepaymentBasis::ALL
            .into_iter()
            .find(|basis| basis.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown debt repayment basis: {}", s))
    }
}

/// Lender serviceability parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceabilityConfig {
    /// Indicative annual interest rate, as a decimal
    pub base_rate: f64,

    /// Stress margin added to the base rate
    pub buffer: f64,

    /// Term over which capacity is assessed
    pub assessment_term_years: u32,

    /// Share of total credit card limits counted as a commitment
    pub credit_card_servicing_rate: f64,

    #[serde(default)]
    pub debt_basis: DebtRepaymentBasis,
}

impl Default for ServiceabilityConfig {
    fn default() -> Self {
        Self {
            base_rate: 0.06,
            buffer: 0.03,
            assessment_term_years: 30,
            credit_card_servicing_rate: 0.03,
            debt_basis: DebtRepaymentBasis::AsSupplied,
        }
    }
}

impl ServiceabilityConfig {
    /// Rate the loan is assessed at (base plus buffer)
    pub fn assessment_rate(&self) -> f64 {
        self.base_rate + self.buffer
    }

    pub fn with_debt_basis(mut self, debt_basis: DebtRepaymentBasis) -> Self {
        self.debt_basis = debt_basis;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("serviceability.base_rate", self.base_rate),
            ("serviceability.buffer", self.buffer),
            ("serviceability.credit_card_servicing_rate", self.credit_card_servicing_rate),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AssumptionError::InvalidParameter {
                    name,
                    value,
                    reason: "must be a finite, non-negative decimal rate".to_string(),
                });
            }
        }

        if self.assessment_term_years == 0 {
            return Err(AssumptionError::InvalidParameter {
                name: "serviceability.assessment_term_years",
                value: 0.0,
                reason: "assessment term must be at least one year".to_string(),
            });
        }
        Ok(())
    }
}

/// Applicant figures for a borrowing capacity estimate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowingInput {
    /// Annual income before tax
    pub primary_income: f64,

    /// Any other annual income
    #[serde(default)]
    pub other_income: f64,

    #[serde(default)]
    pub household: HouseholdProfile,

    #[serde(default)]
    pub existing_monthly_debt_repayments: f64,

    #[serde(default)]
    pub credit_card_total_limit: f64,
}

/// Borrowing capacity estimate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowingResult {
    /// Largest principal the applicant could service
    pub max_principal: f64,

    /// Living expenses assumed for the household
    pub applied_hem_amount: f64,

    /// Annual rate used for the serviceability test
    pub assessment_rate: f64,
}

/// Borrowing capacity calculator
#[derive(Debug, Clone, Default)]
pub struct BorrowingCapacityEngine {
    config: ServiceabilityConfig,
    hem: HemTable,
}

impl BorrowingCapacityEngine {
    pub fn new(config: ServiceabilityConfig, hem: HemTable) -> Self {
        Self { config, hem }
    }

    pub fn config(&self) -> &ServiceabilityConfig {
        &self.config
    }

    pub fn hem(&self) -> &HemTable {
        &self.hem
    }

    /// Annual income remaining after living expenses and commitments.
    /// May be negative.
    pub fn net_serviceable_income(&self, input: &BorrowingInput) -> f64 {
        let total_annual_income = clamp_amount(input.primary_income) + clamp_amount(input.other_income);
        let hem = self.hem.lookup(&input.household);
        let existing_debt = self
            .config
            .debt_basis
            .annual_cost(clamp_amount(input.existing_monthly_debt_repayments));
        let credit_card_servicing =
            clamp_amount(input.credit_card_total_limit) * self.config.credit_card_servicing_rate;

        total_annual_income - (hem + existing_debt + credit_card_servicing)
    }

    /// Estimate the maximum loan for an applicant
    pub fn compute(&self, input: &BorrowingInput) -> BorrowingResult {
        let applied_hem_amount = clamp_amount(self.hem.lookup(&input.household));
        let assessment_rate = self.config.assessment_rate();
        let mut result = BorrowingResult {
            max_principal: 0.0,
            applied_hem_amount,
            assessment_rate,
        };

        let net = self.net_serviceable_income(input);
        if net.is_nan() || net <= 0.0 {
            debug!("no serviceable income (net {}), capacity is zero", net);
            return result;
        }

        let monthly_serviceable = net / 12.0;
        let monthly_rate = assessment_rate / 12.0;
        let periods = self.config.assessment_term_years.saturating_mul(12) as f64;

        result.max_principal = clamp_amount(present_value_of_payments(
            monthly_serviceable,
            monthly_rate,
            periods,
        ));
        result
    }
}

/// Estimate borrowing capacity with the default serviceability assumptions
pub fn compute_borrowing_capacity(input: &BorrowingInput) -> BorrowingResult {
    BorrowingCapacityEngine::default().compute(input)
}
