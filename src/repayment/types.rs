//! Loan input and repayment result records

use crate::amount::clamp_amount;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often repayments are made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Frequency {
    #[default]
    Monthly,
    Fortnightly,
    Weekly,
}

impl Frequency {
    pub const ALL: [Frequency; 3] = [Frequency::Monthly, Frequency::Fortnightly, Frequency::Weekly];

    /// Number of repayments in a year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Monthly => 12,
            Frequency::Fortnightly => 26,
            Frequency::Weekly => 52,
        }
    }

    /// Wire name, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
            Frequency::Fortnightly => "fortnightly",
            Frequency::Weekly => "weekly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Frequency::ALL
            .into_iter()
            .find(|freq| freq.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown repayment frequency: {}", s))
    }
}

/// Whether repayments retire principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RepaymentType {
    /// Each payment covers accrued interest and reduces the balance
    #[default]
    PrincipalAndInterest,
    /// Each payment covers accrued interest only
    InterestOnly,
}

impl RepaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepaymentType::PrincipalAndInterest => "principalAndInterest",
            RepaymentType::InterestOnly => "interestOnly",
        }
    }
}

impl fmt::Display for RepaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepaymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        [RepaymentType::PrincipalAndInterest, RepaymentType::InterestOnly]
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown repayment type: {}", s))
    }
}

/// A loan to be repaid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanInput {
    /// Amount borrowed
    pub principal: f64,

    /// Annual interest rate on a 0-100 scale (6.5 means 6.5%)
    pub annual_rate_percent: f64,

    /// Loan term in whole years
    pub term_years: u32,

    #[serde(default)]
    pub repayment_type: RepaymentType,

    #[serde(default)]
    pub frequency: Frequency,
}

impl LoanInput {
    /// Create a principal-and-interest loan repaid monthly
    pub fn new(principal: f64, annual_rate_percent: f64, term_years: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_years,
            repayment_type: RepaymentType::PrincipalAndInterest,
            frequency: Frequency::Monthly,
        }
    }

    pub fn with_repayment_type(mut self, repayment_type: RepaymentType) -> Self {
        self.repayment_type = repayment_type;
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Total number of repayment periods over the term
    pub fn effective_term(&self) -> u32 {
        self.term_years.saturating_mul(self.frequency.periods_per_year())
    }

    /// Interest rate applied per repayment period, as a decimal
    pub fn effective_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0 / self.frequency.periods_per_year() as f64
    }

    /// Whether every numeric field is finite
    pub fn is_finite(&self) -> bool {
        self.principal.is_finite() && self.annual_rate_percent.is_finite()
    }
}

/// Repayment figures for a loan
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepaymentResult {
    /// Amount due each period
    pub periodic_payment: f64,

    /// Sum of all payments over the term
    pub total_paid: f64,

    /// Portion of the total that is interest
    pub total_interest: f64,
}

impl RepaymentResult {
    /// The fallback for degenerate loans
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build a result with every figure clamped to a finite, non-negative value
    pub fn clamped(periodic_payment: f64, total_paid: f64, total_interest: f64) -> Self {
        Self {
            periodic_payment: clamp_amount(periodic_payment),
            total_paid: clamp_amount(total_paid),
            total_interest: clamp_amount(total_interest),
        }
    }
}
