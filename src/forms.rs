//! Raw form input coercion
//!
//! Callers hand over whatever the user typed: numbers, strings, partial
//! numbers, blanks. Everything is coerced to a usable value here so the
//! engines only ever see typed input. Invalid amounts become 0.

use crate::amount::clamp_amount;
use crate::borrowing::{BorrowingInput, HouseholdProfile};
use crate::repayment::{Frequency, LoanInput, RepaymentType};
use crate::stamp_duty::StampDutyInput;
use log::debug;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Parse a currency or percentage amount typed by a user.
///
/// Strips `$`, `,` and whitespace. Blank, unparsable, non-finite and
/// negative input all yield 0.
pub fn coerce_amount(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }

    match cleaned.parse::<f64>() {
        Ok(value) => clamp_amount(value),
        Err(_) => {
            debug!("unparsable amount {:?}, using 0", raw);
            0.0
        }
    }
}

/// Parse a whole-number count (years, adults, children), truncating toward zero
pub fn coerce_count(raw: &str) -> u32 {
    count_from_amount(coerce_amount(raw))
}

fn count_from_amount(value: f64) -> u32 {
    // Float-to-int casts saturate, so huge values cap at u32::MAX
    clamp_amount(value).trunc() as u32
}

/// Parse an enumeration from its wire name, falling back to its default
fn coerce_choice<T: FromStr + Default>(raw: &str) -> T {
    raw.parse().unwrap_or_else(|_| {
        if !raw.trim().is_empty() {
            debug!("unrecognised option {:?}, using default", raw);
        }
        T::default()
    })
}

/// A single field as submitted by a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Flag(bool),
    Text(String),
}

impl FormValue {
    pub fn amount(&self) -> f64 {
        match self {
            FormValue::Number(value) => clamp_amount(*value),
            FormValue::Flag(_) => 0.0,
            FormValue::Text(text) => coerce_amount(text),
        }
    }

    pub fn count(&self) -> u32 {
        count_from_amount(self.amount())
    }

    pub fn flag(&self) -> bool {
        match self {
            FormValue::Flag(flag) => *flag,
            FormValue::Number(value) => *value != 0.0 && !value.is_nan(),
            FormValue::Text(text) => matches!(
                text.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "on" | "1"
            ),
        }
    }

    fn choice<T: FromStr + Default>(&self) -> T {
        match self {
            FormValue::Text(text) => coerce_choice(text),
            _ => T::default(),
        }
    }
}

impl From<&str> for FormValue {
    fn from(text: &str) -> Self {
        FormValue::Text(text.to_string())
    }
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        FormValue::Number(value)
    }
}

impl From<bool> for FormValue {
    fn from(flag: bool) -> Self {
        FormValue::Flag(flag)
    }
}

fn amount_of(field: Option<&FormValue>) -> f64 {
    field.map_or(0.0, FormValue::amount)
}

fn count_of(field: Option<&FormValue>) -> u32 {
    field.map_or(0, FormValue::count)
}

/// Repayment calculator form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoanForm {
    pub loan_amount: Option<FormValue>,
    /// Annual percentage, e.g. "6.5"
    pub interest_rate: Option<FormValue>,
    /// Years
    pub loan_term: Option<FormValue>,
    pub repayment_type: Option<FormValue>,
    pub repayment_frequency: Option<FormValue>,
}

impl LoanForm {
    pub fn to_input(&self) -> LoanInput {
        LoanInput {
            principal: amount_of(self.loan_amount.as_ref()),
            annual_rate_percent: amount_of(self.interest_rate.as_ref()),
            term_years: count_of(self.loan_term.as_ref()),
            repayment_type: self
                .repayment_type
                .as_ref()
                .map_or_else(RepaymentType::default, FormValue::choice),
            frequency: self
                .repayment_frequency
                .as_ref()
                .map_or_else(Frequency::default, FormValue::choice),
        }
    }
}

/// Borrowing capacity form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BorrowingForm {
    pub individual_income: Option<FormValue>,
    pub other_income: Option<FormValue>,
    pub adults: Option<FormValue>,
    pub children: Option<FormValue>,
    pub existing_repayments: Option<FormValue>,
    pub credit_card_limit: Option<FormValue>,
}

impl BorrowingForm {
    pub fn to_input(&self) -> BorrowingInput {
        BorrowingInput {
            primary_income: amount_of(self.individual_income.as_ref()),
            other_income: amount_of(self.other_income.as_ref()),
            household: HouseholdProfile::new(
                self.adults.as_ref().map_or(1, FormValue::count).max(1),
                count_of(self.children.as_ref()),
            ),
            existing_monthly_debt_repayments: amount_of(self.existing_repayments.as_ref()),
            credit_card_total_limit: amount_of(self.credit_card_limit.as_ref()),
        }
    }
}

/// Stamp duty form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StampDutyForm {
    pub property_value: Option<FormValue>,
    pub is_first_home_buyer: Option<FormValue>,
}

impl StampDutyForm {
    pub fn to_input(&self) -> StampDutyInput {
        StampDutyInput {
            property_value: amount_of(self.property_value.as_ref()),
            is_first_home_buyer: self.is_first_home_buyer.as_ref().is_some_and(FormValue::flag),
        }
    }
}
