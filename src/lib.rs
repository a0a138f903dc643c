//! Home Loan Estimator - indicative affordability calculators for Australian home buyers
//!
//! This library provides:
//! - Loan repayment estimates (principal & interest or interest-only, any frequency)
//! - Amortization schedules and repayment-type comparison
//! - Borrowing capacity under a buffered serviceability test with HEM living expenses
//! - Stamp duty from a bracketed schedule with a first-home-buyer exemption
//! - Raw form coercion and batch scenario evaluation

pub mod amount;
pub mod assumptions;
pub mod borrowing;
pub mod error;
pub mod forms;
pub mod repayment;
pub mod scenario;
pub mod stamp_duty;

// Re-export commonly used types
pub use assumptions::Assumptions;
pub use borrowing::{compute_borrowing_capacity, BorrowingInput, BorrowingResult, HouseholdProfile};
pub use error::{AssumptionError, Result};
pub use forms::{BorrowingForm, FormValue, LoanForm, StampDutyForm};
pub use repayment::{
    build_schedule, compare_repayment_types, compute_repayment, Frequency, LoanInput, RepaymentResult,
    RepaymentType,
};
pub use scenario::ScenarioRunner;
pub use stamp_duty::{compute_stamp_duty, StampDutyInput, StampDutyResult};
