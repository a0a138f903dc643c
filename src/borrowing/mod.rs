//! Borrowing capacity: HEM living-expense lookup and serviceability test

mod hem;
mod engine;

pub use hem::{AdultTierPolicy, HemTable, HouseholdProfile};
pub use engine::{
    compute_borrowing_capacity, BorrowingCapacityEngine, BorrowingInput, BorrowingResult,
    DebtRepaymentBasis, ServiceabilityConfig,
};
