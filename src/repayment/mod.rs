//! Loan repayment calculations: periodic payment, totals, comparison and schedule

mod types;
mod engine;
mod schedule;

pub use types::{Frequency, LoanInput, RepaymentResult, RepaymentType};
pub use engine::{
    compare_repayment_types, compute_repayment, level_payment, present_value_of_payments,
    RepaymentComparison,
};
pub use schedule::{build_schedule, RepaymentSchedule, MAX_SCHEDULE_PERIODS, ScheduleRow, ScheduleSummary};
