//! AWS Lambda handler for the calculators
//!
//! Accepts a JSON request tagged by `calculator` carrying the raw form fields,
//! and returns the matching result record. Example payload:
//!
//! ```json
//! {"calculator": "repayment", "loanAmount": "500,000", "interestRate": 6.5, "loanTerm": 30}
//! ```
//!
//! Set `ASSUMPTIONS_DIR` to load assumption CSVs instead of the built-in figures.

use home_loan_estimator::{
    BorrowingForm, BorrowingResult, LoanForm, RepaymentResult, ScenarioRunner, StampDutyForm, StampDutyResult,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Calculator request, with form fields alongside the tag
#[derive(Debug, Deserialize)]
#[serde(tag = "calculator", rename_all = "camelCase")]
pub enum CalculatorRequest {
    Repayment(LoanForm),
    Borrowing(BorrowingForm),
    StampDuty(StampDutyForm),
}

#[derive(Debug, Serialize)]
#[serde(tag = "calculator", rename_all = "camelCase")]
pub enum CalculatorResponse {
    Repayment(RepaymentResult),
    Borrowing(BorrowingResult),
    StampDuty(StampDutyResult),
}

async fn handler(runner: &ScenarioRunner, event: LambdaEvent<CalculatorRequest>) -> Result<CalculatorResponse, Error> {
    let response = match event.payload {
        CalculatorRequest::Repayment(form) => CalculatorResponse::Repayment(runner.repayment(&form.to_input())),
        CalculatorRequest::Borrowing(form) => {
            CalculatorResponse::Borrowing(runner.borrowing_capacity(&form.to_input()))
        }
        CalculatorRequest::StampDuty(form) => CalculatorResponse::StampDuty(runner.stamp_duty(&form.to_input())),
    };
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let runner = match std::env::var("ASSUMPTIONS_DIR") {
        Ok(dir) => {
            info!("loading assumptions from {}", dir);
            ScenarioRunner::from_csv_path(Path::new(&dir))?
        }
        Err(_) => ScenarioRunner::new(),
    };

    let runner = &runner;
    run(service_fn(move |event| async move { handler(runner, event).await })).await
}
