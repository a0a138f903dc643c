//! Home Loan Estimator CLI
//!
//! Command-line interface for the repayment, borrowing capacity and stamp duty calculators.
//!
//! ```bash
//! home_loan_estimator repayment --amount 500,000 --rate 6.5 --term 30 --frequency fortnightly
//! home_loan_estimator borrowing --income 120000 --adults 2 --children 1
//! home_loan_estimator stamp-duty --value 550000 --first-home-buyer
//! home_loan_estimator --json compare --amount 300000 --rate 6.5 --term 30
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use home_loan_estimator::repayment::{RepaymentSchedule, MAX_SCHEDULE_PERIODS};
use home_loan_estimator::{
    build_schedule, compare_repayment_types, BorrowingForm, FormValue, LoanForm, ScenarioRunner, StampDutyForm,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "home_loan_estimator", version, about, long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Directory of assumption CSVs (built-in figures when omitted)
    #[arg(long, global = true, value_name = "DIR")]
    assumptions: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Periodic repayment, total paid and total interest
    Repayment(RepaymentArgs),
    /// Maximum loan under the serviceability test
    Borrowing(BorrowingArgs),
    /// Stamp duty payable on a property purchase
    StampDuty(StampDutyArgs),
    /// Principal & interest against interest-only for the same loan
    Compare(LoanArgs),
}

/// Loan fields, accepted as typed and coerced like form input
#[derive(Args)]
struct LoanArgs {
    /// Loan amount, e.g. 500,000
    #[arg(long)]
    amount: Option<String>,

    /// Annual interest rate in percent
    #[arg(long)]
    rate: Option<String>,

    /// Loan term in years
    #[arg(long)]
    term: Option<String>,

    /// principalAndInterest or interestOnly
    #[arg(long)]
    repayment_type: Option<String>,

    /// monthly, fortnightly or weekly
    #[arg(long)]
    frequency: Option<String>,
}

impl LoanArgs {
    fn to_form(&self) -> LoanForm {
        LoanForm {
            loan_amount: text(self.amount.as_deref()),
            interest_rate: text(self.rate.as_deref()),
            loan_term: text(self.term.as_deref()),
            repayment_type: text(self.repayment_type.as_deref()),
            repayment_frequency: text(self.frequency.as_deref()),
        }
    }
}

#[derive(Args)]
struct RepaymentArgs {
    #[command(flatten)]
    loan: LoanArgs,

    /// Print the period-by-period amortization schedule
    #[arg(long)]
    schedule: bool,
}

#[derive(Args)]
struct BorrowingArgs {
    /// Primary annual income
    #[arg(long)]
    income: Option<String>,

    /// Other annual income
    #[arg(long)]
    other_income: Option<String>,

    #[arg(long)]
    adults: Option<String>,

    #[arg(long)]
    children: Option<String>,

    /// Existing monthly debt repayments
    #[arg(long)]
    existing_repayments: Option<String>,

    /// Total credit card limits
    #[arg(long)]
    credit_card_limit: Option<String>,
}

impl BorrowingArgs {
    fn to_form(&self) -> BorrowingForm {
        BorrowingForm {
            individual_income: text(self.income.as_deref()),
            other_income: text(self.other_income.as_deref()),
            adults: text(self.adults.as_deref()),
            children: text(self.children.as_deref()),
            existing_repayments: text(self.existing_repayments.as_deref()),
            credit_card_limit: text(self.credit_card_limit.as_deref()),
        }
    }
}

#[derive(Args)]
struct StampDutyArgs {
    /// Property value
    #[arg(long)]
    value: Option<String>,

    #[arg(long)]
    first_home_buyer: bool,
}

impl StampDutyArgs {
    fn to_form(&self) -> StampDutyForm {
        StampDutyForm {
            property_value: text(self.value.as_deref()),
            is_first_home_buyer: Some(FormValue::Flag(self.first_home_buyer)),
        }
    }
}

fn text(raw: Option<&str>) -> Option<FormValue> {
    raw.map(FormValue::from)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("serialising result")?);
    Ok(())
}

fn print_schedule(schedule: &RepaymentSchedule) {
    println!(
        "{:>6} {:>14} {:>12} {:>12} {:>12} {:>14}",
        "Period", "Opening", "Payment", "Interest", "Principal", "Closing"
    );
    println!("{}", "-".repeat(75));
    for row in &schedule.rows {
        println!(
            "{:>6} {:>14.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
            row.period, row.opening_balance, row.payment, row.interest, row.principal_repaid, row.closing_balance,
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let runner = match &cli.assumptions {
        Some(dir) => ScenarioRunner::from_csv_path(dir)
            .with_context(|| format!("loading assumptions from {}", dir.display()))?,
        None => ScenarioRunner::new(),
    };

    match &cli.command {
        Command::Repayment(args) => {
            let input = args.loan.to_form().to_input();

            if args.schedule {
                let schedule = build_schedule(&input);
                if cli.json {
                    return print_json(&schedule);
                }
                if schedule.is_empty() {
                    println!("No schedule: the term is zero or longer than {} periods", MAX_SCHEDULE_PERIODS);
                    return Ok(());
                }
                print_schedule(&schedule);
                let summary = schedule.summary();
                println!("\nPeriods:        {}", summary.periods);
                println!("Total paid:     ${:.2}", summary.total_paid);
                println!("Total interest: ${:.2}", summary.total_interest);
                return Ok(());
            }

            let result = runner.repayment(&input);
            if cli.json {
                return print_json(&result);
            }
            println!(
                "{} {} repayment: ${:.2}",
                input.frequency, input.repayment_type, result.periodic_payment
            );
            println!("Total paid:     ${:.2}", result.total_paid);
            println!("Total interest: ${:.2}", result.total_interest);
        }
        Command::Borrowing(args) => {
            let result = runner.borrowing_capacity(&args.to_form().to_input());
            if cli.json {
                return print_json(&result);
            }
            println!("Maximum borrowing: ${:.2}", result.max_principal);
            println!("Living expenses:   ${:.2} p.a. (HEM)", result.applied_hem_amount);
            println!("Assessment rate:   {:.2}%", result.assessment_rate * 100.0);
        }
        Command::StampDuty(args) => {
            let result = runner.stamp_duty(&args.to_form().to_input());
            if cli.json {
                return print_json(&result);
            }
            println!("Stamp duty payable: ${:.2}", result.duty_payable);
            if result.exemption_applied {
                println!("First home buyer exemption applied");
            }
        }
        Command::Compare(args) => {
            let comparison = compare_repayment_types(&args.to_form().to_input());
            if cli.json {
                return print_json(&comparison);
            }
            println!("{:<24} {:>14} {:>16}", "", "Repayment", "Total interest");
            println!(
                "{:<24} {:>14.2} {:>16.2}",
                "Principal & interest",
                comparison.principal_and_interest.periodic_payment,
                comparison.principal_and_interest.total_interest,
            );
            println!(
                "{:<24} {:>14.2} {:>16.2}",
                "Interest only", comparison.interest_only.periodic_payment, comparison.interest_only.total_interest,
            );
            println!("\nDifference per period: ${:.2}", comparison.periodic_difference);
        }
    }

    Ok(())
}
