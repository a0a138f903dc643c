//! Stamp duty: progressive bracket schedule and first-home-buyer exemption

mod schedule;
mod engine;

pub use schedule::{DutyBracket, DutySchedule, CONTINUITY_TOLERANCE};
pub use engine::{compute_stamp_duty, FirstHomeBuyerRule, StampDutyEngine, StampDutyInput, StampDutyResult};
