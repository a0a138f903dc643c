//! Progressive stamp duty bracket schedule

use crate::error::{AssumptionError, Result};
use log::warn;
use serde::{Deserialize, Serialize};

/// Largest gap tolerated between a bracket base and the duty at its threshold
pub const CONTINUITY_TOLERANCE: f64 = 1e-6;

/// One marginal band of the schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyBracket {
    /// Value above which this bracket's marginal rate applies
    pub lower: f64,

    /// Inclusive upper bound; None for the top bracket
    pub upper: Option<f64>,

    /// Duty accrued on the value up to `lower`
    pub base: f64,

    /// Marginal rate on the 0-100 scale, charged per $100 above `lower`
    pub rate_percent: f64,
}

impl DutyBracket {
    pub fn new(lower: f64, upper: Option<f64>, base: f64, rate_percent: f64) -> Self {
        Self { lower, upper, base, rate_percent }
    }

    /// Whether a property value falls in this bracket
    pub fn contains(&self, value: f64) -> bool {
        self.upper.map_or(true, |upper| value <= upper)
    }

    /// Duty on `value` under this bracket's formula
    pub fn duty_at(&self, value: f64) -> f64 {
        self.base + ((value - self.lower) / 100.0) * self.rate_percent
    }
}

/// Ordered, contiguous set of duty brackets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DutyBracket>", into = "Vec<DutyBracket>")]
pub struct DutySchedule {
    brackets: Vec<DutyBracket>,
}

impl DutySchedule {
    /// Build a schedule, checking that brackets start at zero, are
    /// contiguous and have non-decreasing marginal rates. Bases that do not
    /// match the previous bracket's duty at the threshold are only logged.
    pub fn new(brackets: Vec<DutyBracket>) -> Result<Self> {
        let invalid = |index: usize, reason: String| AssumptionError::InvalidSchedule { index, reason };

        let first = brackets
            .first()
            .ok_or_else(|| invalid(0, "schedule has no brackets".to_string()))?;
        if first.lower != 0.0 {
            return Err(invalid(0, format!("first bracket starts at {}, expected 0", first.lower)));
        }

        for (index, bracket) in brackets.iter().enumerate() {
            let figures = [bracket.lower, bracket.base, bracket.rate_percent];
            if figures.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(invalid(index, "figures must be finite and non-negative".to_string()));
            }

            let is_last = index + 1 == brackets.len();
            match bracket.upper {
                None if !is_last => {
                    return Err(invalid(index, "only the top bracket may be open-ended".to_string()));
                }
                Some(_) if is_last => {
                    return Err(invalid(index, "top bracket must be open-ended".to_string()));
                }
                Some(upper) if upper <= bracket.lower || !upper.is_finite() => {
                    return Err(invalid(index, format!("upper bound {} not above {}", upper, bracket.lower)));
                }
                _ => {}
            }

            if index == 0 {
                continue;
            }
            let previous = &brackets[index - 1];

            if previous.upper != Some(bracket.lower) {
                return Err(invalid(
                    index,
                    format!("starts at {} but previous bracket ends at {:?}", bracket.lower, previous.upper),
                ));
            }
            if bracket.rate_percent < previous.rate_percent {
                return Err(invalid(
                    index,
                    format!("marginal rate {}% below previous {}%", bracket.rate_percent, previous.rate_percent),
                ));
            }
        }

        let schedule = Self { brackets };
        for (threshold, step) in schedule.continuity_gaps() {
            warn!("duty schedule steps by {:.2} at {}", step, threshold);
        }
        Ok(schedule)
    }

    /// Thresholds where a bracket base differs from the duty the previous
    /// bracket reaches there, with the size of the step.
    pub fn continuity_gaps(&self) -> Vec<(f64, f64)> {
        self.brackets
            .windows(2)
            .filter_map(|pair| {
                let threshold = pair[1].lower;
                let step = pair[1].base - pair[0].duty_at(threshold);
                (step.abs() > CONTINUITY_TOLERANCE).then_some((threshold, step))
            })
            .collect()
    }

    /// Indicative Victorian general rates. The published base at 960,000 sits
    /// 2,400 above the duty the 6% band reaches there.
    pub fn victoria_indicative() -> Self {
        Self {
            brackets: vec![
                DutyBracket::new(0.0, Some(25_000.0), 0.0, 1.4),
                DutyBracket::new(25_000.0, Some(130_000.0), 350.0, 2.4),
                DutyBracket::new(130_000.0, Some(960_000.0), 2_870.0, 6.0),
                DutyBracket::new(960_000.0, None, 55_070.0, 6.5),
            ],
        }
    }

    pub fn brackets(&self) -> &[DutyBracket] {
        &self.brackets
    }

    /// Bracket a property value falls into
    pub fn bracket_for(&self, value: f64) -> &DutyBracket {
        self.brackets
            .iter()
            .find(|bracket| bracket.contains(value))
            .unwrap_or(&self.brackets[self.brackets.len() - 1])
    }

    /// Duty on a property value under the schedule alone
    pub fn duty(&self, value: f64) -> f64 {
        self.bracket_for(value).duty_at(value)
    }
}

impl Default for DutySchedule {
    fn default() -> Self {
        Self::victoria_indicative()
    }
}

impl TryFrom<Vec<DutyBracket>> for DutySchedule {
    type Error = AssumptionError;

    fn try_from(brackets: Vec<DutyBracket>) -> Result<Self> {
        Self::new(brackets)
    }
}

impl From<DutySchedule> for Vec<DutyBracket> {
    fn from(schedule: DutySchedule) -> Self {
        schedule.brackets
    }
}
