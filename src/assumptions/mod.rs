//! Calculator assumptions: serviceability, HEM, stamp duty brackets and exemptions

pub mod loader;

pub use loader::LoadedAssumptions;

use crate::borrowing::{BorrowingCapacityEngine, HemTable, ServiceabilityConfig};
use crate::error::Result;
use crate::stamp_duty::{DutySchedule, FirstHomeBuyerRule, StampDutyEngine};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for all calculator assumptions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assumptions {
    pub serviceability: ServiceabilityConfig,
    pub hem: HemTable,
    pub duty_schedule: DutySchedule,
    pub first_home_buyer: FirstHomeBuyerRule,
}

impl Assumptions {
    /// Built-in indicative figures
    pub fn default_indicative() -> Self {
        Self::default()
    }

    /// Load assumptions from CSV files in the default location (data/assumptions/)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load assumptions from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let loaded = LoadedAssumptions::load_from(path)?;

        let assumptions = Self {
            serviceability: loaded.serviceability,
            hem: loaded.hem,
            duty_schedule: loaded.duty_schedule,
            first_home_buyer: loaded.first_home_buyer,
        };
        assumptions.validate()?;
        Ok(assumptions)
    }

    /// Check parameters the loaders cannot check structurally
    pub fn validate(&self) -> Result<()> {
        self.serviceability.validate()?;
        self.hem.validate()?;
        self.first_home_buyer.validate()
    }

    pub fn borrowing_engine(&self) -> BorrowingCapacityEngine {
        BorrowingCapacityEngine::new(self.serviceability.clone(), self.hem.clone())
    }

    pub fn stamp_duty_engine(&self) -> StampDutyEngine {
        StampDutyEngine::new(self.duty_schedule.clone(), self.first_home_buyer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::borrowing::BorrowingInput;
    use crate::stamp_duty::StampDutyInput;

    #[test]
    fn test_csv_matches_builtin() {
        let loaded = Assumptions::from_csv().expect("Failed to load assumptions");
        assert_eq!(loaded, Assumptions::default_indicative());
    }

    #[test]
    fn test_engines_use_assumptions() {
        let mut assumptions = Assumptions::default_indicative();
        assumptions.hem.single_adult = 30_000.0;
        assumptions.first_home_buyer.exemption_threshold = 0.0;

        let borrowing = assumptions.borrowing_engine().compute(&BorrowingInput {
            primary_income: 90_000.0,
            ..Default::default()
        });
        assert_eq!(borrowing.applied_hem_amount, 30_000.0);

        let duty = assumptions
            .stamp_duty_engine()
            .compute(&StampDutyInput::new(500_000.0, true));
        assert!(!duty.exemption_applied);
        assert!(duty.duty_payable > 0.0);
    }

    #[test]
    fn test_json_round_trip_keeps_schedule_valid() {
        let json = serde_json::to_string(&Assumptions::default_indicative()).unwrap();
        assert!(json.contains("\"dutySchedule\":[{"));
        let parsed: Assumptions = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Assumptions::default_indicative());
    }
}
