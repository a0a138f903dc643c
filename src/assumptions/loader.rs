//! CSV-based assumption loader
//!
//! Loads calculator assumptions from CSV files in data/assumptions/

use crate::borrowing::{HemTable, ServiceabilityConfig};
use crate::error::{AssumptionError, Result};
use crate::stamp_duty::{DutyBracket, DutySchedule, FirstHomeBuyerRule};
use log::debug;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

pub const SERVICEABILITY_FILE: &str = "serviceability.csv";
pub const HEM_FILE: &str = "hem.csv";
pub const STAMP_DUTY_BRACKETS_FILE: &str = "stamp_duty_brackets.csv";
pub const FIRST_HOME_BUYER_FILE: &str = "first_home_buyer.csv";

/// Raw CSV row of stamp_duty_brackets.csv. An empty `upper` marks the top bracket.
#[derive(Debug, serde::Deserialize)]
struct CsvBracketRow {
    lower: f64,
    upper: Option<f64>,
    base: f64,
    rate_percent: f64,
}

impl From<CsvBracketRow> for DutyBracket {
    fn from(row: CsvBracketRow) -> Self {
        DutyBracket::new(row.lower, row.upper, row.base, row.rate_percent)
    }
}

fn open_csv(path: &Path) -> Result<csv::Reader<File>> {
    let file = File::open(path).map_err(|source| AssumptionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file))
}

/// A `key,value` assumption file, consumed key by key
struct KeyValues {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl KeyValues {
    fn load(path: &Path) -> Result<Self> {
        let mut reader = open_csv(path)?;
        let mut values = HashMap::new();

        for result in reader.records() {
            let record = result.map_err(|source| AssumptionError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            let key = record.get(0).unwrap_or_default().to_string();
            let value = record.get(1).unwrap_or_default().to_string();
            values.insert(key, value);
        }

        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    fn take_str(&mut self, key: &str) -> Result<String> {
        self.values.remove(key).ok_or_else(|| AssumptionError::MissingKey {
            key: key.to_string(),
            path: self.path.clone(),
        })
    }

    fn take<T: FromStr>(&mut self, key: &str) -> Result<T> {
        let raw = self.take_str(key)?;
        raw.parse().map_err(|_| AssumptionError::InvalidValue {
            key: key.to_string(),
            value: raw,
            path: self.path.clone(),
        })
    }

    /// Fail on anything left over, so typos do not silently fall back to defaults
    fn finish(self) -> Result<()> {
        match self.values.into_keys().next() {
            Some(key) => Err(AssumptionError::UnknownKey { key, path: self.path }),
            None => Ok(()),
        }
    }
}

/// Load serviceability parameters from serviceability.csv
pub fn load_serviceability(path: &Path) -> Result<ServiceabilityConfig> {
    let mut kv = KeyValues::load(&path.join(SERVICEABILITY_FILE))?;

    let config = ServiceabilityConfig {
        base_rate: kv.take("base_rate")?,
        buffer: kv.take("buffer")?,
        assessment_term_years: kv.take("assessment_term_years")?,
        credit_card_servicing_rate: kv.take("credit_card_servicing_rate")?,
        debt_basis: kv.take("debt_basis")?,
    };
    kv.finish()?;
    Ok(config)
}

/// Load HEM figures from hem.csv
pub fn load_hem(path: &Path) -> Result<HemTable> {
    let mut kv = KeyValues::load(&path.join(HEM_FILE))?;

    let table = HemTable {
        single_adult: kv.take("single_adult")?,
        couple: kv.take("couple")?,
        per_child: kv.take("per_child")?,
        adult_policy: kv.take("adult_policy")?,
    };
    kv.finish()?;
    Ok(table)
}

/// Load and validate the bracket schedule from stamp_duty_brackets.csv
pub fn load_duty_schedule(path: &Path) -> Result<DutySchedule> {
    let file = path.join(STAMP_DUTY_BRACKETS_FILE);
    let mut reader = open_csv(&file)?;
    let mut brackets = Vec::new();

    for result in reader.deserialize() {
        let row: CsvBracketRow = result.map_err(|source| AssumptionError::Csv {
            path: file.clone(),
            source,
        })?;
        brackets.push(DutyBracket::from(row));
    }

    DutySchedule::new(brackets)
}

/// Load the first-home-buyer exemption from first_home_buyer.csv
pub fn load_first_home_buyer(path: &Path) -> Result<FirstHomeBuyerRule> {
    let mut kv = KeyValues::load(&path.join(FIRST_HOME_BUYER_FILE))?;
    let rule = FirstHomeBuyerRule {
        exemption_threshold: kv.take("exemption_threshold")?,
    };
    kv.finish()?;
    Ok(rule)
}

/// All assumption tables loaded from one directory
#[derive(Debug, Clone)]
pub struct LoadedAssumptions {
    pub serviceability: ServiceabilityConfig,
    pub hem: HemTable,
    pub duty_schedule: DutySchedule,
    pub first_home_buyer: FirstHomeBuyerRule,
}

impl LoadedAssumptions {
    /// Load all assumptions from the default path
    pub fn load_default() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load all assumptions from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("loading assumptions from {}", path.display());
        Ok(Self {
            serviceability: load_serviceability(path)?,
            hem: load_hem(path)?,
            duty_schedule: load_duty_schedule(path)?,
            first_home_buyer: load_first_home_buyer(path)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::borrowing::{AdultTierPolicy, DebtRepaymentBasis};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_default_assumptions() {
        let result = LoadedAssumptions::load_default();
        assert!(result.is_ok(), "Failed to load assumptions: {:?}", result.err());

        let loaded = result.unwrap();
        assert_eq!(loaded.serviceability, ServiceabilityConfig::default());
        assert_eq!(loaded.hem, HemTable::default());
        assert_eq!(loaded.duty_schedule, DutySchedule::default());
        assert_eq!(loaded.first_home_buyer, FirstHomeBuyerRule::default());
    }

    #[test]
    fn test_missing_directory() {
        let err = LoadedAssumptions::load_from(Path::new("does/not/exist")).unwrap_err();
        assert!(matches!(err, AssumptionError::Io { .. }), "got {:?}", err);
    }

    #[test]
    fn test_unknown_and_missing_keys() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();

        fs::write(dir.join(FIRST_HOME_BUYER_FILE), "key,value\nexemption_threshold,600000\nconcession_ceiling,750000\n").unwrap();
        let err = load_first_home_buyer(dir).unwrap_err();
        assert!(matches!(err, AssumptionError::UnknownKey { ref key, .. } if key == "concession_ceiling"));

        fs::write(dir.join(FIRST_HOME_BUYER_FILE), "key,value\n").unwrap();
        let err = load_first_home_buyer(dir).unwrap_err();
        assert!(matches!(err, AssumptionError::MissingKey { .. }));

        fs::write(dir.join(FIRST_HOME_BUYER_FILE), "key,value\nexemption_threshold,six hundred\n").unwrap();
        let err = load_first_home_buyer(dir).unwrap_err();
        assert!(matches!(err, AssumptionError::InvalidValue { .. }));
    }

    #[test]
    fn test_debt_basis_parsing() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        let body = "key,value\nbase_rate,0.06\nbuffer,0.03\nassessment_term_years,30\ncredit_card_servicing_rate,0.03\n";

        fs::write(dir.join(SERVICEABILITY_FILE), format!("{}debt_basis,annualizeMonthly\n", body)).unwrap();
        let config = load_serviceability(dir).unwrap();
        assert_eq!(config.debt_basis, DebtRepaymentBasis::AnnualizeMonthly);

        fs::write(dir.join(SERVICEABILITY_FILE), format!("{}debt_basis,weekly\n", body)).unwrap();
        let err = load_serviceability(dir).unwrap_err();
        assert!(matches!(err, AssumptionError::InvalidValue { ref key, ref value, .. } if key == "debt_basis" && value == "weekly"));
    }

    #[test]
    fn test_custom_hem_policy() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        fs::write(
            dir.join(HEM_FILE),
            "key,value\nsingle_adult,26000\ncouple,37000\nper_child,5500\nadult_policy,extendLinearly\n",
        )
        .unwrap();

        let hem = load_hem(dir).unwrap();
        assert_eq!(hem.adult_policy, AdultTierPolicy::ExtendLinearly);
        assert_eq!(hem.couple, 37_000.0);
    }

    #[test]
    fn test_overlapping_brackets_rejected() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        fs::write(
            dir.join(STAMP_DUTY_BRACKETS_FILE),
            "lower,upper,base,rate_percent\n0,25000,0,1.4\n20000,,280,2.4\n",
        )
        .unwrap();

        let err = load_duty_schedule(dir).unwrap_err();
        assert!(matches!(err, AssumptionError::InvalidSchedule { index: 1, .. }));
    }
}
