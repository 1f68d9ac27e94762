//! Load simulation requests from JSON documents

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::SimulationRequest;
use crate::error::LoadError;

/// Load a request from a JSON file
pub fn load_request<P: AsRef<Path>>(path: P) -> Result<SimulationRequest, LoadError> {
    let file = File::open(path)?;
    load_request_from_reader(BufReader::new(file))
}

/// Load a request from any reader
pub fn load_request_from_reader<R: Read>(reader: R) -> Result<SimulationRequest, LoadError> {
    let request = serde_json::from_reader(reader)?;
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::BucketType;

    #[test]
    fn test_load_request_with_priority() {
        let json = r#"{
            "plan_id": 42,
            "default_value": {"default_interest": 3.0, "default_roi": 7.0,
                              "default_dividend": 1.0, "inflation": 2.0},
            "extra_monthly_spend": 250.0,
            "priority": {"allocations": [
                {"bucket": "cushion", "type": "SAVINGS", "weight": 0.5},
                {"bucket": "paydown", "type": "DEBT", "weight": 0.5}
            ]},
            "retirement_year": 2050,
            "expected_death_year": 2075
        }"#;

        let request = load_request_from_reader(json.as_bytes()).expect("valid request");
        assert_eq!(request.plan_id, 42);
        assert_eq!(request.extra_monthly_spend(), 250.0);
        assert_eq!(request.retirement_year, Some(2050));

        let allocations = request.allocations().expect("allocations present");
        assert_eq!(allocations[1].bucket_type, BucketType::Debt);
    }

    #[test]
    fn test_missing_terminal_year_is_an_error() {
        let result = load_request_from_reader(r#"{"plan_id": 1}"#.as_bytes());
        assert!(matches!(result, Err(LoadError::Json(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_request("does/not/exist.json");
        assert!(matches!(result, Err(LoadError::Io(_))));
    }
}
