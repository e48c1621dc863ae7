use super::types::TestResults;
use anyhow::Result;

/// Render the run as pretty JSON
pub fn generate(results: &TestResults) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::state::Outcome;
    use crate::scenario::Scenario;
    use std::time::Duration;

    #[test]
    fn test_json_carries_outcomes_and_summary() {
        let results = TestResults::new(
            "http://localhost:3001",
            vec![Outcome::passed(
                Scenario::HealthCheck,
                "API is healthy and responding".to_string(),
                201,
                Some("Created".to_string()),
                Duration::from_millis(8),
            )],
        );
        let json = generate(&results).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["baseUrl"], "http://localhost:3001");
        assert_eq!(value["outcomes"][0]["testName"], "Health Check");
        assert_eq!(value["summary"]["passed"], 1);
    }
}
