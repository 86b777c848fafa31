use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub coordinates: Coordinates,
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl PositionFix {
    pub fn now(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            accuracy: None,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum PositionReport {
    Fix(PositionFix),
    Failure { reason: String },
}

/// Watch parameters for the client's geolocation watcher. Only the timeout
/// is enforced server side, by the tracker task.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackerOptions {
    pub high_accuracy: bool,
    pub maximum_age_ms: u64,
    pub timeout_ms: u64,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            maximum_age_ms: 1000,
            timeout_ms: 5000,
        }
    }
}

impl TrackerOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[test]
fn report_uses_tagged_json() {
    let report: PositionReport =
        serde_json::from_str(r#"{"name":"failure","reason":"permission denied"}"#).unwrap();

    assert_eq!(
        report,
        PositionReport::Failure {
            reason: "permission denied".into()
        }
    );
}
