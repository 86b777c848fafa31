use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum HaltReason {
    NotFound,
    Failed { message: String },
}

/// How a destination run ended. Halting is not an error: whatever was applied
/// before the halt stays on the map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Resolution {
    Completed { resolved: usize },
    Halted { index: usize, reason: HaltReason },
    Superseded { index: usize },
}

impl Resolution {
    /// Number of places applied to the route before the run stopped.
    pub fn applied(&self) -> usize {
        match self {
            Self::Completed { resolved } => *resolved,
            Self::Halted { index, reason: _ } => *index,
            Self::Superseded { index } => *index,
        }
    }
}
