use serde::{Deserialize, Serialize};

/// Settings the client applies to its one-shot speech recognizer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecognitionSettings {
    pub language: String,
    pub continuous: bool,
    pub interim_results: bool,
}

impl RecognitionSettings {
    pub fn new(language: String) -> Self {
        Self {
            language,
            continuous: false,
            interim_results: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum VoiceOutcome {
    Transcript { transcript: String },
    Unsupported,
    Failed { reason: String },
}
