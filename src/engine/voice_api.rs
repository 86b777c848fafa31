use super::Engine;

use async_trait::async_trait;

use crate::{
    api::{DestinationAPI, VoiceAPI},
    entities::{RecognitionSettings, Resolution, VoiceOutcome},
    error::{voice_unsupported_error, Error},
};

#[async_trait]
impl VoiceAPI for Engine {
    fn recognition_settings(&self) -> RecognitionSettings {
        RecognitionSettings::new(self.voice_language.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn submit_voice(&self, outcome: VoiceOutcome) -> Result<Option<Resolution>, Error> {
        match outcome {
            VoiceOutcome::Transcript { transcript } => {
                tracing::info!("voice data = {:?}", transcript);
                let resolution = self.resolve_single(transcript).await?;

                Ok(Some(resolution))
            }
            VoiceOutcome::Unsupported => Err(voice_unsupported_error()),
            VoiceOutcome::Failed { reason } => {
                tracing::error!("voice recognition error: {}", reason);
                Ok(None)
            }
        }
    }
}

#[test]
fn settings_are_one_shot_swedish() {
    use super::testing::{recording_engine, ScriptedGeocoder};
    use std::sync::Arc;

    let (engine, _log) = recording_engine(Arc::new(ScriptedGeocoder::default()));

    let settings = engine.recognition_settings();

    assert_eq!(settings.language, "sv-SE");
    assert!(!settings.continuous);
    assert!(!settings.interim_results);
}

#[test]
fn transcript_sets_single_destination() {
    use super::testing::{coords, recording_engine, Answer, ScriptedGeocoder};
    use crate::api::MapAPI;
    use std::sync::Arc;
    use tokio_test::block_on;

    let geocoder = Arc::new(
        ScriptedGeocoder::default().answer("Sturegatan 21", Answer::Found(coords(5.0))),
    );
    let (engine, _log) = recording_engine(geocoder);

    let resolution = block_on(engine.submit_voice(VoiceOutcome::Transcript {
        transcript: "Sturegatan 21".into(),
    }))
    .unwrap();

    assert_eq!(resolution, Some(Resolution::Completed { resolved: 1 }));
    assert_eq!(block_on(engine.snapshot()).plan.destination, Some(coords(5.0)));
}

#[test]
fn unsupported_voice_is_surfaced() {
    use super::testing::{calls, recording_engine, ScriptedGeocoder};
    use std::sync::Arc;
    use tokio_test::block_on;

    let (engine, log) = recording_engine(Arc::new(ScriptedGeocoder::default()));

    let err = block_on(engine.submit_voice(VoiceOutcome::Unsupported)).unwrap_err();

    assert_eq!(err.message, "Voice recognition not supported in this browser.");
    assert!(calls(&log).is_empty());
}

#[test]
fn recognition_error_is_only_logged() {
    use super::testing::{calls, recording_engine, ScriptedGeocoder};
    use std::sync::Arc;
    use tokio_test::block_on;

    let (engine, log) = recording_engine(Arc::new(ScriptedGeocoder::default()));

    let result = block_on(engine.submit_voice(VoiceOutcome::Failed {
        reason: "no-speech".into(),
    }))
    .unwrap();

    assert_eq!(result, None);
    assert!(calls(&log).is_empty());
}

#[test]
fn blank_transcript_is_invalid_input() {
    use super::testing::{recording_engine, ScriptedGeocoder};
    use std::sync::Arc;
    use tokio_test::block_on;

    let (engine, _log) = recording_engine(Arc::new(ScriptedGeocoder::default()));

    let err = block_on(engine.submit_voice(VoiceOutcome::Transcript {
        transcript: " ".into(),
    }))
    .unwrap_err();

    assert_eq!(err.code, 101);
}
