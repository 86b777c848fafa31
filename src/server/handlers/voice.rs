use axum::extract::{Extension, Json};

use crate::entities::{RecognitionSettings, Resolution, VoiceOutcome};
use crate::error::Error;
use crate::server::DynAPI;

pub async fn settings(Extension(api): Extension<DynAPI>) -> Json<RecognitionSettings> {
    api.recognition_settings().into()
}

pub async fn submit(
    Extension(api): Extension<DynAPI>,
    Json(outcome): Json<VoiceOutcome>,
) -> Result<Json<Option<Resolution>>, Error> {
    let resolution = api.submit_voice(outcome).await?;

    Ok(resolution.into())
}
