use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::entities::Resolution;
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct SequenceParams {
    places: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct SingleParams {
    place: String,
}

pub async fn resolve_sequence(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<SequenceParams>,
) -> Result<Json<Resolution>, Error> {
    let resolution = api.resolve_sequence(params.places).await?;

    Ok(resolution.into())
}

pub async fn resolve_single(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<SingleParams>,
) -> Result<Json<Resolution>, Error> {
    let resolution = api.resolve_single(params.place).await?;

    Ok(resolution.into())
}

pub async fn reset(Extension(api): Extension<DynAPI>) -> StatusCode {
    api.reset().await;

    StatusCode::NO_CONTENT
}
