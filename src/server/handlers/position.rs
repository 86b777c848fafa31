use async_channel::Sender;
use axum::extract::{Extension, Json};
use axum::http::StatusCode;

use crate::entities::{PositionReport, TrackerOptions};
use crate::error::{unexpected_error, Error};
use crate::server::DynAPI;

/// Queues a report for the tracker task rather than applying it inline.
pub async fn report(
    Extension(positions): Extension<Sender<PositionReport>>,
    Json(report): Json<PositionReport>,
) -> Result<StatusCode, Error> {
    positions.send(report).await.map_err(|_| {
        tracing::error!("position tracker is not running");
        unexpected_error()
    })?;

    Ok(StatusCode::ACCEPTED)
}

pub async fn options(Extension(api): Extension<DynAPI>) -> Json<TrackerOptions> {
    api.tracker_options().into()
}
