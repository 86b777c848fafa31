mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use async_channel::Sender;
use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use crate::api::API;
use crate::entities::PositionReport;
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{destinations, map, position, presets, voice};

pub type DynAPI = Arc<dyn API + Send + Sync>;

pub fn router(api: DynAPI, positions: Sender<PositionReport>) -> Router {
    Router::new()
        .route("/map", get(map::snapshot))
        .route("/map/directions", get(map::directions))
        .route(
            "/destinations",
            post(destinations::resolve_sequence).delete(destinations::reset),
        )
        .route("/destinations/single", post(destinations::resolve_single))
        .route("/position", post(position::report))
        .route("/position/options", get(position::options))
        .route("/voice", post(voice::submit))
        .route("/voice/settings", get(voice::settings))
        .route("/presets", get(presets::list))
        .route("/presets/:name", post(presets::select))
        .layer(Extension(api))
        .layer(Extension(positions))
}

pub async fn serve(
    api: DynAPI,
    positions: Sender<PositionReport>,
    addr: SocketAddr,
) -> Result<(), Error> {
    let app = router(api, positions);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!("server error: {}", err);
            unexpected_error()
        })
}
