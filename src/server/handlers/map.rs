use axum::extract::{Extension, Json};

use crate::entities::MapSnapshot;
use crate::error::Error;
use crate::server::DynAPI;

pub async fn snapshot(Extension(api): Extension<DynAPI>) -> Json<MapSnapshot> {
    api.snapshot().await.into()
}

pub async fn directions(
    Extension(api): Extension<DynAPI>,
) -> Result<Json<serde_json::Value>, Error> {
    let routes = api.directions().await?;

    Ok(routes.into())
}
