use axum::extract::{Extension, Json, Path};

use crate::entities::{PresetRoute, PresetSelection};
use crate::error::Error;
use crate::server::DynAPI;

pub async fn list(Extension(api): Extension<DynAPI>) -> Json<Vec<PresetRoute>> {
    api.list_presets().into()
}

pub async fn select(
    Extension(api): Extension<DynAPI>,
    Path(name): Path<String>,
) -> Result<Json<PresetSelection>, Error> {
    let selection = api.select_preset(name).await?;

    Ok(selection.into())
}
