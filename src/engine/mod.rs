mod destination_api;
mod map_api;
mod position_api;
mod preset_api;
mod session;
mod voice_api;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    api::{Directions, Geocoder, MarkerRenderer, RoutePlanner, API},
    config::Config,
    entities::{
        Coordinates, DirectionsProfile, GeocodingScope, MarkerSet, PresetRoute, RoutePlan,
        TrackerOptions,
    },
};

pub use session::Session;

pub type DynGeocoder = Arc<dyn Geocoder + Send + Sync>;
pub type DynDirections = Arc<dyn Directions + Send + Sync>;

pub struct Engine {
    geocoder: DynGeocoder,
    directions: DynDirections,
    session: Mutex<Session>,
    scope: GeocodingScope,
    fallback_location: Coordinates,
    tracker: TrackerOptions,
    voice_language: String,
    presets: Vec<PresetRoute>,
}

impl Engine {
    /// Engine with in-memory route plan and marker set.
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(config: &Config, geocoder: DynGeocoder, directions: DynDirections) -> Self {
        Self::with_collaborators(
            config,
            geocoder,
            directions,
            Box::new(RoutePlan::new(DirectionsProfile::default())),
            Box::new(MarkerSet::default()),
        )
    }

    pub fn with_collaborators(
        config: &Config,
        geocoder: DynGeocoder,
        directions: DynDirections,
        planner: Box<dyn RoutePlanner + Send>,
        renderer: Box<dyn MarkerRenderer + Send>,
    ) -> Self {
        Self {
            geocoder,
            directions,
            session: Mutex::new(Session::new(planner, renderer)),
            scope: config.scope.clone(),
            fallback_location: config.fallback_location,
            tracker: config.tracker.clone(),
            voice_language: config.voice_language.clone(),
            presets: config.presets.clone(),
        }
    }
}

impl API for Engine {}
