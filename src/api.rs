use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{
    Coordinates, MapSnapshot, Marker, MarkerColor, MarkerSet, PlaceQuery, PositionReport,
    PresetRoute, PresetSelection, RecognitionSettings, Resolution, RoutePlan, TrackerOptions,
    VoiceOutcome,
};
use crate::error::Error;

/// Resolves free text to candidate coordinates, best match first.
#[async_trait]
pub trait Geocoder {
    async fn forward(&self, query: &PlaceQuery) -> Result<Vec<Coordinates>, Error>;
}

/// Computes drivable routes through the stops of a plan.
#[async_trait]
pub trait Directions {
    async fn directions(&self, plan: &RoutePlan) -> Result<serde_json::Value, Error>;
}

pub trait RoutePlanner {
    fn set_origin(&mut self, origin: Coordinates);
    fn set_destination(&mut self, destination: Option<Coordinates>);
    fn add_waypoint(&mut self, index: usize, waypoint: Coordinates);
    fn plan(&self) -> RoutePlan;
}

pub trait MarkerRenderer {
    fn add_marker(&mut self, coordinates: Coordinates, color: MarkerColor, draggable: bool) -> Uuid;
    fn remove_marker(&mut self, id: Uuid);
    fn move_marker(&mut self, id: Uuid, coordinates: Coordinates);
    fn markers(&self) -> Vec<Marker>;
}

impl RoutePlanner for RoutePlan {
    fn set_origin(&mut self, origin: Coordinates) {
        RoutePlan::set_origin(self, origin)
    }

    fn set_destination(&mut self, destination: Option<Coordinates>) {
        RoutePlan::set_destination(self, destination)
    }

    fn add_waypoint(&mut self, index: usize, waypoint: Coordinates) {
        RoutePlan::add_waypoint(self, index, waypoint)
    }

    fn plan(&self) -> RoutePlan {
        self.clone()
    }
}

impl MarkerRenderer for MarkerSet {
    fn add_marker(&mut self, coordinates: Coordinates, color: MarkerColor, draggable: bool) -> Uuid {
        self.add(coordinates, color, draggable)
    }

    fn remove_marker(&mut self, id: Uuid) {
        self.remove(id);
    }

    fn move_marker(&mut self, id: Uuid, coordinates: Coordinates) {
        self.move_to(id, coordinates);
    }

    fn markers(&self) -> Vec<Marker> {
        MarkerSet::markers(self).to_vec()
    }
}

#[async_trait]
pub trait DestinationAPI {
    async fn resolve_sequence(&self, places: Vec<String>) -> Result<Resolution, Error>;
    async fn resolve_single(&self, place: String) -> Result<Resolution, Error>;
    async fn reset(&self);
}

#[async_trait]
pub trait PositionAPI {
    async fn report_position(&self, report: PositionReport);
    async fn current_origin(&self) -> Option<Coordinates>;
    fn tracker_options(&self) -> TrackerOptions;
}

#[async_trait]
pub trait VoiceAPI {
    fn recognition_settings(&self) -> RecognitionSettings;
    async fn submit_voice(&self, outcome: VoiceOutcome) -> Result<Option<Resolution>, Error>;
}

#[async_trait]
pub trait PresetAPI {
    fn list_presets(&self) -> Vec<PresetRoute>;
    async fn select_preset(&self, name: String) -> Result<PresetSelection, Error>;
}

#[async_trait]
pub trait MapAPI {
    async fn snapshot(&self) -> MapSnapshot;
    async fn directions(&self) -> Result<serde_json::Value, Error>;
}

pub trait API: DestinationAPI + PositionAPI + VoiceAPI + PresetAPI + MapAPI {}
