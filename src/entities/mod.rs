mod location;
mod marker;
mod position;
mod preset;
mod resolution;
mod route;
mod voice;

pub use location::{Coordinates, GeocodingScope, PlaceQuery};
pub use marker::{Marker, MarkerColor, MarkerSet};
pub use position::{PositionFix, PositionReport, TrackerOptions};
pub use preset::{builtin_presets, PresetRoute, PresetSelection, PLACEHOLDER};
pub use resolution::{HaltReason, Resolution};
pub use route::{DirectionsProfile, RoutePlan};
pub use voice::{RecognitionSettings, VoiceOutcome};

use serde::{Deserialize, Serialize};

/// What the map client draws: the route plan and every placed marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub plan: RoutePlan,
    pub markers: Vec<Marker>,
}
