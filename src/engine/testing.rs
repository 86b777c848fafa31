use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use super::Engine;
use crate::{
    api::{Directions, Geocoder, MarkerRenderer, RoutePlanner},
    config::Config,
    entities::{Coordinates, Marker, MarkerColor, MarkerSet, PlaceQuery, RoutePlan},
    error::{upstream_error, Error},
};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    SetOrigin(Coordinates),
    SetDestination(Option<Coordinates>),
    AddWaypoint(usize, Coordinates),
    AddMarker(Coordinates, MarkerColor),
    RemoveMarker,
    MoveMarker(Coordinates),
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

pub fn calls(log: &CallLog) -> Vec<Call> {
    log.lock().unwrap().clone()
}

#[derive(Clone, Debug)]
pub enum Answer {
    Found(Coordinates),
    Miss,
    Fail,
}

/// Geocoder answering from a fixed table, optionally after a delay, that
/// tracks how many lookups are in flight at once.
#[derive(Default)]
pub struct ScriptedGeocoder {
    answers: HashMap<String, (Answer, Duration)>,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedGeocoder {
    pub fn answer(mut self, text: &str, answer: Answer) -> Self {
        self.answers.insert(text.into(), (answer, Duration::ZERO));
        self
    }

    pub fn answer_after(mut self, text: &str, answer: Answer, delay: Duration) -> Self {
        self.answers.insert(text.into(), (answer, delay));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for ScriptedGeocoder {
    async fn forward(&self, query: &PlaceQuery) -> Result<Vec<Coordinates>, Error> {
        self.requests.lock().unwrap().push(query.text.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let (answer, delay) = self
            .answers
            .get(&query.text)
            .cloned()
            .unwrap_or((Answer::Miss, Duration::ZERO));

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match answer {
            Answer::Found(coordinates) => Ok(vec![coordinates, Coordinates::new(0.0, 0.0)]),
            Answer::Miss => Ok(vec![]),
            Answer::Fail => Err(upstream_error()),
        }
    }
}

pub struct NoDirections;

#[async_trait]
impl Directions for NoDirections {
    async fn directions(&self, plan: &RoutePlan) -> Result<serde_json::Value, Error> {
        Ok(serde_json::json!([{ "stops": plan.stops().map(|s| s.len()) }]))
    }
}

pub struct RecordingPlanner {
    plan: RoutePlan,
    log: CallLog,
}

impl RoutePlanner for RecordingPlanner {
    fn set_origin(&mut self, origin: Coordinates) {
        self.log.lock().unwrap().push(Call::SetOrigin(origin));
        self.plan.set_origin(origin);
    }

    fn set_destination(&mut self, destination: Option<Coordinates>) {
        self.log.lock().unwrap().push(Call::SetDestination(destination));
        self.plan.set_destination(destination);
    }

    fn add_waypoint(&mut self, index: usize, waypoint: Coordinates) {
        self.log.lock().unwrap().push(Call::AddWaypoint(index, waypoint));
        self.plan.add_waypoint(index, waypoint);
    }

    fn plan(&self) -> RoutePlan {
        self.plan.clone()
    }
}

pub struct RecordingRenderer {
    markers: MarkerSet,
    log: CallLog,
}

impl MarkerRenderer for RecordingRenderer {
    fn add_marker(&mut self, coordinates: Coordinates, color: MarkerColor, draggable: bool) -> Uuid {
        self.log.lock().unwrap().push(Call::AddMarker(coordinates, color));
        self.markers.add(coordinates, color, draggable)
    }

    fn remove_marker(&mut self, id: Uuid) {
        self.log.lock().unwrap().push(Call::RemoveMarker);
        self.markers.remove(id);
    }

    fn move_marker(&mut self, id: Uuid, coordinates: Coordinates) {
        self.log.lock().unwrap().push(Call::MoveMarker(coordinates));
        self.markers.move_to(id, coordinates);
    }

    fn markers(&self) -> Vec<Marker> {
        self.markers.markers().to_vec()
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "MAPBOX_ACCESS_TOKEN" => Some("pk.test".into()),
        _ => None,
    })
    .unwrap()
}

/// Engine over `geocoder` whose planner and renderer calls land in the
/// returned log, in call order.
pub fn recording_engine(geocoder: Arc<ScriptedGeocoder>) -> (Engine, CallLog) {
    let log = CallLog::default();

    let engine = Engine::with_collaborators(
        &test_config(),
        geocoder,
        Arc::new(NoDirections),
        Box::new(RecordingPlanner {
            plan: RoutePlan::default(),
            log: log.clone(),
        }),
        Box::new(RecordingRenderer {
            markers: MarkerSet::default(),
            log: log.clone(),
        }),
    );

    (engine, log)
}

pub fn coords(n: f64) -> Coordinates {
    Coordinates::new(18.0 + n / 100.0, 59.0 + n / 100.0)
}
