use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// Options handed to the directions engine when it draws the route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionsProfile {
    pub profile: String,
    pub alternatives: bool,
    pub congestion: bool,
}

impl Default for DirectionsProfile {
    fn default() -> Self {
        Self {
            profile: "mapbox/driving".into(),
            alternatives: true,
            congestion: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub origin: Option<Coordinates>,
    pub destination: Option<Coordinates>,
    pub waypoints: Vec<Coordinates>,
    pub profile: DirectionsProfile,
}

impl RoutePlan {
    pub fn new(profile: DirectionsProfile) -> Self {
        Self {
            profile,
            ..Default::default()
        }
    }

    pub fn set_origin(&mut self, origin: Coordinates) {
        self.origin = Some(origin);
    }

    /// Clearing the destination also drops every waypoint, since waypoints
    /// only exist relative to a terminal destination.
    pub fn set_destination(&mut self, destination: Option<Coordinates>) {
        if destination.is_none() {
            self.waypoints.clear();
        }

        self.destination = destination;
    }

    pub fn add_waypoint(&mut self, index: usize, waypoint: Coordinates) {
        let index = index.min(self.waypoints.len());
        self.waypoints.insert(index, waypoint);
    }

    /// Stops in driving order: origin, waypoints, then the terminal destination.
    pub fn stops(&self) -> Option<Vec<Coordinates>> {
        let origin = self.origin?;
        let destination = self.destination?;

        let mut stops = Vec::with_capacity(self.waypoints.len() + 2);
        stops.push(origin);
        stops.extend(self.waypoints.iter().copied());
        stops.push(destination);

        Some(stops)
    }
}

#[test]
fn clearing_destination_drops_waypoints() {
    let mut plan = RoutePlan::default();

    plan.set_destination(Some(Coordinates::new(1.0, 1.0)));
    plan.add_waypoint(0, Coordinates::new(2.0, 2.0));
    plan.set_destination(None);

    assert_eq!(plan.destination, None);
    assert!(plan.waypoints.is_empty());
}

#[test]
fn waypoint_index_is_clamped() {
    let mut plan = RoutePlan::default();

    plan.add_waypoint(5, Coordinates::new(1.0, 1.0));
    plan.add_waypoint(0, Coordinates::new(2.0, 2.0));

    assert_eq!(
        plan.waypoints,
        vec![Coordinates::new(2.0, 2.0), Coordinates::new(1.0, 1.0)]
    );
}

#[test]
fn stops_need_origin_and_destination() {
    let mut plan = RoutePlan::default();
    plan.set_destination(Some(Coordinates::new(3.0, 3.0)));
    assert!(plan.stops().is_none());

    plan.set_origin(Coordinates::new(0.0, 0.0));
    plan.add_waypoint(0, Coordinates::new(1.0, 1.0));

    assert_eq!(
        plan.stops().unwrap(),
        vec![
            Coordinates::new(0.0, 0.0),
            Coordinates::new(1.0, 1.0),
            Coordinates::new(3.0, 3.0)
        ]
    );
}
