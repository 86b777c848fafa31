use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    api::{MarkerRenderer, RoutePlanner},
    entities::{Coordinates, MapSnapshot, MarkerColor},
};

/// Page-lifetime map state: the route plan, the markers on the map, and
/// the generation of the destination run allowed to modify them.
pub struct Session {
    planner: Box<dyn RoutePlanner + Send>,
    renderer: Box<dyn MarkerRenderer + Send>,
    destination_markers: Vec<Uuid>,
    user_marker: Option<Uuid>,
    last_fix: Option<DateTime<Utc>>,
    generation: u64,
}

impl Session {
    pub fn new(
        planner: Box<dyn RoutePlanner + Send>,
        renderer: Box<dyn MarkerRenderer + Send>,
    ) -> Self {
        Self {
            planner,
            renderer,
            destination_markers: Vec::new(),
            user_marker: None,
            last_fix: None,
            generation: 0,
        }
    }

    /// Clears the destination, waypoints and destination markers, and
    /// invalidates any destination run still in flight.
    pub fn reset(&mut self) -> u64 {
        self.generation += 1;

        self.planner.set_destination(None);
        for id in self.destination_markers.drain(..) {
            self.renderer.remove_marker(id);
        }

        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Index 0 becomes the terminal destination, later indices are waypoints
    /// inserted just before it.
    pub fn apply_destination(&mut self, index: usize, coordinates: Coordinates) {
        if index == 0 {
            self.planner.set_destination(Some(coordinates));
        } else {
            self.planner.add_waypoint(index - 1, coordinates);
        }

        let id = self
            .renderer
            .add_marker(coordinates, MarkerColor::Green, false);
        self.destination_markers.push(id);
    }

    /// Returns false when the fix is older than one already applied.
    pub fn apply_fix(&mut self, coordinates: Coordinates, timestamp: DateTime<Utc>) -> bool {
        if matches!(self.last_fix, Some(last) if timestamp < last) {
            return false;
        }
        self.last_fix = Some(timestamp);

        match self.user_marker {
            Some(id) => self.renderer.move_marker(id, coordinates),
            None => {
                let id = self.renderer.add_marker(coordinates, MarkerColor::Blue, false);
                self.user_marker = Some(id);
            }
        }

        self.planner.set_origin(coordinates);

        true
    }

    /// Moves the origin to `coordinates`. The user marker stays at the
    /// last fix.
    pub fn apply_fallback(&mut self, coordinates: Coordinates) {
        self.planner.set_origin(coordinates);
    }

    pub fn origin(&self) -> Option<Coordinates> {
        self.planner.plan().origin
    }

    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            plan: self.planner.plan(),
            markers: self.renderer.markers(),
        }
    }
}
