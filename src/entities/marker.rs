use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Coordinates;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerColor {
    Blue,
    Green,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: Uuid,
    pub coordinates: Coordinates,
    pub color: MarkerColor,
    pub draggable: bool,
}

impl Marker {
    pub fn new(coordinates: Coordinates, color: MarkerColor, draggable: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            coordinates,
            color,
            draggable,
        }
    }
}

/// Markers currently placed on the map, in placement order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

impl MarkerSet {
    pub fn add(&mut self, coordinates: Coordinates, color: MarkerColor, draggable: bool) -> Uuid {
        let marker = Marker::new(coordinates, color, draggable);
        let id = marker.id;

        self.markers.push(marker);

        id
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.markers.len();
        self.markers.retain(|marker| marker.id != id);

        self.markers.len() != before
    }

    pub fn move_to(&mut self, id: Uuid, coordinates: Coordinates) -> bool {
        match self.markers.iter_mut().find(|marker| marker.id == id) {
            Some(marker) => {
                marker.coordinates = coordinates;
                true
            }
            None => false,
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[test]
fn marker_set_keeps_placement_order() {
    let mut set = MarkerSet::default();

    set.add(Coordinates::new(1.0, 1.0), MarkerColor::Green, false);
    set.add(Coordinates::new(2.0, 2.0), MarkerColor::Green, false);

    let lngs: Vec<f64> = set.markers().iter().map(|m| m.coordinates.lng).collect();
    assert_eq!(lngs, vec![1.0, 2.0]);
}

#[test]
fn marker_set_moves_and_removes_by_id() {
    let mut set = MarkerSet::default();

    let user = set.add(Coordinates::new(1.0, 1.0), MarkerColor::Blue, false);
    let other = set.add(Coordinates::new(2.0, 2.0), MarkerColor::Green, false);

    assert!(set.move_to(user, Coordinates::new(3.0, 3.0)));
    assert_eq!(set.markers()[0].coordinates, Coordinates::new(3.0, 3.0));

    assert!(set.remove(other));
    assert!(!set.remove(other));
    assert_eq!(set.len(), 1);
}
