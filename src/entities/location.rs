use std::str::FromStr;

use geo_types::Point;
use serde::{Deserialize, Serialize};

use crate::error::{invalid_input_error, Error};

/// A longitude/latitude pair, in that order, as the map platform expects.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinates {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Stockholm city centre.
    pub const STOCKHOLM: Coordinates = Coordinates::new(18.0686, 59.3293);
}

impl From<Coordinates> for String {
    fn from(coordinates: Coordinates) -> String {
        format!("{},{}", coordinates.lng, coordinates.lat)
    }
}

impl FromStr for Coordinates {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lng, lat) = s.split_once(',').ok_or_else(invalid_input_error)?;

        let lng: f64 = lng.trim().parse().map_err(|_| invalid_input_error())?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid_input_error())?;

        if !(-180.0..=180.0).contains(&lng) || !(-90.0..=90.0).contains(&lat) {
            return Err(invalid_input_error());
        }

        Ok(Self { lng, lat })
    }
}

impl From<Coordinates> for Point<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Point::new(coordinates.lng, coordinates.lat)
    }
}

impl From<Point<f64>> for Coordinates {
    fn from(point: Point<f64>) -> Self {
        Self {
            lng: point.x(),
            lat: point.y(),
        }
    }
}

/// Country restriction and ranking bias applied to every geocoding lookup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeocodingScope {
    pub country: String,
    pub proximity: Coordinates,
}

impl Default for GeocodingScope {
    fn default() -> Self {
        Self {
            country: "SE".into(),
            proximity: Coordinates::STOCKHOLM,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaceQuery {
    pub text: String,
    pub country: String,
    pub proximity: Coordinates,
}

impl PlaceQuery {
    pub fn new(text: &str, scope: &GeocodingScope) -> Result<Self, Error> {
        let text = text.trim();

        if text.is_empty() {
            return Err(invalid_input_error());
        }

        Ok(Self {
            text: text.into(),
            country: scope.country.clone(),
            proximity: scope.proximity,
        })
    }
}

#[test]
fn coordinates_parse_lng_first() {
    let coordinates: Coordinates = "18.0686, 59.3293".parse().unwrap();
    assert_eq!(coordinates, Coordinates::STOCKHOLM);

    let s: String = coordinates.into();
    assert_eq!(s, "18.0686,59.3293");
}

#[test]
fn coordinates_reject_out_of_range() {
    assert!("59.3293,180.5".parse::<Coordinates>().is_err());
    assert!("18.0686".parse::<Coordinates>().is_err());
    assert!("east,north".parse::<Coordinates>().is_err());
}

#[test]
fn coordinates_convert_to_point() {
    let point: Point<f64> = Coordinates::STOCKHOLM.into();
    assert_eq!(point.x(), 18.0686);
    assert_eq!(point.y(), 59.3293);
    assert_eq!(Coordinates::from(point), Coordinates::STOCKHOLM);
}

#[test]
fn place_query_takes_scope_and_trims() {
    let query = PlaceQuery::new("  Bromma Blocks, Stockholm ", &GeocodingScope::default()).unwrap();

    assert_eq!(query.text, "Bromma Blocks, Stockholm");
    assert_eq!(query.country, "SE");
    assert_eq!(query.proximity, Coordinates::STOCKHOLM);
}

#[test]
fn place_query_rejects_blank_text() {
    assert!(PlaceQuery::new("   ", &GeocodingScope::default()).is_err());
}
