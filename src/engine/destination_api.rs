use super::Engine;

use async_trait::async_trait;

use crate::{
    api::DestinationAPI,
    entities::{HaltReason, PlaceQuery, Resolution},
    error::{invalid_input_error, Error},
};

#[async_trait]
impl DestinationAPI for Engine {
    /// Geocodes `places` one at a time, in order. The first resolved place
    /// becomes the terminal destination and each later one a waypoint in
    /// front of it. A miss or lookup failure ends the run without undoing
    /// what was already applied.
    #[tracing::instrument(skip(self))]
    async fn resolve_sequence(&self, places: Vec<String>) -> Result<Resolution, Error> {
        if places.is_empty() {
            return Err(invalid_input_error());
        }

        let queries = places
            .iter()
            .map(|place| PlaceQuery::new(place, &self.scope))
            .collect::<Result<Vec<_>, _>>()?;

        let generation = self.session.lock().await.reset();

        for (index, query) in queries.iter().enumerate() {
            let outcome = self.geocoder.forward(query).await;

            let mut session = self.session.lock().await;

            if !session.is_current(generation) {
                tracing::warn!(
                    "destination run superseded at {} ({:?}), discarding",
                    index,
                    query.text
                );
                return Ok(Resolution::Superseded { index });
            }

            let coordinates = match outcome {
                Ok(candidates) => match candidates.first() {
                    Some(&coordinates) => coordinates,
                    None => {
                        tracing::info!("address not found: {:?}", query.text);
                        return Ok(Resolution::Halted {
                            index,
                            reason: HaltReason::NotFound,
                        });
                    }
                },
                Err(err) => {
                    tracing::error!("geocoding {:?} failed: {}", query.text, err);
                    return Ok(Resolution::Halted {
                        index,
                        reason: HaltReason::Failed {
                            message: err.message,
                        },
                    });
                }
            };

            session.apply_destination(index, coordinates);
        }

        Ok(Resolution::Completed {
            resolved: queries.len(),
        })
    }

    #[tracing::instrument(skip(self))]
    async fn resolve_single(&self, place: String) -> Result<Resolution, Error> {
        self.resolve_sequence(vec![place]).await
    }

    #[tracing::instrument(skip(self))]
    async fn reset(&self) {
        self.session.lock().await.reset();
    }
}

#[cfg(test)]
fn places(names: &[&str]) -> Vec<String> {
    names.iter().map(|&name| name.into()).collect()
}

#[cfg(test)]
fn route_calls(log: &[super::testing::Call]) -> Vec<super::testing::Call> {
    use super::testing::Call;

    log.iter()
        .filter(|call| {
            !matches!(
                call,
                Call::SetDestination(None) | Call::RemoveMarker | Call::SetOrigin(_)
            )
        })
        .cloned()
        .collect()
}

#[test]
fn three_places_apply_in_order() {
    use super::testing::{calls, coords, recording_engine, Answer, Call, ScriptedGeocoder};
    use crate::{api::MapAPI, entities::MarkerColor};
    use std::sync::Arc;
    use tokio_test::block_on;

    let geocoder = Arc::new(
        ScriptedGeocoder::default()
            .answer("A", Answer::Found(coords(1.0)))
            .answer("B", Answer::Found(coords(2.0)))
            .answer("C", Answer::Found(coords(3.0))),
    );
    let (engine, log) = recording_engine(geocoder.clone());

    let resolution = block_on(engine.resolve_sequence(places(&["A", "B", "C"]))).unwrap();

    assert_eq!(resolution, Resolution::Completed { resolved: 3 });
    assert_eq!(
        route_calls(&calls(&log)),
        vec![
            Call::SetDestination(Some(coords(1.0))),
            Call::AddMarker(coords(1.0), MarkerColor::Green),
            Call::AddWaypoint(0, coords(2.0)),
            Call::AddMarker(coords(2.0), MarkerColor::Green),
            Call::AddWaypoint(1, coords(3.0)),
            Call::AddMarker(coords(3.0), MarkerColor::Green),
        ]
    );
    assert_eq!(geocoder.requests(), places(&["A", "B", "C"]));

    let snapshot = block_on(engine.snapshot());
    assert_eq!(snapshot.plan.destination, Some(coords(1.0)));
    assert_eq!(snapshot.plan.waypoints, vec![coords(2.0), coords(3.0)]);
}

#[test]
fn miss_halts_without_waypoint() {
    use super::testing::{calls, coords, recording_engine, Answer, Call, ScriptedGeocoder};
    use crate::{api::MapAPI, entities::MarkerColor};
    use std::sync::Arc;
    use tokio_test::block_on;

    let geocoder = Arc::new(
        ScriptedGeocoder::default()
            .answer("A", Answer::Found(coords(1.0)))
            .answer("B", Answer::Miss)
            .answer("C", Answer::Found(coords(3.0))),
    );
    let (engine, log) = recording_engine(geocoder.clone());

    let resolution = block_on(engine.resolve_sequence(places(&["A", "B", "C"]))).unwrap();

    assert_eq!(
        resolution,
        Resolution::Halted {
            index: 1,
            reason: HaltReason::NotFound
        }
    );
    assert_eq!(
        route_calls(&calls(&log)),
        vec![
            Call::SetDestination(Some(coords(1.0))),
            Call::AddMarker(coords(1.0), MarkerColor::Green),
        ]
    );
    assert_eq!(geocoder.requests(), places(&["A", "B"]));
    assert_eq!(block_on(engine.snapshot()).markers.len(), 1);
}

#[test]
fn second_of_two_missing_sets_only_the_destination() {
    use super::testing::{calls, coords, recording_engine, Answer, Call, ScriptedGeocoder};
    use crate::entities::MarkerColor;
    use std::sync::Arc;
    use tokio_test::block_on;

    let geocoder = Arc::new(
        ScriptedGeocoder::default()
            .answer("A", Answer::Found(coords(1.0)))
            .answer("B", Answer::Miss),
    );
    let (engine, log) = recording_engine(geocoder);

    block_on(engine.resolve_sequence(places(&["A", "B"]))).unwrap();

    let log = calls(&log);
    assert!(!log.iter().any(|call| matches!(call, Call::AddWaypoint(..))));
    assert_eq!(
        route_calls(&log),
        vec![
            Call::SetDestination(Some(coords(1.0))),
            Call::AddMarker(coords(1.0), MarkerColor::Green),
        ]
    );
}

#[test]
fn failure_halts_and_keeps_applied_places() {
    use super::testing::{coords, recording_engine, Answer, ScriptedGeocoder};
    use crate::api::MapAPI;
    use std::sync::Arc;
    use tokio_test::block_on;

    let geocoder = Arc::new(
        ScriptedGeocoder::default()
            .answer("A", Answer::Found(coords(1.0)))
            .answer("B", Answer::Found(coords(2.0)))
            .answer("C", Answer::Fail),
    );
    let (engine, _log) = recording_engine(geocoder);

    let resolution = block_on(engine.resolve_sequence(places(&["A", "B", "C", "D"]))).unwrap();

    assert!(matches!(
        resolution,
        Resolution::Halted {
            index: 2,
            reason: HaltReason::Failed { .. }
        }
    ));
    assert_eq!(resolution.applied(), 2);

    let snapshot = block_on(engine.snapshot());
    assert_eq!(snapshot.plan.destination, Some(coords(1.0)));
    assert_eq!(snapshot.plan.waypoints, vec![coords(2.0)]);
    assert_eq!(snapshot.markers.len(), 2);
}

#[test]
fn first_place_miss_applies_nothing() {
    use super::testing::{calls, recording_engine, Answer, ScriptedGeocoder};
    use std::sync::Arc;
    use tokio_test::block_on;

    let geocoder = Arc::new(ScriptedGeocoder::default().answer("A", Answer::Miss));
    let (engine, log) = recording_engine(geocoder);

    let resolution = block_on(engine.resolve_sequence(places(&["A", "B"]))).unwrap();

    assert_eq!(resolution.applied(), 0);
    assert!(route_calls(&calls(&log)).is_empty());
}

#[test]
fn lookups_never_overlap() {
    use super::testing::{coords, recording_engine, Answer, ScriptedGeocoder};
    use crate::api::MapAPI;
    use std::{sync::Arc, time::Duration};
    use tokio_test::block_on;

    let geocoder = Arc::new(
        ScriptedGeocoder::default()
            .answer_after("A", Answer::Found(coords(1.0)), Duration::from_millis(30))
            .answer_after("B", Answer::Found(coords(2.0)), Duration::from_millis(1))
            .answer_after("C", Answer::Found(coords(3.0)), Duration::from_millis(15)),
    );
    let (engine, _log) = recording_engine(geocoder.clone());

    let resolution = block_on(engine.resolve_sequence(places(&["A", "B", "C"]))).unwrap();

    assert_eq!(resolution, Resolution::Completed { resolved: 3 });
    assert_eq!(geocoder.max_in_flight(), 1);

    let snapshot = block_on(engine.snapshot());
    assert_eq!(snapshot.plan.waypoints, vec![coords(2.0), coords(3.0)]);
}

#[test]
fn empty_sequence_is_rejected_before_touching_the_route() {
    use super::testing::{calls, recording_engine, ScriptedGeocoder};
    use std::sync::Arc;
    use tokio_test::block_on;

    let (engine, log) = recording_engine(Arc::new(ScriptedGeocoder::default()));

    let err = block_on(engine.resolve_sequence(vec![])).unwrap_err();

    assert_eq!(err.code, 101);
    assert!(calls(&log).is_empty());
}

#[test]
fn blank_place_is_rejected_before_touching_the_route() {
    use super::testing::{calls, recording_engine, ScriptedGeocoder};
    use std::sync::Arc;
    use tokio_test::block_on;

    let (engine, log) = recording_engine(Arc::new(ScriptedGeocoder::default()));

    let err = block_on(engine.resolve_sequence(places(&["A", "  "]))).unwrap_err();

    assert_eq!(err.code, 101);
    assert!(calls(&log).is_empty());
}

#[test]
fn resolve_single_twice_leaves_one_marker() {
    use super::testing::{calls, coords, recording_engine, Answer, Call, ScriptedGeocoder};
    use crate::api::MapAPI;
    use std::sync::Arc;
    use tokio_test::block_on;

    let geocoder =
        Arc::new(ScriptedGeocoder::default().answer("Odenplan", Answer::Found(coords(4.0))));
    let (engine, log) = recording_engine(geocoder);

    block_on(engine.resolve_single("Odenplan".into())).unwrap();
    block_on(engine.resolve_single("Odenplan".into())).unwrap();

    let snapshot = block_on(engine.snapshot());
    assert_eq!(snapshot.markers.len(), 1);
    assert_eq!(snapshot.plan.destination, Some(coords(4.0)));
    assert!(snapshot.plan.waypoints.is_empty());

    let removals = calls(&log)
        .into_iter()
        .filter(|call| *call == Call::RemoveMarker)
        .count();
    assert_eq!(removals, 1);
}

#[test]
fn new_run_clears_previous_waypoints_and_markers() {
    use super::testing::{coords, recording_engine, Answer, ScriptedGeocoder};
    use crate::api::MapAPI;
    use std::sync::Arc;
    use tokio_test::block_on;

    let geocoder = Arc::new(
        ScriptedGeocoder::default()
            .answer("A", Answer::Found(coords(1.0)))
            .answer("B", Answer::Found(coords(2.0)))
            .answer("C", Answer::Found(coords(3.0))),
    );
    let (engine, _log) = recording_engine(geocoder);

    block_on(engine.resolve_sequence(places(&["A", "B"]))).unwrap();
    block_on(engine.resolve_single("C".into())).unwrap();

    let snapshot = block_on(engine.snapshot());
    assert_eq!(snapshot.plan.destination, Some(coords(3.0)));
    assert!(snapshot.plan.waypoints.is_empty());
    assert_eq!(snapshot.markers.len(), 1);
}

#[test]
fn superseded_run_applies_nothing_more() {
    use super::testing::{coords, recording_engine, Answer, ScriptedGeocoder};
    use crate::api::MapAPI;
    use std::{sync::Arc, time::Duration};
    use tokio_test::block_on;

    let geocoder = Arc::new(
        ScriptedGeocoder::default()
            .answer("slow", Answer::Found(coords(1.0)))
            .answer_after("slower", Answer::Found(coords(2.0)), Duration::from_millis(50))
            .answer("fast", Answer::Found(coords(3.0))),
    );
    let (engine, _log) = recording_engine(geocoder);

    let (stale, fresh) = block_on(async {
        let stale = engine.resolve_sequence(places(&["slow", "slower"]));
        let fresh = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            engine.resolve_single("fast".into()).await
        };

        futures::join!(stale, fresh)
    });

    assert_eq!(stale.unwrap(), Resolution::Superseded { index: 1 });
    assert_eq!(fresh.unwrap(), Resolution::Completed { resolved: 1 });

    let snapshot = block_on(engine.snapshot());
    assert_eq!(snapshot.plan.destination, Some(coords(3.0)));
    assert!(snapshot.plan.waypoints.is_empty());
    assert_eq!(snapshot.markers.len(), 1);
}

#[test]
fn reset_clears_destinations() {
    use super::testing::{coords, recording_engine, Answer, ScriptedGeocoder};
    use crate::api::MapAPI;
    use std::sync::Arc;
    use tokio_test::block_on;

    let geocoder = Arc::new(ScriptedGeocoder::default().answer("A", Answer::Found(coords(1.0))));
    let (engine, _log) = recording_engine(geocoder);

    block_on(engine.resolve_single("A".into())).unwrap();
    block_on(engine.reset());

    let snapshot = block_on(engine.snapshot());
    assert_eq!(snapshot.plan.destination, None);
    assert!(snapshot.markers.is_empty());
}
