use super::Engine;

use async_channel::Receiver;
use async_trait::async_trait;

use crate::{
    api::PositionAPI,
    entities::{Coordinates, PositionReport, TrackerOptions},
};

#[async_trait]
impl PositionAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn report_position(&self, report: PositionReport) {
        let mut session = self.session.lock().await;

        match report {
            PositionReport::Fix(fix) => {
                if !session.apply_fix(fix.coordinates, fix.timestamp) {
                    tracing::debug!("ignoring out of order fix from {}", fix.timestamp);
                }
            }
            PositionReport::Failure { reason } => {
                tracing::warn!("position unavailable: {}", reason);

                session.apply_fallback(self.fallback_location);
                tracing::info!("using fallback origin {:?}", self.fallback_location);
            }
        }
    }

    async fn current_origin(&self) -> Option<Coordinates> {
        self.session.lock().await.origin()
    }

    fn tracker_options(&self) -> TrackerOptions {
        self.tracker.clone()
    }
}

impl Engine {
    /// Applies reports from `reports` until every sender is gone. Silence
    /// longer than the tracker timeout counts as one failure.
    #[tracing::instrument(skip_all)]
    pub async fn track(&self, reports: Receiver<PositionReport>) {
        let timeout = self.tracker.timeout();
        let mut timed_out = false;

        loop {
            match tokio::time::timeout(timeout, reports.recv()).await {
                Ok(Ok(report)) => {
                    timed_out = false;
                    self.report_position(report).await;
                }
                Ok(Err(_)) => {
                    tracing::info!("position channel closed, tracker stopping");
                    break;
                }
                Err(_) if !timed_out => {
                    timed_out = true;
                    self.report_position(PositionReport::Failure {
                        reason: format!("no position within {:?}", timeout),
                    })
                    .await;
                }
                Err(_) => {}
            }
        }
    }
}

#[test]
fn first_fix_places_user_marker_and_origin() {
    use super::testing::{calls, coords, recording_engine, Call, ScriptedGeocoder};
    use crate::entities::{MarkerColor, PositionFix};
    use std::sync::Arc;
    use tokio_test::block_on;

    let (engine, log) = recording_engine(Arc::new(ScriptedGeocoder::default()));

    block_on(engine.report_position(PositionReport::Fix(PositionFix::now(coords(1.0)))));
    block_on(engine.report_position(PositionReport::Fix(PositionFix::now(coords(2.0)))));

    assert_eq!(
        calls(&log),
        vec![
            Call::AddMarker(coords(1.0), MarkerColor::Blue),
            Call::SetOrigin(coords(1.0)),
            Call::MoveMarker(coords(2.0)),
            Call::SetOrigin(coords(2.0)),
        ]
    );
    assert_eq!(block_on(engine.current_origin()), Some(coords(2.0)));
}

#[test]
fn older_fix_is_ignored() {
    use super::testing::{coords, recording_engine, ScriptedGeocoder};
    use crate::entities::PositionFix;
    use chrono::{Duration, Utc};
    use std::sync::Arc;
    use tokio_test::block_on;

    let (engine, _log) = recording_engine(Arc::new(ScriptedGeocoder::default()));
    let now = Utc::now();

    block_on(engine.report_position(PositionReport::Fix(PositionFix {
        coordinates: coords(1.0),
        accuracy: Some(5.0),
        timestamp: now,
    })));
    block_on(engine.report_position(PositionReport::Fix(PositionFix {
        coordinates: coords(2.0),
        accuracy: Some(5.0),
        timestamp: now - Duration::seconds(3),
    })));

    assert_eq!(block_on(engine.current_origin()), Some(coords(1.0)));
}

#[test]
fn failure_before_first_fix_uses_fallback() {
    use super::testing::{recording_engine, ScriptedGeocoder};
    use crate::api::MapAPI;
    use std::sync::Arc;
    use tokio_test::block_on;

    let (engine, _log) = recording_engine(Arc::new(ScriptedGeocoder::default()));

    block_on(engine.report_position(PositionReport::Failure {
        reason: "permission denied".into(),
    }));

    assert_eq!(block_on(engine.current_origin()), Some(Coordinates::STOCKHOLM));
    assert!(block_on(engine.snapshot()).markers.is_empty());
}

#[test]
fn failure_after_fix_falls_back_and_keeps_user_marker() {
    use super::testing::{calls, coords, recording_engine, Call, ScriptedGeocoder};
    use crate::api::MapAPI;
    use crate::entities::{MarkerColor, PositionFix};
    use std::sync::Arc;
    use tokio_test::block_on;

    let (engine, log) = recording_engine(Arc::new(ScriptedGeocoder::default()));

    block_on(engine.report_position(PositionReport::Fix(PositionFix::now(coords(1.0)))));
    block_on(engine.report_position(PositionReport::Failure {
        reason: "timeout".into(),
    }));

    assert_eq!(block_on(engine.current_origin()), Some(Coordinates::STOCKHOLM));
    assert_eq!(
        calls(&log),
        vec![
            Call::AddMarker(coords(1.0), MarkerColor::Blue),
            Call::SetOrigin(coords(1.0)),
            Call::SetOrigin(Coordinates::STOCKHOLM),
        ]
    );

    let markers = block_on(engine.snapshot()).markers;
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].coordinates, coords(1.0));
}

#[test]
fn fix_after_fallback_replaces_origin() {
    use super::testing::{coords, recording_engine, ScriptedGeocoder};
    use crate::api::MapAPI;
    use crate::entities::PositionFix;
    use std::sync::Arc;
    use tokio_test::block_on;

    let (engine, _log) = recording_engine(Arc::new(ScriptedGeocoder::default()));

    block_on(engine.report_position(PositionReport::Failure {
        reason: "timeout".into(),
    }));
    block_on(engine.report_position(PositionReport::Fix(PositionFix::now(coords(1.0)))));

    assert_eq!(block_on(engine.current_origin()), Some(coords(1.0)));
    assert_eq!(block_on(engine.snapshot()).markers.len(), 1);
}

#[test]
fn tracker_applies_reports_until_closed() {
    use super::testing::{coords, recording_engine, ScriptedGeocoder};
    use crate::entities::PositionFix;
    use std::sync::Arc;
    use tokio_test::block_on;

    let (engine, _log) = recording_engine(Arc::new(ScriptedGeocoder::default()));
    let (tx, rx) = async_channel::unbounded();

    block_on(async {
        tx.send(PositionReport::Fix(PositionFix::now(coords(1.0))))
            .await
            .unwrap();
        drop(tx);

        engine.track(rx).await;
    });

    assert_eq!(block_on(engine.current_origin()), Some(coords(1.0)));
}

#[test]
fn tracker_falls_back_when_silent() {
    use super::testing::{recording_engine, ScriptedGeocoder};
    use std::{sync::Arc, time::Duration};
    use tokio_test::block_on;

    let (mut engine, _log) = recording_engine(Arc::new(ScriptedGeocoder::default()));
    engine.tracker.timeout_ms = 20;

    let (tx, rx) = async_channel::unbounded::<PositionReport>();

    block_on(async {
        let closer = async {
            tokio::time::sleep(Duration::from_millis(60)).await;
            drop(tx);
        };

        futures::join!(engine.track(rx), closer);
    });

    assert_eq!(block_on(engine.current_origin()), Some(Coordinates::STOCKHOLM));
}
