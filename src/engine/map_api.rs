use super::Engine;

use async_trait::async_trait;

use crate::{api::MapAPI, entities::MapSnapshot, error::Error};

#[async_trait]
impl MapAPI for Engine {
    async fn snapshot(&self) -> MapSnapshot {
        self.session.lock().await.snapshot()
    }

    #[tracing::instrument(skip(self))]
    async fn directions(&self) -> Result<serde_json::Value, Error> {
        let plan = self.session.lock().await.snapshot().plan;

        self.directions.directions(&plan).await
    }
}

#[test]
fn directions_use_current_plan() {
    use super::testing::{coords, recording_engine, Answer, ScriptedGeocoder};
    use crate::api::{DestinationAPI, PositionAPI};
    use crate::entities::{PositionFix, PositionReport};
    use std::sync::Arc;
    use tokio_test::block_on;

    let geocoder = Arc::new(
        ScriptedGeocoder::default()
            .answer("A", Answer::Found(coords(1.0)))
            .answer("B", Answer::Found(coords(2.0))),
    );
    let (engine, _log) = recording_engine(geocoder);

    block_on(engine.report_position(PositionReport::Fix(PositionFix::now(coords(0.0)))));
    block_on(engine.resolve_sequence(vec!["A".into(), "B".into()])).unwrap();

    let routes = block_on(engine.directions()).unwrap();
    assert_eq!(routes[0]["stops"], 3);
}
