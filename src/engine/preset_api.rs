use super::Engine;

use async_trait::async_trait;

use crate::{
    api::{DestinationAPI, PresetAPI},
    entities::{PresetRoute, PresetSelection, PLACEHOLDER},
    error::Error,
};

#[async_trait]
impl PresetAPI for Engine {
    fn list_presets(&self) -> Vec<PresetRoute> {
        self.presets.clone()
    }

    #[tracing::instrument(skip(self))]
    async fn select_preset(&self, name: String) -> Result<PresetSelection, Error> {
        let preset = self.presets.iter().find(|preset| preset.name == name);

        let preset = match preset {
            Some(preset) => preset,
            None => {
                let reload = !name.is_empty() && name != PLACEHOLDER;
                if reload {
                    tracing::warn!("unknown preset {:?}, clearing route", name);
                }

                self.reset().await;

                return Ok(PresetSelection {
                    name,
                    resolution: None,
                    reload,
                });
            }
        };

        let resolution = self.resolve_sequence(preset.places.clone()).await?;

        Ok(PresetSelection {
            name,
            resolution: Some(resolution),
            reload: true,
        })
    }
}

#[test]
fn lists_builtin_presets() {
    use super::testing::{recording_engine, ScriptedGeocoder};
    use std::sync::Arc;

    let (engine, _log) = recording_engine(Arc::new(ScriptedGeocoder::default()));

    let names: Vec<String> = engine.list_presets().into_iter().map(|p| p.name).collect();

    assert_eq!(names, vec!["Bil1".to_string(), "Bil2".to_string()]);
}

#[test]
fn preset_resolves_all_stops_and_requests_reload() {
    use super::testing::{coords, recording_engine, Answer, ScriptedGeocoder};
    use crate::{api::MapAPI, entities::Resolution};
    use std::sync::Arc;
    use tokio_test::block_on;

    let geocoder = Arc::new(
        ScriptedGeocoder::default()
            .answer("sturegatan 21, Stockholm", Answer::Found(coords(21.0)))
            .answer("sturegatan 31, Stockholm", Answer::Found(coords(31.0)))
            .answer("sturegatan 41, Stockholm", Answer::Found(coords(41.0)))
            .answer("sturegatan 44, Stockholm", Answer::Found(coords(44.0))),
    );
    let (engine, _log) = recording_engine(geocoder.clone());

    let selection = block_on(engine.select_preset("Bil2".into())).unwrap();

    assert!(selection.reload);
    assert_eq!(selection.resolution, Some(Resolution::Completed { resolved: 4 }));

    let plan = block_on(engine.snapshot()).plan;
    assert_eq!(plan.destination, Some(coords(21.0)));
    assert_eq!(plan.waypoints, vec![coords(31.0), coords(41.0), coords(44.0)]);
}

#[test]
fn placeholder_only_resets() {
    use super::testing::{coords, recording_engine, Answer, ScriptedGeocoder};
    use crate::api::MapAPI;
    use std::sync::Arc;
    use tokio_test::block_on;

    let geocoder = Arc::new(
        ScriptedGeocoder::default().answer("Odenplan", Answer::Found(coords(1.0))),
    );
    let (engine, _log) = recording_engine(geocoder.clone());

    block_on(engine.resolve_single("Odenplan".into())).unwrap();
    let selection = block_on(engine.select_preset(PLACEHOLDER.into())).unwrap();

    assert!(!selection.reload);
    assert_eq!(selection.resolution, None);
    assert_eq!(geocoder.requests().len(), 1);

    let snapshot = block_on(engine.snapshot());
    assert_eq!(snapshot.plan.destination, None);
    assert!(snapshot.markers.is_empty());
}

#[test]
fn unknown_preset_resets_and_reloads() {
    use super::testing::{coords, recording_engine, Answer, ScriptedGeocoder};
    use crate::api::MapAPI;
    use std::sync::Arc;
    use tokio_test::block_on;

    let geocoder = Arc::new(
        ScriptedGeocoder::default().answer("Odenplan", Answer::Found(coords(1.0))),
    );
    let (engine, _log) = recording_engine(geocoder.clone());

    block_on(engine.resolve_single("Odenplan".into())).unwrap();
    let selection = block_on(engine.select_preset("Bil9".into())).unwrap();

    assert!(selection.reload);
    assert_eq!(selection.resolution, None);
    assert_eq!(geocoder.requests().len(), 1);
    assert_eq!(block_on(engine.snapshot()).plan.destination, None);
}

#[test]
fn empty_name_does_not_reload() {
    use super::testing::{recording_engine, ScriptedGeocoder};
    use std::sync::Arc;
    use tokio_test::block_on;

    let (engine, _log) = recording_engine(Arc::new(ScriptedGeocoder::default()));

    let selection = block_on(engine.select_preset(String::new())).unwrap();

    assert!(!selection.reload);
}
