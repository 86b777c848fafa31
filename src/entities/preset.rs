use serde::{Deserialize, Serialize};

/// Dropdown value meaning "no preset chosen".
pub const PLACEHOLDER: &str = "Välj";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PresetRoute {
    pub name: String,
    pub places: Vec<String>,
}

impl PresetRoute {
    pub fn new(name: &str, places: &[&str]) -> Self {
        Self {
            name: name.into(),
            places: places.iter().map(|&place| place.into()).collect(),
        }
    }
}

pub fn builtin_presets() -> Vec<PresetRoute> {
    vec![
        PresetRoute::new(
            "Bil1",
            &[
                "bälstavägen 36, Stockholm",
                "Bromma Blocks, Stockholm",
                "karlsbodavägen 56, Stockholm",
                "Willys Esplanaden, Stockholm",
            ],
        ),
        PresetRoute::new(
            "Bil2",
            &[
                "sturegatan 21, Stockholm",
                "sturegatan 31, Stockholm",
                "sturegatan 41, Stockholm",
                "sturegatan 44, Stockholm",
            ],
        ),
    ]
}

/// Outcome of picking an entry in the preset dropdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PresetSelection {
    pub name: String,
    pub resolution: Option<crate::entities::Resolution>,
    /// The client reloads the page after any choice other than the
    /// placeholder, including names with no matching preset.
    pub reload: bool,
}

#[test]
fn builtin_presets_have_four_stops() {
    let presets = builtin_presets();

    assert_eq!(presets.len(), 2);
    assert!(presets.iter().all(|preset| preset.places.len() == 4));
    assert_eq!(presets[0].places[1], "Bromma Blocks, Stockholm");
}
