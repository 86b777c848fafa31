pub mod destinations;
pub mod map;
pub mod position;
pub mod presets;
pub mod voice;
