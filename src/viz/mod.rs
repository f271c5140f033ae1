//! Presentation helpers: soil-property maps and importance charts.
//!
//! Both return plain handles (`SoilMap`, `ImportanceChart`) that the
//! viewer draws with egui and that can be written out as PNG.

pub mod color;
pub mod importance;
pub mod map;

pub use importance::{render_importance, ImportanceChart};
pub use map::{plot_soil_map, render_map, SoilMap};
