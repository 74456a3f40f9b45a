//! Display side: turns the trail into a drawable radar scene.

pub mod layout;
pub mod scene;

pub use layout::{RadarLayout, ScreenPoint, MAX_RANGE_RINGS};
pub use scene::{
    trail_alpha, Gridline, Label, Marker, RadarScene, RangeRing, StatusText, TrailBeam,
};
