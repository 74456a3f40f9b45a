//! Core of the ultrasonic sweep radar.
//!
//! The acquisition side steps a servo-mounted range sensor across a 0–180°
//! arc and emits one `<angle>,<distance>` line per step. The display side
//! decodes those lines into a bounded trail and composes a polar scene for
//! the renderer every frame.

pub mod prelude;
pub mod receiver;
pub mod render;
pub mod sweep;
pub mod telemetry;
pub mod trail;
pub mod transport;
pub mod wire;

pub use prelude::{AlertConfig, RadarError, RadarResult, SweepConfig, TrailConfig};
pub use receiver::{DrainReport, TelemetryReceiver};
pub use render::{RadarLayout, RadarScene};
pub use sweep::{SweepContext, SweepController};
pub use trail::{TrailPoint, TrailStore};
pub use wire::{Distance, TelemetryRecord};
