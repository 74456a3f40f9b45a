//! Acquisition side: sweep state machine, sensor timing and actuator mapping.

pub mod controller;
pub mod intensity;
pub mod ranging;
pub mod servo;
pub mod state;

pub use controller::{AuxOutput, StatusDisplay, SweepContext, SweepController};
pub use intensity::derive_aux_intensity;
pub use ranging::{EchoPins, EchoRanger, EchoTiming, RangingDriver};
pub use servo::{angle_to_duty, Actuator, PwmChannel, PwmServo};
pub use state::{Direction, SweepState};
