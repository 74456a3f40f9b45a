//! Line-oriented wire format shared by the sweep head and the display host.

pub mod codec;
pub mod record;

pub use codec::{decode, encode, NO_ECHO_WIRE_VALUE};
pub use record::{Distance, TelemetryRecord, MAX_ANGLE_DEGREES};
