//! Point-to-point line transports between the sweep head and the display.

pub mod assembler;
pub mod serial;
pub mod stream;

use crate::prelude::RadarResult;

pub use assembler::LineAssembler;
pub use serial::{
    open_port, open_sink_port, SerialLineSource, DEFAULT_BAUD_RATE, READ_TIMEOUT, WRITE_TIMEOUT,
};
pub use stream::{ReaderThreadSource, WriterSink};

/// Producer end of the link.
pub trait LineSink {
    /// Writes one encoded record. `line` carries its own terminator.
    fn write_line(&mut self, line: &str) -> RadarResult<()>;
}

/// Consumer end of the link. Never blocks.
pub trait LineSource {
    /// Returns the next complete line without its terminator, or `None`
    /// when nothing complete has arrived yet.
    fn try_read_line(&mut self) -> RadarResult<Option<String>>;
}
