use std::io::{self, BufReader};
use sweepcore::transport::{LineSource, ReaderThreadSource, SerialLineSource};
use sweepcore::RadarResult;

/// The telemetry input chosen on the command line.
pub enum Link {
    Serial(SerialLineSource),
    Stream(ReaderThreadSource),
}

impl Link {
    /// Opens `port` when given, otherwise follows stdin.
    pub fn open(port: Option<&str>, baud_rate: u32) -> RadarResult<Self> {
        match port {
            Some(port_name) => Ok(Link::Serial(SerialLineSource::open(port_name, baud_rate)?)),
            None => Ok(Link::Stream(ReaderThreadSource::spawn(BufReader::new(io::stdin()))?)),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Link::Serial(_) => "serial",
            Link::Stream(_) => "stdin",
        }
    }
}

impl LineSource for Link {
    fn try_read_line(&mut self) -> RadarResult<Option<String>> {
        match self {
            Link::Serial(source) => source.try_read_line(),
            Link::Stream(source) => source.try_read_line(),
        }
    }
}
