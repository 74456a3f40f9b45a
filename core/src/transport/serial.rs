use crate::prelude::{RadarError, RadarResult};
use crate::transport::{LineAssembler, LineSource};
use serialport::SerialPort;
use std::io::{ErrorKind, Read};
use std::time::Duration;

pub const DEFAULT_BAUD_RATE: u32 = 115_200;
/// Reads poll once per frame and must never stall it.
pub const READ_TIMEOUT: Duration = Duration::from_millis(10);
/// Writes may wait out a slow or briefly stalled receiver.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(2);

fn open_with_timeout(
    port_name: &str,
    baud_rate: u32,
    timeout: Duration,
) -> RadarResult<Box<dyn SerialPort>> {
    let port = serialport::new(port_name, baud_rate)
        .timeout(timeout)
        .open()?;
    Ok(port)
}

/// Opens `port_name` for polling reads.
pub fn open_port(port_name: &str, baud_rate: u32) -> RadarResult<Box<dyn SerialPort>> {
    open_with_timeout(port_name, baud_rate, READ_TIMEOUT)
}

/// Opens `port_name` for the telemetry producer.
pub fn open_sink_port(port_name: &str, baud_rate: u32) -> RadarResult<Box<dyn SerialPort>> {
    open_with_timeout(port_name, baud_rate, WRITE_TIMEOUT)
}

/// Non-blocking line reader over a serial port.
pub struct SerialLineSource {
    port: Box<dyn SerialPort>,
    assembler: LineAssembler,
}

impl SerialLineSource {
    pub fn new(port: Box<dyn SerialPort>) -> Self {
        Self {
            port,
            assembler: LineAssembler::new(),
        }
    }

    pub fn open(port_name: &str, baud_rate: u32) -> RadarResult<Self> {
        Ok(Self::new(open_port(port_name, baud_rate)?))
    }

    fn bytes_available(&mut self) -> RadarResult<usize> {
        let n = self
            .port
            .bytes_to_read()
            .map_err(|err| RadarError::TransportClosed(err.to_string()))?;
        Ok(n.try_into().unwrap_or(0))
    }
}

impl LineSource for SerialLineSource {
    fn try_read_line(&mut self) -> RadarResult<Option<String>> {
        if let Some(line) = self.assembler.next_line() {
            return Ok(Some(line));
        }

        let n_read = self.bytes_available()?;
        if n_read == 0 {
            return Ok(None);
        }

        let mut chunk = vec![0u8; n_read];
        match self.port.read(chunk.as_mut_slice()) {
            Ok(0) => return Err(RadarError::TransportClosed("serial port hung up".into())),
            Ok(n) => self.assembler.push(&chunk[..n]),
            Err(err) if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {}
            Err(err) => return Err(RadarError::TransportClosed(err.to_string())),
        }
        Ok(self.assembler.next_line())
    }
}
