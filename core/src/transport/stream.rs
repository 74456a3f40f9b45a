use crate::prelude::{RadarError, RadarResult};
use crate::transport::{LineSink, LineSource};
use log::debug;
use std::io::{BufRead, ErrorKind, Write};
use std::sync::mpsc;
use std::thread;

/// Writes encoded lines to any byte sink (stdout, an opened serial port).
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LineSink for WriterSink<W> {
    fn write_line(&mut self, line: &str) -> RadarResult<()> {
        let result = self
            .writer
            .write_all(line.as_bytes())
            .and_then(|_| self.writer.flush());
        match result {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                Err(RadarError::TransportClosed(err.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Reads a blocking stream (typically a stdin pipe) on a helper thread and
/// hands complete lines over a channel so polling never blocks.
pub struct ReaderThreadSource {
    lines_rx: mpsc::Receiver<String>,
}

impl ReaderThreadSource {
    pub fn spawn<R>(reader: R) -> RadarResult<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (lines_tx, lines_rx) = mpsc::sync_channel::<String>(256);
        thread::Builder::new()
            .name("line-reader".into())
            .spawn(move || forward_lines(reader, lines_tx))?;
        Ok(Self { lines_rx })
    }
}

/// Forwards lines until EOF or a read error. Bytes that are not UTF-8 are
/// replaced rather than treated as a hang-up, so the decoder rejects that
/// line alone.
fn forward_lines<R: BufRead>(mut reader: R, lines_tx: mpsc::SyncSender<String>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return,
            Ok(_) => {
                while matches!(buf.last(), Some(b'\n' | b'\r')) {
                    buf.pop();
                }
                let line = String::from_utf8_lossy(&buf).into_owned();
                if lines_tx.send(line).is_err() {
                    return;
                }
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => {
                debug!("line reader stopped: {}", err);
                return;
            }
        }
    }
}

impl LineSource for ReaderThreadSource {
    fn try_read_line(&mut self) -> RadarResult<Option<String>> {
        match self.lines_rx.try_recv() {
            Ok(line) => Ok(Some(line)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => {
                Err(RadarError::TransportClosed("input stream ended".into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::{Duration, Instant};

    fn next_event(source: &mut ReaderThreadSource) -> RadarResult<Option<String>> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            match source.try_read_line() {
                Ok(None) if Instant::now() < deadline => thread::sleep(Duration::from_millis(1)),
                other => return other,
            }
        }
    }

    #[test]
    fn writer_sink_passes_lines_through() {
        let mut sink = WriterSink::new(Vec::new());
        sink.write_line("0,13.47\n").unwrap();
        sink.write_line("2,13.50\n").unwrap();
        assert_eq!(sink.into_inner(), b"0,13.47\n2,13.50\n");
    }

    #[test]
    fn reader_thread_delivers_lines_then_reports_closure() {
        let input = Cursor::new(b"10,5.00\r\n20,25.00\n".to_vec());
        let mut source = ReaderThreadSource::spawn(input).unwrap();

        assert_eq!(next_event(&mut source).unwrap().as_deref(), Some("10,5.00"));
        assert_eq!(next_event(&mut source).unwrap().as_deref(), Some("20,25.00"));
        assert!(matches!(
            next_event(&mut source),
            Err(RadarError::TransportClosed(_))
        ));
    }

    #[test]
    fn invalid_utf8_line_does_not_close_the_stream() {
        let input = Cursor::new(b"10,5.00\n\xff\xfe,1.00\n20,6.00\n".to_vec());
        let mut source = ReaderThreadSource::spawn(input).unwrap();

        assert_eq!(next_event(&mut source).unwrap().as_deref(), Some("10,5.00"));
        let garbled = next_event(&mut source).unwrap().unwrap();
        assert!(garbled.ends_with(",1.00"));
        assert!(crate::wire::decode(&garbled).is_err());
        assert_eq!(next_event(&mut source).unwrap().as_deref(), Some("20,6.00"));
        assert!(matches!(
            next_event(&mut source),
            Err(RadarError::TransportClosed(_))
        ));
    }
}
