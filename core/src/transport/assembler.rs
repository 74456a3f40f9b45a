use log::warn;

/// Longest line kept while waiting for a terminator.
const MAX_PENDING_BYTES: usize = 1024;

/// Reassembles newline-terminated lines from arbitrary read chunks.
#[derive(Debug, Default)]
pub struct LineAssembler {
    pending: Vec<u8>,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
        if self.pending.len() > MAX_PENDING_BYTES && !self.pending.contains(&b'\n') {
            warn!(
                "discarding {} bytes received without a line terminator",
                self.pending.len()
            );
            self.pending.clear();
        }
    }

    /// Pops the oldest complete line, with `\r\n` or `\n` removed.
    pub fn next_line(&mut self) -> Option<String> {
        let end = self.pending.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.pending.drain(..=end).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
