use crate::config::CommandConfig;
use embassy_time::{Duration, Timer, with_timeout};
use embedded_io_async::Read;
use heapless::Vec;

/// Longest command line kept. Longer lines are dropped up to their terminator.
pub const MAX_LINE_LEN: usize = 64;

/// Accumulates bytes into newline-terminated lines and checks each finished
/// line against a token.
pub struct LineAssembler<const N: usize> {
    line: Vec<u8, N>,
    overflowed: bool,
}

impl<const N: usize> LineAssembler<N> {
    pub const fn new() -> Self {
        Self {
            line: Vec::new(),
            overflowed: false,
        }
    }

    /// Feeds one byte. Returns `true` when the byte terminates a line that
    /// equals `token` once surrounding whitespace is stripped. The line is
    /// discarded at every terminator, matched or not.
    pub fn feed(&mut self, byte: u8, token: &[u8]) -> bool {
        if byte == b'\n' {
            let matched = !self.overflowed && self.line.trim_ascii() == token;
            self.clear();
            return matched;
        }

        if !self.overflowed && self.line.push(byte).is_err() {
            self.overflowed = true;
            self.line.clear();
        }
        false
    }

    pub fn clear(&mut self) {
        self.line.clear();
        self.overflowed = false;
    }

    /// Bytes of the current unterminated line
    pub fn pending(&self) -> &[u8] {
        &self.line
    }
}

impl<const N: usize> Default for LineAssembler<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Listens on the command link for the trigger line.
pub struct CommandRecognizer<R> {
    reader: R,
    token: &'static str,
    poll_interval: Duration,
}

impl<R: Read> CommandRecognizer<R> {
    pub fn new(reader: R, config: &CommandConfig) -> Self {
        Self {
            reader,
            token: config.token,
            poll_interval: config.poll_interval,
        }
    }

    /// Waits up to `timeout` for a complete trigger line.
    ///
    /// Every call starts from an empty line buffer, so a token split across two
    /// calls is never recognized. Bytes are pulled one at a time; whatever
    /// follows a recognized line stays in the transport.
    pub async fn await_trigger(&mut self, timeout: Duration) -> bool {
        let mut assembler = LineAssembler::<MAX_LINE_LEN>::new();
        match with_timeout(timeout, self.listen(&mut assembler)).await {
            Ok(()) => {
                debug!("Trigger line received");
                true
            }
            Err(_) => {
                trace!("No trigger within timeout ({} pending bytes)", assembler.pending().len());
                false
            }
        }
    }

    async fn listen(&mut self, assembler: &mut LineAssembler<MAX_LINE_LEN>) {
        let token = self.token.as_bytes();
        let mut byte = [0u8; 1];

        loop {
            match self.reader.read(&mut byte).await {
                Ok(0) => Timer::after(self.poll_interval).await,
                Ok(_) => {
                    if assembler.feed(byte[0], token) {
                        return;
                    }
                }
                Err(_) => {
                    warn!("Command link read error, dropping partial line");
                    assembler.clear();
                    Timer::after(self.poll_interval).await;
                }
            }
        }
    }

    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }
}
