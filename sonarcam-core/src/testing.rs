// Test doubles shared by the unit tests.

use crate::capture::Camera;
use crate::ranging::{Rangefinder, SPEED_OF_SOUND_CM_PER_US, pulse_to_distance_cm};
use core::convert::Infallible;
use embassy_time::{Duration, Timer};
use embedded_io_async::{ErrorKind, ErrorType, Read, Write};
use std::collections::VecDeque;

/// Reader that hands out scripted chunks, then pends forever like an idle UART.
/// An empty chunk reads as `Ok(0)`.
#[derive(Default)]
pub struct ScriptedReader {
    script: VecDeque<Result<Vec<u8>, ErrorKind>>,
}

impl ScriptedReader {
    pub fn new(bytes: &[u8]) -> Self {
        let mut reader = Self::default();
        if !bytes.is_empty() {
            reader.push(bytes);
        }
        reader
    }

    /// Next read reports end of input
    pub fn push_eof(&mut self) {
        self.script.push_back(Ok(Vec::new()));
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.script.push_back(Ok(bytes.to_vec()));
    }

    pub fn push_error(&mut self, kind: ErrorKind) {
        self.script.push_back(Err(kind));
    }

    /// Bytes not read yet
    pub fn unread(&self) -> Vec<u8> {
        self.script
            .iter()
            .filter_map(|chunk| chunk.as_ref().ok())
            .flatten()
            .copied()
            .collect()
    }
}

impl ErrorType for ScriptedReader {
    type Error = ErrorKind;
}

impl Read for ScriptedReader {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            match self.script.pop_front() {
                Some(Ok(mut chunk)) => {
                    let n = chunk.len().min(buf.len());
                    buf[..n].copy_from_slice(&chunk[..n]);
                    let rest = chunk.split_off(n);
                    if !rest.is_empty() {
                        self.script.push_front(Ok(rest));
                    }
                    return Ok(n);
                }
                Some(Err(kind)) => return Err(kind),
                None => core::future::pending::<()>().await,
            }
        }
    }
}

/// Writer that keeps everything it is given.
#[derive(Default)]
pub struct RecordingWriter {
    pub bytes: Vec<u8>,
    pub flushes: usize,
    /// Fail every write once this many bytes have been accepted
    pub fail_after: Option<usize>,
}

impl ErrorType for RecordingWriter {
    type Error = ErrorKind;
}

impl Write for RecordingWriter {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if let Some(limit) = self.fail_after {
            if self.bytes.len() >= limit {
                return Err(ErrorKind::BrokenPipe);
            }
        }
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

/// Rangefinder returning a fixed echo pulse
pub struct FakeSonar {
    pub pulse_us: Option<u32>,
    pub measurements: usize,
}

impl FakeSonar {
    pub fn echo(pulse_us: u32) -> Self {
        Self {
            pulse_us: Some(pulse_us),
            measurements: 0,
        }
    }

    pub fn silent() -> Self {
        Self {
            pulse_us: None,
            measurements: 0,
        }
    }
}

impl Rangefinder for FakeSonar {
    async fn measure_distance_cm(&mut self) -> f32 {
        self.measurements += 1;
        pulse_to_distance_cm(self.pulse_us, SPEED_OF_SOUND_CM_PER_US)
    }
}

/// Camera with one canned frame
pub struct FakeCamera {
    pub buffer: Vec<u8>,
    pub frame_len: Option<usize>,
    pub captures: usize,
    pub releases: usize,
}

#[derive(Debug, PartialEq)]
pub struct NoFrame;

impl FakeCamera {
    /// Camera whose frame is `len` bytes of a repeating pattern
    pub fn with_frame(len: usize) -> Self {
        Self {
            buffer: (0..len).map(|i| (i % 251) as u8).collect(),
            frame_len: Some(len),
            captures: 0,
            releases: 0,
        }
    }

    pub fn failing() -> Self {
        Self {
            buffer: Vec::new(),
            frame_len: None,
            captures: 0,
            releases: 0,
        }
    }

    /// Captures not yet released. Negative means a double release.
    pub fn outstanding(&self) -> isize {
        self.captures as isize - self.releases as isize
    }
}

impl Camera for FakeCamera {
    type Error = NoFrame;

    async fn capture(&mut self) -> Result<usize, Self::Error> {
        self.captures += 1;
        self.frame_len.ok_or(NoFrame)
    }

    fn frame_buffer(&self) -> &[u8] {
        &self.buffer
    }

    fn release(&mut self) {
        self.releases += 1;
    }
}

/// Trigger pin that logs every level it is driven to (`true` = high)
#[derive(Default)]
pub struct FakeTrigger {
    pub levels: Vec<bool>,
}

impl embedded_hal::digital::ErrorType for FakeTrigger {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for FakeTrigger {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.push(true);
        Ok(())
    }
}

/// Echo pin that either never rises or produces one pulse of fixed width
pub struct FakeEcho {
    pub pulse: Option<Duration>,
}

impl embedded_hal::digital::ErrorType for FakeEcho {
    type Error = Infallible;
}

impl embedded_hal_async::digital::Wait for FakeEcho {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        if self.pulse.is_none() {
            core::future::pending::<()>().await;
        }
        Ok(())
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        if let Some(width) = self.pulse {
            Timer::after(width).await;
        }
        Ok(())
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_for_high().await
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_for_low().await
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_for_high().await
    }
}

/// Pin whose every operation fails
pub struct BrokenPin;

impl embedded_hal::digital::ErrorType for BrokenPin {
    type Error = embedded_hal::digital::ErrorKind;
}

impl embedded_hal::digital::OutputPin for BrokenPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(embedded_hal::digital::ErrorKind::Other)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(embedded_hal::digital::ErrorKind::Other)
    }
}

impl embedded_hal_async::digital::Wait for BrokenPin {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        Err(embedded_hal::digital::ErrorKind::Other)
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        Err(embedded_hal::digital::ErrorKind::Other)
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        Err(embedded_hal::digital::ErrorKind::Other)
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        Err(embedded_hal::digital::ErrorKind::Other)
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        Err(embedded_hal::digital::ErrorKind::Other)
    }
}
