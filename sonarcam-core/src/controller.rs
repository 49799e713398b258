use crate::capture::{Camera, capture_frame};
use crate::command::CommandRecognizer;
use crate::config::{CommandConfig, ControllerConfig};
use crate::ranging::Rangefinder;
use crate::wire::{ResponseHeader, build_and_send};
use embassy_time::{Duration, Timer};
use embedded_io_async::{Error, Read, Write};

/// Where the main loop currently is. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerState {
    WaitCommand,
    Measure,
    Capture,
    Respond,
}

/// What one pass through the loop did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// No trigger arrived before the timeout. Nothing was written.
    Idle,
    /// A full response went out.
    Responded(ResponseHeader),
}

/// The request/response loop.
///
/// Owns every hardware handle the protocol touches: the two halves of the
/// link, the rangefinder and the camera. They are set up once by the caller and
/// only borrowed by each step.
pub struct Controller<R, W, S, C> {
    recognizer: CommandRecognizer<R>,
    writer: W,
    sonar: S,
    camera: C,
    command_timeout: Duration,
    config: ControllerConfig,
    state: ControllerState,
}

impl<R, W, S, C> Controller<R, W, S, C>
where
    R: Read,
    W: Write,
    S: Rangefinder,
    C: Camera,
{
    pub fn new(
        reader: R,
        writer: W,
        sonar: S,
        camera: C,
        command: &CommandConfig,
        config: ControllerConfig,
    ) -> Self {
        Self {
            recognizer: CommandRecognizer::new(reader, command),
            writer,
            sonar,
            camera,
            command_timeout: command.timeout,
            config,
            state: ControllerState::WaitCommand,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    fn enter(state: &mut ControllerState, next: ControllerState) {
        trace!("{:?} -> {:?}", *state, next);
        *state = next;
    }

    /// Runs one pass: wait for a trigger, then measure, capture and respond.
    ///
    /// Once a trigger is seen the pass always runs to the end and writes
    /// exactly one response, unless the transport itself fails.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, W::Error> {
        if !self.recognizer.await_trigger(self.command_timeout).await {
            Timer::after(self.config.idle_pause).await;
            return Ok(CycleOutcome::Idle);
        }

        Self::enter(&mut self.state, ControllerState::Measure);
        let distance_cm = self.sonar.measure_distance_cm().await;

        Self::enter(&mut self.state, ControllerState::Capture);
        let frame = capture_frame(&mut self.camera).await;

        Self::enter(&mut self.state, ControllerState::Respond);
        let sent = build_and_send(&mut self.writer, distance_cm, frame).await;

        Self::enter(&mut self.state, ControllerState::WaitCommand);
        let header = sent?;
        debug!(
            "Response sent: {} cm, {} payload bytes",
            header.distance_cm, header.payload_len
        );

        Timer::after(self.config.response_cooldown).await;
        Ok(CycleOutcome::Responded(header))
    }

    /// Runs the loop forever. Transport errors end the current pass only.
    pub async fn run(&mut self) -> ! {
        info!("Waiting for trigger commands");
        loop {
            if let Err(e) = self.run_cycle().await {
                #[cfg(feature = "defmt")]
                ::defmt::warn!(
                    "Transport error while sending a response: {:?}",
                    ::defmt::Debug2Format(&e.kind())
                );
                #[cfg(feature = "log")]
                ::log::warn!("Transport error while sending a response: {:?}", e.kind());
            }
        }
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn reader_mut(&mut self) -> &mut R {
        self.recognizer.reader_mut()
    }
}
