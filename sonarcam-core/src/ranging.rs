use crate::config::RangingConfig;
use embassy_time::{Instant, with_deadline};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;

/// Speed of sound at room temperature, in cm/µs
pub const SPEED_OF_SOUND_CM_PER_US: f32 = 0.0343;

/// Distance reported when no echo came back in time
pub const NO_ECHO_CM: f32 = -1.0;

/// Converts an echo pulse width into a distance in centimeters.
///
/// The pulse covers the round trip, so only half of it counts. A missing or
/// zero-width pulse yields [`NO_ECHO_CM`].
pub fn pulse_to_distance_cm(pulse_us: Option<u32>, speed_cm_per_us: f32) -> f32 {
    match pulse_us {
        None | Some(0) => NO_ECHO_CM,
        Some(us) => (us as f32 / 2.0) * speed_cm_per_us,
    }
}

/// Something that produces one distance reading per call.
///
/// Implementations block the caller for at most their own echo timeout and
/// return [`NO_ECHO_CM`] (or any negative value) when nothing was measured.
#[allow(async_fn_in_trait)]
pub trait Rangefinder {
    async fn measure_distance_cm(&mut self) -> f32;
}

/// HC-SR04 ultrasonic sensor on a trigger output and an echo input
pub struct Hcsr04<T, E, D> {
    trigger: T,
    echo: E,
    delay: D,
    config: RangingConfig,
}

impl<T: OutputPin, E: Wait, D: DelayNs> Hcsr04<T, E, D> {
    pub fn new(trigger: T, echo: E, delay: D, config: RangingConfig) -> Self {
        Self {
            trigger,
            echo,
            delay,
            config,
        }
    }

    async fn fire_trigger(&mut self) -> Result<(), T::Error> {
        self.trigger.set_low()?;
        self.delay.delay_us(self.config.settle_us).await;
        self.trigger.set_high()?;
        self.delay.delay_us(self.config.trigger_pulse_us).await;
        self.trigger.set_low()
    }

    /// Fires one trigger pulse and measures the echo width in microseconds.
    ///
    /// The echo timeout bounds the wait for the rising edge and the pulse
    /// together. Returns `None` on timeout or pin error.
    pub async fn echo_pulse_us(&mut self) -> Option<u32> {
        if self.fire_trigger().await.is_err() {
            warn!("HC-SR04 trigger pin error");
            return None;
        }

        let deadline = Instant::now() + self.config.echo_timeout;
        let echo = &mut self.echo;
        let measured = with_deadline(deadline, async {
            echo.wait_for_high().await.ok()?;
            let start = Instant::now();
            echo.wait_for_low().await.ok()?;
            Some(start.elapsed())
        })
        .await;

        match measured {
            Ok(Some(width)) => Some(u32::try_from(width.as_micros()).unwrap_or(u32::MAX)),
            Ok(None) => {
                warn!("HC-SR04 echo pin error");
                None
            }
            Err(_) => None,
        }
    }

    pub fn release(self) -> (T, E, D) {
        (self.trigger, self.echo, self.delay)
    }
}

impl<T: OutputPin, E: Wait, D: DelayNs> Rangefinder for Hcsr04<T, E, D> {
    async fn measure_distance_cm(&mut self) -> f32 {
        let pulse = self.echo_pulse_us().await;
        let distance = pulse_to_distance_cm(pulse, self.config.speed_of_sound_cm_per_us);
        match pulse {
            Some(us) => trace!("Echo {} us -> {} cm", us, distance),
            None => debug!("No echo"),
        }
        distance
    }
}

#[cfg(test)]
mod tests;
