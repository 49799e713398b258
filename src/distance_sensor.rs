use defmt::info;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::Output;
use embassy_time::Delay;
use sonarcam_core::{Hcsr04, RangingConfig};

/// HC-SR04 on a push-pull trigger output and an EXTI echo input
pub type Sonar = Hcsr04<Output<'static>, ExtiInput<'static>, Delay>;

/// Initialize the HC-SR04 ultrasonic sensor
///
/// The sensor has no configuration registers; this only parks the trigger line
/// low and hands the pins to the driver.
pub fn init_sonar(
    mut trigger: Output<'static>,
    echo: ExtiInput<'static>,
    config: RangingConfig,
) -> Sonar {
    info!("Initializing HC-SR04 distance sensor");
    trigger.set_low();
    info!(
        "  Echo timeout {} ms, trigger pulse {} us",
        config.echo_timeout.as_millis(),
        config.trigger_pulse_us
    );
    Hcsr04::new(trigger, echo, Delay, config)
}
