#![no_std]
#![no_main]

mod distance_sensor;
mod i2c_devices;
mod link;
mod sensor;

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::dcmi::{self, Dcmi};
use embassy_stm32::exti::{self, ExtiInput};
use embassy_stm32::gpio::{Level, Output, Pull, Speed};
use embassy_stm32::rcc::{Mco, Mco1Source, McoConfig, McoPrescaler};
use embassy_stm32::{bind_interrupts, i2c, interrupt, peripherals, usart};
use embassy_time::Timer;
use sensor::ov2640::{DcmiCamera, FRAME_BUFFER_WORDS, Ov2640};
use sonarcam_core::{Controller, DeviceConfig};
use static_cell::ConstStaticCell;
use {defmt_rtt as _, panic_probe as _};

// Board wiring (NUCLEO-F446RE)
//
//   Host link     USART2  TX PA2, RX PA3 (ST-LINK VCP)
//   HC-SR04       TRIG PA10, ECHO PB5 (5 V tolerant)
//   OV2640 SCCB   I2C2    SCL PB10, SDA PC12
//   OV2640 XCLK   MCO1    PA8
//   OV2640 DVP    DCMI    D0-D4 PC6 PC7 PC8 PC9 PC11, D5 PB6, D6 PB8, D7 PB9,
//                         VSYNC PB7, HREF PA4, PCLK PA6

bind_interrupts!(
    pub struct Irqs {
        EXTI9_5 => exti::InterruptHandler<interrupt::typelevel::EXTI9_5>;
        USART2 => usart::BufferedInterruptHandler<peripherals::USART2>;
        I2C2_EV => i2c::EventInterruptHandler<peripherals::I2C2>;
        I2C2_ER => i2c::ErrorInterruptHandler<peripherals::I2C2>;
        DCMI => dcmi::InterruptHandler<peripherals::DCMI>;
    }
);

// Echo widths are timed with `Instant`; one tick must be at most 1 µs.
const _: () = core::assert!(embassy_time::TICK_HZ >= 1_000_000);

static FRAME_BUFFER: ConstStaticCell<[u32; FRAME_BUFFER_WORDS]> =
    ConstStaticCell::new([0; FRAME_BUFFER_WORDS]);

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_stm32::init(Default::default());
    info!("sonarcam starting");

    let mut config = DeviceConfig::default();
    // MCO1 straight from the 16 MHz HSI
    config.camera.xclk_hz = 16_000_000;
    let mut mco_config = McoConfig::default();
    mco_config.prescaler = McoPrescaler::DIV1;
    let _xclk = Mco::new(p.MCO1, p.PA8, Mco1Source::HSI, mco_config);

    let sonar = distance_sensor::init_sonar(
        Output::new(p.PA10, Level::Low, Speed::Low),
        ExtiInput::new(p.PB5, p.EXTI5, Pull::None, Irqs),
        config.ranging.clone(),
    );

    let (tx, rx) = unwrap!(link::init_link(p.USART2, p.PA2, p.PA3, Irqs, &config.link));

    let sccb = i2c_devices::init_sccb_bus(p.I2C2, p.PB10, p.PC12, p.DMA1_CH7, p.DMA1_CH2, Irqs);
    let dcmi = Dcmi::new_8bit(
        p.DCMI,
        p.DMA2_CH1,
        Irqs,
        p.PC6,
        p.PC7,
        p.PC8,
        p.PC9,
        p.PC11,
        p.PB6,
        p.PB8,
        p.PB9,
        p.PB7,
        p.PA4,
        p.PA6,
        dcmi::Config::default(),
    );

    let camera = match DcmiCamera::init(Ov2640::new(sccb), dcmi, FRAME_BUFFER.take(), &config.camera)
        .await
    {
        Ok(camera) => camera,
        Err(e) => {
            error!("Failed to initialize camera: {}", e);
            halt().await
        }
    };

    info!("Ready, waiting for {} on the host link", config.command.token);
    let mut controller = Controller::new(
        rx,
        tx,
        sonar,
        camera,
        &config.command,
        config.controller.clone(),
    );
    controller.run().await
}

/// Parks the device after an unrecoverable hardware fault.
async fn halt() -> ! {
    warn!("Halted");
    loop {
        Timer::after_secs(1).await;
    }
}
