use crate::Irqs;
use defmt::info;
use embassy_stm32::Peri;
use embassy_stm32::gpio::Speed;
use embassy_stm32::i2c::{Config, I2c, Master};
use embassy_stm32::mode::Async;
use embassy_stm32::peripherals::{DMA1_CH2, DMA1_CH7, I2C2, PB10, PC12};
use embassy_stm32::time::Hertz;

/// Brings up the camera control bus (SCCB, which the I2C peripheral can drive).
pub fn init_sccb_bus(
    i2c_peri: Peri<'static, I2C2>,
    scl: Peri<'static, PB10>,
    sda: Peri<'static, PC12>,
    tx_dma: Peri<'static, DMA1_CH7>,
    rx_dma: Peri<'static, DMA1_CH2>,
    irqs: Irqs,
) -> I2c<'static, Async, Master> {
    let mut i2c_config = Config::default();
    // OV2640 SCCB is specified up to 400 kHz; stay conservative on jumper wires
    i2c_config.frequency = Hertz::khz(100);
    i2c_config.gpio_speed = Speed::Medium;

    info!("Camera control bus at 100 kHz");
    I2c::new(i2c_peri, scl, sda, irqs, tx_dma, rx_dma, i2c_config)
}
