use crate::Irqs;
use defmt::info;
use embassy_stm32::Peri;
use embassy_stm32::peripherals::{PA2, PA3, USART2};
use embassy_stm32::usart::{self, BufferedUart, BufferedUartRx, BufferedUartTx};
use sonarcam_core::LinkConfig;
use static_cell::StaticCell;

/// Host link on USART2 (the Nucleo's ST-LINK virtual COM port).
///
/// Carries nothing but the binary protocol; diagnostics go to RTT.
pub fn init_link(
    usart: Peri<'static, USART2>,
    tx: Peri<'static, PA2>,
    rx: Peri<'static, PA3>,
    irqs: Irqs,
    config: &LinkConfig,
) -> Result<(BufferedUartTx<'static>, BufferedUartRx<'static>), usart::ConfigError> {
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = config.baudrate;

    static TX_BUF: StaticCell<[u8; 512]> = StaticCell::new();
    let tx_buf = &mut TX_BUF.init([0; 512])[..];
    static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
    let rx_buf = &mut RX_BUF.init([0; 64])[..];

    let uart = BufferedUart::new(usart, rx, tx, tx_buf, rx_buf, irqs, uart_config)?;
    info!("Host link UART at {} baud", config.baudrate);
    Ok(uart.split())
}
