use defmt::{Format, debug, info, warn};
use embassy_stm32::dcmi::{self, Dcmi};
use embassy_stm32::peripherals::{DCMI, DMA2_CH1};
use embassy_time::{Duration, Timer, with_timeout};
use embedded_hal_async::i2c::I2c;
use sonarcam_core::{Camera, CameraConfig, PixelFormat, jpeg};

mod regs;

/// Capture buffer size. A VGA JPEG at quality 12 is typically 15-40 KiB.
pub const FRAME_BUFFER_WORDS: usize = 16 * 1024;

/// Longest a single DCMI snapshot may take before it counts as failed
const CAPTURE_TIMEOUT: Duration = Duration::from_millis(1500);

#[derive(Debug, Format)]
pub enum SccbError {
    BusError,
    /// Something answered at the OV2640 address but reported another product id
    WrongSensor { pid: u8, ver: u8 },
    UnsupportedFormat,
}

#[derive(Debug, Format)]
pub enum CameraError {
    Dcmi(dcmi::Error),
    Timeout,
    /// The capture ended without a JPEG end-of-image marker
    Truncated,
    /// The previous frame was never released
    FrameHeld,
}

/// OV2640 control port (SCCB, driven as I2C)
pub struct Ov2640<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Ov2640<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    async fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), SccbError> {
        self.i2c
            .write(regs::ADDR, &[reg, value])
            .await
            .map_err(|_| SccbError::BusError)
    }

    // SCCB has no repeated start: address the register, then read in a second transfer.
    async fn read_reg(&mut self, reg: u8) -> Result<u8, SccbError> {
        let mut value = [0u8; 1];
        self.i2c
            .write(regs::ADDR, &[reg])
            .await
            .map_err(|_| SccbError::BusError)?;
        self.i2c
            .read(regs::ADDR, &mut value)
            .await
            .map_err(|_| SccbError::BusError)?;
        Ok(value[0])
    }

    async fn write_table(&mut self, table: &[(u8, u8)]) -> Result<(), SccbError> {
        for &(reg, value) in table {
            self.write_reg(reg, value).await?;
        }
        Ok(())
    }

    /// Resets the sensor and programs JPEG output at the configured size and quality.
    pub async fn init(&mut self, config: &CameraConfig) -> Result<(), SccbError> {
        info!("Initializing OV2640 camera (XCLK {} Hz)", config.xclk_hz);

        debug!("  Soft reset...");
        self.write_reg(regs::BANK_SEL, regs::BANK_SENSOR).await?;
        self.write_reg(regs::COM7, regs::COM7_SRST).await?;
        Timer::after(Duration::from_millis(10)).await;

        let pid = self.read_reg(regs::PIDH).await?;
        let ver = self.read_reg(regs::PIDL).await?;
        if pid != regs::PID_OV2640 {
            return Err(SccbError::WrongSensor { pid, ver });
        }
        debug!("  Found OV2640 (version {:#x})", ver);

        debug!("  Loading SVGA register table...");
        self.write_table(regs::SVGA_INIT).await?;

        match config.pixel_format {
            PixelFormat::Jpeg => self.write_table(regs::JPEG_OUTPUT).await?,
        }

        self.set_frame_size(config.frame_size.dimensions()).await?;
        self.set_quality(config.jpeg_quality).await?;

        // Let auto exposure settle before the first frame
        Timer::after(Duration::from_millis(300)).await;
        info!("OV2640 initialization complete");
        Ok(())
    }

    async fn set_frame_size(&mut self, (width, height): (u16, u16)) -> Result<(), SccbError> {
        if width % 4 != 0 || height % 4 != 0 {
            return Err(SccbError::UnsupportedFormat);
        }
        let (out_w, out_h) = (width / 4, height / 4);
        debug!("  Output size {}x{}", width, height);

        self.write_reg(regs::BANK_SEL, regs::BANK_DSP).await?;
        self.write_reg(regs::RESET, regs::RESET_DVP).await?;
        self.write_reg(regs::ZMOW, out_w as u8).await?;
        self.write_reg(regs::ZMOH, out_h as u8).await?;
        self.write_reg(regs::ZMHH, (((out_h >> 6) & 0x04) | ((out_w >> 8) & 0x03)) as u8)
            .await?;
        self.write_reg(regs::RESET, 0x00).await
    }

    async fn set_quality(&mut self, quality: u8) -> Result<(), SccbError> {
        if quality > 63 {
            warn!("JPEG quality {} out of range, clamping to 63", quality);
        }
        self.write_reg(regs::BANK_SEL, regs::BANK_DSP).await?;
        self.write_reg(regs::QS, quality.min(63)).await
    }
}

/// OV2640 streaming JPEG into a single static buffer over DCMI.
///
/// The control port is only needed during [`DcmiCamera::init`]; after that the
/// sensor free-runs with the programmed settings.
pub struct DcmiCamera {
    dcmi: Dcmi<'static, DCMI, DMA2_CH1>,
    buffer: &'static mut [u32; FRAME_BUFFER_WORDS],
    held: bool,
}

impl DcmiCamera {
    /// Configures the sensor. Any error here is fatal for the device.
    pub async fn init<I2C: I2c>(
        mut sensor: Ov2640<I2C>,
        dcmi: Dcmi<'static, DCMI, DMA2_CH1>,
        buffer: &'static mut [u32; FRAME_BUFFER_WORDS],
        config: &CameraConfig,
    ) -> Result<Self, SccbError> {
        if config.frame_buffers != 1 {
            warn!(
                "{} frame buffers requested, this board has room for one",
                config.frame_buffers
            );
        }
        sensor.init(config).await?;
        Ok(Self {
            dcmi,
            buffer,
            held: false,
        })
    }
}

impl Camera for DcmiCamera {
    type Error = CameraError;

    async fn capture(&mut self) -> Result<usize, CameraError> {
        if self.held {
            return Err(CameraError::FrameHeld);
        }

        // A stale end marker from the previous frame must not be found again
        self.buffer.fill(0);
        match with_timeout(CAPTURE_TIMEOUT, self.dcmi.capture(&mut self.buffer[..])).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!("DCMI error: {}", e);
                return Err(CameraError::Dcmi(e));
            }
            Err(_) => {
                warn!("DCMI capture timed out");
                return Err(CameraError::Timeout);
            }
        }

        let len = jpeg::encoded_len(jpeg::frame_bytes(&self.buffer[..])).ok_or_else(|| {
            warn!("Captured data has no JPEG end marker");
            CameraError::Truncated
        })?;
        self.held = true;
        Ok(len)
    }

    fn frame_buffer(&self) -> &[u8] {
        jpeg::frame_bytes(&self.buffer[..])
    }

    fn release(&mut self) {
        self.held = false;
    }
}
