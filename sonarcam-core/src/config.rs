use embassy_time::Duration;

/// Everything the device reads once at power-on. Nothing here is renegotiated
/// at runtime.
#[derive(Debug, Clone, Default)]
pub struct DeviceConfig {
    pub link: LinkConfig,
    pub command: CommandConfig,
    pub ranging: RangingConfig,
    pub camera: CameraConfig,
    pub controller: ControllerConfig,
}

/// Byte-stream link to the host.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    pub baudrate: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self { baudrate: 500_000 }
    }
}

/// Configuration for the command recognizer
#[derive(Debug, Clone)]
pub struct CommandConfig {
    /// Trigger line, compared after trimming surrounding whitespace. Case-sensitive.
    pub token: &'static str,
    /// How long one `await_trigger` call listens before giving up
    pub timeout: Duration,
    /// Back-off when the transport reports end of input instead of pending
    pub poll_interval: Duration,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            token: "IMGSTART",
            timeout: Duration::from_millis(1000),
            poll_interval: Duration::from_millis(1),
        }
    }
}

/// Timing for the HC-SR04 ultrasonic sensor
#[derive(Debug, Clone)]
pub struct RangingConfig {
    /// Upper bound for the whole echo measurement. 30 ms is roughly 5 m of range.
    pub echo_timeout: Duration,
    /// Low time on the trigger line before the pulse, in microseconds
    pub settle_us: u32,
    /// Width of the trigger pulse in microseconds (datasheet minimum: 10)
    pub trigger_pulse_us: u32,
    /// Speed of sound in cm/µs, applied to half the round trip
    pub speed_of_sound_cm_per_us: f32,
}

impl Default for RangingConfig {
    fn default() -> Self {
        Self {
            echo_timeout: Duration::from_millis(30),
            settle_us: 2,
            trigger_pulse_us: 10,
            speed_of_sound_cm_per_us: crate::ranging::SPEED_OF_SOUND_CM_PER_US,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameSize {
    /// 320x240
    Qvga,
    /// 640x480
    Vga,
    /// 800x600
    Svga,
}

impl FrameSize {
    pub const fn dimensions(self) -> (u16, u16) {
        match self {
            FrameSize::Qvga => (320, 240),
            FrameSize::Vga => (640, 480),
            FrameSize::Svga => (800, 600),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    Jpeg,
}

/// Capabilities handed to the camera driver at initialization
#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub frame_size: FrameSize,
    pub pixel_format: PixelFormat,
    /// JPEG quantization scale, 0..=63. Lower means better quality and bigger frames.
    pub jpeg_quality: u8,
    /// Number of frame buffers the driver may hold
    pub frame_buffers: u8,
    /// Sensor master clock in Hz
    pub xclk_hz: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            frame_size: FrameSize::Vga,
            pixel_format: PixelFormat::Jpeg,
            jpeg_quality: 12,
            frame_buffers: 1,
            xclk_hz: 20_000_000,
        }
    }
}

/// Pacing of the main loop
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Pause after a command wait timed out
    pub idle_pause: Duration,
    /// Pause after each response has been flushed
    pub response_cooldown: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            idle_pause: Duration::from_millis(5),
            response_cooldown: Duration::from_millis(50),
        }
    }
}
