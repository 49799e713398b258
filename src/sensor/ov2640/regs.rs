// OV2640 register map (the subset this firmware touches) and init tables.

/// 7-bit SCCB address
pub const ADDR: u8 = 0x30;

/// Selects the register bank for the following accesses
pub const BANK_SEL: u8 = 0xFF;
pub const BANK_DSP: u8 = 0x00;
pub const BANK_SENSOR: u8 = 0x01;

// Sensor bank
pub const COM7: u8 = 0x12;
pub const COM7_SRST: u8 = 0x80;
pub const PIDH: u8 = 0x0A;
pub const PIDL: u8 = 0x0B;
pub const CLKRC: u8 = 0x11;

pub const PID_OV2640: u8 = 0x26;

// DSP bank
pub const QS: u8 = 0x44;
pub const RESET: u8 = 0xE0;
pub const RESET_DVP: u8 = 0x04;
pub const ZMOW: u8 = 0x5A;
pub const ZMOH: u8 = 0x5B;
pub const ZMHH: u8 = 0x5C;

/// Sensor in SVGA mode (800x600 window, 30 fps at 24 MHz XCLK), DSP enabled.
/// Output size is scaled down from this window.
pub const SVGA_INIT: &[(u8, u8)] = &[
    (BANK_SEL, BANK_DSP),
    (0x2C, 0xFF),
    (0x2E, 0xDF),
    (BANK_SEL, BANK_SENSOR),
    (0x3C, 0x32),
    (CLKRC, 0x01),
    (0x09, 0x02),
    (0x04, 0x28),
    (0x13, 0xE5),
    (0x14, 0x48),
    (0x2C, 0x0C),
    (0x33, 0x78),
    (0x3A, 0x33),
    (0x3B, 0xFB),
    (0x3E, 0x00),
    (0x43, 0x11),
    (0x16, 0x10),
    (0x39, 0x92),
    (0x35, 0xDA),
    (0x22, 0x1A),
    (0x37, 0xC3),
    (0x23, 0x00),
    (0x34, 0xC0),
    (0x36, 0x1A),
    (0x06, 0x88),
    (0x07, 0xC0),
    (0x0D, 0x87),
    (0x0E, 0x41),
    (0x4C, 0x00),
    (0x4A, 0x81),
    (0x21, 0x99),
    (0x24, 0x40),
    (0x25, 0x38),
    (0x26, 0x82),
    (0x5C, 0x00),
    (0x63, 0x00),
    (0x61, 0x70),
    (0x62, 0x80),
    (0x7C, 0x05),
    (0x20, 0x80),
    (0x28, 0x30),
    (0x6C, 0x00),
    (0x6D, 0x80),
    (0x6E, 0x00),
    (0x70, 0x02),
    (0x71, 0x94),
    (0x73, 0xC1),
    (COM7, 0x40),
    (0x17, 0x11),
    (0x18, 0x43),
    (0x19, 0x00),
    (0x1A, 0x4B),
    (0x32, 0x09),
    (0x37, 0xC0),
    (0x4F, 0xCA),
    (0x50, 0xA8),
    (0x5A, 0x23),
    (0x6D, 0x00),
    (0x3D, 0x38),
    (BANK_SEL, BANK_DSP),
    (0xE5, 0x7F),
    (0xF9, 0xC0),
    (0x41, 0x24),
    (RESET, 0x14),
    (0x76, 0xFF),
    (0x33, 0xA0),
    (0x42, 0x20),
    (0x43, 0x18),
    (0x4C, 0x00),
    (0x87, 0xD5),
    (0x88, 0x3F),
    (0xD7, 0x03),
    (0xD9, 0x10),
    (0xD3, 0x82),
    (0xC8, 0x08),
    (0xC9, 0x80),
    (0x7C, 0x00),
    (0x7D, 0x00),
    (0xC2, 0x0C),
    (0xC3, 0xED),
    (0x05, 0x00),
    (RESET, 0x00),
];

/// Switches the DVP output to JPEG
pub const JPEG_OUTPUT: &[(u8, u8)] = &[
    (BANK_SEL, BANK_DSP),
    (RESET, 0x14),
    (0xE1, 0x77),
    (0xE5, 0x1F),
    (0xD7, 0x03),
    (0xDA, 0x10),
    (RESET, 0x00),
    (BANK_SEL, BANK_SENSOR),
    (0x04, 0x08),
];
