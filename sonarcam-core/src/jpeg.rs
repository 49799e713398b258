//! JPEG framing markers.
//!
//! The camera streams an encoded frame into a buffer sized for the worst case;
//! the end-of-image marker tells how much of it is the frame.

/// Start of image
pub const SOI: [u8; 2] = [0xFF, 0xD8];
/// End of image
pub const EOI: [u8; 2] = [0xFF, 0xD9];

/// Length of the encoded image at the start of `buf`, up to and including the
/// first end-of-image marker. `None` if `buf` does not start with SOI or has
/// no EOI.
pub fn encoded_len(buf: &[u8]) -> Option<usize> {
    if !buf.starts_with(&SOI) {
        return None;
    }
    buf[SOI.len()..]
        .windows(EOI.len())
        .position(|w| w == EOI)
        .map(|i| SOI.len() + i + EOI.len())
}

/// Byte view of a word-aligned DMA buffer, in memory order.
pub fn frame_bytes(words: &[u32]) -> &[u8] {
    bytemuck::cast_slice(words)
}

/// True when `payload` starts with SOI and ends with EOI.
pub fn is_complete(payload: &[u8]) -> bool {
    payload.len() >= SOI.len() + EOI.len() && payload.starts_with(&SOI) && payload.ends_with(&EOI)
}
