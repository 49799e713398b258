//! Response wire format.
//!
//! One response per recognized command, big-endian, no delimiters:
//!
//! ```text
//! +-------------+-----------------+---------------------------+
//! | distance:u16| payload_len:u32 | payload[0..payload_len]   |
//! +-------------+-----------------+---------------------------+
//! ```
//!
//! `payload_len == 0` means the capture failed. A distance of 0 means either a
//! 0 cm reading or no echo; the format does not tell them apart.

use crate::capture::{Camera, CaptureFailure, Frame};
use embedded_io_async::Write;

pub const DISTANCE_LEN: usize = 2;
pub const LENGTH_LEN: usize = 4;
pub const HEADER_LEN: usize = DISTANCE_LEN + LENGTH_LEN;

/// Converts a distance reading to its wire value.
///
/// Truncates toward zero and saturates at `u16::MAX`. Negative values (the
/// no-echo sentinel) and NaN become 0.
pub fn encode_distance(distance_cm: f32) -> u16 {
    if distance_cm.is_nan() || distance_cm <= 0.0 {
        0
    } else {
        // float-to-int casts truncate and saturate
        distance_cm as u16
    }
}

/// Fixed-size head of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResponseHeader {
    pub distance_cm: u16,
    pub payload_len: u32,
}

impl ResponseHeader {
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[..DISTANCE_LEN].copy_from_slice(&self.distance_cm.to_be_bytes());
        out[DISTANCE_LEN..].copy_from_slice(&self.payload_len.to_be_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8; HEADER_LEN]) -> Self {
        Self {
            distance_cm: u16::from_be_bytes([bytes[0], bytes[1]]),
            payload_len: u32::from_be_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]),
        }
    }

    pub fn is_capture_failure(&self) -> bool {
        self.payload_len == 0
    }

    /// Header plus payload, in bytes
    pub fn total_len(&self) -> usize {
        HEADER_LEN + self.payload_len as usize
    }
}

/// Writes one response and flushes the transport.
///
/// The distance goes out first, then the length and the payload. The frame is
/// released after the flush, or on the way out if a write fails.
pub async fn build_and_send<W: Write, C: Camera>(
    writer: &mut W,
    distance_cm: f32,
    frame: Result<Frame<'_, C>, CaptureFailure>,
) -> Result<ResponseHeader, W::Error> {
    let distance = encode_distance(distance_cm);
    writer.write_all(&distance.to_be_bytes()).await?;

    let mut payload: &[u8] = match &frame {
        Ok(frame) => frame.as_bytes(),
        Err(CaptureFailure) => &[],
    };
    let payload_len = match u32::try_from(payload.len()) {
        Ok(len) => len,
        Err(_) => {
            warn!("Frame of {} bytes does not fit the length field, sending none", payload.len());
            payload = &[];
            0
        }
    };

    writer.write_all(&payload_len.to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    drop(frame);

    Ok(ResponseHeader {
        distance_cm: distance,
        payload_len,
    })
}

/// Host-side sanity window for advertised payload lengths
#[derive(Debug, Clone, Copy)]
pub struct PayloadBounds {
    pub min: u32,
    pub max: u32,
}

impl Default for PayloadBounds {
    fn default() -> Self {
        Self {
            min: 1_000,
            max: 600_000,
        }
    }
}

impl PayloadBounds {
    pub fn accepts(&self, header: &ResponseHeader) -> bool {
        (self.min..=self.max).contains(&header.payload_len)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum DecodeEvent<'a> {
    Header(ResponseHeader),
    /// Next slice of the payload, borrowed from the decoder input
    Payload(&'a [u8]),
    /// The current response is complete
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    Header { filled: usize },
    Payload { remaining: u32 },
    End,
}

/// Incremental decoder for the response stream, for the receiving side.
///
/// Feed it whatever the link delivers; it never buffers payload bytes.
#[derive(Debug)]
pub struct ResponseDecoder {
    header: [u8; HEADER_LEN],
    state: DecodeState,
}

impl ResponseDecoder {
    pub const fn new() -> Self {
        Self {
            header: [0; HEADER_LEN],
            state: DecodeState::Header { filled: 0 },
        }
    }

    /// Consumes a prefix of `input` and returns how many bytes were used along
    /// with at most one event. Call again with the rest until it returns
    /// `(0, None)`.
    pub fn decode<'a>(&mut self, input: &'a [u8]) -> (usize, Option<DecodeEvent<'a>>) {
        match self.state {
            DecodeState::Header { filled } => {
                let n = (HEADER_LEN - filled).min(input.len());
                self.header[filled..filled + n].copy_from_slice(&input[..n]);
                let filled = filled + n;
                if filled < HEADER_LEN {
                    self.state = DecodeState::Header { filled };
                    return (n, None);
                }

                let header = ResponseHeader::from_bytes(&self.header);
                self.state = if header.payload_len == 0 {
                    DecodeState::End
                } else {
                    DecodeState::Payload {
                        remaining: header.payload_len,
                    }
                };
                (n, Some(DecodeEvent::Header(header)))
            }
            DecodeState::Payload { remaining } => {
                if input.is_empty() {
                    return (0, None);
                }
                let n = (remaining as usize).min(input.len());
                let remaining = remaining - n as u32;
                self.state = if remaining == 0 {
                    DecodeState::End
                } else {
                    DecodeState::Payload { remaining }
                };
                (n, Some(DecodeEvent::Payload(&input[..n])))
            }
            DecodeState::End => {
                self.state = DecodeState::Header { filled: 0 };
                (0, Some(DecodeEvent::End))
            }
        }
    }

    /// True between responses
    pub fn is_idle(&self) -> bool {
        self.state == DecodeState::Header { filled: 0 }
    }

    /// Drops any partially decoded response.
    pub fn reset(&mut self) {
        self.state = DecodeState::Header { filled: 0 };
    }
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self::new()
    }
}
