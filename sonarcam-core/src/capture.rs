use core::fmt::Debug;

/// Single-frame camera as seen by the main loop.
///
/// A successful [`Camera::capture`] leaves one encoded frame in the driver's
/// buffer. The driver must not reuse that buffer until [`Camera::release`].
#[allow(async_fn_in_trait)]
pub trait Camera {
    type Error: Debug;

    /// Captures one encoded frame and returns its length in bytes.
    async fn capture(&mut self) -> Result<usize, Self::Error>;

    /// Buffer holding the last captured frame. May be longer than the frame.
    fn frame_buffer(&self) -> &[u8];

    /// Hands the frame buffer back to the driver.
    fn release(&mut self);
}

/// The camera returned no frame for this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaptureFailure;

/// A captured frame, exclusively borrowed from the camera.
///
/// Dropping it returns the buffer to the driver, so a frame can never outlive
/// the cycle that captured it.
pub struct Frame<'a, C: Camera> {
    camera: &'a mut C,
    len: usize,
}

impl<C: Camera> Frame<'_, C> {
    pub fn as_bytes(&self) -> &[u8] {
        let buffer = self.camera.frame_buffer();
        &buffer[..self.len.min(buffer.len())]
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C: Camera> Drop for Frame<'_, C> {
    fn drop(&mut self) {
        self.camera.release();
    }
}

/// Asks the camera for one frame. No retry.
///
/// On failure the driver is released right away, so every path hands the
/// buffer back exactly once.
pub async fn capture_frame<C: Camera>(camera: &mut C) -> Result<Frame<'_, C>, CaptureFailure> {
    match camera.capture().await {
        Ok(len) => {
            trace!("Captured frame of {} bytes", len);
            Ok(Frame { camera, len })
        }
        Err(_) => {
            warn!("Frame capture failed");
            camera.release();
            Err(CaptureFailure)
        }
    }
}
