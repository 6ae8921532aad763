//! Image receiver
//!
//! The frame buffer is allocated once by the board and lent to the
//! peripheral for its whole lifetime. Uploads overwrite it in place, and
//! every render operation reads or draws into the same bytes.

use crate::error::PayloadError;

/// Progress of an image upload after one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UploadProgress {
    /// More bytes are expected
    InProgress,
    /// The last byte of the frame was written
    Complete,
}

/// Packed 1bpp frame buffer with an upload cursor
#[derive(Debug)]
pub struct ImageBuffer<'a> {
    data: &'a mut [u8],
    cursor: usize,
}

impl<'a> ImageBuffer<'a> {
    /// Wrap a frame buffer of `ceil(width / 8) * height` bytes
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, cursor: 0 }
    }

    /// Total frame size in bytes
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes written by the current upload
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Start a new upload at the first byte
    pub fn begin_upload(&mut self) {
        self.cursor = 0;
    }

    /// Write the next uploaded byte
    ///
    /// Writes past the end of the frame are refused.
    pub fn push(&mut self, byte: u8) -> Result<UploadProgress, PayloadError> {
        let slot = self
            .data
            .get_mut(self.cursor)
            .ok_or(PayloadError::ImageOverrun)?;
        *slot = byte;
        self.cursor += 1;

        if self.cursor == self.data.len() {
            Ok(UploadProgress::Complete)
        } else {
            Ok(UploadProgress::InProgress)
        }
    }

    /// The frame contents
    pub fn frame(&self) -> &[u8] {
        self.data
    }

    /// The frame contents, for drawing
    pub fn frame_mut(&mut self) -> &mut [u8] {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_completes_at_capacity() {
        let mut storage = [0u8; 4];
        let mut image = ImageBuffer::new(&mut storage);
        image.begin_upload();
        assert_eq!(image.push(1), Ok(UploadProgress::InProgress));
        assert_eq!(image.push(2), Ok(UploadProgress::InProgress));
        assert_eq!(image.push(3), Ok(UploadProgress::InProgress));
        assert_eq!(image.push(4), Ok(UploadProgress::Complete));
        assert_eq!(image.frame(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_overrun_is_refused() {
        let mut storage = [0u8; 2];
        let mut image = ImageBuffer::new(&mut storage);
        image.push(0xAA).unwrap();
        image.push(0xBB).unwrap();
        assert_eq!(image.push(0xCC), Err(PayloadError::ImageOverrun));
        assert_eq!(image.cursor(), 2);
        assert_eq!(image.frame(), &[0xAA, 0xBB]);
    }

    #[test]
    fn test_begin_upload_rewinds() {
        let mut storage = [0u8; 3];
        let mut image = ImageBuffer::new(&mut storage);
        image.push(7).unwrap();
        image.push(8).unwrap();
        image.begin_upload();
        assert_eq!(image.cursor(), 0);
        image.push(9).unwrap();
        assert_eq!(image.frame(), &[9, 8, 0]);
    }

    #[test]
    fn test_empty_frame_refuses_every_byte() {
        let mut storage: [u8; 0] = [];
        let mut image = ImageBuffer::new(&mut storage);
        assert_eq!(image.capacity(), 0);
        assert_eq!(image.push(0), Err(PayloadError::ImageOverrun));
    }
}
