//! Destination bitmap storage and the allocation seam.
//!
//! The host platform owns display-buffer allocation (on the original
//! mobile target this is the platform bitmap API), so allocation sits
//! behind a trait and the pipeline only ever writes into the buffer it is
//! handed.

use crate::render_pipeline::common::error::{RenderError, Result};

/// An RGBA8888 pixel buffer with an explicit row stride.
///
/// Rows start every `stride` bytes; `stride >= width * 4`. The buffer is
/// never resized after allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    /// Row stride in bytes.
    pub stride: usize,
    pub data: Vec<u8>,
}

impl Bitmap {
    /// Byte offset of pixel `(x, y)` within `data`.
    #[inline]
    pub fn pixel_offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride + x as usize * 4
    }
}

/// Display-buffer allocation collaborator.
pub trait BitmapAllocator {
    fn allocate(&self, width: u32, height: u32) -> Result<Bitmap>;
}

/// Heap-backed allocator with packed rows (`stride == width * 4`).
pub struct HeapAllocator;

impl BitmapAllocator for HeapAllocator {
    fn allocate(&self, width: u32, height: u32) -> Result<Bitmap> {
        if width == 0 || height == 0 {
            return Err(RenderError::BitmapAllocationFailed(format!(
                "invalid dimensions {}x{}",
                width, height
            )));
        }
        let stride = width as usize * 4;
        Ok(Bitmap {
            width,
            height,
            stride,
            data: vec![0u8; stride * height as usize],
        })
    }
}
