//! Scale-to-fit resampler and RGBA bitmap writer.
//!
//! Maps every destination pixel back to its nearest source pixel (no
//! filtering), pushes the sample through the tone shader and the sRGB
//! encode, and writes the quantized bytes into a caller-allocated bitmap.

use tracing::debug;

use crate::render_pipeline::bitmap::{Bitmap, BitmapAllocator};
use crate::render_pipeline::codec::{DecodedImage, SampleEncoding};
use crate::render_pipeline::color::{quantize_to_byte, srgb_decode, srgb_encode};
use crate::render_pipeline::common::error::{RenderError, Result};
use crate::render_pipeline::tone::{self, ShaderParams};

/// Output bounding box. Zero in either dimension means "no cap".
#[derive(Debug, Clone, Copy)]
pub struct OutputBound {
    pub max_width: u32,
    pub max_height: u32,
}

impl OutputBound {
    /// The interactive preview cap.
    pub const FULL_HD: OutputBound = OutputBound {
        max_width: 1920,
        max_height: 1080,
    };

    fn is_uncapped(&self) -> bool {
        self.max_width == 0 || self.max_height == 0
    }
}

/// Downscale factor fitting `width x height` inside the bound, or 1.0 when
/// the source already fits (this resampler never upscales).
fn fit_scale(width: u32, height: u32, bound: Option<OutputBound>) -> f32 {
    let Some(bound) = bound else { return 1.0 };
    if bound.is_uncapped() || (width <= bound.max_width && height <= bound.max_height) {
        return 1.0;
    }
    let scale_w = bound.max_width as f32 / width as f32;
    let scale_h = bound.max_height as f32 / height as f32;
    scale_w.min(scale_h)
}

/// Renders a decoded source buffer into a freshly allocated RGBA bitmap,
/// applying the tone shader per sample. Alpha is always fully opaque.
pub fn render_to_bitmap<A: BitmapAllocator>(
    source: &DecodedImage,
    params: &ShaderParams,
    bound: Option<OutputBound>,
    allocator: &A,
) -> Result<Bitmap> {
    if source.channels < 3 {
        return Err(RenderError::UnsupportedChannelLayout(source.channels));
    }
    if source.bits_per_channel != 8 && source.bits_per_channel != 16 {
        return Err(RenderError::UnsupportedBitDepth(source.bits_per_channel));
    }

    let scale = fit_scale(source.width, source.height, bound);
    let out_width = ((source.width as f32 * scale).floor() as u32).max(1);
    let out_height = ((source.height as f32 * scale).floor() as u32).max(1);

    let mut bitmap = allocator.allocate(out_width, out_height)?;
    debug!(
        src_width = source.width,
        src_height = source.height,
        out_width,
        out_height,
        scale,
        "resampling into bitmap"
    );

    let inv_scale = 1.0 / scale;
    let channels = source.channels as usize;
    let src_width = source.width as usize;

    for y in 0..out_height {
        let src_y = ((y as f32 * inv_scale) as u32).min(source.height - 1) as usize;
        for x in 0..out_width {
            let src_x = ((x as f32 * inv_scale) as u32).min(source.width - 1) as usize;
            let sample_index = (src_y * src_width + src_x) * channels;
            let dst = bitmap.pixel_offset(x, y);

            for channel in 0..3 {
                let normalized = if source.bits_per_channel == 8 {
                    source.data[sample_index + channel] as f32 / 255.0
                } else {
                    let byte = (sample_index + channel) * 2;
                    u16::from_ne_bytes([source.data[byte], source.data[byte + 1]]) as f32
                        / 65535.0
                };
                bitmap.data[dst + channel] = shade(normalized, source.encoding, params);
            }
            bitmap.data[dst + 3] = 255;
        }
    }

    Ok(bitmap)
}

/// Re-runs the tone pipeline over an already-rendered RGBA bitmap, for the
/// case where a slider moves and only the display-encoded result of a
/// previous render is at hand.
pub fn readjust_in_place(bitmap: &mut Bitmap, params: &ShaderParams) {
    for y in 0..bitmap.height {
        for x in 0..bitmap.width {
            let px = bitmap.pixel_offset(x, y);
            for channel in 0..3 {
                let encoded = bitmap.data[px + channel] as f32 / 255.0;
                bitmap.data[px + channel] = shade(encoded, SampleEncoding::Srgb, params);
            }
            bitmap.data[px + 3] = 255;
        }
    }
}

/// One normalized source sample through decode (when display-encoded),
/// shader, encode and quantization.
#[inline]
fn shade(normalized: f32, encoding: SampleEncoding, params: &ShaderParams) -> u8 {
    let linear = match encoding {
        SampleEncoding::Linear => normalized,
        SampleEncoding::Srgb => srgb_decode(normalized),
    };
    let toned = tone::apply(linear, params);
    quantize_to_byte(srgb_encode(toned) * 255.0)
}
