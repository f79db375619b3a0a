//! Decode strategy: chooses between a full-resolution decode and the
//! embedded-preview fallback, then drives the resampler.
//!
//! Two entry points exist. The interactive preview path trades resolution
//! for latency (half-size decode, 1080p cap) and recovers codec failures by
//! rendering the RAW file's embedded preview: not every RAW format
//! guarantees a demosaicable full image, but nearly all carry a usable
//! preview. The export path attempts only the full decode: silently
//! substituting a preview for an explicit full-resolution request would
//! break the caller's contract.

use tracing::{info, info_span, instrument, warn};

use crate::render_pipeline::bitmap::{Bitmap, BitmapAllocator, HeapAllocator};
use crate::render_pipeline::codec::{
    CodecHandle, DecodeConfig, DecodedImage, LibRawCodec, RawCodec,
};
use crate::render_pipeline::common::error::{RenderError, Result};
use crate::render_pipeline::resample::{render_to_bitmap, OutputBound};
use crate::render_pipeline::tone::{Adjustments, ShaderParams};

pub struct RenderPipeline<C: RawCodec, A: BitmapAllocator> {
    codec: C,
    allocator: A,
}

impl RenderPipeline<LibRawCodec, HeapAllocator> {
    pub fn new() -> Self {
        Self {
            codec: LibRawCodec::new(),
            allocator: HeapAllocator,
        }
    }
}

impl Default for RenderPipeline<LibRawCodec, HeapAllocator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: RawCodec, A: BitmapAllocator> RenderPipeline<C, A> {
    pub fn with_custom(codec: C, allocator: A) -> Self {
        Self { codec, allocator }
    }

    /// Interactive preview render: half-size, camera-neutral decode capped
    /// at 1920x1080, falling back to the embedded preview when the codec
    /// reports a failure on the full-decode attempt.
    ///
    /// Every invocation is independent; no state is carried between calls.
    #[instrument(skip_all, fields(input_size = raw_data.len()))]
    pub fn render_preview(&self, raw_data: &[u8], adjustments: &Adjustments) -> Result<Bitmap> {
        let params = ShaderParams::derive(adjustments);
        let attempt = self.decode_and_render(
            raw_data,
            &params,
            &DecodeConfig::interactive_preview(),
            Some(OutputBound::FULL_HD),
        );

        let bitmap = match attempt {
            Ok(bitmap) => bitmap,
            Err(cause) if cause.is_codec_failure() => {
                warn!(%cause, "full decode failed, falling back to embedded preview");
                self.render_embedded_preview(raw_data, &params)?
            }
            Err(cause) => return Err(cause),
        };

        info!(width = bitmap.width, height = bitmap.height, "preview render complete");
        Ok(bitmap)
    }

    /// Full-resolution export render. No half-size, no fallback; the first
    /// failure is surfaced. An absent or zeroed bound means no cap.
    #[instrument(skip_all, fields(input_size = raw_data.len()))]
    pub fn render_full(
        &self,
        raw_data: &[u8],
        adjustments: &Adjustments,
        bound: Option<OutputBound>,
    ) -> Result<Bitmap> {
        let params = ShaderParams::derive(adjustments);
        let bitmap =
            self.decode_and_render(raw_data, &params, &DecodeConfig::full_resolution(), bound)?;

        info!(width = bitmap.width, height = bitmap.height, "full-resolution render complete");
        Ok(bitmap)
    }

    fn decode_and_render(
        &self,
        raw_data: &[u8],
        params: &ShaderParams,
        config: &DecodeConfig,
        bound: Option<OutputBound>,
    ) -> Result<Bitmap> {
        // The handle drops at the end of this block, releasing codec
        // buffers whether the decode succeeded or bailed early.
        let source = {
            let _span = info_span!("decode_raw", half_size = config.half_size).entered();
            let mut handle = self.codec.open_buffer(raw_data)?;
            handle.configure_and_unpack(config)?;
            handle.process_to_memory()?
        };

        self.resample(&source, params, bound)
    }

    fn render_embedded_preview(&self, raw_data: &[u8], params: &ShaderParams) -> Result<Bitmap> {
        // Codec failures here mean both decode paths are exhausted; they
        // surface as preview failures. Resampler and allocation errors keep
        // their own kinds.
        let source = {
            let _span = info_span!("decode_embedded_preview").entered();
            let mut handle = self.codec.open_buffer(raw_data).map_err(wrap_preview_failure)?;
            handle
                .unpack_embedded_preview()
                .map_err(wrap_preview_failure)?
        };

        self.resample(&source, params, Some(OutputBound::FULL_HD))
    }

    fn resample(
        &self,
        source: &DecodedImage,
        params: &ShaderParams,
        bound: Option<OutputBound>,
    ) -> Result<Bitmap> {
        let _span =
            info_span!("resample", width = source.width, height = source.height).entered();
        render_to_bitmap(source, params, bound, &self.allocator)
    }
}

/// Wraps preview-path failures so callers can distinguish "the preview
/// fallback also failed" from a first-attempt codec failure.
fn wrap_preview_failure(cause: RenderError) -> RenderError {
    match cause {
        already @ RenderError::PreviewDecodeFailed(_) => already,
        other => RenderError::PreviewDecodeFailed(other.to_string()),
    }
}
