//! LibRaw-backed implementation of the codec seam.
//!
//! The call sequence mirrors LibRaw's C API: `open_buffer`, parameter
//! writes, `unpack`, `dcraw_process`, `dcraw_make_mem_image`, with
//! `unpack_thumb` / `dcraw_make_mem_thumb` for the embedded preview. The
//! handle owns the `libraw_data_t` and recycles it on drop, so codec
//! buffers never outlive the render that opened them.

use std::ffi::CStr;
use std::os::raw::{c_int, c_void};

use rsraw_sys as sys;
use tracing::debug;

use crate::render_pipeline::codec::reader::{CodecHandle, RawCodec};
use crate::render_pipeline::codec::types::{
    DecodeConfig, DecodedImage, SampleEncoding, WhiteBalanceMode,
};
use crate::render_pipeline::common::error::{RenderError, Result};

/// `libraw_processed_image_t.type` values.
const LIBRAW_IMAGE_JPEG: i32 = 1;
const LIBRAW_IMAGE_BITMAP: i32 = 2;

/// The external RAW codec, consumed through [`RawCodec`].
pub struct LibRawCodec;

impl LibRawCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LibRawCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// One opened LibRaw instance plus a private copy of the input bytes.
///
/// LibRaw keeps reading from the buffer it was opened on, so the handle
/// owns its copy for as long as the decode runs.
pub struct LibRawHandle {
    raw: *mut sys::libraw_data_t,
    buffer: Vec<u8>,
}

// The handle is confined to one render at a time; it may move between
// worker threads but is never shared.
unsafe impl Send for LibRawHandle {}

fn codec_message(code: c_int) -> String {
    let msg = unsafe { sys::libraw_strerror(code) };
    if msg.is_null() {
        format!("libraw error {}", code)
    } else {
        unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
    }
}

impl RawCodec for LibRawCodec {
    type Handle = LibRawHandle;

    fn open_buffer(&self, data: &[u8]) -> Result<LibRawHandle> {
        let raw = unsafe { sys::libraw_init(0) };
        if raw.is_null() {
            return Err(RenderError::CodecOpenFailed(
                "libraw_init returned null".to_string(),
            ));
        }
        // Constructed before open so the instance is recycled on failure.
        let handle = LibRawHandle {
            raw,
            buffer: data.to_vec(),
        };

        let ret = unsafe {
            sys::libraw_open_buffer(
                handle.raw,
                handle.buffer.as_ptr() as *mut c_void,
                handle.buffer.len(),
            )
        };
        if ret != 0 {
            return Err(RenderError::CodecOpenFailed(codec_message(ret)));
        }

        debug!(bytes = handle.buffer.len(), "opened RAW buffer");
        Ok(handle)
    }
}

impl CodecHandle for LibRawHandle {
    fn configure_and_unpack(&mut self, config: &DecodeConfig) -> Result<()> {
        unsafe {
            let params = &mut (*self.raw).params;

            // Camera-neutral processing: the tone shader owns every
            // brightness decision, so LibRaw's auto brightness and
            // exposure correction stay off and output is linear.
            params.no_auto_bright = 1;
            params.exp_correc = 0;
            params.gamm[0] = 1.0;
            params.gamm[1] = 1.0;

            params.half_size = if config.half_size { 1 } else { 0 };
            params.output_bps = config.output_bits as c_int;
            params.highlight = config.highlight_mode as c_int;

            match config.white_balance {
                WhiteBalanceMode::None => {
                    params.use_camera_wb = 0;
                    params.use_auto_wb = 0;
                }
                WhiteBalanceMode::Camera => {
                    params.use_camera_wb = 1;
                    params.use_auto_wb = 0;
                }
                WhiteBalanceMode::Auto => {
                    params.use_camera_wb = 0;
                    params.use_auto_wb = 1;
                }
            }
        }

        let ret = unsafe { sys::libraw_unpack(self.raw) };
        if ret != 0 {
            return Err(RenderError::CodecUnpackFailed(codec_message(ret)));
        }
        Ok(())
    }

    fn process_to_memory(&mut self) -> Result<DecodedImage> {
        let ret = unsafe { sys::libraw_dcraw_process(self.raw) };
        if ret != 0 {
            return Err(RenderError::CodecProcessFailed(codec_message(ret)));
        }

        let mut errc: c_int = 0;
        let processed = unsafe { sys::libraw_dcraw_make_mem_image(self.raw, &mut errc) };
        if processed.is_null() || errc != 0 {
            if !processed.is_null() {
                unsafe { sys::libraw_dcraw_clear_mem(processed) };
            }
            return Err(RenderError::CodecProcessFailed(codec_message(errc)));
        }

        let result = unsafe { copy_bitmap_image(processed, SampleEncoding::Linear) };
        unsafe { sys::libraw_dcraw_clear_mem(processed) };
        result
    }

    fn unpack_embedded_preview(&mut self) -> Result<DecodedImage> {
        let ret = unsafe { sys::libraw_unpack_thumb(self.raw) };
        if ret != 0 {
            return Err(RenderError::CodecUnpackFailed(codec_message(ret)));
        }

        let mut errc: c_int = 0;
        let thumb = unsafe { sys::libraw_dcraw_make_mem_thumb(self.raw, &mut errc) };
        if thumb.is_null() || errc != 0 {
            if !thumb.is_null() {
                unsafe { sys::libraw_dcraw_clear_mem(thumb) };
            }
            return Err(RenderError::CodecProcessFailed(codec_message(errc)));
        }

        let result = unsafe { decode_preview_image(thumb) };
        unsafe { sys::libraw_dcraw_clear_mem(thumb) };
        result
    }
}

impl Drop for LibRawHandle {
    fn drop(&mut self) {
        unsafe {
            sys::libraw_recycle(self.raw);
            sys::libraw_close(self.raw);
        }
    }
}

/// Copies a LibRaw bitmap-type processed image into an owned buffer.
///
/// # Safety
///
/// `processed` must point to a live `libraw_processed_image_t` whose
/// `data_size` matches the trailing data block.
unsafe fn copy_bitmap_image(
    processed: *const sys::libraw_processed_image_t,
    encoding: SampleEncoding,
) -> Result<DecodedImage> {
    let header = unsafe { &*processed };
    let kind = header.type_ as i32;
    if kind != LIBRAW_IMAGE_BITMAP
        || (header.bits != 8 && header.bits != 16)
        || header.colors < 3
    {
        return Err(RenderError::UnsupportedSourceFormat {
            kind,
            channels: header.colors as i32,
            bits: header.bits as i32,
        });
    }

    let data = unsafe {
        std::slice::from_raw_parts(header.data.as_ptr(), header.data_size as usize)
    }
    .to_vec();

    Ok(DecodedImage {
        width: header.width as u32,
        height: header.height as u32,
        channels: header.colors as u8,
        bits_per_channel: header.bits as u8,
        encoding,
        data,
    })
}

/// Decodes an embedded preview: compressed previews go through the JPEG
/// decoder, bitmap previews are copied directly. Either way the samples
/// are display-encoded.
///
/// # Safety
///
/// Same requirements as [`copy_bitmap_image`].
unsafe fn decode_preview_image(
    thumb: *const sys::libraw_processed_image_t,
) -> Result<DecodedImage> {
    let header = unsafe { &*thumb };
    let kind = header.type_ as i32;
    match kind {
        LIBRAW_IMAGE_JPEG => {
            let bytes = unsafe {
                std::slice::from_raw_parts(header.data.as_ptr(), header.data_size as usize)
            };
            let decoded = image::load_from_memory(bytes)
                .map_err(|e| RenderError::PreviewDecodeFailed(e.to_string()))?
                .into_rgb8();
            debug!(
                width = decoded.width(),
                height = decoded.height(),
                "decoded JPEG preview"
            );
            Ok(DecodedImage {
                width: decoded.width(),
                height: decoded.height(),
                channels: 3,
                bits_per_channel: 8,
                encoding: SampleEncoding::Srgb,
                data: decoded.into_raw(),
            })
        }
        LIBRAW_IMAGE_BITMAP => unsafe { copy_bitmap_image(thumb, SampleEncoding::Srgb) },
        _ => Err(RenderError::UnsupportedSourceFormat {
            kind,
            channels: header.colors as i32,
            bits: header.bits as i32,
        }),
    }
}
