//! RAW-to-display rendering pipeline
//!
//! Turns a camera RAW byte buffer into a display-ready RGBA bitmap:
//! the decode strategy drives the external codec (full decode with an
//! embedded-preview fallback for interactive use), the resampler scales
//! the decoded buffer to fit, and the tone shader maps every sample into
//! display range from four user sliders.

pub mod bitmap;
pub mod codec;
pub mod color;
pub mod common;
pub mod pipeline;
pub mod resample;
pub mod tone;


pub use bitmap::{Bitmap, BitmapAllocator, HeapAllocator};
pub use codec::{
    CodecHandle, DecodeConfig, DecodeConfigBuilder, DecodedImage, LibRawCodec, RawCodec,
    SampleEncoding, WhiteBalanceMode,
};
pub use common::{RenderError, Result};
pub use pipeline::RenderPipeline;
pub use resample::{readjust_in_place, render_to_bitmap, OutputBound};
pub use tone::{Adjustments, ShaderParams};
