//! The external RAW codec boundary: data types, the trait seam consumed by
//! the decode strategy, and the LibRaw implementation.

mod libraw_codec;
mod reader;
mod types;

pub use libraw_codec::LibRawCodec;
pub use reader::{CodecHandle, RawCodec};
pub use types::{
    DecodeConfig, DecodeConfigBuilder, DecodedImage, SampleEncoding, WhiteBalanceMode,
};
