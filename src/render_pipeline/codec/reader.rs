use crate::render_pipeline::codec::types::{DecodeConfig, DecodedImage};
use crate::render_pipeline::common::error::Result;

/// Entry point into the external RAW codec.
pub trait RawCodec {
    type Handle: CodecHandle;

    fn open_buffer(&self, data: &[u8]) -> Result<Self::Handle>;
}

/// One opened RAW buffer, scoped to a single render.
///
/// Dropping the handle releases every intermediate buffer the codec
/// allocated, on success, recovered failure and `?`-propagated failure
/// alike. Handles are not safe for concurrent reuse; each in-flight render
/// opens its own.
pub trait CodecHandle {
    /// Applies the decode configuration and unpacks the sensor data.
    fn configure_and_unpack(&mut self, config: &DecodeConfig) -> Result<()>;

    /// Demosaics and returns the full processed image.
    fn process_to_memory(&mut self) -> Result<DecodedImage>;

    /// Extracts the camera-embedded preview, decoding it to pixel samples
    /// if it is stored compressed.
    fn unpack_embedded_preview(&mut self) -> Result<DecodedImage>;
}
