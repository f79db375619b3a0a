use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to open RAW buffer: {0}")]
    CodecOpenFailed(String),

    #[error("Failed to unpack RAW data: {0}")]
    CodecUnpackFailed(String),

    #[error("RAW processing failed: {0}")]
    CodecProcessFailed(String),

    #[error("Unsupported source format: type={kind} colors={channels} bits={bits}")]
    UnsupportedSourceFormat { kind: i32, channels: i32, bits: i32 },

    #[error("Unsupported channel layout: {0} channels")]
    UnsupportedChannelLayout(u8),

    #[error("Unsupported bit depth: {0} bits per channel")]
    UnsupportedBitDepth(u8),

    #[error("Failed to allocate destination bitmap: {0}")]
    BitmapAllocationFailed(String),

    #[error("Embedded preview decode failed: {0}")]
    PreviewDecodeFailed(String),
}

impl RenderError {
    /// True for failures reported by the RAW codec itself (corrupt buffer,
    /// unsupported sensor, internal processing error). The interactive
    /// preview path recovers these by falling back to the embedded preview;
    /// everything else is terminal for the render.
    pub fn is_codec_failure(&self) -> bool {
        matches!(
            self,
            RenderError::CodecOpenFailed(_)
                | RenderError::CodecUnpackFailed(_)
                | RenderError::CodecProcessFailed(_)
                | RenderError::UnsupportedSourceFormat { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
