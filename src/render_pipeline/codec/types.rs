//! Codec-facing data types and per-render decode configuration.

/// How the codec's output samples are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleEncoding {
    /// Scene-linear samples (the codec was asked for gamma 1.0 output).
    Linear,
    /// Display-encoded sRGB samples (embedded previews, already-rendered
    /// bitmaps being re-adjusted).
    Srgb,
}

/// Read-only pixel buffer produced by the RAW codec.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Interleaved channels per pixel; at least 3 for renderable input.
    pub channels: u8,
    /// 8 or 16 for renderable input.
    pub bits_per_channel: u8,
    pub encoding: SampleEncoding,
    /// Interleaved samples. 16-bit samples occupy two native-endian bytes.
    pub data: Vec<u8>,
}

/// White balance handling for the demosaic step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WhiteBalanceMode {
    /// No adjustment; raw sensor ratios.
    #[default]
    None,
    /// Multipliers recorded by the camera.
    Camera,
    /// Average over the whole image.
    Auto,
}

/// Configuration for one decode. A fresh value is constructed per render so
/// no codec settings leak between calls.
#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// Half-size demosaic (2x2 binning) for speed.
    pub half_size: bool,
    /// Output bit depth requested from the codec (8 or 16).
    pub output_bits: u8,
    /// Highlight recovery mode: 0 clip, 1 unclip, 2 blend, 3+ rebuild.
    pub highlight_mode: u8,
    pub white_balance: WhiteBalanceMode,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            half_size: false,
            output_bits: 16,
            highlight_mode: 3,
            white_balance: WhiteBalanceMode::None,
        }
    }
}

impl DecodeConfig {
    pub fn builder() -> DecodeConfigBuilder {
        DecodeConfigBuilder::default()
    }

    /// Interactive preview settings: half-size demosaic, 16-bit linear
    /// output, highlight rebuild, no automatic brightness anywhere; the
    /// shader owns every brightness decision.
    pub fn interactive_preview() -> Self {
        Self {
            half_size: true,
            ..Self::default()
        }
    }

    /// Full-resolution export settings.
    pub fn full_resolution() -> Self {
        Self::default()
    }
}

/// Builder for [`DecodeConfig`].
#[derive(Default)]
pub struct DecodeConfigBuilder {
    half_size: Option<bool>,
    output_bits: Option<u8>,
    highlight_mode: Option<u8>,
    white_balance: Option<WhiteBalanceMode>,
}

impl DecodeConfigBuilder {
    pub fn half_size(mut self, half_size: bool) -> Self {
        self.half_size = Some(half_size);
        self
    }

    pub fn output_bits(mut self, bits: u8) -> Self {
        self.output_bits = Some(bits);
        self
    }

    pub fn highlight_mode(mut self, mode: u8) -> Self {
        self.highlight_mode = Some(mode);
        self
    }

    pub fn white_balance(mut self, mode: WhiteBalanceMode) -> Self {
        self.white_balance = Some(mode);
        self
    }

    pub fn build(self) -> DecodeConfig {
        let default = DecodeConfig::default();
        DecodeConfig {
            half_size: self.half_size.unwrap_or(default.half_size),
            output_bits: self.output_bits.unwrap_or(default.output_bits),
            highlight_mode: self.highlight_mode.unwrap_or(default.highlight_mode),
            white_balance: self.white_balance.unwrap_or(default.white_balance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_config_is_half_size_linear() {
        let config = DecodeConfig::interactive_preview();
        assert!(config.half_size);
        assert_eq!(config.output_bits, 16);
        assert_eq!(config.highlight_mode, 3);
        assert_eq!(config.white_balance, WhiteBalanceMode::None);
    }

    #[test]
    fn export_config_is_full_size() {
        assert!(!DecodeConfig::full_resolution().half_size);
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = DecodeConfig::builder()
            .half_size(true)
            .output_bits(8)
            .highlight_mode(0)
            .white_balance(WhiteBalanceMode::Camera)
            .build();
        assert!(config.half_size);
        assert_eq!(config.output_bits, 8);
        assert_eq!(config.highlight_mode, 0);
        assert_eq!(config.white_balance, WhiteBalanceMode::Camera);
    }
}
