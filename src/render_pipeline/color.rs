//! sRGB transfer functions and final byte quantization.
//!
//! These are the only gamma-domain crossings in the pipeline and they must
//! be bit-for-bit deterministic across platforms, so everything here goes
//! through plain `f32::powf` with no fast-math shortcuts.

/// Linear-light value at which the sRGB encode switches from the linear
/// segment to the power segment.
const ENCODE_KNEE: f32 = 0.0031308;

/// Encoded value at which the sRGB decode switches segments.
const DECODE_KNEE: f32 = 0.04045;

/// Encodes a linear sample into the sRGB transfer curve.
///
/// Negative inputs clamp to 0. No upper clamp is applied; overflow is
/// handled by [`quantize_to_byte`] at the end of the pixel pipeline.
#[inline]
pub fn srgb_encode(linear: f32) -> f32 {
    let v = linear.max(0.0);
    if v <= ENCODE_KNEE {
        12.92 * v
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

/// Inverse of [`srgb_encode`]: recovers a linear sample from an
/// sRGB-encoded one.
#[inline]
pub fn srgb_decode(encoded: f32) -> f32 {
    let v = encoded.max(0.0);
    if v <= DECODE_KNEE {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Rounds to the nearest byte value, half-up on the 0.5 boundary, clamping
/// at both ends.
#[inline]
pub fn quantize_to_byte(value: f32) -> u8 {
    if value <= 0.0 {
        return 0;
    }
    if value >= 255.0 {
        return 255;
    }
    (value + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_clamps_at_both_ends() {
        assert_eq!(quantize_to_byte(-1.0), 0);
        assert_eq!(quantize_to_byte(0.0), 0);
        assert_eq!(quantize_to_byte(255.0), 255);
        assert_eq!(quantize_to_byte(256.0), 255);
    }

    #[test]
    fn quantize_rounds_half_up() {
        assert_eq!(quantize_to_byte(127.5), 128);
        assert_eq!(quantize_to_byte(127.49), 127);
        assert_eq!(quantize_to_byte(0.5), 1);
    }

    #[test]
    fn quantize_is_monotonic() {
        let mut previous = 0u8;
        for step in 0..=2550 {
            let value = step as f32 * 0.1;
            let quantized = quantize_to_byte(value);
            assert!(quantized >= previous, "regressed at input {}", value);
            previous = quantized;
        }
    }

    #[test]
    fn quantize_is_idempotent_on_byte_values() {
        for byte in 0..=255u8 {
            assert_eq!(quantize_to_byte(byte as f32), byte);
        }
    }

    #[test]
    fn srgb_round_trip() {
        for step in 0..=1000 {
            let v = step as f32 / 1000.0;
            let round_tripped = srgb_decode(srgb_encode(v));
            assert!(
                (round_tripped - v).abs() < 1e-4,
                "round trip of {} gave {}",
                v,
                round_tripped
            );
        }
    }

    #[test]
    fn srgb_encode_linear_segment() {
        assert!((srgb_encode(0.001) - 0.01292).abs() < 1e-6);
        assert_eq!(srgb_encode(-0.5), 0.0);
    }

    #[test]
    fn srgb_decode_linear_segment() {
        assert!((srgb_decode(0.01292) - 0.001).abs() < 1e-6);
        assert_eq!(srgb_decode(-0.5), 0.0);
    }
}
