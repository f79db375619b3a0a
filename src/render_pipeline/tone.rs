//! Slider-driven tone-mapping shader.
//!
//! Four user sliders are folded once per render into [`ShaderParams`], then
//! [`apply`] runs per sample: exposure and whites/blacks shaping in the
//! scene-linear domain, shadow lift, a soft knee into the highlight
//! shoulder, midtone contrast around 0.18 gray, and a final Reinhard
//! compression into display range.

/// User-facing adjustment sliders, immutable for the duration of a render.
///
/// `exposure_multiplier` is a linear gain (2^EV). `contrast`, `whites` and
/// `blacks` are unbounded slider values.
#[derive(Debug, Clone, Copy)]
pub struct Adjustments {
    pub exposure_multiplier: f32,
    pub contrast: f32,
    pub whites: f32,
    pub blacks: f32,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            exposure_multiplier: 1.0,
            contrast: 1.0,
            whites: 0.0,
            blacks: 0.0,
        }
    }
}

/// Photographic mid-gray reference the contrast stage pivots on.
const MID_GRAY: f32 = 0.18;

/// Scene headroom with exposure at 0 EV; widened as exposure increases.
const BASE_WHITE_POINT: f32 = 6.0;

/// Fraction of the white point where the highlight knee begins.
const KNEE_START_FRACTION: f32 = 0.82;

/// Per-render shader parameters derived from [`Adjustments`], computed once
/// and reused for every pixel.
#[derive(Debug, Clone, Copy)]
pub struct ShaderParams {
    pub exposure: f32,
    pub contrast: f32,
    pub whites: f32,
    pub blacks: f32,
    pub white_point: f32,
    pub toe_strength: f32,
    pub shoulder_strength: f32,
    pub shadow_lift: f32,
}

impl ShaderParams {
    /// Derives shader parameters from the raw slider values.
    ///
    /// Guarantees `exposure >= 1e-5`, `contrast >= 0.1` and
    /// `white_point >= 6.0`. Brightening widens the white point and
    /// strengthens the shoulder; darkening strengthens the toe and adds
    /// shadow lift.
    pub fn derive(adjustments: &Adjustments) -> Self {
        let exposure = adjustments.exposure_multiplier.max(1e-5);
        let ev = exposure.log2();
        Self {
            exposure,
            contrast: adjustments.contrast.max(0.1),
            whites: adjustments.whites,
            blacks: adjustments.blacks,
            white_point: BASE_WHITE_POINT + ev.max(0.0) * 1.25,
            toe_strength: 0.18 + (-ev).max(0.0) * 0.05,
            shoulder_strength: 0.38 + ev.max(0.0) * 0.10,
            shadow_lift: 0.01 + (-ev).max(0.0) * 0.010,
        }
    }

    /// Neutral parameters: unity exposure and contrast, no whites/blacks.
    pub fn neutral() -> Self {
        Self::derive(&Adjustments::default())
    }
}

/// Maps one scene-linear sample to a display-range sample in `[0, 1)`.
///
/// The stage ordering matters: shadow lift runs before the highlight knee
/// so a lifted sample cannot slip past the rolloff, and contrast is the
/// last linear-domain operation so its scaling is unaffected by the knee's
/// local nonlinearity.
#[inline]
pub fn apply(sample: f32, params: &ShaderParams) -> f32 {
    let mut scene = sample.max(0.0) * params.exposure;

    if params.whites != 0.0 {
        scene *= 1.0 + params.whites * 0.1;
    }
    if params.blacks != 0.0 {
        scene = (scene + params.blacks * 0.01).max(0.0);
    }

    // The exponential mask saturates as the sample brightens, so the lift
    // lands almost entirely on near-black samples.
    scene += params.shadow_lift * (1.0 - (-scene * 12.0).exp());

    let knee_start = params.white_point * KNEE_START_FRACTION;
    if scene > knee_start {
        let range = (params.white_point - knee_start).max(1e-3);
        let t = (scene - knee_start) / range;
        let knee = 1.0 - (-params.shoulder_strength * t).exp();
        scene = knee_start + range * knee;
    }

    let contrasted = if scene > 1e-5 {
        (scene / MID_GRAY).powf(params.contrast) * MID_GRAY
    } else {
        scene
    };

    contrasted / (contrasted + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_applies_floors() {
        let params = ShaderParams::derive(&Adjustments {
            exposure_multiplier: -4.0,
            contrast: -2.0,
            whites: 0.0,
            blacks: 0.0,
        });
        assert_eq!(params.exposure, 1e-5);
        assert_eq!(params.contrast, 0.1);
        assert!(params.white_point >= 6.0);
    }

    #[test]
    fn derive_neutral_values() {
        let params = ShaderParams::neutral();
        assert_eq!(params.exposure, 1.0);
        assert_eq!(params.contrast, 1.0);
        assert_eq!(params.white_point, 6.0);
        assert!((params.toe_strength - 0.18).abs() < 1e-6);
        assert!((params.shoulder_strength - 0.38).abs() < 1e-6);
        assert!((params.shadow_lift - 0.01).abs() < 1e-6);
    }

    #[test]
    fn derive_widens_headroom_when_brightening() {
        let brightened = ShaderParams::derive(&Adjustments {
            exposure_multiplier: 4.0, // +2 EV
            ..Adjustments::default()
        });
        assert!((brightened.white_point - 8.5).abs() < 1e-5);
        assert!((brightened.shoulder_strength - 0.58).abs() < 1e-5);
        // Darkening-side responses stay at base when brightening.
        assert!((brightened.toe_strength - 0.18).abs() < 1e-6);
        assert!((brightened.shadow_lift - 0.01).abs() < 1e-6);
    }

    #[test]
    fn derive_protects_shadows_when_darkening() {
        let darkened = ShaderParams::derive(&Adjustments {
            exposure_multiplier: 0.25, // -2 EV
            ..Adjustments::default()
        });
        assert_eq!(darkened.white_point, 6.0);
        assert!((darkened.toe_strength - 0.28).abs() < 1e-5);
        assert!((darkened.shadow_lift - 0.03).abs() < 1e-5);
    }

    #[test]
    fn mid_gray_neutral_baseline() {
        // 0.18 through the neutral shader: shadow lift raises it to
        // 0.18 + 0.01 * (1 - e^-2.16) = 0.18884675, the knee and contrast
        // stages pass it through, Reinhard compresses to x / (x + 1).
        let out = apply(0.18, &ShaderParams::neutral());
        assert!((out - 0.158848).abs() < 1e-4, "got {}", out);
    }

    #[test]
    fn zero_sample_stays_near_black() {
        let out = apply(0.0, &ShaderParams::neutral());
        // Only the shadow lift contributes, and exp(0) kills it entirely.
        assert_eq!(out, 0.0);
    }

    #[test]
    fn exposure_response_is_monotonic() {
        for &sample in &[0.01f32, 0.18, 0.5, 1.0, 3.0] {
            let mut previous = f32::MIN;
            for step in 0..40 {
                let multiplier = 0.1 + step as f32 * 0.25;
                let params = ShaderParams::derive(&Adjustments {
                    exposure_multiplier: multiplier,
                    ..Adjustments::default()
                });
                let out = apply(sample, &params);
                assert!(
                    out > previous,
                    "not increasing at sample {} multiplier {}",
                    sample,
                    multiplier
                );
                previous = out;
            }
        }
    }

    #[test]
    fn output_stays_in_display_range() {
        let params = ShaderParams::derive(&Adjustments {
            exposure_multiplier: 32.0,
            contrast: 3.0,
            whites: 5.0,
            blacks: -5.0,
        });
        for step in 0..200 {
            let sample = step as f32 * 0.1;
            let out = apply(sample, &params);
            assert!((0.0..1.0).contains(&out), "out of range: {}", out);
        }
    }

    #[test]
    fn whites_slider_brightens_highlights() {
        let neutral = ShaderParams::neutral();
        let pushed = ShaderParams::derive(&Adjustments {
            whites: 2.0,
            ..Adjustments::default()
        });
        assert!(apply(0.8, &pushed) > apply(0.8, &neutral));
    }

    #[test]
    fn blacks_slider_cuts_darks_to_floor() {
        let crushed = ShaderParams::derive(&Adjustments {
            blacks: -10.0,
            ..Adjustments::default()
        });
        // -10 * 0.01 wipes out a 0.05 sample entirely; the lift mask is
        // zero at scene 0, so the result is exactly black.
        assert_eq!(apply(0.05, &crushed), 0.0);
    }

    #[test]
    fn highlight_knee_compresses_above_knee_start() {
        let params = ShaderParams::neutral();
        // knee_start = 6.0 * 0.82 = 4.92; inputs above it must stay below
        // the white point after the rolloff.
        let toned = apply(20.0, &params);
        let ceiling = apply(1_000.0, &params);
        assert!(toned < ceiling);
        assert!(ceiling < 1.0);
    }
}
