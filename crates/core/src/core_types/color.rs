//! RGB color with HSL construction
//!
//! Particle colors are picked on the HSL wheel (fixed hue, full saturation,
//! random lightness) and stored as RGB triples for upload.

use serde::{Deserialize, Serialize};

const ONE_THIRD: f32 = 1.0 / 3.0;
const ONE_SIXTH: f32 = 1.0 / 6.0;
const TWO_THIRDS: f32 = 2.0 / 3.0;

/// Color with red, green and blue channels in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Rgb { r, g, b }
    }

    /// Convert hue, saturation and lightness to RGB.
    ///
    /// `h` wraps around the unit wheel (so 1.1 is the same hue as 0.1);
    /// `s` and `l` are clamped to [0, 1].
    ///
    /// # Example
    ///
    /// ```
    /// use fire_particles_core::Rgb;
    ///
    /// // Amber at half lightness
    /// let amber = Rgb::from_hsl(0.1, 1.0, 0.5);
    /// assert!((amber.r - 1.0).abs() < 1e-6);
    /// assert!((amber.g - 0.6).abs() < 1e-6);
    /// assert!(amber.b.abs() < 1e-6);
    /// ```
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(1.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        if s == 0.0 {
            return Rgb::new(l, l, l);
        }

        let p = if l <= 0.5 {
            l * (1.0 + s)
        } else {
            l + s - l * s
        };
        let q = 2.0 * l - p;

        Rgb::new(
            hue_to_channel(q, p, h + ONE_THIRD),
            hue_to_channel(q, p, h),
            hue_to_channel(q, p, h - ONE_THIRD),
        )
    }

    /// Channels as an array, in upload order.
    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Read a color back from a packed buffer lane of exactly three floats.
    #[inline]
    pub(crate) fn from_slice(rgb: &[f32]) -> Self {
        Rgb::new(rgb[0], rgb[1], rgb[2])
    }
}

/// One channel of the piecewise-linear HSL ramp.
#[inline]
fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < ONE_SIXTH {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < TWO_THIRDS {
        p + (q - p) * 6.0 * (TWO_THIRDS - t)
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_primary_hues() {
        let red = Rgb::from_hsl(0.0, 1.0, 0.5);
        assert_relative_eq!(red.r, 1.0, epsilon = 1e-6);
        assert_relative_eq!(red.g, 0.0, epsilon = 1e-6);
        assert_relative_eq!(red.b, 0.0, epsilon = 1e-6);

        let green = Rgb::from_hsl(ONE_THIRD, 1.0, 0.5);
        assert_relative_eq!(green.r, 0.0, epsilon = 1e-5);
        assert_relative_eq!(green.g, 1.0, epsilon = 1e-5);
        assert_relative_eq!(green.b, 0.0, epsilon = 1e-5);

        let blue = Rgb::from_hsl(TWO_THIRDS, 1.0, 0.5);
        assert_relative_eq!(blue.r, 0.0, epsilon = 1e-5);
        assert_relative_eq!(blue.g, 0.0, epsilon = 1e-5);
        assert_relative_eq!(blue.b, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_grey_when_unsaturated() {
        let grey = Rgb::from_hsl(0.42, 0.0, 0.3);
        assert_eq!(grey, Rgb::new(0.3, 0.3, 0.3));
    }

    #[test]
    fn test_lightness_extremes() {
        assert_eq!(Rgb::from_hsl(0.1, 1.0, 1.0), Rgb::WHITE);
        assert_eq!(Rgb::from_hsl(0.1, 1.0, 0.0), Rgb::BLACK);
    }

    #[test]
    fn test_amber_ramp() {
        // Full saturation at hue 0.1: red pinned, blue follows 2l - 1
        for l in [0.5_f32, 0.6, 0.75, 0.9, 0.999] {
            let c = Rgb::from_hsl(0.1, 1.0, l);
            let q = 2.0 * l - 1.0;
            assert_relative_eq!(c.r, 1.0, epsilon = 1e-6);
            assert_relative_eq!(c.g, q + (1.0 - q) * 0.6, epsilon = 1e-5);
            assert_relative_eq!(c.b, q, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_hue_wraps() {
        let a = Rgb::from_hsl(0.1, 1.0, 0.7);
        let b = Rgb::from_hsl(1.1, 1.0, 0.7);
        let c = Rgb::from_hsl(-0.9, 1.0, 0.7);
        assert_relative_eq!(a.g, b.g, epsilon = 1e-5);
        assert_relative_eq!(a.g, c.g, epsilon = 1e-5);
    }

    #[test]
    fn test_from_slice_reads_packed_lane() {
        let packed = [0.1_f32, 0.2, 0.3, 0.9, 0.8, 0.7];
        assert_eq!(Rgb::from_slice(&packed[3..6]), Rgb::new(0.9, 0.8, 0.7));
        assert_eq!(Rgb::from_slice(&Rgb::WHITE.to_array()), Rgb::WHITE);
    }
}
