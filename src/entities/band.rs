//! Tolerance band - signed percentage interval describing random spread

use serde::{Deserialize, Serialize};

/// Signed tolerance interval `[low%, high%]`
///
/// In configuration a band is written either as a single number `t`, meaning the
/// symmetric band `[-t, +t]`, or as a `[low, high]` pair for asymmetric spreads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "BandRepr", into = "BandRepr")]
pub struct ToleranceBand {
    /// Lower bound in percent (usually negative)
    pub low: f64,

    /// Upper bound in percent (usually positive)
    pub high: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum BandRepr {
    Symmetric(f64),
    Asymmetric(f64, f64),
}

impl From<BandRepr> for ToleranceBand {
    fn from(repr: BandRepr) -> Self {
        match repr {
            BandRepr::Symmetric(t) => ToleranceBand::symmetric(t),
            BandRepr::Asymmetric(low, high) => ToleranceBand::new(low, high),
        }
    }
}

impl From<ToleranceBand> for BandRepr {
    fn from(band: ToleranceBand) -> Self {
        BandRepr::Asymmetric(band.low, band.high)
    }
}

impl From<f64> for ToleranceBand {
    fn from(t: f64) -> Self {
        ToleranceBand::symmetric(t)
    }
}

impl From<(f64, f64)> for ToleranceBand {
    fn from((low, high): (f64, f64)) -> Self {
        ToleranceBand::new(low, high)
    }
}

impl ToleranceBand {
    /// Create a band from explicit bounds
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Create the symmetric band `[-t, +t]`
    pub fn symmetric(t: f64) -> Self {
        Self { low: -t, high: t }
    }

    /// True when the negative and positive halves have the same width
    pub fn is_symmetric(&self) -> bool {
        (self.low + self.high).abs() <= f64::EPSILON * self.high.abs().max(1.0)
    }

    /// Width of the band in percent
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Negative-side spread basis: how far the band reaches below zero
    pub fn lower_extent(&self) -> f64 {
        (-self.low).max(0.0)
    }

    /// Positive-side spread basis: how far the band reaches above zero
    pub fn upper_extent(&self) -> f64 {
        self.high.max(0.0)
    }

    /// Interpolate each bound independently toward `other` by `fraction` in `[0, 1]`
    pub fn lerp(&self, other: &ToleranceBand, fraction: f64) -> ToleranceBand {
        ToleranceBand {
            low: self.low + fraction * (other.low - self.low),
            high: self.high + fraction * (other.high - self.high),
        }
    }

    /// Validate band ordering; returns a human-readable reason on failure
    pub(crate) fn check(&self) -> Option<String> {
        if !self.low.is_finite() || !self.high.is_finite() {
            Some(format!(
                "tolerance band [{}, {}] must be finite",
                self.low, self.high
            ))
        } else if self.low > self.high {
            Some(format!(
                "tolerance band is inverted: low {} > high {}",
                self.low, self.high
            ))
        } else {
            None
        }
    }
}

impl std::fmt::Display for ToleranceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_symmetric() {
            write!(f, "±{}%", self.high)
        } else {
            write!(f, "[{}%, +{}%]", self.low, self.high)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_normalizes_to_symmetric() {
        let band = ToleranceBand::from(1.5);
        assert_eq!(band.low, -1.5);
        assert_eq!(band.high, 1.5);
        assert!(band.is_symmetric());
        assert!((band.width() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_asymmetric_extents() {
        let band = ToleranceBand::new(-2.0, 5.0);
        assert!(!band.is_symmetric());
        assert_eq!(band.lower_extent(), 2.0);
        assert_eq!(band.upper_extent(), 5.0);
    }

    #[test]
    fn test_offset_band_extents_clamp_at_zero() {
        let band = ToleranceBand::new(1.0, 3.0);
        assert_eq!(band.lower_extent(), 0.0);
        assert_eq!(band.upper_extent(), 3.0);
    }

    #[test]
    fn test_lerp_bounds_independently() {
        let room = ToleranceBand::new(-1.0, 1.0);
        let hot = ToleranceBand::new(-3.0, 2.0);
        let mid = room.lerp(&hot, 0.5);
        assert!((mid.low - (-2.0)).abs() < 1e-12);
        assert!((mid.high - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_check_rejects_inverted_band() {
        assert!(ToleranceBand::new(2.0, -2.0).check().is_some());
        assert!(ToleranceBand::symmetric(-1.0).check().is_some());
        assert!(ToleranceBand::new(f64::NAN, 1.0).check().is_some());
        assert!(ToleranceBand::symmetric(0.0).check().is_none());
    }

    #[test]
    fn test_yaml_scalar_and_pair() {
        let band: ToleranceBand = serde_yml::from_str("0.5").unwrap();
        assert_eq!(band, ToleranceBand::symmetric(0.5));

        let band: ToleranceBand = serde_yml::from_str("[-2, 3]").unwrap();
        assert_eq!(band, ToleranceBand::new(-2.0, 3.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(ToleranceBand::symmetric(1.0).to_string(), "±1%");
        assert_eq!(ToleranceBand::new(-2.0, 3.0).to_string(), "[-2%, +3%]");
    }
}
