//! Element entity - one circuit element's nominal value and its error sources
//!
//! Two independent error sources act on every element:
//! - random manufacturing spread, drawn from a normal distribution whose band edge
//!   sits at ±`sigma` standard deviations (the band may widen with temperature)
//! - deterministic thermal drift, `temperature_coefficient` ppm/°C away from 25 °C
//!
//! The two combine additively in percent.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, ToleranceError};
use crate::entities::band::ToleranceBand;

/// Reference temperature for tolerance bands and temperature coefficients (°C)
pub const ROOM_TEMPERATURE: f64 = 25.0;

/// Default number of standard deviations a tolerance band edge represents
pub const DEFAULT_SIGMA: f64 = 4.5;

fn default_sigma() -> f64 {
    DEFAULT_SIGMA
}

/// Construction record for an [`Element`]
///
/// Deserializes from the same record shape used in circuit YAML files; the short
/// legacy key names (`typ_value`, `room_temp_tolerance`, ...) are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    /// Unique identifier (e.g., "R1", "Vin")
    pub symbol: String,

    /// Nominal value
    #[serde(alias = "typ_value")]
    pub typical_value: f64,

    /// Random spread at 25 °C, in percent
    #[serde(alias = "room_temp_tolerance")]
    pub room_temperature_tolerance: ToleranceBand,

    /// Thermal drift in ppm/°C
    #[serde(alias = "temp_coefficient")]
    pub temperature_coefficient: f64,

    /// Random spread at `max_operating_temperature`
    #[serde(
        default,
        alias = "max_temp_tolerance",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_temperature_tolerance: Option<ToleranceBand>,

    /// Temperature at which `max_temperature_tolerance` applies (°C)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_operating_temperature: Option<f64>,

    /// Standard deviations represented by the band edge
    #[serde(default = "default_sigma")]
    pub sigma: f64,

    /// Seed for this element's random generator; OS entropy when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl ElementSpec {
    /// Create a spec with the required fields and default optional ones
    pub fn new(
        symbol: impl Into<String>,
        typical_value: f64,
        room_temperature_tolerance: impl Into<ToleranceBand>,
        temperature_coefficient: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            typical_value,
            room_temperature_tolerance: room_temperature_tolerance.into(),
            temperature_coefficient,
            max_temperature_tolerance: None,
            max_operating_temperature: None,
            sigma: DEFAULT_SIGMA,
            seed: None,
        }
    }

    /// Set the band that applies at the maximum operating temperature
    pub fn with_max_temperature(
        mut self,
        tolerance: impl Into<ToleranceBand>,
        temperature: f64,
    ) -> Self {
        self.max_temperature_tolerance = Some(tolerance.into());
        self.max_operating_temperature = Some(temperature);
        self
    }

    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the construction invariants without building the element
    pub fn validate(&self) -> Result<()> {
        let symbol = self.symbol.as_str();

        if symbol.trim().is_empty() {
            return Err(ToleranceError::invalid(symbol, "symbol must not be empty"));
        }
        if !self.typical_value.is_finite() {
            return Err(ToleranceError::invalid(
                symbol,
                format!("typical value {} is not finite", self.typical_value),
            ));
        }
        if !self.temperature_coefficient.is_finite() {
            return Err(ToleranceError::invalid(
                symbol,
                "temperature coefficient is not finite",
            ));
        }
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(ToleranceError::invalid(
                symbol,
                format!("sigma must be positive, got {}", self.sigma),
            ));
        }
        if let Some(reason) = self.room_temperature_tolerance.check() {
            return Err(ToleranceError::invalid(symbol, reason));
        }

        if let Some(max_band) = &self.max_temperature_tolerance {
            if let Some(reason) = max_band.check() {
                return Err(ToleranceError::invalid(symbol, reason));
            }
            match self.max_operating_temperature {
                None => {
                    return Err(ToleranceError::invalid(
                        symbol,
                        "max_temperature_tolerance requires max_operating_temperature",
                    ))
                }
                Some(t) if !t.is_finite() => {
                    return Err(ToleranceError::invalid(
                        symbol,
                        "max_operating_temperature is not finite",
                    ))
                }
                Some(t) if t == ROOM_TEMPERATURE => {
                    return Err(ToleranceError::invalid(
                        symbol,
                        "max_operating_temperature must differ from 25 °C",
                    ))
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

/// Temperature-dependent band: room band plus the band at the rated extreme
#[derive(Debug, Clone, Copy, PartialEq)]
struct MaxTemperatureBand {
    band: ToleranceBand,
    temperature: f64,
}

/// A circuit element with a seeded variation model
///
/// Everything except the random generator is fixed at construction. Not `Clone`,
/// so no two elements share a random stream unless built from the same seed.
///
/// ```compile_fail
/// fn assert_clone<T: Clone>() {}
/// assert_clone::<ctol::entities::Element>();
/// ```
#[derive(Debug)]
pub struct Element {
    symbol: String,
    typical_value: f64,
    room_band: ToleranceBand,
    max_band: Option<MaxTemperatureBand>,
    temperature_coefficient: f64,
    sigma: f64,
    rng: StdRng,
}

impl Element {
    /// Build an element, rejecting specs that violate the invariants
    pub fn new(spec: ElementSpec) -> Result<Self> {
        spec.validate()?;

        if spec.max_temperature_tolerance.is_none() && spec.max_operating_temperature.is_some() {
            tracing::warn!(
                symbol = %spec.symbol,
                "max_operating_temperature given without max_temperature_tolerance; ignoring"
            );
        }

        let max_band = match (spec.max_temperature_tolerance, spec.max_operating_temperature) {
            (Some(band), Some(temperature)) => Some(MaxTemperatureBand { band, temperature }),
            _ => None,
        };

        let rng = match spec.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            symbol: spec.symbol,
            typical_value: spec.typical_value,
            room_band: spec.room_temperature_tolerance,
            max_band,
            temperature_coefficient: spec.temperature_coefficient,
            sigma: spec.sigma,
            rng,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn typical_value(&self) -> f64 {
        self.typical_value
    }

    pub fn room_temperature_tolerance(&self) -> ToleranceBand {
        self.room_band
    }

    pub fn max_temperature_tolerance(&self) -> Option<ToleranceBand> {
        self.max_band.map(|m| m.band)
    }

    pub fn max_operating_temperature(&self) -> Option<f64> {
        self.max_band.map(|m| m.temperature)
    }

    pub fn temperature_coefficient(&self) -> f64 {
        self.temperature_coefficient
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Tolerance band in effect at `temperature`
    ///
    /// Each bound moves linearly from the room band to the max-temperature band;
    /// beyond the rated temperature the max band is held, below 25 °C the room band.
    pub fn tolerance_at(&self, temperature: f64) -> ToleranceBand {
        match &self.max_band {
            None => self.room_band,
            Some(max) => {
                let fraction = ((temperature - ROOM_TEMPERATURE)
                    / (max.temperature - ROOM_TEMPERATURE))
                    .clamp(0.0, 1.0);
                self.room_band.lerp(&max.band, fraction)
            }
        }
    }

    /// Standard deviations (negative side, positive side) of the random error at `temperature`
    pub fn random_error_std_dev(&self, temperature: f64) -> (f64, f64) {
        let band = self.tolerance_at(temperature);
        (
            band.lower_extent() / self.sigma,
            band.upper_extent() / self.sigma,
        )
    }

    /// Draw one random manufacturing error in percent
    pub fn sample_random_error(&mut self, temperature: f64) -> f64 {
        let band = self.tolerance_at(temperature);
        let z: f64 = self.rng.sample(StandardNormal);

        let extent = if band.is_symmetric() || z >= 0.0 {
            band.upper_extent()
        } else {
            band.lower_extent()
        };

        z * extent / self.sigma
    }

    /// Deterministic thermal drift in percent (ppm/°C → %)
    pub fn temperature_error(&self, temperature: f64) -> f64 {
        self.temperature_coefficient * (temperature - ROOM_TEMPERATURE) / 10000.0
    }

    /// Combined error in percent; draws a random error when none is supplied
    pub fn total_error(&mut self, temperature: f64, random_error: Option<f64>) -> f64 {
        let random_error = match random_error {
            Some(e) => e,
            None => self.sample_random_error(temperature),
        };
        random_error + self.temperature_error(temperature)
    }

    /// One Monte Carlo sample of this element's value at `temperature`
    pub fn actual_value(&mut self, temperature: f64) -> f64 {
        self.typical_value * (1.0 + self.total_error(temperature, None) / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resistor() -> ElementSpec {
        ElementSpec::new("R1", 1000.0, 1.0, 50.0).with_seed(7)
    }

    fn mean_and_std(samples: &[f64]) -> (f64, f64) {
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        (mean, var.sqrt())
    }

    #[test]
    fn test_spec_defaults() {
        let spec = ElementSpec::new("C1", 1e-9, 5.0, -30.0);
        assert_eq!(spec.sigma, DEFAULT_SIGMA);
        assert!(spec.seed.is_none());
        assert!(spec.max_temperature_tolerance.is_none());
        assert_eq!(spec.room_temperature_tolerance, ToleranceBand::symmetric(5.0));
    }

    #[test]
    fn test_rejects_non_positive_sigma() {
        let err = Element::new(resistor().with_sigma(0.0)).unwrap_err();
        assert!(matches!(err, ToleranceError::InvalidConfiguration { .. }));
        assert!(Element::new(resistor().with_sigma(-3.0)).is_err());
    }

    #[test]
    fn test_rejects_inverted_band() {
        let spec = ElementSpec::new("R1", 1000.0, (1.0, -1.0), 0.0);
        assert!(Element::new(spec).is_err());

        let spec = resistor().with_max_temperature((3.0, -3.0), 85.0);
        assert!(Element::new(spec).is_err());
    }

    #[test]
    fn test_rejects_max_band_without_temperature() {
        let mut spec = resistor();
        spec.max_temperature_tolerance = Some(ToleranceBand::symmetric(2.0));
        let err = Element::new(spec).unwrap_err();
        assert!(err.to_string().contains("requires max_operating_temperature"));
    }

    #[test]
    fn test_rejects_max_temperature_at_room() {
        let spec = resistor().with_max_temperature(2.0, 25.0);
        assert!(Element::new(spec).is_err());
    }

    #[test]
    fn test_temperature_error_zero_at_room() {
        let elem = Element::new(resistor()).unwrap();
        assert_eq!(elem.temperature_error(ROOM_TEMPERATURE), 0.0);
    }

    #[test]
    fn test_temperature_error_ppm_conversion() {
        let elem = Element::new(ElementSpec::new("R", 100.0, 5.0, 10.0)).unwrap();
        // 10 ppm/°C × 25 °C = 250 ppm = 0.025 %
        assert!((elem.temperature_error(50.0) - 0.025).abs() < 1e-12);
        assert!((elem.temperature_error(0.0) + 0.025).abs() < 1e-12);
    }

    #[test]
    fn test_total_error_with_supplied_random_error() {
        let mut elem = Element::new(ElementSpec::new("R", 100.0, 5.0, 10.0)).unwrap();
        let total = elem.total_error(50.0, Some(0.0));
        assert!((total - 0.025).abs() < 1e-12);

        let total = elem.total_error(25.0, Some(-1.5));
        assert!((total + 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_band_gives_exact_value() {
        let mut elem = Element::new(ElementSpec::new("V", 3.3, 0.0, 0.0)).unwrap();
        for _ in 0..10 {
            assert_eq!(elem.actual_value(25.0), 3.3);
        }
    }

    #[test]
    fn test_band_constant_without_max_band() {
        let elem = Element::new(resistor()).unwrap();
        for t in [-40.0, 0.0, 25.0, 85.0, 150.0] {
            assert_eq!(elem.tolerance_at(t), ToleranceBand::symmetric(1.0));
            assert_eq!(elem.random_error_std_dev(t), (1.0 / 4.5, 1.0 / 4.5));
        }
    }

    #[test]
    fn test_band_interpolation_and_clamping() {
        let elem = Element::new(
            ElementSpec::new("R", 1000.0, (-1.0, 1.0), 0.0).with_max_temperature((-3.0, 2.0), 125.0),
        )
        .unwrap();

        assert_eq!(elem.tolerance_at(25.0), ToleranceBand::new(-1.0, 1.0));
        // Below room temperature the room band holds
        assert_eq!(elem.tolerance_at(-40.0), ToleranceBand::new(-1.0, 1.0));

        let mid = elem.tolerance_at(75.0);
        assert!((mid.low + 2.0).abs() < 1e-12);
        assert!((mid.high - 1.5).abs() < 1e-12);

        assert_eq!(elem.tolerance_at(125.0), ToleranceBand::new(-3.0, 2.0));
        // No extrapolation past the rated temperature
        assert_eq!(elem.tolerance_at(200.0), ToleranceBand::new(-3.0, 2.0));
    }

    #[test]
    fn test_symmetric_samples_converge() {
        let mut elem = Element::new(resistor()).unwrap();
        let samples: Vec<f64> = (0..50_000).map(|_| elem.actual_value(25.0)).collect();
        let (mean, std) = mean_and_std(&samples);

        let expected_std = 1000.0 * (1.0 / 4.5) / 100.0;
        assert!((mean - 1000.0).abs() < 0.1, "mean = {}", mean);
        assert!((std - expected_std).abs() / expected_std < 0.03, "std = {}", std);
    }

    #[test]
    fn test_asymmetric_samples_respect_halves() {
        let mut elem =
            Element::new(ElementSpec::new("R", 1.0, (-1.0, 4.0), 0.0).with_seed(11)).unwrap();
        let samples: Vec<f64> = (0..40_000).map(|_| elem.sample_random_error(25.0)).collect();

        let neg: Vec<f64> = samples.iter().copied().filter(|x| *x < 0.0).collect();
        let pos: Vec<f64> = samples.iter().copied().filter(|x| *x >= 0.0).collect();
        let neg_rms = (neg.iter().map(|x| x * x).sum::<f64>() / neg.len() as f64).sqrt();
        let pos_rms = (pos.iter().map(|x| x * x).sum::<f64>() / pos.len() as f64).sqrt();

        // Half-normal RMS equals the side's standard deviation
        assert!((neg_rms - 1.0 / 4.5).abs() < 0.01, "neg_rms = {}", neg_rms);
        assert!((pos_rms - 4.0 / 4.5).abs() < 0.03, "pos_rms = {}", pos_rms);
    }

    #[test]
    fn test_seeded_elements_repeat() {
        let mut a = Element::new(resistor().with_seed(42)).unwrap();
        let mut b = Element::new(resistor().with_seed(42)).unwrap();
        let xs: Vec<f64> = (0..100).map(|_| a.actual_value(60.0)).collect();
        let ys: Vec<f64> = (0..100).map(|_| b.actual_value(60.0)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = Element::new(resistor().with_seed(1)).unwrap();
        let mut b = Element::new(resistor().with_seed(2)).unwrap();
        let xs: Vec<f64> = (0..10).map(|_| a.actual_value(25.0)).collect();
        let ys: Vec<f64> = (0..10).map(|_| b.actual_value(25.0)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn test_spec_yaml_legacy_keys() {
        let yaml = r#"
symbol: R2
typ_value: 2000
room_temp_tolerance: [-2, 2]
temp_coefficient: 100
max_temp_tolerance: [-3, 3]
max_operating_temperature: 85
"#;
        let spec: ElementSpec = serde_yml::from_str(yaml).unwrap();
        assert_eq!(spec.symbol, "R2");
        assert_eq!(spec.typical_value, 2000.0);
        assert_eq!(spec.room_temperature_tolerance, ToleranceBand::new(-2.0, 2.0));
        assert_eq!(spec.max_temperature_tolerance, Some(ToleranceBand::new(-3.0, 3.0)));
        assert_eq!(spec.max_operating_temperature, Some(85.0));
        assert_eq!(spec.sigma, DEFAULT_SIGMA);

        let elem = Element::new(spec).unwrap();
        assert_eq!(elem.max_operating_temperature(), Some(85.0));
    }
}
