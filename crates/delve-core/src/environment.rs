//! Temperature and humidity value types.

use std::cmp::Ordering;
use std::fmt;

use crate::error::EnvironmentError;

/// Temperature scales a [`Temperature`] can be read from or written in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scale {
    /// Degrees Celsius (the internal reference scale).
    Celsius,
    /// Kelvin.
    Kelvin,
    /// Degrees Fahrenheit.
    Fahrenheit,
}

impl Scale {
    /// Convert a reading in this scale to degrees Celsius.
    pub fn to_celsius(self, value: f64) -> f64 {
        match self {
            Self::Celsius => value,
            Self::Kelvin => value - 273.15,
            Self::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
        }
    }

    /// Convert degrees Celsius to a reading in this scale.
    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            Self::Celsius => celsius,
            Self::Kelvin => celsius + 273.15,
            Self::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }
}

/// A finite temperature, stored in degrees Celsius.
///
/// Equality is approximate: two temperatures are equal when they differ by
/// at most [`Temperature::EQUALS_EPSILON`] relative to the larger magnitude.
#[derive(Clone, Copy, Debug)]
pub struct Temperature(f64);

impl Temperature {
    /// Relative tolerance used by `==`.
    pub const EQUALS_EPSILON: f64 = 1e-6;

    /// 0 °C.
    pub const FREEZING: Temperature = Temperature::constant(0.0);

    /// A temperature in degrees Celsius, for constant contexts.
    ///
    /// # Panics
    ///
    /// Panics if `celsius` is not finite. In a `const` item this is a
    /// compile error.
    pub const fn constant(celsius: f64) -> Self {
        assert!(celsius.is_finite(), "temperature must be finite");
        Self(celsius)
    }

    /// A temperature in degrees Celsius.
    pub fn celsius(value: f64) -> Result<Self, EnvironmentError> {
        Self::new(value, Scale::Celsius)
    }

    /// A temperature read in the given scale.
    pub fn new(value: f64, scale: Scale) -> Result<Self, EnvironmentError> {
        let celsius = scale.to_celsius(value);
        if !celsius.is_finite() {
            return Err(EnvironmentError::NonFinite { value });
        }
        Ok(Self(celsius))
    }

    /// Value in degrees Celsius.
    pub fn as_celsius(self) -> f64 {
        self.0
    }

    /// Value in the given scale.
    pub fn in_scale(self, scale: Scale) -> f64 {
        scale.from_celsius(self.0)
    }

    /// Whether `min <= self <= max`.
    pub fn within(self, min: Temperature, max: Temperature) -> bool {
        self.0 >= min.0 && self.0 <= max.0
    }

    /// Clamp into `[low, high]`.
    pub fn coerce(self, low: Temperature, high: Temperature) -> Temperature {
        if self.0 <= low.0 {
            low
        } else if self.0 >= high.0 {
            high
        } else {
            self
        }
    }

    /// Blend two readings joined by an opening between their squares.
    ///
    /// Each reading is weighted by `weight + (1 - weight) * h_i / h_mean`,
    /// so the moister square pulls the result towards its own temperature.
    /// With zero combined humidity the result is the plain mean.
    pub fn equilibrate(
        a: Temperature,
        humidity_a: Humidity,
        b: Temperature,
        humidity_b: Humidity,
        weight: f64,
    ) -> Temperature {
        let ha = f64::from(humidity_a.hundredths());
        let hb = f64::from(humidity_b.hundredths());
        let mean = (ha + hb) / 2.0;
        let (fa, fb) = if mean == 0.0 {
            (1.0, 1.0)
        } else {
            (
                weight + (1.0 - weight) * ha / mean,
                weight + (1.0 - weight) * hb / mean,
            )
        };
        Temperature((fa * a.0 + fb * b.0) / 2.0)
    }
}

impl PartialEq for Temperature {
    fn eq(&self, other: &Self) -> bool {
        let allowed = self.0.abs().max(other.0.abs()) * Self::EQUALS_EPSILON;
        (self.0 - other.0).abs() <= allowed
    }
}

impl PartialOrd for Temperature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else {
            self.0.partial_cmp(&other.0)
        }
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}C", self.0)
    }
}

/// Relative humidity in hundredths of a percent (`0..=10000`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Humidity(u16);

impl Humidity {
    /// 100.00 %.
    pub const MAX: Humidity = Humidity(10_000);

    /// Create a humidity from hundredths of a percent.
    pub fn from_hundredths(value: u32) -> Result<Self, EnvironmentError> {
        if value > u32::from(Self::MAX.0) {
            return Err(EnvironmentError::HumidityOutOfRange { value });
        }
        Ok(Self(value as u16))
    }

    /// Raw value in hundredths of a percent.
    pub fn hundredths(self) -> u16 {
        self.0
    }

    /// Value as a percentage in `[0, 100]`.
    pub fn percent(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// Integer mean of two humidities, truncating.
    pub fn average(a: Humidity, b: Humidity) -> Humidity {
        Humidity(((u32::from(a.0) + u32::from(b.0)) / 2) as u16)
    }
}

impl fmt::Display for Humidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(c: f64) -> Temperature {
        Temperature::celsius(c).unwrap()
    }

    fn h(v: u32) -> Humidity {
        Humidity::from_hundredths(v).unwrap()
    }

    #[test]
    fn scale_conversions() {
        let boiling = Temperature::new(373.15, Scale::Kelvin).unwrap();
        assert_eq!(boiling, t(100.0));
        assert!((boiling.in_scale(Scale::Fahrenheit) - 212.0).abs() < 1e-9);
        let body = Temperature::new(98.6, Scale::Fahrenheit).unwrap();
        assert!((body.as_celsius() - 37.0).abs() < 1e-9);
    }

    #[test]
    fn non_finite_rejected() {
        assert!(matches!(
            Temperature::celsius(f64::NAN),
            Err(EnvironmentError::NonFinite { .. })
        ));
        assert!(Temperature::celsius(f64::INFINITY).is_err());
    }

    #[test]
    fn approximate_equality() {
        assert_eq!(t(100.0), t(100.0 + 1e-5));
        assert_ne!(t(100.0), t(100.01));
        assert!(t(-5.0) < t(-4.99));
    }

    #[test]
    fn coerce_clamps() {
        assert_eq!(t(300.0).coerce(t(0.0), t(100.0)), t(100.0));
        assert_eq!(t(-1.0).coerce(t(0.0), t(100.0)), t(0.0));
        assert_eq!(t(50.0).coerce(t(0.0), t(100.0)), t(50.0));
    }

    #[test]
    fn humidity_range_and_average() {
        assert!(Humidity::from_hundredths(10_001).is_err());
        assert_eq!(Humidity::average(h(5000), h(10_000)), h(7500));
        assert_eq!(Humidity::average(h(1), h(0)), h(0));
        assert_eq!(h(7525).to_string(), "75.25%");
    }

    #[test]
    fn equilibrate_weights_by_humidity_share() {
        let w = 0.2;
        let got = Temperature::equilibrate(t(100.0), h(5000), t(40.0), h(10_000), w);
        let expected = ((w + (1.0 - w) * 50.0 / 75.0) * 100.0
            + (w + (1.0 - w) * 100.0 / 75.0) * 40.0)
            / 2.0;
        assert_eq!(got, t(expected));
    }

    #[test]
    fn equilibrate_dry_squares_is_plain_mean() {
        let got = Temperature::equilibrate(t(10.0), h(0), t(30.0), h(0), 0.7);
        assert_eq!(got, t(20.0));
    }

    #[test]
    fn equilibrate_equal_readings_is_fixed_point() {
        let got = Temperature::equilibrate(t(12.5), h(4000), t(12.5), h(4000), 0.3);
        assert_eq!(got, t(12.5));
    }
}
