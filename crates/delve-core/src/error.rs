//! Error types for the value layer: coordinates, couples, environment
//! values and configuration.

use std::error::Error;
use std::fmt;

use crate::coord::Coordinate;

/// Errors from coordinate arithmetic and coordinate-system construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordError {
    /// The lower bound exceeds the upper bound in at least one axis.
    Inverted {
        /// Requested lower bound.
        lower: Coordinate,
        /// Requested upper bound.
        upper: Coordinate,
    },
    /// Adding the offset would overflow an `i32` component.
    Overflow {
        /// The coordinate being shifted.
        coord: Coordinate,
        /// The offending offset.
        offset: Coordinate,
    },
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inverted { lower, upper } => {
                write!(f, "lower bound {lower} exceeds upper bound {upper}")
            }
            Self::Overflow { coord, offset } => {
                write!(f, "shifting {coord} by {offset} overflows")
            }
        }
    }
}

impl Error for CoordError {}

/// Errors from [`Couple`](crate::Couple) mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoupleError {
    /// The element is already a member of the couple.
    DuplicateElement,
    /// The couple already holds two elements.
    Full,
    /// A couple never shrinks below one element.
    LastElement,
    /// The element is not a member of the couple.
    NotMember,
}

impl fmt::Display for CoupleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateElement => write!(f, "element already in couple"),
            Self::Full => write!(f, "couple already holds two elements"),
            Self::LastElement => write!(f, "cannot remove the last element of a couple"),
            Self::NotMember => write!(f, "element is not part of the couple"),
        }
    }
}

impl Error for CoupleError {}

/// Errors from temperature and humidity validation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnvironmentError {
    /// Temperature is NaN or infinite.
    NonFinite {
        /// The rejected value, in the scale it was given in.
        value: f64,
    },
    /// Temperature lies outside its `[min, max]` bounds.
    OutOfBounds {
        /// The rejected temperature in degrees Celsius.
        temperature: f64,
        /// Lower bound in degrees Celsius.
        min: f64,
        /// Upper bound in degrees Celsius.
        max: f64,
    },
    /// Minimum temperature exceeds maximum temperature.
    InvertedBounds {
        /// Requested minimum in degrees Celsius.
        min: f64,
        /// Requested maximum in degrees Celsius.
        max: f64,
    },
    /// Humidity above 100.00 %.
    HumidityOutOfRange {
        /// Rejected value in hundredths of a percent.
        value: u32,
    },
}

impl fmt::Display for EnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { value } => write!(f, "temperature {value} is not finite"),
            Self::OutOfBounds {
                temperature,
                min,
                max,
            } => write!(f, "temperature {temperature}C outside [{min}C, {max}C]"),
            Self::InvertedBounds { min, max } => {
                write!(f, "minimum temperature {min}C exceeds maximum {max}C")
            }
            Self::HumidityOutOfRange { value } => {
                write!(f, "humidity {value} exceeds 10000 (100.00%)")
            }
        }
    }
}

impl Error for EnvironmentError {}

/// Errors detected by [`EnvironmentConfig::validate`](crate::EnvironmentConfig::validate)
/// and the world configuration built on top of it.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Merge weight must lie in `[0, 1]`.
    InvalidMergeWeight {
        /// The rejected weight.
        value: f64,
    },
    /// Damage steps must be finite and strictly positive.
    InvalidDamageStep {
        /// Which step was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A fraction-valued setting must lie in `[0, 1]`.
    InvalidFraction {
        /// Which setting was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMergeWeight { value } => {
                write!(f, "merge temperature weight {value} not in [0, 1]")
            }
            Self::InvalidDamageStep { name, value } => {
                write!(f, "{name} must be finite and positive, got {value}")
            }
            Self::InvalidFraction { name, value } => {
                write!(f, "{name} {value} not in [0, 1]")
            }
        }
    }
}

impl Error for ConfigError {}
