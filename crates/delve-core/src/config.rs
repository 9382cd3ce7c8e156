//! Environmental tuning constants.

use crate::environment::Temperature;
use crate::error::ConfigError;

/// Tuning constants for square environment derivations and merges.
///
/// Held by value in the grid rather than as process-wide state. Validated
/// with [`validate`](Self::validate) before a grid accepts it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvironmentConfig {
    /// Bias of a merged square towards its own reading, in `[0, 1]`.
    ///
    /// Default: 0.2.
    pub merge_temperature_weight: f64,
    /// Temperature at which heat damage starts. Default: 35 °C.
    pub heat_damage_threshold: Temperature,
    /// Degrees per additional point of heat damage. Default: 15.
    pub heat_damage_step: f64,
    /// Temperature at or below which cold damage starts. Default: −5 °C.
    pub cold_damage_threshold: Temperature,
    /// Degrees per additional point of cold damage. Default: 10.
    pub cold_damage_step: f64,
}

impl EnvironmentConfig {
    /// Default merge weight.
    pub const DEFAULT_MERGE_TEMPERATURE_WEIGHT: f64 = 0.2;
    /// Default heat damage threshold.
    pub const DEFAULT_HEAT_DAMAGE_THRESHOLD: Temperature = Temperature::constant(35.0);
    /// Default heat damage step in degrees.
    pub const DEFAULT_HEAT_DAMAGE_STEP: f64 = 15.0;
    /// Default cold damage threshold.
    pub const DEFAULT_COLD_DAMAGE_THRESHOLD: Temperature = Temperature::constant(-5.0);
    /// Default cold damage step in degrees.
    pub const DEFAULT_COLD_DAMAGE_STEP: f64 = 10.0;

    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = self.merge_temperature_weight;
        if !(0.0..=1.0).contains(&w) {
            return Err(ConfigError::InvalidMergeWeight { value: w });
        }
        for (name, value) in [
            ("heat_damage_step", self.heat_damage_step),
            ("cold_damage_step", self.cold_damage_step),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidDamageStep { name, value });
            }
        }
        Ok(())
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            merge_temperature_weight: Self::DEFAULT_MERGE_TEMPERATURE_WEIGHT,
            heat_damage_threshold: Self::DEFAULT_HEAT_DAMAGE_THRESHOLD,
            heat_damage_step: Self::DEFAULT_HEAT_DAMAGE_STEP,
            cold_damage_threshold: Self::DEFAULT_COLD_DAMAGE_THRESHOLD,
            cold_damage_step: Self::DEFAULT_COLD_DAMAGE_STEP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(EnvironmentConfig::default().validate().is_ok());
    }

    #[test]
    fn weight_outside_unit_interval_rejected() {
        let mut cfg = EnvironmentConfig::default();
        cfg.merge_temperature_weight = -1.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidMergeWeight { .. })
        ));
        cfg.merge_temperature_weight = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_step_rejected() {
        let cfg = EnvironmentConfig {
            heat_damage_step: 0.0,
            ..EnvironmentConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidDamageStep {
                name: "heat_damage_step",
                ..
            })
        ));
    }
}
