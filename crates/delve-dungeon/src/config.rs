//! World configuration.

use delve_core::{ConfigError, EnvironmentConfig};

/// Settings for a [`World`](crate::World).
///
/// Threaded explicitly into the world rather than held as global state.
/// [`World::reset_config`](crate::World::reset_config) restores the
/// defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    /// Settings for square environments and merges.
    pub environment: EnvironmentConfig,
    /// Largest share of a level's squares that may have a slippery floor,
    /// in `[0, 1]`. Default: 0.2.
    pub max_slippery_fraction: f64,
}

impl WorldConfig {
    /// Default slippery share for levels.
    pub const DEFAULT_MAX_SLIPPERY_FRACTION: f64 = 0.2;

    /// Check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.environment.validate()?;
        let f = self.max_slippery_fraction;
        if !(0.0..=1.0).contains(&f) {
            return Err(ConfigError::InvalidFraction {
                name: "max_slippery_fraction",
                value: f,
            });
        }
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            environment: EnvironmentConfig::default(),
            max_slippery_fraction: Self::DEFAULT_MAX_SLIPPERY_FRACTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn fraction_must_be_in_unit_interval() {
        let cfg = WorldConfig {
            max_slippery_fraction: 1.5,
            ..WorldConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidFraction {
                name: "max_slippery_fraction",
                ..
            })
        ));
    }

    #[test]
    fn environment_is_validated_too() {
        let mut cfg = WorldConfig::default();
        cfg.environment.cold_damage_step = -1.0;
        assert!(cfg.validate().is_err());
    }
}
