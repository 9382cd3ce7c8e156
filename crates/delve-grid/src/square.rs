//! Square state, two-phase construction and environment derivations.

use delve_core::{BorderId, Direction, EnvironmentConfig, EnvironmentError, Humidity, Temperature};

use crate::border::BorderKind;
use crate::error::{BorderConstraintViolation, GridError};

/// Maximum number of doors a square may have.
pub const MAX_DOORS: usize = 3;

/// Check a full set of border kinds, indexed by [`Direction::index`].
pub fn check_border_kinds(kinds: &[BorderKind; 6]) -> Result<(), BorderConstraintViolation> {
    if kinds[Direction::Down.index()].is_door() {
        return Err(BorderConstraintViolation::DoorInFloor);
    }
    let count = kinds.iter().filter(|k| k.is_door()).count();
    if count > MAX_DOORS {
        return Err(BorderConstraintViolation::TooManyDoors { count });
    }
    Ok(())
}

pub(crate) fn check_temperature(
    temperature: Temperature,
    min: Temperature,
    max: Temperature,
) -> Result<(), EnvironmentError> {
    if min.as_celsius() > max.as_celsius() {
        return Err(EnvironmentError::InvertedBounds {
            min: min.as_celsius(),
            max: max.as_celsius(),
        });
    }
    if !temperature.within(min, max) {
        return Err(EnvironmentError::OutOfBounds {
            temperature: temperature.as_celsius(),
            min: min.as_celsius(),
            max: max.as_celsius(),
        });
    }
    Ok(())
}

/// A square slot in the grid arena.
///
/// A live square references exactly one border per direction. A
/// terminated square references none.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Square {
    pub(crate) borders: Option<[BorderId; 6]>,
    pub(crate) temperature: Temperature,
    pub(crate) min_temperature: Temperature,
    pub(crate) max_temperature: Temperature,
    pub(crate) humidity: Humidity,
    pub(crate) slippery_floor: bool,
}

impl Square {
    /// Temperature of a square built without an explicit reading.
    pub const DEFAULT_TEMPERATURE: Temperature = Temperature::constant(20.0);
    /// Default lower temperature limit.
    pub const DEFAULT_MIN_TEMPERATURE: Temperature = Temperature::constant(-200.0);
    /// Default upper temperature limit.
    pub const DEFAULT_MAX_TEMPERATURE: Temperature = Temperature::constant(5000.0);

    /// Whether the square has been terminated.
    pub fn is_terminated(&self) -> bool {
        self.borders.is_none()
    }

    /// The border in `direction`, or `None` once terminated.
    pub fn border(&self, direction: Direction) -> Option<BorderId> {
        self.borders.map(|b| b[direction.index()])
    }

    /// All six borders indexed by [`Direction::index`], or `None` once terminated.
    pub fn borders(&self) -> Option<&[BorderId; 6]> {
        self.borders.as_ref()
    }

    /// The direction in which this square references `border`.
    pub fn direction_of(&self, border: BorderId) -> Option<Direction> {
        let borders = self.borders.as_ref()?;
        Direction::ALL
            .into_iter()
            .find(|d| borders[d.index()] == border)
    }

    /// Current temperature.
    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    /// Lower temperature limit.
    pub fn min_temperature(&self) -> Temperature {
        self.min_temperature
    }

    /// Upper temperature limit.
    pub fn max_temperature(&self) -> Temperature {
        self.max_temperature
    }

    /// Current humidity.
    pub fn humidity(&self) -> Humidity {
        self.humidity
    }

    /// Whether the floor itself is slippery.
    pub fn has_slippery_floor(&self) -> bool {
        self.slippery_floor
    }

    /// Cold damage dealt to an occupant.
    ///
    /// Zero above the cold threshold, then one extra point per full step
    /// below it.
    pub fn cold_damage(&self, config: &EnvironmentConfig) -> u32 {
        let below = config.cold_damage_threshold.as_celsius() - self.temperature.as_celsius();
        if below < 0.0 {
            return 0;
        }
        (below / config.cold_damage_step).floor() as u32 + 1
    }

    /// Heat damage dealt to an occupant, mirroring [`cold_damage`](Self::cold_damage).
    pub fn heat_damage(&self, config: &EnvironmentConfig) -> u32 {
        let above = self.temperature.as_celsius() - config.heat_damage_threshold.as_celsius();
        if above < 0.0 {
            return 0;
        }
        (above / config.heat_damage_step).floor() as u32 + 1
    }

    /// Rust damage: one point per full 7 % of humidity above 30 %.
    pub fn rust_damage(&self) -> u32 {
        let percent = self.humidity.percent();
        if percent <= 30.0 {
            return 0;
        }
        ((percent - 30.0) / 7.0).floor() as u32
    }

    /// Whether the air alone makes the square slippery: saturated air
    /// above freezing, or at least 10 % humidity below freezing.
    pub fn has_slippery_environment(&self) -> bool {
        let t = self.temperature.as_celsius();
        let h = self.humidity.percent();
        (self.humidity == Humidity::MAX && t > 0.0) || (h >= 10.0 && t < 0.0)
    }

    /// How pleasant the square is to stay in. Always `<= 0`.
    pub fn inhabitability(&self, config: &EnvironmentConfig) -> f64 {
        let heat = f64::from(self.heat_damage(config));
        let cold = f64::from(self.cold_damage(config));
        let h = self.humidity.percent();
        -(heat.powi(3) / (101.0 - h)).sqrt() - cold.sqrt()
    }

    pub(crate) fn check_temperature(&self, temperature: Temperature) -> Result<(), EnvironmentError> {
        check_temperature(temperature, self.min_temperature, self.max_temperature)
    }
}

/// Two-phase square construction.
///
/// Collects every setting, then validates them all at once in
/// [`Grid::insert_square`](crate::Grid::insert_square). A half-built square
/// is never visible in the grid.
///
/// ```
/// use delve_core::{Direction, Humidity, Temperature};
/// use delve_grid::{BorderKind, Grid, SquareBuilder};
///
/// let mut grid = Grid::default();
/// let id = grid
///     .insert_square(
///         SquareBuilder::new()
///             .temperature(Temperature::celsius(100.0).unwrap())
///             .humidity(Humidity::from_hundredths(5000).unwrap())
///             .border(Direction::East, BorderKind::Open),
///     )
///     .unwrap();
/// assert_eq!(grid.square(id).unwrap().humidity().percent(), 50.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SquareBuilder {
    temperature: Temperature,
    min_temperature: Temperature,
    max_temperature: Temperature,
    humidity: Humidity,
    slippery_floor: bool,
    borders: [BorderKind; 6],
}

impl SquareBuilder {
    /// 20 °C within [−200 °C, 5000 °C], dry, walls on every side.
    pub fn new() -> Self {
        Self {
            temperature: Square::DEFAULT_TEMPERATURE,
            min_temperature: Square::DEFAULT_MIN_TEMPERATURE,
            max_temperature: Square::DEFAULT_MAX_TEMPERATURE,
            humidity: Humidity::default(),
            slippery_floor: false,
            borders: [BorderKind::WALL; 6],
        }
    }

    /// Set the temperature.
    pub fn temperature(mut self, temperature: Temperature) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the temperature limits.
    pub fn temperature_bounds(mut self, min: Temperature, max: Temperature) -> Self {
        self.min_temperature = min;
        self.max_temperature = max;
        self
    }

    /// Set the humidity.
    pub fn humidity(mut self, humidity: Humidity) -> Self {
        self.humidity = humidity;
        self
    }

    /// Mark the floor as slippery.
    pub fn slippery_floor(mut self, slippery: bool) -> Self {
        self.slippery_floor = slippery;
        self
    }

    /// Set the border kind in one direction.
    pub fn border(mut self, direction: Direction, kind: BorderKind) -> Self {
        self.borders[direction.index()] = kind;
        self
    }

    /// Make every horizontal side open, keeping floor and ceiling.
    pub fn open_sides(mut self) -> Self {
        for d in [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ] {
            self.borders[d.index()] = BorderKind::Open;
        }
        self
    }

    /// The configured border kinds, indexed by [`Direction::index`].
    pub fn border_kinds(&self) -> &[BorderKind; 6] {
        &self.borders
    }

    /// Whether the floor will be slippery.
    pub fn has_slippery_floor(&self) -> bool {
        self.slippery_floor
    }

    /// Check every setting.
    pub fn validate(&self) -> Result<(), GridError> {
        check_temperature(self.temperature, self.min_temperature, self.max_temperature)?;
        check_border_kinds(&self.borders).map_err(|violation| GridError::BorderConstraints {
            square: None,
            violation,
        })
    }

    pub(crate) fn into_square(self, borders: [BorderId; 6]) -> Square {
        Square {
            borders: Some(borders),
            temperature: self.temperature,
            min_temperature: self.min_temperature,
            max_temperature: self.max_temperature,
            humidity: self.humidity,
            slippery_floor: self.slippery_floor,
        }
    }
}

impl Default for SquareBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(celsius: f64, hundredths: u32) -> Square {
        SquareBuilder::new()
            .temperature(Temperature::celsius(celsius).unwrap())
            .humidity(Humidity::from_hundredths(hundredths).unwrap())
            .into_square([BorderId(0); 6])
    }

    #[test]
    fn cold_damage_steps() {
        let cfg = EnvironmentConfig::default();
        assert_eq!(square(100.0, 5000).cold_damage(&cfg), 0);
        assert_eq!(square(-5.0, 1000).cold_damage(&cfg), 1);
        assert_eq!(square(-14.99, 500).cold_damage(&cfg), 1);
        assert_eq!(square(-15.0, 10_000).cold_damage(&cfg), 2);
        assert_eq!(square(-15.01, 0).cold_damage(&cfg), 2);
        assert_eq!(square(-100.0, 8000).cold_damage(&cfg), 10);
    }

    #[test]
    fn heat_damage_steps() {
        let cfg = EnvironmentConfig::default();
        assert_eq!(square(-5.0, 1000).heat_damage(&cfg), 0);
        assert_eq!(square(35.0, 5000).heat_damage(&cfg), 1);
        assert_eq!(square(40.0, 10_000).heat_damage(&cfg), 1);
        assert_eq!(square(49.99, 5000).heat_damage(&cfg), 1);
        assert_eq!(square(50.0, 5000).heat_damage(&cfg), 2);
    }

    #[test]
    fn thresholds_follow_config() {
        let cfg = EnvironmentConfig {
            heat_damage_threshold: Temperature::constant(100.0),
            ..EnvironmentConfig::default()
        };
        assert_eq!(square(50.0, 0).heat_damage(&cfg), 0);
        assert_eq!(square(100.0, 0).heat_damage(&cfg), 1);
    }

    #[test]
    fn rust_damage_steps() {
        assert_eq!(square(-15.01, 0).rust_damage(), 0);
        assert_eq!(square(-5.0, 1000).rust_damage(), 0);
        assert_eq!(square(100.0, 5000).rust_damage(), 2);
        assert_eq!(square(-100.0, 8000).rust_damage(), 7);
    }

    #[test]
    fn slippery_environment() {
        assert!(square(40.0, 10_000).has_slippery_environment());
        assert!(square(-15.0, 10_000).has_slippery_environment());
        assert!(!square(-15.01, 0).has_slippery_environment());
        assert!(!square(-14.99, 500).has_slippery_environment());
        assert!(!square(20.0, 9999).has_slippery_environment());
    }

    #[test]
    fn inhabitability_of_default_square() {
        let cfg = EnvironmentConfig::default();
        let s = SquareBuilder::new().into_square([BorderId(0); 6]);
        assert_eq!(s.inhabitability(&cfg), 0.0);
        let hot = square(50.0, 5000);
        let expected = -(8.0f64 / 51.0).sqrt();
        assert!((hot.inhabitability(&cfg) - expected).abs() < 1e-12);
    }

    #[test]
    fn builder_rejects_temperature_outside_bounds() {
        let b = SquareBuilder::new()
            .temperature(Temperature::celsius(300.0).unwrap())
            .temperature_bounds(
                Temperature::celsius(0.0).unwrap(),
                Temperature::celsius(100.0).unwrap(),
            );
        assert!(matches!(
            b.validate(),
            Err(GridError::Environment(EnvironmentError::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn builder_rejects_inverted_bounds() {
        let b = SquareBuilder::new().temperature_bounds(
            Temperature::celsius(10.0).unwrap(),
            Temperature::celsius(0.0).unwrap(),
        );
        assert!(matches!(
            b.validate(),
            Err(GridError::Environment(EnvironmentError::InvertedBounds { .. }))
        ));
    }

    #[test]
    fn door_constraints() {
        let floor_door = SquareBuilder::new().border(Direction::Down, BorderKind::DOOR);
        assert!(matches!(
            floor_door.validate(),
            Err(GridError::BorderConstraints {
                violation: BorderConstraintViolation::DoorInFloor,
                ..
            })
        ));

        let mut many = SquareBuilder::new();
        for d in [Direction::North, Direction::South, Direction::East] {
            many = many.border(d, BorderKind::DOOR);
        }
        assert!(many.validate().is_ok());
        let too_many = many.border(Direction::Up, BorderKind::DOOR);
        assert!(matches!(
            too_many.validate(),
            Err(GridError::BorderConstraints {
                violation: BorderConstraintViolation::TooManyDoors { count: 4 },
                ..
            })
        ));
    }
}
