//! Consistency audit of the square/border graph.

use std::fmt;

use delve_core::{BorderId, Direction, SquareId};

use crate::error::BorderConstraintViolation;
use crate::grid::Grid;

/// A broken grid invariant found by [`Grid::audit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridViolation {
    /// A square references a border that does not list it back, or that
    /// is terminated.
    DanglingBorder {
        /// The referencing square.
        square: SquareId,
        /// Direction of the reference.
        direction: Direction,
        /// The referenced border.
        border: BorderId,
    },
    /// A border lists a square that does not reference it.
    MissingBackReference {
        /// The listing border.
        border: BorderId,
        /// The listed square.
        square: SquareId,
    },
    /// A square references the same border in two directions.
    DuplicateBorder {
        /// The square.
        square: SquareId,
        /// The repeated border.
        border: BorderId,
    },
    /// A square's temperature lies outside its own limits.
    TemperatureOutOfBounds {
        /// The square.
        square: SquareId,
    },
    /// A square's border kinds violate its constraints.
    BorderConstraints {
        /// The square.
        square: SquareId,
        /// The constraint that failed.
        violation: BorderConstraintViolation,
    },
}

impl fmt::Display for GridViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingBorder {
                square,
                direction,
                border,
            } => write!(f, "{square} references {border} ({direction}) one-sidedly"),
            Self::MissingBackReference { border, square } => {
                write!(f, "{border} lists {square}, which does not reference it")
            }
            Self::DuplicateBorder { square, border } => {
                write!(f, "{square} references {border} more than once")
            }
            Self::TemperatureOutOfBounds { square } => {
                write!(f, "temperature of {square} outside its limits")
            }
            Self::BorderConstraints { square, violation } => {
                write!(f, "{square}: {violation}")
            }
        }
    }
}

impl Grid {
    /// Check every live square and border against the grid invariants.
    ///
    /// Returns an empty list for a consistent grid.
    pub fn audit(&self) -> Vec<GridViolation> {
        let mut out = Vec::new();

        for square in self.live_squares() {
            let Ok(s) = self.square(square) else { continue };
            let Some(borders) = s.borders() else { continue };
            for d in Direction::ALL {
                let border = borders[d.index()];
                if borders[..d.index()].contains(&border) {
                    out.push(GridViolation::DuplicateBorder { square, border });
                }
                let linked = self.border(border).is_ok_and(|b| b.borders_on(square));
                if !linked {
                    out.push(GridViolation::DanglingBorder {
                        square,
                        direction: d,
                        border,
                    });
                }
            }
            if s.check_temperature(s.temperature()).is_err() {
                out.push(GridViolation::TemperatureOutOfBounds { square });
            }
            if let Err(crate::GridError::BorderConstraints { violation, .. }) =
                self.check_border_constraints(square, None)
            {
                out.push(GridViolation::BorderConstraints { square, violation });
            }
        }

        for index in 0..self.border_slots() {
            let border = BorderId(index as u32);
            let Some(couple) = self.border(border).ok().and_then(|b| b.squares()) else {
                continue;
            };
            for square in couple.iter() {
                let back = self
                    .square(square)
                    .ok()
                    .and_then(|s| s.direction_of(border))
                    .is_some();
                if !back {
                    out.push(GridViolation::MissingBackReference { border, square });
                }
            }
        }

        out
    }
}
