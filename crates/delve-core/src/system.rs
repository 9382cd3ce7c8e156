//! Axis-aligned integer bounding boxes.

use std::fmt;

use smallvec::SmallVec;

use crate::coord::{Coordinate, Direction};
use crate::error::CoordError;

/// Neighbour list returned by [`CoordinateSystem::neighbours_of`].
///
/// Six entries at most, so it never spills to the heap.
pub type NeighbourCoords = SmallVec<[(Direction, Coordinate); 6]>;

/// An inclusive axis-aligned box `[lower, upper]` in world space.
///
/// Invariant: `lower <= upper` in every axis. The only mutation is
/// [`translate`](Self::translate), which shifts both bounds together.
///
/// # Examples
///
/// ```
/// use delve_core::{Coordinate, CoordinateSystem};
///
/// let level = CoordinateSystem::new(Coordinate::ORIGIN, Coordinate::new(1, 1, 0)).unwrap();
/// assert!(level.contains(Coordinate::new(1, 0, 0)));
/// assert!(!level.contains(Coordinate::new(0, 0, 1)));
/// assert_eq!(level.neighbours_of(Coordinate::new(0, 1, 0)).len(), 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CoordinateSystem {
    lower: Coordinate,
    upper: Coordinate,
}

impl CoordinateSystem {
    /// Create a box with the given inclusive bounds.
    ///
    /// Returns `Err(CoordError::Inverted)` unless `lower <= upper` per axis.
    pub fn new(lower: Coordinate, upper: Coordinate) -> Result<Self, CoordError> {
        if !lower.le_all(upper) {
            return Err(CoordError::Inverted { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// The smallest box containing both corners, in any order.
    pub fn spanning(a: Coordinate, b: Coordinate) -> Self {
        Self {
            lower: a.min_all(b),
            upper: a.max_all(b),
        }
    }

    /// Inclusive lower corner.
    pub fn lower(&self) -> Coordinate {
        self.lower
    }

    /// Inclusive upper corner.
    pub fn upper(&self) -> Coordinate {
        self.upper
    }

    /// Number of lattice points along each axis.
    pub fn extent(&self) -> (u64, u64, u64) {
        let span = |lo: i32, hi: i32| (i64::from(hi) - i64::from(lo) + 1) as u64;
        (
            span(self.lower.x, self.upper.x),
            span(self.lower.y, self.upper.y),
            span(self.lower.z, self.upper.z),
        )
    }

    /// Whether the point lies inside the box (bounds inclusive).
    pub fn contains(&self, coord: Coordinate) -> bool {
        self.lower.le_all(coord) && coord.le_all(self.upper)
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains_system(&self, other: &CoordinateSystem) -> bool {
        self.contains(other.lower) && self.contains(other.upper)
    }

    /// Whether the two boxes share at least one lattice point.
    pub fn overlaps(&self, other: &CoordinateSystem) -> bool {
        self.lower.le_all(other.upper) && other.lower.le_all(self.upper)
    }

    /// Shift both bounds by `offset`.
    ///
    /// Either both bounds move or neither does.
    pub fn translate(&mut self, offset: Coordinate) -> Result<(), CoordError> {
        *self = self.translated(offset)?;
        Ok(())
    }

    /// A copy of this box shifted by `offset`.
    pub fn translated(&self, offset: Coordinate) -> Result<CoordinateSystem, CoordError> {
        Ok(Self {
            lower: self.lower.try_add(offset)?,
            upper: self.upper.try_add(offset)?,
        })
    }

    /// The neighbours of `coord` that lie inside this box, keyed by the
    /// direction from `coord` towards them.
    ///
    /// `coord` itself need not lie inside the box: a point just outside a
    /// face still has its in-box neighbour reported.
    pub fn neighbours_of(&self, coord: Coordinate) -> NeighbourCoords {
        Direction::ALL
            .iter()
            .filter_map(|&d| coord.step(d).map(|n| (d, n)))
            .filter(|&(_, n)| self.contains(n))
            .collect()
    }

    /// The single axis along which this box has extent > 1, if exactly one.
    ///
    /// Returns the positive direction of that axis.
    pub fn line_axis(&self) -> Option<Direction> {
        let (x, y, z) = self.extent();
        match (x > 1, y > 1, z > 1) {
            (true, false, false) => Some(Direction::East),
            (false, true, false) => Some(Direction::North),
            (false, false, true) => Some(Direction::Up),
            _ => None,
        }
    }

    /// Whether the box is one lattice point thick along z.
    pub fn is_flat(&self) -> bool {
        self.lower.z == self.upper.z
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn c(x: i32, y: i32, z: i32) -> Coordinate {
        Coordinate::new(x, y, z)
    }

    fn cube() -> CoordinateSystem {
        CoordinateSystem::new(c(0, 0, 0), c(9, 9, 9)).unwrap()
    }

    #[test]
    fn new_rejects_inverted_bounds() {
        let result = CoordinateSystem::new(c(0, 5, 0), c(1, 4, 0));
        assert!(matches!(result, Err(CoordError::Inverted { .. })));
    }

    #[test]
    fn single_point_box_is_valid() {
        let p = CoordinateSystem::new(c(3, 3, 4), c(3, 3, 4)).unwrap();
        assert_eq!(p.extent(), (1, 1, 1));
        assert!(p.contains(c(3, 3, 4)));
    }

    #[test]
    fn contains_is_inclusive() {
        let s = cube();
        assert!(s.contains(c(0, 0, 0)));
        assert!(s.contains(c(9, 9, 9)));
        assert!(!s.contains(c(10, 0, 0)));
        assert!(!s.contains(c(0, -1, 0)));
    }

    #[test]
    fn overlap_touching_faces_is_disjoint() {
        let a = CoordinateSystem::new(c(0, 0, 0), c(1, 1, 0)).unwrap();
        let b = CoordinateSystem::new(c(0, 1, 1), c(0, 1, 3)).unwrap();
        let d = CoordinateSystem::new(c(1, 1, 0), c(4, 4, 0)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&d));
        assert!(d.overlaps(&a));
    }

    #[test]
    fn contains_system_requires_both_corners() {
        let s = cube();
        let inner = CoordinateSystem::new(c(2, 2, 2), c(3, 3, 3)).unwrap();
        let straddling = CoordinateSystem::new(c(8, 8, 8), c(10, 8, 8)).unwrap();
        assert!(s.contains_system(&inner));
        assert!(!s.contains_system(&straddling));
    }

    #[test]
    fn neighbours_corner_interior_and_outside() {
        let s = cube();
        assert_eq!(s.neighbours_of(c(0, 0, 0)).len(), 3);
        assert_eq!(s.neighbours_of(c(5, 5, 5)).len(), 6);
        let outside = s.neighbours_of(c(-1, 0, 0));
        assert_eq!(outside.as_slice(), &[(Direction::East, c(0, 0, 0))]);
    }

    #[test]
    fn translate_overflow_leaves_box_untouched() {
        let mut s = CoordinateSystem::new(c(0, 0, 0), c(i32::MAX - 1, 0, 0)).unwrap();
        let before = s;
        assert!(s.translate(c(2, 0, 0)).is_err());
        assert_eq!(s, before);
    }

    #[test]
    fn line_axis_detection() {
        let shaft = CoordinateSystem::new(c(0, 1, 1), c(0, 1, 3)).unwrap();
        let level = CoordinateSystem::new(c(0, 0, 0), c(1, 1, 0)).unwrap();
        assert_eq!(shaft.line_axis(), Some(Direction::Up));
        assert_eq!(level.line_axis(), None);
        assert!(level.is_flat());
        assert!(!shaft.is_flat());
    }

    #[test]
    fn spanning_orders_corners() {
        let s = CoordinateSystem::spanning(c(0, 1, 3), c(0, 1, 1));
        assert_eq!(s.lower(), c(0, 1, 1));
        assert_eq!(s.upper(), c(0, 1, 3));
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            ax in -5i32..5, ay in -5i32..5, aw in 0i32..4, ah in 0i32..4,
            bx in -5i32..5, by in -5i32..5, bw in 0i32..4, bh in 0i32..4,
        ) {
            let a = CoordinateSystem::new(c(ax, ay, 0), c(ax + aw, ay + ah, 0)).unwrap();
            let b = CoordinateSystem::new(c(bx, by, 0), c(bx + bw, by + bh, 0)).unwrap();
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
            if a.contains_system(&b) {
                prop_assert!(a.overlaps(&b));
            }
        }

        #[test]
        fn neighbours_stay_inside_and_are_adjacent(
            x in -2i32..12, y in -2i32..12, z in -2i32..12,
        ) {
            let s = cube();
            let p = c(x, y, z);
            for (d, n) in s.neighbours_of(p) {
                prop_assert!(s.contains(n));
                prop_assert_eq!(p.step(d), Some(n));
            }
        }
    }
}
