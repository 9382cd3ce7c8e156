//! Prebuilt dungeon trees.

use delve_core::{Coordinate, Direction, DungeonId, SquareId};
use delve_dungeon::World;

use crate::{boxed, c, plain_square};

/// A 10×10×10 composite holding a 2×2 level at the origin and a
/// three-square shaft rising from `(0, 1, 1)`.
///
/// The level holds squares at `(0, 1, 0)`, `(1, 0, 0)` and `(1, 1, 0)`;
/// the shaft is full. Both leaves are attached before any square is
/// placed, so every join goes through the root lookup.
pub struct ReferenceScenario {
    pub world: World,
    pub composite: DungeonId,
    pub level: DungeonId,
    pub shaft: DungeonId,
    /// Level squares at `(0, 1, 0)`, `(1, 0, 0)`, `(1, 1, 0)`.
    pub level_squares: [SquareId; 3],
    /// Shaft squares from bottom to top.
    pub shaft_squares: [SquareId; 3],
}

impl ReferenceScenario {
    pub const LEVEL_COORDS: [Coordinate; 3] = [
        Coordinate::new(0, 1, 0),
        Coordinate::new(1, 0, 0),
        Coordinate::new(1, 1, 0),
    ];
    pub const SHAFT_COORDS: [Coordinate; 3] = [
        Coordinate::new(0, 1, 1),
        Coordinate::new(0, 1, 2),
        Coordinate::new(0, 1, 3),
    ];

    pub fn build() -> Self {
        let mut world = World::default();
        let composite = world
            .create_composite(boxed(c(0, 0, 0), c(9, 9, 9)))
            .expect("composite");
        let level = world.create_level(2, 2).expect("level");
        let shaft = world
            .create_shaft(Self::SHAFT_COORDS[0], 3, Direction::Up)
            .expect("shaft");
        world
            .add_sub_dungeon_at(composite, Coordinate::ORIGIN, level)
            .expect("level fits");
        world
            .add_sub_dungeon_at(composite, Coordinate::ORIGIN, shaft)
            .expect("shaft fits");

        let level_squares = Self::LEVEL_COORDS.map(|at| {
            let s = plain_square(&mut world);
            world.add_square_at(level, at, s).expect("level square");
            s
        });
        let shaft_squares = Self::SHAFT_COORDS.map(|at| {
            let s = plain_square(&mut world);
            world.add_square_at(shaft, at, s).expect("shaft square");
            s
        });

        Self {
            world,
            composite,
            level,
            shaft,
            level_squares,
            shaft_squares,
        }
    }
}
