//! Delve: composable 3D dungeons of squares and shared borders.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Delve sub-crates. Adding `delve` as a single dependency is enough
//! for most users.
//!
//! # Quick start
//!
//! ```rust
//! use delve::prelude::*;
//!
//! let mut world = World::default();
//! let complex = world
//!     .create_composite(CoordinateSystem::new(Coordinate::ORIGIN, Coordinate::new(9, 9, 9)).unwrap())
//!     .unwrap();
//! let level = world.create_level(2, 2).unwrap();
//! let shaft = world.create_shaft(Coordinate::new(0, 1, 1), 3, Direction::Up).unwrap();
//! world.add_sub_dungeon_at(complex, Coordinate::ORIGIN, level).unwrap();
//! world.add_sub_dungeon_at(complex, Coordinate::ORIGIN, shaft).unwrap();
//!
//! let floor = world.insert_square(SquareBuilder::new()).unwrap();
//! let above = world.insert_square(SquareBuilder::new()).unwrap();
//! world.add_square_at(level, Coordinate::new(0, 1, 0), floor).unwrap();
//! world.add_square_at(shaft, Coordinate::new(0, 1, 1), above).unwrap();
//!
//! // Sibling leaves are joined through the shared root.
//! assert_eq!(world.grid().neighbour(floor, Direction::Up).unwrap(), Some(above));
//! assert!(world.audit().is_empty());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `delve-core` | Ids, coordinates, bounding boxes, environment values, settings |
//! | [`grid`] | `delve-grid` | Squares, borders, the merge protocol, transactions |
//! | [`dungeon`] | `delve-dungeon` | Levels, shafts, composites and the [`World`](dungeon::World) |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Value types, ids and settings (`delve-core`).
pub use delve_core as types;

/// The square/border arena (`delve-grid`).
///
/// [`grid::Grid`] owns every square and border; adjacency is only created
/// through [`grid::Grid::merge_squares`] and [`grid::Grid::merge_borders`].
pub use delve_grid as grid;

/// The dungeon tree (`delve-dungeon`).
pub use delve_dungeon as dungeon;

/// Common imports for typical Delve usage.
///
/// ```rust
/// use delve::prelude::*;
/// ```
pub mod prelude {
    // Geometry and values
    pub use delve_core::{
        Coordinate, CoordinateSystem, Direction, DungeonId, EnvironmentConfig, Humidity, Scale,
        SquareId, Temperature,
    };

    // Grid
    pub use delve_grid::{BorderKind, Equilibration, Grid, Square, SquareBuilder};

    // Dungeons
    pub use delve_dungeon::{DungeonKind, LeafShape, World, WorldConfig};

    // Errors
    pub use delve_core::{ConfigError, CoordError, EnvironmentError};
    pub use delve_dungeon::DungeonError;
    pub use delve_grid::GridError;
}
