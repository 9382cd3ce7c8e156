//! Value types for the Delve dungeon model.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! lattice geometry ([`Coordinate`], [`Direction`], [`CoordinateSystem`]),
//! the [`Couple`] container used for border adjacency, environment values
//! ([`Temperature`], [`Humidity`]) and the arena handles shared by the
//! grid and dungeon crates.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod coord;
pub mod couple;
pub mod environment;
pub mod error;
pub mod id;
pub mod system;

pub use config::EnvironmentConfig;
pub use coord::{Coordinate, Direction};
pub use couple::Couple;
pub use environment::{Humidity, Scale, Temperature};
pub use error::{ConfigError, CoordError, CoupleError, EnvironmentError};
pub use id::{BorderId, DungeonId, SquareId};
pub use system::{CoordinateSystem, NeighbourCoords};
