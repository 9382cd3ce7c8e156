//! Dungeon composition for Delve.
//!
//! A [`World`] owns a [`Grid`](delve_grid::Grid) of squares and an arena of
//! dungeons arranged as a forest. Leaf dungeons ([`LeafShape::Level`],
//! [`LeafShape::Shaft`]) place squares at coordinates; composite dungeons
//! hold non-overlapping sub-dungeons inside their bounds.
//!
//! Adjacency is always computed from the root of a tree, so a square
//! placed in one leaf is joined to every square that touches it in world
//! space, including squares held by siblings elsewhere in the tree.
//!
//! # Atomicity
//!
//! Placement, composition and translation either complete or leave the
//! world unchanged. Placement and composition run their border merges in
//! a grid transaction; translation is planned in full before any dungeon
//! moves.
//!
//! # Consistency
//!
//! [`World::audit`] re-checks every invariant of the grid and the tree and
//! returns a [`DungeonViolation`] for each one that fails.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod audit;
mod composite;
pub mod config;
pub mod dungeon;
pub mod error;
pub mod iter;
mod leaf;
mod translate;
pub mod world;

pub use audit::DungeonViolation;
pub use config::WorldConfig;
pub use dungeon::{CompositeDungeon, Dungeon, DungeonKind, LeafDungeon, LeafShape};
pub use error::DungeonError;
pub use iter::FilteredSquares;
pub use world::{NeighbourSquares, World};
