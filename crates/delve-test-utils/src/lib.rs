//! Test fixtures and logging setup for Delve development.
//!
//! Provides the reference composite scenario ([`ReferenceScenario`]),
//! small constructors for coordinates and squares, and [`init_tracing`]
//! for watching the library's `tracing` events during a test run.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::Once;

use delve_core::{Coordinate, CoordinateSystem, SquareId};
use delve_dungeon::World;
use delve_grid::SquareBuilder;
use tracing_subscriber::EnvFilter;

pub use fixtures::ReferenceScenario;

/// Install a test-writer `fmt` subscriber filtered by `RUST_LOG`
/// (default `warn`). Safe to call from every test.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

pub fn c(x: i32, y: i32, z: i32) -> Coordinate {
    Coordinate::new(x, y, z)
}

/// Box from two corners. Panics on inverted bounds.
pub fn boxed(lower: Coordinate, upper: Coordinate) -> CoordinateSystem {
    CoordinateSystem::new(lower, upper).expect("bounds must be ordered")
}

/// A default square: 20 °C, dry, walls on every side.
pub fn plain_square(world: &mut World) -> SquareId {
    square_with(world, SquareBuilder::new())
}

pub fn square_with(world: &mut World, builder: SquareBuilder) -> SquareId {
    world.insert_square(builder).expect("square must build")
}
