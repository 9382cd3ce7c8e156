//! Square and border arena for Delve dungeons.
//!
//! A [`Grid`] owns every square and every border. Squares reference one
//! border per [`Direction`](delve_core::Direction); a border touches one or
//! two squares. Adjacency is created only through the merge protocol
//! ([`Grid::merge_borders`], [`Grid::merge_squares`]), which keeps the
//! square/border graph symmetric and rejects self-adjacency.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`border`] | [`BorderKind`] variants and border slots |
//! | [`square`] | [`Square`] state, [`SquareBuilder`], environment derivations |
//! | [`grid`] | The arena, merge protocol, termination and transactions |
//! | [`audit`] | [`GridViolation`] and [`Grid::audit`] |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod audit;
pub mod border;
pub mod error;
pub mod grid;
mod journal;
pub mod square;

pub use audit::GridViolation;
pub use border::{Border, BorderKind};
pub use error::{BorderConstraintViolation, GridError};
pub use grid::{Equilibration, Grid};
pub use square::{Square, SquareBuilder, MAX_DOORS};
