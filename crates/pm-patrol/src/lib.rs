//! `pm-patrol`: where agents go when nothing else is happening.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`boundary`] | `Boundary`, `BoundingBox`, `point_in_polygon`               |
//! | [`grid`]     | grid sampling, center fallback, edge sampling, `plan_patrol`|
//! | [`route`]    | `PatrolRoute` with R-tree nearest-waypoint lookup           |
//! | [`loader`]   | `load_boundary_csv`, `load_boundary_reader`                 |
//! | [`error`]    | `PatrolError`, `PatrolResult`                               |

pub mod boundary;
pub mod error;
pub mod grid;
pub mod loader;
pub mod route;

#[cfg(test)]
mod tests;

pub use boundary::{Boundary, BoundingBox, point_in_polygon};
pub use error::{PatrolError, PatrolResult};
pub use grid::{generate_patrol_points, grid_samples, plan_patrol};
pub use loader::{load_boundary_csv, load_boundary_reader};
pub use route::PatrolRoute;
