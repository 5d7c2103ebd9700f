//! CSV boundary loader.
//!
//! # CSV format
//!
//! One row per vertex, in polygon order.  The polygon is closed implicitly.
//!
//! ```csv
//! x,z
//! 0,0
//! 10,0
//! 15,15
//! 0,20
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use pm_core::GroundPoint;

use crate::{Boundary, PatrolError, PatrolResult};

#[derive(Deserialize)]
struct BoundaryRecord {
    x: f32,
    z: f32,
}

/// Load a [`Boundary`] from a CSV file.
pub fn load_boundary_csv(path: &Path) -> PatrolResult<Boundary> {
    let file = std::fs::File::open(path).map_err(PatrolError::Io)?;
    load_boundary_reader(file)
}

/// Like [`load_boundary_csv`] but accepts any `Read` source.
pub fn load_boundary_reader<R: Read>(reader: R) -> PatrolResult<Boundary> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let vertices = csv_reader
        .deserialize::<BoundaryRecord>()
        .map(|row| {
            row.map(|r| GroundPoint::new(r.x, r.z))
                .map_err(|e| PatrolError::Parse(e.to_string()))
        })
        .collect::<PatrolResult<Vec<_>>>()?;

    Boundary::new(vertices)
}
