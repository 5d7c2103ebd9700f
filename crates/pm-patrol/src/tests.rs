//! Unit tests for pm-patrol.

use pm_core::{GroundPoint, Vec3};

use crate::Boundary;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// 10 × 10 square with a corner at the origin.
fn square() -> Boundary {
    Boundary::new(vec![
        GroundPoint::new(0.0, 0.0),
        GroundPoint::new(10.0, 0.0),
        GroundPoint::new(10.0, 10.0),
        GroundPoint::new(0.0, 10.0),
    ])
    .unwrap()
}

// ── Boundary ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod boundary_tests {
    use super::*;
    use crate::{PatrolError, point_in_polygon};

    #[test]
    fn inside_and_outside_square() {
        let b = square();
        assert!(b.contains(GroundPoint::new(5.0, 5.0)));
        assert!(!b.contains(GroundPoint::new(15.0, 5.0)));
        assert!(!b.contains(GroundPoint::new(5.0, -0.5)));
    }

    #[test]
    fn edge_points_are_stable() {
        let b = square();
        for p in [
            GroundPoint::new(0.0, 5.0),
            GroundPoint::new(10.0, 5.0),
            GroundPoint::new(5.0, 0.0),
            GroundPoint::new(5.0, 10.0),
            GroundPoint::new(0.0, 0.0),
        ] {
            let first = b.contains(p);
            for _ in 0..3 {
                assert_eq!(b.contains(p), first, "unstable at {p:?}");
            }
        }
        // Half-open rule: the left edge counts as inside, the right edge does not.
        assert!(b.contains(GroundPoint::new(0.0, 5.0)));
        assert!(!b.contains(GroundPoint::new(10.0, 5.0)));
    }

    #[test]
    fn concave_notch_is_outside() {
        // U shape open toward +z.
        let u = Boundary::new(vec![
            GroundPoint::new(0.0, 0.0),
            GroundPoint::new(9.0, 0.0),
            GroundPoint::new(9.0, 9.0),
            GroundPoint::new(6.0, 9.0),
            GroundPoint::new(6.0, 3.0),
            GroundPoint::new(3.0, 3.0),
            GroundPoint::new(3.0, 9.0),
            GroundPoint::new(0.0, 9.0),
        ])
        .unwrap();
        assert!(u.contains(GroundPoint::new(1.5, 6.0)));
        assert!(u.contains(GroundPoint::new(7.5, 6.0)));
        assert!(!u.contains(GroundPoint::new(4.5, 6.0)));
        assert!(u.contains(GroundPoint::new(4.5, 1.5)));
    }

    #[test]
    fn too_few_vertices_rejected() {
        let err = Boundary::new(vec![GroundPoint::new(0.0, 0.0), GroundPoint::new(1.0, 0.0)]).unwrap_err();
        assert!(matches!(err, PatrolError::TooFewVertices(2)));
        assert!(!point_in_polygon(GroundPoint::new(0.0, 0.0), &[]));
    }

    #[test]
    fn non_finite_vertex_rejected() {
        let err = Boundary::new(vec![
            GroundPoint::new(0.0, 0.0),
            GroundPoint::new(f32::NAN, 0.0),
            GroundPoint::new(1.0, 1.0),
        ])
        .unwrap_err();
        assert!(matches!(err, PatrolError::NonFinite { index: 1 }));
    }

    #[test]
    fn bbox_and_centroid() {
        let b = square();
        let bb = b.bounding_box();
        assert_eq!((bb.min_x, bb.max_x, bb.min_z, bb.max_z), (0.0, 10.0, 0.0, 10.0));
        assert_eq!(bb.center(), GroundPoint::new(5.0, 5.0));
        assert_eq!(b.centroid(), GroundPoint::new(5.0, 5.0));
        assert_eq!(b.edges().count(), 4);
    }
}

// ── Grid generation ───────────────────────────────────────────────────────────

#[cfg(test)]
mod grid_tests {
    use super::*;
    use crate::{generate_patrol_points, grid::append_edge_points, grid_samples, plan_patrol};
    use pm_core::{AgentConfig, MAX_GRID_RESOLUTION};

    #[test]
    fn deterministic_x_outer_order() {
        let b = square();
        let a = generate_patrol_points(&b, 3, 1.0, 4.9);
        let again = generate_patrol_points(&b, 3, 1.0, 4.9);
        assert_eq!(a, again);
        assert_eq!(a.len(), 9);
        assert_eq!(a[0], Vec3::new(1.0, 4.9, 1.0));
        assert_eq!(a[1], Vec3::new(1.0, 4.9, 5.0));
        assert_eq!(a[3], Vec3::new(5.0, 4.9, 1.0));
        assert!(a.iter().all(|p| p.y == 4.9));
    }

    #[test]
    fn default_resolution_stays_inside() {
        let b = square();
        let points = generate_patrol_points(&b, 20, 1.0, 4.9);
        assert!(!points.is_empty());
        assert!(points.len() <= 400);
        assert!(points.iter().all(|p| b.contains(p.ground())));
    }

    #[test]
    fn resolution_one_is_center() {
        let points = generate_patrol_points(&square(), 1, 1.0, 2.0);
        assert_eq!(points, vec![Vec3::new(5.0, 2.0, 5.0)]);
    }

    #[test]
    fn resolution_zero_falls_back_to_center() {
        let points = generate_patrol_points(&square(), 0, 1.0, 4.9);
        assert_eq!(points, vec![Vec3::new(5.0, 4.9, 5.0)]);
    }

    #[test]
    fn huge_resolution_is_clamped() {
        let b = square();
        let points = grid_samples(&b, u32::MAX, 1.0, 4.9);
        let cap = MAX_GRID_RESOLUTION as usize;
        assert!(!points.is_empty());
        assert!(points.len() <= cap * cap);
        assert_eq!(points.len(), grid_samples(&b, MAX_GRID_RESOLUTION, 1.0, 4.9).len());
    }

    #[test]
    fn oversized_padding_falls_back_to_center() {
        let points = generate_patrol_points(&square(), 20, 6.0, 4.9);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0], Vec3::new(5.0, 4.9, 5.0));
    }

    #[test]
    fn edge_points_pulled_inside() {
        let b = square();
        let mut points = Vec::new();
        append_edge_points(&b, 1.0, 3.0, &mut points);
        assert_eq!(points.len(), 24);
        assert!(points.iter().all(|p| b.contains(p.ground()) && p.y == 3.0));
        // Re-running adds nothing: every candidate is already present.
        append_edge_points(&b, 1.0, 3.0, &mut points);
        assert_eq!(points.len(), 24);
    }

    #[test]
    fn plan_appends_home_anchor_last() {
        let cfg = AgentConfig {
            boundary:        square().vertices().to_vec(),
            grid_resolution: 3,
            padding:         1.0,
            height:          10.0,
            edge_sampling:   true,
            home:            Some(Vec3::new(3.0, 0.0, 3.0)),
            ..AgentConfig::default()
        };
        let points = plan_patrol(&square(), &cfg);
        assert_eq!(points.len(), 9 + 24 + 1);
        assert_eq!(points.last().copied(), Some(Vec3::new(3.0, 10.0, 3.0)));
    }

    #[test]
    fn plan_without_edge_sampling_is_grid_only() {
        let cfg = AgentConfig {
            boundary:        square().vertices().to_vec(),
            grid_resolution: 3,
            padding:         1.0,
            home:            Some(Vec3::new(3.0, 0.0, 3.0)),
            ..AgentConfig::default()
        };
        assert_eq!(plan_patrol(&square(), &cfg).len(), 9);
    }
}

// ── PatrolRoute ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod route_tests {
    use super::*;
    use crate::PatrolRoute;

    #[test]
    fn nearest_prefers_lowest_index_on_tie() {
        let route = PatrolRoute::new(vec![
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
        ]);
        assert_eq!(route.nearest_index(Vec3::ZERO), Some(1));
        assert_eq!(route.nearest_index(Vec3::new(4.0, 0.0, 0.0)), Some(0));
    }

    #[test]
    fn nearest_uses_height() {
        let route = PatrolRoute::new(vec![Vec3::new(0.0, 10.0, 0.0), Vec3::new(3.0, 0.0, 0.0)]);
        assert_eq!(route.nearest_index(Vec3::ZERO), Some(1));
    }

    #[test]
    fn non_finite_query_has_no_nearest() {
        let route = PatrolRoute::new(vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)]);
        assert_eq!(route.nearest_index(Vec3::new(f32::NAN, 0.0, 0.0)), None);
        assert_eq!(route.nearest_index(Vec3::new(0.0, f32::INFINITY, 0.0)), None);
    }

    #[test]
    fn append_extends_index() {
        let mut route = PatrolRoute::new(vec![Vec3::new(5.0, 0.0, 0.0)]);
        route.append(Vec3::new(0.0, 0.0, 0.5));
        assert_eq!(route.len(), 2);
        assert_eq!(route.get(1), Some(Vec3::new(0.0, 0.0, 0.5)));
        assert_eq!(route.nearest_index(Vec3::ZERO), Some(1));
    }

    #[test]
    fn clone_is_independent() {
        let route = PatrolRoute::new(vec![Vec3::ZERO]);
        let mut copy = route.clone();
        copy.append(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(route.len(), 1);
        assert_eq!(copy.len(), 2);
    }

    #[test]
    fn empty_route() {
        let route = PatrolRoute::default();
        assert!(route.is_empty());
        assert_eq!(route.nearest_index(Vec3::ZERO), None);
        assert_eq!(route.get(0), None);
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader_tests {
    use std::io::{Cursor, Write};

    use super::*;
    use crate::{PatrolError, load_boundary_csv, load_boundary_reader};

    const CSV: &str = "x,z\n0,0\n10,0\n10,10\n0,10\n";

    #[test]
    fn reader_loads_vertices_in_order() {
        let b = load_boundary_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(b, square());
    }

    #[test]
    fn whitespace_is_trimmed() {
        let b = load_boundary_reader(Cursor::new("x, z\n 0, 0\n 4 ,0\n0, 4\n")).unwrap();
        assert_eq!(b.vertices().len(), 3);
    }

    #[test]
    fn too_few_rows() {
        let err = load_boundary_reader(Cursor::new("x,z\n0,0\n1,1\n")).unwrap_err();
        assert!(matches!(err, PatrolError::TooFewVertices(2)));
    }

    #[test]
    fn bad_number_is_parse_error() {
        let err = load_boundary_reader(Cursor::new("x,z\n0,0\nabc,1\n2,2\n")).unwrap_err();
        assert!(matches!(err, PatrolError::Parse(_)));
    }

    #[test]
    fn file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let b = load_boundary_csv(file.path()).unwrap();
        assert!(b.contains(GroundPoint::new(5.0, 5.0)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_boundary_csv(&dir.path().join("none.csv")).unwrap_err();
        assert!(matches!(err, PatrolError::Io(_)));
    }
}
