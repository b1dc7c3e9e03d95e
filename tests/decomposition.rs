use vhacd3d::na::Point3;
use vhacd3d::{
    check_convex_hull, decompose, Decomposer, DecompositionError, FillMode, Parameters, Stage,
};

/// An axis-aligned cuboid as a triangle mesh.
fn cuboid(mins: Point3<f64>, maxs: Point3<f64>) -> (Vec<Point3<f64>>, Vec<[u32; 3]>) {
    let points = vec![
        Point3::new(mins.x, mins.y, mins.z),
        Point3::new(maxs.x, mins.y, mins.z),
        Point3::new(maxs.x, maxs.y, mins.z),
        Point3::new(mins.x, maxs.y, mins.z),
        Point3::new(mins.x, mins.y, maxs.z),
        Point3::new(maxs.x, mins.y, maxs.z),
        Point3::new(maxs.x, maxs.y, maxs.z),
        Point3::new(mins.x, maxs.y, maxs.z),
    ];
    let triangles = vec![
        [0, 2, 1],
        [0, 3, 2],
        [4, 5, 6],
        [4, 6, 7],
        [0, 1, 5],
        [0, 5, 4],
        [1, 2, 6],
        [1, 6, 5],
        [2, 3, 7],
        [2, 7, 6],
        [3, 0, 4],
        [3, 4, 7],
    ];
    (points, triangles)
}

/// The unit cube: 8 vertices, 12 triangles.
fn unit_cube() -> (Vec<Point3<f64>>, Vec<[u32; 3]>) {
    cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
}

/// Two cubes joined by a thin bar along the X axis: not representable by a
/// single convex hull without gross volume error.
fn dumbbell() -> (Vec<Point3<f64>>, Vec<[u32; 3]>) {
    let mut points = Vec::new();
    let mut triangles = Vec::new();

    let parts = [
        cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)),
        cuboid(Point3::new(2.0, 0.0, 0.0), Point3::new(3.0, 1.0, 1.0)),
        cuboid(Point3::new(1.0, 0.4, 0.4), Point3::new(2.0, 0.6, 0.6)),
    ];

    for (part_points, part_triangles) in parts {
        let base = points.len() as u32;
        points.extend(part_points);
        triangles.extend(
            part_triangles
                .iter()
                .map(|t| [t[0] + base, t[1] + base, t[2] + base]),
        );
    }

    (points, triangles)
}

fn assert_well_formed(decomposition: &vhacd3d::Decomposition, params: &Parameters) {
    assert!(decomposition.hulls().len() <= params.max_convex_hulls as usize);

    for hull in decomposition.hulls() {
        assert!(hull.points().len() <= params.max_vertices_per_hull as usize);

        if hull.points().len() >= 4 && hull.volume() > 0.0 {
            assert_eq!(check_convex_hull(hull.points(), hull.triangles()), Ok(()));
        }
    }
}

#[test]
fn unit_cube_yields_one_exact_hull() {
    let (points, triangles) = unit_cube();
    let params = Parameters {
        max_convex_hulls: 1,
        ..Parameters::default()
    };

    let decomposition = decompose(&params, &points, &triangles).unwrap();
    assert!(!decomposition.interrupted());
    assert_eq!(decomposition.hulls().len(), 1);
    assert_well_formed(&decomposition, &params);

    let hull = &decomposition.hulls()[0];
    assert_eq!(hull.points().len(), 8);
    assert!((hull.volume() - 1.0).abs() <= 0.01);
}

#[test]
fn cube_yields_one_hull_in_every_fill_mode() {
    let (points, triangles) = unit_cube();

    for fill_mode in [
        FillMode::FloodFill,
        FillMode::RaycastFill,
        FillMode::SurfaceOnly,
    ] {
        let params = Parameters {
            max_convex_hulls: 1,
            resolution: 10_000,
            // Surface-only voxelization keeps the shell only, which recurses
            // deep before the merge step folds everything back together;
            // bounding the depth keeps this test fast.
            max_recursion_depth: 4,
            fill_mode,
            ..Parameters::default()
        };

        let decomposition = decompose(&params, &points, &triangles).unwrap();
        assert_eq!(decomposition.hulls().len(), 1, "fill mode {fill_mode:?}");
        assert_well_formed(&decomposition, &params);

        let hull = &decomposition.hulls()[0];
        assert!(
            (hull.volume() - 1.0).abs() <= 0.05,
            "fill mode {fill_mode:?}, volume {}",
            hull.volume()
        );
    }
}

#[test]
fn dumbbell_needs_at_least_two_hulls() {
    let (points, triangles) = dumbbell();
    let params = Parameters {
        max_convex_hulls: 3,
        resolution: 10_000,
        min_volume_percent_error: 0.5,
        ..Parameters::default()
    };

    let decomposition = decompose(&params, &points, &triangles).unwrap();
    assert!(!decomposition.interrupted());
    assert!(decomposition.hulls().len() >= 2);
    assert!(decomposition.hulls().len() <= 3);
    assert_well_formed(&decomposition, &params);

    // The hulls together should approximate the dumbbell volume (2.04) far
    // better than a single hull (which would include the gap, ~3).
    let total: f64 = decomposition.hulls().iter().map(|h| h.volume()).sum();
    assert!(total < 2.6, "total hull volume {total}");
}

#[test]
fn hull_and_vertex_budgets_are_respected() {
    let (points, triangles) = dumbbell();
    let params = Parameters {
        max_convex_hulls: 2,
        max_vertices_per_hull: 16,
        resolution: 10_000,
        min_volume_percent_error: 0.1,
        ..Parameters::default()
    };

    let decomposition = decompose(&params, &points, &triangles).unwrap();
    assert!(!decomposition.hulls().is_empty());
    assert_well_formed(&decomposition, &params);
}

#[test]
fn recursion_depth_is_bounded() {
    let (points, triangles) = dumbbell();
    let params = Parameters {
        resolution: 10_000,
        min_volume_percent_error: 0.001,
        max_recursion_depth: 3,
        ..Parameters::default()
    };

    let decomposition = decompose(&params, &points, &triangles).unwrap();
    assert!(decomposition.stats().max_depth_reached <= 3);
    assert!(decomposition.hulls().len() > 1);
    assert_well_formed(&decomposition, &params);
}

#[test]
fn sequential_runs_are_bit_identical() {
    let (points, triangles) = dumbbell();
    let params = Parameters {
        resolution: 10_000,
        async_acd: false,
        ..Parameters::default()
    };

    let first = decompose(&params, &points, &triangles).unwrap();
    let second = decompose(&params, &points, &triangles).unwrap();

    assert_eq!(first.hulls().len(), second.hulls().len());

    for (a, b) in first.hulls().iter().zip(second.hulls().iter()) {
        assert_eq!(a.points(), b.points());
        assert_eq!(a.triangles(), b.triangles());
        assert_eq!(a.volume().to_bits(), b.volume().to_bits());
    }
}

#[test]
fn parallel_runs_match_sequential_runs() {
    let (points, triangles) = dumbbell();
    let sequential = Parameters {
        resolution: 10_000,
        async_acd: false,
        ..Parameters::default()
    };
    let parallel = Parameters {
        async_acd: true,
        ..sequential.clone()
    };

    let first = decompose(&sequential, &points, &triangles).unwrap();
    let second = decompose(&parallel, &points, &triangles).unwrap();

    assert_eq!(first.hulls().len(), second.hulls().len());

    for (a, b) in first.hulls().iter().zip(second.hulls().iter()) {
        assert_eq!(a.points(), b.points());
        assert_eq!(a.triangles(), b.triangles());
    }
}

#[test]
fn error_tolerance_tightening_improves_the_approximation() {
    let (points, triangles) = dumbbell();
    let true_volume = 2.0 + 1.0 * 0.2 * 0.2;

    let mut previous_error = f64::MAX;

    for tolerance in [10.0, 1.0, 0.2] {
        let params = Parameters {
            max_convex_hulls: 64,
            resolution: 10_000,
            min_volume_percent_error: tolerance,
            shrink_wrap: false,
            ..Parameters::default()
        };

        let decomposition = decompose(&params, &points, &triangles).unwrap();
        let total: f64 = decomposition.hulls().iter().map(|h| h.volume()).sum();
        let error = (total - true_volume).abs() / true_volume;

        // Sampled monotonicity: a tighter tolerance must not significantly
        // degrade the volume approximation.
        assert!(error <= previous_error + 0.02, "tolerance {tolerance}");
        previous_error = error;
    }
}

#[test]
fn empty_and_malformed_meshes_yield_empty_results() {
    let params = Parameters::default();

    let empty = decompose(&params, &[], &[]).unwrap();
    assert!(empty.hulls().is_empty());
    assert!(!empty.interrupted());

    let (points, _) = unit_cube();
    let out_of_bounds = decompose(&params, &points, &[[0, 1, 64]]).unwrap();
    assert!(out_of_bounds.hulls().is_empty());

    let nan_points = vec![Point3::new(f64::NAN, 0.0, 0.0); 3];
    let non_finite = decompose(&params, &nan_points, &[[0, 1, 2]]).unwrap();
    assert!(non_finite.hulls().is_empty());
}

#[test]
fn invalid_parameters_are_rejected_eagerly() {
    let params = Parameters {
        resolution: 100,
        ..Parameters::default()
    };

    assert!(matches!(
        Decomposer::new(params),
        Err(DecompositionError::InvalidParameter { name: "resolution", .. })
    ));
}

#[test]
fn flat_buffer_interface_matches_the_typed_one() {
    let (points, triangles) = unit_cube();
    let vertices: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y, p.z]).collect();
    let indices: Vec<u32> = triangles.iter().flatten().copied().collect();

    let params = Parameters {
        max_convex_hulls: 1,
        resolution: 10_000,
        ..Parameters::default()
    };

    let decomposer = Decomposer::new(params).unwrap();
    let typed = decomposer.decompose(&points, &triangles).unwrap();
    let flat = decomposer.decompose_buffers(&vertices, &indices).unwrap();

    assert_eq!(typed.hulls().len(), flat.hulls().len());
    assert_eq!(
        typed.hulls()[0].flat_points(),
        flat.hulls()[0].flat_points()
    );
    assert_eq!(
        typed.hulls()[0].flat_triangles(),
        flat.hulls()[0].flat_triangles()
    );

    // Misaligned buffers are reported and yield an empty result.
    let truncated = decomposer.decompose_buffers(&vertices[..10], &indices).unwrap();
    assert!(truncated.hulls().is_empty());
}

#[test]
fn pre_cancelled_run_returns_an_empty_partial_result() {
    let (points, triangles) = dumbbell();
    let params = Parameters {
        resolution: 10_000,
        async_acd: false,
        ..Parameters::default()
    };

    let decomposer = Decomposer::new(params).unwrap();
    decomposer.cancellation_token().cancel();

    let decomposition = decomposer.decompose(&points, &triangles).unwrap();
    assert!(decomposition.interrupted());
    assert!(decomposition.hulls().is_empty());
}

#[test]
fn mid_run_cancellation_returns_a_well_formed_partial_result() {
    let (points, triangles) = dumbbell();
    let params = Parameters {
        resolution: 10_000,
        min_volume_percent_error: 0.05,
        async_acd: false,
        ..Parameters::default()
    };

    let decomposer = Decomposer::new(params.clone()).unwrap();
    let token = decomposer.cancellation_token();

    // Cancel once part of the volume reached a terminal cluster: the
    // remaining clusters are abandoned mid-run.
    let decomposer = decomposer.with_progress(move |stage, fraction| {
        if stage == Stage::Decomposition && fraction > 0.3 {
            token.cancel();
        }
    });

    let decomposition = decomposer.decompose(&points, &triangles).unwrap();
    assert!(decomposition.interrupted());

    for hull in decomposition.hulls() {
        if hull.points().len() >= 4 && hull.volume() > 0.0 {
            assert_eq!(check_convex_hull(hull.points(), hull.triangles()), Ok(()));
        }
    }
}
