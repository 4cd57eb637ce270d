//! Closed-form beam checks
//!
//! Every structure here has a textbook solution; the engine must reproduce
//! it to numerical precision.

use approx::assert_relative_eq;
use frame2d::prelude::*;

const EA: f64 = 5e6;
const EI: f64 = 8e3;

#[test]
fn cantilever_tip_displacement_matches_closed_form() {
    let length = 4.0;
    let load = -10e3;

    let mut model = FrameModel::new();
    let element = model
        .add_element_with([0.0, 0.0], [length, 0.0], Section::new(EA, EI))
        .unwrap();
    model.add_support_fixed(1).unwrap();
    model.add_point_load(2, PointLoad::force(0.0, load)).unwrap();

    let solved = model.solve().unwrap();

    // Tip deflection PL^3/3EI and rotation PL^2/2EI
    let tip = solved.node_displacement(2).unwrap();
    assert_relative_eq!(
        tip.uy,
        load * length.powi(3) / (3.0 * EI),
        max_relative = 1e-6
    );
    assert_relative_eq!(
        tip.rotation,
        load * length.powi(2) / (2.0 * EI),
        max_relative = 1e-6
    );

    // Fixed-end reactions balance the tip load
    let reaction = solved.reaction_at(1).unwrap();
    assert_relative_eq!(reaction.fy, -load, max_relative = 1e-9);
    assert_relative_eq!(reaction.mz, -load * length, max_relative = 1e-9);

    // Shear is constant, moment linear to zero at the tip
    assert_relative_eq!(
        solved.shear_force_at(element, 2.0).unwrap(),
        load,
        max_relative = 1e-9
    );
    assert_relative_eq!(
        solved.bending_moment_at(element, length).unwrap(),
        0.0,
        epsilon = 1e-6
    );
}

#[test]
fn simply_supported_beam_under_uniform_load() {
    let length = 6.0;
    let q = -5e3;

    // Two elements so the midspan value is a nodal result
    let mut model = FrameModel::new();
    let left = model
        .add_element_with([0.0, 0.0], [length / 2.0, 0.0], Section::new(EA, EI))
        .unwrap();
    let right = model
        .add_element_with([length / 2.0, 0.0], [length, 0.0], Section::new(EA, EI))
        .unwrap();

    model.add_support_hinged(1).unwrap();
    model.add_support_roll(3, RollDirection::X).unwrap();

    for element in [left, right] {
        model
            .add_distributed_load(element, DistributedLoad::new(q, LoadDirection::Element))
            .unwrap();
    }

    let solved = model.solve().unwrap();

    // Max bending moment qL^2/8 at midspan
    assert_relative_eq!(
        solved.bending_moment_at(left, length / 2.0).unwrap(),
        q * length.powi(2) / 8.0,
        max_relative = 1e-6
    );
    // Moments vanish at the pins
    assert_relative_eq!(
        solved.bending_moment_at(left, 0.0).unwrap(),
        0.0,
        epsilon = 1e-6
    );
    assert_relative_eq!(
        solved.bending_moment_at(right, length / 2.0).unwrap(),
        0.0,
        epsilon = 1e-6
    );

    // Midspan deflection 5qL^4/384EI
    let midspan = solved.node_displacement(2).unwrap();
    assert_relative_eq!(
        midspan.uy,
        5.0 * q * length.powi(4) / (384.0 * EI),
        max_relative = 1e-6
    );
    assert_relative_eq!(
        solved.displacement_at(left, length / 2.0).unwrap(),
        midspan.uy,
        max_relative = 1e-9
    );

    // Each support carries half the total load
    let r1 = solved.reaction_at(1).unwrap();
    let r3 = solved.reaction_at(3).unwrap();
    assert_relative_eq!(r1.fy, -q * length / 2.0, max_relative = 1e-9);
    assert_relative_eq!(r3.fy, -q * length / 2.0, max_relative = 1e-9);
    assert_relative_eq!(r1.fx, 0.0, epsilon = 1e-8);
    // The roll support reports nothing in its free directions
    assert_eq!(r3.fx, 0.0);
    assert_eq!(r3.mz, 0.0);

    // End shears are +-qL/2
    assert_relative_eq!(
        solved.shear_force_at(left, 0.0).unwrap(),
        q * length / 2.0,
        max_relative = 1e-9
    );
    assert_relative_eq!(
        solved.shear_force_at(right, length / 2.0).unwrap(),
        -q * length / 2.0,
        max_relative = 1e-9
    );
}

#[test]
fn internal_hinge_releases_the_moment() {
    let half = 3.0;
    let load = -10e3;

    // Two cantilevers joined by a hinge at midspan
    let mut model = FrameModel::new();
    let left = model
        .add_element_with([0.0, 0.0], [half, 0.0], Section::new(EA, EI))
        .unwrap();
    let right = model
        .add_element_with([half, 0.0], [2.0 * half, 0.0], Section::new(EA, EI))
        .unwrap();

    model.add_support_fixed(1).unwrap();
    model.add_support_fixed(3).unwrap();
    model.add_internal_hinge(2).unwrap();
    model.add_point_load(2, PointLoad::force(0.0, load)).unwrap();

    let solved = model.solve().unwrap();

    // No moment transfers through the hinge
    assert_relative_eq!(
        solved.bending_moment_at(left, half).unwrap(),
        0.0,
        epsilon = 1e-6
    );
    assert_relative_eq!(
        solved.bending_moment_at(right, 0.0).unwrap(),
        0.0,
        epsilon = 1e-6
    );

    // Each half behaves as a cantilever carrying half the load
    let r1 = solved.reaction_at(1).unwrap();
    let r3 = solved.reaction_at(3).unwrap();
    assert_relative_eq!(r1.fy, -load / 2.0, max_relative = 1e-9);
    assert_relative_eq!(r3.fy, -load / 2.0, max_relative = 1e-9);
    assert_relative_eq!(r1.mz, -load / 2.0 * half, max_relative = 1e-9);

    // The hinge node still deflects
    let hinge = solved.node_displacement(2).unwrap();
    assert_relative_eq!(
        hinge.uy,
        (load / 2.0) * half.powi(3) / (3.0 * EI),
        max_relative = 1e-6
    );
}

#[test]
fn solving_twice_yields_identical_results() {
    let mut model = FrameModel::new();
    model.add_element([0.0, 0.0], [0.0, 5.0]).unwrap();
    let beam = model.add_element([0.0, 5.0], [5.0, 5.0]).unwrap();
    model.add_element([5.0, 5.0], [5.0, 0.0]).unwrap();
    model.add_support_fixed(1).unwrap();
    model.add_support_fixed(4).unwrap();
    model
        .add_distributed_load(beam, DistributedLoad::new(-5.0, LoadDirection::Element))
        .unwrap();

    let first = model.solve().unwrap();
    let second = model.solve().unwrap();

    for node_id in first.node_ids() {
        let a = first.node_displacement(node_id).unwrap();
        let b = second.node_displacement(node_id).unwrap();
        assert_eq!(a.ux, b.ux);
        assert_eq!(a.uy, b.uy);
        assert_eq!(a.rotation, b.rotation);

        let ra = first.reaction_at(node_id).unwrap();
        let rb = second.reaction_at(node_id).unwrap();
        assert_eq!(ra.fx, rb.fx);
        assert_eq!(ra.fy, rb.fy);
        assert_eq!(ra.mz, rb.mz);
    }

    for element_id in first.element_ids() {
        for s in [0.0, 1.25, 2.5, 5.0] {
            assert_eq!(
                first.bending_moment_at(element_id, s).unwrap(),
                second.bending_moment_at(element_id, s).unwrap()
            );
        }
    }
}
