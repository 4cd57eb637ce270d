//! Mathematical utilities for the frame element and the global system

use nalgebra::{DMatrix, DVector, SMatrix, SVector};

pub type Mat = DMatrix<f64>;
pub type DVec = DVector<f64>;

/// 6x6 matrix for element stiffness (3 DOFs per node)
pub type Mat6 = SMatrix<f64, 6, 6>;
/// 6-element vector for element forces/displacements
pub type Vec6 = SVector<f64, 6>;

/// Compute the local stiffness matrix for a planar Euler-Bernoulli frame
/// element
///
/// DOF order: [u_i, v_i, theta_i, u_j, v_j, theta_j] with u along the
/// element axis, v perpendicular to it and theta counterclockwise.
///
/// # Arguments
/// * `ea` - Axial stiffness EA
/// * `ei` - Bending stiffness EI
/// * `length` - Element length
pub fn element_local_stiffness(ea: f64, ei: f64, length: f64) -> Mat6 {
    let l = length;
    let l2 = l * l;
    let l3 = l2 * l;

    let ea_l = ea / l;
    let ei_l3 = ei / l3;
    let ei_l2 = ei / l2;
    let ei_l = ei / l;

    #[rustfmt::skip]
    let data = [
        // Row 0: axial at i
        ea_l,   0.0,           0.0,          -ea_l,  0.0,           0.0,
        // Row 1: shear at i
        0.0,    12.0*ei_l3,    6.0*ei_l2,     0.0,  -12.0*ei_l3,    6.0*ei_l2,
        // Row 2: moment at i
        0.0,    6.0*ei_l2,     4.0*ei_l,      0.0,  -6.0*ei_l2,     2.0*ei_l,
        // Row 3: axial at j
        -ea_l,  0.0,           0.0,           ea_l,  0.0,           0.0,
        // Row 4: shear at j
        0.0,   -12.0*ei_l3,   -6.0*ei_l2,     0.0,   12.0*ei_l3,   -6.0*ei_l2,
        // Row 5: moment at j
        0.0,    6.0*ei_l2,     2.0*ei_l,      0.0,  -6.0*ei_l2,     4.0*ei_l,
    ];

    Mat6::from_row_slice(&data)
}

/// Compute the transformation matrix from global to element-local
/// coordinates
///
/// Built from the element's direction cosines; two identical 3x3 blocks,
/// one per node, with the rotation DOF unaffected.
pub fn element_transformation(cos: f64, sin: f64) -> Mat6 {
    let mut t = Mat6::zeros();

    for block in 0..2 {
        let o = block * 3;
        t[(o, o)] = cos;
        t[(o, o + 1)] = sin;
        t[(o + 1, o)] = -sin;
        t[(o + 1, o + 1)] = cos;
        t[(o + 2, o + 2)] = 1.0;
    }

    t
}

/// Apply static condensation for released DOFs
///
/// Released rows/columns come back as zeros; the retained block is the
/// condensed stiffness k11 - k12 * inv(k22) * k21.
///
/// # Arguments
/// * `k` - Full stiffness matrix
/// * `releases` - Boolean array indicating which DOFs are released
pub fn apply_releases(k: &Mat6, releases: &[bool; 6]) -> Mat6 {
    let (unreleased, released) = partition_indices(releases);

    if released.is_empty() {
        return *k;
    }

    let n1 = unreleased.len();
    let n2 = released.len();

    let mut k11 = DMatrix::zeros(n1, n1);
    let mut k12 = DMatrix::zeros(n1, n2);
    let mut k21 = DMatrix::zeros(n2, n1);
    let mut k22 = DMatrix::zeros(n2, n2);

    for (i, &ui) in unreleased.iter().enumerate() {
        for (j, &uj) in unreleased.iter().enumerate() {
            k11[(i, j)] = k[(ui, uj)];
        }
        for (j, &rj) in released.iter().enumerate() {
            k12[(i, j)] = k[(ui, rj)];
        }
    }

    for (i, &ri) in released.iter().enumerate() {
        for (j, &uj) in unreleased.iter().enumerate() {
            k21[(i, j)] = k[(ri, uj)];
        }
        for (j, &rj) in released.iter().enumerate() {
            k22[(i, j)] = k[(ri, rj)];
        }
    }

    let k22_inv = match k22.clone().try_inverse() {
        Some(inv) => inv,
        None => return *k,
    };

    let k_condensed = &k11 - &k12 * &k22_inv * &k21;

    let mut k_result = Mat6::zeros();
    for (i, &ui) in unreleased.iter().enumerate() {
        for (j, &uj) in unreleased.iter().enumerate() {
            k_result[(ui, uj)] = k_condensed[(i, j)];
        }
    }

    k_result
}

/// Apply static condensation to the fixed-end force vector for released
/// DOFs: fer_condensed = fer1 - k12 * inv(k22) * fer2
///
/// # Arguments
/// * `fer` - Uncondensed fixed-end force vector
/// * `k` - Uncondensed local stiffness matrix
/// * `releases` - Boolean array indicating which DOFs are released
pub fn apply_fer_releases(fer: &Vec6, k: &Mat6, releases: &[bool; 6]) -> Vec6 {
    let (unreleased, released) = partition_indices(releases);

    if released.is_empty() {
        return *fer;
    }

    let n1 = unreleased.len();
    let n2 = released.len();

    let mut k12 = DMatrix::zeros(n1, n2);
    let mut k22 = DMatrix::zeros(n2, n2);

    for (i, &ui) in unreleased.iter().enumerate() {
        for (j, &rj) in released.iter().enumerate() {
            k12[(i, j)] = k[(ui, rj)];
        }
    }
    for (i, &ri) in released.iter().enumerate() {
        for (j, &rj) in released.iter().enumerate() {
            k22[(i, j)] = k[(ri, rj)];
        }
    }

    let mut fer1 = DVector::zeros(n1);
    let mut fer2 = DVector::zeros(n2);
    for (i, &ui) in unreleased.iter().enumerate() {
        fer1[i] = fer[ui];
    }
    for (i, &ri) in released.iter().enumerate() {
        fer2[i] = fer[ri];
    }

    let k22_inv = match k22.clone().try_inverse() {
        Some(inv) => inv,
        None => return *fer,
    };

    let fer_condensed = &fer1 - &k12 * &k22_inv * &fer2;

    let mut fer_result = Vec6::zeros();
    for (i, &ui) in unreleased.iter().enumerate() {
        fer_result[ui] = fer_condensed[i];
    }

    fer_result
}

/// Recover the displacements of released DOFs by back-substitution
///
/// A condensed DOF carries no force: k21 * d1 + k22 * d2 + fer2 = 0, so
/// d2 = -inv(k22) * (k21 * d1 + fer2). Returns the local displacement
/// vector with released entries replaced by the recovered values, which
/// makes displacement interpolation exact at hinge ends.
pub fn recover_released_displacements(
    d: &Vec6,
    fer: &Vec6,
    k: &Mat6,
    releases: &[bool; 6],
) -> Vec6 {
    let (unreleased, released) = partition_indices(releases);

    if released.is_empty() {
        return *d;
    }

    let n1 = unreleased.len();
    let n2 = released.len();

    let mut k21 = DMatrix::zeros(n2, n1);
    let mut k22 = DMatrix::zeros(n2, n2);

    for (i, &ri) in released.iter().enumerate() {
        for (j, &uj) in unreleased.iter().enumerate() {
            k21[(i, j)] = k[(ri, uj)];
        }
        for (j, &rj) in released.iter().enumerate() {
            k22[(i, j)] = k[(ri, rj)];
        }
    }

    let mut d1 = DVector::zeros(n1);
    let mut fer2 = DVector::zeros(n2);
    for (i, &ui) in unreleased.iter().enumerate() {
        d1[i] = d[ui];
    }
    for (i, &ri) in released.iter().enumerate() {
        fer2[i] = fer[ri];
    }

    let k22_inv = match k22.clone().try_inverse() {
        Some(inv) => inv,
        None => return *d,
    };

    let d2 = -&k22_inv * (&k21 * &d1 + &fer2);

    let mut d_result = *d;
    for (i, &ri) in released.iter().enumerate() {
        d_result[ri] = d2[i];
    }

    d_result
}

fn partition_indices(releases: &[bool; 6]) -> (Vec<usize>, Vec<usize>) {
    let unreleased = releases
        .iter()
        .enumerate()
        .filter_map(|(i, &released)| if !released { Some(i) } else { None })
        .collect();
    let released = releases
        .iter()
        .enumerate()
        .filter_map(|(i, &released)| if released { Some(i) } else { None })
        .collect();
    (unreleased, released)
}

/// Compute fixed-end forces for uniform distributed loads
///
/// For a transverse intensity q over length L the end shears are qL/2 and
/// the end moments qL²/12; an axial intensity contributes qL/2 at each end.
///
/// # Arguments
/// * `qx` - Axial intensity (local x, force per unit length)
/// * `qy` - Transverse intensity (local y, force per unit length)
/// * `length` - Element length
pub fn fer_uniform(qx: f64, qy: f64, length: f64) -> Vec6 {
    let l = length;
    let l2 = l * l;

    let mut fer = Vec6::zeros();

    fer[0] = -qx * l / 2.0;
    fer[3] = -qx * l / 2.0;

    fer[1] = -qy * l / 2.0;
    fer[2] = -qy * l2 / 12.0;
    fer[4] = -qy * l / 2.0;
    fer[5] = qy * l2 / 12.0;

    fer
}

/// Solve a linear system using LU decomposition
pub fn solve_linear_system(a: &Mat, b: &DVec) -> Option<DVec> {
    a.clone().lu().solve(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_local_stiffness_symmetry() {
        let k = element_local_stiffness(5e6, 8e3, 4.0);

        for i in 0..6 {
            for j in 0..6 {
                assert_relative_eq!(k[(i, j)], k[(j, i)], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_local_stiffness_terms() {
        let (ea, ei, l) = (5e6, 8e3, 4.0);
        let k = element_local_stiffness(ea, ei, l);

        assert_relative_eq!(k[(0, 0)], ea / l, epsilon = 1e-9);
        assert_relative_eq!(k[(1, 1)], 12.0 * ei / l.powi(3), epsilon = 1e-9);
        assert_relative_eq!(k[(2, 2)], 4.0 * ei / l, epsilon = 1e-9);
        assert_relative_eq!(k[(2, 5)], 2.0 * ei / l, epsilon = 1e-9);
    }

    #[test]
    fn test_transformation_horizontal() {
        let t = element_transformation(1.0, 0.0);
        assert_relative_eq!(t[(0, 0)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(t[(1, 1)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(t[(2, 2)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transformation_vertical() {
        // For a vertical element local x = global Y, local y = -global X
        let t = element_transformation(0.0, 1.0);
        assert_relative_eq!(t[(0, 1)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(t[(1, 0)], -1.0, epsilon = 1e-12);
        assert_relative_eq!(t[(2, 2)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transformation_is_orthogonal() {
        let angle: f64 = 0.7;
        let t = element_transformation(angle.cos(), angle.sin());
        let identity = t.transpose() * t;

        for i in 0..6 {
            for j in 0..6 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(identity[(i, j)], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_release_end_rotation_condenses_to_propped_stiffness() {
        let (ea, ei, l) = (5e6, 8e3, 4.0);
        let k = element_local_stiffness(ea, ei, l);
        let released = apply_releases(&k, &[false, false, false, false, false, true]);

        // Released row/column zeroed
        for i in 0..6 {
            assert_eq!(released[(5, i)], 0.0);
            assert_eq!(released[(i, 5)], 0.0);
        }

        // Transverse stiffness drops from 12EI/L^3 to 3EI/L^3
        assert_relative_eq!(released[(1, 1)], 3.0 * ei / l.powi(3), epsilon = 1e-9);
        // Axial terms unaffected
        assert_relative_eq!(released[(0, 0)], ea / l, epsilon = 1e-9);
    }

    #[test]
    fn test_fer_condensation_matches_propped_beam() {
        let (ea, ei, l) = (5e6, 8e3, 4.0);
        let q = -2e3;
        let k = element_local_stiffness(ea, ei, l);
        let fer = fer_uniform(0.0, q, l);
        let releases = [false, false, false, false, false, true];
        let condensed = apply_fer_releases(&fer, &k, &releases);

        // Propped cantilever fixed-end forces: 5qL/8 and 3qL/8 shears,
        // qL^2/8 moment at the fixed end, nothing at the released end
        assert_relative_eq!(condensed[1], -5.0 * q * l / 8.0, epsilon = 1e-9);
        assert_relative_eq!(condensed[2], -q * l * l / 8.0, epsilon = 1e-9);
        assert_relative_eq!(condensed[4], -3.0 * q * l / 8.0, epsilon = 1e-9);
        assert_eq!(condensed[5], 0.0);
    }

    #[test]
    fn test_recover_released_rotation() {
        let (ea, ei, l) = (5e6, 8e3, 4.0);
        let k = element_local_stiffness(ea, ei, l);
        let releases = [false, false, false, false, false, true];

        // Unit transverse displacement at j with every other retained DOF
        // held: the released rotation must satisfy zero moment at j
        let d = Vec6::new(0.0, 0.0, 0.0, 0.0, 1.0, 0.0);
        let fer = Vec6::zeros();
        let recovered = recover_released_displacements(&d, &fer, &k, &releases);

        // Moment at j: k[5][..] * d_full must vanish
        let mut moment = 0.0;
        for i in 0..6 {
            moment += k[(5, i)] * recovered[i];
        }
        assert_relative_eq!(moment, 0.0, epsilon = 1e-6);
        // Retained DOFs untouched
        assert_eq!(recovered[4], 1.0);
    }
}
