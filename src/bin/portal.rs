//! Portal frame demo
//!
//! Builds and solves the parametric portal frame: two columns of the given
//! height, a beam of the given span, fixed bases and a uniform load on the
//! beam. Usage:
//!
//!   portal [height] [span] [load] [--json]
//!
//! With `--json` the solved model is dumped as JSON instead of the report.

use anyhow::Result;
use frame2d::prelude::*;

fn arg_f64(args: &[String], index: usize, default_val: f64) -> f64 {
    args.get(index)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| *v > 0.0)
        .unwrap_or(default_val)
}

fn main() -> Result<()> {
    env_logger::init();

    let json = std::env::args().any(|a| a == "--json");
    let args: Vec<String> = std::env::args().skip(1).filter(|a| a != "--json").collect();

    let height = arg_f64(&args, 0, 5.0);
    let span = arg_f64(&args, 1, 5.0);
    let magnitude = arg_f64(&args, 2, 5.0);

    //     2 -------- 3
    //     |          |
    //     |          |
    //     1          4
    //     ^          ^
    //   Fixed      Fixed
    let mut model = FrameModel::new();
    let left_column = model.add_element([0.0, 0.0], [0.0, height])?;
    let beam = model.add_element([0.0, height], [span, height])?;
    let right_column = model.add_element([span, height], [span, 0.0])?;

    model.add_support_fixed(1)?;
    model.add_support_fixed(4)?;

    // Uniform downward load on the beam
    model.add_distributed_load(beam, DistributedLoad::new(-magnitude, LoadDirection::Element))?;

    let solved = model.solve()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&solved)?);
        return Ok(());
    }

    println!("=== Portal frame: height {height} m, span {span} m, q = {magnitude} kN/m ===\n");

    println!("Node Displacements:");
    for node_id in solved.node_ids() {
        let disp = solved.node_displacement(node_id)?;
        println!(
            "  {}: UX={:.4}mm, UY={:.4}mm, ROT={:.6}rad",
            node_id,
            disp.ux * 1000.0,
            disp.uy * 1000.0,
            disp.rotation
        );
    }

    println!("\nSupport Reactions:");
    for node_id in [1, 4] {
        let reaction = solved.reaction_at(node_id)?;
        println!(
            "  {}: FX={:.3}kN, FY={:.3}kN, MZ={:.3}kN·m",
            node_id, reaction.fx, reaction.fy, reaction.mz
        );
    }

    println!("\nElement Forces (at ends):");
    for (name, element_id) in [
        ("Left column", left_column),
        ("Beam", beam),
        ("Right column", right_column),
    ] {
        let forces = solved.element_forces(element_id)?;
        println!(
            "  {}: N={:.3}kN, V=[{:.3}, {:.3}]kN, M=[{:.3}, {:.3}]kN·m",
            name, forces.axial_i, forces.shear_i, forces.shear_j, forces.moment_i, forces.moment_j
        );
    }

    // Beam moment extremum from a sampled diagram
    let mut peak: (f64, f64) = (0.0, 0.0);
    for (s, m) in solved.moment_diagram(beam, 101)? {
        if m.abs() > peak.1.abs() {
            peak = (s, m);
        }
    }
    println!(
        "\nBeam bending moment peaks at {:.3}kN·m, {:.2}m from the left eave",
        peak.1, peak.0
    );

    let mut deflection: (f64, f64) = (0.0, 0.0);
    for (s, w) in solved.displacement_diagram(beam, 101)? {
        if w.abs() > deflection.1.abs() {
            deflection = (s, w);
        }
    }
    println!(
        "Beam deflection peaks at {:.4}mm, {:.2}m from the left eave",
        deflection.1 * 1000.0,
        deflection.0
    );

    Ok(())
}
