use russell_lab::{solve_lin_sys, Matrix, Vector};
use strucsim::fem::ElementJoint;
use strucsim::prelude::*;
use strucsim::StrError;

// TEST GOAL
//
// This test verifies the panel-zone joint element inside the global solver.
// With elastic springs the condensed tangent is constant, so the global
// solution must coincide with a dense solve of the condensed stiffness
// restricted to the free equations (computed here as a reference).
//
// MODEL
//
//              3
//              o            mid-edge nodes of a 2×2 panel
//              |            (0) left, (1) bottom, (2) right, (3) top
//   0 o--------+--------o 2  → Fx = 5 at node 2; Mz = 2 at node 3
//              |
//              o
//              1
//
// BOUNDARY CONDITIONS
//
// Fully fixed (Ux, Uy, Rz) @ nodes 0 and 1
//
// CONFIGURATION AND PARAMETERS
//
// Static simulation; all 13 springs elastic with k = 100

#[test]
fn test_joint_panel_elastic() -> Result<(), StrError> {
    // model
    let young = 100.0;
    let (model, attributes) = SampleModels::one_joint_2d(young);
    let base = FemBase::new(&model, attributes, Numberer::Plain)?;

    // essential boundary conditions
    let mut essential = Essential::new();
    essential
        .points(&[0, 1], Dof::Ux, 0.0)
        .points(&[0, 1], Dof::Uy, 0.0)
        .points(&[0, 1], Dof::Rz, 0.0);

    // natural boundary conditions
    let mut natural = Natural::new();
    natural.points(&[2], Pbc::Fx(5.0)).points(&[3], Pbc::Mz(2.0));

    // configuration
    let mut config = Config::new();
    config.set_load_factor(|_| 1.0);

    // reference: condensed tangent at zero displacement, free equations only
    // (free eqs are 6..12: node 2 then node 3, each with Ux, Uy, Rz)
    let param = ParamJoint::sample_elastic(young);
    let mut element = ElementJoint::new(&model, &base, &model.members[0], &param)?;
    let state_zero = FemState::new(&base, &Essential::new(), &config)?;
    element.update_state(&state_zero)?;
    let mut kk = Matrix::new(12, 12);
    element.calc_jacobian(&mut kk, &state_zero)?;
    let mut aa = Matrix::new(6, 6);
    for i in 0..6 {
        for j in 0..6 {
            aa.set(i, j, kk.get(6 + i, 6 + j));
        }
    }
    let mut uu_correct = Vector::from(&[5.0, 0.0, 0.0, 0.0, 0.0, 2.0]);
    solve_lin_sys(&mut uu_correct, &mut aa)?;

    // solution
    let mut state = FemState::new(&base, &essential, &config)?;
    let mut file_io = FileIo::new();
    let mut solver = SolverImplicit::new(&model, &base, &config, &essential, &natural)?;
    solver.solve(&mut state, &mut file_io)?;

    // check
    for i in 0..6 {
        assert!(f64::abs(state.uu[6 + i] - uu_correct[i]) < 1e-10);
    }
    for eq in 0..6 {
        assert_eq!(state.uu[eq], 0.0); // fixed nodes stay put
    }
    Ok(())
}
