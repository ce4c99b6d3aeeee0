use strucsim::prelude::*;
use strucsim::StrError;

// TEST GOAL
//
// This test verifies the Newmark time integration with a single-DOF
// spring-mass oscillator under a suddenly applied constant force.
//
// MODEL
//
//   0--------1   → x, Fx = 1 at node 1 (applied at t = 0⁺)
//       [0]
//
// BOUNDARY CONDITIONS
//
// Fully fixed @ node 0; Uy fixed @ node 1
//
// CONFIGURATION AND PARAMETERS
//
// Transient simulation with β = 1/4, γ = 1/2, Δt = 0.001, t ∈ [0, 0.1]
// E = 100, A = 1, L = 1 → k = 100; ρ = 2 → lumped nodal mass m = ρAL/2 = 1
// Natural frequency ω = √(k/m) = 10
// Exact response (zero initial conditions): u(t) = (F/k)·(1 - cos ωt)

#[test]
fn test_newmark_sdof() -> Result<(), StrError> {
    // model
    let model = Model {
        ndim: 2,
        nodes: vec![
            Node { id: 0, coords: vec![0.0, 0.0] },
            Node { id: 1, coords: vec![1.0, 0.0] },
        ],
        members: vec![Member {
            id: 0,
            attribute: 1,
            points: vec![0, 1],
        }],
    };

    // parameters
    let param = ParamTruss {
        material: ParamUniaxial::Elastic { young: 100.0 },
        area: 1.0,
        density: 2.0,
    };
    let attributes = Attributes::from([(1, Elem::Truss(param))]);
    let base = FemBase::new(&model, attributes, Numberer::Plain)?;

    // essential boundary conditions
    let mut essential = Essential::new();
    essential
        .points(&[0], Dof::Ux, 0.0)
        .points(&[0], Dof::Uy, 0.0)
        .points(&[1], Dof::Uy, 0.0);

    // natural boundary conditions
    let mut natural = Natural::new();
    natural.points(&[1], Pbc::Fx(1.0));

    // configuration
    let mut config = Config::new();
    config
        .set_transient(true)
        .set_load_factor(|_| 1.0) // suddenly applied, then constant
        .set_dt(|_| 0.001)
        .set_t_fin(0.1);

    // FEM state
    let mut state = FemState::new(&base, &essential, &config)?;

    // File IO
    let mut file_io = FileIo::new();

    // solution
    let mut solver = SolverImplicit::new(&model, &base, &config, &essential, &natural)?;
    solver.solve(&mut state, &mut file_io)?;

    // check against the exact response at the final time reached
    let (omega, uu_static) = (10.0, 1.0 / 100.0);
    let uu_exact = uu_static * (1.0 - f64::cos(omega * state.t));
    let vv_exact = uu_static * omega * f64::sin(omega * state.t);
    assert!(state.t > 0.098); // the whole window was integrated
    assert!(f64::abs(state.uu[2] - uu_exact) < 1e-6);
    assert!(f64::abs(state.vv[2] - vv_exact) < 1e-4);
    Ok(())
}
