use strucsim::prelude::*;
use strucsim::StrError;

// TEST GOAL
//
// This test verifies the static solution of a chain of two axial members and
// that a linear elastic problem converges with a single Newton correction
// (the iteration budget is restricted to enforce this).
//
// MODEL
//
//   0--------1--------2   → x, Fx = 10 at node 2
//      [0]      [1]
//
// BOUNDARY CONDITIONS
//
// Fully fixed @ node 0; Uy fixed everywhere (trusses have no transverse stiffness)
//
// CONFIGURATION AND PARAMETERS
//
// Static simulation; E = 1000, A = 1, L = 1 per member → k = 1000 per member
// Expected: u1 = F/k = 0.01 and u2 = 2 F/k = 0.02

#[test]
fn test_truss_2member_static() -> Result<(), StrError> {
    // model
    let model = Model {
        ndim: 2,
        nodes: vec![
            Node { id: 0, coords: vec![0.0, 0.0] },
            Node { id: 1, coords: vec![1.0, 0.0] },
            Node { id: 2, coords: vec![2.0, 0.0] },
        ],
        members: vec![
            Member {
                id: 0,
                attribute: 1,
                points: vec![0, 1],
            },
            Member {
                id: 1,
                attribute: 1,
                points: vec![1, 2],
            },
        ],
    };

    // parameters
    let param = ParamTruss {
        material: ParamUniaxial::Elastic { young: 1000.0 },
        area: 1.0,
        density: 1.0,
    };
    let attributes = Attributes::from([(1, Elem::Truss(param))]);
    let base = FemBase::new(&model, attributes, Numberer::Plain)?;

    // essential boundary conditions
    let mut essential = Essential::new();
    essential
        .points(&[0], Dof::Ux, 0.0)
        .points(&[0, 1, 2], Dof::Uy, 0.0);

    // natural boundary conditions
    let mut natural = Natural::new();
    natural.points(&[2], Pbc::Fx(10.0));

    // configuration: a single correction must suffice for a linear problem
    let mut config = Config::new();
    config.set_load_factor(|_| 1.0).set_n_max_iterations(2);

    // FEM state
    let mut state = FemState::new(&base, &essential, &config)?;

    // File IO
    let mut file_io = FileIo::new();

    // solution
    let mut solver = SolverImplicit::new(&model, &base, &config, &essential, &natural)?;
    solver.solve(&mut state, &mut file_io)?;

    // check displacements (eqs: node1 Ux = 2, node2 Ux = 4)
    assert!(f64::abs(state.uu[2] - 0.01) < 1e-12);
    assert!(f64::abs(state.uu[4] - 0.02) < 1e-12);
    assert_eq!(state.uu[0], 0.0);
    assert_eq!(state.uu[3], 0.0);
    Ok(())
}
