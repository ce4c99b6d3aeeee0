use super::{ElementTrait, FemState};
use crate::base::{compute_local_to_global, Member, Model, ParamBeam};
use crate::fem::FemBase;
use crate::StrError;
use russell_lab::{mat_mat_mul, mat_vec_mul, Matrix, Vector};

/// Implements a 2-node Euler-Bernoulli beam element (2D, linear elastic)
///
/// Six DOFs: (ux, uy, rz) at each node. The global stiffness is constant,
/// computed once as Tᵀ·K_local·T. The lumped mass puts half the member mass
/// on each translational DOF (no rotary inertia).
pub struct ElementBeam {
    /// Local-to-global mapping (6 equations)
    local_to_global: Vec<usize>,

    /// Member length
    length: f64,

    /// Parameters
    param: ParamBeam,

    /// Constant global stiffness matrix (6 x 6)
    kk: Matrix,

    /// Gathered trial displacements (6)
    uu_local: Vector,
}

impl ElementBeam {
    /// Allocates a new instance
    pub fn new(model: &Model, base: &FemBase, member: &Member, param: &ParamBeam) -> Result<Self, StrError> {
        let local_to_global = compute_local_to_global(&base.attributes, &base.equations, member)?;
        let (a, b) = (member.points[0], member.points[1]);
        let length = model.distance(a, b)?;
        let c = (model.nodes[b].coords[0] - model.nodes[a].coords[0]) / length;
        let s = (model.nodes[b].coords[1] - model.nodes[a].coords[1]) / length;

        // local stiffness
        let (ee, aa, ii, ll) = (param.young, param.area, param.inertia, length);
        let ka = ee * aa / ll;
        let kb = ee * ii / (ll * ll * ll);
        #[rustfmt::skip]
        let kk_local = Matrix::from(&[
            [ ka,  0.0,              0.0,            -ka,  0.0,              0.0           ],
            [ 0.0, 12.0 * kb,        6.0 * kb * ll,   0.0, -12.0 * kb,       6.0 * kb * ll ],
            [ 0.0, 6.0 * kb * ll,    4.0 * kb * ll * ll, 0.0, -6.0 * kb * ll, 2.0 * kb * ll * ll],
            [-ka,  0.0,              0.0,             ka,  0.0,              0.0           ],
            [ 0.0, -12.0 * kb,      -6.0 * kb * ll,   0.0, 12.0 * kb,       -6.0 * kb * ll ],
            [ 0.0, 6.0 * kb * ll,    2.0 * kb * ll * ll, 0.0, -6.0 * kb * ll, 4.0 * kb * ll * ll],
        ]);

        // rotation to global: K = Tᵀ·K_local·T
        #[rustfmt::skip]
        let tt = Matrix::from(&[
            [ c,   s,   0.0, 0.0, 0.0, 0.0],
            [-s,   c,   0.0, 0.0, 0.0, 0.0],
            [ 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
            [ 0.0, 0.0, 0.0,  c,   s,  0.0],
            [ 0.0, 0.0, 0.0, -s,   c,  0.0],
            [ 0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
        ]);
        let mut aux = Matrix::new(6, 6);
        let mut kk = Matrix::new(6, 6);
        mat_mat_mul(&mut aux, 1.0, &kk_local, &tt, 0.0)?;
        let mut tt_t = Matrix::new(6, 6);
        for i in 0..6 {
            for j in 0..6 {
                tt_t.set(i, j, tt.get(j, i));
            }
        }
        mat_mat_mul(&mut kk, 1.0, &tt_t, &aux, 0.0)?;

        Ok(ElementBeam {
            local_to_global,
            length,
            param: *param,
            kk,
            uu_local: Vector::new(6),
        })
    }
}

impl ElementTrait for ElementBeam {
    fn symmetric_jacobian(&self) -> bool {
        true
    }

    fn local_to_global(&self) -> &Vec<usize> {
        &self.local_to_global
    }

    fn update_state(&mut self, state: &FemState) -> Result<(), StrError> {
        for (l, g) in self.local_to_global.iter().enumerate() {
            self.uu_local[l] = state.uu[*g];
        }
        Ok(())
    }

    fn calc_residual(&mut self, residual: &mut Vector, _state: &FemState) -> Result<(), StrError> {
        mat_vec_mul(residual, 1.0, &self.kk, &self.uu_local)
    }

    fn calc_jacobian(&mut self, jacobian: &mut Matrix, _state: &FemState) -> Result<(), StrError> {
        for i in 0..6 {
            for j in 0..6 {
                jacobian.set(i, j, self.kk.get(i, j));
            }
        }
        Ok(())
    }

    fn add_to_mass(&self, mass: &mut Vector) -> Result<(), StrError> {
        let half = self.param.density * self.param.area * self.length / 2.0;
        for node in 0..2 {
            mass[self.local_to_global[3 * node]] += half;
            mass[self.local_to_global[3 * node + 1]] += half;
        }
        Ok(())
    }

    fn commit_state(&mut self) {}

    fn revert_to_last_commit(&mut self) {}

    fn revert_to_start(&mut self) {
        self.uu_local.fill(0.0);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
