use super::{ElementTrait, FemState};
use crate::base::{compute_local_to_global, Member, Model, ParamTruss};
use crate::fem::FemBase;
use crate::material::{allocate_uniaxial, UniaxialTrait};
use crate::StrError;
use russell_lab::{Matrix, Vector};

/// Implements a 2-node truss (axial bar) element
///
/// The axial response is routed through a uniaxial material point, so the
/// element becomes nonlinear with, e.g., a bilinear elastoplastic material.
pub struct ElementTruss {
    /// Local-to-global mapping (4 equations: ux0, uy0, ux1, uy1)
    local_to_global: Vec<usize>,

    /// Direction cosine (x)
    c: f64,

    /// Direction cosine (y)
    s: f64,

    /// Member length
    length: f64,

    /// Cross-sectional area
    area: f64,

    /// Intrinsic density
    density: f64,

    /// Material point governing the axial response
    material: Box<dyn UniaxialTrait>,
}

impl ElementTruss {
    /// Allocates a new instance
    pub fn new(model: &Model, base: &FemBase, member: &Member, param: &ParamTruss) -> Result<Self, StrError> {
        let local_to_global = compute_local_to_global(&base.attributes, &base.equations, member)?;
        let (a, b) = (member.points[0], member.points[1]);
        let length = model.distance(a, b)?;
        let dx = model.nodes[b].coords[0] - model.nodes[a].coords[0];
        let dy = model.nodes[b].coords[1] - model.nodes[a].coords[1];
        Ok(ElementTruss {
            local_to_global,
            c: dx / length,
            s: dy / length,
            length,
            area: param.area,
            density: param.density,
            material: allocate_uniaxial(&param.material)?,
        })
    }

    /// Computes the axial strain from the trial displacements
    fn strain(&self, state: &FemState) -> f64 {
        let l2g = &self.local_to_global;
        let du_x = state.uu[l2g[2]] - state.uu[l2g[0]];
        let du_y = state.uu[l2g[3]] - state.uu[l2g[1]];
        (self.c * du_x + self.s * du_y) / self.length
    }
}

impl ElementTrait for ElementTruss {
    fn symmetric_jacobian(&self) -> bool {
        true
    }

    fn local_to_global(&self) -> &Vec<usize> {
        &self.local_to_global
    }

    fn update_state(&mut self, state: &FemState) -> Result<(), StrError> {
        let strain = self.strain(state);
        self.material.set_trial_strain(strain);
        Ok(())
    }

    fn calc_residual(&mut self, residual: &mut Vector, _state: &FemState) -> Result<(), StrError> {
        let nn = self.material.stress() * self.area;
        residual[0] = -nn * self.c;
        residual[1] = -nn * self.s;
        residual[2] = nn * self.c;
        residual[3] = nn * self.s;
        Ok(())
    }

    fn calc_jacobian(&mut self, jacobian: &mut Matrix, _state: &FemState) -> Result<(), StrError> {
        let k = self.material.tangent() * self.area / self.length;
        let (c, s) = (self.c, self.s);
        let dir = [-c, -s, c, s];
        for i in 0..4 {
            for j in 0..4 {
                jacobian.set(i, j, k * dir[i] * dir[j]);
            }
        }
        Ok(())
    }

    fn add_to_mass(&self, mass: &mut Vector) -> Result<(), StrError> {
        let half = self.density * self.area * self.length / 2.0;
        for eq in &self.local_to_global {
            mass[*eq] += half;
        }
        Ok(())
    }

    fn commit_state(&mut self) {
        self.material.commit_state();
    }

    fn revert_to_last_commit(&mut self) {
        self.material.revert_to_last_commit();
    }

    fn revert_to_start(&mut self) {
        self.material.revert_to_start();
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ElementTruss;
    use crate::base::{Attributes, Elem, Essential, Member, Model, Node, Numberer, ParamTruss};
    use crate::base::{Config, ParamUniaxial};
    use crate::fem::{ElementTrait, FemBase, FemState};
    use russell_lab::{mat_approx_eq, Matrix, Vector};

    fn inclined_truss() -> (Model, Attributes) {
        // bar from (0,0) to (3,4): length 5, c = 0.6, s = 0.8
        let model = Model {
            ndim: 2,
            nodes: vec![
                Node { id: 0, coords: vec![0.0, 0.0] },
                Node { id: 1, coords: vec![3.0, 4.0] },
            ],
            members: vec![Member {
                id: 0,
                attribute: 1,
                points: vec![0, 1],
            }],
        };
        let param = ParamTruss {
            material: ParamUniaxial::Elastic { young: 1000.0 },
            area: 5.0,
            density: 2.0,
        };
        let attributes = Attributes::from([(1, Elem::Truss(param))]);
        (model, attributes)
    }

    #[test]
    fn jacobian_matches_analytic_stiffness() {
        let (model, attributes) = inclined_truss();
        let base = FemBase::new(&model, attributes, Numberer::Plain).unwrap();
        let param = ParamTruss {
            material: ParamUniaxial::Elastic { young: 1000.0 },
            area: 5.0,
            density: 2.0,
        };
        let mut element = ElementTruss::new(&model, &base, &model.members[0], &param).unwrap();
        let config = Config::new();
        let state = FemState::new(&base, &Essential::new(), &config).unwrap();
        let mut jacobian = Matrix::new(4, 4);
        element.update_state(&state).unwrap();
        element.calc_jacobian(&mut jacobian, &state).unwrap();
        // E A / L = 1000 · 5 / 5 = 1000; c = 0.6, s = 0.8
        let k = 1000.0;
        let (cc, ss, cs) = (0.36, 0.64, 0.48);
        #[rustfmt::skip]
        let correct = Matrix::from(&[
            [ k * cc,  k * cs, -k * cc, -k * cs],
            [ k * cs,  k * ss, -k * cs, -k * ss],
            [-k * cc, -k * cs,  k * cc,  k * cs],
            [-k * cs, -k * ss,  k * cs,  k * ss],
        ]);
        mat_approx_eq(&jacobian, &correct, 1e-12);
    }

    #[test]
    fn residual_follows_axial_stretch() {
        let (model, attributes) = inclined_truss();
        let base = FemBase::new(&model, attributes, Numberer::Plain).unwrap();
        let param = ParamTruss {
            material: ParamUniaxial::Elastic { young: 1000.0 },
            area: 5.0,
            density: 2.0,
        };
        let mut element = ElementTruss::new(&model, &base, &model.members[0], &param).unwrap();
        let config = Config::new();
        let mut state = FemState::new(&base, &Essential::new(), &config).unwrap();
        // stretch along the axis: u1 = 0.05·(c, s) → strain = 0.05/5 = 0.01
        state.uu[2] = 0.05 * 0.6;
        state.uu[3] = 0.05 * 0.8;
        element.update_state(&state).unwrap();
        let mut residual = Vector::new(4);
        element.calc_residual(&mut residual, &state).unwrap();
        // N = E·ε·A = 1000 · 0.01 · 5 = 50
        let nn = 50.0;
        assert!(f64::abs(residual[0] + nn * 0.6) < 1e-12);
        assert!(f64::abs(residual[1] + nn * 0.8) < 1e-12);
        assert!(f64::abs(residual[2] - nn * 0.6) < 1e-12);
        assert!(f64::abs(residual[3] - nn * 0.8) < 1e-12);
    }

    #[test]
    fn mass_and_commit_work() {
        let (model, attributes) = inclined_truss();
        let base = FemBase::new(&model, attributes, Numberer::Plain).unwrap();
        let param = ParamTruss {
            material: ParamUniaxial::Elastic { young: 1000.0 },
            area: 5.0,
            density: 2.0,
        };
        let mut element = ElementTruss::new(&model, &base, &model.members[0], &param).unwrap();
        let mut mass = Vector::new(4);
        element.add_to_mass(&mut mass).unwrap();
        // ρ A L / 2 = 2 · 5 · 5 / 2 = 25
        assert_eq!(mass.as_data(), &[25.0, 25.0, 25.0, 25.0]);

        let config = Config::new();
        let mut state = FemState::new(&base, &Essential::new(), &config).unwrap();
        state.uu[2] = 0.05 * 0.6;
        state.uu[3] = 0.05 * 0.8;
        element.update_state(&state).unwrap();
        element.commit_state(); // commit twice must not change anything
        element.commit_state();
        element.revert_to_last_commit();
        let mut residual = Vector::new(4);
        element.calc_residual(&mut residual, &state).unwrap();
        assert!(f64::abs(residual[2] - 50.0 * 0.6) < 1e-12);
        element.revert_to_start();
        element.calc_residual(&mut residual, &state).unwrap();
        assert_eq!(residual[2], 0.0);
    }
}
