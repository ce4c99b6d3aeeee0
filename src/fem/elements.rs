use super::{ElementBeam, ElementJoint, ElementTrait, ElementTruss, FemBase, FemState};
use crate::base::{assemble_matrix, assemble_vector, Elem, Member, Model};
use crate::StrError;
use russell_lab::{Matrix, Vector};
use russell_sparse::CooMatrix;

/// Stiffness-reduction factor applied to deactivated elements
///
/// A dead element keeps contributing a vanishing fraction of its force and
/// stiffness, so the global system stays non-singular without renumbering.
/// The factor is applied exactly once per quantity, inside [GenericElement].
pub const DEAD_SRF: f64 = 1e-6;

/// Wraps a mesh-independent element with its assembly buffers
pub struct GenericElement {
    /// The actual element (2D truss, beam, or panel-zone joint)
    pub actual: Box<dyn ElementTrait>,

    /// Local residual vector (resisting force)
    pub residual: Vector,

    /// Local Jacobian (tangent stiffness) matrix
    pub jacobian: Matrix,

    /// Active flag; deactivated elements are scaled by [DEAD_SRF]
    pub active: bool,
}

impl GenericElement {
    /// Allocates a new instance according to the member attribute
    pub fn new(model: &Model, base: &FemBase, member: &Member) -> Result<Self, StrError> {
        let element = base.attributes.get(member)?;
        let actual: Box<dyn ElementTrait> = match element {
            Elem::Truss(p) => Box::new(ElementTruss::new(model, base, member, p)?),
            Elem::Beam(p) => Box::new(ElementBeam::new(model, base, member, p)?),
            Elem::Joint(p) => Box::new(ElementJoint::new(model, base, member, p)?),
        };
        let neq = base.n_local_eq(member)?;
        Ok(GenericElement {
            actual,
            residual: Vector::new(neq),
            jacobian: Matrix::new(neq, neq),
            active: true,
        })
    }

    /// Computes the (possibly scaled) local residual vector
    ///
    /// This is the only place where the deactivation factor touches forces.
    pub fn calc_residual(&mut self, state: &FemState) -> Result<(), StrError> {
        self.actual.calc_residual(&mut self.residual, state)?;
        if !self.active {
            for i in 0..self.residual.dim() {
                self.residual[i] *= DEAD_SRF;
            }
        }
        Ok(())
    }

    /// Computes the (possibly scaled) local Jacobian matrix
    ///
    /// This is the only place where the deactivation factor touches stiffness.
    pub fn calc_jacobian(&mut self, state: &FemState) -> Result<(), StrError> {
        self.actual.calc_jacobian(&mut self.jacobian, state)?;
        if !self.active {
            let (nrow, ncol) = self.jacobian.dims();
            for i in 0..nrow {
                for j in 0..ncol {
                    self.jacobian.set(i, j, self.jacobian.get(i, j) * DEAD_SRF);
                }
            }
        }
        Ok(())
    }
}

/// Holds all elements of a model
pub struct Elements {
    /// All elements, in member order
    pub all: Vec<GenericElement>,
}

impl Elements {
    /// Allocates a new instance with all members of the model
    pub fn new(model: &Model, base: &FemBase) -> Result<Self, StrError> {
        let res: Result<Vec<_>, _> = model
            .members
            .iter()
            .map(|member| GenericElement::new(model, base, member))
            .collect();
        match res {
            Ok(all) => Ok(Elements { all }),
            Err(e) => Err(e),
        }
    }

    /// Returns whether all elements have symmetric Jacobians or not
    pub fn all_symmetric_jacobians(&self) -> bool {
        self.all.iter().all(|e| e.actual.symmetric_jacobian())
    }

    /// Activates or deactivates an element by member id
    pub fn set_active(&mut self, member_id: usize, active: bool) -> Result<(), StrError> {
        match self.all.get_mut(member_id) {
            Some(e) => {
                e.active = active;
                Ok(())
            }
            None => Err("member id is out of range"),
        }
    }

    /// Runs the state determination of all elements with the trial displacements
    pub fn update_state(&mut self, state: &FemState) -> Result<(), StrError> {
        self.all.iter_mut().try_for_each(|e| e.actual.update_state(state))
    }

    /// Assembles the internal (resisting) forces into the global vector
    pub fn assemble_f_int(
        &mut self,
        ff_int: &mut Vector,
        state: &FemState,
        prescribed: &[bool],
    ) -> Result<(), StrError> {
        ff_int.fill(0.0);
        for e in &mut self.all {
            e.calc_residual(state)?;
            assemble_vector(ff_int, &e.residual, e.actual.local_to_global(), prescribed);
        }
        Ok(())
    }

    /// Assembles the tangent stiffness matrices into the global sparse matrix
    pub fn assemble_kke(
        &mut self,
        kk: &mut CooMatrix,
        state: &FemState,
        prescribed: &[bool],
        triangular: bool,
    ) -> Result<(), StrError> {
        for e in &mut self.all {
            e.calc_jacobian(state)?;
            assemble_matrix(kk, &e.jacobian, e.actual.local_to_global(), prescribed, triangular)?;
        }
        Ok(())
    }

    /// Adds the lumped masses of all elements to the global diagonal mass vector
    pub fn add_to_mass(&self, mass: &mut Vector) -> Result<(), StrError> {
        self.all.iter().try_for_each(|e| e.actual.add_to_mass(mass))
    }

    /// Commits the trial state of all elements
    pub fn commit_state(&mut self) {
        self.all.iter_mut().for_each(|e| e.actual.commit_state());
    }

    /// Restores the trial state of all elements from the last commit
    pub fn revert_to_last_commit(&mut self) {
        self.all.iter_mut().for_each(|e| e.actual.revert_to_last_commit());
    }

    /// Resets all elements to the virgin state
    pub fn revert_to_start(&mut self) {
        self.all.iter_mut().for_each(|e| e.actual.revert_to_start());
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
