use super::FemState;
use crate::StrError;
use russell_lab::{Matrix, Vector};

/// Defines the trait for local (element) equations
///
/// Implementations own their material points and internal state. The state
/// determination ([ElementTrait::update_state]) always evaluates the trial
/// response from the last committed history; hence it may be called
/// repeatedly within a global iteration without a backup/restore dance.
pub trait ElementTrait: Send + Sync {
    /// Returns whether the local Jacobian matrix is symmetric or not
    fn symmetric_jacobian(&self) -> bool;

    /// Returns the local-to-global mapping
    fn local_to_global(&self) -> &Vec<usize>;

    /// Performs the state determination for the trial displacements
    ///
    /// Must be called before [ElementTrait::calc_residual] and
    /// [ElementTrait::calc_jacobian] in every global iteration.
    fn update_state(&mut self, state: &FemState) -> Result<(), StrError>;

    /// Calculates the residual vector (internal/resisting forces)
    fn calc_residual(&mut self, residual: &mut Vector, state: &FemState) -> Result<(), StrError>;

    /// Calculates the Jacobian (tangent stiffness) matrix
    fn calc_jacobian(&mut self, jacobian: &mut Matrix, state: &FemState) -> Result<(), StrError>;

    /// Adds the lumped mass contribution to the global diagonal mass vector
    fn add_to_mass(&self, mass: &mut Vector) -> Result<(), StrError>;

    /// Accepts the trial state as the new committed state
    fn commit_state(&mut self);

    /// Discards the trial state and restores the last committed state
    fn revert_to_last_commit(&mut self);

    /// Restores the virgin state (erases all history)
    fn revert_to_start(&mut self);
}
