//! Implements uniaxial material models

mod bilinear;
mod elastic;
pub use crate::material::bilinear::*;
pub use crate::material::elastic::*;

use crate::base::ParamUniaxial;
use crate::StrError;

/// Specifies the essential functions for uniaxial stress-strain models
///
/// Implementations follow the trial-state pattern: [UniaxialTrait::set_trial_strain]
/// computes a tentative response from the last committed state; the trial state
/// only becomes permanent upon [UniaxialTrait::commit_state].
pub trait UniaxialTrait: Send + Sync {
    /// Returns the initial (elastic) tangent modulus
    fn initial_tangent(&self) -> f64;

    /// Sets the trial total strain and computes the trial response
    fn set_trial_strain(&mut self, strain: f64);

    /// Returns the trial stress
    fn stress(&self) -> f64;

    /// Returns the trial (consistent) tangent modulus
    fn tangent(&self) -> f64;

    /// Accepts the trial state as the new committed state
    fn commit_state(&mut self);

    /// Discards the trial state and restores the last committed state
    fn revert_to_last_commit(&mut self);

    /// Restores the virgin state
    fn revert_to_start(&mut self);
}

/// Allocates a uniaxial model implementation
pub fn allocate_uniaxial(param: &ParamUniaxial) -> Result<Box<dyn UniaxialTrait>, StrError> {
    param.validate()?;
    let actual: Box<dyn UniaxialTrait> = match param {
        ParamUniaxial::Elastic { young } => Box::new(Elastic::new(*young)),
        ParamUniaxial::Bilinear {
            young,
            hardening,
            strength,
        } => Box::new(Bilinear::new(*young, *hardening, *strength)),
    };
    Ok(actual)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
