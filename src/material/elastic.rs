use super::UniaxialTrait;

/// Implements the linear elastic uniaxial model
pub struct Elastic {
    /// Young's modulus
    young: f64,

    /// Trial strain
    strain: f64,

    /// Committed strain
    strain_committed: f64,
}

impl Elastic {
    /// Allocates a new instance
    pub fn new(young: f64) -> Self {
        Elastic {
            young,
            strain: 0.0,
            strain_committed: 0.0,
        }
    }
}

impl UniaxialTrait for Elastic {
    fn initial_tangent(&self) -> f64 {
        self.young
    }

    fn set_trial_strain(&mut self, strain: f64) {
        self.strain = strain;
    }

    fn stress(&self) -> f64 {
        self.young * self.strain
    }

    fn tangent(&self) -> f64 {
        self.young
    }

    fn commit_state(&mut self) {
        self.strain_committed = self.strain;
    }

    fn revert_to_last_commit(&mut self) {
        self.strain = self.strain_committed;
    }

    fn revert_to_start(&mut self) {
        self.strain = 0.0;
        self.strain_committed = 0.0;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
