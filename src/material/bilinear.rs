use super::UniaxialTrait;

/// Implements the bilinear elastoplastic uniaxial model with isotropic hardening
///
/// The yield function is `f = |σ_trial| - (σy + H α)` with plastic strain `εp`
/// and accumulated plastic strain `α` as internal values. The return mapping
/// admits a closed-form solution `Δγ = f / (E + H)` and the consistent tangent
/// in the plastic regime is `E H / (E + H)`.
pub struct Bilinear {
    /// Young's modulus
    young: f64,

    /// Hardening modulus
    hardening: f64,

    /// Yield strength
    strength: f64,

    /// Trial strain
    strain: f64,

    /// Trial stress
    stress: f64,

    /// Trial tangent modulus
    tangent: f64,

    /// Trial plastic strain
    eps_p: f64,

    /// Trial accumulated plastic strain
    alpha: f64,

    /// Committed strain
    strain_committed: f64,

    /// Committed plastic strain
    eps_p_committed: f64,

    /// Committed accumulated plastic strain
    alpha_committed: f64,
}

impl Bilinear {
    /// Allocates a new instance
    pub fn new(young: f64, hardening: f64, strength: f64) -> Self {
        Bilinear {
            young,
            hardening,
            strength,
            strain: 0.0,
            stress: 0.0,
            tangent: young,
            eps_p: 0.0,
            alpha: 0.0,
            strain_committed: 0.0,
            eps_p_committed: 0.0,
            alpha_committed: 0.0,
        }
    }

    /// Performs the return mapping from the committed internal values
    fn return_mapping(&mut self) {
        let stress_trial = self.young * (self.strain - self.eps_p_committed);
        let f_trial = f64::abs(stress_trial) - (self.strength + self.hardening * self.alpha_committed);
        if f_trial <= 0.0 {
            // elastic step
            self.stress = stress_trial;
            self.tangent = self.young;
            self.eps_p = self.eps_p_committed;
            self.alpha = self.alpha_committed;
        } else {
            // plastic step
            let sign = if stress_trial >= 0.0 { 1.0 } else { -1.0 };
            let d_gamma = f_trial / (self.young + self.hardening);
            self.stress = stress_trial - self.young * d_gamma * sign;
            self.tangent = self.young * self.hardening / (self.young + self.hardening);
            self.eps_p = self.eps_p_committed + d_gamma * sign;
            self.alpha = self.alpha_committed + d_gamma;
        }
    }
}

impl UniaxialTrait for Bilinear {
    fn initial_tangent(&self) -> f64 {
        self.young
    }

    fn set_trial_strain(&mut self, strain: f64) {
        self.strain = strain;
        self.return_mapping();
    }

    fn stress(&self) -> f64 {
        self.stress
    }

    fn tangent(&self) -> f64 {
        self.tangent
    }

    fn commit_state(&mut self) {
        self.strain_committed = self.strain;
        self.eps_p_committed = self.eps_p;
        self.alpha_committed = self.alpha;
    }

    fn revert_to_last_commit(&mut self) {
        self.strain = self.strain_committed;
        self.return_mapping();
    }

    fn revert_to_start(&mut self) {
        self.strain = 0.0;
        self.stress = 0.0;
        self.tangent = self.young;
        self.eps_p = 0.0;
        self.alpha = 0.0;
        self.strain_committed = 0.0;
        self.eps_p_committed = 0.0;
        self.alpha_committed = 0.0;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
