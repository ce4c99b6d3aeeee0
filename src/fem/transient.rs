use super::FemState;
use crate::base::Config;
use crate::StrError;

/// Holds the Newmark coefficients of one time step
///
/// Kinematics of the Newmark method (β, γ):
///
/// ```text
/// U★ = U₀ + Δt V₀ + Δt² (½ - β) A₀
/// V★ = V₀ + Δt (1 - γ) A₀
/// A  = (U - U★) / (β Δt²)
/// V  = V★ + γ Δt A
/// ```
///
/// so the effective stiffness becomes `K + M / (β Δt²)` with a lumped
/// (diagonal) mass.
pub struct TransientVars {
    /// Time step size
    pub dt: f64,

    /// Newmark β parameter
    pub beta: f64,

    /// Newmark γ parameter
    pub gamma: f64,

    /// Coefficient 1 / (β Δt²) multiplying the mass in the effective stiffness
    pub a1: f64,
}

impl TransientVars {
    /// Calculates the coefficients for a new time step
    pub fn new(config: &Config, dt: f64) -> Result<Self, StrError> {
        if dt < config.dt_min {
            return Err("dt is smaller than the allowed minimum");
        }
        Ok(TransientVars {
            dt,
            beta: config.newmark_beta,
            gamma: config.newmark_gamma,
            a1: 1.0 / (config.newmark_beta * dt * dt),
        })
    }

    /// Computes the predictor vectors U★ and V★ from the old state
    ///
    /// Must be called before the iterations, while U, V, and A still hold the
    /// converged values of the previous time step.
    pub fn predictors(&self, state: &mut FemState) {
        let half_minus_beta_dt2 = (0.5 - self.beta) * self.dt * self.dt;
        for i in 0..state.uu_star.dim() {
            state.uu_star[i] = state.uu[i] + self.dt * state.vv[i] + half_minus_beta_dt2 * state.aa[i];
            state.vv_star[i] = state.vv[i] + self.dt * (1.0 - self.gamma) * state.aa[i];
        }
    }

    /// Updates the acceleration and velocity at one equation from the trial U
    pub fn update_kinematics(&self, state: &mut FemState, eq: usize) {
        state.aa[eq] = self.a1 * (state.uu[eq] - state.uu_star[eq]);
        state.vv[eq] = state.vv_star[eq] + self.gamma * self.dt * state.aa[eq];
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::TransientVars;
    use crate::base::{Config, Essential, Numberer, SampleModels};
    use crate::fem::{FemBase, FemState};

    #[test]
    fn new_captures_errors() {
        let config = Config::new();
        assert_eq!(
            TransientVars::new(&config, 1e-20).err(),
            Some("dt is smaller than the allowed minimum")
        );
    }

    #[test]
    fn constant_acceleration_is_reproduced_exactly() {
        // with β = ¼ and γ = ½, a motion with constant acceleration must be
        // reproduced exactly by the predictor/corrector pair
        let (model, attributes) = SampleModels::one_truss_2d();
        let base = FemBase::new(&model, attributes, Numberer::Plain).unwrap();
        let mut config = Config::new();
        config.transient = true;
        let mut state = FemState::new(&base, &Essential::new(), &config).unwrap();

        let (dt, aa) = (0.1, 2.0);
        state.aa[0] = aa;
        let vars = TransientVars::new(&config, dt).unwrap();
        assert_eq!(vars.a1, 1.0 / (0.25 * dt * dt));
        vars.predictors(&mut state);
        assert!(f64::abs(state.uu_star[0] - 0.25 * dt * dt * aa) < 1e-15);
        assert!(f64::abs(state.vv_star[0] - 0.5 * dt * aa) < 1e-15);

        // exact displacement after dt: U = ½ a Δt²
        state.uu[0] = 0.5 * aa * dt * dt;
        vars.update_kinematics(&mut state, 0);
        assert!(f64::abs(state.aa[0] - aa) < 1e-12);
        assert!(f64::abs(state.vv[0] - aa * dt) < 1e-12);
    }
}
