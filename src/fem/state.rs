use super::FemBase;
use crate::base::{Config, Essential};
use crate::StrError;
use russell_lab::{vec_copy, Vector};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds the state of a simulation
///
/// The trial vectors (`uu`, `vv`, `aa`) are advanced during the global
/// iterations; the committed vectors (`uu_old`, `vv_old`, `aa_old`) hold the
/// last accepted configuration and are only touched by [FemState::commit]
/// and [FemState::revert_to_committed].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FemState {
    /// Time (or pseudo-time load factor abscissa)
    pub t: f64,

    /// Delta time
    pub dt: f64,

    /// Cumulated (for one timestep) primary unknowns {ΔU}
    pub duu: Vector,

    /// Trial primary unknowns {U}
    ///
    /// (neq_total)
    pub uu: Vector,

    /// Committed primary unknowns
    ///
    /// (neq_total)
    pub uu_old: Vector,

    /// First time derivative of primary unknowns d{U}/dt
    pub vv: Vector,

    /// Second time derivative of primary unknowns d²{U}/dt²
    pub aa: Vector,

    /// Committed velocities
    pub vv_old: Vector,

    /// Committed accelerations
    pub aa_old: Vector,

    /// Newmark displacement predictor
    pub uu_star: Vector,

    /// Newmark velocity predictor
    pub vv_star: Vector,
}

impl FemState {
    /// Allocates a new instance
    ///
    /// The total number of equations includes one Lagrange multiplier per
    /// prescribed value when the Lagrange multiplier method is enabled.
    pub fn new(base: &FemBase, essential: &Essential, config: &Config) -> Result<FemState, StrError> {
        let n_equation = base.equations.n_equation;
        if n_equation == 0 {
            return Err("there are no equations in the model");
        }
        let n_lagrange = if config.lagrange_mult_method {
            essential.all.len()
        } else {
            0
        };
        let neq_total = n_equation + n_lagrange;

        let t = config.t_ini;
        let dt = (config.dt)(t);
        let (vv, aa, vv_old, aa_old, uu_star, vv_star) = if config.transient {
            (
                Vector::new(neq_total),
                Vector::new(neq_total),
                Vector::new(neq_total),
                Vector::new(neq_total),
                Vector::new(neq_total),
                Vector::new(neq_total),
            )
        } else {
            (
                Vector::new(0),
                Vector::new(0),
                Vector::new(0),
                Vector::new(0),
                Vector::new(0),
                Vector::new(0),
            )
        };
        Ok(FemState {
            t,
            dt,
            duu: Vector::new(neq_total),
            uu: Vector::new(neq_total),
            uu_old: Vector::new(neq_total),
            vv,
            aa,
            vv_old,
            aa_old,
            uu_star,
            vv_star,
        })
    }

    /// Accepts the trial vectors as the new committed configuration
    ///
    /// Committing twice in a row leaves the state unchanged.
    pub fn commit(&mut self) {
        vec_copy(&mut self.uu_old, &self.uu).unwrap();
        if self.vv.dim() > 0 {
            vec_copy(&mut self.vv_old, &self.vv).unwrap();
            vec_copy(&mut self.aa_old, &self.aa).unwrap();
        }
    }

    /// Discards the trial vectors and restores the committed configuration
    pub fn revert_to_committed(&mut self) {
        vec_copy(&mut self.uu, &self.uu_old).unwrap();
        if self.vv.dim() > 0 {
            vec_copy(&mut self.vv, &self.vv_old).unwrap();
            vec_copy(&mut self.aa, &self.aa_old).unwrap();
        }
        self.duu.fill(0.0);
    }

    /// Zeroes all vectors and restores the initial time
    pub fn reset(&mut self, config: &Config) {
        self.t = config.t_ini;
        self.dt = (config.dt)(self.t);
        self.duu.fill(0.0);
        self.uu.fill(0.0);
        self.uu_old.fill(0.0);
        self.vv.fill(0.0);
        self.aa.fill(0.0);
        self.vv_old.fill(0.0);
        self.aa_old.fill(0.0);
        self.uu_star.fill(0.0);
        self.vv_star.fill(0.0);
    }

    /// Reads a JSON file containing the state data
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let input = File::open(path).map_err(|_| "cannot open file")?;
        let buffered = BufReader::new(input);
        let state = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON file")?;
        Ok(state)
    }

    /// Writes a JSON file with the state data
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer(&mut file, &self).map_err(|_| "cannot write file")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::FemState;
    use crate::base::{Config, Dof, Essential, Numberer, SampleModels};
    use crate::fem::FemBase;

    #[test]
    fn new_works_static() {
        let (model, attributes) = SampleModels::one_truss_2d();
        let base = FemBase::new(&model, attributes, Numberer::Plain).unwrap();
        let essential = Essential::new();
        let config = Config::new();
        let state = FemState::new(&base, &essential, &config).unwrap();
        assert_eq!(state.t, 0.0);
        assert_eq!(state.uu.dim(), 4);
        assert_eq!(state.uu_old.dim(), 4);
        assert_eq!(state.vv.dim(), 0);
        assert_eq!(state.aa.dim(), 0);
    }

    #[test]
    fn new_works_transient_and_lagrange() {
        let (model, attributes) = SampleModels::one_truss_2d();
        let base = FemBase::new(&model, attributes, Numberer::Plain).unwrap();
        let mut essential = Essential::new();
        essential.points(&[0], Dof::Ux, 0.0).points(&[0], Dof::Uy, 0.0);
        let mut config = Config::new();
        config.set_transient(true).set_lagrange_mult_method(true);
        let state = FemState::new(&base, &essential, &config).unwrap();
        assert_eq!(state.uu.dim(), 6); // 4 DOFs + 2 multipliers
        assert_eq!(state.vv.dim(), 6);
        assert_eq!(state.aa.dim(), 6);
        assert_eq!(state.uu_star.dim(), 6);
    }

    #[test]
    fn commit_and_revert_work() {
        let (model, attributes) = SampleModels::one_truss_2d();
        let base = FemBase::new(&model, attributes, Numberer::Plain).unwrap();
        let essential = Essential::new();
        let config = Config::new();
        let mut state = FemState::new(&base, &essential, &config).unwrap();

        state.uu[0] = 1.0;
        state.commit();
        assert_eq!(state.uu_old[0], 1.0);
        state.commit(); // idempotent
        assert_eq!(state.uu_old[0], 1.0);

        state.uu[0] = 9.0;
        state.revert_to_committed();
        assert_eq!(state.uu[0], 1.0);

        state.reset(&config);
        assert_eq!(state.uu[0], 0.0);
        assert_eq!(state.uu_old[0], 0.0);
        assert_eq!(state.t, 0.0);
    }

    #[test]
    fn serde_works() {
        let (model, attributes) = SampleModels::one_truss_2d();
        let base = FemBase::new(&model, attributes, Numberer::Plain).unwrap();
        let essential = Essential::new();
        let config = Config::new();
        let mut state = FemState::new(&base, &essential, &config).unwrap();
        state.uu[1] = -0.5;
        let json = serde_json::to_string(&state).unwrap();
        let read: FemState = serde_json::from_str(&json).unwrap();
        assert_eq!(read.uu[1], -0.5);
        assert_eq!(format!("{:?}", read), format!("{:?}", state));
    }
}
