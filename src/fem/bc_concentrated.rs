use super::FemBase;
use crate::base::Natural;
use crate::StrError;
use russell_lab::Vector;

/// Holds one concentrated (natural) load at a global equation
pub struct BcConcentrated {
    /// Global equation number
    pub eq: usize,

    /// Reference load value
    pub value: f64,
}

/// Holds all concentrated (natural) boundary conditions of a model
pub struct BcConcentratedArray {
    /// All concentrated loads
    pub all: Vec<BcConcentrated>,
}

impl BcConcentratedArray {
    /// Allocates a new instance
    pub fn new(base: &FemBase, natural: &Natural) -> Result<Self, StrError> {
        let mut all = Vec::with_capacity(natural.concentrated.len());
        for (point_id, pbc) in &natural.concentrated {
            let eq = base.equations.eq(*point_id, pbc.dof())?;
            all.push(BcConcentrated { eq, value: pbc.value() });
        }
        Ok(BcConcentratedArray { all })
    }

    /// Adds the scaled reference loads to the external force vector
    pub fn add_to_ff_ext(&self, ff_ext: &mut Vector, load_factor: f64) {
        for bc in &self.all {
            ff_ext[bc.eq] += load_factor * bc.value;
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::BcConcentratedArray;
    use crate::base::{Natural, Numberer, Pbc, SampleModels};
    use crate::fem::FemBase;
    use russell_lab::Vector;

    #[test]
    fn new_and_add_to_ff_ext_work() {
        let (model, attributes) = SampleModels::cantilever_beam_2d();
        let base = FemBase::new(&model, attributes, Numberer::Plain).unwrap();
        let mut natural = Natural::new();
        natural.points(&[1], Pbc::Fy(-1000.0)).points(&[1], Pbc::Mz(30.0));
        let array = BcConcentratedArray::new(&base, &natural).unwrap();
        assert_eq!(array.all.len(), 2);

        let mut ff_ext = Vector::new(6);
        array.add_to_ff_ext(&mut ff_ext, 0.5);
        assert_eq!(ff_ext.as_data(), &[0.0, 0.0, 0.0, 0.0, -500.0, 15.0]);

        // accumulates
        array.add_to_ff_ext(&mut ff_ext, 0.5);
        assert_eq!(ff_ext.as_data(), &[0.0, 0.0, 0.0, 0.0, -1000.0, 30.0]);
    }

    #[test]
    fn new_captures_errors() {
        let (model, attributes) = SampleModels::one_truss_2d();
        let base = FemBase::new(&model, attributes, Numberer::Plain).unwrap();
        let mut natural = Natural::new();
        natural.points(&[1], Pbc::Mz(1.0)); // truss nodes have no rotation
        assert!(BcConcentratedArray::new(&base, &natural).is_err());
    }
}
