use crate::base::{Attributes, Equations, Member, Model, Numberer};
use crate::StrError;

/// Holds the member attributes and equation numbers of a model
pub struct FemBase {
    /// Holds all member attributes
    pub attributes: Attributes,

    /// Holds the equation numbers (DOF numbers)
    pub equations: Equations,
}

impl FemBase {
    /// Allocates a new instance
    ///
    /// Validates the model and numbers all active DOFs.
    pub fn new(model: &Model, attributes: Attributes, numberer: Numberer) -> Result<Self, StrError> {
        let equations = Equations::new(model, &attributes, numberer)?;
        Ok(FemBase { attributes, equations })
    }

    /// Returns the number of local equations of a member
    pub fn n_local_eq(&self, member: &Member) -> Result<usize, StrError> {
        let elem = self.attributes.get(member)?;
        Ok(member.points.len() * elem.ndof_per_node())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::FemBase;
    use crate::base::{Attributes, Numberer, SampleModels};

    #[test]
    fn new_works() {
        let (model, attributes) = SampleModels::cantilever_beam_2d();
        let base = FemBase::new(&model, attributes, Numberer::Plain).unwrap();
        assert_eq!(base.equations.n_equation, 6);
        assert_eq!(base.n_local_eq(&model.members[0]), Ok(6));

        let (model, attributes) = SampleModels::one_joint_2d(100.0);
        let base = FemBase::new(&model, attributes, Numberer::Plain).unwrap();
        assert_eq!(base.equations.n_equation, 12);
        assert_eq!(base.n_local_eq(&model.members[0]), Ok(12));
    }

    #[test]
    fn new_captures_errors() {
        let (model, _) = SampleModels::one_truss_2d();
        let attributes = Attributes::from([]);
        assert_eq!(
            FemBase::new(&model, attributes, Numberer::Plain).err(),
            Some("cannot find member attribute in Attributes map")
        );
    }
}
