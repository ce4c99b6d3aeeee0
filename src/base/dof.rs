use serde::{Deserialize, Serialize};

/// Defines degrees-of-freedom (DOF) types
///
/// Note: The fixed numbering scheme assists in sorting the DOFs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Dof {
    /// Displacement along the first dimension
    Ux = 0,

    /// Displacement along the second dimension
    Uy = 1,

    /// Rotation around the z axis
    Rz = 2,
}

/// Holds all possible DOFs in the order used for equation numbering
pub const ALL_DOFS: [Dof; 3] = [Dof::Ux, Dof::Uy, Dof::Rz];

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
