use super::Member;
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Holds parameters for uniaxial material points
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub enum ParamUniaxial {
    /// Linear elastic model
    Elastic {
        /// Young's modulus
        young: f64,
    },

    /// Bilinear elastoplastic model with isotropic hardening
    Bilinear {
        /// Young's modulus
        young: f64,

        /// Hardening modulus
        hardening: f64,

        /// Yield strength (must be positive)
        strength: f64,
    },
}

impl ParamUniaxial {
    /// Returns the elastic (initial) modulus
    pub fn young(&self) -> f64 {
        match self {
            ParamUniaxial::Elastic { young } => *young,
            ParamUniaxial::Bilinear { young, .. } => *young,
        }
    }

    /// Validates the parameters
    pub fn validate(&self) -> Result<(), StrError> {
        match self {
            ParamUniaxial::Elastic { young } => {
                if *young <= 0.0 {
                    return Err("young modulus must be positive");
                }
            }
            ParamUniaxial::Bilinear {
                young,
                hardening,
                strength,
            } => {
                if *young <= 0.0 {
                    return Err("young modulus must be positive");
                }
                if *hardening < 0.0 {
                    return Err("hardening modulus must not be negative");
                }
                if *strength <= 0.0 {
                    return Err("yield strength must be positive");
                }
            }
        }
        Ok(())
    }
}

/// Holds parameters for truss members
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamTruss {
    /// Material point governing the axial response
    pub material: ParamUniaxial,

    /// Cross-sectional area
    pub area: f64,

    /// Intrinsic (real) density
    pub density: f64,
}

impl ParamTruss {
    /// Returns a sample with linear elastic material
    pub fn sample_linear_elastic() -> Self {
        ParamTruss {
            material: ParamUniaxial::Elastic { young: 1000.0 },
            area: 1.0,
            density: 1.0,
        }
    }

    /// Returns a sample with bilinear elastoplastic material
    pub fn sample_bilinear() -> Self {
        ParamTruss {
            material: ParamUniaxial::Bilinear {
                young: 1000.0,
                hardening: 100.0,
                strength: 5.0,
            },
            area: 1.0,
            density: 1.0,
        }
    }
}

/// Holds parameters for 2D Euler-Bernoulli beam members
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamBeam {
    /// Young's modulus
    pub young: f64,

    /// Cross-sectional area
    pub area: f64,

    /// Second moment of area about the z axis
    pub inertia: f64,

    /// Intrinsic (real) density
    pub density: f64,
}

impl ParamBeam {
    /// Returns a sample set of parameters
    pub fn sample() -> Self {
        ParamBeam {
            young: 2e11,
            area: 0.01,
            inertia: 1e-4,
            density: 7850.0,
        }
    }
}

/// Number of uniaxial springs in the panel-zone joint element
///
/// Per face (left, bottom, right, top): axial, tangential, rotational (12 springs),
/// plus one spring resisting the panel shear distortion.
pub const JOINT_NSPRING: usize = 13;

/// Spring index of the panel shear spring
pub const JOINT_PANEL_SPRING: usize = 12;

/// Holds parameters for the panel-zone joint element
///
/// The spring array is ordered by face (0 = left, 1 = bottom, 2 = right, 3 = top)
/// with entries (3f) axial, (3f+1) tangential, and (3f+2) rotational; the last
/// entry (12) is the panel shear spring.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamJoint {
    /// Material points for the 13 springs
    pub springs: [ParamUniaxial; JOINT_NSPRING],
}

impl ParamJoint {
    /// Returns a sample where all springs share the same elastic modulus
    pub fn sample_elastic(young: f64) -> Self {
        ParamJoint {
            springs: [ParamUniaxial::Elastic { young }; JOINT_NSPRING],
        }
    }
}

/// Defines the element formulation attached to a member attribute
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub enum Elem {
    Truss(ParamTruss),
    Beam(ParamBeam),
    Joint(ParamJoint),
}

impl Elem {
    /// Returns the number of DOFs per connected node
    pub fn ndof_per_node(&self) -> usize {
        match self {
            Elem::Truss(..) => 2,
            Elem::Beam(..) => 3,
            Elem::Joint(..) => 3,
        }
    }

    /// Returns the required number of connected nodes
    pub fn nnode(&self) -> usize {
        match self {
            Elem::Truss(..) => 2,
            Elem::Beam(..) => 2,
            Elem::Joint(..) => 4,
        }
    }
}

/// Maps member attributes to element parameters
pub struct Attributes {
    all: HashMap<usize, Elem>,
}

impl Attributes {
    /// Allocates a new instance from an array of (attribute, Elem) pairs
    pub fn from<const N: usize>(arr: [(usize, Elem); N]) -> Self {
        Attributes {
            all: HashMap::from(arr),
        }
    }

    /// Returns the element definition corresponding to a member
    pub fn get(&self, member: &Member) -> Result<&Elem, StrError> {
        self.all
            .get(&member.attribute)
            .ok_or("cannot find member attribute in Attributes map")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
