use super::{Attributes, Dof, Model, Numberer, ALL_DOFS};
use crate::StrError;
use serde::{Deserialize, Serialize};

/// Maps (node, DOF) pairs to equation numbers (DOF numbers)
///
/// The active DOFs of a node are the union of the DOFs required by the members
/// attached to it (e.g., a node connected to trusses only has no rotation).
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Equations {
    /// Equation number of each (node, DOF) pair; None means inactive
    ///
    /// (nnode, 3)
    pub all: Vec<Vec<Option<usize>>>,

    /// Total number of equations (total number of DOFs)
    pub n_equation: usize,
}

impl Equations {
    /// Allocates a new instance by numbering all active DOFs
    pub fn new(model: &Model, attributes: &Attributes, numberer: Numberer) -> Result<Self, StrError> {
        model.validate()?;

        // mark active DOFs
        let nnode = model.nodes.len();
        let mut active = vec![[false; 3]; nnode];
        for member in &model.members {
            let elem = attributes.get(member)?;
            if member.points.len() != elem.nnode() {
                return Err("member has the wrong number of connected nodes");
            }
            for p in &member.points {
                active[*p][Dof::Ux as usize] = true;
                active[*p][Dof::Uy as usize] = true;
                if elem.ndof_per_node() == 3 {
                    active[*p][Dof::Rz as usize] = true;
                }
            }
        }
        for p in 0..nnode {
            if !active[p].iter().any(|a| *a) {
                return Err("node is not connected to any member");
            }
        }

        // number the equations following the selected strategy
        let order: Vec<usize> = match numberer {
            Numberer::Plain => (0..nnode).collect(),
            Numberer::Reversed => (0..nnode).rev().collect(),
        };
        let mut all = vec![vec![None; 3]; nnode];
        let mut n_equation = 0;
        for p in order {
            for dof in &ALL_DOFS {
                if active[p][*dof as usize] {
                    all[p][*dof as usize] = Some(n_equation);
                    n_equation += 1;
                }
            }
        }
        Ok(Equations { all, n_equation })
    }

    /// Returns the equation number corresponding to a (node, DOF) pair
    pub fn eq(&self, point_id: usize, dof: Dof) -> Result<usize, StrError> {
        if point_id >= self.all.len() {
            return Err("cannot find equation number because the node id is out-of-bounds");
        }
        self.all[point_id][dof as usize].ok_or("cannot find equation number corresponding to (node, DOF)")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
