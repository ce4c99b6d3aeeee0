use super::{Attributes, Dof, Equations, Member};
use crate::StrError;
use russell_lab::{Matrix, Vector};
use russell_sparse::CooMatrix;

/// Computes the local-to-global map of a member
///
/// The local equations follow the node order of the member, with the
/// Ux, Uy (and Rz, for 3-DOF formulations) entries in sequence.
pub fn compute_local_to_global(
    attributes: &Attributes,
    equations: &Equations,
    member: &Member,
) -> Result<Vec<usize>, StrError> {
    let elem = attributes.get(member)?;
    let mut local_to_global = Vec::with_capacity(member.points.len() * elem.ndof_per_node());
    for point_id in &member.points {
        local_to_global.push(equations.eq(*point_id, Dof::Ux)?);
        local_to_global.push(equations.eq(*point_id, Dof::Uy)?);
        if elem.ndof_per_node() == 3 {
            local_to_global.push(equations.eq(*point_id, Dof::Rz)?);
        }
    }
    Ok(local_to_global)
}

/// Assembles a local vector into the global vector
///
/// Skips the rows corresponding to prescribed equations.
///
/// # Panics
///
/// This function will panic if the indices are out-of-bounds
#[inline]
pub fn assemble_vector(rr_global: &mut Vector, r_local: &Vector, local_to_global: &[usize], prescribed: &[bool]) {
    let n_equation_local = r_local.dim();
    for l in 0..n_equation_local {
        let g = local_to_global[l];
        if !prescribed[g] {
            rr_global[g] += r_local[l];
        }
    }
}

/// Assembles a local matrix into the global (sparse) matrix
///
/// Skips the rows and columns corresponding to prescribed equations.
/// With `triangular`, only the lower triangle is stored (symmetric storage).
///
/// # Panics
///
/// This function will panic if the local indices are out-of-bounds
#[inline]
pub fn assemble_matrix(
    kk_global: &mut CooMatrix,
    kk_local: &Matrix,
    local_to_global: &[usize],
    prescribed: &[bool],
    triangular: bool,
) -> Result<(), StrError> {
    let n_equation_local = kk_local.dims().0;
    for l in 0..n_equation_local {
        let g = local_to_global[l];
        if !prescribed[g] {
            for ll in 0..n_equation_local {
                let gg = local_to_global[ll];
                if !prescribed[gg] {
                    if triangular && gg > g {
                        continue;
                    }
                    kk_global.put(g, gg, kk_local.get(l, ll))?;
                }
            }
        }
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
