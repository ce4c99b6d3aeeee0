use super::Dof;
use std::collections::HashMap;
use std::fmt;

/// Holds essential (prescribed displacement) boundary conditions
///
/// The stored value is the prescribed target. Non-zero targets require the
/// Lagrange multiplier method; see [crate::base::Config::set_lagrange_mult_method]
pub struct Essential {
    pub all: HashMap<(usize, Dof), f64>,
}

impl Essential {
    /// Allocates a new instance
    pub fn new() -> Self {
        Essential { all: HashMap::new() }
    }

    /// Sets prescribed displacements at nodes
    pub fn points(&mut self, points: &[usize], dof: Dof, value: f64) -> &mut Self {
        for point_id in points {
            self.all.insert((*point_id, dof), value);
        }
        self
    }

    /// Returns whether any prescribed value is non-zero
    pub fn has_non_zero(&self) -> bool {
        self.all.values().any(|value| *value != 0.0)
    }
}

impl fmt::Display for Essential {
    /// Prints a formatted summary of the prescribed displacements
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Prescribed displacements\n").unwrap();
        write!(f, "========================\n").unwrap();
        let mut keys: Vec<_> = self.all.keys().collect();
        keys.sort();
        for key in keys {
            let value = self.all.get(key).unwrap();
            write!(f, "{:?} : {:?} = {:?}\n", key.0, key.1, value).unwrap();
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Essential;
    use crate::base::Dof;

    #[test]
    fn essential_works() {
        let mut essential = Essential::new();
        essential
            .points(&[0], Dof::Ux, 0.0)
            .points(&[0], Dof::Uy, 0.0)
            .points(&[1, 2], Dof::Uy, -0.5);
        assert_eq!(essential.all.len(), 4);
        assert!(essential.has_non_zero());
        assert_eq!(
            format!("{}", essential),
            "Prescribed displacements\n\
             ========================\n\
             0 : Ux = 0.0\n\
             0 : Uy = 0.0\n\
             1 : Uy = -0.5\n\
             2 : Uy = -0.5\n"
        );
    }

    #[test]
    fn has_non_zero_works() {
        let mut essential = Essential::new();
        essential.points(&[0, 1], Dof::Ux, 0.0);
        assert!(!essential.has_non_zero());
        essential.points(&[2], Dof::Rz, 0.001);
        assert!(essential.has_non_zero());
    }
}
