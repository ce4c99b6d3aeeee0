use super::Pbc;
use std::fmt;

/// Holds natural (concentrated load) boundary conditions
///
/// The stored values are reference loads; the solver scales them by the
/// load factor function configured in [crate::base::Config]
pub struct Natural {
    pub concentrated: Vec<(usize, Pbc)>,
}

impl Natural {
    /// Allocates a new instance
    pub fn new() -> Self {
        Natural { concentrated: Vec::new() }
    }

    /// Sets concentrated loads at nodes
    pub fn points(&mut self, points: &[usize], pbc: Pbc) -> &mut Self {
        for point_id in points {
            self.concentrated.push((*point_id, pbc));
        }
        self
    }
}

impl fmt::Display for Natural {
    /// Prints a formatted summary of the concentrated loads
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Concentrated loads\n").unwrap();
        write!(f, "==================\n").unwrap();
        for (id, pbc) in &self.concentrated {
            write!(f, "{:?} : {}\n", id, pbc).unwrap();
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Natural;
    use crate::base::Pbc;

    #[test]
    fn natural_works() {
        let mut natural = Natural::new();
        natural.points(&[2], Pbc::Fy(-1000.0)).points(&[1, 2], Pbc::Mz(20.0));
        assert_eq!(natural.concentrated.len(), 3);
        assert_eq!(
            format!("{}", natural),
            "Concentrated loads\n\
             ==================\n\
             2 : Fy = -1000.0\n\
             1 : Mz = 20.0\n\
             2 : Mz = 20.0\n"
        );
    }
}
