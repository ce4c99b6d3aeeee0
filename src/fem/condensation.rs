use crate::StrError;
use russell_lab::{mat_inverse, mat_mat_mul, mat_vec_mul, Matrix, Vector};

/// Round-off floor applied to the partitioned tangent entries
pub const CONDENSE_ZERO_TOL: f64 = 1e-15;

/// Performs the static condensation of a partitioned local system
///
/// Given the full system partitioned into external (e) and internal (i)
/// blocks, computes the condensed tangent and force:
///
/// ```text
/// K_c = K_ee - K_ei · K_ii⁻¹ · K_ie
/// f_c = f_e  - K_ei · K_ii⁻¹ · f_i
/// ```
///
/// Entries with magnitude below [CONDENSE_ZERO_TOL] are treated as zero when
/// partitioning. The work buffers are owned by the instance, so repeated
/// condensations allocate nothing.
pub struct Condensation {
    /// Number of external equations
    n_ext: usize,

    /// Number of internal equations
    n_int: usize,

    kee: Matrix,
    kei: Matrix,
    kie: Matrix,
    kii: Matrix,
    kii_inv: Matrix,
    kei_kii_inv: Matrix,
    fi: Vector,
    aux: Vector,
}

impl Condensation {
    /// Allocates a new instance for a (n_ext + n_int) square system
    pub fn new(n_ext: usize, n_int: usize) -> Self {
        Condensation {
            n_ext,
            n_int,
            kee: Matrix::new(n_ext, n_ext),
            kei: Matrix::new(n_ext, n_int),
            kie: Matrix::new(n_int, n_ext),
            kii: Matrix::new(n_int, n_int),
            kii_inv: Matrix::new(n_int, n_int),
            kei_kii_inv: Matrix::new(n_ext, n_int),
            fi: Vector::new(n_int),
            aux: Vector::new(n_ext),
        }
    }

    /// Condenses the full system onto the external equations
    ///
    /// # Input
    ///
    /// * `kk_full` -- (n_ext + n_int, n_ext + n_int) with the external block first
    /// * `ff_full` -- (n_ext + n_int)
    ///
    /// # Output
    ///
    /// * `kk_cond` -- (n_ext, n_ext) condensed tangent
    /// * `ff_cond` -- (n_ext) condensed force
    ///
    /// Returns an error if the internal block is singular.
    pub fn condense(
        &mut self,
        kk_cond: &mut Matrix,
        ff_cond: &mut Vector,
        kk_full: &Matrix,
        ff_full: &Vector,
    ) -> Result<(), StrError> {
        let (ne, ni) = (self.n_ext, self.n_int);
        if kk_full.dims() != (ne + ni, ne + ni) || ff_full.dim() != ne + ni {
            return Err("full system has incompatible dimensions");
        }
        if kk_cond.dims() != (ne, ne) || ff_cond.dim() != ne {
            return Err("condensed system has incompatible dimensions");
        }

        // partition with round-off floor
        let floor = |v: f64| if f64::abs(v) < CONDENSE_ZERO_TOL { 0.0 } else { v };
        for i in 0..ne {
            for j in 0..ne {
                self.kee.set(i, j, floor(kk_full.get(i, j)));
            }
            for j in 0..ni {
                self.kei.set(i, j, floor(kk_full.get(i, ne + j)));
            }
        }
        for i in 0..ni {
            for j in 0..ne {
                self.kie.set(i, j, floor(kk_full.get(ne + i, j)));
            }
            for j in 0..ni {
                self.kii.set(i, j, floor(kk_full.get(ne + i, ne + j)));
            }
            self.fi[i] = ff_full[ne + i];
        }

        // K_c = K_ee - K_ei · K_ii⁻¹ · K_ie
        mat_inverse(&mut self.kii_inv, &self.kii)?;
        mat_mat_mul(&mut self.kei_kii_inv, 1.0, &self.kei, &self.kii_inv, 0.0)?;
        for i in 0..ne {
            for j in 0..ne {
                kk_cond.set(i, j, self.kee.get(i, j));
            }
        }
        mat_mat_mul(kk_cond, -1.0, &self.kei_kii_inv, &self.kie, 1.0)?;

        // f_c = f_e - K_ei · K_ii⁻¹ · f_i
        mat_vec_mul(&mut self.aux, 1.0, &self.kei_kii_inv, &self.fi)?;
        for i in 0..ne {
            ff_cond[i] = ff_full[i] - self.aux[i];
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Condensation;
    use russell_lab::{vec_approx_eq, Matrix, Vector};

    #[test]
    fn condense_works_2x2_blocks() {
        // two springs in series: k1 between (u0, ui), k2 between (ui, u1)
        // external = (u0, u1), internal = ui
        // condensed stiffness = series spring k1 k2 / (k1 + k2)
        let (k1, k2) = (100.0, 300.0);
        #[rustfmt::skip]
        let kk_full = Matrix::from(&[
            [ k1,      0.0,     -k1     ],
            [ 0.0,     k2,      -k2     ],
            [-k1,     -k2,       k1 + k2],
        ]);
        let ff_full = Vector::from(&[1.0, 2.0, 0.0]);
        let mut cond = Condensation::new(2, 1);
        let mut kk_c = Matrix::new(2, 2);
        let mut ff_c = Vector::new(2);
        cond.condense(&mut kk_c, &mut ff_c, &kk_full, &ff_full).unwrap();
        let ks = k1 * k2 / (k1 + k2);
        let tol = 1e-12;
        assert!(f64::abs(kk_c.get(0, 0) - ks) < tol);
        assert!(f64::abs(kk_c.get(0, 1) + ks) < tol);
        assert!(f64::abs(kk_c.get(1, 0) + ks) < tol);
        assert!(f64::abs(kk_c.get(1, 1) - ks) < tol);
        vec_approx_eq(&ff_c, &[1.0, 2.0], tol);
    }

    #[test]
    fn condense_captures_errors() {
        let mut cond = Condensation::new(2, 1);
        let mut kk_c = Matrix::new(2, 2);
        let mut ff_c = Vector::new(2);
        let kk_full = Matrix::new(2, 2); // wrong dims
        let ff_full = Vector::new(3);
        assert_eq!(
            cond.condense(&mut kk_c, &mut ff_c, &kk_full, &ff_full).err(),
            Some("full system has incompatible dimensions")
        );

        // singular internal block
        let kk_full = Matrix::new(3, 3);
        let ff_full = Vector::new(3);
        assert!(cond.condense(&mut kk_c, &mut ff_c, &kk_full, &ff_full).is_err());

        let kk_full = Matrix::from(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let mut kk_bad = Matrix::new(1, 1);
        assert_eq!(
            cond.condense(&mut kk_bad, &mut ff_c, &kk_full, &ff_full).err(),
            Some("condensed system has incompatible dimensions")
        );
    }
}
