//! Degree/order dependent constants of the Legendre recurrence.
//!
//! The recurrence runs on length-normalised associated Legendre terms
//!
//! ```text
//! P̃_l^m = Q_l^m · sqrt((l - m)! / (l + m)!)
//! ```
//!
//! where `Q_l^m` is the polynomial part of the regular solid harmonic
//! (`r^l P_l^m(cos θ) = Q_l^m · (r sin θ)^m`). Every coefficient below is
//! O(l), so neither precision overflows for the degrees used in practice.
//!
//! All tables are indexed by the triangular index [`tri`].

use std::f64::consts::PI;

use crate::traits::KernelFloat;

/// Triangular index of `(l, m)` with `0 <= m <= l`.
#[inline]
pub(crate) fn tri(l: usize, m: usize) -> usize {
    l * (l + 1) / 2 + m
}

#[derive(Debug, Clone)]
pub(crate) struct Prefactors<T> {
    /// `P̃_m^m = diagonal[m] · P̃_{m-1}^{m-1}`
    pub diagonal: Vec<T>,
    /// `P̃_{m+1}^m = first_off_diagonal[m] · z · P̃_m^m`
    pub first_off_diagonal: Vec<T>,
    /// `P̃_l^m = rec_z · z · P̃_{l-1}^m - rec_r2 · r² · P̃_{l-2}^m`
    pub rec_z: Vec<T>,
    pub rec_r2: Vec<T>,
    /// `sqrt((2l + 1) / 4π)`, times `√2` for `m > 0`.
    pub norm: Vec<T>,
    /// `∂x P̃_l^m = -x · grad_xy · P̃_{l-1}^{m+1}` (same for y)
    pub grad_xy: Vec<T>,
    /// `∂z P̃_l^m = grad_z · P̃_{l-1}^m`
    pub grad_z: Vec<T>,
}

impl<T: KernelFloat> Prefactors<T> {
    pub fn new(l_max: usize) -> Self {
        let n_tri = tri(l_max, l_max) + 1;
        let mut diagonal = vec![T::one(); l_max + 1];
        let mut first_off_diagonal = vec![T::zero(); l_max + 1];
        let mut rec_z = vec![T::zero(); n_tri];
        let mut rec_r2 = vec![T::zero(); n_tri];
        let mut norm = vec![T::zero(); n_tri];
        let mut grad_xy = vec![T::zero(); n_tri];
        let mut grad_z = vec![T::zero(); n_tri];

        for (m, coef) in diagonal.iter_mut().enumerate().skip(1) {
            let mf = m as f64;
            *coef = T::from_f64(((2.0 * mf - 1.0) / (2.0 * mf)).sqrt());
        }
        for (m, coef) in first_off_diagonal.iter_mut().enumerate() {
            *coef = T::from_f64((2.0 * m as f64 + 1.0).sqrt());
        }

        for l in 0..=l_max {
            let base = ((2 * l + 1) as f64 / (4.0 * PI)).sqrt();
            for m in 0..=l {
                let idx = tri(l, m);
                let (lf, mf) = (l as f64, m as f64);

                norm[idx] = T::from_f64(if m == 0 { base } else { base * 2f64.sqrt() });

                if l >= m + 2 {
                    let denom = ((lf + mf) * (lf - mf)).sqrt();
                    rec_z[idx] = T::from_f64((2.0 * lf - 1.0) / denom);
                    rec_r2[idx] = T::from_f64(((lf + mf - 1.0) * (lf - mf - 1.0)).sqrt() / denom);
                    grad_xy[idx] = T::from_f64(((lf - mf) * (lf - mf - 1.0)).sqrt());
                }
                grad_z[idx] = T::from_f64(((lf + mf) * (lf - mf)).sqrt());
            }
        }

        Self {
            diagonal,
            first_off_diagonal,
            rec_z,
            rec_r2,
            norm,
            grad_xy,
            grad_z,
        }
    }
}
