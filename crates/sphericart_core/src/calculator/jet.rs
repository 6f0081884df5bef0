//! Single-sample evaluation of harmonics and their Cartesian derivatives.
//!
//! A solid harmonic factorises as
//!
//! ```text
//! R_l^m(x, y, z) = K_l^m · P̃_l^m(z, r²) · A_m(x, y)
//! A_m = Re (x + iy)^m   for m >= 0
//! A_m = Im (x + iy)^|m| for m < 0
//! ```
//!
//! Derivatives use the closed forms
//!
//! ```text
//! ∂x P̃_l^m = -x · a_l^m · P̃_{l-1}^{m+1}      a_l^m = sqrt((l-m)(l-m-1))
//! ∂y P̃_l^m = -y · a_l^m · P̃_{l-1}^{m+1}
//! ∂z P̃_l^m =      b_l^m · P̃_{l-1}^m          b_l^m = sqrt((l+m)(l-m))
//! ∂x (x + iy)^m = m (x + iy)^{m-1},  ∂y (x + iy)^m = i m (x + iy)^{m-1}
//! ```
//!
//! Normalised harmonics are evaluated at `u = x / r` and corrected with the
//! homogeneity of `R_l^m`, which keeps all intermediate values bounded.

use super::prefactors::{tri, Prefactors};
use crate::traits::KernelFloat;
use crate::types::OutputLayout;

/// Value, gradient and Hessian of a scalar function at one point.
#[derive(Clone, Copy, Debug)]
struct Jet<T> {
    value: T,
    grad: [T; 3],
    hess: [[T; 3]; 3],
}

impl<T: KernelFloat> Jet<T> {
    fn zero() -> Self {
        Self {
            value: T::zero(),
            grad: [T::zero(); 3],
            hess: [[T::zero(); 3]; 3],
        }
    }

    /// `k · f · g` with the product rule applied up to `order`.
    fn product(k: T, f: &Jet<T>, g: &Jet<T>, order: usize) -> Self {
        let mut out = Jet::zero();
        out.value = k * f.value * g.value;
        if order >= 1 {
            for i in 0..3 {
                out.grad[i] = k * (f.grad[i] * g.value + f.value * g.grad[i]);
            }
        }
        if order >= 2 {
            for i in 0..3 {
                for j in 0..3 {
                    out.hess[i][j] = k
                        * (f.hess[i][j] * g.value
                            + f.grad[i] * g.grad[j]
                            + f.grad[j] * g.grad[i]
                            + f.value * g.hess[i][j]);
                }
            }
        }
        out
    }
}

/// Per-worker buffers reused across samples.
#[derive(Debug, Clone)]
pub(crate) struct Scratch<T> {
    legendre: Vec<T>,
    cos_m: Vec<T>,
    sin_m: Vec<T>,
}

impl<T: KernelFloat> Scratch<T> {
    pub fn new(l_max: usize) -> Self {
        Self {
            legendre: vec![T::zero(); tri(l_max, l_max) + 1],
            cos_m: vec![T::zero(); l_max + 1],
            sin_m: vec![T::zero(); l_max + 1],
        }
    }
}

/// Output slices for one sample. Derivative slices are empty when not requested.
pub(crate) struct SampleOutput<'a, T> {
    pub sph: &'a mut [T],
    pub dsph: &'a mut [T],
    pub ddsph: &'a mut [T],
}

impl<'a, T> SampleOutput<'a, T> {
    pub fn values(sph: &'a mut [T]) -> Self {
        Self {
            sph,
            dsph: &mut [],
            ddsph: &mut [],
        }
    }

    pub fn gradients(sph: &'a mut [T], dsph: &'a mut [T]) -> Self {
        Self {
            sph,
            dsph,
            ddsph: &mut [],
        }
    }
}

pub(crate) struct SampleEvaluator<'p, T> {
    pub l_max: usize,
    pub normalized: bool,
    pub order: usize,
    pub prefactors: &'p Prefactors<T>,
}

impl<T: KernelFloat> SampleEvaluator<'_, T> {
    /// Evaluates the sample `xyz = [x, y, z]` into `out`.
    pub fn evaluate(&self, xyz: &[T], scratch: &mut Scratch<T>, mut out: SampleOutput<'_, T>) {
        let (x, y, z) = (xyz[0], xyz[1], xyz[2]);
        let (point, r, r2) = if self.normalized {
            let r = (x * x + y * y + z * z).sqrt();
            if r == T::zero() {
                self.write_origin(out);
                return;
            }
            ([x / r, y / r, z / r], r, T::one())
        } else {
            ([x, y, z], T::one(), x * x + y * y + z * z)
        };

        self.fill_legendre(point[2], r2, &mut scratch.legendre);
        fill_angular(point[0], point[1], &mut scratch.cos_m, &mut scratch.sin_m);

        for l in 0..=self.l_max {
            for m in 0..=l {
                let legendre = self.legendre_jet(l, m, point, &scratch.legendre);
                let k = self.prefactors.norm[tri(l, m)];

                let cos = angular_jet(m, &scratch.cos_m, &scratch.sin_m, false);
                let jet = Jet::product(k, &legendre, &cos, self.order);
                let lm = OutputLayout::harmonic_index(l, m as isize);
                self.emit(&mut out, l, lm, &jet, point, r);

                if m > 0 {
                    let sin = angular_jet(m, &scratch.cos_m, &scratch.sin_m, true);
                    let jet = Jet::product(k, &legendre, &sin, self.order);
                    let lm = OutputLayout::harmonic_index(l, -(m as isize));
                    self.emit(&mut out, l, lm, &jet, point, r);
                }
            }
        }
    }

    /// Fills the triangular table of `P̃_l^m(z, r²)`.
    fn fill_legendre(&self, z: T, r2: T, plm: &mut [T]) {
        let p = self.prefactors;
        plm[0] = T::one();
        for m in 1..=self.l_max {
            plm[tri(m, m)] = p.diagonal[m] * plm[tri(m - 1, m - 1)];
        }
        for m in 0..self.l_max {
            plm[tri(m + 1, m)] = p.first_off_diagonal[m] * z * plm[tri(m, m)];
        }
        for m in 0..=self.l_max {
            for l in (m + 2)..=self.l_max {
                let idx = tri(l, m);
                plm[idx] = p.rec_z[idx] * z * plm[tri(l - 1, m)]
                    - p.rec_r2[idx] * r2 * plm[tri(l - 2, m)];
            }
        }
    }

    fn legendre_jet(&self, l: usize, m: usize, point: [T; 3], plm: &[T]) -> Jet<T> {
        let p = self.prefactors;
        let [x, y, _] = point;
        let at = |l: Option<usize>, m: usize| match l {
            Some(l) if m <= l => plm[tri(l, m)],
            _ => T::zero(),
        };
        let coef = |table: &[T], l: Option<usize>, m: usize| match l {
            Some(l) if m <= l => table[tri(l, m)],
            _ => T::zero(),
        };

        let mut jet = Jet::zero();
        jet.value = plm[tri(l, m)];
        if self.order == 0 {
            return jet;
        }

        let (l1, l2) = (l.checked_sub(1), l.checked_sub(2));
        let a = p.grad_xy[tri(l, m)];
        let b = p.grad_z[tri(l, m)];
        let a1 = a * at(l1, m + 1);
        jet.grad = [-x * a1, -y * a1, b * at(l1, m)];
        if self.order == 1 {
            return jet;
        }

        let a2 = a * coef(&p.grad_xy, l1, m + 1) * at(l2, m + 2);
        let bxz = a * coef(&p.grad_z, l1, m + 1) * at(l2, m + 1);
        let bzz = b * coef(&p.grad_z, l1, m) * at(l2, m);
        jet.hess = [
            [-a1 + x * x * a2, x * y * a2, -x * bxz],
            [x * y * a2, -a1 + y * y * a2, -y * bxz],
            [-x * bxz, -y * bxz, bzz],
        ];
        jet
    }

    /// Writes one harmonic, applying the normalisation correction if needed.
    fn emit(
        &self,
        out: &mut SampleOutput<'_, T>,
        l: usize,
        lm: usize,
        jet: &Jet<T>,
        u: [T; 3],
        r: T,
    ) {
        let n_lm = out.sph.len();
        out.sph[lm] = jet.value;
        if self.order == 0 {
            return;
        }

        let mut grad = jet.grad;
        let mut hess = jet.hess;
        if self.normalized {
            // f(x) = R(x) / r^l with R homogeneous of degree l, evaluated at u = x / r
            let lf = T::from_usize(l);
            let inv_r = r.recip();
            if self.order >= 2 {
                let inv_r2 = inv_r * inv_r;
                for i in 0..3 {
                    for j in 0..3 {
                        let delta = if i == j { lf } else { T::zero() };
                        let cross = u[i] * jet.grad[j] + u[j] * jet.grad[i];
                        let radial = lf * (lf + T::from_f64(2.0)) * u[i] * u[j] - delta;
                        hess[i][j] = (jet.hess[i][j] - lf * cross + jet.value * radial) * inv_r2;
                    }
                }
            }
            for i in 0..3 {
                grad[i] = (jet.grad[i] - lf * jet.value * u[i]) * inv_r;
            }
        }

        for (axis, g) in grad.iter().enumerate() {
            out.dsph[axis * n_lm + lm] = *g;
        }
        if self.order >= 2 {
            for (row, hrow) in hess.iter().enumerate() {
                for (col, h) in hrow.iter().enumerate() {
                    out.ddsph[(row * 3 + col) * n_lm + lm] = *h;
                }
            }
        }
    }

    /// Direction is undefined at the origin: `Y_0^0` only, zero derivatives.
    fn write_origin(&self, out: SampleOutput<'_, T>) {
        out.sph.fill(T::zero());
        out.sph[0] = self.prefactors.norm[0];
        out.dsph.fill(T::zero());
        out.ddsph.fill(T::zero());
    }
}

/// Fills `Re (x + iy)^m` and `Im (x + iy)^m` for `m = 0..=l_max`.
fn fill_angular<T: KernelFloat>(x: T, y: T, cos_m: &mut [T], sin_m: &mut [T]) {
    cos_m[0] = T::one();
    sin_m[0] = T::zero();
    for m in 1..cos_m.len() {
        cos_m[m] = x * cos_m[m - 1] - y * sin_m[m - 1];
        sin_m[m] = x * sin_m[m - 1] + y * cos_m[m - 1];
    }
}

fn angular_jet<T: KernelFloat>(m: usize, cos_m: &[T], sin_m: &[T], sine: bool) -> Jet<T> {
    let mut jet = Jet::zero();
    let mf = T::from_usize(m);
    let lower = |k: usize| match m.checked_sub(k) {
        Some(i) => (cos_m[i], sin_m[i]),
        None => (T::zero(), T::zero()),
    };
    let (c1, s1) = lower(1);
    let (c2, s2) = lower(2);
    let mm = mf * (mf - T::one());

    if sine {
        jet.value = sin_m[m];
        jet.grad = [mf * s1, mf * c1, T::zero()];
        jet.hess[0][0] = mm * s2;
        jet.hess[0][1] = mm * c2;
        jet.hess[1][1] = -mm * s2;
    } else {
        jet.value = cos_m[m];
        jet.grad = [mf * c1, -mf * s1, T::zero()];
        jet.hess[0][0] = mm * c2;
        jet.hess[0][1] = -mm * s2;
        jet.hess[1][1] = -mm * c2;
    }
    jet.hess[1][0] = jet.hess[0][1];
    jet
}
