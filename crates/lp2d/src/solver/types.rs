//! Constraint model, solver tolerances, and the tagged result.
//!
//! - `Constraint`: closed half-plane `a·x + b·y <= c` with line helpers.
//! - `SolverCfg`: determinant and tightness tolerances.
//! - `Solution`: optimal value, infeasible, or unbounded below.

use nalgebra::{matrix, Vector2};
use thiserror::Error;

/// Solver configuration (tolerances).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverCfg {
    /// Relative bound under which `a1·b2 − a2·b1` counts as zero (parallel lines).
    pub eps_det: f64,
    /// Relative band for "constraint is tight at the probe point".
    pub eps_tight: f64,
}

impl Default for SolverCfg {
    fn default() -> Self {
        Self {
            eps_det: 1e-12,
            eps_tight: 1e-10,
        }
    }
}

/// Invalid tolerance passed to `SolverCfg::new`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CfgError {
    #[error("eps_det must be finite and non-negative")]
    EpsDet,

    #[error("eps_tight must be finite and non-negative")]
    EpsTight,
}

impl SolverCfg {
    /// Creates a config with validated tolerances.
    ///
    /// # Errors
    ///
    /// Returns an error if a tolerance is negative or non-finite.
    pub fn new(eps_det: f64, eps_tight: f64) -> Result<Self, CfgError> {
        if !eps_det.is_finite() || eps_det < 0.0 {
            return Err(CfgError::EpsDet);
        }
        if !eps_tight.is_finite() || eps_tight < 0.0 {
            return Err(CfgError::EpsTight);
        }
        Ok(Self { eps_det, eps_tight })
    }
}

/// Input rejected before solving.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Lp2dError {
    /// `a = 0` and `b = 0`: not a half-plane.
    #[error("constraint #{index} has a = 0 and b = 0")]
    Degenerate { index: usize },

    #[error("constraint #{index} has a non-finite coefficient")]
    NonFinite { index: usize },
}

/// Outcome of a solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Solution {
    /// Minimal `y` over the feasible region.
    Optimal(f64),
    /// The feasible region is empty.
    Infeasible,
    /// The feasible region extends to `y → −∞`.
    Unbounded,
}

impl Solution {
    /// Wraps a finite optimum; `-0.0` is reported as `0.0`.
    #[inline]
    pub(crate) fn optimal(y: f64) -> Self {
        debug_assert!(y.is_finite(), "optimum must be finite");
        Solution::Optimal(if y == 0.0 { 0.0 } else { y })
    }
    #[inline]
    pub fn value(&self) -> Option<f64> {
        match *self {
            Solution::Optimal(y) => Some(y),
            _ => None,
        }
    }
    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Solution::Infeasible)
    }
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Solution::Unbounded)
    }
}

/// Closed half-plane `n · (x, y) <= c` with `n = (a, b)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constraint {
    pub n: Vector2<f64>,
    pub c: f64,
}

impl Constraint {
    #[inline]
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self {
            n: Vector2::new(a, b),
            c,
        }
    }
    #[inline]
    pub fn a(&self) -> f64 {
        self.n.x
    }
    #[inline]
    pub fn b(&self) -> f64 {
        self.n.y
    }
    #[inline]
    pub fn c(&self) -> f64 {
        self.c
    }

    /// `y` on the boundary line at `x`. Requires `b != 0`.
    #[inline]
    pub fn y_at(&self, x: f64) -> f64 {
        (self.c - self.n.x * x) / self.n.y
    }
    /// `x` on the boundary line at `y`. Requires `a != 0`.
    #[inline]
    pub fn x_at(&self, y: f64) -> f64 {
        (self.c - self.n.y * y) / self.n.x
    }
    #[inline]
    pub fn y_intercept(&self) -> f64 {
        self.c / self.n.y
    }
    #[inline]
    pub fn x_intercept(&self) -> f64 {
        self.c / self.n.x
    }
    /// Slope of the boundary line in the x–y plane (`−a/b`).
    #[inline]
    pub fn slope(&self) -> f64 {
        -self.n.x / self.n.y
    }
    #[inline]
    pub fn satisfies_eps(&self, p: Vector2<f64>, eps: f64) -> bool {
        self.n.dot(&p) <= self.c + eps
    }
    /// Same half-plane with every coefficient multiplied by `k > 0`.
    #[inline]
    pub fn scaled(&self, k: f64) -> Self {
        debug_assert!(k > 0.0);
        Self {
            n: self.n * k,
            c: self.c * k,
        }
    }

    /// Exact parallelism: identical `(a, b)`.
    #[inline]
    pub fn is_parallel(&self, other: &Constraint) -> bool {
        self.n == other.n
    }

    /// `a1·b2 − a2·b1`, or `None` when it is within `eps_det` of zero
    /// relative to the size of its two products.
    #[inline]
    pub fn det(&self, other: &Constraint, eps_det: f64) -> Option<f64> {
        let p = self.n.x * other.n.y;
        let q = other.n.x * self.n.y;
        let det = p - q;
        if !det.is_finite() || det.abs() <= eps_det * (p.abs() + q.abs()) {
            None
        } else {
            Some(det)
        }
    }

    /// x-coordinate where the two boundary lines cross.
    #[inline]
    pub fn intersect_x(&self, other: &Constraint, eps_det: f64) -> Option<f64> {
        let det = self.det(other, eps_det)?;
        let x = (other.n.y * self.c - self.n.y * other.c) / det;
        x.is_finite().then_some(x)
    }

    /// y-coordinate where the two boundary lines cross.
    #[inline]
    pub fn intersect_y(&self, other: &Constraint, eps_det: f64) -> Option<f64> {
        let det = self.det(other, eps_det)?;
        let y = (self.n.x * other.c - other.n.x * self.c) / det;
        y.is_finite().then_some(y)
    }

    /// Crossing point of the two boundary lines.
    pub fn intersection(&self, other: &Constraint, eps_det: f64) -> Option<Vector2<f64>> {
        self.det(other, eps_det)?;
        let a = matrix![self.n.x, self.n.y; other.n.x, other.n.y];
        let inv = a.try_inverse()?;
        let p = inv * Vector2::new(self.c, other.c);
        (p.x.is_finite() && p.y.is_finite()).then_some(p)
    }
}

impl From<(f64, f64, f64)> for Constraint {
    #[inline]
    fn from((a, b, c): (f64, f64, f64)) -> Self {
        Constraint::new(a, b, c)
    }
}

impl From<[f64; 3]> for Constraint {
    #[inline]
    fn from([a, b, c]: [f64; 3]) -> Self {
        Constraint::new(a, b, c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn line_helpers() {
        // 2x + 4y <= 8  ->  y = 2 - x/2
        let h = Constraint::new(2.0, 4.0, 8.0);
        assert!((h.y_at(2.0) - 1.0).abs() < 1e-12);
        assert!((h.x_at(1.0) - 2.0).abs() < 1e-12);
        assert!((h.y_intercept() - 2.0).abs() < 1e-12);
        assert!((h.x_intercept() - 4.0).abs() < 1e-12);
        assert!((h.slope() + 0.5).abs() < 1e-12);
        assert!(h.satisfies_eps(vector![0.0, 0.0], 0.0));
        assert!(!h.satisfies_eps(vector![4.0, 1.0], 0.0));
    }

    #[test]
    fn crossing_of_two_lines() {
        let eps = SolverCfg::default().eps_det;
        // x + y = 2 and -x + y = 2 meet at (0, 2)
        let p = Constraint::new(1.0, 1.0, 2.0);
        let q = Constraint::new(-1.0, 1.0, 2.0);
        assert!(p.intersect_x(&q, eps).unwrap().abs() < 1e-12);
        assert!((p.intersect_y(&q, eps).unwrap() - 2.0).abs() < 1e-12);
        let z = p.intersection(&q, eps).unwrap();
        assert!((z - vector![0.0, 2.0]).norm() < 1e-12);
    }

    #[test]
    fn parallel_lines_have_no_crossing() {
        let eps = SolverCfg::default().eps_det;
        let p = Constraint::new(1.0, 2.0, 3.0);
        let q = Constraint::new(1.0, 2.0, 5.0);
        let r = Constraint::new(2.0, 4.0, 1.0);
        assert!(p.is_parallel(&q));
        assert!(!p.is_parallel(&r));
        assert!(p.det(&r, eps).is_none());
        assert!(p.intersect_x(&q, eps).is_none());
        assert!(p.intersection(&r, eps).is_none());
    }

    #[test]
    fn cfg_validation() {
        assert!(SolverCfg::new(1e-12, 1e-9).is_ok());
        assert_eq!(SolverCfg::new(-1.0, 1e-9), Err(CfgError::EpsDet));
        assert_eq!(SolverCfg::new(0.0, f64::NAN), Err(CfgError::EpsTight));
    }

    #[test]
    fn negative_zero_optimum_is_normalised() {
        let s = Solution::optimal(-0.0);
        assert!(s.value().unwrap().is_sign_positive());
    }
}
