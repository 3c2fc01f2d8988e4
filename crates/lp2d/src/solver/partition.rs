use super::family::{Family, Side};
use super::types::{Constraint, Lp2dError, SolverCfg};
use super::Solver;

impl Solver {
    /// Fold vertical constraints into `[xl, xr]` and route the rest by the sign of `b`.
    ///
    /// Vertical bounds only ever tighten the interval. An empty interval is not
    /// an error here; `run` reports it as infeasible.
    pub(crate) fn partition(constraints: &[Constraint], cfg: SolverCfg) -> Result<Self, Lp2dError> {
        let mut upper = Family::new(Side::Upper);
        let mut lower = Family::new(Side::Lower);
        let mut xl = f64::NEG_INFINITY;
        let mut xr = f64::INFINITY;

        for (index, h) in constraints.iter().enumerate() {
            let (a, b, c) = (h.a(), h.b(), h.c());
            if !(a.is_finite() && b.is_finite() && c.is_finite()) {
                return Err(Lp2dError::NonFinite { index });
            }
            if b == 0.0 {
                if a == 0.0 {
                    return Err(Lp2dError::Degenerate { index });
                }
                let x = c / a;
                if a > 0.0 {
                    xr = xr.min(x);
                } else {
                    xl = xl.max(x);
                }
            } else if b > 0.0 {
                upper.push(*h);
            } else {
                lower.push(*h);
            }
        }

        tracing::trace!(
            upper = upper.len(),
            lower = lower.len(),
            xl,
            xr,
            "partitioned"
        );
        Ok(Self {
            cfg,
            upper,
            lower,
            xl,
            xr,
            trace: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(hs: &[(f64, f64, f64)]) -> Solver {
        let hs: Vec<Constraint> = hs.iter().copied().map(Constraint::from).collect();
        Solver::partition(&hs, SolverCfg::default()).unwrap()
    }

    #[test]
    fn vertical_bounds_only_tighten() {
        // x <= 5, x <= 7, x >= -2, x >= -3
        let s = part(&[
            (1.0, 0.0, 5.0),
            (2.0, 0.0, 14.0),
            (-1.0, 0.0, 2.0),
            (-3.0, 0.0, 9.0),
        ]);
        assert_eq!(s.xl, -2.0);
        assert_eq!(s.xr, 5.0);
        assert!(s.upper.is_empty() && s.lower.is_empty());
    }

    #[test]
    fn contradictory_vertical_bounds_survive_partition() {
        // x <= 1, x >= 4
        let s = part(&[(1.0, 0.0, 1.0), (-1.0, 0.0, -4.0)]);
        assert!(s.xr < s.xl);
    }

    #[test]
    fn routes_by_sign_of_b() {
        let s = part(&[(1.0, 1.0, 2.0), (-1.0, 2.0, 2.0), (0.0, -1.0, 0.0)]);
        assert_eq!(s.upper.len(), 2);
        assert_eq!(s.lower.len(), 1);
        assert_eq!(s.xl, f64::NEG_INFINITY);
        assert_eq!(s.xr, f64::INFINITY);
    }

    #[test]
    fn rejects_degenerate_and_non_finite() {
        let hs = [Constraint::new(1.0, 1.0, 1.0), Constraint::new(0.0, 0.0, 3.0)];
        assert_eq!(
            Solver::partition(&hs, SolverCfg::default()).unwrap_err(),
            Lp2dError::Degenerate { index: 1 }
        );
        let hs = [Constraint::new(f64::NAN, 1.0, 1.0)];
        assert_eq!(
            Solver::partition(&hs, SolverCfg::default()).unwrap_err(),
            Lp2dError::NonFinite { index: 0 }
        );
    }
}
