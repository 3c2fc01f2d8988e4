//! Closed form for the residual problem (at most two constraints, or no lower bound).
//!
//! Configurations of two half-planes over `[xl, xr]`:
//! - two lower bounds, both slopes positive: envelope rises, optimum at `xl`;
//! - two lower bounds, both slopes negative: envelope falls, optimum at `xr`;
//! - two lower bounds, slopes of opposite sign: V-shaped envelope, optimum at
//!   the crossing clamped into the interval;
//! - two parallel lower bounds: the higher one alone;
//! - lower under upper, lower slope steeper: feasible left of the crossing;
//! - lower under upper, upper slope steeper: feasible right of the crossing;
//! - parallel lower and upper: feasible everywhere or nowhere;
//! - a single lower bound: its minimum over the interval.
//!
//! A falling (rising) lower bound with no finite right (left) end is unbounded.

use super::family::{Family, Side};
use super::types::{Constraint, Solution, SolverCfg};
use super::SMALL;

pub(crate) fn solve_reduced(
    lower: &Family,
    upper: &Family,
    xl: f64,
    xr: f64,
    cfg: SolverCfg,
) -> Solution {
    debug_assert!(xl <= xr);
    let lower: Vec<Constraint> = lower.iter().copied().collect();
    let upper: Vec<Constraint> = upper.iter().copied().collect();
    tracing::trace!(
        lower = lower.len(),
        upper = upper.len(),
        xl,
        xr,
        "closed form"
    );
    match (lower.as_slice(), upper.as_slice()) {
        // Upper bounds alone are met by any point low enough.
        ([], _) => Solution::Unbounded,
        ([g], []) => lowest_on(g, xl, xr),
        ([g1, g2], []) => two_lower(g1, g2, xl, xr, cfg),
        ([g], [h]) => lower_under_upper(g, h, xl, xr, cfg),
        (l, u) => unreachable!(
            "closed form needs at most {SMALL} constraints, got {} lower and {} upper",
            l.len(),
            u.len()
        ),
    }
}

/// Minimum of one lower bound over `[lo, hi]`.
fn lowest_on(g: &Constraint, lo: f64, hi: f64) -> Solution {
    let s = g.slope();
    if s > 0.0 {
        if lo.is_finite() {
            Solution::optimal(g.y_at(lo))
        } else {
            Solution::Unbounded
        }
    } else if s < 0.0 {
        if hi.is_finite() {
            Solution::optimal(g.y_at(hi))
        } else {
            Solution::Unbounded
        }
    } else {
        Solution::optimal(g.y_intercept())
    }
}

/// Minimum of `max(g1, g2)` over `[xl, xr]`.
fn two_lower(g1: &Constraint, g2: &Constraint, xl: f64, xr: f64, cfg: SolverCfg) -> Solution {
    // p has the larger slope.
    let (p, q) = if g1.slope() >= g2.slope() {
        (g1, g2)
    } else {
        (g2, g1)
    };
    let Some(rx) = p.intersect_x(q, cfg.eps_det) else {
        let higher = if Side::Lower.parallel_drops_first(p, q) {
            q
        } else {
            p
        };
        return lowest_on(higher, xl, xr);
    };
    let envelope = |x: f64| p.y_at(x).max(q.y_at(x));
    if q.slope() > 0.0 {
        if xl.is_finite() {
            Solution::optimal(envelope(xl))
        } else {
            Solution::Unbounded
        }
    } else if p.slope() < 0.0 {
        if xr.is_finite() {
            Solution::optimal(envelope(xr))
        } else {
            Solution::Unbounded
        }
    } else {
        Solution::optimal(envelope(rx.max(xl).min(xr)))
    }
}

/// Minimum of lower bound `g` over the part of `[xl, xr]` where it stays under `h`.
fn lower_under_upper(g: &Constraint, h: &Constraint, xl: f64, xr: f64, cfg: SolverCfg) -> Solution {
    let Some(rx) = g.intersect_x(h, cfg.eps_det) else {
        let (yg, yh) = (g.y_intercept(), h.y_intercept());
        let band = cfg.eps_tight * yg.abs().max(yh.abs()).max(1.0);
        return if yg <= yh + band {
            lowest_on(g, xl, xr)
        } else {
            Solution::Infeasible
        };
    };
    // g - h grows with x when g is steeper, so g <= h left of the crossing.
    let (lo, hi) = if g.slope() > h.slope() {
        (xl, xr.min(rx))
    } else {
        (xl.max(rx), xr)
    };
    if lo > hi {
        let band = cfg.eps_tight * lo.abs().max(hi.abs()).max(1.0);
        if lo - hi > band {
            return Solution::Infeasible;
        }
        return lowest_on(g, lo, lo);
    }
    lowest_on(g, lo, hi)
}
