//! The prune-and-search loop.
//!
//! One pass:
//! 1. pair live constraints inside each family; drop pairs' redundant members
//!    right away when they are parallel or cross outside `[xl, xr]`;
//! 2. probe the median crossing `xm` of the remaining pairs;
//! 3. locate the optimum relative to `xm` from the bounds active there;
//! 4. drop one member of every pair whose crossing falls outside the retained
//!    half and shrink the interval to that half.

use crate::select::upper_median;

use super::family::{Family, Side, Toward};
use super::reduced::solve_reduced;
use super::trace::PassRecord;
use super::types::Solution;
use super::{Solver, SMALL};

/// Position of the optimum relative to the probe `xm`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptPosition {
    /// No feasible point on either side of `xm`.
    NoSolution,
    Left,
    Right,
    /// `xm` itself is optimal.
    Equal,
}

/// Crossing of a pair `(i, j)` from one family, inside the current interval.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    x: f64,
    side: Side,
    i: usize,
    j: usize,
}

/// `[min, max]` of slopes over tight constraints; empty while `min > max`.
#[derive(Clone, Copy, Debug)]
struct SlopeRange {
    min: f64,
    max: f64,
}

impl SlopeRange {
    const EMPTY: SlopeRange = SlopeRange {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    #[inline]
    fn include(&mut self, s: f64) {
        self.min = self.min.min(s);
        self.max = self.max.max(s);
    }
}

/// Bounds active at the probe point.
#[derive(Clone, Copy, Debug)]
struct Probe {
    /// Highest lower bound at `xm`.
    alpha: f64,
    /// Lowest upper bound at `xm` (`+∞` without upper constraints).
    beta: f64,
    /// Slopes of lower constraints tight at `(xm, alpha)`.
    s: SlopeRange,
    /// Slopes of upper constraints tight at `(xm, beta)`.
    t: SlopeRange,
    eps: f64,
}

impl Probe {
    fn position(&self) -> OptPosition {
        let scale = self.alpha.abs().max(self.beta.abs()).max(1.0);
        let feasible = !self.beta.is_finite() || self.alpha <= self.beta + self.eps * scale;
        if feasible {
            // Lower envelope still falling to the right / rising to the left.
            if self.s.max < 0.0 {
                OptPosition::Right
            } else if self.s.min > 0.0 {
                OptPosition::Left
            } else {
                OptPosition::Equal
            }
        } else if self.s.max < self.t.min {
            // The gap alpha - beta closes only to the right.
            OptPosition::Right
        } else if self.s.min > self.t.max {
            OptPosition::Left
        } else {
            OptPosition::NoSolution
        }
    }
}

impl Solver {
    /// Prune until the closed form applies, then finish there.
    pub(crate) fn run(&mut self) -> Solution {
        if let Some(trace) = self.trace.as_mut() {
            trace.initial = (self.upper.len(), self.lower.len());
        }
        if self.xr < self.xl {
            tracing::debug!(xl = self.xl, xr = self.xr, "empty x-interval after partition");
            return Solution::Infeasible;
        }

        let mut pass = 0usize;
        while !self.lower.is_empty() && self.upper.len() + self.lower.len() > SMALL {
            pass += 1;
            let mut candidates = Vec::new();
            collect(&mut self.upper, self.xl, self.xr, self.cfg.eps_det, &mut candidates);
            collect(&mut self.lower, self.xl, self.xr, self.cfg.eps_det, &mut candidates);

            if candidates.is_empty() {
                tracing::debug!(
                    pass,
                    upper = self.upper.len(),
                    lower = self.lower.len(),
                    "every pair pruned without probing"
                );
                self.end_pass(0, None, None);
                continue;
            }

            let xm = upper_median(candidates.iter().map(|c| c.x).collect());
            let probe = self.probe(xm);
            let position = probe.position();
            tracing::debug!(
                pass,
                upper = self.upper.len(),
                lower = self.lower.len(),
                candidates = candidates.len(),
                xl = self.xl,
                xr = self.xr,
                xm,
                alpha = probe.alpha,
                beta = probe.beta,
                ?position,
                "prune pass"
            );

            match position {
                OptPosition::NoSolution => {
                    self.end_pass(candidates.len(), Some(xm), Some(position));
                    return Solution::Infeasible;
                }
                OptPosition::Equal => {
                    self.end_pass(candidates.len(), Some(xm), Some(position));
                    return Solution::optimal(probe.alpha);
                }
                OptPosition::Left => {
                    self.discard(&candidates, xm, Toward::Left);
                    self.xr = xm;
                }
                OptPosition::Right => {
                    self.discard(&candidates, xm, Toward::Right);
                    self.xl = xm;
                }
            }
            self.end_pass(candidates.len(), Some(xm), Some(position));
            if self.xr < self.xl {
                return Solution::Infeasible;
            }
        }

        if let Some(trace) = self.trace.as_mut() {
            trace.reduced = Some((self.upper.len(), self.lower.len()));
        }
        solve_reduced(&self.lower, &self.upper, self.xl, self.xr, self.cfg)
    }

    fn probe(&self, xm: f64) -> Probe {
        let alpha = self
            .lower
            .iter()
            .map(|h| h.y_at(xm))
            .fold(f64::NEG_INFINITY, f64::max);
        let beta = self
            .upper
            .iter()
            .map(|h| h.y_at(xm))
            .fold(f64::INFINITY, f64::min);
        let eps = self.cfg.eps_tight;
        Probe {
            alpha,
            beta,
            s: tight_slopes(&self.lower, xm, alpha, eps),
            t: tight_slopes(&self.upper, xm, beta, eps),
            eps,
        }
    }

    /// Drop the redundant member of every pair crossing outside the retained half.
    fn discard(&mut self, candidates: &[Candidate], xm: f64, toward: Toward) {
        for c in candidates {
            let outside = match toward {
                Toward::Left => c.x >= xm,
                Toward::Right => c.x <= xm,
            };
            if !outside {
                continue;
            }
            let family = match c.side {
                Side::Upper => &mut self.upper,
                Side::Lower => &mut self.lower,
            };
            family.remove_by_slope(c.i, c.j, c.side.drops_larger_slope(toward));
        }
    }

    fn end_pass(&mut self, candidates: usize, xm: Option<f64>, position: Option<OptPosition>) {
        self.upper.compact();
        self.lower.compact();
        if let Some(trace) = self.trace.as_mut() {
            trace.passes.push(PassRecord {
                xl: self.xl,
                xr: self.xr,
                upper: self.upper.len(),
                lower: self.lower.len(),
                candidates,
                xm,
                position,
            });
        }
    }
}

/// Pair up the family; prune pairs decided by the interval alone, collect the rest.
fn collect(family: &mut Family, xl: f64, xr: f64, eps_det: f64, out: &mut Vec<Candidate>) {
    let side = family.side();
    for (i, j) in family.pairs() {
        let (p, q) = (*family.get(i), *family.get(j));
        let Some(rx) = p.intersect_x(&q, eps_det) else {
            if side.parallel_drops_first(&p, &q) {
                family.remove(i);
            } else {
                family.remove(j);
            }
            continue;
        };
        if rx < xl {
            family.remove_by_slope(i, j, side.drops_larger_slope(Toward::Right));
        } else if rx > xr {
            family.remove_by_slope(i, j, side.drops_larger_slope(Toward::Left));
        } else {
            out.push(Candidate { x: rx, side, i, j });
        }
    }
}

fn tight_slopes(family: &Family, xm: f64, level: f64, eps: f64) -> SlopeRange {
    let mut range = SlopeRange::EMPTY;
    if !level.is_finite() {
        return range;
    }
    for h in family.iter() {
        // Round-off in y_at scales with the terms it cancels, not with its result.
        let terms = (h.c().abs() + (h.a() * xm).abs()) / h.b().abs();
        let band = eps * terms.max(level.abs()).max(1.0);
        if (h.y_at(xm) - level).abs() <= band {
            range.include(h.slope());
        }
    }
    range
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(alpha: f64, beta: f64, s: (f64, f64), t: (f64, f64)) -> Probe {
        Probe {
            alpha,
            beta,
            s: SlopeRange { min: s.0, max: s.1 },
            t: SlopeRange { min: t.0, max: t.1 },
            eps: 1e-9,
        }
    }

    #[test]
    fn feasible_probe_follows_lower_envelope() {
        assert_eq!(probe(0.0, 1.0, (-2.0, -1.0), (0.0, 0.0)).position(), OptPosition::Right);
        assert_eq!(probe(0.0, 1.0, (1.0, 2.0), (0.0, 0.0)).position(), OptPosition::Left);
        assert_eq!(probe(0.0, 1.0, (-1.0, 1.0), (0.0, 0.0)).position(), OptPosition::Equal);
        assert_eq!(probe(0.0, 1.0, (0.0, 0.0), (0.0, 0.0)).position(), OptPosition::Equal);
        let open_top = Probe {
            t: SlopeRange::EMPTY,
            ..probe(3.0, f64::INFINITY, (-1.0, -1.0), (0.0, 0.0))
        };
        assert_eq!(open_top.position(), OptPosition::Right);
    }

    #[test]
    fn infeasible_probe_moves_toward_the_gap() {
        // Lower envelope rises slower than the upper one to the right.
        assert_eq!(probe(2.0, 1.0, (0.0, 1.0), (2.0, 3.0)).position(), OptPosition::Right);
        assert_eq!(probe(2.0, 1.0, (2.0, 3.0), (0.0, 1.0)).position(), OptPosition::Left);
        assert_eq!(probe(2.0, 1.0, (0.0, 2.0), (1.0, 3.0)).position(), OptPosition::NoSolution);
    }

    #[test]
    fn tight_band_tolerates_round_off() {
        let mut f = Family::new(Side::Lower);
        f.push(crate::Constraint::new(1.0, -1.0, 0.0)); // y >= x
        f.push(crate::Constraint::new(-1.0, -1.0, 0.0)); // y >= -x
        f.push(crate::Constraint::new(0.0, -1.0, 5.0)); // y >= -5
        let r = tight_slopes(&f, 0.0, 1e-12, 1e-9);
        assert_eq!((r.min, r.max), (-1.0, 1.0));
    }
}
