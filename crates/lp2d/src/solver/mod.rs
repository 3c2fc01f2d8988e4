//! Prune-and-search solver for `min y s.t. a·x + b·y <= c`.
//!
//! Purpose
//! - Split constraints into vertical x-bounds plus upper (`b > 0`) and lower
//!   (`b < 0`) families, then repeatedly probe the median crossing `xm` of
//!   paired constraints, decide on which side of `xm` the optimum lies, and
//!   discard one member of every pair made redundant by that decision.
//! - Each pass drops a constant fraction of the pairs; with linear-time
//!   selection the whole solve is linear in the number of constraints.
//!
//! Flow
//! - `partition` (vertical bounds, families) → `prune` loop → `reduced`
//!   closed form once at most two constraints remain or no lower bound is left.
//!
//! Code cross-refs: `select::upper_median`, `family::Family`, `types::{Constraint, SolverCfg, Solution}`

mod family;
mod partition;
mod prune;
mod reduced;
mod trace;
mod types;

pub use prune::OptPosition;
pub use trace::{PassRecord, Trace};
pub use types::{CfgError, Constraint, Lp2dError, Solution, SolverCfg};

use family::Family;

/// Once this few constraints remain the closed form takes over.
pub(crate) const SMALL: usize = 2;

/// Per-problem solver state; built by `partition`, consumed by `run`.
#[derive(Debug)]
pub(crate) struct Solver {
    cfg: SolverCfg,
    upper: Family,
    lower: Family,
    xl: f64,
    xr: f64,
    trace: Option<Trace>,
}

/// Solve with default tolerances.
///
/// # Errors
///
/// Returns an error if a constraint is degenerate (`a = b = 0`) or non-finite.
pub fn solve(constraints: &[Constraint]) -> Result<Solution, Lp2dError> {
    solve_with(constraints, SolverCfg::default())
}

/// Solve with explicit tolerances.
///
/// # Errors
///
/// Returns an error if a constraint is degenerate (`a = b = 0`) or non-finite.
pub fn solve_with(constraints: &[Constraint], cfg: SolverCfg) -> Result<Solution, Lp2dError> {
    Ok(Solver::partition(constraints, cfg)?.run())
}

/// Solve and return a record of every pruning pass alongside the result.
///
/// # Errors
///
/// Returns an error if a constraint is degenerate (`a = b = 0`) or non-finite.
pub fn solve_traced(
    constraints: &[Constraint],
    cfg: SolverCfg,
) -> Result<(Solution, Trace), Lp2dError> {
    let mut solver = Solver::partition(constraints, cfg)?;
    solver.trace = Some(Trace::default());
    let solution = solver.run();
    Ok((solution, solver.trace.take().unwrap_or_default()))
}
