//! Two-dimensional linear programming by prune-and-search.
//!
//! Minimizes `y` subject to half-plane constraints `a·x + b·y <= c` using
//! Megiddo's deterministic linear-time algorithm.
//!
//! Layout
//! - `select`: worst-case linear k-th order statistic (median of medians).
//! - `solver`: constraint partitioning, the pruning loop, and the closed-form
//!   solve of the residual two-constraint problem.
//! - `rand`: reproducible random instances for benches and experiments.
//!
//! The library installs no tracing subscriber; callers decide where pass-level
//! `debug!` events go.

pub mod rand;
pub mod select;
pub mod solver;

pub use select::{median, select};
pub use solver::{
    solve, solve_traced, solve_with, CfgError, Constraint, Lp2dError, OptPosition, PassRecord,
    Solution, SolverCfg, Trace,
};

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::rand::{draw_instance, InstanceCfg, ReplayToken};
    pub use crate::solver::{solve, solve_with, Constraint, Lp2dError, Solution, SolverCfg};
}
