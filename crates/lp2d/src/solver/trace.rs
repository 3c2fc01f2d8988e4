//! Per-pass records of the pruning loop.

use super::prune::OptPosition;

/// State observed at the end of one pruning pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassRecord {
    /// Interval after the pass.
    pub xl: f64,
    pub xr: f64,
    /// Family sizes after the pass.
    pub upper: usize,
    pub lower: usize,
    /// Crossings that landed inside the interval.
    pub candidates: usize,
    /// Probe point; `None` when every pair was pruned without probing.
    pub xm: Option<f64>,
    pub position: Option<OptPosition>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trace {
    /// Family sizes right after partitioning (upper, lower).
    pub initial: (usize, usize),
    pub passes: Vec<PassRecord>,
    /// Family sizes handed to the closed form, if it was reached.
    pub reduced: Option<(usize, usize)>,
}
