//! Rendering of solve results: plain line or JSON document.

use lp2d::{Constraint, OptPosition, Solution, Trace};
use serde::Serialize;

/// Plain output: rounded optimum, `NA` when infeasible, `-INF` when unbounded.
pub fn render_line(s: Solution, precise: bool) -> String {
    match s {
        Solution::Infeasible => "NA".to_string(),
        Solution::Unbounded => "-INF".to_string(),
        Solution::Optimal(y) if precise => format!("{y}"),
        Solution::Optimal(y) => {
            let r = y.round();
            // Values in (-0.5, 0) round to `-0`; print it as `0`.
            format!("{}", if r == 0.0 { 0.0 } else { r })
        }
    }
}

/// Instance in the text input format: the count, then one `a b c` line per row.
pub fn render_instance(rows: &[Constraint]) -> String {
    let body: String = rows
        .iter()
        .map(|h| format!("{} {} {}\n", h.a(), h.b(), h.c()))
        .collect();
    format!("{}\n{body}", rows.len())
}

#[derive(Debug, Serialize)]
pub struct PassDoc {
    pub xl: f64,
    pub xr: f64,
    pub upper: usize,
    pub lower: usize,
    pub candidates: usize,
    pub xm: Option<f64>,
    pub position: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct TraceDoc {
    pub initial_upper: usize,
    pub initial_lower: usize,
    pub passes: Vec<PassDoc>,
    pub reduced: Option<(usize, usize)>,
}

/// JSON result. Infinite pass bounds serialize as `null`.
#[derive(Debug, Serialize)]
pub struct SolveDoc {
    pub status: &'static str,
    pub value: Option<f64>,
    pub constraints: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<TraceDoc>,
}

impl SolveDoc {
    pub fn new(s: Solution, constraints: usize, trace: Option<&Trace>) -> Self {
        let status = match s {
            Solution::Optimal(_) => "optimal",
            Solution::Infeasible => "infeasible",
            Solution::Unbounded => "unbounded",
        };
        Self {
            status,
            value: s.value(),
            constraints,
            trace: trace.map(TraceDoc::from),
        }
    }
}

impl From<&Trace> for TraceDoc {
    fn from(t: &Trace) -> Self {
        Self {
            initial_upper: t.initial.0,
            initial_lower: t.initial.1,
            passes: t
                .passes
                .iter()
                .map(|p| PassDoc {
                    xl: p.xl,
                    xr: p.xr,
                    upper: p.upper,
                    lower: p.lower,
                    candidates: p.candidates,
                    xm: p.xm,
                    position: p.position.map(position_name),
                })
                .collect(),
            reduced: t.reduced,
        }
    }
}

fn position_name(p: OptPosition) -> &'static str {
    match p {
        OptPosition::NoSolution => "no_solution",
        OptPosition::Left => "left",
        OptPosition::Right => "right",
        OptPosition::Equal => "equal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn plain_lines() {
        assert_eq!(render_line(Solution::Infeasible, false), "NA");
        assert_eq!(render_line(Solution::Unbounded, true), "-INF");
        assert_eq!(render_line(Solution::Optimal(2.5), false), "3");
        assert_eq!(render_line(Solution::Optimal(-2.5), false), "-3");
        assert_eq!(render_line(Solution::Optimal(-0.4), false), "0");
        assert_eq!(render_line(Solution::Optimal(-4.0), false), "-4");
        assert_eq!(render_line(Solution::Optimal(1.25), true), "1.25");
    }

    #[test]
    fn instance_text_parses_back() {
        let rows = vec![Constraint::new(3.0, -2.0, 7.0), Constraint::new(0.0, 1.0, -0.5)];
        let text = render_instance(&rows);
        assert_eq!(text, "2\n3 -2 7\n0 1 -0.5\n");
        assert_eq!(crate::input::parse_text(&text).unwrap(), rows);
        assert_eq!(render_instance(&[]), "0\n");
    }

    #[test]
    fn json_document() {
        let rows = [(1.0, 1.0, 2.0), (-1.0, 1.0, 2.0), (0.0, -1.0, 0.0)]
            .map(lp2d::Constraint::from);
        let (s, trace) = lp2d::solve_traced(&rows, lp2d::SolverCfg::default()).unwrap();
        let doc = SolveDoc::new(s, rows.len(), Some(&trace));
        let v: Value = serde_json::to_value(&doc).unwrap();
        assert_eq!(v["status"], "optimal");
        assert_eq!(v["value"], 0.0);
        assert_eq!(v["constraints"], 3);
        assert_eq!(v["trace"]["initial_upper"], 2);
        assert_eq!(v["trace"]["initial_lower"], 1);

        let bare = serde_json::to_value(SolveDoc::new(Solution::Unbounded, 0, None)).unwrap();
        assert_eq!(bare["status"], "unbounded");
        assert!(bare["value"].is_null());
        assert!(bare.get("trace").is_none());
    }
}
