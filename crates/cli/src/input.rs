//! Input adapters: whitespace text (`n` then `n` triples) and tabular files.

use anyhow::{anyhow, bail, Context, Result};
use lp2d::Constraint;
use polars::prelude::*;
use std::io::Read;
use std::path::Path;

/// Read constraints from `path`, or from stdin when `path` is `None`.
///
/// `.csv` and `.parquet` files must carry numeric columns `a`, `b`, `c`;
/// anything else is parsed as the text format.
pub fn read_constraints(path: Option<&Path>) -> Result<Vec<Constraint>> {
    match path {
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            parse_text(&text)
        }
        Some(p) => match p.extension().and_then(|e| e.to_str()) {
            Some("csv") => {
                let lf = LazyCsvReader::new(p)
                    .with_infer_schema_length(Some(100))
                    .finish()
                    .with_context(|| format!("opening {}", p.display()))?;
                from_frame(lf)
            }
            Some("parquet") => {
                let lf = LazyFrame::scan_parquet(p, ScanArgsParquet::default())
                    .with_context(|| format!("opening {}", p.display()))?;
                from_frame(lf)
            }
            _ => {
                let text = std::fs::read_to_string(p)
                    .with_context(|| format!("reading {}", p.display()))?;
                parse_text(&text)
            }
        },
    }
}

/// Parse `n` followed by `n` whitespace-separated `(a, b, c)` triples.
pub fn parse_text(text: &str) -> Result<Vec<Constraint>> {
    let mut tokens = text.split_whitespace();
    let n: usize = tokens
        .next()
        .ok_or_else(|| anyhow!("empty input: expected a constraint count"))?
        .parse()
        .context("constraint count must be a non-negative integer")?;

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let mut coef = [0.0f64; 3];
        for (slot, name) in coef.iter_mut().zip(["a", "b", "c"]) {
            let tok = tokens
                .next()
                .ok_or_else(|| anyhow!("input ended inside constraint #{i} (missing {name})"))?;
            *slot = tok
                .parse()
                .with_context(|| format!("constraint #{i}: {name} = {tok:?} is not a number"))?;
        }
        out.push(Constraint::from(coef));
    }
    let extra = tokens.count();
    if extra > 0 {
        tracing::warn!(extra, "ignoring trailing tokens after {n} constraints");
    }
    Ok(out)
}

fn from_frame(lf: LazyFrame) -> Result<Vec<Constraint>> {
    let df = lf
        .select([
            col("a").cast(DataType::Float64),
            col("b").cast(DataType::Float64),
            col("c").cast(DataType::Float64),
        ])
        .collect()
        .context("selecting columns a, b, c")?;
    tracing::info!(rows = df.height(), cols = df.width(), "input_table_shape");

    let a = df.column("a")?.f64()?;
    let b = df.column("b")?.f64()?;
    let c = df.column("c")?.f64()?;
    let mut out = Vec::with_capacity(df.height());
    for (i, ((a, b), c)) in a.into_iter().zip(b).zip(c).enumerate() {
        match (a, b, c) {
            (Some(a), Some(b), Some(c)) => out.push(Constraint::new(a, b, c)),
            _ => bail!("row {i}: missing value in a, b or c"),
        }
    }
    Ok(out)
}
