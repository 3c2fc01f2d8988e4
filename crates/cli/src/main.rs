use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use lp2d::rand::{draw_instance, InstanceCfg, ReplayToken};
use lp2d::{solve_traced, solve_with, SolverCfg};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod input;
mod output;
mod provenance;

#[derive(Parser)]
#[command(name = "lp2d")]
#[command(about = "Minimize y subject to half-planes a·x + b·y <= c")]
struct Cmd {
    /// Log verbosity on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Solve one instance and print the optimum, NA or -INF
    Solve {
        /// Text (`n` then triples), `.csv` or `.parquet` with columns a, b, c; stdin if absent
        #[arg(long)]
        input: Option<PathBuf>,
        /// Print a JSON document instead of a single line
        #[arg(long)]
        json: bool,
        /// Print the optimum unrounded
        #[arg(long)]
        precise: bool,
        /// Include per-pass records in the JSON output
        #[arg(long)]
        trace: bool,
        /// Also write the JSON result here, with a provenance sidecar
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = SolverCfg::default().eps_det)]
        eps_det: f64,
        #[arg(long, default_value_t = SolverCfg::default().eps_tight)]
        eps_tight: f64,
    },
    /// Write a random instance in the text format
    Gen {
        #[arg(long)]
        n: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        index: u64,
        #[arg(long, default_value_t = InstanceCfg::default().coef_max)]
        coef_max: i64,
        /// Draw right-hand sides freely instead of around a hidden feasible point
        #[arg(long)]
        infeasible_ok: bool,
        /// Append |x| <= 1000 and |y| <= 1000
        #[arg(long)]
        boxed: bool,
        /// Destination file; stdout if absent
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = match cmd.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();

    match cmd.action {
        Action::Solve {
            input,
            json,
            precise,
            trace,
            out,
            eps_det,
            eps_tight,
        } => {
            let cfg = SolverCfg::new(eps_det, eps_tight)?;
            let opts = SolveOpts {
                json,
                precise,
                trace,
            };
            solve(input.as_deref(), out.as_deref(), cfg, opts)
        }
        Action::Gen {
            n,
            seed,
            index,
            coef_max,
            infeasible_ok,
            boxed,
            out,
        } => {
            let cfg = InstanceCfg {
                n,
                coef_max,
                feasible: !infeasible_ok,
                boxed,
                ..InstanceCfg::default()
            };
            generate(cfg, ReplayToken { seed, index }, out.as_deref())
        }
    }
}

#[derive(Clone, Copy)]
struct SolveOpts {
    json: bool,
    precise: bool,
    trace: bool,
}

fn solve(input: Option<&Path>, out: Option<&Path>, cfg: SolverCfg, opts: SolveOpts) -> Result<()> {
    let rows = input::read_constraints(input)?;
    tracing::info!(n = rows.len(), input = ?input, "solve");

    let (solution, trace) = if opts.trace {
        let (s, t) = solve_traced(&rows, cfg)?;
        (s, Some(t))
    } else {
        (solve_with(&rows, cfg)?, None)
    };
    let doc = output::SolveDoc::new(solution, rows.len(), trace.as_ref());

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        println!("{}", output::render_line(solution, opts.precise));
    }

    if let Some(out) = out {
        write_file(out, &serde_json::to_vec_pretty(&doc)?)?;
        let params = json!({
            "eps_det": cfg.eps_det,
            "eps_tight": cfg.eps_tight,
            "trace": opts.trace,
        });
        let payload = provenance::Payload::new("solve", params).with_input(input);
        let sidecar = provenance::write_sidecar(out, payload)?;
        tracing::info!(out = %out.display(), sidecar = %sidecar.display(), "wrote result");
    }
    Ok(())
}

fn generate(cfg: InstanceCfg, tok: ReplayToken, out: Option<&Path>) -> Result<()> {
    tracing::info!(n = cfg.n, seed = tok.seed, index = tok.index, boxed = cfg.boxed, "gen");
    let rows = draw_instance(cfg, tok);
    let text = output::render_instance(&rows);
    match out {
        Some(path) => write_file(path, text.as_bytes()),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}
