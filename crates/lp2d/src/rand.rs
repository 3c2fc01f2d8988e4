//! Random 2D LP instances with replay tokens.
//!
//! Purpose
//! - Reproducible constraint sets for benches, property checks, and the CLI
//!   `gen` command. Integer coefficients keep instances printable in the
//!   plain `n` + triples input format without loss.
//!
//! Model
//! - Each constraint draws `a, b` uniformly from `[-coef_max, coef_max]`
//!   (rejecting `a = b = 0`). With `feasible = true`, `c` is chosen so a hidden
//!   integer point satisfies the constraint with slack in `[0, slack_max]`;
//!   otherwise `c` is drawn from `[-c_max, c_max]`.
//! - `boxed = true` appends `|x| <= box_half` and `|y| <= box_half`, which makes
//!   every feasible instance bounded.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::solver::Constraint;

/// Instance sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct InstanceCfg {
    /// Number of random (non-box) constraints.
    pub n: usize,
    pub coef_max: i64,
    pub c_max: i64,
    pub feasible: bool,
    /// Upper end of the slack added over the hidden point.
    pub slack_max: i64,
    pub boxed: bool,
    pub box_half: i64,
}

impl Default for InstanceCfg {
    fn default() -> Self {
        Self {
            n: 16,
            coef_max: 10,
            c_max: 50,
            feasible: true,
            slack_max: 20,
            boxed: false,
            box_half: 1000,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw one instance. The same `(cfg, tok)` always yields the same constraints.
pub fn draw_instance(cfg: InstanceCfg, tok: ReplayToken) -> Vec<Constraint> {
    let mut rng = tok.to_std_rng();
    let k = cfg.coef_max.max(1);
    let hidden_range = (cfg.c_max.max(1) / k).max(1);
    let (px, py) = (
        rng.gen_range(-hidden_range..=hidden_range),
        rng.gen_range(-hidden_range..=hidden_range),
    );

    let mut out = Vec::with_capacity(cfg.n + if cfg.boxed { 4 } else { 0 });
    while out.len() < cfg.n {
        let a = rng.gen_range(-k..=k);
        let b = rng.gen_range(-k..=k);
        if a == 0 && b == 0 {
            continue;
        }
        let c = if cfg.feasible {
            a * px + b * py + rng.gen_range(0..=cfg.slack_max.max(0))
        } else {
            rng.gen_range(-cfg.c_max..=cfg.c_max)
        };
        out.push(Constraint::new(a as f64, b as f64, c as f64));
    }
    if cfg.boxed {
        let m = cfg.box_half.max(1) as f64;
        out.push(Constraint::new(1.0, 0.0, m));
        out.push(Constraint::new(-1.0, 0.0, m));
        out.push(Constraint::new(0.0, 1.0, m));
        out.push(Constraint::new(0.0, -1.0, m));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    #[test]
    fn reproducible_draw() {
        let cfg = InstanceCfg::default();
        let tok = ReplayToken { seed: 42, index: 7 };
        let a = draw_instance(cfg, tok);
        let b = draw_instance(cfg, tok);
        assert_eq!(a, b);
        let c = draw_instance(cfg, ReplayToken { seed: 42, index: 8 });
        assert_ne!(a, c);
    }

    #[test]
    fn box_and_no_degenerate_rows() {
        let cfg = InstanceCfg {
            n: 50,
            boxed: true,
            ..InstanceCfg::default()
        };
        let hs = draw_instance(cfg, ReplayToken { seed: 3, index: 0 });
        assert_eq!(hs.len(), 54);
        assert!(hs.iter().all(|h| h.a() != 0.0 || h.b() != 0.0));
        assert_eq!(hs[53], Constraint::new(0.0, -1.0, 1000.0));
    }

    #[test]
    fn feasible_draws_share_a_point() {
        let cfg = InstanceCfg {
            n: 40,
            ..InstanceCfg::default()
        };
        let hs = draw_instance(cfg, ReplayToken { seed: 9, index: 1 });
        // Some integer point in the hidden range satisfies everything.
        let r = cfg.c_max / cfg.coef_max;
        let found = (-r..=r).any(|x| {
            (-r..=r).any(|y| {
                let p = Vector2::new(x as f64, y as f64);
                hs.iter().all(|h| h.satisfies_eps(p, 0.0))
            })
        });
        assert!(found);
    }
}
