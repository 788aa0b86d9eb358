#![deny(unsafe_code)]
//! Random-walk engines.
//!
//! Four classic walkers on the same toroidal plane as the flow engine:
//!
//! - **uniform**: each tick adds a displacement drawn uniformly from
//!   `[-step, step]²`.
//! - **biased**: one axis-aligned move per tick, right 40% of the time and
//!   left, down, up 20% each.
//! - **noise**: position is read from a noise source at two time offsets
//!   that advance by [`NOISE_TIME_STEP`] per tick, giving a smooth drift.
//! - **gaussian**: every tick places the walker at a fresh normally
//!   distributed x on the horizontal center line.
//!
//! All randomness comes from one seeded [`Xorshift64`], so runs replay.

use flowfield_core::error::EngineError;
use flowfield_core::noise_source::{noise_from_name, NoiseSource, NOISE_NAMES};
use flowfield_core::params::{param_count, param_f64, param_string, param_u32};
use flowfield_core::prng::fold_seed;
use flowfield_core::{AgentView, DVec2, Engine, Field, Plane, Xorshift64};
use serde_json::{json, Value};

/// Noise time advanced per tick by the noise walker.
pub const NOISE_TIME_STEP: f64 = 0.01;
/// Starting y time offset, far enough from x that the two axes decorrelate.
const NOISE_Y_OFFSET: f64 = 10_000.0;
/// Spacing between walkers' noise time offsets.
const NOISE_WALKER_SPACING: f64 = 1_000.0;
/// Gaussian spread as a fraction of plane width (60 px on a 640 px canvas).
const GAUSSIAN_SPREAD: f64 = 60.0 / 640.0;

const DEFAULT_WALKER_COUNT: usize = 1;
const DEFAULT_STEP_SIZE: f64 = 1.0;
const DEFAULT_TRAIL_DEPOSIT: f64 = 0.1;
const DEFAULT_KIND: &str = "uniform";
const DEFAULT_NOISE: &str = "octave";

/// Names accepted by [`WalkKind::from_name`].
pub const WALK_KINDS: &[&str] = &["uniform", "biased", "noise", "gaussian"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkKind {
    Uniform,
    Biased,
    Noise,
    Gaussian,
}

impl WalkKind {
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "uniform" => Ok(WalkKind::Uniform),
            "biased" => Ok(WalkKind::Biased),
            "noise" => Ok(WalkKind::Noise),
            "gaussian" => Ok(WalkKind::Gaussian),
            other => Err(EngineError::UnknownOption {
                name: "walk kind".into(),
                value: other.to_string(),
                expected: WALK_KINDS.join(", "),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WalkKind::Uniform => "uniform",
            WalkKind::Biased => "biased",
            WalkKind::Noise => "noise",
            WalkKind::Gaussian => "gaussian",
        }
    }
}

/// One of the four unit moves of the biased walker, picked from a uniform
/// sample `r` in [0, 1).
pub fn biased_move(r: f64) -> DVec2 {
    if r < 0.4 {
        DVec2::X
    } else if r < 0.6 {
        DVec2::NEG_X
    } else if r < 0.8 {
        DVec2::Y
    } else {
        DVec2::NEG_Y
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalkerConfig {
    pub kind: WalkKind,
    pub width: f64,
    pub height: f64,
    pub walker_count: usize,
    /// Displacement scale for the uniform and biased walkers.
    pub step_size: f64,
    pub trail_deposit: f64,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            kind: WalkKind::Uniform,
            width: 640.0,
            height: 240.0,
            walker_count: DEFAULT_WALKER_COUNT,
            step_size: DEFAULT_STEP_SIZE,
            trail_deposit: DEFAULT_TRAIL_DEPOSIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Walker {
    position: DVec2,
    last_step: DVec2,
    /// Noise time offsets (x, y); only the noise walker advances them.
    time: DVec2,
}

/// Random-walk driver.
pub struct WalkerSim {
    config: WalkerConfig,
    plane: Plane,
    walkers: Vec<Walker>,
    noise: Box<dyn NoiseSource>,
    noise_name: String,
    noise_seed: u32,
    rng: Xorshift64,
    trail: Field,
}

impl WalkerSim {
    /// Creates walkers at the plane center.
    ///
    /// Returns `EngineError::InvalidDimensions` for a bad plane.
    pub fn new(
        config: WalkerConfig,
        noise: Box<dyn NoiseSource>,
        rng: Xorshift64,
    ) -> Result<Self, EngineError> {
        let plane = Plane::new(config.width, config.height)?;
        let trail = Field::for_plane(plane.width(), plane.height())?;
        let center = DVec2::new(plane.width() * 0.5, plane.height() * 0.5);
        let walkers = (0..config.walker_count)
            .map(|i| {
                let offset = i as f64 * NOISE_WALKER_SPACING;
                Walker {
                    position: center,
                    last_step: DVec2::ZERO,
                    time: DVec2::new(offset, NOISE_Y_OFFSET + offset),
                }
            })
            .collect();
        tracing::debug!(
            kind = config.kind.name(),
            walkers = config.walker_count,
            "walker simulation initialized"
        );
        Ok(Self {
            config,
            plane,
            walkers,
            noise,
            noise_name: "custom".into(),
            noise_seed: 0,
            rng,
            trail,
        })
    }

    /// Builds from CLI/registry JSON params.
    pub fn from_json(
        width: usize,
        height: usize,
        seed: u64,
        params: &Value,
    ) -> Result<Self, EngineError> {
        let kind = WalkKind::from_name(&param_string(params, "kind", DEFAULT_KIND))?;
        let config = WalkerConfig {
            kind,
            width: width as f64,
            height: height as f64,
            walker_count: param_count(params, "walker_count", DEFAULT_WALKER_COUNT)?,
            step_size: param_f64(params, "step_size", DEFAULT_STEP_SIZE).abs(),
            trail_deposit: param_f64(params, "trail_deposit", DEFAULT_TRAIL_DEPOSIT)
                .clamp(0.0, 1.0),
        };
        let noise_name = param_string(params, "noise", DEFAULT_NOISE);
        let noise_seed = param_u32(params, "noise_seed", fold_seed(seed));
        let noise = noise_from_name(&noise_name, noise_seed)?;
        let mut sim = Self::new(config, noise, Xorshift64::new(seed))?;
        sim.noise_name = noise_name;
        sim.noise_seed = noise_seed;
        Ok(sim)
    }

    pub fn kind(&self) -> WalkKind {
        self.config.kind
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    pub fn positions(&self) -> Vec<DVec2> {
        self.walkers.iter().map(|w| w.position).collect()
    }

    /// Moves every walker once and marks the trail.
    pub fn tick(&mut self) {
        let step = self.config.step_size;
        let (w, h) = (self.plane.width(), self.plane.height());
        for walker in &mut self.walkers {
            let next = match self.config.kind {
                WalkKind::Uniform => {
                    let dx = self.rng.next_range(-step, step);
                    let dy = self.rng.next_range(-step, step);
                    walker.position + DVec2::new(dx, dy)
                }
                WalkKind::Biased => walker.position + biased_move(self.rng.next_f64()) * step,
                WalkKind::Noise => {
                    let x = self.noise.sample(walker.time.x, 0.0) * w;
                    let y = self.noise.sample(walker.time.y, 0.0) * h;
                    walker.time += DVec2::splat(NOISE_TIME_STEP);
                    DVec2::new(x, y)
                }
                WalkKind::Gaussian => {
                    let x = self.rng.next_gaussian(w * 0.5, w * GAUSSIAN_SPREAD);
                    DVec2::new(x, h * 0.5)
                }
            };
            walker.last_step = match self.config.kind {
                WalkKind::Gaussian => DVec2::ZERO,
                _ => next - walker.position,
            };
            walker.position = self.plane.wrap(next);
            self.trail.deposit(
                walker.position.x,
                walker.position.y,
                self.config.trail_deposit,
            );
        }
    }
}

impl Engine for WalkerSim {
    fn step(&mut self) -> Result<(), EngineError> {
        self.tick();
        Ok(())
    }

    fn field(&self) -> &Field {
        &self.trail
    }

    fn params(&self) -> Value {
        json!({
            "kind": self.config.kind.name(),
            "walker_count": self.walkers.len(),
            "step_size": self.config.step_size,
            "trail_deposit": self.config.trail_deposit,
            "noise": self.noise_name,
            "noise_seed": self.noise_seed,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "kind": {
                "type": "string",
                "default": DEFAULT_KIND,
                "options": WALK_KINDS,
                "description": "Walk rule: uniform, biased, noise or gaussian"
            },
            "walker_count": {
                "type": "integer",
                "default": DEFAULT_WALKER_COUNT,
                "min": 0,
                "max": 10000,
                "description": "Number of independent walkers"
            },
            "step_size": {
                "type": "number",
                "default": DEFAULT_STEP_SIZE,
                "min": 0.0,
                "max": 50.0,
                "description": "Displacement scale for uniform and biased walks"
            },
            "trail_deposit": {
                "type": "number",
                "default": DEFAULT_TRAIL_DEPOSIT,
                "min": 0.0,
                "max": 1.0,
                "description": "Trail intensity left per visit"
            },
            "noise": {
                "type": "string",
                "default": DEFAULT_NOISE,
                "options": NOISE_NAMES,
                "description": "Noise source driving the noise walk"
            },
            "noise_seed": {
                "type": "integer",
                "default": "derived from seed",
                "description": "Seed for the noise source"
            }
        })
    }

    fn agents(&self) -> Vec<AgentView> {
        self.walkers
            .iter()
            .map(|w| AgentView {
                position: w.position,
                heading: w.last_step.normalize_or_zero(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowfield_core::noise_source::OctaveNoise;

    fn walker_sim(kind: WalkKind, seed: u64) -> WalkerSim {
        let config = WalkerConfig {
            kind,
            walker_count: 4,
            ..WalkerConfig::default()
        };
        WalkerSim::new(
            config,
            Box::new(OctaveNoise::new(seed as u32, 4, 0.5)),
            Xorshift64::new(seed),
        )
        .unwrap()
    }

    fn position_bits(sim: &WalkerSim) -> Vec<(u64, u64)> {
        sim.positions()
            .iter()
            .map(|p| (p.x.to_bits(), p.y.to_bits()))
            .collect()
    }

    #[test]
    fn kind_names_round_trip() {
        for name in WALK_KINDS {
            assert_eq!(WalkKind::from_name(name).unwrap().name(), *name);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = WalkKind::from_name("levy").unwrap_err();
        assert!(matches!(err, EngineError::UnknownOption { .. }));
    }

    #[test]
    fn biased_move_thresholds() {
        assert_eq!(biased_move(0.0), DVec2::X);
        assert_eq!(biased_move(0.399), DVec2::X);
        assert_eq!(biased_move(0.4), DVec2::NEG_X);
        assert_eq!(biased_move(0.6), DVec2::Y);
        assert_eq!(biased_move(0.8), DVec2::NEG_Y);
        assert_eq!(biased_move(0.999), DVec2::NEG_Y);
    }

    #[test]
    fn walkers_start_at_center() {
        let sim = walker_sim(WalkKind::Uniform, 1);
        assert!(sim
            .positions()
            .iter()
            .all(|&p| p == DVec2::new(320.0, 120.0)));
    }

    #[test]
    fn uniform_step_is_bounded() {
        let mut sim = walker_sim(WalkKind::Uniform, 5);
        for _ in 0..100 {
            let before = sim.positions();
            sim.tick();
            for (a, b) in before.iter().zip(sim.positions()) {
                let d = b - *a;
                // Wrap can only add a multiple of the plane extent.
                let dx = d.x.abs().min((d.x.abs() - 640.0).abs());
                let dy = d.y.abs().min((d.y.abs() - 240.0).abs());
                assert!(dx <= 1.0 + 1e-9 && dy <= 1.0 + 1e-9, "step {d}");
            }
        }
    }

    #[test]
    fn biased_walk_drifts_right() {
        let config = WalkerConfig {
            kind: WalkKind::Biased,
            walker_count: 1,
            width: 3_000.0,
            height: 600.0,
            ..WalkerConfig::default()
        };
        let mut sim =
            WalkerSim::new(config, Box::new(|_x: f64, _y: f64| 0.5), Xorshift64::new(77)).unwrap();
        let start = sim.positions()[0];
        for _ in 0..5_000 {
            sim.tick();
        }
        let drift = sim.positions()[0] - start;
        // Expected +0.2 per tick in x, 0 in y.
        assert!(drift.x > 700.0, "x drift {}", drift.x);
        assert!(drift.y.abs() < 250.0, "y drift {}", drift.y);
    }

    #[test]
    fn biased_walk_moves_one_unit_per_tick() {
        let mut sim = walker_sim(WalkKind::Biased, 9);
        for _ in 0..50 {
            sim.tick();
            for a in sim.agents() {
                assert!((a.heading.length() - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn noise_walk_is_smooth() {
        let mut sim = walker_sim(WalkKind::Noise, 3);
        sim.tick();
        for _ in 0..200 {
            let before = sim.positions();
            sim.tick();
            for (a, b) in before.iter().zip(sim.positions()) {
                assert!((b - *a).length() < 40.0, "jump from {a} to {b}");
            }
        }
    }

    #[test]
    fn noise_walk_ignores_rng() {
        let mut a = walker_sim(WalkKind::Noise, 3);
        let config = WalkerConfig {
            kind: WalkKind::Noise,
            walker_count: 4,
            ..WalkerConfig::default()
        };
        let mut b = WalkerSim::new(
            config,
            Box::new(OctaveNoise::new(3, 4, 0.5)),
            Xorshift64::new(12345),
        )
        .unwrap();
        for _ in 0..20 {
            a.tick();
            b.tick();
        }
        assert_eq!(position_bits(&a), position_bits(&b));
    }

    #[test]
    fn gaussian_walk_stays_on_center_line() {
        let mut sim = walker_sim(WalkKind::Gaussian, 4);
        let mut xs = Vec::new();
        for _ in 0..2_000 {
            sim.tick();
            for p in sim.positions() {
                assert_eq!(p.y, 120.0);
                xs.push(p.x);
            }
        }
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        assert!((mean - 320.0).abs() < 5.0, "mean {mean}");
        assert!(sim.agents().iter().all(|a| a.heading == DVec2::ZERO));
    }

    #[test]
    fn same_seed_same_walk() {
        for kind in [WalkKind::Uniform, WalkKind::Biased, WalkKind::Gaussian] {
            let mut a = walker_sim(kind, 21);
            let mut b = walker_sim(kind, 21);
            for _ in 0..100 {
                a.tick();
                b.tick();
            }
            assert_eq!(position_bits(&a), position_bits(&b), "{kind:?}");
        }
    }

    #[test]
    fn trail_accumulates_at_visited_cells() {
        let mut sim = walker_sim(WalkKind::Uniform, 2);
        sim.step().unwrap();
        let p = sim.positions()[0];
        assert!(sim.field().get(p.x.floor() as isize, p.y.floor() as isize) > 0.0);
    }

    #[test]
    fn from_json_reads_kind_and_counts() {
        let params = json!({"kind": "biased", "walker_count": 3, "step_size": 2.0});
        let sim = WalkerSim::from_json(400, 400, 8, &params).unwrap();
        assert_eq!(sim.kind(), WalkKind::Biased);
        assert_eq!(sim.params()["walker_count"], 3);
        assert_eq!(sim.params()["step_size"], 2.0);
    }

    #[test]
    fn from_json_rejects_negative_count_and_unknown_kind() {
        assert!(matches!(
            WalkerSim::from_json(400, 400, 8, &json!({"walker_count": -2})).err(),
            Some(EngineError::InvalidVehicleCount(-2))
        ));
        assert!(WalkerSim::from_json(400, 400, 8, &json!({"kind": "levy"})).is_err());
    }

    #[test]
    fn default_noise_seed_matches_schema_and_flow_engine() {
        let seed = 0xABCD_0000_0000_0001;
        let sim = WalkerSim::from_json(64, 64, seed, &json!({})).unwrap();
        assert_eq!(sim.params()["noise_seed"], fold_seed(seed));
        assert_eq!(sim.param_schema()["noise_seed"]["default"], "derived from seed");
    }

    #[test]
    fn oversized_plane_is_an_error() {
        let config = WalkerConfig {
            width: 5e9,
            height: 5e8,
            ..WalkerConfig::default()
        };
        let result = WalkerSim::new(
            config,
            Box::new(|_x: f64, _y: f64| 0.5),
            Xorshift64::new(1),
        );
        assert!(matches!(result.err(), Some(EngineError::InvalidDimensions)));
    }

    #[test]
    fn param_schema_covers_every_param() {
        let sim = WalkerSim::from_json(64, 64, 1, &json!({})).unwrap();
        let schema = sim.param_schema();
        for key in sim.params().as_object().unwrap().keys() {
            assert!(schema.get(key).is_some(), "schema missing {key}");
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn kind() -> impl Strategy<Value = WalkKind> {
            prop_oneof![
                Just(WalkKind::Uniform),
                Just(WalkKind::Biased),
                Just(WalkKind::Noise),
                Just(WalkKind::Gaussian),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn walkers_never_leave_the_plane(
                kind in kind(),
                seed: u64,
                w in 10.0_f64..500.0,
                h in 10.0_f64..500.0,
                step in 0.0_f64..40.0,
            ) {
                let config = WalkerConfig {
                    kind,
                    width: w,
                    height: h,
                    walker_count: 3,
                    step_size: step,
                    trail_deposit: 0.2,
                };
                let mut sim = WalkerSim::new(
                    config,
                    Box::new(OctaveNoise::new(seed as u32, 4, 0.5)),
                    Xorshift64::new(seed),
                ).unwrap();
                for _ in 0..50 {
                    sim.tick();
                    for p in sim.positions() {
                        prop_assert!(sim.plane().contains(p), "{p} off {w}x{h}");
                    }
                }
                for &v in sim.field().data() {
                    prop_assert!((0.0..=1.0).contains(&v));
                }
            }
        }
    }
}
