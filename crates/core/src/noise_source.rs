//! Scalar noise sources: deterministic 2D functions with values in `[0, 1)`.
//!
//! A [`NoiseSource`] is the only randomness a flow field sees. The field is
//! built by sampling it once per cell, so any implementation must be pure:
//! identical `(x, y)` always return the identical value.
//!
//! Implementations here wrap the `noise` crate generators and remap their
//! roughly `[-1, 1]` output into the unit interval. Plain closures also
//! implement the trait, which keeps tests free of real noise.

use crate::error::EngineError;
use noise::{NoiseFn, OpenSimplex, Perlin};

/// Largest f64 strictly below 1.0.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Default number of octaves for [`OctaveNoise`].
pub const DEFAULT_OCTAVES: u32 = 4;
/// Default per-octave amplitude falloff for [`OctaveNoise`].
pub const DEFAULT_FALLOFF: f64 = 0.5;

/// Names accepted by [`noise_from_name`].
pub const NOISE_NAMES: &[&str] = &["octave", "perlin", "simplex"];

/// A deterministic 2D scalar function with values in `[0, 1)`.
pub trait NoiseSource: Send + Sync {
    /// Sample the source at `(x, y)`.
    fn sample(&self, x: f64, y: f64) -> f64;
}

impl<F> NoiseSource for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn sample(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

/// Maps a signed noise value into `[0, 1)`.
///
/// NaN maps to the midpoint so a bad sample still yields a usable angle.
pub fn to_unit(v: f64) -> f64 {
    if v.is_nan() {
        return 0.5;
    }
    ((v + 1.0) * 0.5).clamp(0.0, BELOW_ONE)
}

/// Single-octave Perlin noise.
pub struct PerlinNoise {
    noise: Perlin,
}

impl PerlinNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            noise: Perlin::new(seed),
        }
    }
}

impl NoiseSource for PerlinNoise {
    fn sample(&self, x: f64, y: f64) -> f64 {
        to_unit(self.noise.get([x, y]))
    }
}

/// Single-octave OpenSimplex noise.
pub struct SimplexNoise {
    noise: OpenSimplex,
}

impl SimplexNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            noise: OpenSimplex::new(seed),
        }
    }
}

impl NoiseSource for SimplexNoise {
    fn sample(&self, x: f64, y: f64) -> f64 {
        to_unit(self.noise.get([x, y]))
    }
}

/// Layered Perlin noise in the style of creative-coding `noise()` calls:
/// each octave doubles frequency and scales amplitude by `falloff`, and the
/// sum is normalized by total amplitude before remapping.
pub struct OctaveNoise {
    noise: Perlin,
    octaves: u32,
    falloff: f64,
}

impl OctaveNoise {
    /// Creates layered noise. `octaves` is raised to at least 1.
    pub fn new(seed: u32, octaves: u32, falloff: f64) -> Self {
        Self {
            noise: Perlin::new(seed),
            octaves: octaves.max(1),
            falloff,
        }
    }
}

impl NoiseSource for OctaveNoise {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let (sum, norm, _, _) =
            (0..self.octaves).fold((0.0, 0.0, 1.0, 1.0), |(sum, norm, amp, freq), _| {
                (
                    sum + self.noise.get([x * freq, y * freq]) * amp,
                    norm + amp,
                    amp * self.falloff,
                    freq * 2.0,
                )
            });
        if norm.abs() < f64::EPSILON {
            return 0.5;
        }
        to_unit(sum / norm)
    }
}

/// Builds a boxed noise source by name (see [`NOISE_NAMES`]).
pub fn noise_from_name(name: &str, seed: u32) -> Result<Box<dyn NoiseSource>, EngineError> {
    match name {
        "octave" => Ok(Box::new(OctaveNoise::new(
            seed,
            DEFAULT_OCTAVES,
            DEFAULT_FALLOFF,
        ))),
        "perlin" => Ok(Box::new(PerlinNoise::new(seed))),
        "simplex" => Ok(Box::new(SimplexNoise::new(seed))),
        other => Err(EngineError::UnknownOption {
            name: "noise".into(),
            value: other.to_string(),
            expected: NOISE_NAMES.join(", "),
        }),
    }
}
