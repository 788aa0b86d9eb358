#![deny(unsafe_code)]
//! Core types and traits shared by the flowfield simulations.
//!
//! Provides the `Engine` trait and `AgentView`, the toroidal `Plane` and
//! trail `Field`, the `NoiseSource` trait with `noise`-crate implementations, the
//! `Xorshift64` PRNG, the reproducible `Seed` record, and parameter helpers.

pub mod engine;
pub mod error;
pub mod field;
pub mod noise_source;
pub mod params;
pub mod plane;
pub mod prng;
pub mod seed;

pub use engine::{AgentView, Engine};
pub use error::EngineError;
pub use field::Field;
pub use noise_source::NoiseSource;
pub use plane::Plane;
pub use prng::Xorshift64;
pub use seed::Seed;

/// Re-exported so downstream crates agree on one vector type.
pub use glam::DVec2;
