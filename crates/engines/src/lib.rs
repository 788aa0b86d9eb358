#![deny(unsafe_code)]
//! Engine registry: maps engine names to implementations and writes JSON
//! snapshots of a finished run.
//!
//! This crate sits between `flowfield-core` (which defines the `Engine` trait)
//! and the individual engine crates (`flowfield-steer`, `flowfield-walker`).
//! The CLI depends on it so dispatch logic lives in one place.

pub mod snapshot;

use flowfield_core::error::EngineError;
use flowfield_core::field::Field;
use flowfield_core::{AgentView, Engine};
use flowfield_steer::FlowSim;
use flowfield_walker::WalkerSim;
use serde_json::Value;

/// All available engine names.
const ENGINE_NAMES: &[&str] = &["flow", "walker"];

/// Enumeration of all available simulations.
///
/// Wraps each engine implementation and delegates `Engine` trait methods.
/// Use [`EngineKind::from_name`] for string-based construction.
pub enum EngineKind {
    /// Vehicles steering along a noise-built flow field.
    Flow(FlowSim),
    /// Uniform, biased, noise or gaussian random walkers.
    Walker(WalkerSim),
}

impl EngineKind {
    /// Constructs an engine by name.
    ///
    /// Returns `EngineError::UnknownEngine` if the name is not recognized.
    pub fn from_name(
        name: &str,
        width: usize,
        height: usize,
        seed: u64,
        params: &Value,
    ) -> Result<Self, EngineError> {
        match name {
            "flow" => Ok(EngineKind::Flow(FlowSim::from_json(
                width, height, seed, params,
            )?)),
            "walker" => Ok(EngineKind::Walker(WalkerSim::from_json(
                width, height, seed, params,
            )?)),
            _ => Err(EngineError::UnknownEngine(name.to_string())),
        }
    }

    /// Returns a slice of all recognized engine names.
    pub fn list_engines() -> &'static [&'static str] {
        ENGINE_NAMES
    }
}

impl Engine for EngineKind {
    fn step(&mut self) -> Result<(), EngineError> {
        match self {
            EngineKind::Flow(e) => e.step(),
            EngineKind::Walker(e) => e.step(),
        }
    }

    fn field(&self) -> &Field {
        match self {
            EngineKind::Flow(e) => e.field(),
            EngineKind::Walker(e) => e.field(),
        }
    }

    fn params(&self) -> Value {
        match self {
            EngineKind::Flow(e) => e.params(),
            EngineKind::Walker(e) => e.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            EngineKind::Flow(e) => e.param_schema(),
            EngineKind::Walker(e) => e.param_schema(),
        }
    }

    fn agents(&self) -> Vec<AgentView> {
        match self {
            EngineKind::Flow(e) => e.agents(),
            EngineKind::Walker(e) => e.agents(),
        }
    }

    fn debug_view(&self) -> Option<Value> {
        match self {
            EngineKind::Flow(e) => e.debug_view(),
            EngineKind::Walker(e) => e.debug_view(),
        }
    }
}
