//! The `Engine` trait shared by every simulation in the workspace.
//!
//! The trait is object-safe so the registry and CLI can hold a `Box<dyn Engine>`
//! and switch simulations by name at runtime.

use crate::error::EngineError;
use crate::field::Field;
use glam::DVec2;
use serde::Serialize;
use serde_json::Value;

/// Diagnostic view of one agent, handed to whatever draws the scene.
///
/// `heading` is a unit vector, or zero for an agent at rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgentView {
    pub position: DVec2,
    pub heading: DVec2,
}

/// A step-based simulation on a toroidal plane.
pub trait Engine {
    /// Advance the simulation by one tick.
    fn step(&mut self) -> Result<(), EngineError>;

    /// Accumulated trail of every agent so far.
    fn field(&self) -> &Field;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all parameters: type, range, default, description.
    fn param_schema(&self) -> Value;

    /// Position and heading of each agent, in a stable order.
    fn agents(&self) -> Vec<AgentView>;

    /// Engine-specific extra diagnostics (e.g. flow field cells).
    ///
    /// `None` by default.
    fn debug_view(&self) -> Option<Value> {
        None
    }
}
