//! JSON snapshot of a finished run.
//!
//! A snapshot embeds the [`Seed`] that produced it, so any snapshot file can
//! be fed back to `flowfield run --seed-file` to replay the run.

use flowfield_core::error::EngineError;
use flowfield_core::{Engine, Seed};
use serde_json::{json, Value};
use std::path::Path;

/// Collects the run record, agents and trail statistics into one JSON value.
///
/// `params` is the engine's resolved parameter set, not the overrides the
/// run was started with. The `field` key is present only when
/// `include_debug` is set and the engine has a debug view.
pub fn build_snapshot(run: &Seed, engine: &dyn Engine, include_debug: bool) -> Value {
    let trail = engine.field();
    let mut snapshot = json!({
        "engine": run.engine,
        "width": run.width,
        "height": run.height,
        "steps": run.steps,
        "seed": run.seed,
        "params": engine.params(),
        "agents": engine.agents(),
        "trail": {
            "mean": trail.mean(),
            "max": trail.max(),
        },
    });
    if include_debug {
        if let (Some(view), Some(obj)) = (engine.debug_view(), snapshot.as_object_mut()) {
            obj.insert("field".into(), view);
        }
    }
    snapshot
}

/// Writes `value` as pretty-printed JSON.
///
/// Returns `EngineError::Io` on serialization or write failure.
pub fn write_json(value: &Value, path: &Path) -> Result<(), EngineError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| EngineError::Io(format!("serialize snapshot: {e}")))?;
    std::fs::write(path, text).map_err(|e| EngineError::Io(format!("{}: {e}", path.display())))
}
