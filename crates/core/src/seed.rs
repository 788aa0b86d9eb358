//! Reproducible run description.
//!
//! A [`Seed`] is both the CLI's configuration file format and the record
//! embedded in every snapshot: engine name, plane size, parameter
//! overrides, PRNG seed and tick count. Feeding the same `Seed` to the same
//! binary replays the run bit-for-bit.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub engine: String,
    pub width: usize,
    pub height: usize,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    pub seed: u64,
    #[serde(default)]
    pub steps: usize,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Seed {
    /// Creates a seed with empty params and zero steps.
    pub fn new(engine: &str, width: usize, height: usize, seed: u64) -> Self {
        Self {
            engine: engine.to_string(),
            width,
            height,
            params: empty_params(),
            seed,
            steps: 0,
        }
    }

    /// Reads and validates a seed from a JSON file.
    ///
    /// Read failures are `EngineError::Io`; malformed contents are
    /// `EngineError::InvalidSeed`.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Io(format!("{}: {e}", path.display())))?;
        let seed: Seed = serde_json::from_str(&text)
            .map_err(|e| EngineError::InvalidSeed(format!("{}: {e}", path.display())))?;
        seed.validate()?;
        Ok(seed)
    }

    /// Rejects zero dimensions and areas that overflow `usize`.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .ok_or(EngineError::InvalidDimensions)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn new_has_empty_params_and_no_steps() {
        let s = Seed::new("flow", 360, 240, 42);
        assert_eq!(s.engine, "flow");
        assert_eq!((s.width, s.height, s.seed, s.steps), (360, 240, 42, 0));
        assert_eq!(s.params, serde_json::json!({}));
    }

    #[test]
    fn json_round_trip_with_params() {
        let mut s = Seed::new("flow", 360, 240, 7);
        s.params = serde_json::json!({"resolution": 20, "vehicle_count": 120});
        s.steps = 600;
        let json = serde_json::to_string_pretty(&s).unwrap();
        let restored: Seed = serde_json::from_str(&json).unwrap();
        assert_eq!(s, restored);
    }

    #[test]
    fn missing_params_and_steps_default() {
        let s: Seed =
            serde_json::from_str(r#"{"engine":"walker","width":400,"height":400,"seed":1}"#)
                .unwrap();
        assert_eq!(s.params, serde_json::json!({}));
        assert_eq!(s.steps, 0);
    }

    #[test]
    fn validate_rejects_zero_and_overflow() {
        assert!(Seed::new("flow", 360, 240, 1).validate().is_ok());
        assert!(Seed::new("flow", 0, 240, 1).validate().is_err());
        assert!(Seed::new("flow", 360, 0, 1).validate().is_err());
        assert!(Seed::new("flow", usize::MAX, 2, 1).validate().is_err());
    }

    #[test]
    fn load_reads_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"engine":"flow","width":360,"height":240,"seed":9,"steps":3}}"#
        )
        .unwrap();
        let s = Seed::load(&path).unwrap();
        assert_eq!(s.steps, 3);
        assert_eq!(s.seed, 9);
    }

    #[test]
    fn load_reports_missing_file_as_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = Seed::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }

    #[test]
    fn load_reports_malformed_json_as_invalid_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{"engine": "flow", "width": 360,"#).unwrap();
        let err = Seed::load(&path).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSeed(_)), "got {err:?}");
        assert!(err.is_configuration());
    }

    #[test]
    fn load_rejects_invalid_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.json");
        std::fs::write(
            &path,
            r#"{"engine":"flow","width":0,"height":240,"seed":9}"#,
        )
        .unwrap();
        assert!(matches!(
            Seed::load(&path),
            Err(EngineError::InvalidDimensions)
        ));
    }
}
