//! Error types for the flowfield core.

use thiserror::Error;

/// Errors produced by engine construction and stepping.
///
/// Every configuration variant is raised synchronously while an engine is
/// being built; a running simulation never produces them.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Plane width or height was zero, negative, or not finite.
    #[error("invalid dimensions: width and height must be positive and finite")]
    InvalidDimensions,

    /// Flow field cell size was zero, negative, or not finite.
    #[error("invalid field resolution {0}: must be positive and finite")]
    InvalidResolution(f64),

    /// A negative agent count was supplied.
    #[error("invalid vehicle count {0}: must be non-negative")]
    InvalidVehicleCount(i64),

    /// A min/max range was empty, inverted, non-positive, or not finite.
    #[error("invalid range for '{name}': [{min}, {max}] must satisfy 0 < min <= max")]
    InvalidRange { name: String, min: f64, max: f64 },

    /// A parameter existed but had the wrong JSON type.
    #[error("parameter type mismatch for '{name}': expected {expected}, got {got}")]
    ParamTypeMismatch {
        name: String,
        expected: String,
        got: String,
    },

    /// A named choice (noise source, walk kind) was not recognized.
    #[error("unknown {name} '{value}': expected one of {expected}")]
    UnknownOption {
        name: String,
        value: String,
        expected: String,
    },

    /// A seed file was readable but not a valid run description.
    #[error("invalid seed file: {0}")]
    InvalidSeed(String),

    /// No engine is registered under the requested name.
    #[error("unknown engine: {0}")]
    UnknownEngine(String),

    /// Writing a snapshot or reading a seed file failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl EngineError {
    /// Whether this error describes rejected configuration (as opposed to
    /// lookup or I/O failures).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidDimensions
                | EngineError::InvalidResolution(_)
                | EngineError::InvalidVehicleCount(_)
                | EngineError::InvalidSeed(_)
                | EngineError::InvalidRange { .. }
                | EngineError::ParamTypeMismatch { .. }
                | EngineError::UnknownOption { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let msg = EngineError::InvalidDimensions.to_string();
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn invalid_resolution_includes_value() {
        let msg = EngineError::InvalidResolution(-2.5).to_string();
        assert!(msg.contains("-2.5"), "missing value in: {msg}");
    }

    #[test]
    fn invalid_vehicle_count_includes_value() {
        let msg = EngineError::InvalidVehicleCount(-7).to_string();
        assert!(msg.contains("-7"), "missing count in: {msg}");
    }

    #[test]
    fn invalid_range_includes_name_and_bounds() {
        let err = EngineError::InvalidRange {
            name: "speed".into(),
            min: 5.0,
            max: 2.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("speed"), "missing name in: {msg}");
        assert!(msg.contains('5'), "missing min in: {msg}");
        assert!(msg.contains('2'), "missing max in: {msg}");
    }

    #[test]
    fn param_type_mismatch_includes_all_fields() {
        let err = EngineError::ParamTypeMismatch {
            name: "vehicle_count".into(),
            expected: "integer".into(),
            got: "string".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("vehicle_count"), "missing param name in: {msg}");
        assert!(msg.contains("integer"), "missing expected type in: {msg}");
        assert!(msg.contains("string"), "missing got type in: {msg}");
    }

    #[test]
    fn unknown_option_lists_choices() {
        let err = EngineError::UnknownOption {
            name: "walk kind".into(),
            value: "levy".into(),
            expected: "uniform, biased".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("walk kind") && msg.contains("levy"), "{msg}");
        assert!(msg.contains("uniform, biased"), "{msg}");
    }

    #[test]
    fn configuration_errors_are_classified() {
        assert!(EngineError::InvalidDimensions.is_configuration());
        assert!(EngineError::InvalidResolution(0.0).is_configuration());
        assert!(EngineError::InvalidVehicleCount(-1).is_configuration());
        assert!(EngineError::UnknownOption {
            name: "noise".into(),
            value: "worley".into(),
            expected: "octave, perlin".into(),
        }
        .is_configuration());
        assert!(!EngineError::UnknownEngine("x".into()).is_configuration());
        assert!(!EngineError::Io("disk".into()).is_configuration());
        assert!(EngineError::InvalidSeed("bad".into()).is_configuration());
    }

    #[test]
    fn engine_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
    }

    #[test]
    fn engine_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<EngineError>();
    }
}
