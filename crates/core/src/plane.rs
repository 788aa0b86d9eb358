//! The toroidal simulation plane.

use crate::error::EngineError;
use crate::prng::Xorshift64;
use glam::DVec2;

/// Extent of a wrap-around plane `[0, width) × [0, height)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    width: f64,
    height: f64,
}

impl Plane {
    /// Returns `EngineError::InvalidDimensions` unless both extents are
    /// positive and finite.
    pub fn new(width: f64, height: f64) -> Result<Self, EngineError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(EngineError::InvalidDimensions);
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Wraps a point back onto the plane.
    pub fn wrap(&self, p: DVec2) -> DVec2 {
        DVec2::new(wrap_coordinate(p.x, self.width), wrap_coordinate(p.y, self.height))
    }

    /// Whether `p` lies in `[0, width) × [0, height)`.
    pub fn contains(&self, p: DVec2) -> bool {
        (0.0..self.width).contains(&p.x) && (0.0..self.height).contains(&p.y)
    }

    /// Uniformly random point on the plane.
    pub fn random_point(&self, rng: &mut Xorshift64) -> DVec2 {
        let x = rng.next_range(0.0, self.width);
        let y = rng.next_range(0.0, self.height);
        self.wrap(DVec2::new(x, y))
    }
}

/// `((value % extent) + extent) % extent`, landing in `[0, extent)` for any
/// finite value.
///
/// `rem_euclid` can round up to exactly `extent` for tiny negative inputs;
/// that case folds back to 0.
pub fn wrap_coordinate(value: f64, extent: f64) -> f64 {
    let wrapped = value.rem_euclid(extent);
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_non_positive_or_non_finite() {
        assert!(Plane::new(360.0, 240.0).is_ok());
        assert!(matches!(Plane::new(0.0, 240.0), Err(EngineError::InvalidDimensions)));
        assert!(Plane::new(360.0, -1.0).is_err());
        assert!(Plane::new(f64::INFINITY, 240.0).is_err());
        assert!(Plane::new(360.0, f64::NAN).is_err());
    }

    #[test]
    fn wrap_coordinate_past_right_edge() {
        assert_eq!(wrap_coordinate(361.5, 360.0), 1.5);
    }

    #[test]
    fn wrap_coordinate_negative() {
        assert_eq!(wrap_coordinate(-2.0, 360.0), 358.0);
        assert_eq!(wrap_coordinate(-722.0, 360.0), 358.0);
    }

    #[test]
    fn wrap_coordinate_exact_edge_is_zero() {
        assert_eq!(wrap_coordinate(360.0, 360.0), 0.0);
    }

    #[test]
    fn wrap_coordinate_tiny_negative_stays_in_range() {
        let w = wrap_coordinate(-1e-20, 360.0);
        assert!((0.0..360.0).contains(&w), "got {w}");
    }

    #[test]
    fn random_points_lie_on_plane() {
        let plane = Plane::new(360.0, 240.0).unwrap();
        let mut rng = Xorshift64::new(8);
        for _ in 0..1000 {
            assert!(plane.contains(plane.random_point(&mut rng)));
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn wrap_always_lands_on_plane(
                x in -1e7_f64..1e7,
                y in -1e7_f64..1e7,
                w in 1.0_f64..2000.0,
                h in 1.0_f64..2000.0,
            ) {
                let plane = Plane::new(w, h).unwrap();
                let p = plane.wrap(DVec2::new(x, y));
                prop_assert!(plane.contains(p), "({x}, {y}) wrapped to {p} on {w}x{h}");
            }
        }
    }
}
