//! Coordinate math for the discovery search area.
//!
//! The search area is a first-cut bounding box rather than a true circle:
//! radius converted to a latitude delta at a fixed miles-per-degree, and to a
//! longitude delta that widens with latitude. Corners over-include and the
//! approximation degrades toward the poles, which is acceptable at
//! metro-area radii.

use serde::{Deserialize, Serialize};

use crate::format::round_coordinate;
use crate::CoreError;

const MILES_PER_LAT_DEGREE: f64 = 69.1;
/// Degrees per radian, truncated to one decimal place.
const DEGREES_PER_RADIAN: f64 = 57.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting NaN and infinite components.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if either component is not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        let coordinate = Self {
            latitude,
            longitude,
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Both components rounded up to 8 decimal digits, the precision used
    /// whenever a coordinate is stored.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            latitude: round_coordinate(self.latitude),
            longitude: round_coordinate(self.longitude),
        }
    }

    fn validate(self) -> Result<(), CoreError> {
        if !self.latitude.is_finite() {
            return Err(CoreError::InvalidArgument(
                "latitude must be a finite number".to_string(),
            ));
        }
        if !self.longitude.is_finite() {
            return Err(CoreError::InvalidArgument(
                "longitude must be a finite number".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateBounds {
    pub lower: Coordinate,
    pub upper: Coordinate,
}

impl CoordinateBounds {
    /// Returns `true` when `point` lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        point.latitude >= self.lower.latitude
            && point.latitude <= self.upper.latitude
            && point.longitude >= self.lower.longitude
            && point.longitude <= self.upper.longitude
    }
}

/// Compute the search box of `radius_miles` around `center`.
///
/// The longitude delta divides by `|cos(latitude / 57.3)|` so the box stays
/// ordered (`lower <= upper`) even for inputs past the poles.
///
/// # Errors
///
/// Returns [`CoreError::InvalidArgument`] if the center is not finite or the
/// radius is not a positive, finite number of miles.
pub fn bounds_within_radius(
    center: Coordinate,
    radius_miles: f64,
) -> Result<CoordinateBounds, CoreError> {
    center.validate()?;
    if !radius_miles.is_finite() || radius_miles <= 0.0 {
        return Err(CoreError::InvalidArgument(format!(
            "radius must be a positive number of miles, got {radius_miles}"
        )));
    }

    let lat_delta = radius_miles / MILES_PER_LAT_DEGREE;
    let lng_delta = radius_miles
        / (MILES_PER_LAT_DEGREE * (center.latitude / DEGREES_PER_RADIAN).cos().abs());

    Ok(CoordinateBounds {
        lower: Coordinate {
            latitude: center.latitude - lat_delta,
            longitude: center.longitude - lng_delta,
        },
        upper: Coordinate {
            latitude: center.latitude + lat_delta,
            longitude: center.longitude + lng_delta,
        },
    })
}
