//! Geodesic helpers: haversine distance, edge orientation math and
//! point-to-segment projection used by snapping and heading enforcement.

use ::geo::HaversineDistance;
use ::geo::Point;

pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let p1 = Point::new(lon1, lat1);
    let p2 = Point::new(lon2, lat2);
    p1.haversine_distance(&p2)
}

/// Orientation of the segment (lat1,lon1)->(lat2,lon2) as an x-axis angle
/// in radians, counter-clockwise, 0 pointing east.
///
/// Works on plate carree coordinates with the longitude axis shrunk by the
/// cosine of the mean latitude, which is accurate enough for the short
/// terminal segments it is applied to.
pub fn calc_orientation(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let shrink_factor = ((lat1 + lat2) / 2.0).to_radians().cos();
    (lat2 - lat1).atan2(shrink_factor * (lon2 - lon1))
}

/// Convert a north-based azimuth in degrees (0 = north, 90 = east) to an
/// x-axis angle in (-pi, pi].
pub fn azimuth_to_xaxis_angle(azimuth_deg: f64) -> f64 {
    let azimuth_deg = azimuth_deg.rem_euclid(360.0);
    let mut angle = std::f64::consts::FRAC_PI_2 - azimuth_deg.to_radians();
    if angle < -std::f64::consts::PI {
        angle += 2.0 * std::f64::consts::PI;
    }
    if angle > std::f64::consts::PI {
        angle -= 2.0 * std::f64::consts::PI;
    }
    angle
}

/// Shift `orientation` by a multiple of 2*pi so that it lies within pi of
/// `base_orientation`. Both angles must come from [`calc_orientation`] or
/// [`azimuth_to_xaxis_angle`].
pub fn align_orientation(base_orientation: f64, orientation: f64) -> f64 {
    use std::f64::consts::PI;
    if base_orientation >= 0.0 {
        if orientation < -PI + base_orientation {
            orientation + 2.0 * PI
        } else {
            orientation
        }
    } else if orientation > PI + base_orientation {
        orientation - 2.0 * PI
    } else {
        orientation
    }
}

/// Project (lat, lon) onto the segment (lat1,lon1)->(lat2,lon2).
///
/// Returns the clamped segment parameter in [0, 1] and the projected
/// coordinate. Projection happens in plate carree space with the longitude
/// axis shrunk by the cosine of the segment's mean latitude.
pub fn project_on_segment(
    lat: f64,
    lon: f64,
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
) -> (f64, f64, f64) {
    let shrink_factor = ((lat1 + lat2) / 2.0).to_radians().cos();
    let dy = lat2 - lat1;
    let dx = (lon2 - lon1) * shrink_factor;

    let norm = dx * dx + dy * dy;
    if norm == 0.0 {
        return (0.0, lat1, lon1);
    }

    let py = lat - lat1;
    let px = (lon - lon1) * shrink_factor;
    let t = ((px * dx + py * dy) / norm).clamp(0.0, 1.0);

    (t, lat1 + t * (lat2 - lat1), lon1 + t * (lon2 - lon1))
}
