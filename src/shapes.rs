//! Search shapes for spatial region queries.

use crate::geo::haversine_distance;
use serde::{Deserialize, Serialize};

/// A geometric region that can filter points and prune bounding boxes
/// during the quadtree descent of a region query.
pub trait Shape {
    fn contains(&self, lat: f64, lon: f64) -> bool;
    fn intersects(&self, bbox: &BBox) -> bool;
}

/// Geographic bounding box in WGS-84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        BBox {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// The whole WGS-84 coordinate plane
    pub fn earth() -> Self {
        BBox::new(-90.0, 90.0, -180.0, 180.0)
    }

    /// Inverted box, extended point by point via [`BBox::extend`]
    pub fn inverse() -> Self {
        BBox::new(
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
        )
    }

    pub fn extend(&mut self, lat: f64, lon: f64) {
        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
        self.min_lon = self.min_lon.min(lon);
        self.max_lon = self.max_lon.max(lon);
    }

    pub fn intersects_bbox(&self, other: &BBox) -> bool {
        self.min_lat <= other.max_lat
            && self.max_lat >= other.min_lat
            && self.min_lon <= other.max_lon
            && self.max_lon >= other.min_lon
    }
}

impl Shape for BBox {
    fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    fn intersects(&self, bbox: &BBox) -> bool {
        self.intersects_bbox(bbox)
    }
}

/// Circle with a haversine radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub lat: f64,
    pub lon: f64,
    pub radius_m: f64,
}

impl Circle {
    pub fn new(lat: f64, lon: f64, radius_m: f64) -> Self {
        Circle { lat, lon, radius_m }
    }
}

impl Shape for Circle {
    fn contains(&self, lat: f64, lon: f64) -> bool {
        haversine_distance(self.lat, self.lon, lat, lon) <= self.radius_m
    }

    fn intersects(&self, bbox: &BBox) -> bool {
        // distance from the center to the closest point of the box
        let lat = self.lat.clamp(bbox.min_lat, bbox.max_lat);
        let lon = self.lon.clamp(bbox.min_lon, bbox.max_lon);
        haversine_distance(self.lat, self.lon, lat, lon) <= self.radius_m
    }
}
