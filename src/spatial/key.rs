//! Bit-interleaved spatial keys over WGS84.
//!
//! `encode` bisects the world recursively; each bit pair narrows to one of
//! four sub-quadrants, latitude bit first (1 = upper half), longitude bit
//! second (1 = right half). The last bit is the finest subdivision, so
//! keys of nearby points share long prefixes.

const MIN_LAT: f64 = -90.0;
const MAX_LAT: f64 = 90.0;
const MIN_LON: f64 = -180.0;
const MAX_LON: f64 = 180.0;

/// Spatial key codec with a configurable precision of up to 64 bits
#[derive(Debug, Clone, Copy)]
pub struct SpatialKeyAlgo {
    bits: u32,
}

impl SpatialKeyAlgo {
    pub fn new(bits: u32) -> Self {
        assert!(bits >= 1 && bits <= 64, "key bits must be in 1..=64");
        SpatialKeyAlgo { bits }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn encode(&self, lat: f64, lon: f64) -> u64 {
        let mut key = 0u64;
        let (mut min_lat, mut max_lat) = (MIN_LAT, MAX_LAT);
        let (mut min_lon, mut max_lon) = (MIN_LON, MAX_LON);
        for i in 0..self.bits {
            key <<= 1;
            if i % 2 == 0 {
                let mid = (min_lat + max_lat) / 2.0;
                if lat >= mid {
                    key |= 1;
                    min_lat = mid;
                } else {
                    max_lat = mid;
                }
            } else {
                let mid = (min_lon + max_lon) / 2.0;
                if lon >= mid {
                    key |= 1;
                    min_lon = mid;
                } else {
                    max_lon = mid;
                }
            }
        }
        key
    }

    /// Center of the cell the key addresses
    pub fn decode(&self, key: u64) -> (f64, f64) {
        let (mut min_lat, mut max_lat) = (MIN_LAT, MAX_LAT);
        let (mut min_lon, mut max_lon) = (MIN_LON, MAX_LON);
        for i in 0..self.bits {
            let bit = (key >> (self.bits - 1 - i)) & 1;
            if i % 2 == 0 {
                let mid = (min_lat + max_lat) / 2.0;
                if bit == 1 {
                    min_lat = mid;
                } else {
                    max_lat = mid;
                }
            } else {
                let mid = (min_lon + max_lon) / 2.0;
                if bit == 1 {
                    min_lon = mid;
                } else {
                    max_lon = mid;
                }
            }
        }
        ((min_lat + max_lat) / 2.0, (min_lon + max_lon) / 2.0)
    }

    /// Worst-case decode deviation on the latitude axis, in degrees
    pub fn lat_error(&self) -> f64 {
        // latitude takes the even bit positions, so it owns the extra bit
        // of an odd-width key
        let lat_bits = (self.bits + 1) / 2;
        180.0 / 2f64.powi(lat_bits as i32) / 2.0
    }

    /// Worst-case decode deviation on the longitude axis, in degrees
    pub fn lon_error(&self) -> f64 {
        let lon_bits = self.bits / 2;
        360.0 / 2f64.powi(lon_bits as i32) / 2.0
    }
}
