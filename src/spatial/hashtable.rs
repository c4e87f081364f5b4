//! Byte-packed spatial hashtable.
//!
//! Maps spatial keys to small values inside one flat byte buffer. Bucket
//! layout, low to high address:
//!
//! ```text
//! | header | entry 0 | ... | entry n-1 | free | overflow m | ... | overflow 0 |
//! ```
//!
//! The header byte is `(entry_count << 1) | full_bit`. In-bucket entries
//! grow forward from offset 1, overflow entries grow backward from the
//! bucket tail. An overflow entry is prefixed with one byte
//! `(offset << 1) | stop_bit` where `offset` is the ring distance back to
//! the bucket that owns the entry and the stop bit marks the end of that
//! bucket's chain.
//!
//! With key compression on, the key's second bucket-index window (`y`) is
//! not stored; it is recovered from `bucket_index ^ x` at read time.

use bit_vec::BitVec;
use log::debug;

use crate::error::{Error, Result};
use crate::shapes::{BBox, Circle, Shape};
use crate::spatial::key::SpatialKeyAlgo;

/// Overflow scans give up after this many offset steps
const MAX_OVERFLOW_OFFSET: usize = 200;

/// One decoded hashtable entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialEntry {
    pub lat: f64,
    pub lon: f64,
    pub value: u64,
}

/// Construction parameters, see [`SpatialHashtable::init`]
#[derive(Debug, Clone, Copy)]
pub struct TableConfig {
    /// High key bits skipped when deriving the bucket index. Small values
    /// behave like a quadtree (fast region scans, more collisions), large
    /// values like a plain hashtable.
    pub skip_key_beginning_bits: u32,
    /// Target entries per bucket before overflow headroom is added
    pub entries_per_bucket: usize,
    /// Payload width, 1..=8 bytes
    pub bytes_per_value: usize,
    /// Drop the recoverable key window from stored entries
    pub compress_key: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            skip_key_beginning_bits: 8,
            entries_per_bucket: 3,
            bytes_per_value: 4,
            compress_key: true,
        }
    }
}

pub struct SpatialHashtable {
    algo: SpatialKeyAlgo,
    compress_key: bool,
    storage: Vec<u8>,
    size: usize,
    max_buckets: usize,
    max_entries_per_bucket: usize,
    bytes_per_bucket: usize,
    bytes_per_entry: usize,
    bytes_per_value: usize,
    bytes_per_overflow_entry: usize,
    bytes_per_key_rest: usize,
    spatial_key_bits: u32,
    skip_key_beginning_bits: u32,
    skip_key_end_bits: u32,
    bucket_index_bits: u32,
    unused_bits: u32,
    right_mask: u64,
}

fn div_ceil(value: usize, divisor: usize) -> usize {
    if value % divisor == 0 {
        value / divisor
    } else {
        value / divisor + 1
    }
}

impl SpatialHashtable {
    /// Lay out and allocate a table for up to `max_entries` entries.
    pub fn init(config: TableConfig, max_entries: usize) -> Result<SpatialHashtable> {
        if config.entries_per_bucket == 0 {
            return Err(Error::Config("entries per bucket must be positive".into()));
        }
        if config.bytes_per_value == 0 || config.bytes_per_value > 8 {
            return Err(Error::Config(format!(
                "bytes per value must be in 1..=8, got {}",
                config.bytes_per_value
            )));
        }

        // one unused byte keeps encode/decode off the sign bit while still
        // beating float precision
        let unused_bits = 8;
        let spatial_key_bits = 64 - unused_bits;
        let algo = SpatialKeyAlgo::new(spatial_key_bits);
        let skip_key_beginning_bits = config.skip_key_beginning_bits + unused_bits;

        let buckets = div_ceil(max_entries.max(1), config.entries_per_bucket);
        let max_buckets = buckets.next_power_of_two();
        let bucket_index_bits = max_buckets.trailing_zeros();

        // re-balance entries per bucket against the rounded bucket count,
        // then reserve overflow headroom
        let mut max_entries_per_bucket = div_ceil(max_entries.max(1), max_buckets);
        if max_entries_per_bucket < 5 {
            max_entries_per_bucket += 1;
        } else if max_entries_per_bucket < 8 {
            max_entries_per_bucket += 2;
        } else {
            max_entries_per_bucket = max_entries_per_bucket * 5 / 4;
        }
        if max_entries_per_bucket > 127 {
            return Err(Error::Config(format!(
                "entries per bucket must fit the 7 bit header, got {max_entries_per_bucket}"
            )));
        }

        let (bytes_per_key_rest, skip_key_end_bits) = if config.compress_key {
            let skip_key_end_bits =
                64i64 - skip_key_beginning_bits as i64 - 2 * bucket_index_bits as i64;
            if skip_key_end_bits < 0 {
                return Err(Error::Config(format!(
                    "too many entries ({max_entries}) for skip_key_beginning_bits \
                     ({}), would need {skip_key_end_bits} trailing bits",
                    config.skip_key_beginning_bits
                )));
            }
            (
                div_ceil((spatial_key_bits - bucket_index_bits) as usize, 8),
                skip_key_end_bits as u32,
            )
        } else {
            (8, 0)
        };

        let bytes_per_entry = bytes_per_key_rest + config.bytes_per_value;
        let bytes_per_overflow_entry = bytes_per_entry + 1;
        let bytes_per_bucket = 1 + max_entries_per_bucket * bytes_per_entry;
        let right_mask = if skip_key_end_bits > 0 {
            (1u64 << skip_key_end_bits) - 1
        } else {
            0
        };

        debug!(
            "spatial hashtable layout: {max_buckets} buckets x {bytes_per_bucket} bytes, \
             {max_entries_per_bucket} entries/bucket, {bucket_index_bits} index bits, \
             key rest {bytes_per_key_rest} bytes"
        );

        Ok(SpatialHashtable {
            algo,
            compress_key: config.compress_key,
            storage: vec![0; max_buckets * bytes_per_bucket],
            size: 0,
            max_buckets,
            max_entries_per_bucket,
            bytes_per_bucket,
            bytes_per_entry,
            bytes_per_value: config.bytes_per_value,
            bytes_per_overflow_entry,
            bytes_per_key_rest,
            spatial_key_bits,
            skip_key_beginning_bits,
            skip_key_end_bits,
            bucket_index_bits,
            unused_bits,
            right_mask,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn memory_usage_bytes(&self) -> usize {
        self.storage.len()
    }

    pub fn max_buckets(&self) -> usize {
        self.max_buckets
    }

    pub fn entries_per_bucket(&self) -> usize {
        self.max_entries_per_bucket
    }

    pub fn bucket_index_bits(&self) -> u32 {
        self.bucket_index_bits
    }

    pub fn bytes_per_bucket(&self) -> usize {
        self.bytes_per_bucket
    }

    pub fn bytes_per_entry(&self) -> usize {
        self.bytes_per_entry
    }

    pub fn bytes_per_overflow_entry(&self) -> usize {
        self.bytes_per_overflow_entry
    }

    pub fn algo(&self) -> &SpatialKeyAlgo {
        &self.algo
    }

    pub fn clear(&mut self) {
        self.storage.fill(0);
        self.size = 0;
    }

    /// In-bucket entry count (overflow entries excluded)
    pub fn entries_in_bucket(&self, bucket_index: usize) -> usize {
        self.entry_count(bucket_index * self.bytes_per_bucket)
    }

    /// Overflow entries whose bytes currently live in this bucket's tail
    pub fn overflow_entries_in_bucket(&self, bucket_index: usize) -> usize {
        let bp = bucket_index * self.bytes_per_bucket;
        let n = self.entry_count(bp);
        let mut count = 0;
        for j in 0..self.max_overflow_slots(n) {
            if self.storage[self.overflow_slot_ptr(bp, n, j)] == 0 {
                break;
            }
            count += 1;
        }
        count
    }

    pub fn bucket_index(&self, key: u64) -> usize {
        if !self.compress_key {
            if self.max_buckets <= 1 {
                return 0;
            }
            return (key % (self.max_buckets as u64 - 1)) as usize;
        }
        let mask = (1u64 << self.bucket_index_bits) - 1;
        let x = (key >> (self.bucket_index_bits + self.skip_key_end_bits)) & mask;
        let y = (key >> self.skip_key_end_bits) & mask;
        // max_buckets is a power of two, so plain masking would waste the
        // upper window; x ^ y spreads both while keeping spatial locality
        (x ^ y) as usize
    }

    /// Key as written to an entry: with compression the `y` window is
    /// dropped, it is recoverable from the bucket index
    pub(crate) fn stored_key(&self, key: u64) -> u64 {
        if !self.compress_key {
            return key;
        }
        let skipped_right = key & self.right_mask;
        ((key >> (self.bucket_index_bits + self.skip_key_end_bits)) << self.skip_key_end_bits)
            | skipped_right
    }

    pub(crate) fn to_uncompressed_key(&self, stored_key: u64, bucket_index: usize) -> u64 {
        if !self.compress_key {
            return stored_key;
        }
        let mask = (1u64 << self.bucket_index_bits) - 1;
        let right = stored_key & self.right_mask;
        let x = (stored_key >> self.skip_key_end_bits) & mask;
        let upper = (stored_key >> self.skip_key_end_bits)
            << (self.skip_key_end_bits + self.bucket_index_bits);
        let y = ((bucket_index as u64) ^ x) << self.skip_key_end_bits;
        upper | y | right
    }

    pub fn add(&mut self, lat: f64, lon: f64, value: u64) -> Result<()> {
        self.add_key(self.algo.encode(lat, lon), value)
    }

    /// Insert an entry; the value is truncated to the configured width.
    /// Duplicate keys are allowed.
    pub fn add_key(&mut self, key: u64, value: u64) -> Result<()> {
        let bucket_index = self.bucket_index(key);
        let stored_key = self.stored_key(key);
        let bp = bucket_index * self.bytes_per_bucket;

        let pointer = if self.is_bucket_full(bp) {
            self.append_overflow(bucket_index)?
        } else {
            let n = self.entry_count(bp);
            let o = self.overflow_entries_in_bucket(bucket_index);
            if o * self.bytes_per_overflow_entry + (n + 1) * self.bytes_per_entry + 1
                <= self.bytes_per_bucket
            {
                self.write_header(bp, n + 1, false);
                bp + 1 + n * self.bytes_per_entry
            } else {
                // keep the old count, mark overflowed and start a chain
                self.write_header(bp, n, true);
                self.append_overflow(bucket_index)?
            }
        };

        self.put_bytes(pointer, self.bytes_per_key_rest, stored_key);
        self.put_bytes(pointer + self.bytes_per_key_rest, self.bytes_per_value, value);
        self.size += 1;
        Ok(())
    }

    /// All entries whose spatial key equals `key` exactly, in insertion
    /// order
    pub fn nodes_at_key(&self, key: u64) -> Vec<SpatialEntry> {
        let bucket_index = self.bucket_index(key);
        let mut result = Vec::new();
        self.scan_bucket(bucket_index, &mut |entry_key, value| {
            if entry_key == key {
                let (lat, lon) = self.algo.decode(entry_key);
                result.push(SpatialEntry { lat, lon, value });
            }
        });
        result
    }

    /// All entries inside `shape`, found by quadtree descent over the key
    /// space
    pub fn nodes_within<S: Shape>(&self, shape: &S) -> Vec<SpatialEntry> {
        let mut visited = BitVec::from_elem(self.max_buckets, false);
        let mut result = Vec::new();
        self.neighbours(BBox::earth(), shape, 0, 0, &mut visited, &mut result);
        result
    }

    /// All entries within `distance_km` around the center
    pub fn nodes_near(&self, lat: f64, lon: f64, distance_km: f64) -> Vec<SpatialEntry> {
        self.nodes_within(&Circle::new(lat, lon, distance_km * 1000.0))
    }

    // ----- bucket internals -------------------------------------------

    fn write_header(&mut self, bp: usize, entries: usize, full: bool) {
        debug_assert!(entries <= self.max_entries_per_bucket);
        self.storage[bp] = ((entries as u8) << 1) | full as u8;
    }

    fn is_bucket_full(&self, bp: usize) -> bool {
        self.storage[bp] & 1 == 1
    }

    fn entry_count(&self, bp: usize) -> usize {
        (self.storage[bp] >> 1) as usize
    }

    /// Overflow slots that fit the tail of a bucket holding `n` entries
    fn max_overflow_slots(&self, n: usize) -> usize {
        (self.bytes_per_bucket - 1 - n * self.bytes_per_entry) / self.bytes_per_overflow_entry
    }

    /// Pointer to the offset byte of overflow slot `j`, counted from the
    /// bucket tail
    fn overflow_slot_ptr(&self, bp: usize, _n: usize, j: usize) -> usize {
        bp + self.bytes_per_bucket - (j + 1) * self.bytes_per_overflow_entry
    }

    /// Append an overflow entry for `owner`: walk subsequent buckets
    /// (ring-wrapped), remember the owner's current chain end, write the
    /// new entry into the first free slot and move the stop bit there.
    fn append_overflow(&mut self, owner: usize) -> Result<usize> {
        let mut prev_stop: Option<usize> = None;
        let mut offset = 0usize;
        let mut bucket = owner;

        for _ in 0..self.max_buckets {
            offset += 1;
            if offset > MAX_OVERFLOW_OFFSET {
                return Err(Error::TableFull {
                    size: self.size,
                    offset,
                });
            }
            bucket += 1;
            if bucket >= self.max_buckets {
                bucket = 0;
            }

            let bp = bucket * self.bytes_per_bucket;
            let n = self.entry_count(bp);
            for j in 0..self.max_overflow_slots(n) {
                let ptr = self.overflow_slot_ptr(bp, n, j);
                let byte = self.storage[ptr];
                if byte == 0 {
                    if let Some(stop) = prev_stop {
                        self.storage[stop] &= !1;
                    }
                    // offsets wear the 7 bit layout, so they wrap at 128
                    self.storage[ptr] = (((offset & 0x7f) as u8) << 1) | 1;
                    return Ok(ptr + 1);
                }
                if (byte >> 1) as usize == offset & 0x7f && byte & 1 == 1 {
                    prev_stop = Some(ptr);
                }
            }
        }

        Err(Error::TableFull {
            size: self.size,
            offset,
        })
    }

    /// Feed every entry of the bucket and of its overflow chain to `f`
    fn scan_bucket<F: FnMut(u64, u64)>(&self, bucket_index: usize, f: &mut F) {
        let bp = bucket_index * self.bytes_per_bucket;
        let n = self.entry_count(bp);
        for i in 0..n {
            let pointer = bp + 1 + i * self.bytes_per_entry;
            self.emit_entry(pointer, bucket_index, f);
        }
        if !self.is_bucket_full(bp) {
            return;
        }

        // chain entries live in subsequent buckets; ownership is encoded
        // as the ring distance in each offset byte
        let mut offset = 0usize;
        let mut bucket = bucket_index;
        'walk: for _ in 0..self.max_buckets {
            offset += 1;
            if offset > MAX_OVERFLOW_OFFSET {
                break;
            }
            bucket += 1;
            if bucket >= self.max_buckets {
                bucket = 0;
            }

            let bp2 = bucket * self.bytes_per_bucket;
            let n2 = self.entry_count(bp2);
            for j in 0..self.max_overflow_slots(n2) {
                let ptr = self.overflow_slot_ptr(bp2, n2, j);
                let byte = self.storage[ptr];
                if byte == 0 {
                    break;
                }
                if (byte >> 1) as usize == offset & 0x7f {
                    self.emit_entry(ptr + 1, bucket_index, f);
                    if byte & 1 == 1 {
                        break 'walk;
                    }
                }
            }
        }
    }

    fn emit_entry<F: FnMut(u64, u64)>(&self, pointer: usize, bucket_index: usize, f: &mut F) {
        let stored_key = self.get_bytes(pointer, self.bytes_per_key_rest);
        let key = self.to_uncompressed_key(stored_key, bucket_index);
        let value = self.get_bytes(pointer + self.bytes_per_key_rest, self.bytes_per_value);
        f(key, value);
    }

    fn neighbours<S: Shape>(
        &self,
        node_bbox: BBox,
        shape: &S,
        depth: u32,
        key: u64,
        visited: &mut BitVec,
        result: &mut Vec<SpatialEntry>,
    ) {
        if depth >= 2 * self.bucket_index_bits + self.skip_key_beginning_bits - self.unused_bits {
            let bucket_index = self.bucket_index(key << self.skip_key_end_bits);
            // x ^ y folds several quadrants onto one bucket, skip repeats
            if visited.get(bucket_index) == Some(true) {
                return;
            }
            visited.set(bucket_index, true);
            self.scan_bucket(bucket_index, &mut |entry_key, value| {
                let (lat, lon) = self.algo.decode(entry_key);
                if shape.contains(lat, lon) {
                    result.push(SpatialEntry { lat, lon, value });
                }
            });
            return;
        }

        let lat12 = (node_bbox.min_lat + node_bbox.max_lat) / 2.0;
        let lon12 = (node_bbox.min_lon + node_bbox.max_lon) / 2.0;
        let depth = depth + 2;
        let key = key << 2;
        // quadrant bit pairs, latitude bit set on the upper half:
        // 10 11
        // 00 01
        let quadrants = [
            (
                BBox::new(lat12, node_bbox.max_lat, node_bbox.min_lon, lon12),
                0b10,
            ),
            (
                BBox::new(lat12, node_bbox.max_lat, lon12, node_bbox.max_lon),
                0b11,
            ),
            (
                BBox::new(node_bbox.min_lat, lat12, node_bbox.min_lon, lon12),
                0b00,
            ),
            (
                BBox::new(node_bbox.min_lat, lat12, lon12, node_bbox.max_lon),
                0b01,
            ),
        ];
        for (child_bbox, bits) in quadrants {
            if shape.intersects(&child_bbox) {
                self.neighbours(child_bbox, shape, depth, key | bits, visited, result);
            }
        }
    }

    // ----- raw big-endian packing -------------------------------------

    fn get_bytes(&self, pointer: usize, len: usize) -> u64 {
        let mut value = 0u64;
        for i in 0..len {
            value = (value << 8) | self.storage[pointer + i] as u64;
        }
        value
    }

    fn put_bytes(&mut self, pointer: usize, len: usize, value: u64) {
        for i in 0..len {
            self.storage[pointer + len - 1 - i] = (value >> (8 * i)) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(skip: u32, entries_per_bucket: usize, max_entries: usize) -> SpatialHashtable {
        SpatialHashtable::init(
            TableConfig {
                skip_key_beginning_bits: skip,
                entries_per_bucket,
                ..TableConfig::default()
            },
            max_entries,
        )
        .unwrap()
    }

    #[test]
    fn test_layout_for_reference_parameters() {
        let t = table(8, 3, 10_000);
        assert_eq!(t.max_buckets(), 4096);
        assert_eq!(t.bucket_index_bits(), 12);
        assert_eq!(t.entries_per_bucket(), 4);
        assert_eq!(t.bytes_per_entry(), 6 + 4);
        assert_eq!(t.bytes_per_overflow_entry(), 11);
        assert_eq!(t.bytes_per_bucket(), 1 + 4 * 10);
        assert_eq!(t.memory_usage_bytes(), 4096 * 41);
    }

    #[test]
    fn test_config_rejects_negative_trailing_bits() {
        let result = SpatialHashtable::init(
            TableConfig {
                skip_key_beginning_bits: 40,
                ..TableConfig::default()
            },
            10_000,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_stored_key_roundtrip() {
        let t = table(8, 3, 10_000);
        let keys = [
            t.algo().encode(52.5163, 13.3777),
            t.algo().encode(-33.8688, 151.2093),
            t.algo().encode(0.0, 0.0),
            u64::MAX >> 8,
        ];
        for key in keys {
            let bucket_index = t.bucket_index(key);
            assert!(bucket_index < t.max_buckets());
            let restored = t.to_uncompressed_key(t.stored_key(key), bucket_index);
            assert_eq!(restored, key, "key {key:#018x} did not survive");
        }
    }

    #[test]
    fn test_add_and_key_query_with_duplicates() {
        let mut t = table(8, 3, 100);
        let key = t.algo().encode(52.0, 13.0);
        t.add_key(key, 17).unwrap();
        t.add_key(key, 42).unwrap();
        t.add(48.0, 11.0, 7).unwrap();
        assert_eq!(t.size(), 3);

        let found = t.nodes_at_key(key);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].value, 17);
        assert_eq!(found[1].value, 42);
        assert!((found[0].lat - 52.0).abs() <= t.algo().lat_error());
        assert!((found[0].lon - 13.0).abs() <= t.algo().lon_error());
    }

    #[test]
    fn test_overflow_keeps_all_entries_readable() {
        // tiny table, everything hammered onto one bucket
        let mut t = table(8, 2, 16);
        let key = t.algo().encode(10.0, 10.0);
        let mut inserted = 0u64;
        let err = loop {
            match t.add_key(key, inserted) {
                Ok(()) => inserted += 1,
                Err(e) => break e,
            }
        };
        assert!(matches!(err, Error::TableFull { .. }));
        assert!(inserted > t.entries_per_bucket() as u64);
        assert_eq!(t.size() as u64, inserted);

        let found = t.nodes_at_key(key);
        assert_eq!(found.len() as u64, inserted);
        // insertion order survives the chain walk
        for (i, entry) in found.iter().enumerate() {
            assert_eq!(entry.value, i as u64);
        }
        // the table stays consistent for unrelated reads
        assert!(t.nodes_at_key(t.algo().encode(-10.0, -10.0)).is_empty());
    }

    #[test]
    fn test_bucket_layout_invariant_under_overflow() {
        let mut t = table(8, 2, 16);
        let key = t.algo().encode(10.0, 10.0);
        while t.add_key(key, 1).is_ok() {}

        for bucket_index in 0..t.max_buckets() {
            let used = 1
                + t.entries_in_bucket(bucket_index) * t.bytes_per_entry()
                + t.overflow_entries_in_bucket(bucket_index) * t.bytes_per_overflow_entry();
            assert!(
                used <= t.bytes_per_bucket(),
                "bucket {bucket_index} uses {used} of {} bytes",
                t.bytes_per_bucket()
            );
        }
    }

    #[test]
    fn test_region_query_by_bbox() {
        let mut t = table(8, 3, 200);
        for i in 0..10 {
            for j in 0..10 {
                t.add(i as f64, j as f64, (i * 10 + j) as u64).unwrap();
            }
        }
        let found = t.nodes_within(&BBox::new(1.9, 4.1, 2.9, 5.1));
        assert_eq!(found.len(), 3 * 3);
        for entry in &found {
            assert!(entry.lat > 1.5 && entry.lat < 4.5);
            assert!(entry.lon > 2.5 && entry.lon < 5.5);
        }
    }

    #[test]
    fn test_circle_query() {
        let mut t = table(8, 3, 100);
        t.add(0.0, 0.0, 1).unwrap();
        t.add(0.0, 0.5, 2).unwrap();
        t.add(0.0, 2.0, 3).unwrap();
        let found = t.nodes_near(0.0, 0.0, 60.0);
        let mut values: Vec<u64> = found.iter().map(|e| e.value).collect();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn test_clear_resets_to_empty() {
        let mut t = table(8, 3, 100);
        t.add(1.0, 1.0, 5).unwrap();
        assert!(!t.is_empty());
        t.clear();
        assert!(t.is_empty());
        assert!(t.nodes_at_key(t.algo().encode(1.0, 1.0)).is_empty());
    }

    #[test]
    fn test_wide_values_survive() {
        let mut t = SpatialHashtable::init(
            TableConfig {
                bytes_per_value: 8,
                ..TableConfig::default()
            },
            100,
        )
        .unwrap();
        let key = t.algo().encode(5.0, 5.0);
        t.add_key(key, u64::MAX - 3).unwrap();
        assert_eq!(t.nodes_at_key(key)[0].value, u64::MAX - 3);
    }

    #[test]
    fn test_uncompressed_mode_roundtrip() {
        let mut t = SpatialHashtable::init(
            TableConfig {
                compress_key: false,
                ..TableConfig::default()
            },
            100,
        )
        .unwrap();
        let key = t.algo().encode(52.0, 13.0);
        t.add_key(key, 9).unwrap();
        let found = t.nodes_at_key(key);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, 9);
    }
}
