//! Randomized round-trip and overflow tests for the spatial hashtable.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use heron_route::{BBox, SpatialHashtable, TableConfig};

fn random_points(count: usize, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| (rng.gen_range(-90.0..90.0), rng.gen_range(-180.0..180.0)))
        .collect()
}

#[test]
fn test_random_bbox_roundtrip() {
    let config = TableConfig {
        skip_key_beginning_bits: 8,
        entries_per_bucket: 3,
        ..TableConfig::default()
    };
    let points = random_points(10_000, 42);
    let mut table = SpatialHashtable::init(config, points.len()).unwrap();
    for (i, &(lat, lon)) in points.iter().enumerate() {
        table.add(lat, lon, i as u64).unwrap();
    }
    assert_eq!(table.size(), points.len());

    // a ~1 m box around every inserted point returns its value
    let eps = 1e-5;
    let lat_err = table.algo().lat_error();
    let lon_err = table.algo().lon_error();
    for (i, &(lat, lon)) in points.iter().enumerate() {
        let found = table.nodes_within(&BBox::new(lat - eps, lat + eps, lon - eps, lon + eps));
        let entry = found
            .iter()
            .find(|e| e.value == i as u64)
            .unwrap_or_else(|| panic!("point {i} at ({lat}, {lon}) was not found"));
        assert!((entry.lat - lat).abs() <= lat_err);
        assert!((entry.lon - lon).abs() <= lon_err);
    }
}

#[test]
fn test_random_circle_roundtrip() {
    let points = random_points(300, 7);
    let mut table = SpatialHashtable::init(TableConfig::default(), points.len()).unwrap();
    for (i, &(lat, lon)) in points.iter().enumerate() {
        table.add(lat, lon, i as u64).unwrap();
    }

    // decode error stays below ~10 cm, so a 1 m circle must recover
    // every point
    for (i, &(lat, lon)) in points.iter().enumerate() {
        let found = table.nodes_near(lat, lon, 0.001);
        assert!(
            found.iter().any(|e| e.value == i as u64),
            "point {i} missing from 1 m circle"
        );
    }
}

#[test]
fn test_bucket_layout_invariant_after_random_fill() {
    let points = random_points(10_000, 1234);
    let mut table = SpatialHashtable::init(TableConfig::default(), points.len()).unwrap();
    for (i, &(lat, lon)) in points.iter().enumerate() {
        table.add(lat, lon, i as u64).unwrap();
    }

    for bucket in 0..table.max_buckets() {
        let used = 1
            + table.entries_in_bucket(bucket) * table.bytes_per_entry()
            + table.overflow_entries_in_bucket(bucket) * table.bytes_per_overflow_entry();
        assert!(used <= table.bytes_per_bucket());
    }
    assert_eq!(
        table.memory_usage_bytes(),
        table.max_buckets() * table.bytes_per_bucket()
    );
}

#[test]
fn test_duplicate_keys_are_kept() {
    let mut table = SpatialHashtable::init(TableConfig::default(), 100).unwrap();
    let key = table.algo().encode(48.137, 11.575);
    table.add_key(key, 1).unwrap();
    table.add_key(key, 2).unwrap();
    assert_eq!(table.size(), 2);

    let found = table.nodes_at_key(key);
    let values: Vec<u64> = found.iter().map(|e| e.value).collect();
    assert_eq!(values, vec![1, 2]);
}

#[test]
fn test_overflow_until_full_keeps_reads_consistent() {
    // small table, one coordinate: every insert lands in the same bucket
    let mut table = SpatialHashtable::init(
        TableConfig {
            entries_per_bucket: 2,
            ..TableConfig::default()
        },
        16,
    )
    .unwrap();

    let mut inserted = 0u64;
    let err = loop {
        match table.add(10.0, 10.0, inserted) {
            Ok(()) => inserted += 1,
            Err(e) => break e,
        }
    };
    assert!(matches!(err, heron_route::Error::TableFull { .. }));
    assert!(inserted > table.entries_per_bucket() as u64);
    assert_eq!(table.size() as u64, inserted);

    let key = table.algo().encode(10.0, 10.0);
    let found = table.nodes_at_key(key);
    assert_eq!(found.len() as u64, inserted, "entries lost after overflow");
    for (i, entry) in found.iter().enumerate() {
        assert_eq!(entry.value, i as u64, "insertion order broke");
    }

    // a region query walks the same chain
    let by_region = table.nodes_near(10.0, 10.0, 0.5);
    assert_eq!(by_region.len() as u64, inserted);
}
