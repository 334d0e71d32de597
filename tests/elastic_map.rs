use elastic_buckets::{BuildIdentityHasher, Config, ElasticError, ElasticHashMap, Placement, Xxh3State};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[test]
fn distinct_keys_round_trip_until_full() {
    let mut rng: StdRng = StdRng::seed_from_u64(2024);
    let mut keys: Vec<u64> = (0..20_000).collect();
    keys.shuffle(&mut rng);

    let mut map: ElasticHashMap<u64, String, Xxh3State> =
        ElasticHashMap::with_hasher(16_384, Xxh3State::with_seed(11));
    let mut stored: Vec<u64> = Vec::new();
    let mut failures: usize = 0;
    for &key in &keys {
        match map.upsert(key, format!("v{}", key)) {
            Ok(placement) => {
                assert_eq!(placement, Placement::Inserted);
                stored.push(key);
            }
            Err(ElasticError::InsertionFailed { capacity, .. }) => {
                assert_eq!(capacity, 16_384);
                failures += 1;
            }
            Err(err) => panic!("unexpected error: {}", err),
        }
    }

    // More keys than slots: some must be turned away, none silently dropped.
    assert!(failures > 0);
    assert_eq!(stored.len() + failures, keys.len());
    assert_eq!(map.len(), stored.len());
    assert!(map.len() <= map.capacity());
    for key in &stored {
        assert_eq!(map.find(key), Some(&format!("v{}", key)));
    }
    map.validate().unwrap();

    let caps: Vec<usize> = map.sub_table_capacities();
    for (occupied, cap) in map.occupancy().iter().zip(&caps) {
        assert!(occupied <= cap);
    }
}

#[test]
fn failed_insert_leaves_table_untouched() {
    let mut map: ElasticHashMap<u64, u64, BuildIdentityHasher> =
        ElasticHashMap::with_hasher(8, BuildIdentityHasher::default());
    for k in 0..8u64 {
        map.upsert(k, k).unwrap();
    }
    let before: Vec<usize> = map.occupancy();
    assert!(map.upsert(100, 1).is_err());
    assert!(map.get_or_insert_default(101).is_err());
    assert_eq!(map.occupancy(), before);
    assert_eq!(map.len(), 8);

    // Existing keys can still be overwritten on a closed table.
    assert_eq!(map.upsert(3, 33).unwrap(), Placement::Updated);
    assert_eq!(map.find(&3), Some(&33));
}

#[test]
fn yaml_config_drives_the_table() {
    let cfg: Config = Config::from_yaml("probe_limit: 2\nmax_fill_percent: 50\nmin_capacity: 16\n").unwrap();
    let mut map: ElasticHashMap<u64, u64, BuildIdentityHasher> =
        ElasticHashMap::with_config(1, cfg, BuildIdentityHasher::default()).unwrap();
    assert_eq!(map.capacity(), 16);
    assert_eq!(map.sub_table_capacities(), vec![8, 4, 2, 2]);
    assert_eq!(map.config().probe_limit, 2);

    // Half of each sub-table, at most.
    let mut k: u64 = 0;
    while map.upsert(k, k).is_ok() {
        k += 1;
    }
    for (occupied, cap) in map.occupancy().iter().zip(map.sub_table_capacities()) {
        assert!(occupied * 100 <= cap * 50 + 100);
    }
    map.validate().unwrap();
}

#[test]
fn string_keys_accept_borrowed_lookups() {
    let mut map: ElasticHashMap<String, Vec<&str>> = ElasticHashMap::new(128);
    for (owner, item) in [("ann", "pen"), ("bob", "cup"), ("ann", "map")] {
        map.get_or_insert_default(owner.to_string()).unwrap().push(item);
    }
    assert_eq!(map.find("ann"), Some(&vec!["pen", "map"]));
    assert_eq!(map.find("bob"), Some(&vec!["cup"]));
    assert!(!map.contains("cyd"));
    assert!(map.update("bob", vec![]));
    assert_eq!(map.find("bob"), Some(&vec![]));
}

#[test]
fn identity_hasher_spreads_string_keys() {
    let mut map: ElasticHashMap<String, usize, BuildIdentityHasher> =
        ElasticHashMap::with_hasher(1024, BuildIdentityHasher::default());
    for i in 0..100usize {
        map.upsert(format!("key{}", i), i).unwrap();
    }
    assert_eq!(map.len(), 100);
    // A single shared base index would cap the first sub-table at one probe run.
    assert!(map.occupancy()[0] > 16);
    for i in 0..100usize {
        assert_eq!(map.find(format!("key{}", i).as_str()), Some(&i));
    }
    map.validate().unwrap();
}
