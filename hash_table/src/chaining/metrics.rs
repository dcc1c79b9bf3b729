use hdrhistogram::Histogram;
use rand::distributions::Alphanumeric;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

use super::linked::HashTable;
use crate::hash::{first_byte, polynomial, BuildHasherFn, HashFunction};

fn gen_unique_keys(count: usize, max_len: usize) -> Vec<String> {
    let mut rng = ChaCha8Rng::seed_from_u64(123);
    let mut set = HashSet::with_capacity(count);
    while set.len() < count {
        let len = rng.gen_range(1..=max_len);
        let key: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect();
        set.insert(key);
    }

    let mut keys: Vec<_> = set.into_iter().collect();
    keys.sort();
    keys
}

struct ChainStats {
    lengths: Histogram<u64>,
    empty: usize,
}

fn chain_stats<H>(table: &HashTable<H>) -> ChainStats {
    let mut lengths = Histogram::new(3).unwrap();
    let mut empty = 0;
    for len in table.chain_lengths() {
        if len == 0 {
            empty += 1;
        }
        lengths.record(len as u64).unwrap();
    }

    ChainStats { lengths, empty }
}

#[test]
fn chain_lengths_cover_every_key() {
    let keys = gen_unique_keys(1000, 8);
    let mut table = HashTable::new(16, 0.75, polynomial).unwrap();
    for (v, key) in keys.iter().enumerate() {
        table.insert(key, v as i32).unwrap();
    }

    let stats = chain_stats(&table);
    assert_eq!(stats.lengths.len(), table.capacity() as u64);
    assert_eq!(table.chain_lengths().sum::<usize>(), keys.len());
    assert!(stats.empty < table.capacity());
}

#[test]
fn first_byte_hash_piles_up() {
    let keys = gen_unique_keys(500, 8);
    let mut table = HashTable::new(16, 0.75, first_byte).unwrap();
    for key in &keys {
        table.insert(key, 0).unwrap();
    }

    // only the 62 alphanumeric first bytes can ever be used
    let used = table.chain_lengths().filter(|len| *len > 0).count();
    assert!(used <= 62, "{used}");
}

#[test]
#[ignore = "not really a test but prints chain length distributions for different hash functions"]
fn metrics() {
    #[derive(Debug)]
    #[allow(dead_code)]
    struct StatsPrint {
        min: u64,
        p50: u64,
        p90: u64,
        p99: u64,
        max: u64,
        mean: f64,
        std: f64,
        empty_buckets: usize,
    }

    impl StatsPrint {
        fn new(stats: &ChainStats) -> Self {
            let h = &stats.lengths;
            Self {
                min: h.min(),
                p50: h.value_at_quantile(0.5),
                p90: h.value_at_quantile(0.9),
                p99: h.value_at_quantile(0.99),
                max: h.max(),
                mean: h.mean(),
                std: h.stdev(),
                empty_buckets: stats.empty,
            }
        }
    }

    fn run(name: &str, keys: &[String], load_factor: f64, hash_function: impl HashFunction) {
        let mut table = HashTable::new(16, load_factor, hash_function).unwrap();
        for (v, key) in keys.iter().enumerate() {
            table.insert(key, v as i32).unwrap();
        }

        println!(
            "\n{}\nchains @ load factor={}/{}={:.3}\n  lengths={:#?}",
            name,
            table.len(),
            table.capacity(),
            table.load_factor(),
            StatsPrint::new(&chain_stats(&table))
        );
    }

    let keys = gen_unique_keys(100_000, 12);
    for load_factor in [0.5, 0.75, 1.0] {
        run("first_byte", &keys, load_factor, first_byte);
        run("polynomial", &keys, load_factor, polynomial);
        run("random_state", &keys, load_factor, BuildHasherFn::new());
    }
}
