use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use elastic_buckets::{ElasticHashMap, Xxh3State};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::cell::Cell;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Every key is distinct.
    NoCollision,
    /// One key in ten is distinct; the rest are repeats.
    SomeCollision,
    /// Every key is the same.
    MaxCollision,
}

/// Insert/lookup timings for the elastic hash map.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of keys per run
    #[arg(long, value_delimiter = ',', default_values_t = [5000usize, 10000, 30000, 50000])]
    sizes: Vec<usize>,

    /// Key distribution; all of them when omitted
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Distinct keys as a percentage of table capacity
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..=90))]
    load: u64,

    /// Seed for key shuffling and hashing
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,
}

fn keys_for(mode: Mode, n: usize, rng: &mut StdRng) -> Vec<u64> {
    let distinct: usize = (n / 10).max(1);
    let mut keys: Vec<u64> = (1..=n as u64)
        .map(|i| match mode {
            Mode::NoCollision => i,
            Mode::SomeCollision => i % distinct as u64,
            Mode::MaxCollision => 1,
        })
        .collect();
    keys.shuffle(rng);
    keys
}

fn populate(keys: &[u64], capacity: usize, seed: u64) -> Result<ElasticHashMap<u64, u64, Xxh3State>> {
    let mut table: ElasticHashMap<u64, u64, Xxh3State> =
        ElasticHashMap::with_hasher(capacity, Xxh3State::with_seed(seed));
    for &key in keys {
        table
            .upsert(key, key)
            .with_context(|| format!("inserting key {} into a table of {} slots", key, capacity))?;
    }
    for &key in keys {
        if table.find(&key) != Some(&key) {
            bail!("failed to get key {}", key);
        }
    }
    table.validate().context("validating populated table")?;
    Ok(table)
}

/// Average time per `upsert` into a fresh table. Any failed insert aborts
/// the measurement instead of being timed.
fn time_inserts(keys: &[u64], capacity: usize, seed: u64) -> Result<Duration> {
    let failed: Cell<usize> = Cell::new(0);
    let insert = benchmarking::measure_function(|measurer| {
        let mut fresh: ElasticHashMap<u64, u64, Xxh3State> =
            ElasticHashMap::with_hasher(capacity, Xxh3State::with_seed(seed));
        for &key in keys.iter() {
            measurer.measure(|| {
                if fresh.upsert(key, key).is_err() {
                    failed.set(failed.get() + 1);
                }
            });
        }
    })
    .map_err(|err| anyhow!("insert benchmark failed: {:?}", err))?;
    if failed.get() > 0 {
        bail!("{} timed inserts failed in a table of {} slots", failed.get(), capacity);
    }
    Ok(insert.elapsed())
}

fn run(mode: Mode, n: usize, args: &Args) -> Result<()> {
    let mut rng: StdRng = StdRng::seed_from_u64(args.seed);
    let keys: Vec<u64> = keys_for(mode, n, &mut rng);
    let mut distinct: Vec<u64> = keys.clone();
    distinct.sort_unstable();
    distinct.dedup();
    let capacity: usize = (distinct.len() as u64 * 100 / args.load) as usize;

    let table = populate(&keys, capacity, args.seed)?;
    debug!(occupancy = ?table.occupancy(), sub_tables = ?table.sub_table_capacities(), "populated");

    benchmarking::warm_up();
    let insert_ns: u128 = time_inserts(&keys, capacity, args.seed)?.as_nanos();

    let lookup = benchmarking::measure_function(|measurer| {
        for key in keys.iter() {
            measurer.measure(|| table.find(key).is_some());
        }
    })
    .map_err(|err| anyhow!("lookup benchmark failed: {:?}", err))?;

    let lookup_ns: u128 = lookup.elapsed().as_nanos();
    info!(?mode, n, capacity, "run complete");
    println!("Mode {:?} keys {} distinct {}", mode, n, distinct.len());
    println!("Requested capacity {} actual capacity {}", capacity, table.capacity());
    println!("Load factor {:.4}", table.load_factor());
    println!("Avg time to insert {} ns", insert_ns);
    println!("Avg time to lookup {} ns", lookup_ns);
    println!();
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Args = Args::parse();
    let modes: Vec<Mode> = match args.mode {
        Some(mode) => vec![mode],
        None => vec![Mode::NoCollision, Mode::SomeCollision, Mode::MaxCollision],
    };

    for &mode in &modes {
        for &n in &args.sizes {
            run(mode, n, &args).with_context(|| format!("mode {:?}, {} keys", mode, n))?;
        }
    }
    Ok(())
}
