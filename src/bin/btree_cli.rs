//! Workload driver for the B-tree index.
//!
//! Usage:
//!   btree_cli demo
//!   btree_cli bench <count> [order] [seq|rand|shuffled]
//!   btree_cli validate <count> [order] [seq|rand|shuffled]
//!   btree_cli dump <count> [order]

use btree_index::{BTree, Key, DEFAULT_ORDER};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::env;
use std::process::exit;
use std::time::Instant;

const SEED: u64 = 0x5EED;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        usage();
        exit(1);
    }

    match args[1].as_str() {
        "demo" => demo(),
        "bench" => workload(&args, true),
        "validate" => workload(&args, false),
        "dump" => dump(&args),
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            usage();
            exit(1);
        }
    }
}

fn usage() {
    eprintln!("Usage: btree_cli <command> [args...]");
    eprintln!("Commands:");
    eprintln!("  demo                                  - Small walkthrough of the API");
    eprintln!("  bench <count> [order] [pattern]       - Timed insert + search workload");
    eprintln!("  validate <count> [order] [pattern]    - Build a tree and validate it");
    eprintln!("  dump <count> [order]                  - Print the tree shape as JSON");
    eprintln!("Patterns: seq (default), rand, shuffled");
}

fn parse_count(args: &[String]) -> usize {
    match args.get(2).map(|s| s.parse::<usize>()) {
        Some(Ok(n)) if n > 0 => n,
        _ => {
            eprintln!("ERROR: expected a positive count");
            exit(1);
        }
    }
}

fn parse_order(args: &[String]) -> u32 {
    match args.get(3) {
        None => DEFAULT_ORDER,
        Some(s) => match s.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("ERROR: invalid order '{}'", s);
                exit(1);
            }
        },
    }
}

fn generate_keys(count: usize, pattern: &str) -> Vec<Key> {
    let mut rng = StdRng::seed_from_u64(SEED);
    match pattern {
        "seq" => (1..=count as Key).collect(),
        "shuffled" => {
            let mut keys: Vec<Key> = (1..=count as Key).collect();
            keys.shuffle(&mut rng);
            keys
        }
        "rand" => (0..count)
            .map(|_| rng.gen_range(1..=(count as Key) * 8))
            .collect(),
        _ => {
            eprintln!("ERROR: unknown pattern '{}'", pattern);
            exit(1);
        }
    }
}

fn build_tree(args: &[String]) -> (BTree<Key>, Vec<Key>) {
    let count = parse_count(args);
    let order = parse_order(args);
    let pattern = args.get(4).map(String::as_str).unwrap_or("seq");
    let keys = generate_keys(count, pattern);

    let mut tree = match BTree::new(order) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            exit(1);
        }
    };

    let start = Instant::now();
    for &key in &keys {
        if let Err(e) = tree.insert(key, key) {
            eprintln!("ERROR inserting {}: {}", key, e);
            exit(1);
        }
    }
    let elapsed = start.elapsed();

    println!("INSERTED: {}", keys.len());
    println!("TIME_MS: {}", elapsed.as_millis());
    println!(
        "OPS_PER_SEC: {:.0}",
        keys.len() as f64 / elapsed.as_secs_f64()
    );

    (tree, keys)
}

fn workload(args: &[String], bench: bool) {
    let (tree, keys) = build_tree(args);

    if bench {
        let start = Instant::now();
        let mut hits = 0usize;
        for &key in &keys {
            if tree.contains(key) {
                hits += 1;
            }
        }
        let elapsed = start.elapsed();
        println!("SEARCHED: {} ({} hits)", keys.len(), hits);
        println!("SEARCH_TIME_MS: {}", elapsed.as_millis());
        println!(
            "SEARCH_OPS_PER_SEC: {:.0}",
            keys.len() as f64 / elapsed.as_secs_f64()
        );
    }

    println!("VALID: {}", tree.validate());
    println!("--- stats ---");
    println!("{}", tree.stats());
}

fn dump(args: &[String]) {
    let count = parse_count(args);
    let order = parse_order(args);

    let mut tree = match BTree::new(order) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            exit(1);
        }
    };
    for key in 1..=count as Key {
        // insert into a fresh tree cannot fail
        let _ = tree.insert(key, key);
    }

    match serde_json::to_string_pretty(&tree.export()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            exit(1);
        }
    }
}

fn demo() {
    let mut tree = BTree::new(4).expect("order 4 is valid");
    for key in [50, 25, 75, 10, 30, 60, 90] {
        tree.insert(key, key * 10).expect("insert");
    }

    println!("size: {}", tree.len());
    println!("height: {}", tree.height());
    println!("contains(60): {}", tree.contains(60));
    println!("contains(61): {}", tree.contains(61));

    let keys: Vec<Key> = tree.iter().map(|(key, _)| key).collect();
    println!("in order: {:?}", keys);

    let mut cursor = tree.cursor();
    if cursor.seek(26) {
        if let Ok((key, value)) = cursor.entry() {
            println!("seek(26) -> ({}, {})", key, value);
        }
    }

    println!("valid: {}", tree.validate());
    println!("--- stats ---");
    println!("{}", tree.stats());
}
