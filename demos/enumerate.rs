//! Example: building a word set and walking it every way the API allows.
//!
//! Builds a small automaton, runs membership and prefix queries, then
//! enumerates the stored words — once with the low-level
//! `advance`/`current` loop and once through the `Iterator` adapter,
//! with a `reset` in between.
//!
//! Run with: cargo run --example enumerate

use madfa::automaton::build_automaton;

fn main() {
    let input = [
        "bake", "baked", "baker", "bats", "cake", "caked", "cats", "rake", "rats",
    ];
    let set = build_automaton(input).unwrap();

    println!("{} words, {} states", set.len(), set.state_count());

    println!("\nMembership:");
    for word in ["bake", "baker", "bakes", "cats", "rat", "rats"] {
        let verdict = if set.contains(word) { "yes" } else { "no" };
        println!("  {word}: {verdict}");
    }

    println!("\nPrefix reachability:");
    let root = set.root().expect("non-empty set");
    for prefix in ["ba", "cak", "ma", "rat"] {
        let verdict = if root.has_path(prefix.chars()) { "yes" } else { "no" };
        println!("  {prefix}*: {verdict}");
    }

    println!("\nStored words in order:");
    let mut words = set.words();
    while words.advance() {
        println!("  {}", words.current().iter().collect::<String>());
    }

    // The same enumerator can run again from the top.
    words.reset();
    let longest = words.max_by_key(Vec::len).unwrap();
    println!("\nLongest word: {}", longest.into_iter().collect::<String>());
}
