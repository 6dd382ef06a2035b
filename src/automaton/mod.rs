/// Incremental minimizer building the automaton from sorted words.
pub mod builder;
/// Restartable lexicographic enumeration of the stored words.
pub mod iter;
/// Trait for types usable as edge labels.
pub mod label;
/// Self-contained automaton owning its allocation.
pub mod owned;
/// Automaton states and their ordered out-edges.
pub mod state;
/// Internal chunked arena allocator.
pub(crate) mod arena;

pub use builder::{BuildError, Word};
#[cfg(feature = "arena")]
pub use builder::{build_in, Builder};
pub use iter::Words;
pub use label::Label;
pub use owned::{build_automaton, Automaton};
pub use state::{EdgeIter, State};

/// Re-export of `typed_arena::Arena` for use with the arena-based API.
#[cfg(feature = "arena")]
pub use typed_arena::Arena;

#[cfg(test)]
mod test {
    use super::owned::build_automaton;

    const WORDS: [&str; 69] = [
        "mill", "stone", "grind", "wheat", "flour", "river", "water", "wheel", "barley",
        "oats", "rye", "bread", "bake", "oven", "yeast", "dough", "crust", "crumb", "loaf",
        "flake", "field", "furrow", "plough", "seed", "sow", "reap", "harvest", "scythe",
        "sheaf", "straw", "barn", "granary", "sack", "cart", "horse", "ox", "yoke",
        "miller", "baker", "farmer", "market", "trade", "grain", "kernel", "husk", "chaff",
        "winnow", "sieve", "sift", "meal", "bran", "groat", "malt", "brew", "ale", "cider",
        "press", "apple", "orchard", "bee", "hive", "honey", "wax", "candle", "wick",
        "flame", "hearth", "ember", "smoke",
    ];

    fn sorted_words() -> Vec<&'static str> {
        let mut words = WORDS.to_vec();
        words.sort_unstable();
        words
    }

    #[test]
    fn dictionary_membership() {
        let words = sorted_words();
        let set = build_automaton(words.iter()).unwrap();
        assert_eq!(set.len(), WORDS.len());
        for word in &words {
            assert!(set.contains(*word), "{word} should be in the set");
        }
        for word in ["mil", "stones", "wheatt", "", "flou", "xylophone"] {
            assert!(!set.contains(word), "{word} should not be in the set");
        }
    }

    #[test]
    fn dictionary_enumeration_matches_input() {
        let words = sorted_words();
        let set = build_automaton(words.iter()).unwrap();
        let enumerated: Vec<String> = set.words().map(String::from_iter).collect();
        assert_eq!(enumerated, words);
    }

    #[test]
    fn dictionary_shares_states() {
        let words = sorted_words();
        let set = build_automaton(words.iter()).unwrap();
        let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
        assert!(
            set.state_count() < total_chars,
            "expected sharing: {} states for {} characters",
            set.state_count(),
            total_chars
        );
    }

    #[test]
    fn dictionary_builds_deterministically() {
        let words = sorted_words();
        let a = build_automaton(words.iter()).unwrap();
        let b = build_automaton(words.iter()).unwrap();
        assert_eq!(a.len(), b.len());
        assert_eq!(a.state_count(), b.state_count());
        assert!(a.words().eq(b.words()));
    }
}
