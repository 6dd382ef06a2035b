//! # madfa
//!
//! Memory-efficient, immutable string sets backed by a
//! [MADFA](https://en.wikipedia.org/wiki/Deterministic_acyclic_finite_state_automaton)
//! (minimal acyclic deterministic finite-state automaton).
//!
//! Given words in sorted order, the builder produces the unique minimal
//! automaton recognizing exactly that set, using the incremental algorithm
//! of [Daciuk et al. (2000)](https://arxiv.org/abs/cs/0007009v1): the
//! automaton is kept minimal after every insertion by freezing each word's
//! no-longer-extensible suffix into a register of canonical states.
//!
//! ## Features
//!
//! - **Generic over the alphabet**: works with `char`, `u8`, `u16`, or any
//!   type implementing [`Label`](automaton::Label)
//! - **Compact**: shared prefixes *and* suffixes; one state per
//!   equivalence class
//! - **Fast**: O(word length) membership with arena-allocated states
//! - **Ordered**: enumeration yields the stored words in lexicographic
//!   order, lazily and restartably
//! - **Shareable**: a built [`Automaton`](automaton::Automaton) is
//!   immutable, `Send` and `Sync`
//!
//! ## Quick Start
//!
//! The simplest entry point is [`build_automaton`](automaton::build_automaton),
//! which returns a self-contained [`Automaton`](automaton::Automaton):
//!
//! ```
//! use madfa::automaton::build_automaton;
//!
//! let set = build_automaton(["bats", "cats", "rats"]).unwrap();
//!
//! assert_eq!(set.len(), 3);
//! assert!(set.contains("bats"));
//! assert!(!set.contains("bat"));
//!
//! let mut words = set.words();
//! while words.advance() {
//!     println!("{}", words.current().iter().collect::<String>());
//! }
//! ```
//!
//! For explicit control over allocation (requires the `arena` feature,
//! enabled by default):
//!
//! ```
//! # #[cfg(feature = "arena")] {
//! use madfa::automaton::{build_in, Arena};
//!
//! let arena = Arena::new();
//! let root = build_in(&arena, ["bats", "cats", "rats"]).unwrap().unwrap();
//!
//! assert!(root.walk("cats".chars()).is_some_and(|s| s.is_final()));
//! assert!(root.walk("ats".chars()).is_none());
//! # }
//! ```
//!
//! ## Generic Usage
//!
//! The automaton is generic over the edge label type:
//!
//! ```
//! use madfa::automaton::build_automaton;
//!
//! let words: Vec<Vec<u8>> = vec![vec![1, 2, 3], vec![1, 2, 4], vec![2, 3, 4]];
//! let set = build_automaton(words).unwrap();
//!
//! assert!(set.contains([1u8, 2, 3].as_slice()));
//! assert!(!set.contains([1u8, 2, 5].as_slice()));
//! ```

#![warn(missing_docs)]

/// Core automaton data structure: states, builder, enumerator, and the
/// label trait.
pub mod automaton;
