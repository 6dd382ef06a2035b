use hashbrown::HashSet;
use mark_last::MarkLastIterator;
use smallvec::SmallVec;

use std::error::Error;

#[cfg(feature = "arena")]
use typed_arena::Arena;

use super::label::Label;
use super::state::State;

/// Trait for types that can be fed to the builder as a word.
///
/// Implemented for common string and sequence types so that
/// [`Builder::add_word`] and [`build_in`] accept them directly without
/// manual conversion.
pub trait Word<C: Label> {
    /// Collects this word into a label buffer.
    fn labels(self) -> SmallVec<[C; 32]>;
}

// String types → char

impl Word<char> for &str {
    fn labels(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

impl Word<char> for &&str {
    fn labels(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

impl Word<char> for String {
    fn labels(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

impl Word<char> for &String {
    fn labels(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

// Generic sequence types → C

impl<C: Label> Word<C> for &[C] {
    fn labels(self) -> SmallVec<[C; 32]> {
        self.iter().copied().collect()
    }
}

impl<C: Label> Word<C> for Vec<C> {
    fn labels(self) -> SmallVec<[C; 32]> {
        self.into_iter().collect()
    }
}

impl<C: Label> Word<C> for &Vec<C> {
    fn labels(self) -> SmallVec<[C; 32]> {
        self.iter().copied().collect()
    }
}

impl<C: Label, const N: usize> Word<C> for [C; N] {
    fn labels(self) -> SmallVec<[C; 32]> {
        self.into_iter().collect()
    }
}

impl<C: Label, const N: usize> Word<C> for &[C; N] {
    fn labels(self) -> SmallVec<[C; 32]> {
        self.iter().copied().collect()
    }
}

/// Trait for arena-like allocators that can allocate automaton states.
pub(crate) trait StateAlloc<'a, C: Label> {
    /// Allocates a state and returns a reference with the arena's lifetime.
    fn alloc_state(&'a self, state: State<'a, C>) -> &'a State<'a, C>;
}

#[cfg(feature = "arena")]
impl<'a, C: Label> StateAlloc<'a, C> for Arena<State<'a, C>> {
    fn alloc_state(&'a self, state: State<'a, C>) -> &'a State<'a, C> {
        self.alloc(state)
    }
}

/// One link of the rightmost chain: the state reached by `label` from the
/// link above it (the initial state, for the first link).
struct ChainLink<'a, C: Label> {
    label: C,
    state: State<'a, C>,
}

/// The core incremental minimizer, generic over the allocator type.
///
/// Words must arrive in strictly increasing lexicographic order. The most
/// recent word's path is kept as a mutable chain of by-value states; as
/// soon as a new word diverges from it, the part below the divergence point
/// can never change again and is frozen into the register, reusing an
/// equivalent state whenever one exists. The automaton is therefore minimal
/// after every freeze.
pub(crate) struct BuilderCore<'arena, C: Label, A: StateAlloc<'arena, C>> {
    arena: &'arena A,
    /// The initial state. Mutable until `finish` freezes it last.
    root: State<'arena, C>,
    /// The previous word's path below the initial state: `chain[i].state`
    /// is the state its first `i + 1` labels reach. Nothing outside `root`
    /// and this chain may still change.
    chain: Vec<ChainLink<'arena, C>>,
    register: HashSet<&'arena State<'arena, C>>,
    words: usize,
}

impl<'arena, C: Label, A: StateAlloc<'arena, C>> BuilderCore<'arena, C, A> {
    /// Creates a new builder using the provided allocator.
    pub(crate) fn new(arena: &'arena A) -> Self {
        BuilderCore {
            arena,
            root: State::new(false),
            chain: Vec::new(),
            register: HashSet::default(),
            words: 0,
        }
    }

    /// Returns the number of words added so far.
    pub(crate) fn len(&self) -> usize {
        self.words
    }

    /// Adds the next word.
    pub(crate) fn add_word(&mut self, word: impl Word<C>) -> Result<(), BuildError<C>> {
        let word = word.labels();
        self.add_word_slice(&word)
    }

    fn add_word_slice(&mut self, word: &[C]) -> Result<(), BuildError<C>> {
        if word.is_empty() {
            // Sorted order puts the empty word first; anything else is an
            // order violation (including a duplicate empty word).
            if self.words != 0 {
                return Err(BuildError::OutOfOrder(self.previous_word(), Vec::new()));
            }
            self.root.set_final();
            self.words += 1;
            return Ok(());
        }
        let prefix_len = self.common_prefix(word)?;
        self.freeze_tail(prefix_len);
        self.chain.extend(
            word[prefix_len..]
                .iter()
                .copied()
                .mark_last()
                .map(|(last, label)| ChainLink {
                    label,
                    state: State::new(last),
                }),
        );
        self.words += 1;
        Ok(())
    }

    /// Walks the chain matching `word` and returns the matched length.
    ///
    /// Rejects words that compare less-than-or-equal to the previous word:
    /// a smaller label on the spine means unsorted input, and running out
    /// of characters while still on the spine means the word is a prefix
    /// of (or equal to) its predecessor.
    fn common_prefix(&self, word: &[C]) -> Result<usize, BuildError<C>> {
        let mut prefix_len = 0;
        for (i, &label) in word.iter().enumerate() {
            let is_last = i == word.len() - 1;
            match self.chain.get(prefix_len) {
                Some(link) if label == link.label => {
                    if is_last {
                        // Still on the spine at the word's end: the word
                        // equals or prefixes its predecessor.
                        return Err(BuildError::OutOfOrder(
                            self.previous_word(),
                            word.to_vec(),
                        ));
                    }
                    prefix_len += 1;
                }
                Some(link) if label < link.label => {
                    return Err(BuildError::OutOfOrder(self.previous_word(), word.to_vec()));
                }
                _ => break,
            }
        }
        Ok(prefix_len)
    }

    fn previous_word(&self) -> Vec<C> {
        self.chain.iter().map(|link| link.label).collect()
    }

    /// Freezes the chain below `target_len`, bottom-up.
    ///
    /// Each popped state is replaced by its register equivalent (or becomes
    /// the register entry itself), and only then is the parent edge
    /// appended — so every edge ever created points at a frozen state.
    fn freeze_tail(&mut self, target_len: usize) {
        while self.chain.len() > target_len {
            let link = self
                .chain
                .pop()
                .expect("loop guard keeps the chain non-empty");
            let target = self.freeze(link.state);
            self.attach(link.label, target);
        }
    }

    /// Appends an edge to the deepest state that can still change.
    fn attach(&mut self, label: C, target: &'arena State<'arena, C>) {
        let parent = match self.chain.last_mut() {
            Some(link) => &mut link.state,
            None => &mut self.root,
        };
        parent.add_edge(label, target);
    }

    /// Replace-or-register: returns the canonical representative of
    /// `state`, allocating and registering it if no equivalent exists yet.
    ///
    /// Freezing is strictly bottom-up; the register probe itself
    /// debug-asserts that every target is already frozen (see `State`'s
    /// `Hash` and `PartialEq`).
    fn freeze(&mut self, mut state: State<'arena, C>) -> &'arena State<'arena, C> {
        if let Some(&canonical) = self.register.get(&state) {
            canonical
        } else {
            state.set_frozen();
            let canonical = self.arena.alloc_state(state);
            self.register.insert(canonical);
            canonical
        }
    }

    /// Freezes whatever remains of the last word and returns the initial
    /// state, or `None` if no words were ever added.
    pub(crate) fn finish(mut self) -> Option<&'arena State<'arena, C>> {
        if self.words == 0 {
            return None;
        }
        self.freeze_tail(0);
        let root = std::mem::replace(&mut self.root, State::new(false));
        Some(self.freeze(root))
    }
}

/// A builder that assembles a minimal acyclic automaton one word at a time.
///
/// Words must be added in strictly increasing lexicographic order; the
/// builder reports any violation, duplicates included, as
/// [`BuildError::OutOfOrder`]. Node deduplication happens incrementally, so
/// peak memory tracks the output automaton rather than the input trie.
///
/// The builder borrows a caller-managed arena. For a self-contained
/// automaton that owns its allocation, see
/// [`build_automaton`](super::owned::build_automaton).
#[cfg(feature = "arena")]
pub struct Builder<'arena, C: Label>(BuilderCore<'arena, C, Arena<State<'arena, C>>>);

#[cfg(feature = "arena")]
impl<'arena, C: Label> Builder<'arena, C> {
    /// Creates a builder that allocates states in `arena`.
    pub fn new(arena: &'arena Arena<State<'arena, C>>) -> Self {
        Builder(BuilderCore::new(arena))
    }

    /// Adds the next word.
    ///
    /// The word can be any type implementing [`Word`], including `&str`,
    /// `String`, `&[u8]`, `Vec<u8>`, or fixed-size arrays.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::OutOfOrder`] if the word is not strictly
    /// greater than the previously added word.
    pub fn add_word(&mut self, word: impl Word<C>) -> Result<(), BuildError<C>> {
        self.0.add_word(word)
    }

    /// Returns the number of words added so far.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no words have been added.
    pub fn is_empty(&self) -> bool {
        self.0.len() == 0
    }

    /// Finalizes construction and returns the initial state, or `None` if
    /// no words were added.
    ///
    /// Consumes the builder; the final freeze pass canonicalizes the last
    /// word's path and the initial state itself.
    pub fn finish(self) -> Option<&'arena State<'arena, C>> {
        self.0.finish()
    }
}

/// Errors that can occur while building an automaton.
#[derive(Debug, PartialEq, Eq)]
pub enum BuildError<C: Label> {
    /// Words were not in strictly increasing lexicographic order.
    ///
    /// Carries the two offending words: the one added earlier, then the
    /// one that failed. A duplicate word reports itself in both positions.
    OutOfOrder(Vec<C>, Vec<C>),
}

impl<C: Label> std::fmt::Display for BuildError<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::OutOfOrder(prev, word) => {
                write!(f, "words out of order: {prev:?} was added before {word:?}")
            }
        }
    }
}

impl<C: Label> Error for BuildError<C> {}

/// Builds a minimal acyclic automaton in a caller-managed arena and returns
/// its initial state.
///
/// Each word must implement [`Word`], so `&str`, `String`, slices, vectors
/// and arrays all work. Words **must** be in strictly increasing
/// lexicographic order; any violation makes the whole build fail.
///
/// Returns `None` inside the `Ok` when `words` is empty — the automaton for
/// the empty set has no initial state.
///
/// # Examples
///
/// ```
/// use madfa::automaton::{build_in, Arena};
///
/// let arena = Arena::new();
/// let root = build_in(&arena, ["bats", "cats", "rats"]).unwrap().unwrap();
///
/// assert!(root.walk("cats".chars()).is_some_and(|s| s.is_final()));
/// assert!(root.walk("bat".chars()).is_some_and(|s| !s.is_final()));
/// assert!(root.walk("ats".chars()).is_none());
/// ```
///
/// Byte sequences work the same way:
///
/// ```
/// use madfa::automaton::{build_in, Arena};
///
/// let arena = Arena::new();
/// let words: Vec<Vec<u8>> = vec![vec![1, 2, 3], vec![1, 2, 4], vec![2, 3, 4]];
/// let root = build_in(&arena, words).unwrap().unwrap();
///
/// assert!(root.walk([1, 2, 3]).is_some_and(|s| s.is_final()));
/// assert!(root.walk([1, 2, 5]).is_none());
/// ```
#[cfg(feature = "arena")]
pub fn build_in<'arena, C, W>(
    arena: &'arena Arena<State<'arena, C>>,
    words: impl IntoIterator<Item = W>,
) -> Result<Option<&'arena State<'arena, C>>, BuildError<C>>
where
    C: Label,
    W: Word<C>,
{
    let mut builder = Builder::new(arena);
    for word in words {
        builder.add_word(word)?;
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod test {
    use super::*;

    #[cfg(feature = "arena")]
    fn order_err(prev: &str, word: &str) -> BuildError<char> {
        BuildError::OutOfOrder(prev.chars().collect(), word.chars().collect())
    }

    #[cfg(feature = "arena")]
    fn contains<C: Label>(root: &State<C>, word: impl IntoIterator<Item = C>) -> bool {
        root.walk(word).is_some_and(State::is_final)
    }

    #[cfg(feature = "arena")]
    #[test]
    fn single_word_chain() {
        let arena = Arena::new();
        let root = build_in(&arena, ["stone"]).unwrap().unwrap();
        assert!(contains(root, "stone".chars()));
        assert!(!contains(root, "ston".chars()));
        assert!(!contains(root, "stones".chars()));
        // One state per character plus the initial state.
        assert_eq!(arena.len(), "stone".len() + 1);
    }

    #[cfg(feature = "arena")]
    #[test]
    fn suffix_chains_collapse() {
        let arena1 = Arena::new();
        build_in(&arena1, ["almost"]).unwrap();

        // Words that peel off into the same tail reuse its states, so the
        // automaton is no bigger than for a single word.
        let arena2 = Arena::new();
        build_in(&arena2, ["almost", "amost", "aost", "at"]).unwrap();
        assert_eq!(arena1.len(), arena2.len());
    }

    #[cfg(feature = "arena")]
    #[test]
    fn suffix_chains_collapse_unicode() {
        let arena1 = Arena::new();
        build_in(&arena1, ["授人以鱼不如授人以渔"]).unwrap();

        let arena2 = Arena::new();
        build_in(&arena2, ["授人以渔", "授人以鱼不如授人以渔"]).unwrap();
        assert_eq!(arena1.len(), arena2.len());
    }

    #[cfg(feature = "arena")]
    #[test]
    fn sorted_words_build() {
        let arena = Arena::new();
        let res = build_in(&arena, ["east", "north", "south", "west"]);
        assert!(res.is_ok());
    }

    #[cfg(feature = "arena")]
    #[test]
    fn every_unsorted_permutation_is_rejected() {
        use itertools::Itertools;
        const SORTED: [&str; 8] = [
            "ash", "beech", "cedar", "elm", "fir", "oak", "pine", "yew",
        ];
        let arena = Arena::new();
        let mut accepted = 0;
        for words in SORTED.iter().cloned().permutations(SORTED.len()) {
            let is_sorted = words == SORTED;
            let res = build_in(&arena, &words);
            assert_eq!(res.is_ok(), is_sorted);
            accepted += is_sorted as i32;
        }
        assert_eq!(accepted, 1);
    }

    #[cfg(feature = "arena")]
    #[test]
    fn duplicate_word_is_rejected() {
        let arena = Arena::new();
        let res = build_in(&arena, ["ash", "beech", "cedar", "cedar"]);
        assert_eq!(res.unwrap_err(), order_err("cedar", "cedar"));
    }

    #[cfg(feature = "arena")]
    #[test]
    fn order_error_names_the_offending_pair() {
        let arena = Arena::new();
        let res = build_in(&arena, ["ash", "beech", "cedar", "elm", "oak", "fir"]);
        assert_eq!(res.unwrap_err(), order_err("oak", "fir"));

        let arena = Arena::new();
        let res = build_in(&arena, ["yew", "ash", "beech"]);
        assert_eq!(res.unwrap_err(), order_err("yew", "ash"));
    }

    #[cfg(feature = "arena")]
    #[test]
    fn prefix_before_extension() {
        let arena = Arena::new();
        let root = build_in(&arena, ["car", "cart"]).unwrap().unwrap();
        assert!(contains(root, "car".chars()));
        assert!(contains(root, "cart".chars()));
        assert!(!contains(root, "ca".chars()));
    }

    #[cfg(feature = "arena")]
    #[test]
    fn extension_after_prefix_is_rejected() {
        // "cart" < "car" is an order violation: prefixes sort first.
        let arena = Arena::new();
        let res = build_in(&arena, ["cart", "car"]);
        assert_eq!(res.unwrap_err(), order_err("cart", "car"));
    }

    #[cfg(feature = "arena")]
    #[test]
    fn empty_word_first() {
        let arena = Arena::new();
        let root = build_in(&arena, ["", "a"]).unwrap().unwrap();
        assert!(root.is_final());
        assert!(contains(root, "a".chars()));
        assert!(!contains(root, "b".chars()));
    }

    #[cfg(feature = "arena")]
    #[test]
    fn empty_word_alone() {
        let arena = Arena::new();
        let root = build_in(&arena, [""]).unwrap().unwrap();
        assert!(root.is_final());
        assert_eq!(root.edge_count(), 0);
        assert_eq!(arena.len(), 1);
    }

    #[cfg(feature = "arena")]
    #[test]
    fn empty_word_after_another_is_rejected() {
        let arena = Arena::new();
        let res = build_in(&arena, ["a", ""]);
        assert_eq!(res.unwrap_err(), order_err("a", ""));
    }

    #[cfg(feature = "arena")]
    #[test]
    fn duplicate_empty_word_is_rejected() {
        let arena = Arena::new();
        let res = build_in(&arena, ["", ""]);
        assert_eq!(res.unwrap_err(), order_err("", ""));
    }

    #[cfg(feature = "arena")]
    #[test]
    fn no_words_means_no_initial_state() {
        let arena = Arena::new();
        let root = build_in::<char, &str>(&arena, []).unwrap();
        assert!(root.is_none());
        assert_eq!(arena.len(), 0);
    }

    #[cfg(feature = "arena")]
    #[test]
    fn builder_tracks_word_count() {
        let arena = Arena::new();
        let mut builder = Builder::new(&arena);
        assert!(builder.is_empty());
        builder.add_word("ash").unwrap();
        builder.add_word("oak").unwrap();
        assert_eq!(builder.len(), 2);
        // A rejected word leaves the count unchanged.
        assert!(builder.add_word("oak").is_err());
        assert_eq!(builder.len(), 2);
    }

    #[cfg(feature = "arena")]
    #[test]
    fn shared_tail_states_are_identical() {
        let words = [
            "blight", "bright", "flight", "fright", "midnight", "slight",
        ];
        let arena = Arena::new();
        let root = build_in(&arena, words).unwrap().unwrap();
        // The state one label into the shared "ight" tail.
        let tail = root.walk("bli".chars()).unwrap();
        for word in words {
            if let Some(stem) = word.strip_suffix("ight") {
                let reached = root.walk(word[..stem.len() + 1].chars()).unwrap();
                assert!(std::ptr::addr_eq(reached, tail));
            }
        }
    }

    #[cfg(feature = "arena")]
    #[test]
    fn generic_u8_words() {
        let arena = Arena::new();
        let mut builder = Builder::<u8>::new(&arena);
        builder.add_word([1, 2, 3]).unwrap();
        builder.add_word([1, 2, 4]).unwrap();
        builder.add_word([2, 3, 4]).unwrap();
        let root = builder.finish().unwrap();
        assert!(contains(root, [1, 2, 3]));
        assert!(contains(root, [1, 2, 4]));
        assert!(contains(root, [2, 3, 4]));
        assert!(!contains(root, [1, 2, 5]));
        assert!(!contains(root, [1, 2]));
    }
}
