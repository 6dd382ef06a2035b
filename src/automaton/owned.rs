use hashbrown::HashSet;

use super::arena::StateArena;
use super::builder::{BuildError, BuilderCore, Word};
use super::iter::Words;
use super::label::Label;
use super::state::State;

/// A self-contained minimal acyclic automaton over a set of words.
///
/// Unlike the arena-based API, where the caller manages an external arena,
/// `Automaton` owns its allocation: it can be freely moved, stored, and
/// shared. Once built it never changes, so it can be queried from any
/// number of threads without synchronization.
///
/// # Examples
///
/// ```
/// use madfa::automaton::build_automaton;
///
/// let set = build_automaton(["bats", "cats", "rats"]).unwrap();
///
/// assert_eq!(set.len(), 3);
/// assert!(set.contains("cats"));
/// assert!(!set.contains("ats"));
///
/// let words: Vec<String> = set.words().map(String::from_iter).collect();
/// assert_eq!(words, ["bats", "cats", "rats"]);
/// ```
pub struct Automaton<C: Label + 'static> {
    // SAFETY: `root` points into `arena`'s heap-allocated chunks, which
    // never move. Both live in this struct and references handed out are
    // bounded by `&self`, so the pointer stays valid as long as it is
    // reachable. Null encodes the empty set's missing initial state.
    arena: StateArena<C>,
    root: *const State<'static, C>,
    words: usize,
}

// SAFETY: the automaton is immutable after construction — every method
// takes `&self` and no interior mutation is reachable (the arena's cells
// are only touched during the build, before the Automaton exists). The raw
// pointer targets memory owned by `arena`.
unsafe impl<C: Label + 'static> Send for Automaton<C> {}
unsafe impl<C: Label + 'static> Sync for Automaton<C> {}

impl<C: Label + 'static> Automaton<C> {
    /// Returns the initial state, or `None` for the empty set.
    ///
    /// The raw graph can be traversed with
    /// [`transition`](State::transition), [`walk`](State::walk) and
    /// [`edges`](State::edges).
    pub fn root(&self) -> Option<&State<'_, C>> {
        if self.root.is_null() {
            None
        } else {
            // SAFETY: non-null means the pointer targets a state in our
            // arena. State is covariant in its lifetime parameter, so
            // 'static shortens to the borrow of self.
            unsafe { Some(&*self.root) }
        }
    }

    /// Returns the number of stored words.
    pub fn len(&self) -> usize {
        self.words
    }

    /// Returns true if no words are stored.
    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Returns true if `word` is in the set.
    ///
    /// Walks one edge per label and checks the final marker of the state
    /// reached. Never allocates beyond the word's own label buffer, and
    /// never fails: a word that leaves the graph simply is not in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use madfa::automaton::build_automaton;
    ///
    /// let set = build_automaton(["", "bats"]).unwrap();
    /// assert!(set.contains(""));
    /// assert!(set.contains("bats"));
    /// assert!(!set.contains("bat"));
    /// ```
    pub fn contains(&self, word: impl Word<C>) -> bool {
        let word = word.labels();
        match self.root() {
            Some(root) => root.walk(word.iter().copied()).is_some_and(State::is_final),
            None => false,
        }
    }

    /// Returns an enumerator positioned before the first word.
    ///
    /// Words come out in strictly increasing lexicographic order, each
    /// exactly once. Enumerators are independent of each other.
    pub fn words(&self) -> Words<'_, C> {
        Words::new(self.root())
    }

    /// Counts the distinct states reachable from the initial state.
    ///
    /// Minimality makes this the state count of the unique minimal DFA for
    /// the stored set; the empty set has zero states. Intended as a
    /// diagnostic, it walks the whole graph.
    pub fn state_count(&self) -> usize {
        let Some(root) = self.root() else { return 0 };
        let mut visited = HashSet::new();
        let mut stack = vec![root];
        while let Some(state) = stack.pop() {
            if !visited.insert(state as *const State<'_, C>) {
                continue;
            }
            for (_, target) in state.edges() {
                stack.push(target);
            }
        }
        // Only register misses allocate, and every registered state hangs
        // off the chain that leads back to the initial state, so the arena
        // holds exactly the reachable states.
        debug_assert_eq!(visited.len(), self.arena.len());
        visited.len()
    }
}

impl<C: Label + 'static> std::fmt::Debug for Automaton<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Automaton")
            .field("words", &self.words)
            .field("states", &self.state_count())
            .finish()
    }
}

/// Creates a builder with a `'static` lifetime from a `StateArena`.
///
/// # Safety
///
/// The returned builder holds a reference into `arena` transmuted to
/// `'static`. The caller must consume the builder before returning and
/// move the arena into an [`Automaton`] alongside the root pointer.
unsafe fn make_builder<C: Label + 'static>(
    arena: &StateArena<C>,
) -> BuilderCore<'static, C, StateArena<C>> {
    let arena_ref: &'static StateArena<C> = &*(arena as *const StateArena<C>);
    BuilderCore::new(arena_ref)
}

/// Builds an [`Automaton`] from an iterator of words.
///
/// Each word must implement [`Word`]; words **must** be in strictly
/// increasing lexicographic order. On error nothing is returned and all
/// partially built states are dropped.
///
/// # Examples
///
/// ```
/// use madfa::automaton::build_automaton;
///
/// let set = build_automaton(["bake", "cake", "lake"]).unwrap();
/// assert!(set.contains("cake"));
/// assert!(!set.contains("fake"));
/// ```
pub fn build_automaton<C, W>(
    words: impl IntoIterator<Item = W>,
) -> Result<Automaton<C>, BuildError<C>>
where
    C: Label + 'static,
    W: Word<C>,
{
    let arena: StateArena<C> = StateArena::new();

    // SAFETY: the builder is consumed within this function; the root
    // pointer is stored alongside the arena it points into.
    let (root, count) = unsafe {
        let mut builder = make_builder(&arena);
        for word in words {
            builder.add_word(word)?;
        }
        let count = builder.len();
        let root = match builder.finish() {
            Some(root) => root as *const State<'static, C>,
            None => std::ptr::null(),
        };
        (root, count)
    };

    Ok(Automaton {
        arena,
        root,
        words: count,
    })
}
