//! Lexicographic enumeration of the stored words.

use smallvec::SmallVec;

use super::label::Label;
use super::state::State;

/// A restartable enumerator over the words an automaton accepts, in
/// strictly increasing lexicographic order.
///
/// The traversal is depth-first and explicit: a stack of states pending a
/// visit, a parallel stack recording the edge that led to each pending
/// state, and one shared label buffer holding the path to the state being
/// visited. Each [`advance`](Words::advance) does only the work of walking
/// to the next accepting state, so enumeration is lazy and never
/// materializes the word list.
///
/// Several enumerators over the same automaton are independent; none of
/// them is tied to the others or to construction state.
///
/// # Examples
///
/// ```
/// use madfa::automaton::build_automaton;
///
/// let set = build_automaton(["bats", "cats", "rats"]).unwrap();
/// let mut words = set.words();
///
/// let mut seen = Vec::new();
/// while words.advance() {
///     seen.push(words.current().iter().collect::<String>());
/// }
/// assert_eq!(seen, ["bats", "cats", "rats"]);
///
/// // `Words` is also a plain iterator.
/// words.reset();
/// assert_eq!(words.count(), 3);
/// ```
pub struct Words<'a, C: Label> {
    root: Option<&'a State<'a, C>>,
    /// States pending a visit, deepest-and-smallest label on top.
    pending: Vec<&'a State<'a, C>>,
    /// Parallel to `pending`: the edge that leads to each pending state as
    /// `(label, depth)`, where `depth` is the length of the path to the
    /// edge's source. `None` only for the initial state.
    trail: Vec<Option<(C, usize)>>,
    buf: SmallVec<[C; 32]>,
}

impl<'a, C: Label> Words<'a, C> {
    /// Creates an enumerator positioned before the first word.
    ///
    /// `root` is the automaton's initial state; `None` enumerates the
    /// empty set.
    pub fn new(root: Option<&'a State<'a, C>>) -> Self {
        let mut words = Words {
            root,
            pending: Vec::new(),
            trail: Vec::new(),
            buf: SmallVec::new(),
        };
        words.reset();
        words
    }

    /// Moves to the next word. Returns false when the set is exhausted.
    ///
    /// Pops pending states, extending the shared buffer along the popped
    /// edge and scheduling the state's out-edges in reverse label order
    /// (so the smallest label is visited next), until an accepting state
    /// is reached.
    pub fn advance(&mut self) -> bool {
        while let Some(state) = self.pending.pop() {
            let record = self
                .trail
                .pop()
                .expect("trail stack runs parallel to pending stack");
            if let Some((label, depth)) = record {
                self.buf.truncate(depth);
                self.buf.push(label);
            }
            let depth = self.buf.len();
            for (label, target) in state.edges().rev() {
                self.pending.push(target);
                self.trail.push(Some((label, depth)));
            }
            if state.is_final() {
                return true;
            }
        }
        false
    }

    /// The word at the current position, as a label slice.
    ///
    /// Only meaningful after [`advance`](Words::advance) returned true:
    /// before the first `advance` the slice is empty, and after exhaustion
    /// its contents are unspecified.
    #[inline]
    pub fn current(&self) -> &[C] {
        &self.buf
    }

    /// Returns to the position before the first word.
    ///
    /// A full enumeration after `reset` yields exactly the same sequence
    /// again.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.pending.clear();
        self.trail.clear();
        if let Some(root) = self.root {
            self.pending.push(root);
            self.trail.push(None);
        }
    }
}

impl<'a, C: Label> Iterator for Words<'a, C> {
    type Item = Vec<C>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().then(|| self.current().to_vec())
    }
}
