//! Arena storage for the automaton's frozen states.
//!
//! [`Automaton`](super::owned::Automaton) owns one of these so the owned
//! API needs no external allocator. Every register miss is moved in here
//! and addressed by reference from then on; register equality and hashing
//! compare those addresses, so address stability is a correctness
//! requirement, not a convenience.

use std::cell::RefCell;

use super::builder::StateAlloc;
use super::label::Label;
use super::state::State;

/// Chunk sizing grows geometrically: an automaton over a handful of words
/// stays at one small chunk, while dictionary-sized builds approach one
/// allocation per few thousand states.
const FIRST_CHUNK: usize = 16;
const MAX_CHUNK: usize = 4096;

/// Append-only state storage with stable addresses.
///
/// States live in chunks that are filled only up to their original
/// capacity and then left alone, so handing out a reference never races
/// with a reallocation later.
pub(crate) struct StateArena<C: Label + 'static> {
    chunks: RefCell<Vec<Vec<State<'static, C>>>>,
}

impl<C: Label + 'static> StateArena<C> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        StateArena {
            chunks: RefCell::new(Vec::new()),
        }
    }

    /// Moves `state` into the arena and returns its permanent address.
    pub fn alloc(&self, state: State<'static, C>) -> &State<'static, C> {
        let mut chunks = self.chunks.borrow_mut();
        if chunks.last().is_none_or(|chunk| chunk.len() == chunk.capacity()) {
            let cap = chunks
                .last()
                .map_or(FIRST_CHUNK, |chunk| (chunk.capacity() * 2).min(MAX_CHUNK));
            chunks.push(Vec::with_capacity(cap));
        }
        let chunk = chunks.last_mut().expect("a chunk with room was just ensured");
        chunk.push(state);
        let ptr: *const State<'static, C> = chunk.last().expect("state was just pushed");
        // SAFETY: the push stayed within the chunk's capacity, so the
        // chunk's buffer did not move now and never will — full chunks are
        // never touched again and states are never removed. The RefCell
        // borrow ends here, but `ptr` targets the chunk's heap buffer,
        // which lives as long as the arena.
        unsafe { &*ptr }
    }

    /// Returns the number of states frozen into this arena.
    ///
    /// Every entry was a register miss attached to the path back to the
    /// initial state, so once construction finishes this equals the
    /// minimal automaton's reachable state count.
    pub fn len(&self) -> usize {
        self.chunks.borrow().iter().map(Vec::len).sum()
    }
}

impl<C: Label + 'static> StateAlloc<'static, C> for StateArena<C> {
    fn alloc_state(&'static self, state: State<'static, C>) -> &'static State<'static, C> {
        self.alloc(state)
    }
}
