use std::collections::VecDeque;

use bit_set::BitSet;
use log::debug;

use crate::automaton::{Automaton, Nfa};
use crate::registry::{StateId, SymbolId};
use crate::table::TransitionTable;

/// Which transitions a traversal may follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Follow {
    All,
    Only(SymbolId),
}

// basic BFS; a state is enqueued at most once so cycles terminate.
// the roots are always part of the result
pub fn reachable_from<T, I>(table: &T, roots: I, follow: Follow) -> BitSet
where
    T: TransitionTable,
    I: IntoIterator<Item = StateId>,
{
    let mut visited = BitSet::new();
    let mut queue: VecDeque<StateId> = VecDeque::new();

    for root in roots {
        if visited.insert(root.index()) {
            queue.push_back(root);
        }
    }

    while let Some(state) = queue.pop_front() {
        for (symbol, target) in table.row(state) {
            if let Follow::Only(only) = follow {
                if symbol != only {
                    continue;
                }
            }

            for next in T::destinations(target) {
                if visited.insert(next.index()) {
                    queue.push_back(next);
                }
            }
        }
    }

    visited
}

impl<T: TransitionTable> Automaton<T> {
    /// States with a path from the start state, the start state included.
    /// Empty when no start state is set.
    pub fn reachable_states(&self) -> BitSet {
        match self.start {
            Some(start) => reachable_from(&self.table, [start], Follow::All),
            None => BitSet::new(),
        }
    }

    /// Deletes every state without a path from the start state, with its
    /// transitions and accepting membership. Without a start state there is
    /// nothing to measure reachability from and the automaton is left as is.
    pub fn eliminate_unreachable_states(&mut self) {
        if self.start.is_none() {
            debug!("no start state, skipping unreachable state elimination");
            return;
        }

        let reachable = self.reachable_states();
        let before = self.states.len();

        self.states.intersect_with(&reachable);
        self.accepting.intersect_with(&reachable);
        self.table.retain_states(&reachable);
        self.rebuild_alphabet();

        debug!(
            "eliminated {} unreachable states, {} remain",
            before - self.states.len(),
            self.states.len()
        );
    }
}

impl Nfa {
    /// States reachable from `state` in zero or more epsilon steps.
    pub fn epsilon_closure(&self, state: StateId) -> BitSet {
        self.epsilon_closure_of([state])
    }

    pub fn epsilon_closure_of<I>(&self, states: I) -> BitSet
    where
        I: IntoIterator<Item = StateId>,
    {
        match self.table.epsilon() {
            Some(epsilon) => reachable_from(&self.table, states, Follow::Only(epsilon)),
            None => states.into_iter().map(|state| state.index()).collect(),
        }
    }
}
