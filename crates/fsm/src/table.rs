use std::collections::BTreeMap;
use std::fmt::Debug;

use bit_set::BitSet;

use crate::record::Kind;
use crate::registry::{StateId, SymbolId};

/// Stack effect of a pushdown transition. `None` on either side means the
/// transition leaves that side of the stack alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StackAction {
    pub pop: Option<SymbolId>,
    pub push: Option<SymbolId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PushdownEdge {
    pub to: StateId,
    pub stack: StackAction,
}

// (state, symbol) -> target, kept ordered by handle so iteration follows
// first-seen order of states and symbols
#[derive(Debug, Clone)]
struct Rows<T> {
    rows: BTreeMap<StateId, BTreeMap<SymbolId, T>>,
}

impl<T> Default for Rows<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Rows<T> {
    fn get(&self, from: StateId, symbol: SymbolId) -> Option<&T> {
        self.rows.get(&from).and_then(|row| row.get(&symbol))
    }

    fn row_mut(&mut self, from: StateId) -> &mut BTreeMap<SymbolId, T> {
        self.rows.entry(from).or_default()
    }

    fn row(&self, from: StateId) -> impl Iterator<Item = (SymbolId, &T)> + '_ {
        self.rows
            .get(&from)
            .into_iter()
            .flat_map(|row| row.iter().map(|(symbol, target)| (*symbol, target)))
    }

    fn iter(&self) -> impl Iterator<Item = (StateId, SymbolId, &T)> + '_ {
        self.rows.iter().flat_map(|(from, row)| {
            row.iter()
                .map(move |(symbol, target)| (*from, *symbol, target))
        })
    }

    // drops rows whose source is not kept, then lets `keep_target` trim or
    // reject each remaining target
    fn retain<F>(&mut self, keep: &BitSet, mut keep_target: F)
    where
        F: FnMut(&mut T) -> bool,
    {
        self.rows.retain(|from, _| keep.contains(from.index()));
        for row in self.rows.values_mut() {
            row.retain(|_, target| keep_target(target));
        }
        self.rows.retain(|_, row| !row.is_empty());
    }

    fn len(&self) -> usize {
        self.rows.values().map(|row| row.len()).sum()
    }

    fn clear(&mut self) {
        self.rows.clear();
    }
}

/// Storage for the transition relation of one automaton kind.
///
/// `Edge` is what construction hands to [`TransitionTable::insert`],
/// `Target` is what [`TransitionTable::lookup`] yields. A missing key is
/// reported as `None`, which simulators turn into a rejection.
pub trait TransitionTable: Default + Clone + Debug {
    const KIND: Kind;

    type Edge;
    type Target: Debug;

    fn insert(&mut self, from: StateId, symbol: SymbolId, edge: Self::Edge);

    fn lookup(&self, from: StateId, symbol: SymbolId) -> Option<&Self::Target>;

    fn row(&self, from: StateId) -> impl Iterator<Item = (SymbolId, &Self::Target)> + '_;

    fn transitions(&self) -> impl Iterator<Item = (StateId, SymbolId, &Self::Target)> + '_;

    fn destinations(target: &Self::Target) -> impl Iterator<Item = StateId> + '_;

    fn make_edge(to: StateId, stack: StackAction) -> Self::Edge;

    fn retain_states(&mut self, keep: &BitSet);

    /// Number of (from, symbol, to) triples.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);

    fn stack_action(_target: &Self::Target) -> StackAction {
        StackAction::default()
    }

    fn epsilon(&self) -> Option<SymbolId> {
        None
    }

    /// Returns false for kinds without epsilon transitions.
    fn set_epsilon(&mut self, _symbol: SymbolId) -> bool {
        false
    }
}

/// One destination per (state, symbol); re-adding a key overwrites it.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTable {
    rows: Rows<StateId>,
}

impl TransitionTable for DeterministicTable {
    const KIND: Kind = Kind::Dfa;

    type Edge = StateId;
    type Target = StateId;

    fn insert(&mut self, from: StateId, symbol: SymbolId, edge: StateId) {
        self.rows.row_mut(from).insert(symbol, edge);
    }

    fn lookup(&self, from: StateId, symbol: SymbolId) -> Option<&StateId> {
        self.rows.get(from, symbol)
    }

    fn row(&self, from: StateId) -> impl Iterator<Item = (SymbolId, &StateId)> + '_ {
        self.rows.row(from)
    }

    fn transitions(&self) -> impl Iterator<Item = (StateId, SymbolId, &StateId)> + '_ {
        self.rows.iter()
    }

    fn destinations(target: &StateId) -> impl Iterator<Item = StateId> + '_ {
        std::iter::once(*target)
    }

    fn make_edge(to: StateId, _stack: StackAction) -> StateId {
        to
    }

    fn retain_states(&mut self, keep: &BitSet) {
        self.rows.retain(keep, |to| keep.contains(to.index()));
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn clear(&mut self) {
        self.rows.clear();
    }
}

/// A destination set per (state, symbol), plus an optional epsilon symbol
/// whose transitions are followed without consuming input.
#[derive(Debug, Clone, Default)]
pub struct NondeterministicTable {
    rows: Rows<BitSet>,
    epsilon: Option<SymbolId>,
}

impl TransitionTable for NondeterministicTable {
    const KIND: Kind = Kind::Nfa;

    type Edge = StateId;
    type Target = BitSet;

    fn insert(&mut self, from: StateId, symbol: SymbolId, edge: StateId) {
        self.rows
            .row_mut(from)
            .entry(symbol)
            .or_default()
            .insert(edge.index());
    }

    fn lookup(&self, from: StateId, symbol: SymbolId) -> Option<&BitSet> {
        self.rows.get(from, symbol)
    }

    fn row(&self, from: StateId) -> impl Iterator<Item = (SymbolId, &BitSet)> + '_ {
        self.rows.row(from)
    }

    fn transitions(&self) -> impl Iterator<Item = (StateId, SymbolId, &BitSet)> + '_ {
        self.rows.iter()
    }

    fn destinations(target: &BitSet) -> impl Iterator<Item = StateId> + '_ {
        target.iter().map(StateId::from_index)
    }

    fn make_edge(to: StateId, _stack: StackAction) -> StateId {
        to
    }

    fn retain_states(&mut self, keep: &BitSet) {
        self.rows.retain(keep, |targets| {
            targets.intersect_with(keep);
            !targets.is_empty()
        });
    }

    fn len(&self) -> usize {
        self.rows
            .iter()
            .map(|(_, _, targets)| targets.len())
            .sum()
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.epsilon = None;
    }

    fn epsilon(&self) -> Option<SymbolId> {
        self.epsilon
    }

    fn set_epsilon(&mut self, symbol: SymbolId) -> bool {
        self.epsilon = Some(symbol);
        true
    }
}

/// Deterministic on (state, input symbol), each entry carrying its stack
/// effect. Re-adding a key overwrites destination and stack effect together.
#[derive(Debug, Clone, Default)]
pub struct PushdownTable {
    rows: Rows<PushdownEdge>,
}

impl TransitionTable for PushdownTable {
    const KIND: Kind = Kind::Pda;

    type Edge = PushdownEdge;
    type Target = PushdownEdge;

    fn insert(&mut self, from: StateId, symbol: SymbolId, edge: PushdownEdge) {
        self.rows.row_mut(from).insert(symbol, edge);
    }

    fn lookup(&self, from: StateId, symbol: SymbolId) -> Option<&PushdownEdge> {
        self.rows.get(from, symbol)
    }

    fn row(&self, from: StateId) -> impl Iterator<Item = (SymbolId, &PushdownEdge)> + '_ {
        self.rows.row(from)
    }

    fn transitions(&self) -> impl Iterator<Item = (StateId, SymbolId, &PushdownEdge)> + '_ {
        self.rows.iter()
    }

    fn destinations(target: &PushdownEdge) -> impl Iterator<Item = StateId> + '_ {
        std::iter::once(target.to)
    }

    fn make_edge(to: StateId, stack: StackAction) -> PushdownEdge {
        PushdownEdge { to, stack }
    }

    fn retain_states(&mut self, keep: &BitSet) {
        self.rows.retain(keep, |edge| keep.contains(edge.to.index()));
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn clear(&mut self) {
        self.rows.clear();
    }

    fn stack_action(target: &PushdownEdge) -> StackAction {
        target.stack
    }
}
