use std::collections::HashMap;

use bit_set::BitSet;
use log::debug;

use crate::automaton::Dfa;
use crate::registry::{StateId, SymbolId};
use crate::table::{DeterministicTable, TransitionTable};

// block index per state handle, None for names that aren't declared states
type BlockMap = Vec<Option<usize>>;

impl Dfa {
    // groups states by signature; blocks come out in order of their first
    // member, so a partition that stops splitting reproduces itself exactly
    fn group_by<F>(&self, mut signature: F) -> Vec<BitSet>
    where
        F: FnMut(StateId) -> Vec<Option<usize>>,
    {
        let mut blocks: Vec<BitSet> = Vec::new();
        let mut seen: HashMap<Vec<Option<usize>>, usize> = HashMap::new();

        for state in self.states() {
            let key = signature(state);
            let block = *seen.entry(key).or_insert_with(|| {
                blocks.push(BitSet::new());
                blocks.len() - 1
            });
            blocks[block].insert(state.index());
        }

        blocks
    }

    fn block_map(&self, partition: &[BitSet]) -> BlockMap {
        let mut block_of: BlockMap = vec![None; self.names.len()];
        for (i, block) in partition.iter().enumerate() {
            for state in block.iter() {
                block_of[state] = Some(i);
            }
        }
        block_of
    }

    fn signature(
        &self,
        state: StateId,
        symbols: &[SymbolId],
        block_of: &BlockMap,
    ) -> Vec<Option<usize>> {
        let mut signature = Vec::with_capacity(symbols.len() + 1);
        signature.push(block_of[state.index()]);
        for symbol in symbols {
            let next = self
                .lookup(state, *symbol)
                .and_then(|next| block_of[next.index()]);
            signature.push(next);
        }
        signature
    }

    // Moore's algorithm: split {accepting, non-accepting} until no block
    // splits any further
    fn refine(&self) -> Vec<BitSet> {
        let symbols: Vec<SymbolId> = self.alphabet().collect();

        let mut current = self.group_by(|state| vec![Some(self.is_accepting(state) as usize)]);
        let mut round = 0;
        loop {
            let block_of = self.block_map(&current);
            let next = self.group_by(|state| self.signature(state, &symbols, &block_of));

            round += 1;
            debug!("refinement round {}: {} -> {} classes", round, current.len(), next.len());

            if next == current {
                return current;
            }
            current = next;
        }
    }

    /// Classes of indistinguishable declared states, each in first-seen
    /// order, ordered by their first member.
    pub fn equivalence_classes(&self) -> Vec<Vec<StateId>> {
        self.refine()
            .iter()
            .map(|block| block.iter().map(StateId::from_index).collect())
            .collect()
    }

    /// Prunes unreachable states, then collapses every equivalence class
    /// onto its first member. Every transition is remapped onto
    /// representatives; same-class edges are kept as self loops.
    pub fn minimize(&mut self) {
        let before = self.state_count();
        self.eliminate_unreachable_states();

        let classes = self.refine();
        let mut representative: Vec<Option<StateId>> = vec![None; self.names.len()];
        let mut states = BitSet::new();
        let mut accepting = BitSet::new();

        for class in &classes {
            let Some(first) = class.iter().next() else {
                continue;
            };
            let first = StateId::from_index(first);
            for state in class.iter() {
                representative[state] = Some(first);
            }

            states.insert(first.index());
            if self.is_accepting(first) {
                accepting.insert(first.index());
            }
        }

        let mut table = DeterministicTable::default();
        for (from, symbol, to) in self.table.transitions() {
            let from = representative[from.index()];
            let to = representative[to.index()];
            if let (Some(from), Some(to)) = (from, to) {
                table.insert(from, symbol, to);
            }
        }

        self.start = self.start.and_then(|start| representative[start.index()]);
        self.states = states;
        self.accepting = accepting;
        self.table = table;

        debug!("minimized {} states down to {}", before, self.state_count());
    }
}
