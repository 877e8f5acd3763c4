mod automaton;
mod graph;
mod minimize;
mod reachability;
mod registry;
mod simulate;
mod table;

pub mod description;
pub mod input;
pub mod record;


pub use automaton::{Automaton, Dfa, Nfa, Pda};
pub use reachability::{reachable_from, Follow};
pub use record::{Kind, Record, TransitionRecord, UnknownKind};
pub use registry::{Handle, Interner, StateId, SymbolId};
pub use simulate::{Simulate, Verdict};
pub use table::{
    DeterministicTable, NondeterministicTable, PushdownEdge, PushdownTable, StackAction,
    TransitionTable,
};
