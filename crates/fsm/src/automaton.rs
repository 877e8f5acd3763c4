use bit_set::BitSet;
use log::warn;

use crate::record::{Kind, Record, TransitionRecord};
use crate::registry::{Interner, StateId, SymbolId};
use crate::table::{
    DeterministicTable, NondeterministicTable, PushdownTable, StackAction, TransitionTable,
};

// states are interned names; `states` holds the ones actually declared by a
// start designation or a transition. accepting designations are interned
// too but not declared, so an accept-only name never shows up in `states`
#[derive(Debug, Clone)]
pub struct Automaton<T: TransitionTable> {
    pub(crate) names: Interner<StateId>,
    pub(crate) symbols: Interner<SymbolId>,
    pub(crate) start: Option<StateId>,
    pub(crate) states: BitSet,
    pub(crate) accepting: BitSet,
    pub(crate) alphabet: BitSet,
    pub(crate) table: T,
}

pub type Dfa = Automaton<DeterministicTable>;
pub type Nfa = Automaton<NondeterministicTable>;
pub type Pda = Automaton<PushdownTable>;

impl<T: TransitionTable> Default for Automaton<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TransitionTable> Automaton<T> {
    pub fn new() -> Self {
        Self {
            names: Interner::new(),
            symbols: Interner::new(),
            start: None,
            states: BitSet::new(),
            accepting: BitSet::new(),
            alphabet: BitSet::new(),
            table: T::default(),
        }
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let mut automaton = Self::new();
        for record in records {
            automaton.apply(record);
        }
        automaton
    }

    pub fn kind(&self) -> Kind {
        T::KIND
    }

    /// Back to the empty automaton: no start, no states, no transitions.
    pub fn clear(&mut self) {
        self.names.clear();
        self.symbols.clear();
        self.start = None;
        self.states.clear();
        self.accepting.clear();
        self.alphabet.clear();
        self.table.clear();
    }

    pub fn set_start(&mut self, state: &str) {
        let state = self.declare_state(state);
        self.start = Some(state);
    }

    /// Replaces the accepting set. Names need not be declared states.
    pub fn set_accepting<I, S>(&mut self, states: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.accepting.clear();
        for state in states {
            let state = self.names.intern(state.as_ref());
            self.accepting.insert(state.index());
        }
    }

    /// Feeds one construction record. Records that don't apply to this
    /// kind of automaton are dropped with a warning.
    pub fn apply(&mut self, record: Record) {
        match record {
            Record::Start(state) => self.set_start(&state),
            Record::Accepting(states) => self.set_accepting(states),
            Record::Epsilon(symbol) => {
                if T::KIND != Kind::Nfa {
                    warn!("ignoring epsilon symbol `{}` for a {}", symbol, T::KIND);
                    return;
                }
                self.configure_epsilon(&symbol);
            }
            Record::Transition(TransitionRecord {
                from,
                symbol,
                to,
                pop,
                push,
            }) => {
                let (pop, push) = if T::KIND == Kind::Pda {
                    (pop, push)
                } else {
                    if pop.is_some() || push.is_some() {
                        warn!(
                            "ignoring stack action on {} -{}-> {} for a {}",
                            from,
                            symbol,
                            to,
                            T::KIND
                        );
                    }
                    (None, None)
                };
                self.insert_transition(&from, &symbol, &to, pop.as_deref(), push.as_deref());
            }
        }
    }

    /// The construction stream that rebuilds this automaton.
    pub fn describe(&self) -> Vec<Record> {
        let mut records = Vec::new();

        if let Some(epsilon) = self.table.epsilon() {
            records.push(Record::Epsilon(self.symbols.name(epsilon).to_string()));
        }
        if let Some(start) = self.start {
            records.push(Record::Start(self.names.name(start).to_string()));
        }
        records.push(Record::Accepting(
            self.accepting()
                .map(|state| self.names.name(state).to_string())
                .collect(),
        ));

        for (from, symbol, target) in self.table.transitions() {
            let stack = T::stack_action(target);
            for to in T::destinations(target) {
                let record = TransitionRecord::new(
                    self.names.name(from),
                    self.symbols.name(symbol),
                    self.names.name(to),
                )
                .with_stack(
                    stack.pop.map(|s| self.symbols.name(s)),
                    stack.push.map(|s| self.symbols.name(s)),
                );
                records.push(Record::Transition(record));
            }
        }

        records
    }

    pub(crate) fn declare_state(&mut self, state: &str) -> StateId {
        let state = self.names.intern(state);
        self.states.insert(state.index());
        state
    }

    pub(crate) fn configure_epsilon(&mut self, symbol: &str) {
        let symbol = self.symbols.intern(symbol);
        if self.table.set_epsilon(symbol) {
            self.rebuild_alphabet();
        }
    }

    pub(crate) fn insert_transition(
        &mut self,
        from: &str,
        symbol: &str,
        to: &str,
        pop: Option<&str>,
        push: Option<&str>,
    ) {
        let from = self.declare_state(from);
        let to = self.declare_state(to);
        let symbol = self.symbols.intern(symbol);
        if self.table.epsilon() != Some(symbol) {
            self.alphabet.insert(symbol.index());
        }

        let stack = StackAction {
            pop: pop.map(|s| self.symbols.intern(s)),
            push: push.map(|s| self.symbols.intern(s)),
        };
        self.table.insert(from, symbol, T::make_edge(to, stack));
    }

    pub(crate) fn rebuild_alphabet(&mut self) {
        let epsilon = self.table.epsilon();
        self.alphabet = self
            .table
            .transitions()
            .map(|(_, symbol, _)| symbol)
            .filter(|symbol| Some(*symbol) != epsilon)
            .map(|symbol| symbol.index())
            .collect();
    }

    pub fn start(&self) -> Option<StateId> {
        self.start
    }

    /// Declared states in first-seen order.
    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states.iter().map(StateId::from_index)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn accepting(&self) -> impl Iterator<Item = StateId> + '_ {
        self.accepting.iter().map(StateId::from_index)
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting.contains(state.index())
    }

    /// Input symbols seen on transitions, epsilon excluded.
    pub fn alphabet(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.alphabet.iter().map(SymbolId::from_index)
    }

    pub fn state(&self, name: &str) -> Option<StateId> {
        self.names.get(name)
    }

    pub fn state_name(&self, state: StateId) -> &str {
        self.names.name(state)
    }

    pub fn symbol(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name)
    }

    pub fn symbol_name(&self, symbol: SymbolId) -> &str {
        self.symbols.name(symbol)
    }

    /// Resolves an input token to a symbol that may label a non-epsilon
    /// transition. Unknown tokens, the epsilon symbol and stack-only
    /// symbols resolve to `None`.
    pub(crate) fn input_symbol(&self, token: &str) -> Option<SymbolId> {
        self.symbols
            .get(token)
            .filter(|symbol| self.alphabet.contains(symbol.index()))
    }

    pub fn lookup(&self, from: StateId, symbol: SymbolId) -> Option<&T::Target> {
        self.table.lookup(from, symbol)
    }

    pub fn transitions(&self) -> impl Iterator<Item = (StateId, SymbolId, &T::Target)> + '_ {
        self.table.transitions()
    }

    pub fn transition_count(&self) -> usize {
        self.table.len()
    }
}

impl Dfa {
    pub fn add_transition(&mut self, from: &str, symbol: &str, to: &str) {
        self.insert_transition(from, symbol, to, None, None);
    }

    /// Destination of `(from, symbol)` by name.
    pub fn destination(&self, from: &str, symbol: &str) -> Option<&str> {
        let from = self.state(from)?;
        let symbol = self.symbol(symbol)?;
        self.lookup(from, symbol).map(|to| self.state_name(*to))
    }
}

impl Nfa {
    /// Repeated `(from, symbol)` pairs accumulate destinations.
    pub fn add_transition(&mut self, from: &str, symbol: &str, to: &str) {
        self.insert_transition(from, symbol, to, None, None);
    }

    /// Transitions labelled with `symbol` are followed without consuming
    /// input, including ones added before this call.
    pub fn set_epsilon(&mut self, symbol: &str) {
        self.configure_epsilon(symbol);
    }

    pub fn epsilon(&self) -> Option<SymbolId> {
        self.table.epsilon()
    }

    pub fn destinations(&self, from: &str, symbol: &str) -> Vec<&str> {
        let (Some(from), Some(symbol)) = (self.state(from), self.symbol(symbol)) else {
            return Vec::new();
        };
        self.lookup(from, symbol)
            .map(|targets| {
                targets
                    .iter()
                    .map(|to| self.state_name(StateId::from_index(to)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Pda {
    /// `pop` names the symbol required on top of the stack, `push` the one
    /// pushed after it is taken. Re-adding `(from, symbol)` overwrites.
    pub fn add_transition(
        &mut self,
        from: &str,
        symbol: &str,
        to: &str,
        pop: Option<&str>,
        push: Option<&str>,
    ) {
        self.insert_transition(from, symbol, to, pop, push);
    }
}
