use std::fmt::Display;

use bit_set::BitSet;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::automaton::{Dfa, Nfa, Pda};
use crate::registry::{StateId, SymbolId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Accept,
    Reject,
    RejectInvalidTransition,
    RejectInvalidFinalState,
}

impl Verdict {
    pub fn is_accept(self) -> bool {
        self == Verdict::Accept
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Verdict::Accept => "Accept",
            Verdict::Reject => "Reject",
            Verdict::RejectInvalidTransition => "Reject: invalid transition",
            Verdict::RejectInvalidFinalState => "Reject: invalid final state",
        };
        write!(f, "{}", text)
    }
}

/// Runs an automaton over a symbol sequence. A run never mutates the
/// automaton; all run state lives on the stack of `run`.
pub trait Simulate {
    fn run<S: AsRef<str>>(&self, symbols: &[S]) -> Verdict;
}

impl Simulate for Dfa {
    fn run<S: AsRef<str>>(&self, symbols: &[S]) -> Verdict {
        let Some(mut state) = self.start else {
            return if symbols.is_empty() {
                Verdict::RejectInvalidFinalState
            } else {
                Verdict::RejectInvalidTransition
            };
        };

        for token in symbols {
            let token = token.as_ref();
            let next = self
                .input_symbol(token)
                .and_then(|symbol| self.lookup(state, symbol));

            match next {
                Some(next) => {
                    trace!("{} -{}-> {}", self.state_name(state), token, self.state_name(*next));
                    state = *next;
                }
                None => {
                    trace!("no transition from {} on {}", self.state_name(state), token);
                    return Verdict::RejectInvalidTransition;
                }
            }
        }

        if self.is_accepting(state) {
            Verdict::Accept
        } else {
            Verdict::RejectInvalidFinalState
        }
    }
}

impl Nfa {
    // union of the epsilon closures of every `symbol` destination
    fn step(&self, current: &BitSet, symbol: SymbolId) -> BitSet {
        let mut reached = BitSet::new();
        for state in current.iter() {
            if let Some(targets) = self.lookup(StateId::from_index(state), symbol) {
                reached.union_with(targets);
            }
        }

        self.epsilon_closure_of(reached.iter().map(StateId::from_index))
    }
}

impl Simulate for Nfa {
    fn run<S: AsRef<str>>(&self, symbols: &[S]) -> Verdict {
        let Some(start) = self.start else {
            return Verdict::Reject;
        };

        let mut current = self.epsilon_closure(start);
        for token in symbols {
            let token = token.as_ref();
            current = match self.input_symbol(token) {
                Some(symbol) => self.step(&current, symbol),
                None => BitSet::new(),
            };
            trace!("after {}: {} live states", token, current.len());

            if current.is_empty() {
                return Verdict::Reject;
            }
        }

        if current.is_disjoint(&self.accepting) {
            Verdict::Reject
        } else {
            Verdict::Accept
        }
    }
}

impl Simulate for Pda {
    fn run<S: AsRef<str>>(&self, symbols: &[S]) -> Verdict {
        let Some(mut state) = self.start else {
            return Verdict::Reject;
        };
        let mut stack: Vec<SymbolId> = Vec::new();

        for token in symbols {
            let token = token.as_ref();
            let Some(edge) = self
                .input_symbol(token)
                .and_then(|symbol| self.lookup(state, symbol))
            else {
                trace!("no transition from {} on {}", self.state_name(state), token);
                return Verdict::Reject;
            };

            if let Some(pop) = edge.stack.pop {
                if stack.last() != Some(&pop) {
                    trace!(
                        "{} -{}-> needs {} on top of the stack",
                        self.state_name(state),
                        token,
                        self.symbol_name(pop)
                    );
                    return Verdict::Reject;
                }
                stack.pop();
            }
            if let Some(push) = edge.stack.push {
                stack.push(push);
            }

            trace!(
                "{} -{}-> {}, stack depth {}",
                self.state_name(state),
                token,
                self.state_name(edge.to),
                stack.len()
            );
            state = edge.to;
        }

        if self.is_accepting(state) && stack.is_empty() {
            Verdict::Accept
        } else {
            Verdict::Reject
        }
    }
}
