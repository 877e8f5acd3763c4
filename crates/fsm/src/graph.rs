use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Graph;

use crate::automaton::Automaton;
use crate::registry::StateId;
use crate::table::TransitionTable;

impl<T: TransitionTable> Automaton<T> {
    // node labels: "->" marks the start state, a trailing "*" an accepting
    // one. pushdown edges carry "[pop/push]", "-" standing for no action
    pub fn to_graph(&self) -> Graph<String, String> {
        let mut graph: Graph<String, String> = DiGraph::new();
        let mut nodes: HashMap<StateId, NodeIndex> = HashMap::new();

        for state in self.states() {
            let mut label = String::new();
            if self.start == Some(state) {
                label.push_str("->");
            }
            label.push_str(self.state_name(state));
            if self.is_accepting(state) {
                label.push('*');
            }
            nodes.insert(state, graph.add_node(label));
        }

        for (from, symbol, target) in self.transitions() {
            let stack = T::stack_action(target);
            let label = if stack.pop.is_some() || stack.push.is_some() {
                format!(
                    "{} [{}/{}]",
                    self.symbol_name(symbol),
                    stack.pop.map(|s| self.symbol_name(s)).unwrap_or("-"),
                    stack.push.map(|s| self.symbol_name(s)).unwrap_or("-")
                )
            } else {
                self.symbol_name(symbol).to_string()
            };

            for to in T::destinations(target) {
                if let (Some(a), Some(b)) = (nodes.get(&from), nodes.get(&to)) {
                    graph.add_edge(*a, *b, label.clone());
                }
            }
        }

        graph
    }
}
