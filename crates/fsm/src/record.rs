use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    #[default]
    Dfa,
    Nfa,
    Pda,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown automaton kind `{0}`, expected dfa, nfa or pda")]
pub struct UnknownKind(pub String);

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dfa" => Ok(Kind::Dfa),
            "nfa" => Ok(Kind::Nfa),
            "pda" => Ok(Kind::Pda),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Kind::Dfa => "dfa",
            Kind::Nfa => "nfa",
            Kind::Pda => "pda",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: String,
    pub symbol: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push: Option<String>,
}

impl TransitionRecord {
    pub fn new(from: &str, symbol: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            symbol: symbol.to_string(),
            to: to.to_string(),
            pop: None,
            push: None,
        }
    }

    pub fn with_stack(mut self, pop: Option<&str>, push: Option<&str>) -> Self {
        self.pop = pop.map(str::to_string);
        self.push = push.map(str::to_string);
        self
    }
}

/// One step of the construction stream an automaton is built from, and the
/// form [`crate::Automaton::describe`] hands back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Record {
    Start(String),
    Accepting(Vec<String>),
    Epsilon(String),
    Transition(TransitionRecord),
}
