//! Machine description files.
//!
//! The text format is line oriented:
//!
//! ```text
//! # optional header lines; `# epsilon: e` names an NFA's epsilon symbol
//! q0                  start state
//! q0, q2              accepting states
//! q0, 1, q1           from, symbol, to              (dfa / nfa)
//! q0, a, , A, q0      from, symbol, pop, push, to   (pda)
//! ```
//!
//! Leading lines containing `#` are headers for every kind, not only PDAs.
//! State and symbol words can never contain `#`, so no DFA or NFA
//! description loses a line to this.
//!
//! DFA and NFA lines are split into words, so states and symbols are runs
//! of `[A-Za-z0-9_]`. PDA transition lines are split on commas, an empty
//! pop or push field meaning no stack action.
//!
//! A YAML form of the same data is available through [`Description`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::words;
use crate::record::{Kind, Record, TransitionRecord};

const EPSILON_HEADER: &str = "epsilon:";

#[derive(Debug, Error)]
pub enum DescriptionError {
    #[error("description is empty, expected a start state line")]
    MissingStart,
    #[error("line {line}: expected {expected} fields in transition `{text}`, found {found}")]
    MalformedTransition {
        line: usize,
        text: String,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: transition `{text}` has an empty state or symbol")]
    EmptyField { line: usize, text: String },
    #[error("invalid YAML description")]
    Yaml(#[from] serde_yaml::Error),
}

fn non_empty(field: &str) -> Option<&str> {
    if field.is_empty() {
        None
    } else {
        Some(field)
    }
}

fn parse_transition(
    kind: Kind,
    line: usize,
    text: &str,
) -> Result<TransitionRecord, DescriptionError> {
    match kind {
        Kind::Dfa | Kind::Nfa => {
            let fields: Vec<&str> = words(text).collect();
            let &[from, symbol, to] = fields.as_slice() else {
                return Err(DescriptionError::MalformedTransition {
                    line,
                    text: text.to_string(),
                    expected: 3,
                    found: fields.len(),
                });
            };
            Ok(TransitionRecord::new(from, symbol, to))
        }
        Kind::Pda => {
            let fields: Vec<&str> = text.split(',').map(str::trim).collect();
            let &[from, symbol, pop, push, to] = fields.as_slice() else {
                return Err(DescriptionError::MalformedTransition {
                    line,
                    text: text.to_string(),
                    expected: 5,
                    found: fields.len(),
                });
            };
            if from.is_empty() || symbol.is_empty() || to.is_empty() {
                return Err(DescriptionError::EmptyField {
                    line,
                    text: text.to_string(),
                });
            }
            Ok(TransitionRecord::new(from, symbol, to).with_stack(non_empty(pop), non_empty(push)))
        }
    }
}

/// Parses the text format into a construction stream.
pub fn parse_description(kind: Kind, text: &str) -> Result<Vec<Record>, DescriptionError> {
    let mut records = Vec::new();
    let mut lines = text.lines().enumerate().peekable();

    // leading lines containing '#' are headers
    while let Some((_, line)) = lines.next_if(|(_, line)| line.contains('#')) {
        let header = line.trim_start_matches(|c: char| c == '#' || c.is_whitespace());
        if let Some(symbol) = header.strip_prefix(EPSILON_HEADER) {
            records.push(Record::Epsilon(symbol.trim().to_string()));
        }
    }

    let (_, start) = lines.next().ok_or(DescriptionError::MissingStart)?;
    if let Some(start) = words(start).next() {
        records.push(Record::Start(start.to_string()));
    }

    let accepting = lines
        .next()
        .map(|(_, line)| words(line).map(str::to_string).collect())
        .unwrap_or_default();
    records.push(Record::Accepting(accepting));

    for (i, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        records.push(Record::Transition(parse_transition(kind, i + 1, line)?));
    }

    Ok(records)
}

/// Renders a construction stream in the text format. The last start and
/// accepting records win, as they would when fed to an automaton.
pub fn write_description(kind: Kind, records: &[Record]) -> String {
    let mut epsilon = None;
    let mut start = "";
    let mut accepting: &[String] = &[];
    let mut transitions = Vec::new();

    for record in records {
        match record {
            Record::Start(state) => start = state.as_str(),
            Record::Accepting(states) => accepting = states.as_slice(),
            Record::Epsilon(symbol) => epsilon = Some(symbol),
            Record::Transition(t) => transitions.push(t),
        }
    }

    let mut out = String::new();
    if let (Kind::Nfa, Some(symbol)) = (kind, epsilon) {
        out.push_str(&format!("# {} {}\n", EPSILON_HEADER, symbol));
    }
    out.push_str(start);
    out.push('\n');
    out.push_str(&accepting.join(", "));
    out.push('\n');

    for t in transitions {
        let line = match kind {
            Kind::Dfa | Kind::Nfa => format!("{}, {}, {}", t.from, t.symbol, t.to),
            Kind::Pda => format!(
                "{}, {}, {}, {}, {}",
                t.from,
                t.symbol,
                t.pop.as_deref().unwrap_or(""),
                t.push.as_deref().unwrap_or(""),
                t.to
            ),
        };
        out.push_str(&line);
        out.push('\n');
    }

    out
}

/// YAML form of a machine description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default)]
    pub accepting: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epsilon: Option<String>,
    #[serde(default)]
    pub transitions: Vec<TransitionRecord>,
}

impl Description {
    pub fn from_yaml(text: &str) -> Result<Description, DescriptionError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn to_yaml(&self) -> Result<String, DescriptionError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_records(kind: Kind, records: Vec<Record>) -> Description {
        let mut description = Description {
            kind: Some(kind),
            ..Description::default()
        };

        for record in records {
            match record {
                Record::Start(state) => description.start = Some(state),
                Record::Accepting(states) => description.accepting = states,
                Record::Epsilon(symbol) => description.epsilon = Some(symbol),
                Record::Transition(t) => description.transitions.push(t),
            }
        }

        description
    }

    // epsilon goes first so its transitions never enter the alphabet
    pub fn records(&self) -> Vec<Record> {
        let mut records = Vec::new();
        if let Some(epsilon) = &self.epsilon {
            records.push(Record::Epsilon(epsilon.clone()));
        }
        if let Some(start) = &self.start {
            records.push(Record::Start(start.clone()));
        }
        records.push(Record::Accepting(self.accepting.clone()));
        records.extend(self.transitions.iter().cloned().map(Record::Transition));
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_dfa() {
        let text = "q0\nq0\nq0, 0, q0\nq0 1 q1\n\nq1,0,q0\n";
        let records = parse_description(Kind::Dfa, text).unwrap();

        assert_eq!(records[0], Record::Start("q0".to_string()));
        assert_eq!(records[1], Record::Accepting(vec!["q0".to_string()]));
        assert_eq!(records[2], Record::Transition(TransitionRecord::new("q0", "0", "q0")));
        assert_eq!(records[3], Record::Transition(TransitionRecord::new("q0", "1", "q1")));
        assert_eq!(records.len(), 5);
    }

    #[test]
    fn parse_pda_with_headers() {
        let text = "# a^n b^n\n# over {a, b}\np\np, q\np, a, , A, p\np, b, A, , q\n";
        let records = parse_description(Kind::Pda, text).unwrap();

        assert_eq!(records[0], Record::Start("p".to_string()));
        assert_eq!(
            records[2],
            Record::Transition(TransitionRecord::new("p", "a", "p").with_stack(None, Some("A")))
        );
        assert_eq!(
            records[3],
            Record::Transition(TransitionRecord::new("p", "b", "q").with_stack(Some("A"), None))
        );
    }

    #[test]
    fn epsilon_header() {
        let text = "# epsilon: e\ns\nf\ns, e, f\n";
        let records = parse_description(Kind::Nfa, text).unwrap();
        assert_eq!(records[0], Record::Epsilon("e".to_string()));

        let written = write_description(Kind::Nfa, &records);
        assert_eq!(written, "# epsilon: e\ns\nf\ns, e, f\n");
    }

    #[test]
    fn malformed_lines() {
        let err = parse_description(Kind::Dfa, "a\na\na, x\n").unwrap_err();
        assert!(matches!(
            err,
            DescriptionError::MalformedTransition { line: 3, expected: 3, found: 2, .. }
        ));

        let err = parse_description(Kind::Pda, "p\np\np, , , , q\n").unwrap_err();
        assert!(matches!(err, DescriptionError::EmptyField { line: 3, .. }));

        assert!(matches!(
            parse_description(Kind::Dfa, ""),
            Err(DescriptionError::MissingStart)
        ));
    }

    #[test]
    fn write_pda() {
        let records = vec![
            Record::Start("p".to_string()),
            Record::Accepting(vec!["p".to_string(), "q".to_string()]),
            Record::Transition(TransitionRecord::new("p", "a", "p").with_stack(None, Some("A"))),
        ];
        let text = write_description(Kind::Pda, &records);
        assert_eq!(text, "p\np, q\np, a, , A, p\n");
        assert_eq!(parse_description(Kind::Pda, &text).unwrap(), records);
    }

    #[test]
    fn yaml_round_trip() {
        let yaml = r#"
kind: pda
start: p
accepting: [q]
transitions:
  - { from: p, symbol: a, to: p, push: A }
  - { from: p, symbol: b, to: q, pop: A }
"#;
        let description = Description::from_yaml(yaml).unwrap();
        assert_eq!(description.kind, Some(Kind::Pda));
        assert_eq!(description.transitions[1].pop.as_deref(), Some("A"));

        let again = Description::from_yaml(&description.to_yaml().unwrap()).unwrap();
        assert_eq!(again, description);

        let rebuilt = Description::from_records(Kind::Pda, description.records());
        assert_eq!(rebuilt, description);
    }
}
