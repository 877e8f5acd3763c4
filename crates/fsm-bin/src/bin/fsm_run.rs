use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use petgraph::dot::Dot;

use fsm::description::{parse_description, write_description, Description};
use fsm::input::{input_lines, tokenize};
use fsm::{Automaton, Dfa, Kind, Nfa, Pda, Record, Simulate, TransitionTable};

/// Runs every line of an input file through an automaton.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Machine description, text format or .yaml/.yml
    description: PathBuf,
    /// One symbol sequence per line
    input: PathBuf,
    /// Where to write verdicts, stdout if omitted
    output: Option<PathBuf>,
    /// Automaton kind for text descriptions
    #[arg(long, default_value_t = Kind::Dfa)]
    kind: Kind,
    /// Epsilon symbol of an NFA, overriding one named by the description
    #[arg(long)]
    epsilon: Option<String>,
    /// Minimize a DFA before running it
    #[arg(long)]
    minimize: bool,
    /// Write the description back out after loading (and minimizing)
    #[arg(long)]
    write: Option<PathBuf>,
    /// Print the automaton in Graphviz dot format
    #[arg(long)]
    dot: bool,
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn load_records(args: &Args) -> Result<(Kind, Vec<Record>)> {
    let text = fs::read_to_string(&args.description)
        .with_context(|| format!("failed to read description {}", args.description.display()))?;

    let (kind, mut records) = if is_yaml(&args.description) {
        let description = Description::from_yaml(&text)
            .with_context(|| format!("failed to parse {}", args.description.display()))?;
        (description.kind.unwrap_or(args.kind), description.records())
    } else {
        let records = parse_description(args.kind, &text)
            .with_context(|| format!("failed to parse {}", args.description.display()))?;
        (args.kind, records)
    };

    if let Some(epsilon) = &args.epsilon {
        override_epsilon(&mut records, epsilon);
    }
    Ok((kind, records))
}

// appended last so it wins over an epsilon named by the description
fn override_epsilon(records: &mut Vec<Record>, epsilon: &str) {
    records.push(Record::Epsilon(epsilon.to_string()));
}

fn write_back<T: TransitionTable>(automaton: &Automaton<T>, path: &Path) -> Result<()> {
    let records = automaton.describe();
    let text = if is_yaml(path) {
        Description::from_records(automaton.kind(), records).to_yaml()?
    } else {
        write_description(automaton.kind(), &records)
    };
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

fn drive<T>(automaton: &Automaton<T>, args: &Args, input: &str) -> Result<()>
where
    T: TransitionTable,
    Automaton<T>: Simulate,
{
    info!(
        "{} with {} states, {} transitions",
        automaton.kind(),
        automaton.state_count(),
        automaton.transition_count()
    );

    if let Some(path) = &args.write {
        write_back(automaton, path)?;
    }
    if args.dot {
        println!("{}", Dot::with_config(&automaton.to_graph(), &[]));
    }

    let verdicts: Vec<String> = input_lines(input)
        .map(|line| automaton.run(&tokenize(line)).to_string())
        .collect();

    match &args.output {
        Some(path) => {
            let prefix = match automaton.kind() {
                Kind::Dfa | Kind::Nfa => "// ",
                Kind::Pda => "",
            };
            let mut out = String::new();
            for verdict in &verdicts {
                out.push_str(prefix);
                out.push_str(verdict);
                out.push('\n');
            }
            fs::write(path, out).with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => {
            for verdict in &verdicts {
                println!("{}", verdict);
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let (kind, records) = load_records(&args)?;
    let input = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read input {}", args.input.display()))?;

    if args.minimize && kind != Kind::Dfa {
        warn!("--minimize only applies to dfa, ignoring it for {}", kind);
    }

    match kind {
        Kind::Dfa => {
            let mut dfa = Dfa::from_records(records);
            if args.minimize {
                dfa.minimize();
            }
            drive(&dfa, &args, &input)
        }
        Kind::Nfa => drive(&Nfa::from_records(records), &args, &input),
        Kind::Pda => drive(&Pda::from_records(records), &args, &input),
    }
}
