//! Inspect command - Summarize a saved utility table

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::{
    adapters::MsgPackRepository,
    cli::output::{format_number, print_kv, print_section, print_stats_table, print_subsection},
    ports::UtilityRepository,
    q_learning::{TieBreak, UtilityStore, best},
    state::GameState,
    types::Action,
};

#[derive(Parser, Debug)]
#[command(about = "Summarize a saved utility table", allow_negative_numbers = true)]
pub struct InspectArgs {
    /// Saved utility table (MessagePack)
    pub input: PathBuf,

    /// Number of most visited entries to list
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Show both action values for a state given as `bird_y,gap_center,pipe_distance`
    #[arg(long)]
    pub state: Option<String>,

    /// Action preferred on equal utility when showing the greedy action
    #[arg(long, default_value = "prefer-no-flap")]
    pub tie_break: TieBreak,
}

fn parse_state(value: &str) -> Result<GameState> {
    let fields: Vec<i32> = value
        .split(',')
        .map(|part| part.trim().parse::<i32>())
        .collect::<std::result::Result<_, _>>()
        .with_context(|| format!("Invalid state '{value}'"))?;
    match fields.as_slice() {
        [bird_y, gap_center, pipe_distance] => {
            Ok(GameState::new(*bird_y, *gap_center, *pipe_distance))
        }
        _ => Err(anyhow!(
            "Invalid state '{value}' (expected bird_y,gap_center,pipe_distance)"
        )),
    }
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let snapshot = MsgPackRepository::new()
        .load(&args.input)
        .with_context(|| format!("Failed to load utility table from {}", args.input.display()))?;
    let mut store = snapshot.to_store()?;
    let metadata = &snapshot.metadata;

    print_section(&format!("Utility table: {}", args.input.display()));
    print_stats_table(&[
        ("Episodes", format_number(metadata.episodes as u64)),
        ("Best score", metadata.best_score.to_string()),
        ("Discount", metadata.discount.to_string()),
        ("Decision cadence", metadata.decision_cadence.to_string()),
        ("Bucket (px)", metadata.bucket_px.to_string()),
    ]);

    print_subsection("Contents");
    print_stats_table(&[
        ("Entries", format_number(store.len() as u64)),
        ("States", format_number(store.state_count() as u64)),
        ("Total visits", format_number(store.total_visits())),
    ]);
    if let Some((min, max)) = utility_range(&store) {
        print_kv("Utility range", &format!("{min:.3} .. {max:.3}"));
    }

    if args.top > 0 && !store.is_empty() {
        print_subsection(&format!("Top {} entries by visits", args.top));
        let mut entries = store.sorted_entries();
        entries.sort_by(|a, b| b.1.visit_count.cmp(&a.1.visit_count));
        for (key, entry) in entries.into_iter().take(args.top) {
            println!(
                "  {:<24} {:<8} utility {:>12.3}  visits {}",
                key.state.to_string(),
                key.action.as_str(),
                entry.utility_value,
                format_number(entry.visit_count)
            );
        }
    }

    if let Some(raw) = &args.state {
        let state = parse_state(raw)?;
        print_subsection(&format!("State {state}"));
        let known = Action::ALL
            .iter()
            .any(|&action| store.peek(state, action).is_some());
        if !known {
            println!("  State never seen; both actions default to 0.0");
        }
        for action in Action::ALL {
            let value = store.find(state, action).utility_value;
            print_kv(action.as_str(), &format!("{value:.3}"));
        }
        let greedy = best(&mut store, state, args.tie_break);
        print_kv("Greedy action", greedy.action.as_str());
    }

    Ok(())
}

fn utility_range(store: &UtilityStore) -> Option<(f64, f64)> {
    store
        .iter()
        .map(|(_, entry)| entry.utility_value)
        .fold(None, |range, value| match range {
            None => Some((value, value)),
            Some((min, max)) => Some((f64::min(min, value), f64::max(max, value))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_state() {
        assert_eq!(parse_state("240, 200,-12").unwrap(), GameState::new(240, 200, -12));
        assert!(parse_state("1,2").is_err());
        assert!(parse_state("a,b,c").is_err());
    }

    #[test]
    fn test_utility_range() {
        let mut store = UtilityStore::new();
        assert_eq!(utility_range(&store), None);
        store.get_or_create(GameState::new(0, 0, 0), Action::Flap).utility_value = -5.0;
        store.get_or_create(GameState::new(0, 0, 1), Action::NoFlap).utility_value = 2.5;
        assert_eq!(utility_range(&store), Some((-5.0, 2.5)));
    }
}
