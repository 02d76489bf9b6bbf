//! Greedy value evaluation over the two-action space

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, q_learning::utility_store::UtilityStore, state::GameState, types::Action};

/// Which action wins when both utilities are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    #[default]
    PreferNoFlap,
    PreferFlap,
}

impl TieBreak {
    /// Evaluation order; on equal values the last evaluated action wins.
    fn order(&self) -> [Action; 2] {
        match self {
            TieBreak::PreferNoFlap => [Action::Flap, Action::NoFlap],
            TieBreak::PreferFlap => [Action::NoFlap, Action::Flap],
        }
    }
}

impl FromStr for TieBreak {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prefer-no-flap" | "no-flap" | "no_flap" => Ok(TieBreak::PreferNoFlap),
            "prefer-flap" | "flap" => Ok(TieBreak::PreferFlap),
            other => Err(Error::config(format!(
                "unknown tie-break '{other}'. Use 'prefer-no-flap' or 'prefer-flap'"
            ))),
        }
    }
}

/// Best achievable value in a state and the action achieving it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestAction {
    pub value: f64,
    pub action: Action,
}

/// Compare both actions' stored utilities for `state`.
///
/// Uses [`UtilityStore::find`], so missing entries are created with zero
/// utility but no visit is recorded.
pub fn best(store: &mut UtilityStore, state: GameState, tie_break: TieBreak) -> BestAction {
    let [first, second] = tie_break.order();
    let mut best = BestAction {
        value: store.find(state, first).utility_value,
        action: first,
    };
    let challenger = store.find(state, second).utility_value;
    if challenger >= best.value {
        best = BestAction {
            value: challenger,
            action: second,
        };
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(flap: f64, no_flap: f64) -> (UtilityStore, GameState) {
        let state = GameState::new(10, 20, 30);
        let mut store = UtilityStore::new();
        store.get_or_create(state, Action::Flap).utility_value = flap;
        store.get_or_create(state, Action::NoFlap).utility_value = no_flap;
        (store, state)
    }

    #[test]
    fn test_strictly_greater_wins() {
        let (mut store, state) = seeded(3.0, -1.0);
        let result = best(&mut store, state, TieBreak::PreferNoFlap);
        assert_eq!(result.action, Action::Flap);
        assert_eq!(result.value, 3.0);

        let (mut store, state) = seeded(-5.0, -1.0);
        let result = best(&mut store, state, TieBreak::PreferFlap);
        assert_eq!(result.action, Action::NoFlap);
        assert_eq!(result.value, -1.0);
    }

    #[test]
    fn test_ties_follow_tie_break() {
        let (mut store, state) = seeded(2.0, 2.0);
        assert_eq!(
            best(&mut store, state, TieBreak::PreferNoFlap).action,
            Action::NoFlap
        );
        assert_eq!(
            best(&mut store, state, TieBreak::PreferFlap).action,
            Action::Flap
        );
    }

    #[test]
    fn test_unseen_state_is_zero_and_records_no_visit() {
        let mut store = UtilityStore::new();
        let state = GameState::new(1, 2, 3);
        let result = best(&mut store, state, TieBreak::default());
        assert_eq!(result.value, 0.0);
        assert_eq!(result.action, Action::NoFlap);
        assert_eq!(store.len(), 2);
        assert_eq!(store.total_visits(), 0);
    }

    #[test]
    fn test_parse_tie_break() {
        assert_eq!("prefer-flap".parse::<TieBreak>().unwrap(), TieBreak::PreferFlap);
        assert_eq!("no_flap".parse::<TieBreak>().unwrap(), TieBreak::PreferNoFlap);
        assert!("coin".parse::<TieBreak>().is_err());
    }
}
