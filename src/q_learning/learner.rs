//! Running-average temporal difference update

use tracing::trace;

use crate::{
    Error, Result,
    q_learning::{
        evaluator::{TieBreak, best},
        utility_store::{EntryKey, UtilityStore},
    },
    state::GameState,
};

/// Default discount factor γ
pub const DEFAULT_DISCOUNT: f64 = 0.4;

/// One-step Q-learning with a per-pair harmonic step size.
///
/// U(s,a) ← (1 − α) U(s,a) + α [r + γ max_a' U(s',a')],  α = 1 / visits(s,a)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TdLearner {
    discount: f64,
    tie_break: TieBreak,
}

impl TdLearner {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `discount` lies in `[0, 1]`.
    pub fn new(discount: f64, tie_break: TieBreak) -> Result<Self> {
        if !(0.0..=1.0).contains(&discount) {
            return Err(Error::config(format!(
                "discount factor must be within [0, 1], got {discount}"
            )));
        }
        Ok(Self {
            discount,
            tie_break,
        })
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Update the pending pair `prior` toward `reward + γ · best(next_state)`.
    ///
    /// Returns the new utility of `prior`.
    ///
    /// # Panics
    ///
    /// Panics if `prior` was never visited through
    /// [`UtilityStore::get_or_create`].
    pub fn update(
        &self,
        store: &mut UtilityStore,
        prior: EntryKey,
        next_state: GameState,
        reward: f64,
    ) -> f64 {
        let bootstrap = best(store, next_state, self.tie_break).value;
        let sample = reward + self.discount * bootstrap;

        let entry = store.find_mut(prior);
        let alpha = entry.learning_rate();
        entry.utility_value = (1.0 - alpha) * entry.utility_value + alpha * sample;

        trace!(
            state = %prior.state,
            action = %prior.action,
            visits = entry.visit_count,
            reward,
            sample,
            utility = entry.utility_value,
            "td update"
        );
        entry.utility_value
    }
}

impl Default for TdLearner {
    fn default() -> Self {
        Self {
            discount: DEFAULT_DISCOUNT,
            tie_break: TieBreak::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;

    fn states() -> (GameState, GameState) {
        (GameState::new(256, 200, 100), GameState::new(250, 200, 97))
    }

    #[test]
    fn test_first_update_replaces_value() {
        let (s, next) = states();
        let mut store = UtilityStore::new();
        store.get_or_create(next, Action::Flap).utility_value = 10.0;

        let learner = TdLearner::default();
        let key = EntryKey::new(s, Action::Flap);
        store.get_or_create(s, Action::Flap).utility_value = -77.0;

        let updated = learner.update(&mut store, key, next, 1.0);
        assert!((updated - (1.0 + 0.4 * 10.0)).abs() < 1e-12);
    }

    #[test]
    fn test_running_average_on_second_visit() {
        let (s, next) = states();
        let mut store = UtilityStore::new();
        let learner = TdLearner::default();
        let key = EntryKey::new(s, Action::Flap);

        store.get_or_create(s, Action::Flap);
        learner.update(&mut store, key, next, 4.0);
        store.get_or_create(s, Action::Flap);
        let updated = learner.update(&mut store, key, next, 2.0);

        // (1 - 1/2) * 4 + 1/2 * 2
        assert!((updated - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_terminal_reward_dominates() {
        let (s, next) = states();
        let mut store = UtilityStore::new();
        let learner = TdLearner::new(0.4, TieBreak::PreferNoFlap).unwrap();
        let key = EntryKey::new(s, Action::NoFlap);
        store.get_or_create(s, Action::NoFlap);

        let updated = learner.update(&mut store, key, next, -10_000.0);
        assert_eq!(updated, -10_000.0);
    }

    #[test]
    #[should_panic(expected = "never visited")]
    fn test_update_without_visit_panics() {
        let (s, next) = states();
        let mut store = UtilityStore::new();
        TdLearner::default().update(&mut store, EntryKey::new(s, Action::Flap), next, 1.0);
    }

    #[test]
    fn test_discount_bounds() {
        assert!(TdLearner::new(1.5, TieBreak::default()).is_err());
        assert!(TdLearner::new(-0.1, TieBreak::default()).is_err());
        assert!(TdLearner::new(0.0, TieBreak::default()).is_ok());
    }
}
