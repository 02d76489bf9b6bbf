//! State-action utility store

use std::collections::{HashMap, HashSet, hash_map::Entry};

use serde::{Deserialize, Serialize};

use crate::{state::GameState, types::Action};

/// Key of one learned value: a state paired with an action taken in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryKey {
    pub state: GameState,
    pub action: Action,
}

impl EntryKey {
    pub fn new(state: GameState, action: Action) -> Self {
        Self { state, action }
    }
}

/// Learned knowledge for one (state, action) pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StateActionEntry {
    /// Estimate of expected discounted return
    pub utility_value: f64,
    /// Number of updates this pair has been selected for
    pub visit_count: u64,
}

impl StateActionEntry {
    /// Harmonic step size `1 / visit_count`.
    ///
    /// # Panics
    ///
    /// Panics when the entry has never been visited; an update must always be
    /// preceded by [`UtilityStore::get_or_create`].
    pub fn learning_rate(&self) -> f64 {
        assert!(
            self.visit_count > 0,
            "learning rate requested for an entry that was never visited"
        );
        1.0 / self.visit_count as f64
    }
}

/// Mapping from (state, action) to learned entries.
///
/// Entries are created lazily and never evicted; the table is the model
/// being trained and is carried across episodes.
#[derive(Debug, Clone, Default)]
pub struct UtilityStore {
    entries: HashMap<EntryKey, StateActionEntry>,
}

impl UtilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for `(state, action)`, created with zero utility and zero visits
    /// if absent. Never changes the visit count.
    pub fn find(&mut self, state: GameState, action: Action) -> &StateActionEntry {
        self.find_mut(EntryKey::new(state, action))
    }

    /// Like [`find`](Self::find) but records one visit before returning.
    ///
    /// Call exactly once per pair selected for a future update.
    pub fn get_or_create(&mut self, state: GameState, action: Action) -> &mut StateActionEntry {
        let entry = self.find_mut(EntryKey::new(state, action));
        entry.visit_count += 1;
        entry
    }

    /// Lookup without creation.
    pub fn peek(&self, state: GameState, action: Action) -> Option<&StateActionEntry> {
        self.entries.get(&EntryKey::new(state, action))
    }

    pub(crate) fn find_mut(&mut self, key: EntryKey) -> &mut StateActionEntry {
        match self.entries.entry(key) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => vacant.insert(StateActionEntry::default()),
        }
    }

    /// Number of (state, action) entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct states with at least one entry.
    pub fn state_count(&self) -> usize {
        self.entries
            .keys()
            .map(|key| key.state)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Sum of visit counts over all entries.
    pub fn total_visits(&self) -> u64 {
        self.entries.values().map(|entry| entry.visit_count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntryKey, &StateActionEntry)> {
        self.entries.iter()
    }

    /// Entries sorted by key, for stable output.
    pub fn sorted_entries(&self) -> Vec<(EntryKey, StateActionEntry)> {
        let mut entries: Vec<_> = self.entries.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub(crate) fn insert(&mut self, key: EntryKey, entry: StateActionEntry) {
        self.entries.insert(key, entry);
    }
}
