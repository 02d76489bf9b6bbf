//! Per-tick decision loop: capture state, learn, act, advance.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    Error, Result,
    app::LearningConfig,
    ports::{InputSource, Simulation},
    q_learning::{EntryKey, TdLearner, UtilityStore, best},
    rewards::RewardPolicy,
    state::{GameState, StateEncoder},
    types::{Action, Signal},
};

/// Where the loop stands with respect to the decision cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// The next tick is a decision tick.
    AwaitingActionTick,
    /// Continuing the last chosen action until the next decision tick.
    Simulating,
    /// The episode ended; call [`DecisionLoop::start_episode`] before ticking again.
    Terminal,
}

/// An action chosen on a decision tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub tick: u64,
    pub state: GameState,
    pub action: Action,
    /// The action came from the input collaborator rather than the policy.
    pub overridden: bool,
}

/// A temporal difference update applied on this tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpdateRecord {
    pub tick: u64,
    pub key: EntryKey,
    pub next_state: GameState,
    pub reward: f64,
    pub utility: f64,
    pub terminal: bool,
}

/// Final numbers of one episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub score: u32,
    pub ticks: u64,
    pub decisions: u64,
    /// Utility store size when the episode ended
    pub entries: usize,
    /// Ended by collision or leaving the world, as opposed to being cut short
    pub terminal: bool,
}

/// What happened on one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickStatus {
    Running,
    EpisodeOver(EpisodeSummary),
    /// The input collaborator asked to stop; nothing was learned or advanced.
    /// A quit on a terminal tick is reported as [`TickStatus::EpisodeOver`]
    /// with [`TickReport::quit_requested`] set instead.
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub status: TickStatus,
    pub decision: Option<DecisionRecord>,
    pub update: Option<UpdateRecord>,
    /// Quit arrived on the tick that ended the episode; the terminal
    /// update was still applied.
    pub quit_requested: bool,
}

impl TickReport {
    fn with_status(status: TickStatus) -> Self {
        Self {
            status,
            decision: None,
            update: None,
            quit_requested: false,
        }
    }
}

/// Greedy tabular agent driving a [`Simulation`] one tick at a time.
///
/// Owns the [`UtilityStore`]; only per-episode scalars are reset between
/// episodes.
#[derive(Debug, Clone)]
pub struct DecisionLoop {
    store: UtilityStore,
    learner: TdLearner,
    encoder: StateEncoder,
    rewards: RewardPolicy,
    cadence: u32,
    phase: Phase,
    episode: usize,
    episodes_started: usize,
    episode_tick: u64,
    ticks_since_decision: u32,
    decisions: u64,
    current_state: Option<GameState>,
    pending: Option<EntryKey>,
}

impl DecisionLoop {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` fails validation.
    pub fn new(store: UtilityStore, config: &LearningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            learner: TdLearner::new(config.discount, config.tie_break)?,
            encoder: StateEncoder::new(config.bucket_px)?,
            rewards: config.rewards,
            cadence: config.decision_cadence,
            phase: Phase::Terminal,
            episode: 0,
            episodes_started: 0,
            episode_tick: 0,
            ticks_since_decision: 0,
            decisions: 0,
            current_state: None,
            pending: None,
        })
    }

    /// Reset the simulation and all per-episode state. The store carries over.
    pub fn start_episode(&mut self, sim: &mut dyn Simulation) {
        sim.reset();
        self.episode = self.episodes_started;
        self.episodes_started += 1;
        self.episode_tick = 0;
        self.ticks_since_decision = 0;
        self.decisions = 0;
        self.current_state = None;
        self.pending = None;
        self.phase = Phase::AwaitingActionTick;
    }

    /// Run one tick.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTelemetry`] if the simulation has no obstacle
    /// to encode on a tick that needs a state.
    ///
    /// # Panics
    ///
    /// Panics when called on a finished episode.
    pub fn tick(
        &mut self,
        sim: &mut dyn Simulation,
        input: &mut dyn InputSource,
    ) -> Result<TickReport> {
        assert!(
            self.phase != Phase::Terminal,
            "tick on a finished episode; call start_episode first"
        );

        let terminal = sim.is_terminal();
        let mut report = TickReport::with_status(TickStatus::Running);
        let override_action = match input.poll() {
            Some(Signal::Quit) if !terminal => return Ok(TickReport::with_status(TickStatus::Quit)),
            Some(Signal::Quit) => {
                report.quit_requested = true;
                None
            }
            signal => signal.and_then(|s| s.as_action()),
        };

        let decision_tick = self.episode_tick.is_multiple_of(u64::from(self.cadence));

        if !decision_tick && !terminal {
            if override_action == Some(Action::Flap) {
                sim.flap();
            }
            sim.advance();
            self.finish_tick();
            return Ok(report);
        }

        let telemetry = sim.telemetry().ok_or(Error::MissingTelemetry {
            tick: self.episode_tick,
        })?;
        let state = self.encoder.encode(&telemetry);
        self.current_state = Some(state);

        if let Some(prior) = self.pending.take() {
            let reward = self.rewards.reward(terminal, self.ticks_since_decision);
            let utility = self.learner.update(&mut self.store, prior, state, reward);
            report.update = Some(UpdateRecord {
                tick: self.episode_tick,
                key: prior,
                next_state: state,
                reward,
                utility,
                terminal,
            });
        }

        if terminal {
            self.phase = Phase::Terminal;
            let summary = self.summary(sim, true);
            debug!(
                episode = summary.episode,
                score = summary.score,
                ticks = summary.ticks,
                entries = summary.entries,
                "episode over"
            );
            report.status = TickStatus::EpisodeOver(summary);
            return Ok(report);
        }

        let (action, overridden) = match override_action {
            Some(action) => (action, true),
            None => (self.choose_action(state), false),
        };
        if action.is_flap() {
            sim.flap();
        }
        sim.advance();

        self.store.get_or_create(state, action);
        self.pending = Some(EntryKey::new(state, action));
        self.ticks_since_decision = 0;
        self.decisions += 1;
        trace!(tick = self.episode_tick, %state, %action, overridden, "decision");
        report.decision = Some(DecisionRecord {
            tick: self.episode_tick,
            state,
            action,
            overridden,
        });

        self.finish_tick();
        Ok(report)
    }

    /// End the running episode without a terminal update, e.g. when a tick
    /// limit is reached or the run is quit. The pending pair is dropped.
    pub fn abandon_episode(&mut self, sim: &dyn Simulation) -> EpisodeSummary {
        self.pending = None;
        self.phase = Phase::Terminal;
        self.summary(sim, false)
    }

    /// Greedy policy action for `state`.
    pub fn choose_action(&mut self, state: GameState) -> Action {
        best(&mut self.store, state, self.learner.tie_break()).action
    }

    fn finish_tick(&mut self) {
        self.episode_tick += 1;
        self.ticks_since_decision += 1;
        self.phase = if self.episode_tick.is_multiple_of(u64::from(self.cadence)) {
            Phase::AwaitingActionTick
        } else {
            Phase::Simulating
        };
    }

    fn summary(&self, sim: &dyn Simulation, terminal: bool) -> EpisodeSummary {
        EpisodeSummary {
            episode: self.episode,
            score: sim.score(),
            ticks: self.episode_tick,
            decisions: self.decisions,
            entries: self.store.len(),
            terminal,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pending(&self) -> Option<EntryKey> {
        self.pending
    }

    pub fn current_state(&self) -> Option<GameState> {
        self.current_state
    }

    pub fn episode_tick(&self) -> u64 {
        self.episode_tick
    }

    pub fn episodes_started(&self) -> usize {
        self.episodes_started
    }

    pub fn cadence(&self) -> u32 {
        self.cadence
    }

    pub fn learner(&self) -> &TdLearner {
        &self.learner
    }

    pub fn encoder(&self) -> &StateEncoder {
        &self.encoder
    }

    pub fn store(&self) -> &UtilityStore {
        &self.store
    }

    pub fn into_store(self) -> UtilityStore {
        self.store
    }
}
