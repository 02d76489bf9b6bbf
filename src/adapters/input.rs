//! Input sources for headless runs.

use std::collections::VecDeque;

use crate::{ports::InputSource, types::Signal};

/// Never produces a signal; the policy decides every action.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self) -> Option<Signal> {
        None
    }
}

/// Replays a fixed per-tick script, then stays silent.
///
/// Entry `i` is returned by the `i`-th poll.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: VecDeque<Option<Signal>>,
}

impl ScriptedInput {
    pub fn new(script: impl IntoIterator<Item = Option<Signal>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Silent for `ticks` polls, then emits `Quit`.
    pub fn quit_after(ticks: usize) -> Self {
        Self::new(std::iter::repeat_n(None, ticks).chain(std::iter::once(Some(Signal::Quit))))
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Option<Signal> {
        self.script.pop_front().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_is_replayed_in_order() {
        let mut input = ScriptedInput::new([Some(Signal::Flap), None, Some(Signal::NoFlap)]);
        assert_eq!(input.poll(), Some(Signal::Flap));
        assert_eq!(input.poll(), None);
        assert_eq!(input.poll(), Some(Signal::NoFlap));
        assert_eq!(input.poll(), None);
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn test_quit_after() {
        let mut input = ScriptedInput::quit_after(2);
        assert_eq!(input.poll(), None);
        assert_eq!(input.poll(), None);
        assert_eq!(input.poll(), Some(Signal::Quit));
    }
}
