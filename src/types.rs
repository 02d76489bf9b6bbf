//! Action and input-signal types shared by the learner and its collaborators.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// One of the two controllable outcomes of a decision tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Trigger a climb impulse.
    Flap,
    /// Let the bird keep sinking.
    NoFlap,
}

impl Action {
    /// The learnable action space, in canonical order.
    pub const ALL: [Action; 2] = [Action::Flap, Action::NoFlap];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Flap => "flap",
            Action::NoFlap => "no_flap",
        }
    }

    pub fn is_flap(&self) -> bool {
        matches!(self, Action::Flap)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flap" => Ok(Action::Flap),
            "no_flap" | "no-flap" | "noflap" => Ok(Action::NoFlap),
            other => Err(crate::Error::config(format!(
                "unknown action '{other}' (expected 'flap' or 'no_flap')"
            ))),
        }
    }
}

/// Discrete signal delivered by the input collaborator.
///
/// `Quit` ends the run between ticks and is never learned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Flap,
    NoFlap,
    Quit,
}

impl Signal {
    /// The action this signal overrides the policy with, if any.
    pub fn as_action(&self) -> Option<Action> {
        match self {
            Signal::Flap => Some(Action::Flap),
            Signal::NoFlap => Some(Action::NoFlap),
            Signal::Quit => None,
        }
    }
}

impl From<Action> for Signal {
    fn from(action: Action) -> Self {
        match action {
            Action::Flap => Signal::Flap,
            Action::NoFlap => Signal::NoFlap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse_and_display() {
        assert_eq!("flap".parse::<Action>().unwrap(), Action::Flap);
        assert_eq!("No-Flap".parse::<Action>().unwrap(), Action::NoFlap);
        assert!("jump".parse::<Action>().is_err());
        assert_eq!(Action::NoFlap.to_string(), "no_flap");
    }

    #[test]
    fn test_quit_is_not_an_action() {
        assert_eq!(Signal::Quit.as_action(), None);
        assert_eq!(Signal::Flap.as_action(), Some(Action::Flap));
        assert_eq!(Signal::from(Action::NoFlap), Signal::NoFlap);
    }
}
