//! Input port - external signals that can override the policy

use crate::types::Signal;

/// Per-tick source of discrete player signals.
///
/// The decision loop polls exactly once per tick. A `Flap`/`NoFlap` signal
/// replaces the policy's choice for that tick; `Quit` stops the run before
/// any learning state is touched.
pub trait InputSource {
    /// Signal for the current tick, if any.
    fn poll(&mut self) -> Option<Signal>;
}
