//! Runtime lock state.
//!
//! The lock has two halves: the persisted [`Settings`] record says
//! *whether* a passcode exists, the in-memory [`Session`] says whether
//! this run has presented it. The session is never persisted, so a
//! restart always starts locked when a passcode is set.

use crate::model::Settings;

/// Per-run unlock state. Starts locked; [`Session::unlock`] flips it on
/// a correct passcode, [`Session::lock`] flips it back.
#[derive(Debug, Default)]
pub struct Session {
    unlocked: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether protected operations are allowed given the persisted
    /// settings. No passcode set means everything is open.
    pub fn is_open(&self, settings: &Settings) -> bool {
        !settings.locked || self.unlocked
    }

    /// Tries the given digits against the persisted passcode. On a match
    /// the session stays unlocked until [`Session::lock`].
    pub fn unlock(&mut self, settings: &Settings, digits: &[u8]) -> bool {
        if settings.passcode_matches(digits) {
            self.unlocked = true;
        }
        self.unlocked
    }

    /// Relocks the session, e.g. when the host UI times out.
    pub fn lock(&mut self) {
        self.unlocked = false;
    }

    /// Marks the session unlocked without a passcode check. Used right
    /// after the user chooses a passcode: they just typed it, asking
    /// again would be hostile.
    pub fn grant(&mut self) {
        self.unlocked = true;
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }
}
