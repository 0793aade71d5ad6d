//! Edge-triggered open/closed state for one hand.

/// Current and previous-frame closed flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandState {
    was_closed: bool,
    is_closed:  bool,
}

impl HandState {
    /// Shift the current value into the previous slot and record the new one.
    pub fn update(&mut self, closed: bool) {
        self.was_closed = self.is_closed;
        self.is_closed  = closed;
    }

    pub fn is_closed(&self) -> bool { self.is_closed }

    /// Open → Closed on the latest update.
    pub fn just_closed(&self) -> bool { !self.was_closed && self.is_closed }

    /// Closed → Open on the latest update.
    pub fn just_opened(&self) -> bool { self.was_closed && !self.is_closed }
}
