//! Global round counter and the exponential phase schedule.

/// Counts rounds and advances the confidence-radius phase.
///
/// The phase starts at 1 with its boundary at round 2. Whenever the round
/// count reaches the boundary the phase increments and the boundary moves
/// forward by `2^phase`, so phases end after rounds 2, 6, 14, 30, ...
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseClock {
    time: u64,
    phase: u32,
    next_end: u64,
}

impl PhaseClock {
    /// A clock at round 0, phase 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            time: 0,
            phase: 1,
            next_end: 2,
        }
    }

    /// Rounds completed so far.
    #[must_use]
    pub fn time(&self) -> u64 {
        self.time
    }

    /// The current phase.
    #[must_use]
    pub fn phase(&self) -> u32 {
        self.phase
    }

    /// The round at which the phase next advances.
    #[must_use]
    pub fn next_end(&self) -> u64 {
        self.next_end
    }

    /// Completes one round. Returns `true` if the phase advanced.
    pub fn tick(&mut self) -> bool {
        self.time += 1;
        if self.time < self.next_end {
            return false;
        }
        self.phase += 1;
        let span = 1_u64.checked_shl(self.phase).unwrap_or(u64::MAX);
        self.next_end = self.next_end.saturating_add(span);
        true
    }
}

impl Default for PhaseClock {
    fn default() -> Self {
        Self::new()
    }
}
