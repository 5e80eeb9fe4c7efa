/// Aggregation for a score's current state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DroidScoreState {
    /// Maximum combo that the score has had so far. **Not** the maximum
    /// possible combo of the map so far.
    pub max_combo: u32,
    /// Amount of current 300s.
    pub n300: u32,
    /// Amount of current 100s.
    pub n100: u32,
    /// Amount of current 50s.
    pub n50: u32,
    /// Amount of current misses.
    pub misses: u32,
}

impl DroidScoreState {
    /// Create a new empty score state.
    pub const fn new() -> Self {
        Self {
            max_combo: 0,
            n300: 0,
            n100: 0,
            n50: 0,
            misses: 0,
        }
    }

    /// Return the total amount of hits by adding everything up.
    pub const fn total_hits(&self) -> u32 {
        self.n300 + self.n100 + self.n50 + self.misses
    }

    /// Return the amount of hits that were not misses.
    pub const fn total_successful_hits(&self) -> u32 {
        self.n300 + self.n100 + self.n50
    }

    /// Calculate the accuracy between `0.0` and `1.0` for this state.
    pub fn accuracy(&self) -> f64 {
        crate::any::performance::accuracy(self.n300, self.n100, self.n50, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_state() {
        let state = DroidScoreState::new();

        assert_eq!(state.total_hits(), 0);
        assert_eq!(state.accuracy(), 0.0);
    }

    #[test]
    fn successful_hits_exclude_misses() {
        let state = DroidScoreState {
            max_combo: 120,
            n300: 90,
            n100: 6,
            n50: 1,
            misses: 3,
        };

        assert_eq!(state.total_hits(), 100);
        assert_eq!(state.total_successful_hits(), 97);
        assert!((state.accuracy() - 553.0 / 600.0).abs() < 1e-12);
    }
}
