use crate::{
    any::difficulty::rhythm::rhythm_complexity_sum,
    osu::difficulty::object::OsuDifficultyObject,
};

pub struct RhythmEvaluator;

impl RhythmEvaluator {
    const RHYTHM_OVERALL_MULTIPLIER: f64 = 0.95;

    /// Rhythm multiplier of the current object.
    ///
    /// Spinners have no rhythm and give `0.0`, everything else is at least
    /// `1.0`.
    pub fn evaluate_diff_of(
        curr: &OsuDifficultyObject<'_>,
        diff_objects: &[OsuDifficultyObject<'_>],
        great_window: f64,
    ) -> f64 {
        if curr.base.is_spinner() {
            return 0.0;
        }

        let sum = rhythm_complexity_sum(curr, diff_objects, great_window);

        (4.0 + sum * Self::RHYTHM_OVERALL_MULTIPLIER).sqrt() / 2.0
    }
}
