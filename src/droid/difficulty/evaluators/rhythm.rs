use crate::{
    any::difficulty::rhythm::rhythm_complexity_sum,
    droid::difficulty::object::DroidDifficultyObject,
};

pub struct RhythmEvaluator;

impl RhythmEvaluator {
    const RHYTHM_OVERALL_MULTIPLIER: f64 = 0.75;

    /// Rhythm multiplier of the current object, at least `1.0`.
    pub fn evaluate_diff_of(
        curr: &DroidDifficultyObject<'_>,
        diff_objects: &[DroidDifficultyObject<'_>],
    ) -> f64 {
        if curr.base.is_spinner() || curr.is_overlapping(false, diff_objects) {
            return 1.0;
        }

        let sum = rhythm_complexity_sum(curr, diff_objects, curr.great_window);

        (4.0 + sum * Self::RHYTHM_OVERALL_MULTIPLIER).sqrt() / 2.0
    }
}
