use crate::{
    any::{difficulty::object::IDifficultyObject, object::time_invisible},
    droid::difficulty::object::DroidDifficultyObject,
    util::difficulty::smootherstep,
};

use super::NORMALIZED_DIAMETER as DIAMETER;

pub struct ReadingEvaluator;

impl ReadingEvaluator {
    const LOW_AR_PREEMPT: f64 = 600.0;

    /// Difficulty of anticipating the current object before it has to be
    /// hit.
    pub fn evaluate_diff_of(
        curr: &DroidDifficultyObject<'_>,
        diff_objects: &[DroidDifficultyObject<'_>],
        hidden: bool,
    ) -> f64 {
        if curr.base.is_spinner() || curr.idx == 0 || curr.is_overlapping(true, diff_objects) {
            return 0.0;
        }

        let past_density = Self::past_density(curr, diff_objects, hidden).powf(0.8);

        let ar_base = 1.0 + ((Self::LOW_AR_PREEMPT - curr.time_preempt).max(0.0) / 300.0).powf(2.0);

        let mut difficulty = past_density * ar_base + ar_base - 1.0;

        if hidden {
            let invisible_share =
                time_invisible(curr.time_preempt, curr.time_fade_in) / curr.time_preempt;

            difficulty += invisible_share.powf(0.7) * (1.0 + past_density);
            difficulty += Self::future_density(curr, diff_objects).powf(0.75);
        }

        difficulty
    }

    /// Objects on screen when the current one appeared, weighted by how far
    /// they are from it and how long ago they had to be hit.
    fn past_density(
        curr: &DroidDifficultyObject<'_>,
        diff_objects: &[DroidDifficultyObject<'_>],
        hidden: bool,
    ) -> f64 {
        let appear_time = curr.start_time - curr.time_preempt;

        diff_objects[..curr.idx]
            .iter()
            .rev()
            .take_while(|prev| curr.start_time - prev.start_time < curr.time_preempt)
            .filter(|prev| !prev.base.is_spinner())
            .map(|prev| {
                let dist = curr.dist_from_end_of(prev);
                let time_weight = 1.0 - (curr.start_time - prev.start_time) / curr.time_preempt;

                prev.opacity_at(appear_time, hidden) * smootherstep(dist, 0.0, DIAMETER) * time_weight
            })
            .sum()
    }

    /// Upcoming objects that are visible while the current one fades out.
    fn future_density(
        curr: &DroidDifficultyObject<'_>,
        diff_objects: &[DroidDifficultyObject<'_>],
    ) -> f64 {
        let fade_out_start = curr.start_time - curr.time_preempt + curr.time_fade_in;

        let mut density = 0.0;
        let mut i = 0;

        while let Some(next) = curr.next(i, diff_objects) {
            if next.start_time - curr.start_time > curr.time_preempt {
                break;
            }

            density += next.opacity_at(fade_out_start, true);
            i += 1;
        }

        density
    }
}
