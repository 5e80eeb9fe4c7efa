use crate::{
    any::object::{time_invisible, PlayObjectKind},
    droid::difficulty::object::DroidDifficultyObject,
};

pub struct VisualEvaluator;

impl VisualEvaluator {
    const HIGH_AR_PREEMPT: f64 = 400.0;
    const MAX_SLIDER_VELOCITY_BONUS: f64 = 6.0;

    /// Difficulty of reading the current object among everything else that
    /// is on screen, based on:
    ///
    /// - the density of upcoming objects,
    /// - how long the object is invisible with Hidden,
    /// - how much it covers previous objects,
    /// - the approach rate,
    /// - the rhythm around it,
    /// - and, if `with_sliders` is set, slider velocity.
    pub fn evaluate_diff_of(
        curr: &DroidDifficultyObject<'_>,
        diff_objects: &[DroidDifficultyObject<'_>],
        hidden: bool,
        with_sliders: bool,
        rhythm_multiplier: f64,
    ) -> f64 {
        if curr.base.is_spinner() || curr.idx == 0 || curr.is_overlapping(true, diff_objects) {
            return 0.0;
        }

        // Density grows quadratically
        let mut strain = curr.note_density.powf(2.0) / 4.0;

        if hidden {
            strain += time_invisible(curr.time_preempt, curr.time_fade_in) * curr.note_density
                / 1000.0;
        }

        strain += curr.overlapping_factor / 2.0;

        if curr.time_preempt < Self::HIGH_AR_PREEMPT {
            strain += ((Self::HIGH_AR_PREEMPT - curr.time_preempt) / 80.0).powf(2.0);
        }

        strain *= rhythm_multiplier;

        if !with_sliders {
            return strain;
        }

        let PlayObjectKind::Slider(ref slider) = curr.base.kind else {
            return strain;
        };

        // In osu!pixels per millisecond
        let velocity = curr.lazy_travel_dist / curr.scaling_factor / curr.travel_time;

        strain + (velocity * 1.5).min(Self::MAX_SLIDER_VELOCITY_BONUS) * slider.span_dist / 100.0
    }
}
