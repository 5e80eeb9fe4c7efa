use crate::{
    any::difficulty::{object::IDifficultyObject, rhythm::RhythmObject},
    droid::difficulty::object::DroidDifficultyObject,
    util::difficulty::{bpm_to_milliseconds, milliseconds_to_bpm},
};

pub struct TapEvaluator;

impl TapEvaluator {
    // 200 BPM 1/4th
    const MIN_SPEED_BONUS: f64 = 200.0;
    const SPEED_BALANCING_FACTOR: f64 = 40.0;

    /// Difficulty of tapping the current object, based on:
    ///
    /// - the effective time between taps of the same hand,
    /// - the great hit window,
    /// - and, if `consider_cheesability` is set, how easily the object can
    ///   be doubletapped.
    pub fn evaluate_diff_of(
        curr: &DroidDifficultyObject<'_>,
        diff_objects: &[DroidDifficultyObject<'_>],
        consider_cheesability: bool,
        effective_strain_time: f64,
    ) -> f64 {
        if curr.base.is_spinner() || curr.is_overlapping(false, diff_objects) {
            return 0.0;
        }

        let great_window = curr.great_window;

        let doubletapness = if consider_cheesability {
            1.0 - curr.doubletapness(curr.next(0, diff_objects), great_window)
        } else {
            1.0
        };

        let mut strain_time = effective_strain_time;
        strain_time /= ((strain_time / great_window) / 0.93).clamp(0.92, 1.0);

        let speed_bonus = if milliseconds_to_bpm(strain_time, None) > Self::MIN_SPEED_BONUS {
            let base = (bpm_to_milliseconds(Self::MIN_SPEED_BONUS, None) - strain_time)
                / Self::SPEED_BALANCING_FACTOR;

            0.75 * base.powf(2.0)
        } else {
            0.0
        };

        (1.0 + speed_bonus) * 1000.0 / strain_time * doubletapness
    }
}
