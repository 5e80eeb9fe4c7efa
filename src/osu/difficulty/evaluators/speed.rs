use crate::{
    any::difficulty::{object::IDifficultyObject, rhythm::RhythmObject},
    osu::difficulty::object::OsuDifficultyObject,
    util::difficulty::{bpm_to_milliseconds, milliseconds_to_bpm},
};

use super::NORMALIZED_DIAMETER;

pub struct SpeedEvaluator;

impl SpeedEvaluator {
    // 1.25 circles distance between centers
    const SINGLE_SPACING_THRESHOLD: f64 = NORMALIZED_DIAMETER * 1.25;
    // 200 BPM 1/4th
    const MIN_SPEED_BONUS: f64 = 200.0;
    const SPEED_BALANCING_FACTOR: f64 = 40.0;
    const DIST_MULTIPLIER: f64 = 0.9;

    /// Difficulty of tapping the current object, based on:
    ///
    /// - time between pressing the previous and current object,
    /// - distance between those objects,
    /// - and how easily they can be doubletapped.
    ///
    /// `great_window` is the full window for a great hit.
    pub fn evaluate_diff_of(
        curr: &OsuDifficultyObject<'_>,
        diff_objects: &[OsuDifficultyObject<'_>],
        great_window: f64,
        autopilot: bool,
    ) -> f64 {
        if curr.base.is_spinner() {
            return 0.0;
        }

        let prev = curr.previous(0, diff_objects);
        let next = curr.next(0, diff_objects);

        let mut strain_time = curr.strain_time;
        let doubletapness = 1.0 - curr.doubletapness(next, great_window);

        // Cap delta time to the great window. 0.93 keeps 260bpm OD8 streams
        // from being nerfed harshly whereas 0.92 limits the effect of the cap.
        strain_time /= ((strain_time / great_window) / 0.93).clamp(0.92, 1.0);

        let speed_bonus = if milliseconds_to_bpm(strain_time, None) > Self::MIN_SPEED_BONUS {
            // Streams and bursts above 200bpm
            let base = (bpm_to_milliseconds(Self::MIN_SPEED_BONUS, None) - strain_time)
                / Self::SPEED_BALANCING_FACTOR;

            0.75 * base.powf(2.0)
        } else {
            0.0
        };

        let travel_dist = prev.map_or(0.0, |obj| obj.travel_dist);
        let dist = Self::SINGLE_SPACING_THRESHOLD.min(travel_dist + curr.min_jump_dist);

        let dist_bonus = if autopilot {
            0.0
        } else {
            (dist / Self::SINGLE_SPACING_THRESHOLD).powf(3.95) * Self::DIST_MULTIPLIER
        };

        let difficulty = (1.0 + speed_bonus + dist_bonus) * 1000.0 / strain_time;

        difficulty * doubletapness
    }
}
