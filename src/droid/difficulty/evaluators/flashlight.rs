use std::cmp;

use crate::{
    any::{difficulty::object::IDifficultyObject, object::PlayObjectKind},
    droid::difficulty::object::DroidDifficultyObject,
};

pub struct FlashlightEvaluator {
    scaling_factor: f64,
}

impl FlashlightEvaluator {
    const MAX_OPACITY_BONUS: f64 = 0.4;
    const HIDDEN_BONUS: f64 = 0.2;

    const MIN_VELOCITY: f64 = 0.5;
    const SLIDER_MULTIPLIER: f64 = 1.3;

    const MIN_ANGLE_MULTIPLIER: f64 = 0.2;

    /// `radius` is the droid object radius in osu!pixels.
    pub fn new(radius: f64) -> Self {
        Self {
            scaling_factor: 52.0 / radius,
        }
    }

    /// Memory difficulty of the current object.
    ///
    /// Same model as on osu!standard but on droid's object radius and
    /// opacity timings. Slider travel is only rewarded if `with_sliders` is
    /// set.
    pub fn evaluate_diff_of(
        &self,
        curr: &DroidDifficultyObject<'_>,
        diff_objects: &[DroidDifficultyObject<'_>],
        hidden: bool,
        with_sliders: bool,
    ) -> f64 {
        if curr.base.is_spinner() || curr.is_overlapping(true, diff_objects) {
            return 0.0;
        }

        let mut small_dist_nerf = 1.0;
        let mut cumulative_strain_time = 0.0;

        let mut result = 0.0;

        let mut last_obj = curr;

        let mut angle_repeat_count = 0.0;

        for i in 0..cmp::min(curr.idx, 10) {
            let Some(curr_obj) = curr.previous(i, diff_objects) else {
                break;
            };

            if !curr_obj.base.is_spinner() {
                let jump_dist = f64::from(
                    (curr.base.stacked_pos() - curr_obj.base.stacked_end_pos()).length(),
                );
                cumulative_strain_time += last_obj.strain_time;

                // Objects within the flashlight radius are easy to see
                if i == 0 {
                    small_dist_nerf = (jump_dist / 75.0).min(1.0);
                }

                // Only the first object of a stack counts
                let stack_nerf = ((curr_obj.lazy_jump_dist / self.scaling_factor) / 25.0).min(1.0);

                let opacity_bonus = 1.0
                    + Self::MAX_OPACITY_BONUS * (1.0 - curr.opacity_at(curr_obj.start_time, hidden));

                result += stack_nerf * opacity_bonus * self.scaling_factor * jump_dist
                    / cumulative_strain_time;

                if let Some((curr_obj_angle, curr_angle)) = curr_obj.angle.zip(curr.angle) {
                    if (curr_obj_angle - curr_angle).abs() < 0.02 {
                        angle_repeat_count += (1.0 - 0.1 * i as f64).max(0.0);
                    }
                }
            }

            last_obj = curr_obj;
        }

        result = (small_dist_nerf * result).powf(2.0);

        if hidden {
            result *= 1.0 + Self::HIDDEN_BONUS;
        }

        result *= Self::MIN_ANGLE_MULTIPLIER
            + (1.0 - Self::MIN_ANGLE_MULTIPLIER) / (angle_repeat_count + 1.0);

        let PlayObjectKind::Slider(ref slider) = curr.base.kind else {
            return result;
        };

        if !with_sliders {
            return result;
        }

        let pixel_travel_dist = curr.lazy_travel_dist / self.scaling_factor;

        let mut slider_bonus =
            ((pixel_travel_dist / curr.travel_time - Self::MIN_VELOCITY).max(0.0)).powf(0.5);

        slider_bonus *= pixel_travel_dist;

        let repeat_count = slider.repeat_count();

        if repeat_count > 0 {
            slider_bonus /= (repeat_count + 1) as f64;
        }

        result + slider_bonus * Self::SLIDER_MULTIPLIER
    }
}
