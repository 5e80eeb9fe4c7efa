use std::cmp;

use crate::{
    any::{difficulty::object::IDifficultyObject, object::PlayObjectKind},
    osu::difficulty::object::OsuDifficultyObject,
};

pub struct FlashlightEvaluator {
    scaling_factor: f64,
    time_preempt: f64,
    time_fade_in: f64,
}

impl FlashlightEvaluator {
    const MAX_OPACITY_BONUS: f64 = 0.4;
    const HIDDEN_BONUS: f64 = 0.2;

    const MIN_VELOCITY: f64 = 0.5;
    const SLIDER_MULTIPLIER: f64 = 1.3;

    const MIN_ANGLE_MULTIPLIER: f64 = 0.2;

    pub fn new(radius: f64, time_preempt: f64, time_fade_in: f64) -> Self {
        Self {
            scaling_factor: 52.0 / radius,
            time_preempt,
            time_fade_in,
        }
    }

    /// Memory difficulty of the current object, based on:
    ///
    /// - distance between the previous objects and the current one,
    /// - time between them,
    /// - how visible they are while the current object has to be hit,
    /// - and the current slider's velocity and length.
    pub fn evaluate_diff_of(
        &self,
        curr: &OsuDifficultyObject<'_>,
        diff_objects: &[OsuDifficultyObject<'_>],
        hidden: bool,
    ) -> f64 {
        if curr.base.is_spinner() {
            return 0.0;
        }

        let mut small_dist_nerf = 1.0;
        let mut cumulative_strain_time = 0.0;

        let mut result = 0.0;

        let mut last_obj = curr;

        let mut angle_repeat_count = 0.0;

        // Iterating backwards in time from the current object
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
                    + Self::MAX_OPACITY_BONUS
                        * (1.0
                            - curr.opacity_at(
                                curr_obj.base.start_time,
                                hidden,
                                self.time_preempt,
                                self.time_fade_in,
                            ));

                result += stack_nerf * opacity_bonus * self.scaling_factor * jump_dist
                    / cumulative_strain_time;

                if let Some((curr_obj_angle, curr_angle)) = curr_obj.angle.zip(curr.angle) {
                    // Objects further back count less
                    if (curr_obj_angle - curr_angle).abs() < 0.02 {
                        angle_repeat_count += (1.0 - 0.1 * i as f64).max(0.0);
                    }
                }
            }

            last_obj = curr_obj;
        }

        result = (small_dist_nerf * result).powf(2.0);

        // No approach circles
        if hidden {
            result *= 1.0 + Self::HIDDEN_BONUS;
        }

        // Repeated angles
        result *= Self::MIN_ANGLE_MULTIPLIER
            + (1.0 - Self::MIN_ANGLE_MULTIPLIER) / (angle_repeat_count + 1.0);

        let mut slider_bonus = 0.0;

        if let PlayObjectKind::Slider(ref slider) = curr.base.kind {
            // True travel distance independent of circle size
            let pixel_travel_dist = curr.lazy_travel_dist / self.scaling_factor;

            slider_bonus = ((pixel_travel_dist / curr.travel_time - Self::MIN_VELOCITY).max(0.0))
                .powf(0.5);

            // Longer sliders require more memorisation
            slider_bonus *= pixel_travel_dist;

            // Repeats require less memorisation
            let repeat_count = slider.repeat_count();

            if repeat_count > 0 {
                slider_bonus /= (repeat_count + 1) as f64;
            }
        }

        result += slider_bonus * Self::SLIDER_MULTIPLIER;

        result
    }
}
