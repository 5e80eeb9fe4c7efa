use std::f64::consts::FRAC_PI_2;

use crate::{
    any::difficulty::object::IDifficultyObject,
    droid::difficulty::object::DroidDifficultyObject,
    util::difficulty::{milliseconds_to_bpm, smootherstep, smoothstep},
};

use super::{NORMALIZED_DIAMETER as DIAMETER, NORMALIZED_RADIUS as RADIUS};

pub struct AimEvaluator;

impl AimEvaluator {
    const WIDE_ANGLE_MULTIPLIER: f64 = 1.5;
    const ACUTE_ANGLE_MULTIPLIER: f64 = 2.55;
    const SLIDER_MULTIPLIER: f64 = 1.35;
    const VELOCITY_CHANGE_MULTIPLIER: f64 = 0.75;

    // 200 BPM 1/4th
    const FLOW_MIN_SPEED_BONUS: f64 = 75.0;
    const FLOW_SPACING_THRESHOLD: f64 = 100.0;
    const FLOW_MULTIPLIER: f64 = 200.0;

    /// Difficulty of aiming the current object.
    ///
    /// The sum of snap aim, i.e. jumping between objects, and flow aim, i.e.
    /// following fast streams of close objects.
    pub fn evaluate_diff_of(
        curr: &DroidDifficultyObject<'_>,
        diff_objects: &[DroidDifficultyObject<'_>],
        with_sliders: bool,
    ) -> f64 {
        if curr.base.is_spinner()
            || curr.idx <= 1
            || curr
                .previous(0, diff_objects)
                .is_some_and(|last| last.base.is_spinner())
            || curr.is_overlapping(true, diff_objects)
        {
            return 0.0;
        }

        Self::snap_aim_strain(curr, diff_objects, with_sliders)
            + Self::flow_aim_strain(curr, diff_objects, with_sliders)
    }

    fn snap_aim_strain(
        curr: &DroidDifficultyObject<'_>,
        diff_objects: &[DroidDifficultyObject<'_>],
        with_sliders: bool,
    ) -> f64 {
        let Some((last_last, last)) = curr
            .previous(1, diff_objects)
            .zip(curr.previous(0, diff_objects))
        else {
            return 0.0;
        };

        let mut curr_vel = curr.lazy_jump_dist / curr.strain_time;

        if last.base.is_slider() && with_sliders {
            let travel_vel = last.travel_dist / last.travel_time;
            let movement_vel = curr.min_jump_dist / curr.min_jump_time;

            curr_vel = curr_vel.max(movement_vel + travel_vel);
        }

        let mut prev_vel = last.lazy_jump_dist / last.strain_time;

        if last_last.base.is_slider() && with_sliders {
            let travel_vel = last_last.travel_dist / last_last.travel_time;
            let movement_vel = last.min_jump_dist / last.min_jump_time;

            prev_vel = prev_vel.max(movement_vel + travel_vel);
        }

        let mut wide_angle_bonus = 0.0;
        let mut acute_angle_bonus = 0.0;
        let mut vel_change_bonus = 0.0;

        let mut aim_strain = curr_vel;

        if curr.strain_time.max(last.strain_time) < 1.25 * curr.strain_time.min(last.strain_time) {
            if let Some((curr_angle, last_angle)) = curr.angle.zip(last.angle) {
                let angle_bonus = curr_vel.min(prev_vel);

                wide_angle_bonus = Self::calc_wide_angle_bonus(curr_angle);
                acute_angle_bonus = Self::calc_acute_angle_bonus(curr_angle);

                wide_angle_bonus *= 1.0
                    - f64::min(
                        wide_angle_bonus,
                        Self::calc_wide_angle_bonus(last_angle).powf(3.0),
                    );
                acute_angle_bonus *= 0.08
                    + 0.92
                        * (1.0
                            - f64::min(
                                acute_angle_bonus,
                                Self::calc_acute_angle_bonus(last_angle).powf(3.0),
                            ));

                wide_angle_bonus *= angle_bonus * smootherstep(curr.lazy_jump_dist, 0.0, DIAMETER);

                acute_angle_bonus *= angle_bonus
                    * smootherstep(milliseconds_to_bpm(curr.strain_time, Some(2)), 300.0, 400.0)
                    * smootherstep(curr.lazy_jump_dist, DIAMETER, DIAMETER * 2.0);
            }
        }

        if prev_vel.max(curr_vel) > 0.0 {
            prev_vel = (last.lazy_jump_dist + last_last.travel_dist) / last.strain_time;
            curr_vel = (curr.lazy_jump_dist + last.travel_dist) / curr.strain_time;

            let dist_ratio =
                (FRAC_PI_2 * (prev_vel - curr_vel).abs() / prev_vel.max(curr_vel)).sin().powf(2.0);

            // Changes between overlapping objects barely require movement
            let overlap_vel_buff = (DIAMETER * 1.25 / curr.strain_time.min(last.strain_time))
                .min((prev_vel - curr_vel).abs());

            vel_change_bonus = overlap_vel_buff * dist_ratio;

            let bonus_base = curr.strain_time.min(last.strain_time)
                / curr.strain_time.max(last.strain_time);
            vel_change_bonus *= bonus_base.powf(2.0);
        }

        aim_strain += (acute_angle_bonus * Self::ACUTE_ANGLE_MULTIPLIER).max(
            wide_angle_bonus * Self::WIDE_ANGLE_MULTIPLIER
                + vel_change_bonus * Self::VELOCITY_CHANGE_MULTIPLIER,
        );

        if with_sliders && last.base.is_slider() {
            aim_strain += last.travel_dist / last.travel_time * Self::SLIDER_MULTIPLIER;
        }

        aim_strain
    }

    fn flow_aim_strain(
        curr: &DroidDifficultyObject<'_>,
        diff_objects: &[DroidDifficultyObject<'_>],
        with_sliders: bool,
    ) -> f64 {
        let travel_dist = if with_sliders {
            curr.previous(0, diff_objects)
                .map_or(0.0, |last| last.travel_dist)
        } else {
            0.0
        };

        let speed_bonus = if curr.strain_time < Self::FLOW_MIN_SPEED_BONUS {
            let base = (Self::FLOW_MIN_SPEED_BONUS - curr.strain_time) / 40.0;

            1.0 + 0.75 * base.powf(2.0)
        } else {
            1.0
        };

        let dist = travel_dist + curr.min_jump_dist;

        // Objects far apart are aimed through snapping instead
        let short_dist_penalty = (dist / Self::FLOW_SPACING_THRESHOLD).min(1.0).powf(3.5);

        // Flow aim fades out for objects more than a few diameters apart
        let flow_window = smoothstep(curr.lazy_jump_dist, DIAMETER * 3.0, RADIUS);

        Self::FLOW_MULTIPLIER * speed_bonus * short_dist_penalty * flow_window / curr.strain_time
    }

    fn calc_wide_angle_bonus(angle: f64) -> f64 {
        smoothstep(angle, f64::to_radians(40.0), f64::to_radians(140.0))
    }

    fn calc_acute_angle_bonus(angle: f64) -> f64 {
        smoothstep(angle, f64::to_radians(140.0), f64::to_radians(40.0))
    }
}
