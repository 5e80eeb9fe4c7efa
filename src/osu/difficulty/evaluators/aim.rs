use std::f64::consts::FRAC_PI_2;

use crate::{
    any::difficulty::object::IDifficultyObject,
    osu::difficulty::object::OsuDifficultyObject,
    util::{
        difficulty::{milliseconds_to_bpm, reverse_lerp, smootherstep, smoothstep},
        float_ext::FloatExt,
    },
};

use super::{NORMALIZED_DIAMETER as DIAMETER, NORMALIZED_RADIUS as RADIUS};

pub struct AimEvaluator;

impl AimEvaluator {
    const WIDE_ANGLE_MULTIPLIER: f64 = 1.5;
    const ACUTE_ANGLE_MULTIPLIER: f64 = 2.6;
    const SLIDER_MULTIPLIER: f64 = 1.35;
    const VELOCITY_CHANGE_MULTIPLIER: f64 = 0.75;
    const WIGGLE_MULTIPLIER: f64 = 1.02;

    /// Difficulty of aiming the current object, based on:
    ///
    /// - cursor velocity to the current object,
    /// - angle difficulty,
    /// - sharp velocity increases,
    /// - and slider difficulty.
    #[allow(clippy::too_many_lines)]
    pub fn evaluate_diff_of(
        curr: &OsuDifficultyObject<'_>,
        diff_objects: &[OsuDifficultyObject<'_>],
        with_slider_travel_dist: bool,
    ) -> f64 {
        let Some((last_last, last)) = curr
            .previous(1, diff_objects)
            .zip(curr.previous(0, diff_objects))
            .filter(|(_, last)| !(curr.base.is_spinner() || last.base.is_spinner()))
        else {
            return 0.0;
        };

        // Base velocity assuming the last object is a circle
        let mut curr_vel = curr.lazy_jump_dist / curr.strain_time;

        // Sliders extend the velocity through their travel into the current
        // object
        if last.base.is_slider() && with_slider_travel_dist {
            let travel_vel = last.travel_dist / last.travel_time;
            let movement_vel = curr.min_jump_dist / curr.min_jump_time;

            curr_vel = curr_vel.max(movement_vel + travel_vel);
        }

        let mut prev_vel = last.lazy_jump_dist / last.strain_time;

        if last_last.base.is_slider() && with_slider_travel_dist {
            let travel_vel = last_last.travel_dist / last_last.travel_time;
            let movement_vel = last.min_jump_dist / last.min_jump_time;

            prev_vel = prev_vel.max(movement_vel + travel_vel);
        }

        let mut wide_angle_bonus = 0.0;
        let mut acute_angle_bonus = 0.0;
        let mut slider_bonus = 0.0;
        let mut vel_change_bonus = 0.0;
        let mut wiggle_bonus = 0.0;

        let mut aim_strain = curr_vel;

        // Same rhythm
        if curr.strain_time.max(last.strain_time)
            < 1.25 * curr.strain_time.min(last.strain_time)
        {
            if let Some((curr_angle, last_angle)) = curr.angle.zip(last.angle) {
                // The smaller velocity is the base for angle bonuses
                let angle_bonus = curr_vel.min(prev_vel);

                wide_angle_bonus = Self::calc_wide_angle_bonus(curr_angle);
                acute_angle_bonus = Self::calc_acute_angle_bonus(curr_angle);

                // Repeated angles are easier
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

                // Full wide angle bonus for distances beyond one diameter
                wide_angle_bonus *= angle_bonus * smootherstep(curr.lazy_jump_dist, 0.0, DIAMETER);

                // Acute angle bonus only above 300 BPM 1/2 and beyond one
                // diameter
                acute_angle_bonus *= angle_bonus
                    * smootherstep(milliseconds_to_bpm(curr.strain_time, Some(2)), 300.0, 400.0)
                    * smootherstep(curr.lazy_jump_dist, DIAMETER, DIAMETER * 2.0);

                // Wiggles are jumps between one radius and three diameters
                // with angles below 110°
                wiggle_bonus = angle_bonus
                    * smootherstep(curr.lazy_jump_dist, RADIUS, DIAMETER)
                    * reverse_lerp(curr.lazy_jump_dist, DIAMETER * 3.0, DIAMETER).powf(1.8)
                    * smootherstep(curr_angle, f64::to_radians(110.0), f64::to_radians(60.0))
                    * smootherstep(last.lazy_jump_dist, RADIUS, DIAMETER)
                    * reverse_lerp(last.lazy_jump_dist, DIAMETER * 3.0, DIAMETER).powf(1.8)
                    * smootherstep(last_angle, f64::to_radians(110.0), f64::to_radians(60.0));
            }
        }

        if prev_vel.max(curr_vel).not_eq(0.0) {
            // Velocity changes use the average velocity over the whole
            // object instead of separate jump and slider velocities
            prev_vel = (last.lazy_jump_dist + last_last.travel_dist) / last.strain_time;
            curr_vel = (curr.lazy_jump_dist + last.travel_dist) / curr.strain_time;

            let dist_ratio_base =
                (FRAC_PI_2 * (prev_vel - curr_vel).abs() / prev_vel.max(curr_vel)).sin();
            let dist_ratio = dist_ratio_base.powf(2.0);

            // Overlapping objects whose velocity still changes
            let overlap_vel_buff = (DIAMETER * 1.25 / curr.strain_time.min(last.strain_time))
                .min((prev_vel - curr_vel).abs());

            vel_change_bonus = overlap_vel_buff * dist_ratio;

            // Rhythm changes reduce the bonus
            let bonus_base = curr.strain_time.min(last.strain_time)
                / curr.strain_time.max(last.strain_time);
            vel_change_bonus *= bonus_base.powf(2.0);
        }

        if last.base.is_slider() {
            slider_bonus = last.travel_dist / last.travel_time;
        }

        aim_strain += wiggle_bonus * Self::WIGGLE_MULTIPLIER;

        aim_strain += (acute_angle_bonus * Self::ACUTE_ANGLE_MULTIPLIER).max(
            wide_angle_bonus * Self::WIDE_ANGLE_MULTIPLIER
                + vel_change_bonus * Self::VELOCITY_CHANGE_MULTIPLIER,
        );

        if with_slider_travel_dist {
            aim_strain += slider_bonus * Self::SLIDER_MULTIPLIER;
        }

        aim_strain
    }

    fn calc_wide_angle_bonus(angle: f64) -> f64 {
        smoothstep(angle, f64::to_radians(40.0), f64::to_radians(140.0))
    }

    fn calc_acute_angle_bonus(angle: f64) -> f64 {
        smoothstep(angle, f64::to_radians(140.0), f64::to_radians(40.0))
    }
}
