use crate::{
    any::{
        deviation::{window_scaling, JudgementWindows, RelevantHits},
        difficulty::{probability::MissPenaltyCurve, skills::difficulty_to_performance},
        performance::{
            combo_scaling_factor, proportional_miss_penalty, slider_nerf_factor,
            strain_count_miss_penalty, SliderBreaks,
        },
    },
    droid::{
        attributes::{DroidDifficultyAttributes, DroidPerformanceAttributes},
        difficulty::skills::{flashlight::DroidFlashlight, visual::DroidVisual},
        score_state::DroidScoreState,
    },
    util::difficulty::{lerp, reverse_lerp},
};

pub const PERFORMANCE_BASE_MULTIPLIER: f64 = 1.24;

/// Penalties that are applied on top of the component values.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(super) struct Penalties {
    pub tap: f64,
    pub aim_slider_cheese: f64,
    pub flashlight_slider_cheese: f64,
    pub visual_slider_cheese: f64,
}

impl Default for Penalties {
    fn default() -> Self {
        Self {
            tap: 1.0,
            aim_slider_cheese: 1.0,
            flashlight_slider_cheese: 1.0,
            visual_slider_cheese: 1.0,
        }
    }
}

pub(super) struct DroidPerformanceCalculator {
    attrs: DroidDifficultyAttributes,
    state: DroidScoreState,
    effective_miss_count: f64,
    slider_breaks: SliderBreaks,
    penalties: Penalties,
}

impl DroidPerformanceCalculator {
    pub const fn new(
        attrs: DroidDifficultyAttributes,
        state: DroidScoreState,
        effective_miss_count: f64,
        slider_breaks: SliderBreaks,
        penalties: Penalties,
    ) -> Self {
        Self {
            attrs,
            state,
            effective_miss_count,
            slider_breaks,
            penalties,
        }
    }
}

impl DroidPerformanceCalculator {
    pub fn calculate(self) -> DroidPerformanceAttributes {
        let Penalties {
            tap: tap_penalty,
            aim_slider_cheese,
            flashlight_slider_cheese,
            visual_slider_cheese,
        } = self.penalties;

        if self.state.total_hits() == 0 {
            return DroidPerformanceAttributes {
                difficulty: self.attrs,
                deviation: f64::INFINITY,
                tap_deviation: f64::INFINITY,
                tap_penalty,
                aim_slider_cheese_penalty: aim_slider_cheese,
                flashlight_slider_cheese_penalty: flashlight_slider_cheese,
                visual_slider_cheese_penalty: visual_slider_cheese,
                ..Default::default()
            };
        }

        let mods = self.attrs.mods;

        let mut multiplier = PERFORMANCE_BASE_MULTIPLIER;

        if mods.nf() {
            multiplier *= (1.0 - 0.02 * self.effective_miss_count).max(0.9);
        }

        let deviation = self.calculate_deviation();
        let tap_deviation = self.calculate_tap_deviation();

        let aim_value = self.compute_aim_value(deviation);
        let tap_value = self.compute_tap_value(tap_deviation);
        let acc_value = self.compute_accuracy_value(deviation);
        let flashlight_value = self.compute_flashlight_value(deviation);
        let visual_value = self.compute_visual_value(deviation);

        let mut attrs = DroidPerformanceAttributes {
            difficulty: self.attrs,
            pp_acc: acc_value,
            effective_miss_count: self.effective_miss_count,
            deviation,
            tap_deviation,
            tap_penalty,
            aim_slider_cheese_penalty: aim_slider_cheese,
            flashlight_slider_cheese_penalty: flashlight_slider_cheese,
            visual_slider_cheese_penalty: visual_slider_cheese,
            base_aim: aim_value,
            base_tap: tap_value,
            base_flashlight: flashlight_value,
            base_visual: visual_value,
            multiplier,
            ..Default::default()
        };

        attrs.recompute();

        tracing::debug!(
            pp = attrs.pp,
            aim = attrs.pp_aim,
            tap = attrs.pp_tap,
            acc = attrs.pp_acc,
            flashlight = attrs.pp_flashlight,
            visual = attrs.pp_visual,
            deviation,
            tap_deviation,
            effective_miss_count = attrs.effective_miss_count,
            "Calculated osu!droid performance"
        );

        attrs
    }

    fn compute_aim_value(&self, deviation: f64) -> f64 {
        if self.attrs.mods.ap() {
            return 0.0;
        }

        let aim_difficulty = self.attrs.aim
            * self.slider_nerf_factor(
                self.attrs.aim_slider_factor,
                self.attrs.aim_difficult_sliders.len(),
            );

        let mut aim_value = difficulty_to_performance(aim_difficulty);

        aim_value *= self.miss_penalty(
            &self.attrs.aim_miss_penalty_curve,
            aim_difficulty,
            self.attrs.aim_difficult_strain_count,
        );

        aim_value * window_scaling(self.attrs.ok_hit_window, deviation)
    }

    fn compute_tap_value(&self, tap_deviation: f64) -> f64 {
        if self.attrs.mods.rx() {
            return 0.0;
        }

        let mut tap_value = difficulty_to_performance(self.attrs.tap);

        tap_value *= self.miss_penalty(
            &self.attrs.tap_miss_penalty_curve,
            self.attrs.tap,
            self.attrs.tap_difficult_strain_count,
        );

        tap_value *= window_scaling(self.attrs.great_hit_window, tap_deviation);

        // Inconsistent hits hint at vibrating through the map
        if tap_deviation.is_finite() {
            let t = reverse_lerp(tap_deviation, 20.0, 30.0);
            tap_value *= lerp(1.0, self.attrs.vibro_factor, t);
        }

        tap_value
    }

    fn compute_accuracy_value(&self, deviation: f64) -> f64 {
        let n_circles = self.attrs.n_circles;

        if self.attrs.mods.rx() || n_circles == 0 || deviation.is_infinite() {
            return 0.0;
        }

        let mut acc_value = 650.0
            * (-0.125 * deviation).exp()
            * (f64::from(n_circles) / 1000.0).powf(0.3).min(1.15);

        if self.attrs.mods.hd() {
            acc_value *= 1.08;
        }

        if self.attrs.mods.fl() {
            acc_value *= 1.02;
        }

        acc_value
    }

    fn compute_flashlight_value(&self, deviation: f64) -> f64 {
        if !self.attrs.mods.fl() {
            return 0.0;
        }

        let flashlight_difficulty = self.attrs.flashlight
            * self.slider_nerf_factor(
                self.attrs.flashlight_slider_factor,
                self.attrs.flashlight_difficult_sliders.len(),
            );

        let mut flashlight_value = DroidFlashlight::difficulty_to_performance(flashlight_difficulty);

        flashlight_value *= self.proportional_miss_penalty(0.875);
        flashlight_value *= combo_scaling_factor(self.state.max_combo, self.attrs.max_combo);

        flashlight_value * window_scaling(self.attrs.meh_hit_window, deviation)
    }

    fn compute_visual_value(&self, deviation: f64) -> f64 {
        let visual_difficulty = self.attrs.visual
            * self.slider_nerf_factor(
                self.attrs.visual_slider_factor,
                self.attrs.aim_difficult_sliders.len(),
            );

        let mut visual_value = DroidVisual::difficulty_to_performance(visual_difficulty);

        visual_value *= self.proportional_miss_penalty(0.9);

        visual_value * window_scaling(self.attrs.ok_hit_window, deviation)
    }

    fn slider_nerf_factor(&self, slider_factor: f64, difficult_slider_count: usize) -> f64 {
        let DroidScoreState {
            max_combo,
            n100,
            n50,
            misses,
            ..
        } = self.state;

        slider_nerf_factor(
            slider_factor,
            difficult_slider_count as f64,
            n100 + n50 + misses,
            self.attrs.max_combo.saturating_sub(max_combo),
            self.slider_breaks,
        )
    }

    /// Penalty based on the retry-time model if available and otherwise on
    /// the amount of difficult strains.
    fn miss_penalty(&self, curve: &MissPenaltyCurve, rating: f64, difficult_strains: f64) -> f64 {
        if self.effective_miss_count <= 0.0 {
            1.0
        } else if curve.is_empty() {
            strain_count_miss_penalty(self.effective_miss_count, difficult_strains)
        } else {
            curve.penalty(self.effective_miss_count, rating)
        }
    }

    fn proportional_miss_penalty(&self, exponent: f64) -> f64 {
        proportional_miss_penalty(
            self.effective_miss_count,
            f64::from(self.state.total_hits()),
            exponent,
        )
    }

    /// Deviation of hits on circles.
    ///
    /// Sliders are assumed to have been hit with greats so all mistakes
    /// count towards circles. If no circle was hit successfully, slider
    /// heads and then all objects are taken into account instead.
    fn calculate_deviation(&self) -> f64 {
        let n_circles = f64::from(self.attrs.n_circles);
        let n_sliders = f64::from(self.attrs.n_sliders);

        self.worst_case_deviation(&[
            n_circles,
            n_circles + n_sliders,
            f64::from(self.state.total_hits()),
        ])
    }

    /// Deviation of hits on notes that are relevant for tapping.
    fn calculate_tap_deviation(&self) -> f64 {
        let total_hits = f64::from(self.state.total_hits());

        let mut speed_note_count = self.attrs.speed_note_count;
        speed_note_count += (total_hits - self.attrs.speed_note_count) * 0.1;

        self.worst_case_deviation(&[speed_note_count, total_hits])
    }

    /// Deviation among the first amount of objects in `object_counts` that
    /// contains successful hits, assuming that all mistakes happened on
    /// them.
    ///
    /// Only infinite if no object was hit at all.
    fn worst_case_deviation(&self, object_counts: &[f64]) -> f64 {
        if self.state.total_successful_hits() == 0 {
            return f64::INFINITY;
        }

        let windows = JudgementWindows {
            great: self.attrs.great_hit_window,
            ok: self.attrs.ok_hit_window,
            meh: self.attrs.meh_hit_window,
        };

        let DroidScoreState {
            n100, n50, misses, ..
        } = self.state;

        object_counts
            .iter()
            .find_map(|&object_count| {
                RelevantHits::worst_case(n100, n50, misses, object_count).deviation(&windows)
            })
            .unwrap_or(f64::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> DroidDifficultyAttributes {
        DroidDifficultyAttributes {
            great_hit_window: 60.0,
            ok_hit_window: 120.0,
            meh_hit_window: 280.0,
            n_circles: 80,
            n_sliders: 20,
            speed_note_count: 40.0,
            max_combo: 120,
            ..Default::default()
        }
    }

    fn calculator(state: DroidScoreState) -> DroidPerformanceCalculator {
        with_attrs(attrs(), state)
    }

    fn with_attrs(
        attrs: DroidDifficultyAttributes,
        state: DroidScoreState,
    ) -> DroidPerformanceCalculator {
        DroidPerformanceCalculator::new(
            attrs,
            state,
            0.0,
            SliderBreaks::default(),
            Penalties::default(),
        )
    }

    #[test]
    fn tap_deviation_focuses_on_speed_notes() {
        let calc = calculator(DroidScoreState {
            max_combo: 120,
            n300: 90,
            n100: 10,
            n50: 0,
            misses: 0,
        });

        let deviation = calc.calculate_deviation();
        let tap_deviation = calc.calculate_tap_deviation();

        assert!(deviation.is_finite());
        assert!(tap_deviation > deviation, "{tap_deviation} vs {deviation}");
    }

    #[test]
    fn only_misses_have_infinite_deviation() {
        let calc = calculator(DroidScoreState {
            max_combo: 0,
            n300: 0,
            n100: 0,
            n50: 0,
            misses: 100,
        });

        assert!(calc.calculate_deviation().is_infinite());
        assert!(calc.calculate_tap_deviation().is_infinite());
        assert_eq!(calc.compute_accuracy_value(f64::INFINITY), 0.0);
    }

    #[test]
    fn slider_only_play_has_finite_deviation() {
        let slider_only = DroidDifficultyAttributes {
            aim: 2.0,
            n_circles: 0,
            n_sliders: 60,
            speed_note_count: 0.0,
            max_combo: 180,
            ..attrs()
        };

        let calc = with_attrs(
            slider_only,
            DroidScoreState {
                max_combo: 180,
                n300: 60,
                n100: 0,
                n50: 0,
                misses: 0,
            },
        );

        let deviation = calc.calculate_deviation();
        let tap_deviation = calc.calculate_tap_deviation();

        assert!(deviation.is_finite() && deviation > 0.0, "{deviation}");
        assert!(tap_deviation.is_finite(), "{tap_deviation}");
        assert!(calc.compute_aim_value(deviation) > 0.0);
    }

    #[test]
    fn missed_circles_fall_back_to_sliders() {
        let calc = calculator(DroidScoreState {
            max_combo: 20,
            n300: 20,
            n100: 0,
            n50: 0,
            misses: 80,
        });

        assert!(calc.calculate_deviation().is_finite());
    }
}
