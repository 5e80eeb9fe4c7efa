use crate::{
    any::{
        deviation::{JudgementWindows, RelevantHits},
        difficulty::skills::difficulty_to_performance,
        performance::{
            combo_scaling_factor, proportional_miss_penalty, slider_nerf_factor,
            strain_count_miss_penalty, SliderBreaks,
        },
    },
    model::mods::GameMods,
    osu::{
        difficulty::skills::flashlight::Flashlight, OsuDifficultyAttributes,
        OsuPerformanceAttributes, OsuScoreState,
    },
    util::{
        difficulty::{lerp, reverse_lerp},
        float_ext::FloatExt,
    },
};

pub const PERFORMANCE_BASE_MULTIPLIER: f64 = 1.15;

pub(super) struct OsuPerformanceCalculator<'mods> {
    attrs: OsuDifficultyAttributes,
    mods: &'mods GameMods,
    acc: f64,
    state: OsuScoreState,
    effective_miss_count: f64,
    slider_breaks: SliderBreaks,
}

impl<'a> OsuPerformanceCalculator<'a> {
    pub fn new(
        attrs: OsuDifficultyAttributes,
        mods: &'a GameMods,
        state: OsuScoreState,
        effective_miss_count: f64,
        slider_breaks: SliderBreaks,
    ) -> Self {
        Self {
            attrs,
            mods,
            acc: state.accuracy(),
            state,
            effective_miss_count,
            slider_breaks,
        }
    }
}

impl OsuPerformanceCalculator<'_> {
    pub fn calculate(mut self) -> OsuPerformanceAttributes {
        let total_hits = self.state.total_hits();

        if total_hits == 0 {
            return OsuPerformanceAttributes {
                difficulty: self.attrs,
                ..Default::default()
            };
        }

        let total_hits = f64::from(total_hits);

        let mut multiplier = PERFORMANCE_BASE_MULTIPLIER;

        if self.mods.nf() {
            multiplier *= (1.0 - 0.02 * self.effective_miss_count).max(0.9);
        }

        if self.mods.so() && total_hits > 0.0 {
            multiplier *= 1.0 - (f64::from(self.attrs.n_spinners) / total_hits).powf(0.85);
        }

        if self.mods.rx() {
            let od = self.attrs.od;

            // The great window closes at OD 13.33
            let (n100_mult, n50_mult) = if od > 0.0 {
                (
                    (1.0 - (od / 13.33).powf(1.8)).max(0.0),
                    (1.0 - (od / 13.33).powf(5.0)).max(0.0),
                )
            } else {
                (1.0, 1.0)
            };

            // Oks and mehs count as partial misses on relax
            self.effective_miss_count = (self.effective_miss_count
                + f64::from(self.state.n100) * n100_mult
                + f64::from(self.state.n50) * n50_mult)
                .min(total_hits);
        }

        let speed_deviation = self.calculate_speed_deviation();

        let aim_value = self.compute_aim_value();
        let speed_value = self.compute_speed_value(speed_deviation);
        let acc_value = self.compute_accuracy_value();
        let flashlight_value = self.compute_flashlight_value();

        let pp = (aim_value.powf(1.1)
            + speed_value.powf(1.1)
            + acc_value.powf(1.1)
            + flashlight_value.powf(1.1))
        .powf(1.0 / 1.1)
            * multiplier;

        tracing::debug!(
            pp,
            aim = aim_value,
            speed = speed_value,
            acc = acc_value,
            flashlight = flashlight_value,
            effective_miss_count = self.effective_miss_count,
            "Calculated osu!standard performance"
        );

        OsuPerformanceAttributes {
            difficulty: self.attrs,
            pp_acc: acc_value,
            pp_aim: aim_value,
            pp_flashlight: flashlight_value,
            pp_speed: speed_value,
            pp,
            effective_miss_count: self.effective_miss_count,
            speed_deviation,
        }
    }

    fn compute_aim_value(&self) -> f64 {
        if self.mods.ap() {
            return 0.0;
        }

        let aim_difficulty = self.attrs.aim
            * slider_nerf_factor(
                self.attrs.slider_factor,
                self.attrs.aim_difficult_slider_count,
                total_imperfect_hits(&self.state),
                self.attrs.max_combo.saturating_sub(self.state.max_combo),
                self.slider_breaks,
            );

        let len_bonus = length_bonus(self.total_hits());

        let mut aim_value = difficulty_to_performance(aim_difficulty) * len_bonus;

        if self.effective_miss_count > 0.0 {
            aim_value *= strain_count_miss_penalty(
                self.effective_miss_count,
                self.attrs.aim_difficult_strain_count,
            );
        }

        // Low AR is only rewarded for aim
        let ar_factor = if self.mods.rx() {
            0.0
        } else if self.attrs.ar < 8.0 {
            0.05 * (8.0 - self.attrs.ar)
        } else {
            self.high_ar_factor()
        };

        aim_value *= 1.0 + ar_factor * len_bonus;
        aim_value *= self.hidden_bonus();
        aim_value *= self.acc * self.od_scaling();

        aim_value
    }

    fn compute_speed_value(&self, speed_deviation: Option<f64>) -> f64 {
        let Some(speed_deviation) = speed_deviation.filter(|_| !self.mods.rx()) else {
            return 0.0;
        };

        let len_bonus = length_bonus(self.total_hits());

        let mut speed_value = difficulty_to_performance(self.attrs.speed) * len_bonus;

        if self.effective_miss_count > 0.0 {
            speed_value *= strain_count_miss_penalty(
                self.effective_miss_count,
                self.attrs.speed_difficult_strain_count,
            );
        }

        let ar_factor = if self.mods.ap() {
            0.0
        } else {
            self.high_ar_factor()
        };

        speed_value *= 1.0 + ar_factor * len_bonus;
        speed_value *= self.hidden_bonus();
        speed_value *= self.speed_high_deviation_nerf(speed_deviation);

        let od = self.attrs.od;

        speed_value *= (0.95 + f64::powf(f64::max(0.0, od), 2.0) / 750.0)
            * f64::powf((self.acc + self.speed_note_accuracy()) / 2.0, (14.5 - od) / 2.0);

        speed_value
    }

    fn compute_accuracy_value(&self) -> f64 {
        let n_circles = self.attrs.n_circles;

        if self.mods.rx() || n_circles == 0 {
            return 0.0;
        }

        // Only circles have a timing window so every other object is
        // assumed to be a 300
        let n_other = i64::from(self.state.total_hits()) - i64::from(n_circles);

        let numerator = (i64::from(self.state.n300) - n_other.max(0)) * 6
            + i64::from(self.state.n100) * 2
            + i64::from(self.state.n50);

        // Can be negative
        let circle_acc = (numerator as f64 / f64::from(n_circles * 6)).max(0.0);

        let mut acc_value = 1.52163_f64.powf(self.attrs.od) * circle_acc.powf(24.0) * 2.83;

        // Keeping accuracy up is harder on long maps
        acc_value *= (f64::from(n_circles) / 1000.0).powf(0.3).min(1.15);

        if self.mods.hd() {
            acc_value *= 1.08;
        }

        if self.mods.fl() {
            acc_value *= 1.02;
        }

        acc_value
    }

    fn compute_flashlight_value(&self) -> f64 {
        if !self.mods.fl() {
            return 0.0;
        }

        let total_hits = self.total_hits();

        let mut flashlight_value = Flashlight::difficulty_to_performance(self.attrs.flashlight);

        flashlight_value *= proportional_miss_penalty(self.effective_miss_count, total_hits, 0.875);
        flashlight_value *= combo_scaling_factor(self.state.max_combo, self.attrs.max_combo);

        // Short maps spend relatively more time at the 0 and 100 combo radii
        flashlight_value *= 0.7
            + 0.1 * (total_hits / 200.0).min(1.0)
            + f64::from(u8::from(total_hits > 200.0))
                * 0.2
                * ((total_hits - 200.0) / 200.0).min(1.0);

        flashlight_value *= 0.5 + self.acc / 2.0;
        flashlight_value *= self.od_scaling();

        flashlight_value
    }

    /// Accuracy on speed notes assuming every mistake happened on them.
    fn speed_note_accuracy(&self) -> f64 {
        let speed_note_count = self.attrs.speed_note_count;

        if FloatExt::eq(speed_note_count, 0.0) {
            return 0.0;
        }

        let OsuScoreState { n300, n100, n50, .. } = self.state;

        let other_count = f64::max(0.0, self.total_hits() - speed_note_count);
        let relevant_n300 = (f64::from(n300) - other_count).max(0.0);
        let relevant_n100 =
            (f64::from(n100) - (other_count - f64::from(n300)).max(0.0)).max(0.0);
        let relevant_n50 =
            (f64::from(n50) - (other_count - f64::from(n300 + n100)).max(0.0)).max(0.0);

        (relevant_n300 * 6.0 + relevant_n100 * 2.0 + relevant_n50) / (speed_note_count * 6.0)
    }

    /// Bonus for AR above 10.33, scaled by the length bonus.
    fn high_ar_factor(&self) -> f64 {
        if self.attrs.ar > 10.33 {
            0.3 * (self.attrs.ar - 10.33)
        } else {
            0.0
        }
    }

    /// Hidden is rewarded more on lower AR.
    fn hidden_bonus(&self) -> f64 {
        if self.mods.hd() {
            1.0 + 0.04 * (12.0 - self.attrs.ar)
        } else {
            1.0
        }
    }

    fn od_scaling(&self) -> f64 {
        0.98 + f64::powf(f64::max(0.0, self.attrs.od), 2.0) / 2500.0
    }

    fn calculate_speed_deviation(&self) -> Option<f64> {
        if total_successful_hits(&self.state) == 0 {
            return None;
        }

        // Other notes count a tenth
        let speed_note_count = self.attrs.speed_note_count
            + (f64::from(self.state.total_hits()) - self.attrs.speed_note_count) * 0.1;

        let windows = JudgementWindows {
            great: self.attrs.great_hit_window,
            ok: self.attrs.ok_hit_window,
            meh: self.attrs.meh_hit_window,
        };

        RelevantHits::worst_case(
            self.state.n100,
            self.state.n50,
            self.state.misses,
            speed_note_count,
        )
        .deviation(&windows)
    }

    /// Nerf speed difficulty that exceeds what the deviation suggests the
    /// player can tap properly.
    fn speed_high_deviation_nerf(&self, speed_deviation: f64) -> f64 {
        const SCALE: f64 = 50.0;

        let speed_value = difficulty_to_performance(self.attrs.speed);

        // Performance above the cutoff scales logarithmically
        let excess_speed_difficulty_cutoff = 100.0 + 220.0 * f64::powf(22.0 / speed_deviation, 6.5);

        if speed_value <= excess_speed_difficulty_cutoff {
            return 1.0;
        }

        let mut adjusted_speed_value = SCALE
            * (f64::ln((speed_value - excess_speed_difficulty_cutoff) / SCALE + 1.0)
                + excess_speed_difficulty_cutoff / SCALE);

        // Up to 220 UR counts as tapped properly
        let t = 1.0 - reverse_lerp(speed_deviation, 22.0, 27.0);
        adjusted_speed_value = lerp(adjusted_speed_value, speed_value, t);

        adjusted_speed_value / speed_value
    }

    const fn total_hits(&self) -> f64 {
        self.state.total_hits() as f64
    }
}

fn length_bonus(total_hits: f64) -> f64 {
    0.95 + 0.4 * (total_hits / 2000.0).min(1.0)
        + f64::from(u8::from(total_hits > 2000.0)) * (total_hits / 2000.0).log10() * 0.5
}

const fn total_successful_hits(state: &OsuScoreState) -> u32 {
    state.n300 + state.n100 + state.n50
}

const fn total_imperfect_hits(state: &OsuScoreState) -> u32 {
    state.n100 + state.n50 + state.misses
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> OsuDifficultyAttributes {
        OsuDifficultyAttributes {
            aim: 2.5,
            speed: 2.3,
            speed_note_count: 300.0,
            ar: 9.0,
            od: 8.0,
            great_hit_window: 32.0,
            ok_hit_window: 76.0,
            meh_hit_window: 120.0,
            n_circles: 400,
            n_sliders: 150,
            max_combo: 900,
            ..Default::default()
        }
    }

    fn state() -> OsuScoreState {
        OsuScoreState {
            max_combo: 900,
            n300: 540,
            n100: 10,
            n50: 0,
            misses: 0,
        }
    }

    #[test]
    fn speed_note_accuracy_without_speed_notes() {
        let mods = GameMods::default();

        let no_speed_notes = OsuDifficultyAttributes {
            speed_note_count: 0.0,
            ..attrs()
        };

        let calc = OsuPerformanceCalculator::new(
            no_speed_notes,
            &mods,
            state(),
            0.0,
            SliderBreaks::default(),
        );

        assert_eq!(calc.speed_note_accuracy(), 0.0);

        let calc =
            OsuPerformanceCalculator::new(attrs(), &mods, state(), 0.0, SliderBreaks::default());
        let acc = calc.speed_note_accuracy();

        assert!(acc > 0.9 && acc < 1.0, "{acc}");
    }

    #[test]
    fn length_bonus_grows() {
        assert!((length_bonus(0.0) - 0.95).abs() < 1e-12);
        assert!((length_bonus(2000.0) - 1.35).abs() < 1e-12);
        assert!(length_bonus(4000.0) > length_bonus(2000.0));
    }
}
