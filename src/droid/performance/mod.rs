use std::cmp;

use crate::{
    any::{
        difficulty::Difficulty,
        performance::{
            clamp_combo, effective_miss_count, HitResultInput, HitResultPriority, HitResults,
            SliderBreaks,
        },
    },
    model::{beatmap::Beatmap, mods::GameMods},
    util::map_or_attrs::MapOrAttrs,
};

use self::calculator::{DroidPerformanceCalculator, Penalties};

use super::{
    attributes::{
        validate_slider_cheese_penalty, validate_tap_penalty, DroidDifficultyAttributes,
        DroidPerformanceAttributes, PenaltyError,
    },
    score_state::DroidScoreState,
    Droid,
};

mod calculator;

/// Performance calculator on osu!droid maps.
///
/// # Example
///
/// ```
/// use droid_pp::{droid::DroidPerformance, Beatmap};
///
/// # let map = Beatmap::default();
/// let attrs = DroidPerformance::new(&map)
///     .mods(8 + 64) // HDDT
///     .combo(1)
///     .accuracy(98.5)
///     .misses(0)
///     .calculate();
///
/// assert!(attrs.pp() >= 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct DroidPerformance<'map> {
    map_or_attrs: MapOrAttrs<'map, Droid>,
    difficulty: Difficulty,
    acc: Option<f64>,
    combo: Option<u32>,
    n300: Option<u32>,
    n100: Option<u32>,
    n50: Option<u32>,
    misses: Option<u32>,
    slider_breaks: SliderBreaks,
    hitresult_priority: HitResultPriority,
    penalties: Penalties,
}

impl<'map> DroidPerformance<'map> {
    /// Create a new performance calculator for osu!droid maps.
    ///
    /// The argument `map_or_attrs` must be either
    /// - previously calculated attributes ([`DroidDifficultyAttributes`]
    ///   or [`DroidPerformanceAttributes`])
    /// - a beatmap ([`Beatmap`] or `&Beatmap`)
    ///
    /// If a map is given, difficulty attributes will need to be calculated
    /// internally which is a costly operation. Hence, passing attributes
    /// should be prefered.
    ///
    /// Attributes carry the mods they were calculated with so mods that are
    /// specified afterwards only apply if a map was given.
    pub fn new(map_or_attrs: impl Into<MapOrAttrs<'map, Droid>>) -> Self {
        Self {
            map_or_attrs: map_or_attrs.into(),
            difficulty: Difficulty::new(),
            acc: None,
            combo: None,
            n300: None,
            n100: None,
            n50: None,
            misses: None,
            slider_breaks: SliderBreaks::default(),
            hitresult_priority: HitResultPriority::default(),
            penalties: Penalties::default(),
        }
    }

    /// Provide the result of a previous difficulty or performance calculation.
    /// If you already calculated the attributes for the current map-mod combination,
    /// be sure to put them in here so that they don't have to be recalculated.
    pub fn attributes(mut self, attrs: impl Into<DroidDifficultyAttributes>) -> Self {
        self.map_or_attrs = MapOrAttrs::Attrs(attrs.into());

        self
    }

    /// Specify mods.
    ///
    /// Accepted types are
    /// - `u32` (legacy bits)
    /// - [`rosu_mods::GameModsLegacy`]
    /// - [`GameMods`]
    pub fn mods(mut self, mods: impl Into<GameMods>) -> Self {
        self.difficulty = self.difficulty.mods(mods);

        self
    }

    /// Use the specified settings of the given [`Difficulty`].
    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;

        self
    }

    /// Amount of passed objects for partial plays, e.g. a fail.
    pub fn passed_objects(mut self, passed_objects: u32) -> Self {
        self.difficulty = self.difficulty.passed_objects(passed_objects);

        self
    }

    /// Adjust the clock rate used in the calculation.
    ///
    /// If none is specified, it will take the clock rate based on the mods
    /// i.e. 1.5 for DT, 0.75 for HT and 1.0 otherwise.
    ///
    /// | Minimum | Maximum |
    /// | :-----: | :-----: |
    /// | 0.01    | 100     |
    pub fn clock_rate(mut self, clock_rate: f64) -> Self {
        self.difficulty = self.difficulty.clock_rate(clock_rate);

        self
    }

    /// Override a beatmap's set AR.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    pub fn ar(mut self, ar: f32, with_mods: bool) -> Self {
        self.difficulty = self.difficulty.ar(ar, with_mods);

        self
    }

    /// Override a beatmap's set CS.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    pub fn cs(mut self, cs: f32, with_mods: bool) -> Self {
        self.difficulty = self.difficulty.cs(cs, with_mods);

        self
    }

    /// Override a beatmap's set HP.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    pub fn hp(mut self, hp: f32, with_mods: bool) -> Self {
        self.difficulty = self.difficulty.hp(hp, with_mods);

        self
    }

    /// Override a beatmap's set OD.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    pub fn od(mut self, od: f32, with_mods: bool) -> Self {
        self.difficulty = self.difficulty.od(od, with_mods);

        self
    }

    /// Specify the max combo of the play.
    pub const fn combo(mut self, combo: u32) -> Self {
        self.combo = Some(combo);

        self
    }

    /// Specify how hitresults should be generated.
    ///
    /// Defauls to [`HitResultPriority::BestCase`].
    pub const fn hitresult_priority(mut self, priority: HitResultPriority) -> Self {
        self.hitresult_priority = priority;

        self
    }

    /// Specify the amount of 300s of a play.
    pub const fn n300(mut self, n300: u32) -> Self {
        self.n300 = Some(n300);

        self
    }

    /// Specify the amount of 100s of a play.
    pub const fn n100(mut self, n100: u32) -> Self {
        self.n100 = Some(n100);

        self
    }

    /// Specify the amount of 50s of a play.
    pub const fn n50(mut self, n50: u32) -> Self {
        self.n50 = Some(n50);

        self
    }

    /// Specify the amount of misses of a play.
    pub const fn misses(mut self, n_misses: u32) -> Self {
        self.misses = Some(n_misses);

        self
    }

    /// Specify the amount of slider ends that were dropped.
    ///
    /// Dropped slider ends don't break combo but lower the reachable
    /// maximum combo.
    pub const fn slider_end_drops(mut self, slider_end_drops: u32) -> Self {
        self.slider_breaks.end_drops = Some(slider_end_drops);

        self
    }

    /// Specify the amount of missed slider ticks and repeats.
    ///
    /// Missed ticks break combo and indicate sliders that weren't followed
    /// properly.
    pub const fn large_tick_misses(mut self, large_tick_misses: u32) -> Self {
        self.slider_breaks.large_tick_misses = Some(large_tick_misses);

        self
    }

    /// Divide the tap value by `penalty`, e.g. for sections that were
    /// tapped with three fingers.
    ///
    /// The penalty must be finite and at least `1.0`.
    pub fn tap_penalty(mut self, penalty: f64) -> Result<Self, PenaltyError> {
        self.penalties.tap = validate_tap_penalty(penalty)?;

        Ok(self)
    }

    /// Multiply the aim value with `penalty` for cheesed sliders.
    ///
    /// The penalty must be within `(0, 1]`.
    pub fn aim_slider_cheese_penalty(mut self, penalty: f64) -> Result<Self, PenaltyError> {
        self.penalties.aim_slider_cheese = validate_slider_cheese_penalty(penalty)?;

        Ok(self)
    }

    /// Multiply the flashlight value with `penalty` for cheesed sliders.
    ///
    /// The penalty must be within `(0, 1]`.
    pub fn flashlight_slider_cheese_penalty(mut self, penalty: f64) -> Result<Self, PenaltyError> {
        self.penalties.flashlight_slider_cheese = validate_slider_cheese_penalty(penalty)?;

        Ok(self)
    }

    /// Multiply the visual value with `penalty` for cheesed sliders.
    ///
    /// The penalty must be within `(0, 1]`.
    pub fn visual_slider_cheese_penalty(mut self, penalty: f64) -> Result<Self, PenaltyError> {
        self.penalties.visual_slider_cheese = validate_slider_cheese_penalty(penalty)?;

        Ok(self)
    }

    /// Provide parameters through a [`DroidScoreState`].
    #[allow(clippy::needless_pass_by_value)]
    pub const fn state(mut self, state: DroidScoreState) -> Self {
        let DroidScoreState {
            max_combo,
            n300,
            n100,
            n50,
            misses,
        } = state;

        self.combo = Some(max_combo);
        self.n300 = Some(n300);
        self.n100 = Some(n100);
        self.n50 = Some(n50);
        self.misses = Some(misses);

        self
    }

    /// Specify the accuracy of a play between `0.0` and `100.0`.
    /// This will be used to generate matching hitresults.
    pub fn accuracy(mut self, acc: f64) -> Self {
        self.acc = Some(acc.clamp(0.0, 100.0) / 100.0);

        self
    }

    /// Create the [`DroidScoreState`] that will be used for performance
    /// calculation.
    pub fn generate_state(&mut self) -> DroidScoreState {
        let attrs = match self.map_or_attrs {
            MapOrAttrs::Map(ref map) => {
                let attrs = self.difficulty.calculate_for_mode::<Droid>(map);

                self.map_or_attrs.insert_attrs(attrs)
            }
            MapOrAttrs::Attrs(ref mut attrs) => attrs,
        };

        let max_combo = attrs.max_combo;
        let passed_objects = u32::try_from(self.difficulty.get_passed_objects()).unwrap_or(u32::MAX);
        let n_objects = cmp::min(passed_objects, attrs.n_objects());

        let input = HitResultInput {
            n300: self.n300,
            n100: self.n100,
            n50: self.n50,
            misses: self.misses,
            acc: self.acc,
            priority: self.hitresult_priority,
        };

        let HitResults {
            n300,
            n100,
            n50,
            misses,
        } = input.generate(n_objects);

        let lost_combo = self.slider_breaks.lost_combo();

        DroidScoreState {
            max_combo: clamp_combo(self.combo, max_combo, misses, lost_combo),
            n300,
            n100,
            n50,
            misses,
        }
    }

    /// Calculate all performance related values, including pp and stars.
    pub fn calculate(mut self) -> DroidPerformanceAttributes {
        let state = self.generate_state();

        let attrs = match self.map_or_attrs {
            MapOrAttrs::Map(ref map) => self.difficulty.calculate_for_mode::<Droid>(map),
            MapOrAttrs::Attrs(attrs) => attrs,
        };

        let effective_miss_count = effective_miss_count(
            attrs.max_combo,
            attrs.n_sliders,
            state.max_combo,
            state.n100 + state.n50 + state.misses,
            state.misses,
            self.slider_breaks,
        );

        DroidPerformanceCalculator::new(
            attrs,
            state,
            effective_miss_count,
            self.slider_breaks,
            self.penalties,
        )
        .calculate()
    }
}

impl From<DroidDifficultyAttributes> for MapOrAttrs<'_, Droid> {
    fn from(attrs: DroidDifficultyAttributes) -> Self {
        Self::Attrs(attrs)
    }
}

impl From<DroidPerformanceAttributes> for MapOrAttrs<'_, Droid> {
    fn from(attrs: DroidPerformanceAttributes) -> Self {
        Self::Attrs(attrs.difficulty)
    }
}

impl<'map> From<&'map Beatmap> for DroidPerformance<'map> {
    fn from(map: &'map Beatmap) -> Self {
        Self::new(map)
    }
}

impl From<DroidDifficultyAttributes> for DroidPerformance<'_> {
    fn from(attrs: DroidDifficultyAttributes) -> Self {
        Self::new(attrs)
    }
}

impl From<DroidPerformanceAttributes> for DroidPerformance<'_> {
    fn from(attrs: DroidPerformanceAttributes) -> Self {
        Self::new(attrs)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::droid::attributes::DifficultSlider;

    use super::*;

    const N_OBJECTS: u32 = 552;

    fn attrs() -> DroidDifficultyAttributes {
        DroidDifficultyAttributes {
            aim: 2.4,
            tap: 2.1,
            rhythm: 1.1,
            flashlight: 1.6,
            visual: 1.2,
            reading: 0.9,
            aim_slider_factor: 0.95,
            flashlight_slider_factor: 0.97,
            visual_slider_factor: 0.98,
            speed_note_count: 250.0,
            average_speed_delta_time: 110.0,
            vibro_factor: 0.9,
            aim_difficult_strain_count: 110.0,
            tap_difficult_strain_count: 80.0,
            flashlight_difficult_strain_count: 60.0,
            visual_difficult_strain_count: 70.0,
            aim_difficult_sliders: vec![
                DifficultSlider {
                    index: 12,
                    difficulty_rating: 0.2,
                },
                DifficultSlider {
                    index: 40,
                    difficulty_rating: 0.1,
                },
            ],
            ar: 9.0,
            od: 8.0,
            hp: 5.0,
            clock_rate: 1.0,
            great_hit_window: 60.0,
            ok_hit_window: 120.0,
            meh_hit_window: 280.0,
            n_circles: 400,
            n_sliders: 150,
            n_spinners: 2,
            stars: 4.1,
            max_combo: 900,
            ..Default::default()
        }
    }

    #[test]
    fn state_from_accuracy() {
        let state = DroidPerformance::new(attrs())
            .accuracy(97.0)
            .misses(3)
            .combo(500)
            .generate_state();

        assert_eq!(state.total_hits(), 552);
        assert_eq!(state.misses, 3);
        assert_eq!(state.max_combo, 500);
        assert!((state.accuracy() - 0.97).abs() < 0.001);
    }

    #[test]
    fn slider_end_drops_limit_combo() {
        let state = DroidPerformance::new(attrs())
            .misses(2)
            .slider_end_drops(5)
            .generate_state();

        assert_eq!(state.max_combo, 893);

        let state = DroidPerformance::new(attrs())
            .combo(1000)
            .slider_end_drops(5)
            .generate_state();

        assert_eq!(state.max_combo, 895);
    }

    #[test]
    fn known_drops_replace_estimate() {
        let estimated = DroidPerformance::new(attrs())
            .n100(10)
            .n50(2)
            .combo(880)
            .calculate();

        let known = DroidPerformance::new(attrs())
            .n100(10)
            .n50(2)
            .combo(880)
            .slider_end_drops(20)
            .calculate();

        assert!(estimated.effective_miss_count > 0.0);
        assert_eq!(known.effective_miss_count, 0.0);
    }

    #[test]
    fn tick_misses_break_combo() {
        let state = DroidPerformance::new(attrs())
            .misses(1)
            .slider_end_drops(2)
            .large_tick_misses(4)
            .generate_state();

        assert_eq!(state.max_combo, 893);

        let clean = DroidPerformance::new(attrs())
            .slider_end_drops(0)
            .large_tick_misses(0)
            .calculate();

        let missed_ticks = DroidPerformance::new(attrs())
            .slider_end_drops(0)
            .large_tick_misses(4)
            .calculate();

        assert_eq!(clean.effective_miss_count, 0.0);
        assert!(missed_ticks.effective_miss_count > 0.0);
        assert!(missed_ticks.effective_miss_count <= 4.0);
        assert!(missed_ticks.pp_aim < clean.pp_aim);
    }

    #[test]
    fn penalty_validation_matches_attributes() {
        let perf_attrs = DroidPerformance::new(attrs()).calculate();

        for penalty in [-1.0, 0.0, 0.5, 1.0, 1.5, f64::INFINITY, f64::NAN] {
            let builder = DroidPerformance::new(attrs()).tap_penalty(penalty);
            let applied = perf_attrs.clone().apply_tap_penalty(penalty);
            assert_eq!(builder.is_ok(), applied.is_ok(), "tap {penalty}");

            let builder = DroidPerformance::new(attrs()).aim_slider_cheese_penalty(penalty);
            let applied = perf_attrs.clone().apply_aim_slider_cheese_penalty(penalty);
            assert_eq!(builder.is_ok(), applied.is_ok(), "cheese {penalty}");
        }
    }

    #[test]
    fn misses_reduce_pp() {
        let fc = DroidPerformance::new(attrs()).calculate();
        let missed = DroidPerformance::new(attrs()).misses(5).combo(400).calculate();

        assert!(fc.pp() > missed.pp());
        assert!(missed.effective_miss_count >= 5.0);
        assert!(fc.deviation.is_finite());
        assert!(fc.tap_deviation.is_finite());
    }

    #[test]
    fn penalties_are_validated() {
        assert!(DroidPerformance::new(attrs()).tap_penalty(0.9).is_err());
        assert!(DroidPerformance::new(attrs()).tap_penalty(f64::NAN).is_err());
        assert!(DroidPerformance::new(attrs())
            .aim_slider_cheese_penalty(0.0)
            .is_err());
        assert!(DroidPerformance::new(attrs())
            .visual_slider_cheese_penalty(1.01)
            .is_err());
    }

    #[test]
    fn tap_penalty_divides_tap() {
        let plain = DroidPerformance::new(attrs()).calculate();
        let penalized = DroidPerformance::new(attrs())
            .tap_penalty(2.0)
            .unwrap()
            .calculate();

        assert!((penalized.pp_tap - plain.pp_tap / 2.0).abs() < 1e-9);
        assert_eq!(penalized.base_tap, plain.base_tap);
        assert!(penalized.pp < plain.pp);
    }

    #[test]
    fn flashlight_only_with_mod() {
        let nomod = DroidPerformance::new(attrs()).calculate();
        assert_eq!(nomod.pp_flashlight, 0.0);

        let fl_attrs = DroidDifficultyAttributes {
            mods: GameMods::from(1024),
            ..attrs()
        };

        let fl = DroidPerformance::new(fl_attrs).calculate();
        assert!(fl.pp_flashlight > 0.0);
    }

    #[test]
    fn all_misses_have_infinite_deviation() {
        let attrs = DroidPerformance::new(attrs()).misses(552).calculate();

        assert!(attrs.deviation.is_infinite());
        assert!(attrs.tap_deviation.is_infinite());
        assert_eq!(attrs.pp_acc, 0.0);
        assert!(!attrs.pp.is_nan());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn hitresults(
            acc in 0.0..=1.0,
            n300 in prop::option::weighted(0.10, 0_u32..=N_OBJECTS + 10),
            n100 in prop::option::weighted(0.10, 0_u32..=N_OBJECTS + 10),
            n50 in prop::option::weighted(0.10, 0_u32..=N_OBJECTS + 10),
            n_misses in prop::option::weighted(0.15, 0_u32..=N_OBJECTS + 10),
            combo in prop::option::weighted(0.20, 0_u32..=1000),
            drops in prop::option::weighted(0.20, 0_u32..=200),
            best_case in prop::bool::ANY,
        ) {
            let priority = if best_case {
                HitResultPriority::BestCase
            } else {
                HitResultPriority::WorstCase
            };

            let mut perf = DroidPerformance::from(attrs())
                .accuracy(acc * 100.0)
                .hitresult_priority(priority);

            if let Some(n300) = n300 {
                perf = perf.n300(n300);
            }

            if let Some(n100) = n100 {
                perf = perf.n100(n100);
            }

            if let Some(n50) = n50 {
                perf = perf.n50(n50);
            }

            if let Some(misses) = n_misses {
                perf = perf.misses(misses);
            }

            if let Some(combo) = combo {
                perf = perf.combo(combo);
            }

            if let Some(drops) = drops {
                perf = perf.slider_end_drops(drops);
            }

            let first = perf.generate_state();
            let state = perf.generate_state();
            prop_assert_eq!(first, state);

            prop_assert_eq!(state.total_hits(), N_OBJECTS);
            prop_assert_eq!(state.misses, n_misses.map_or(0, |n| n.min(N_OBJECTS)));

            let max_combo = 900_u32
                .saturating_sub(state.misses)
                .saturating_sub(drops.unwrap_or(0));

            prop_assert!(state.max_combo <= max_combo);
        }
    }
}
