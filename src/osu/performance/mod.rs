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

use self::calculator::OsuPerformanceCalculator;

use super::{
    attributes::{OsuDifficultyAttributes, OsuPerformanceAttributes},
    score_state::OsuScoreState,
    Osu,
};

pub use self::calculator::PERFORMANCE_BASE_MULTIPLIER;

mod calculator;

/// Performance calculator on osu!standard maps.
///
/// # Example
///
/// ```
/// use droid_pp::{osu::OsuPerformance, Beatmap};
///
/// # let map = Beatmap::default();
/// let attrs = OsuPerformance::new(&map)
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
pub struct OsuPerformance<'map> {
    map_or_attrs: MapOrAttrs<'map, Osu>,
    difficulty: Difficulty,
    acc: Option<f64>,
    combo: Option<u32>,
    n300: Option<u32>,
    n100: Option<u32>,
    n50: Option<u32>,
    misses: Option<u32>,
    slider_breaks: SliderBreaks,
    hitresult_priority: HitResultPriority,
}

impl<'map> OsuPerformance<'map> {
    /// Create a new performance calculator for osu!standard maps.
    ///
    /// The argument `map_or_attrs` must be either
    /// - previously calculated attributes ([`OsuDifficultyAttributes`]
    ///   or [`OsuPerformanceAttributes`])
    /// - a beatmap ([`Beatmap`] or `&Beatmap`)
    ///
    /// If a map is given, difficulty attributes will need to be calculated
    /// internally which is a costly operation. Hence, passing attributes
    /// should be prefered.
    pub fn new(map_or_attrs: impl Into<MapOrAttrs<'map, Osu>>) -> Self {
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
        }
    }

    /// Provide the result of a previous difficulty or performance calculation.
    /// If you already calculated the attributes for the current map-mod combination,
    /// be sure to put them in here so that they don't have to be recalculated.
    pub fn attributes(mut self, attrs: impl Into<OsuDifficultyAttributes>) -> Self {
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

    /// Provide parameters through an [`OsuScoreState`].
    #[allow(clippy::needless_pass_by_value)]
    pub const fn state(mut self, state: OsuScoreState) -> Self {
        let OsuScoreState {
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

    /// Create the [`OsuScoreState`] that will be used for performance calculation.
    pub fn generate_state(&mut self) -> OsuScoreState {
        let attrs = match self.map_or_attrs {
            MapOrAttrs::Map(ref map) => {
                let attrs = self.difficulty.calculate_for_mode::<Osu>(map);

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

        OsuScoreState {
            max_combo: clamp_combo(self.combo, max_combo, misses, lost_combo),
            n300,
            n100,
            n50,
            misses,
        }
    }

    /// Calculate all performance related values, including pp and stars.
    pub fn calculate(mut self) -> OsuPerformanceAttributes {
        let state = self.generate_state();

        let attrs = match self.map_or_attrs {
            MapOrAttrs::Map(ref map) => self.difficulty.calculate_for_mode::<Osu>(map),
            MapOrAttrs::Attrs(attrs) => attrs,
        };

        let mods = self.difficulty.get_mods();

        let effective_miss_count = effective_miss_count(
            attrs.max_combo,
            attrs.n_sliders,
            state.max_combo,
            state.n100 + state.n50 + state.misses,
            state.misses,
            self.slider_breaks,
        );

        OsuPerformanceCalculator::new(
            attrs,
            &mods,
            state,
            effective_miss_count,
            self.slider_breaks,
        )
        .calculate()
    }
}

impl From<OsuDifficultyAttributes> for MapOrAttrs<'_, Osu> {
    fn from(attrs: OsuDifficultyAttributes) -> Self {
        Self::Attrs(attrs)
    }
}

impl From<OsuPerformanceAttributes> for MapOrAttrs<'_, Osu> {
    fn from(attrs: OsuPerformanceAttributes) -> Self {
        Self::Attrs(attrs.difficulty)
    }
}

impl<'map> From<&'map Beatmap> for OsuPerformance<'map> {
    fn from(map: &'map Beatmap) -> Self {
        Self::new(map)
    }
}

impl From<OsuDifficultyAttributes> for OsuPerformance<'_> {
    fn from(attrs: OsuDifficultyAttributes) -> Self {
        Self::new(attrs)
    }
}

impl From<OsuPerformanceAttributes> for OsuPerformance<'_> {
    fn from(attrs: OsuPerformanceAttributes) -> Self {
        Self::new(attrs)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const N_OBJECTS: u32 = 552;

    fn attrs() -> OsuDifficultyAttributes {
        OsuDifficultyAttributes {
            aim: 2.5,
            aim_difficult_slider_count: 20.0,
            speed: 2.3,
            flashlight: 1.8,
            slider_factor: 0.97,
            speed_note_count: 300.0,
            aim_difficult_strain_count: 120.0,
            speed_difficult_strain_count: 90.0,
            ar: 9.0,
            od: 8.0,
            hp: 5.0,
            great_hit_window: 32.0,
            ok_hit_window: 76.0,
            meh_hit_window: 120.0,
            n_circles: 400,
            n_sliders: 150,
            n_spinners: 2,
            stars: 5.2,
            max_combo: 900,
        }
    }

    #[test]
    fn state_from_accuracy() {
        let state = OsuPerformance::new(attrs())
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
    fn passed_objects_limit_hits() {
        let state = OsuPerformance::new(attrs())
            .passed_objects(100)
            .generate_state();

        assert_eq!(state.total_hits(), 100);
        assert_eq!(state.n300, 100);
    }

    #[test]
    fn misses_reduce_pp() {
        let fc = OsuPerformance::new(attrs()).calculate();
        let missed = OsuPerformance::new(attrs()).misses(5).combo(400).calculate();

        assert!(fc.pp() > missed.pp());
        assert!(missed.effective_miss_count >= 5.0);
        assert!(fc.speed_deviation.is_some());
    }

    #[test]
    fn slider_breaks_limit_combo() {
        let state = OsuPerformance::new(attrs())
            .misses(2)
            .slider_end_drops(5)
            .large_tick_misses(3)
            .generate_state();

        assert_eq!(state.max_combo, 890);
    }

    #[test]
    fn tick_misses_lower_aim() {
        let clean = OsuPerformance::new(attrs())
            .slider_end_drops(0)
            .large_tick_misses(0)
            .calculate();

        let missed_ticks = OsuPerformance::new(attrs())
            .slider_end_drops(0)
            .large_tick_misses(10)
            .calculate();

        assert!(missed_ticks.pp_aim < clean.pp_aim);
        assert!(missed_ticks.effective_miss_count > clean.effective_miss_count);
        assert!(missed_ticks.effective_miss_count <= 10.0);
    }

    #[test]
    fn flashlight_only_with_mod() {
        let nomod = OsuPerformance::new(attrs()).calculate();
        assert_eq!(nomod.pp_flashlight, 0.0);

        let fl = OsuPerformance::new(attrs()).mods(1024).calculate();
        assert!(fl.pp_flashlight > 0.0);
    }

    #[test]
    fn all_misses_have_no_deviation() {
        let attrs = OsuPerformance::new(attrs()).misses(552).calculate();

        assert!(attrs.speed_deviation.is_none());
        assert_eq!(attrs.pp_speed, 0.0);
        assert_eq!(attrs.pp_acc, 0.0);
        assert!(!attrs.pp.is_nan());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn hitresults(
            acc in 0.0_f64..=1.0,
            n300 in prop::option::weighted(0.10, 0_u32..=N_OBJECTS + 10),
            n100 in prop::option::weighted(0.10, 0_u32..=N_OBJECTS + 10),
            n50 in prop::option::weighted(0.10, 0_u32..=N_OBJECTS + 10),
            n_misses in prop::option::weighted(0.15, 0_u32..=N_OBJECTS + 10),
            combo in prop::option::weighted(0.20, 0_u32..=1000),
            best_case in prop::bool::ANY,
        ) {
            let priority = if best_case {
                HitResultPriority::BestCase
            } else {
                HitResultPriority::WorstCase
            };

            let mut perf = OsuPerformance::from(attrs())
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

            let first = perf.generate_state();
            let state = perf.generate_state();
            prop_assert_eq!(first, state);

            prop_assert_eq!(state.total_hits(), N_OBJECTS);
            prop_assert!(state.max_combo <= 900 - state.misses);

            if n300.is_none() && n100.is_none() && n50.is_none() {
                let n_remaining = N_OBJECTS - state.misses;
                let target = acc * f64::from(6 * N_OBJECTS) - f64::from(n_remaining);

                let closest = (0..=n_remaining)
                    .flat_map(|n300| {
                        let raw_n100 = (target - f64::from(5 * n300)).max(0.0);

                        [raw_n100.floor(), raw_n100.ceil()]
                            .map(|n100| (n300, (n100 as u32).min(n_remaining - n300)))
                    })
                    .map(|(n300, n100)| {
                        let state = OsuScoreState {
                            max_combo: 0,
                            n300,
                            n100,
                            n50: n_remaining - n300 - n100,
                            misses: state.misses,
                        };

                        (acc - state.accuracy()).abs()
                    })
                    .fold(f64::MAX, f64::min);

                prop_assert!((acc - state.accuracy()).abs() <= closest + 1e-9);
            }
        }
    }
}
