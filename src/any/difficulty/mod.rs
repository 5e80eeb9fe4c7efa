use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::model::{
    beatmap::{Beatmap, BeatmapAttributes},
    mode::{IGameMode, Ruleset},
    mods::GameMods,
};

pub mod cursor;
pub mod object;
pub mod probability;
pub mod rhythm;
pub mod skills;

/// Difficulty calculator on maps of any ruleset.
///
/// # Example
///
/// ```
/// use droid_pp::{Beatmap, Difficulty};
/// use droid_pp::droid::Droid;
///
/// # let map = Beatmap::default();
/// let attrs = Difficulty::new()
///     .mods(8 + 64) // HDDT
///     .od(9.0, false)
///     .calculate_for_mode::<Droid>(&map);
///
/// assert!(attrs.stars >= 0.0);
/// ```
#[derive(Clone, PartialEq)]
#[must_use]
pub struct Difficulty {
    mods: GameMods,
    passed_objects: Option<u32>,
    clock_rate: Option<f64>,
    ar: Option<ModsDependent>,
    cs: Option<ModsDependent>,
    hp: Option<ModsDependent>,
    od: Option<ModsDependent>,
    custom_speed_multiplier: f64,
    old_statistics: bool,
}

/// Wrapper for beatmap attributes in [`Difficulty`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ModsDependent {
    /// Value of the beatmap attribute.
    pub value: f32,
    /// Whether `value` already includes the effect of mods.
    pub with_mods: bool,
}

impl ModsDependent {
    pub const fn new(value: f32) -> Self {
        Self {
            value,
            with_mods: false,
        }
    }
}

impl Difficulty {
    /// Create a new difficulty calculator.
    pub const fn new() -> Self {
        Self {
            mods: GameMods::NOMOD,
            passed_objects: None,
            clock_rate: None,
            ar: None,
            cs: None,
            hp: None,
            od: None,
            custom_speed_multiplier: 1.0,
            old_statistics: false,
        }
    }

    /// Perform the difficulty calculation for the given [`IGameMode`] and
    /// process the final skill values.
    pub fn calculate_for_mode<M: IGameMode>(&self, map: &Beatmap) -> M::DifficultyAttributes {
        M::difficulty(self, map)
    }

    /// Perform the difficulty calculation for the given [`IGameMode`] but
    /// instead of evaluating the skill strains, return them as is.
    ///
    /// Suitable to plot the difficulty of a map over time.
    pub fn strains_for_mode<M: IGameMode>(&self, map: &Beatmap) -> M::Strains {
        M::strains(self, map)
    }

    /// Specify mods.
    ///
    /// Accepted types are
    /// - `u32` (legacy bits)
    /// - [`rosu_mods::GameModsLegacy`]
    /// - [`GameMods`]
    pub fn mods(self, mods: impl Into<GameMods>) -> Self {
        Self {
            mods: mods.into(),
            ..self
        }
    }

    /// Amount of passed objects for partial plays, e.g. a fail.
    pub const fn passed_objects(mut self, passed_objects: u32) -> Self {
        self.passed_objects = Some(passed_objects);

        self
    }

    /// Adjust the clock rate used in the calculation.
    ///
    /// If none is specified, it will take the clock rate based on the mods
    /// i.e. 1.5 for DT, 0.75 for HT and 1.0 otherwise, multiplied with the
    /// custom speed multiplier.
    ///
    /// | Minimum | Maximum |
    /// | :-----: | :-----: |
    /// | 0.01    | 100     |
    pub fn clock_rate(self, clock_rate: f64) -> Self {
        Self {
            clock_rate: Some(clock_rate.clamp(0.01, 100.0)),
            ..self
        }
    }

    /// Override a beatmap's set AR.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    ///
    /// | Minimum | Maximum |
    /// | :-----: | :-----: |
    /// | -20     | 20      |
    pub fn ar(self, ar: f32, with_mods: bool) -> Self {
        Self {
            ar: Some(ModsDependent {
                value: ar.clamp(-20.0, 20.0),
                with_mods,
            }),
            ..self
        }
    }

    /// Override a beatmap's set CS.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    ///
    /// | Minimum | Maximum |
    /// | :-----: | :-----: |
    /// | -20     | 20      |
    pub fn cs(self, cs: f32, with_mods: bool) -> Self {
        Self {
            cs: Some(ModsDependent {
                value: cs.clamp(-20.0, 20.0),
                with_mods,
            }),
            ..self
        }
    }

    /// Override a beatmap's set HP.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    ///
    /// | Minimum | Maximum |
    /// | :-----: | :-----: |
    /// | -20     | 20      |
    pub fn hp(self, hp: f32, with_mods: bool) -> Self {
        Self {
            hp: Some(ModsDependent {
                value: hp.clamp(-20.0, 20.0),
                with_mods,
            }),
            ..self
        }
    }

    /// Override a beatmap's set OD.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    ///
    /// | Minimum | Maximum |
    /// | :-----: | :-----: |
    /// | -20     | 20      |
    pub fn od(self, od: f32, with_mods: bool) -> Self {
        Self {
            od: Some(ModsDependent {
                value: od.clamp(-20.0, 20.0),
                with_mods,
            }),
            ..self
        }
    }

    /// osu!droid's custom speed multiplier which is applied on top of the
    /// mods' clock rate.
    ///
    /// | Minimum | Maximum |
    /// | :-----: | :-----: |
    /// | 0.5     | 2       |
    pub fn custom_speed_multiplier(self, custom_speed_multiplier: f64) -> Self {
        Self {
            custom_speed_multiplier: custom_speed_multiplier.clamp(0.5, 2.0),
            ..self
        }
    }

    /// Whether osu!droid's old circle size adjustments for HardRock and Easy
    /// should be used.
    pub const fn old_statistics(mut self, old_statistics: bool) -> Self {
        self.old_statistics = old_statistics;

        self
    }

    pub(crate) const fn get_mods(&self) -> GameMods {
        self.mods
    }

    pub(crate) fn get_clock_rate(&self) -> f64 {
        self.clock_rate
            .unwrap_or_else(|| self.mods.clock_rate() * self.custom_speed_multiplier)
    }

    pub(crate) fn get_passed_objects(&self) -> usize {
        self.passed_objects.map_or(usize::MAX, |n| n as usize)
    }

    pub(crate) const fn get_custom_clock_rate(&self) -> Option<f64> {
        self.clock_rate
    }

    pub(crate) const fn get_custom_speed_multiplier(&self) -> f64 {
        self.custom_speed_multiplier
    }

    pub(crate) const fn get_old_statistics(&self) -> bool {
        self.old_statistics
    }

    pub(crate) const fn get_ar(&self) -> Option<ModsDependent> {
        self.ar
    }

    pub(crate) const fn get_cs(&self) -> Option<ModsDependent> {
        self.cs
    }

    pub(crate) const fn get_hp(&self) -> Option<ModsDependent> {
        self.hp
    }

    pub(crate) const fn get_od(&self) -> Option<ModsDependent> {
        self.od
    }

    /// The beatmap attributes of `map` after applying all settings.
    pub(crate) fn map_attributes(&self, map: &Beatmap, ruleset: Ruleset) -> BeatmapAttributes {
        map.attributes().ruleset(ruleset).difficulty(self).build()
    }
}

impl Debug for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let Self {
            mods,
            passed_objects,
            clock_rate,
            ar,
            cs,
            hp,
            od,
            custom_speed_multiplier,
            old_statistics,
        } = self;

        f.debug_struct("Difficulty")
            .field("mods", mods)
            .field("passed_objects", passed_objects)
            .field("clock_rate", clock_rate)
            .field("ar", ar)
            .field("cs", cs)
            .field("hp", hp)
            .field("od", od)
            .field("custom_speed_multiplier", custom_speed_multiplier)
            .field("old_statistics", old_statistics)
            .finish()
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_rate_from_mods_and_multiplier() {
        let difficulty = Difficulty::new().mods(64).custom_speed_multiplier(1.2);
        assert!((difficulty.get_clock_rate() - 1.8).abs() < 1e-12);

        let difficulty = difficulty.clock_rate(1.1);
        assert!((difficulty.get_clock_rate() - 1.1).abs() < 1e-12);
    }

    #[test]
    fn passed_objects_default() {
        assert_eq!(Difficulty::new().get_passed_objects(), usize::MAX);
        assert_eq!(Difficulty::new().passed_objects(3).get_passed_objects(), 3);
    }

    #[test]
    fn overrides_are_clamped() {
        let difficulty = Difficulty::new().ar(25.0, true).custom_speed_multiplier(3.0);

        assert_eq!(
            difficulty.get_ar(),
            Some(ModsDependent {
                value: 20.0,
                with_mods: true
            })
        );
        assert!((difficulty.get_custom_speed_multiplier() - 2.0).abs() < f64::EPSILON);
    }
}
