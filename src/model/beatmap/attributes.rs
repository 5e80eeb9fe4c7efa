use crate::{
    any::difficulty::{Difficulty, ModsDependent},
    model::{mode::Ruleset, mods::GameMods},
};

use super::Beatmap;

/// Summary struct for a [`Beatmap`]'s attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct BeatmapAttributes {
    /// The approach rate.
    pub ar: f64,
    /// The overall difficulty.
    pub od: f64,
    /// The circle size.
    pub cs: f64,
    /// The health drain rate
    pub hp: f64,
    /// The clock rate with respect to mods.
    pub clock_rate: f64,
    /// The hit windows for approach rate and overall difficulty.
    pub hit_windows: HitWindows,
}

/// AR and OD hit windows
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HitWindows {
    /// Hit window for approach rate i.e. `TimePreempt` in milliseconds.
    pub ar: f64,
    /// Hit window for overall difficulty i.e. time to hit a 300 ("Great") in milliseconds.
    pub od_great: f64,
    /// Time to hit a 100 ("Ok") in milliseconds.
    pub od_ok: f64,
    /// Time to hit a 50 ("Meh") in milliseconds.
    pub od_meh: f64,
}

/// A builder for [`BeatmapAttributes`] and [`HitWindows`].
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct BeatmapAttributesBuilder {
    ruleset: Ruleset,
    ar: ModsDependent,
    od: ModsDependent,
    cs: ModsDependent,
    hp: ModsDependent,
    mods: GameMods,
    clock_rate: Option<f64>,
    custom_speed_multiplier: f64,
    old_statistics: bool,
}

impl BeatmapAttributesBuilder {
    const PREEMPT_MIN: f64 = 1800.0;
    const PREEMPT_MID: f64 = 1200.0;
    const PREEMPT_MAX: f64 = 450.0;

    const GREAT_MIN: f64 = 80.0;
    const GREAT_MID: f64 = 50.0;
    const GREAT_MAX: f64 = 20.0;

    const OK_MIN: f64 = 140.0;
    const OK_MID: f64 = 100.0;
    const OK_MAX: f64 = 60.0;

    const MEH_MIN: f64 = 200.0;
    const MEH_MID: f64 = 150.0;
    const MEH_MAX: f64 = 100.0;

    /// Create a new [`BeatmapAttributesBuilder`].
    ///
    /// The ruleset will be [`Ruleset::Osu`] and attributes are set to `5.0`.
    pub const fn new() -> Self {
        Self {
            ruleset: Ruleset::Osu,
            ar: ModsDependent::new(5.0),
            od: ModsDependent::new(5.0),
            cs: ModsDependent::new(5.0),
            hp: ModsDependent::new(5.0),
            mods: GameMods::NOMOD,
            clock_rate: None,
            custom_speed_multiplier: 1.0,
            old_statistics: false,
        }
    }

    /// Use the given [`Beatmap`]'s attributes.
    pub const fn map(self, map: &Beatmap) -> Self {
        Self {
            ar: ModsDependent::new(map.ar),
            od: ModsDependent::new(map.od),
            cs: ModsDependent::new(map.cs),
            hp: ModsDependent::new(map.hp),
            ..self
        }
    }

    /// Specify the approach rate.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    pub const fn ar(self, ar: f32, with_mods: bool) -> Self {
        Self {
            ar: ModsDependent {
                value: ar,
                with_mods,
            },
            ..self
        }
    }

    /// Specify the overall difficulty.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    pub const fn od(self, od: f32, with_mods: bool) -> Self {
        Self {
            od: ModsDependent {
                value: od,
                with_mods,
            },
            ..self
        }
    }

    /// Specify the circle size.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    pub const fn cs(self, cs: f32, with_mods: bool) -> Self {
        Self {
            cs: ModsDependent {
                value: cs,
                with_mods,
            },
            ..self
        }
    }

    /// Specify the drain rate.
    ///
    /// `with_mods` determines if the given value should be used before
    /// or after accounting for mods, e.g. on `true` the value will be
    /// used as is and on `false` it will be modified based on the mods.
    pub const fn hp(self, hp: f32, with_mods: bool) -> Self {
        Self {
            hp: ModsDependent {
                value: hp,
                with_mods,
            },
            ..self
        }
    }

    /// Specify the mods.
    pub fn mods(self, mods: impl Into<GameMods>) -> Self {
        Self {
            mods: mods.into(),
            ..self
        }
    }

    /// Specify a custom clock rate.
    ///
    /// This overrides the clock rate of the mods and the custom speed
    /// multiplier.
    pub const fn clock_rate(self, clock_rate: f64) -> Self {
        Self {
            clock_rate: Some(clock_rate),
            ..self
        }
    }

    /// Specify osu!droid's custom speed multiplier which is applied on top of
    /// the mods' clock rate.
    pub const fn custom_speed_multiplier(self, custom_speed_multiplier: f64) -> Self {
        Self {
            custom_speed_multiplier,
            ..self
        }
    }

    /// Whether osu!droid's old circle size adjustments for HardRock and Easy
    /// should be used.
    pub const fn old_statistics(self, old_statistics: bool) -> Self {
        Self {
            old_statistics,
            ..self
        }
    }

    /// Specify the [`Ruleset`] whose mod adjustments and hit windows apply.
    pub const fn ruleset(self, ruleset: Ruleset) -> Self {
        Self { ruleset, ..self }
    }

    /// Specify all settings through [`Difficulty`].
    pub fn difficulty(self, difficulty: &Difficulty) -> Self {
        Self {
            ruleset: self.ruleset,
            ar: difficulty.get_ar().unwrap_or(self.ar),
            od: difficulty.get_od().unwrap_or(self.od),
            cs: difficulty.get_cs().unwrap_or(self.cs),
            hp: difficulty.get_hp().unwrap_or(self.hp),
            mods: difficulty.get_mods(),
            clock_rate: difficulty.get_custom_clock_rate(),
            custom_speed_multiplier: difficulty.get_custom_speed_multiplier(),
            old_statistics: difficulty.get_old_statistics(),
        }
    }

    /// The clock rate after considering mods and the custom speed
    /// multiplier.
    pub fn get_clock_rate(&self) -> f64 {
        self.clock_rate
            .unwrap_or_else(|| self.mods.clock_rate() * self.custom_speed_multiplier)
    }

    /// Calculate the AR and OD hit windows.
    pub fn hit_windows(&self) -> HitWindows {
        let clock_rate = self.get_clock_rate();
        let ar_clock_rate = if self.ar.with_mods { 1.0 } else { clock_rate };
        let od_clock_rate = if self.od.with_mods { 1.0 } else { clock_rate };

        let raw_ar = self.mod_adjusted_ar();
        let raw_od = self.mod_adjusted_od();

        let preempt = difficulty_range(
            raw_ar,
            Self::PREEMPT_MIN,
            Self::PREEMPT_MID,
            Self::PREEMPT_MAX,
        ) / ar_clock_rate;

        let (great, ok, meh) = match self.ruleset {
            Ruleset::Osu => (
                difficulty_range(raw_od, Self::GREAT_MIN, Self::GREAT_MID, Self::GREAT_MAX),
                difficulty_range(raw_od, Self::OK_MIN, Self::OK_MID, Self::OK_MAX),
                difficulty_range(raw_od, Self::MEH_MIN, Self::MEH_MID, Self::MEH_MAX),
            ),
            Ruleset::Droid => droid_hit_windows(raw_od, self.mods.pr()),
        };

        HitWindows {
            ar: preempt,
            od_great: great / od_clock_rate,
            od_ok: ok / od_clock_rate,
            od_meh: meh / od_clock_rate,
        }
    }

    /// Calculate the [`BeatmapAttributes`].
    pub fn build(&self) -> BeatmapAttributes {
        let clock_rate = self.get_clock_rate();

        let hp = self.mod_adjusted_hp();
        let cs = self.mod_adjusted_cs();

        let hit_windows = self.hit_windows();
        let HitWindows { ar, od_great, .. } = hit_windows;

        // AR
        let ar = if ar > Self::PREEMPT_MID {
            (Self::PREEMPT_MIN - ar) / 120.0
        } else {
            (Self::PREEMPT_MID - ar) / 150.0 + 5.0
        };

        // OD
        let od = match self.ruleset {
            Ruleset::Osu => (Self::GREAT_MIN - od_great) / 6.0,
            Ruleset::Droid if self.mods.pr() => 5.0 - (od_great - 55.0) / 6.0,
            Ruleset::Droid => 5.0 - (od_great - 75.0) / 5.0,
        };

        BeatmapAttributes {
            ar,
            od,
            cs,
            hp,
            clock_rate,
            hit_windows,
        }
    }

    fn mod_adjusted_ar(&self) -> f64 {
        let value = f64::from(self.ar.value);

        if self.ar.with_mods {
            return value;
        }

        let mut ar = hr_ez_adjusted(value, &self.mods);

        if self.ruleset == Ruleset::Droid && self.mods.re() {
            ar -= 0.5;
        }

        ar
    }

    fn mod_adjusted_od(&self) -> f64 {
        let value = f64::from(self.od.value);

        if self.od.with_mods {
            return value;
        }

        let mut od = hr_ez_adjusted(value, &self.mods);

        if self.ruleset == Ruleset::Droid && self.mods.re() {
            od *= 0.5;
        }

        od
    }

    fn mod_adjusted_hp(&self) -> f64 {
        let value = f64::from(self.hp.value);

        if self.hp.with_mods {
            return value;
        }

        let mut hp = (value * self.mods.od_ar_hp_multiplier()).min(10.0);

        if self.ruleset == Ruleset::Droid && self.mods.re() {
            hp *= 0.5;
        }

        hp
    }

    fn mod_adjusted_cs(&self) -> f64 {
        let mut cs = f64::from(self.cs.value);

        if self.cs.with_mods {
            return cs;
        }

        match self.ruleset {
            Ruleset::Droid if self.old_statistics => {
                if self.mods.hr() {
                    cs += 1.0;
                } else if self.mods.ez() {
                    cs -= 1.0;
                }
            }
            Ruleset::Osu | Ruleset::Droid => {
                if self.mods.hr() {
                    cs = (cs * 1.3).min(10.0);
                } else if self.mods.ez() {
                    cs *= 0.5;
                }
            }
        }

        if self.ruleset == Ruleset::Droid && self.mods.sc() {
            cs += 4.0;
        }

        cs
    }
}

fn hr_ez_adjusted(value: f64, mods: &GameMods) -> f64 {
    if mods.hr() {
        (value * 1.4).min(10.0)
    } else if mods.ez() {
        value * 0.5
    } else {
        value
    }
}

/// osu!droid's great, ok, and meh windows for the given OD.
fn droid_hit_windows(od: f64, precise: bool) -> (f64, f64, f64) {
    let meh = 250.0 + 10.0 * (5.0 - od);

    if precise {
        (55.0 + 6.0 * (5.0 - od), 120.0 + 8.0 * (5.0 - od), meh)
    } else {
        (75.0 + 5.0 * (5.0 - od), 150.0 + 10.0 * (5.0 - od), meh)
    }
}

pub(crate) fn difficulty_range(difficulty: f64, min: f64, mid: f64, max: f64) -> f64 {
    if difficulty > 5.0 {
        mid + (max - mid) * (difficulty - 5.0) / 5.0
    } else if difficulty < 5.0 {
        mid - (mid - min) * (5.0 - difficulty) / 5.0
    } else {
        mid
    }
}

impl From<&Beatmap> for BeatmapAttributesBuilder {
    fn from(map: &Beatmap) -> Self {
        Self::new().map(map)
    }
}

impl Default for BeatmapAttributesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::util::float_ext::FloatExt;

    use super::*;

    #[test]
    fn consider_mods() {
        let attrs = BeatmapAttributesBuilder::new()
            .ar(8.5, false)
            .mods(64)
            .build();

        let expected = 10.0;

        assert!(attrs.ar.eq(expected), "{} != {expected}", attrs.ar);
    }

    #[test]
    fn skip_mods() {
        let attrs = BeatmapAttributesBuilder::new()
            .ar(8.5, true)
            .mods(64)
            .build();

        let expected = 8.5;

        assert!(attrs.ar.eq(expected), "{} != {expected}", attrs.ar);
    }

    #[test]
    fn osu_hit_windows() {
        let windows = BeatmapAttributesBuilder::new().od(8.0, false).hit_windows();

        assert!(windows.od_great.eq(32.0));
        assert!(windows.od_ok.eq(76.0));
        assert!(windows.od_meh.eq(120.0));
    }

    #[test]
    fn droid_hit_windows_and_od() {
        let builder = BeatmapAttributesBuilder::new()
            .ruleset(Ruleset::Droid)
            .od(8.0, false);

        let windows = builder.hit_windows();
        assert!(windows.od_great.eq(60.0));
        assert!(windows.od_ok.eq(120.0));
        assert!(windows.od_meh.eq(220.0));
        assert!(builder.build().od.eq(8.0));

        let precise = builder.mods(GameMods::from_droid_str("s").unwrap());
        let windows = precise.hit_windows();
        assert!(windows.od_great.eq(37.0));
        assert!(windows.od_ok.eq(96.0));
        assert!(precise.build().od.eq(8.0));
    }

    #[test]
    fn droid_circle_size_mods() {
        let base = BeatmapAttributesBuilder::new()
            .ruleset(Ruleset::Droid)
            .cs(4.0, false);

        let hr = base.clone().mods(16).build();
        assert!(hr.cs.eq(5.2), "{}", hr.cs);

        let old_hr = base.clone().mods(16).old_statistics(true).build();
        assert!(old_hr.cs.eq(5.0), "{}", old_hr.cs);

        let sc = base.mods(GameMods::from_droid_str("m").unwrap()).build();
        assert!(sc.cs.eq(8.0), "{}", sc.cs);
    }

    #[test]
    fn custom_speed_multiplier() {
        let builder = BeatmapAttributesBuilder::new()
            .mods(64)
            .custom_speed_multiplier(1.2);

        assert!((builder.get_clock_rate() - 1.8).abs() < 1e-12);
        assert!(builder.clock_rate(1.0).get_clock_rate().eq(1.0));
    }
}
