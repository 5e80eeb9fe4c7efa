use serde::{Deserialize, Serialize};

use crate::{
    any::difficulty::probability::MissPenaltyCurve, droid::performance::DroidPerformance,
    model::mods::GameMods,
};

/// A slider that is among the most difficult sliders of a map.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DifficultSlider {
    /// Index of the slider among all hit objects.
    pub index: usize,
    /// Share of the slider's strain in the summed strain of all sliders.
    pub difficulty_rating: f64,
}

/// A section of the map whose tapping may be too fast for two fingers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HighStrainSection {
    /// Index of the first hit object of the section.
    pub first_object_index: usize,
    /// Index of the last hit object of the section.
    pub last_object_index: usize,
    /// Summed strain of the section, normalized and soft-capped.
    pub sum_strain: f64,
}

/// The result of a difficulty calculation on an osu!droid map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DroidDifficultyAttributes {
    /// The mods that were used for the calculation.
    pub mods: GameMods,
    /// The difficulty of the aim skill.
    pub aim: f64,
    /// The difficulty of the tap skill.
    pub tap: f64,
    /// The difficulty of the rhythm skill.
    pub rhythm: f64,
    /// The difficulty of the flashlight skill.
    pub flashlight: f64,
    /// The difficulty of the visual skill.
    pub visual: f64,
    /// The difficulty of the reading skill.
    pub reading: f64,
    /// The ratio of the aim difficulty with and without sliders.
    pub aim_slider_factor: f64,
    /// The ratio of the flashlight difficulty with and without sliders.
    pub flashlight_slider_factor: f64,
    /// The ratio of the visual difficulty with and without sliders.
    pub visual_slider_factor: f64,
    /// The number of clickable objects weighted by difficulty.
    pub speed_note_count: f64,
    /// The delta time of the objects that are relevant for tapping.
    pub average_speed_delta_time: f64,
    /// How much tapping difficulty is left if objects can be vibrated
    /// through, between `0.0` and `1.0`.
    pub vibro_factor: f64,
    /// Weighted sum of aim strains.
    pub aim_difficult_strain_count: f64,
    /// Weighted sum of tap strains.
    pub tap_difficult_strain_count: f64,
    /// Weighted sum of flashlight strains.
    pub flashlight_difficult_strain_count: f64,
    /// Weighted sum of visual strains.
    pub visual_difficult_strain_count: f64,
    /// The most difficult sliders for aim.
    pub aim_difficult_sliders: Vec<DifficultSlider>,
    /// The most difficult sliders for flashlight.
    pub flashlight_difficult_sliders: Vec<DifficultSlider>,
    /// Sections that may have been tapped with more than two fingers.
    pub possible_three_fingered_sections: Vec<HighStrainSection>,
    /// Maps the aim skill level of a player to their expected misses.
    pub aim_miss_penalty_curve: MissPenaltyCurve,
    /// Maps the tap skill level of a player to their expected misses.
    pub tap_miss_penalty_curve: MissPenaltyCurve,
    /// The approach rate.
    pub ar: f64,
    /// The overall difficulty.
    pub od: f64,
    /// The health drain rate.
    pub hp: f64,
    /// The clock rate that was used for the calculation.
    pub clock_rate: f64,
    /// The clock rate adjusted window for a great hit in milliseconds.
    pub great_hit_window: f64,
    /// The clock rate adjusted window for an ok hit in milliseconds.
    pub ok_hit_window: f64,
    /// The clock rate adjusted window for a meh hit in milliseconds.
    pub meh_hit_window: f64,
    /// The amount of circles.
    pub n_circles: u32,
    /// The amount of sliders.
    pub n_sliders: u32,
    /// The amount of spinners.
    pub n_spinners: u32,
    /// The final star rating.
    pub stars: f64,
    /// The maximum combo.
    pub max_combo: u32,
}

impl DroidDifficultyAttributes {
    /// Return the maximum combo.
    pub const fn max_combo(&self) -> u32 {
        self.max_combo
    }

    /// Return the amount of hitobjects.
    pub const fn n_objects(&self) -> u32 {
        self.n_circles + self.n_sliders + self.n_spinners
    }

    /// Returns a builder for performance calculation.
    pub fn performance<'a>(self) -> DroidPerformance<'a> {
        self.into()
    }
}

/// Error when applying an invalid penalty to [`DroidPerformanceAttributes`].
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum PenaltyError {
    #[error("tap penalty must be finite and at least 1, got {0}")]
    TapPenalty(f64),
    #[error("slider cheese penalty must be within (0, 1], got {0}")]
    SliderCheesePenalty(f64),
}

/// The result of a performance calculation on an osu!droid map.
///
/// Penalties that are only known after analyzing a replay can be applied
/// afterwards. Applying a penalty replaces the previous one of the same
/// kind and recomputes the total.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DroidPerformanceAttributes {
    /// The difficulty attributes that were used for the performance calculation.
    pub difficulty: DroidDifficultyAttributes,
    /// The final performance points.
    pub pp: f64,
    /// The aim portion of the final pp.
    pub pp_aim: f64,
    /// The tap portion of the final pp.
    pub pp_tap: f64,
    /// The accuracy portion of the final pp.
    pub pp_acc: f64,
    /// The flashlight portion of the final pp.
    pub pp_flashlight: f64,
    /// The visual portion of the final pp.
    pub pp_visual: f64,
    /// Misses including an approximated amount of slider breaks.
    pub effective_miss_count: f64,
    /// Estimated deviation of hits on circles in milliseconds.
    ///
    /// Infinite if no circle was hit.
    pub deviation: f64,
    /// Estimated deviation of hits on tapping-relevant notes in
    /// milliseconds.
    pub tap_deviation: f64,
    /// Divisor of the tap value, at least `1.0`.
    pub tap_penalty: f64,
    /// Multiplier of the aim value, within `(0, 1]`.
    pub aim_slider_cheese_penalty: f64,
    /// Multiplier of the flashlight value, within `(0, 1]`.
    pub flashlight_slider_cheese_penalty: f64,
    /// Multiplier of the visual value, within `(0, 1]`.
    pub visual_slider_cheese_penalty: f64,
    /// The aim value before penalties.
    pub base_aim: f64,
    /// The tap value before penalties.
    pub base_tap: f64,
    /// The flashlight value before penalties.
    pub base_flashlight: f64,
    /// The visual value before penalties.
    pub base_visual: f64,
    /// The multiplier of the total, based on mods and misses.
    pub multiplier: f64,
}

impl DroidPerformanceAttributes {
    /// Return the star value.
    pub const fn stars(&self) -> f64 {
        self.difficulty.stars
    }

    /// Return the performance point value.
    pub const fn pp(&self) -> f64 {
        self.pp
    }

    /// Return the maximum combo of the map.
    pub const fn max_combo(&self) -> u32 {
        self.difficulty.max_combo
    }

    /// Return the amount of hitobjects.
    pub const fn n_objects(&self) -> u32 {
        self.difficulty.n_objects()
    }

    /// Returns a builder for performance calculation.
    pub fn performance<'a>(self) -> DroidPerformance<'a> {
        self.difficulty.into()
    }

    /// Divide the tap value by `penalty`, e.g. for three-fingered sections.
    pub fn apply_tap_penalty(&mut self, penalty: f64) -> Result<(), PenaltyError> {
        self.tap_penalty = validate_tap_penalty(penalty)?;
        self.recompute();

        Ok(())
    }

    /// Multiply the aim value with `penalty` for sliders that were cheesed.
    pub fn apply_aim_slider_cheese_penalty(&mut self, penalty: f64) -> Result<(), PenaltyError> {
        self.aim_slider_cheese_penalty = validate_slider_cheese_penalty(penalty)?;
        self.recompute();

        Ok(())
    }

    /// Multiply the flashlight value with `penalty` for sliders that were
    /// cheesed.
    pub fn apply_flashlight_slider_cheese_penalty(
        &mut self,
        penalty: f64,
    ) -> Result<(), PenaltyError> {
        self.flashlight_slider_cheese_penalty = validate_slider_cheese_penalty(penalty)?;
        self.recompute();

        Ok(())
    }

    /// Multiply the visual value with `penalty` for sliders that were
    /// cheesed.
    pub fn apply_visual_slider_cheese_penalty(
        &mut self,
        penalty: f64,
    ) -> Result<(), PenaltyError> {
        self.visual_slider_cheese_penalty = validate_slider_cheese_penalty(penalty)?;
        self.recompute();

        Ok(())
    }

    /// Recompute all penalized values and the total from the base values.
    pub(crate) fn recompute(&mut self) {
        self.pp_aim = self.base_aim * self.aim_slider_cheese_penalty;
        self.pp_tap = self.base_tap / self.tap_penalty;
        self.pp_flashlight = self.base_flashlight * self.flashlight_slider_cheese_penalty;
        self.pp_visual = self.base_visual * self.visual_slider_cheese_penalty;

        self.pp = (self.pp_aim.powf(1.1)
            + self.pp_tap.powf(1.1)
            + self.pp_acc.powf(1.1)
            + self.pp_flashlight.powf(1.1)
            + self.pp_visual.powf(1.1))
        .powf(1.0 / 1.1)
            * self.multiplier;
    }
}

pub(crate) fn validate_tap_penalty(penalty: f64) -> Result<f64, PenaltyError> {
    if penalty.is_finite() && penalty >= 1.0 {
        Ok(penalty)
    } else {
        Err(PenaltyError::TapPenalty(penalty))
    }
}

pub(crate) fn validate_slider_cheese_penalty(penalty: f64) -> Result<f64, PenaltyError> {
    if penalty > 0.0 && penalty <= 1.0 {
        Ok(penalty)
    } else {
        Err(PenaltyError::SliderCheesePenalty(penalty))
    }
}

impl From<DroidPerformanceAttributes> for DroidDifficultyAttributes {
    fn from(attributes: DroidPerformanceAttributes) -> Self {
        attributes.difficulty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> DroidPerformanceAttributes {
        let mut attrs = DroidPerformanceAttributes {
            pp_acc: 40.0,
            tap_penalty: 1.0,
            aim_slider_cheese_penalty: 1.0,
            flashlight_slider_cheese_penalty: 1.0,
            visual_slider_cheese_penalty: 1.0,
            base_aim: 100.0,
            base_tap: 80.0,
            base_flashlight: 0.0,
            base_visual: 20.0,
            multiplier: 1.24,
            ..Default::default()
        };

        attrs.recompute();

        attrs
    }

    #[test]
    fn penalties_replace_previous_ones() {
        let mut attrs = attrs();
        let original = attrs.pp;

        attrs.apply_tap_penalty(2.0).unwrap();
        let penalized = attrs.pp;
        assert!(penalized < original);
        assert!((attrs.pp_tap - 40.0).abs() < 1e-12);

        attrs.apply_tap_penalty(2.0).unwrap();
        assert_eq!(attrs.pp, penalized);

        attrs.apply_tap_penalty(1.0).unwrap();
        assert!((attrs.pp - original).abs() < 1e-9);
    }

    #[test]
    fn slider_cheese_scales_component() {
        let mut attrs = attrs();

        attrs.apply_aim_slider_cheese_penalty(0.5).unwrap();
        assert!((attrs.pp_aim - 50.0).abs() < 1e-12);

        attrs.apply_visual_slider_cheese_penalty(1.0).unwrap();
        assert!((attrs.pp_visual - 20.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_penalties_are_rejected() {
        let mut attrs = attrs();
        let before = attrs.clone();

        assert_eq!(
            attrs.apply_tap_penalty(0.5),
            Err(PenaltyError::TapPenalty(0.5))
        );
        assert!(attrs.apply_tap_penalty(f64::INFINITY).is_err());
        assert!(attrs.apply_tap_penalty(f64::NAN).is_err());
        assert!(attrs.apply_aim_slider_cheese_penalty(0.0).is_err());
        assert!(attrs.apply_flashlight_slider_cheese_penalty(1.5).is_err());
        assert!(attrs.apply_visual_slider_cheese_penalty(-0.2).is_err());

        assert_eq!(attrs, before);
    }
}
