use crate::{
    any::difficulty::Difficulty,
    model::{
        beatmap::Beatmap,
        mode::{IGameMode, Ruleset},
    },
};

pub use self::{
    attributes::{
        DifficultSlider, DroidDifficultyAttributes, DroidPerformanceAttributes, HighStrainSection,
        PenaltyError,
    },
    difficulty::scaling_factor::DroidScalingFactor,
    performance::DroidPerformance,
    score_state::DroidScoreState,
    strains::DroidStrains,
};

mod attributes;
mod difficulty;
mod performance;
mod score_state;
mod strains;

/// Marker type for [`Ruleset::Droid`].
pub struct Droid;

impl IGameMode for Droid {
    const RULESET: Ruleset = Ruleset::Droid;

    type DifficultyAttributes = DroidDifficultyAttributes;
    type Strains = DroidStrains;

    fn difficulty(difficulty: &Difficulty, map: &Beatmap) -> Self::DifficultyAttributes {
        difficulty::difficulty(difficulty, map)
    }

    fn strains(difficulty: &Difficulty, map: &Beatmap) -> Self::Strains {
        strains::strains(difficulty, map)
    }
}
