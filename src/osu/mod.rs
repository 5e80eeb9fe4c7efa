use crate::{
    any::difficulty::Difficulty,
    model::{
        beatmap::Beatmap,
        mode::{IGameMode, Ruleset},
    },
};

pub use self::{
    attributes::{OsuDifficultyAttributes, OsuPerformanceAttributes},
    difficulty::scaling_factor::ScalingFactor,
    performance::OsuPerformance,
    score_state::OsuScoreState,
    strains::OsuStrains,
};

mod attributes;
mod difficulty;
mod performance;
mod score_state;
mod strains;

/// Marker type for [`Ruleset::Osu`].
pub struct Osu;

impl IGameMode for Osu {
    const RULESET: Ruleset = Ruleset::Osu;

    type DifficultyAttributes = OsuDifficultyAttributes;
    type Strains = OsuStrains;

    fn difficulty(difficulty: &Difficulty, map: &Beatmap) -> Self::DifficultyAttributes {
        difficulty::difficulty(difficulty, map)
    }

    fn strains(difficulty: &Difficulty, map: &Beatmap) -> Self::Strains {
        strains::strains(difficulty, map)
    }
}
