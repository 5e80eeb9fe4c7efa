pub use rosu_map::section::general::GameMode;

use crate::any::Difficulty;

use super::beatmap::Beatmap;

/// The rulesets whose difficulty and performance can be calculated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Ruleset {
    /// osu!standard as played on desktop.
    #[default]
    Osu,
    /// osu!droid, the touch-screen variant of osu!standard.
    Droid,
}

/// A way to specify a ruleset at compile-time.
///
/// Notably, this is implemented for the marker types [`Osu`] and [`Droid`].
///
/// [`Osu`]: crate::osu::Osu
/// [`Droid`]: crate::droid::Droid
pub trait IGameMode: Sized {
    /// The [`Ruleset`] this type stands for.
    const RULESET: Ruleset;

    /// The resulting type of a difficulty calculation.
    type DifficultyAttributes;

    /// The resulting type of a strain calculation.
    type Strains;

    /// Perform a difficulty calculation for a [`Beatmap`] and process the
    /// final skill values.
    fn difficulty(difficulty: &Difficulty, map: &Beatmap) -> Self::DifficultyAttributes;

    /// Perform a difficulty calculation for a [`Beatmap`] without processing
    /// the final skill values.
    fn strains(difficulty: &Difficulty, map: &Beatmap) -> Self::Strains;
}
