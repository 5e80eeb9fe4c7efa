use std::{io, path::Path, str::FromStr};

use rosu_map::{section::general::GameMode, LATEST_FORMAT_VERSION};

use crate::{
    any::Difficulty,
    droid::{Droid, DroidDifficultyAttributes},
    osu::{Osu, OsuDifficultyAttributes},
};

pub use self::{
    attributes::{BeatmapAttributes, BeatmapAttributesBuilder, HitWindows},
    decode::{BeatmapState, ParseBeatmapError},
};

use super::{
    control_point::{difficulty_point_at, timing_point_at, DifficultyPoint, TimingPoint},
    hit_object::HitObject,
};

mod attributes;
mod bpm;
mod decode;

/// All beatmap data that is relevant for difficulty and performance
/// calculation.
#[derive(Clone, Debug, PartialEq)]
pub struct Beatmap {
    pub version: i32,

    // General
    pub stack_leniency: f32,
    pub mode: GameMode,

    // Difficulty
    pub ar: f32,
    pub cs: f32,
    pub hp: f32,
    pub od: f32,
    pub slider_multiplier: f64,
    pub slider_tick_rate: f64,

    // TimingPoints
    pub timing_points: Vec<TimingPoint>,
    pub difficulty_points: Vec<DifficultyPoint>,

    // HitObjects
    pub hit_objects: Vec<HitObject>,
}

impl Beatmap {
    /// Parse a [`Beatmap`] by providing a path to a `.osu` file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, io::Error> {
        rosu_map::from_path(path)
    }

    /// Parse a [`Beatmap`] by providing the content of a `.osu` file as a
    /// slice of bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, io::Error> {
        rosu_map::from_bytes(bytes)
    }

    /// Parse a [`Beatmap`] from an asynchronous reader, e.g. a
    /// `tokio::fs::File`.
    #[cfg(feature = "async_tokio")]
    pub async fn parse<R>(mut src: R) -> Result<Self, io::Error>
    where
        R: tokio::io::AsyncRead + Unpin,
    {
        use tokio::io::AsyncReadExt;

        let mut bytes = Vec::new();
        src.read_to_end(&mut bytes).await?;

        Self::from_bytes(&bytes)
    }

    /// Parse a [`Beatmap`] from an asynchronous reader, e.g. an
    /// `async_std::fs::File`.
    #[cfg(feature = "async_std")]
    pub async fn parse<R>(mut src: R) -> Result<Self, io::Error>
    where
        R: async_std::io::Read + Unpin,
    {
        use async_std::io::ReadExt;

        let mut bytes = Vec::new();
        src.read_to_end(&mut bytes).await?;

        Self::from_bytes(&bytes)
    }

    /// Returns a [`BeatmapAttributesBuilder`] to calculate modified beatmap
    /// attributes.
    pub fn attributes(&self) -> BeatmapAttributesBuilder {
        BeatmapAttributesBuilder::new().map(self)
    }

    /// The beats per minute of the map.
    pub fn bpm(&self) -> f64 {
        bpm::bpm(self.hit_objects.last(), &self.timing_points)
    }

    /// Calculate osu!standard difficulty attributes.
    ///
    /// Shorthand for `difficulty.calculate_for_mode::<Osu>(self)`.
    pub fn osu_difficulty(&self, difficulty: &Difficulty) -> OsuDifficultyAttributes {
        difficulty.calculate_for_mode::<Osu>(self)
    }

    /// Calculate osu!droid difficulty attributes.
    ///
    /// Shorthand for `difficulty.calculate_for_mode::<Droid>(self)`.
    pub fn droid_difficulty(&self, difficulty: &Difficulty) -> DroidDifficultyAttributes {
        difficulty.calculate_for_mode::<Droid>(self)
    }

    /// Finds the [`TimingPoint`] that is active at the given time.
    pub(crate) fn timing_point_at(&self, time: f64) -> Option<&TimingPoint> {
        timing_point_at(&self.timing_points, time)
    }

    /// Finds the [`DifficultyPoint`] that is active at the given time.
    pub(crate) fn difficulty_point_at(&self, time: f64) -> Option<&DifficultyPoint> {
        difficulty_point_at(&self.difficulty_points, time)
    }
}

impl FromStr for Beatmap {
    type Err = io::Error;

    /// Parse a [`Beatmap`] by providing the content of a `.osu` file as a
    /// string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        rosu_map::from_str(s)
    }
}

const DEFAULT_STACK_LENIENCY: f32 = 0.7;

impl Default for Beatmap {
    fn default() -> Self {
        Self {
            version: LATEST_FORMAT_VERSION,
            stack_leniency: DEFAULT_STACK_LENIENCY,
            mode: GameMode::default(),
            ar: 5.0,
            cs: 5.0,
            hp: 5.0,
            od: 5.0,
            slider_multiplier: 1.4,
            slider_tick_rate: 1.0,
            timing_points: Vec::default(),
            difficulty_points: Vec::default(),
            hit_objects: Vec::default(),
        }
    }
}
