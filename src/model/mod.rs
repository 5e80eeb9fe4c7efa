/// Beatmap related types.
pub mod beatmap;

/// Control point related types.
pub mod control_point;

/// Hitobject related types.
pub mod hit_object;

/// Ruleset related types.
pub mod mode;

/// Gamemods related types.
pub mod mods;
