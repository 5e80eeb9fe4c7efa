use crate::{any::difficulty::skills::StrainSkill, model::mods::GameMods};

use self::{
    aim::DroidAim, flashlight::DroidFlashlight, reading::DroidReading, tap::DroidTap,
    visual::DroidVisual,
};

use super::object::DroidDifficultyObject;

pub mod aim;
pub mod flashlight;
pub mod reading;
pub mod rhythm;
pub mod tap;
pub mod visual;

/// All osu!droid skills that run after rhythm and the touch simulation.
pub struct DroidSkills {
    pub aim: DroidAim,
    pub aim_no_sliders: DroidAim,
    pub tap: DroidTap,
    pub tap_no_cheese: DroidTap,
    pub flashlight: DroidFlashlight,
    pub flashlight_no_sliders: DroidFlashlight,
    pub visual: DroidVisual,
    pub visual_no_sliders: DroidVisual,
    pub reading: DroidReading,
}

impl DroidSkills {
    /// `effective_strain_times` and `rhythm_multipliers` are indexed by
    /// object index.
    pub fn new(
        mods: &GameMods,
        radius: f64,
        effective_strain_times: Vec<f64>,
        rhythm_multipliers: Vec<f64>,
    ) -> Self {
        let hidden = mods.hd();

        Self {
            aim: DroidAim::new(true),
            aim_no_sliders: DroidAim::new(false),
            tap: DroidTap::new(
                true,
                effective_strain_times.clone(),
                rhythm_multipliers.clone(),
            ),
            tap_no_cheese: DroidTap::new(false, effective_strain_times, rhythm_multipliers.clone()),
            flashlight: DroidFlashlight::new(hidden, true, radius),
            flashlight_no_sliders: DroidFlashlight::new(hidden, false, radius),
            visual: DroidVisual::new(hidden, true, rhythm_multipliers.clone()),
            visual_no_sliders: DroidVisual::new(hidden, false, rhythm_multipliers),
            reading: DroidReading::new(hidden),
        }
    }

    pub fn process(
        &mut self,
        curr: &DroidDifficultyObject<'_>,
        objects: &[DroidDifficultyObject<'_>],
    ) {
        self.aim.process(curr, objects);
        self.aim_no_sliders.process(curr, objects);
        self.tap.process(curr, objects);
        self.tap_no_cheese.process(curr, objects);
        self.flashlight.process(curr, objects);
        self.flashlight_no_sliders.process(curr, objects);
        self.visual.process(curr, objects);
        self.visual_no_sliders.process(curr, objects);
        self.reading.process(curr, objects);
    }
}
