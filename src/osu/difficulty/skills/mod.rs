use crate::{
    any::{
        difficulty::skills::StrainSkill,
        object::time_fade_in,
    },
    model::{beatmap::BeatmapAttributes, mods::GameMods},
};

use self::{aim::Aim, flashlight::Flashlight, speed::Speed};

use super::{object::OsuDifficultyObject, scaling_factor::ScalingFactor};

pub mod aim;
pub mod flashlight;
pub mod speed;

pub struct OsuSkills {
    pub aim: Aim,
    pub aim_no_sliders: Aim,
    pub speed: Speed,
    pub flashlight: Flashlight,
}

impl OsuSkills {
    pub fn new(
        mods: &GameMods,
        scaling_factor: &ScalingFactor,
        map_attrs: &BeatmapAttributes,
        time_preempt: f64,
    ) -> Self {
        let great_window = 2.0 * map_attrs.hit_windows.od_great;
        let time_fade_in = time_fade_in(time_preempt, mods.hd());

        Self {
            aim: Aim::new(true),
            aim_no_sliders: Aim::new(false),
            speed: Speed::new(great_window, mods.ap()),
            flashlight: Flashlight::new(
                mods.hd(),
                scaling_factor.radius,
                time_preempt,
                time_fade_in,
            ),
        }
    }

    pub fn process(&mut self, curr: &OsuDifficultyObject<'_>, objects: &[OsuDifficultyObject<'_>]) {
        self.aim.process(curr, objects);
        self.aim_no_sliders.process(curr, objects);
        self.speed.process(curr, objects);
        self.flashlight.process(curr, objects);
    }
}
