use crate::{
    any::difficulty::{
        object::{HasStartTime, IDifficultyObject},
        skills::{
            count_top_weighted_strains, difficulty_value, strain_decay, StrainSkill,
            StrainSkillState, DECAY_WEIGHT,
        },
    },
    osu::difficulty::{
        evaluators::{RhythmEvaluator, SpeedEvaluator},
        object::OsuDifficultyObject,
    },
};

#[derive(Clone, Debug)]
pub struct Speed {
    curr_strain: f64,
    curr_rhythm: f64,
    great_window: f64,
    autopilot: bool,
    state: StrainSkillState,
}

impl Speed {
    const SKILL_MULTIPLIER: f64 = 1.46;
    const STRAIN_DECAY_BASE: f64 = 0.3;

    const REDUCED_SECTION_COUNT: usize = 5;
    const REDUCED_STRAIN_BASELINE: f64 = 0.75;

    /// `great_window` is the full window for a great hit.
    pub fn new(great_window: f64, autopilot: bool) -> Self {
        Self {
            curr_strain: 0.0,
            curr_rhythm: 0.0,
            great_window,
            autopilot,
            state: StrainSkillState::default(),
        }
    }

    pub fn get_curr_strain_peaks(&self) -> Vec<f64> {
        self.state.get_curr_strain_peaks()
    }

    pub fn difficulty_value(&self) -> f64 {
        difficulty_value(
            self.state.get_curr_strain_peaks(),
            Self::REDUCED_SECTION_COUNT,
            Self::REDUCED_STRAIN_BASELINE,
            DECAY_WEIGHT,
        )
    }

    pub fn count_top_weighted_strains(&self, difficulty_value: f64) -> f64 {
        count_top_weighted_strains(&self.state.object_strains, difficulty_value)
    }

    /// Amount of notes weighted by how difficult they are to tap.
    pub fn relevant_note_count(&self) -> f64 {
        let object_strains = &self.state.object_strains;

        object_strains
            .iter()
            .copied()
            .max_by(f64::total_cmp)
            .filter(|&n| n > 0.0)
            .map_or(0.0, |max_strain| {
                object_strains.iter().fold(0.0, |sum, strain| {
                    sum + (1.0 + f64::exp(-(strain / max_strain * 12.0 - 6.0))).recip()
                })
            })
    }
}

impl StrainSkill for Speed {
    type DifficultyObject<'a> = OsuDifficultyObject<'a>;

    fn state(&self) -> &StrainSkillState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut StrainSkillState {
        &mut self.state
    }

    fn strain_value_at<'a>(
        &mut self,
        curr: &OsuDifficultyObject<'a>,
        objects: &[OsuDifficultyObject<'a>],
    ) -> f64 {
        self.curr_strain *= strain_decay(curr.strain_time, Self::STRAIN_DECAY_BASE);
        self.curr_strain +=
            SpeedEvaluator::evaluate_diff_of(curr, objects, self.great_window, self.autopilot)
                * Self::SKILL_MULTIPLIER;
        self.curr_rhythm = RhythmEvaluator::evaluate_diff_of(curr, objects, self.great_window);

        self.curr_strain * self.curr_rhythm
    }

    fn calculate_initial_strain<'a>(
        &self,
        time: f64,
        curr: &OsuDifficultyObject<'a>,
        objects: &[OsuDifficultyObject<'a>],
    ) -> f64 {
        let prev_start_time = curr
            .previous(0, objects)
            .map_or(0.0, HasStartTime::start_time);

        (self.curr_strain * self.curr_rhythm)
            * strain_decay(time - prev_start_time, Self::STRAIN_DECAY_BASE)
    }
}
