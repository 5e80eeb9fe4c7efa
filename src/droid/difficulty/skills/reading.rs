use crate::{
    any::difficulty::{
        object::{HasStartTime, IDifficultyObject},
        skills::{difficulty_value, strain_decay, StrainSkill, StrainSkillState, DECAY_WEIGHT},
    },
    droid::difficulty::{evaluators::ReadingEvaluator, object::DroidDifficultyObject},
};

#[derive(Clone, Debug)]
pub struct DroidReading {
    hidden: bool,
    curr_strain: f64,
    state: StrainSkillState,
}

impl DroidReading {
    const SKILL_MULTIPLIER: f64 = 0.26;
    const STRAIN_DECAY_BASE: f64 = 0.8;

    pub fn new(hidden: bool) -> Self {
        Self {
            hidden,
            curr_strain: 0.0,
            state: StrainSkillState::default(),
        }
    }

    pub fn get_curr_strain_peaks(&self) -> Vec<f64> {
        self.state.get_curr_strain_peaks()
    }

    pub fn difficulty_value(&self) -> f64 {
        difficulty_value(self.state.get_curr_strain_peaks(), 0, 1.0, DECAY_WEIGHT)
    }
}

impl StrainSkill for DroidReading {
    type DifficultyObject<'a> = DroidDifficultyObject<'a>;

    fn state(&self) -> &StrainSkillState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut StrainSkillState {
        &mut self.state
    }

    fn strain_value_at<'a>(
        &mut self,
        curr: &DroidDifficultyObject<'a>,
        objects: &[DroidDifficultyObject<'a>],
    ) -> f64 {
        self.curr_strain *= strain_decay(curr.delta_time, Self::STRAIN_DECAY_BASE);
        self.curr_strain +=
            ReadingEvaluator::evaluate_diff_of(curr, objects, self.hidden) * Self::SKILL_MULTIPLIER;

        self.curr_strain
    }

    fn calculate_initial_strain<'a>(
        &self,
        time: f64,
        curr: &DroidDifficultyObject<'a>,
        objects: &[DroidDifficultyObject<'a>],
    ) -> f64 {
        let prev_start_time = curr
            .previous(0, objects)
            .map_or(0.0, HasStartTime::start_time);

        self.curr_strain * strain_decay(time - prev_start_time, Self::STRAIN_DECAY_BASE)
    }
}
