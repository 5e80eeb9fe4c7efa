use crate::{
    any::difficulty::{
        object::{HasStartTime, IDifficultyObject},
        skills::{harmonic_difficulty_value, strain_decay, StrainSkill, StrainSkillState},
    },
    droid::difficulty::{evaluators::RhythmEvaluator, object::DroidDifficultyObject},
};

/// Rhythm complexity of the map.
///
/// Besides its own difficulty, the skill provides the rhythm multiplier of
/// every object for tap and visual.
#[derive(Clone, Debug)]
pub struct DroidRhythm {
    curr_strain: f64,
    /// Indexed by object index.
    multipliers: Vec<f64>,
    state: StrainSkillState,
}

impl DroidRhythm {
    const STRAIN_DECAY_BASE: f64 = 0.3;

    pub fn new(n_objects: usize) -> Self {
        Self {
            curr_strain: 0.0,
            multipliers: vec![1.0; n_objects],
            state: StrainSkillState::default(),
        }
    }

    pub fn get_curr_strain_peaks(&self) -> Vec<f64> {
        self.state.get_curr_strain_peaks()
    }

    pub fn difficulty_value(&self) -> f64 {
        harmonic_difficulty_value(self.state.object_strains.clone())
    }

    /// Rhythm multiplier of each object. Objects that were not processed
    /// keep a multiplier of `1.0`.
    pub fn multipliers(&self) -> &[f64] {
        &self.multipliers
    }
}

impl StrainSkill for DroidRhythm {
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
        let rhythm = RhythmEvaluator::evaluate_diff_of(curr, objects);

        if let Some(multiplier) = self.multipliers.get_mut(curr.idx) {
            *multiplier = rhythm;
        }

        self.curr_strain *= strain_decay(curr.strain_time, Self::STRAIN_DECAY_BASE);
        self.curr_strain += rhythm - 1.0;

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
