use crate::{
    any::difficulty::{
        object::{HasStartTime, IDifficultyObject},
        skills::{
            count_difficult_strains, difficulty_value, strain_decay, StrainSkill,
            StrainSkillState, DECAY_WEIGHT,
        },
    },
    droid::difficulty::{evaluators::VisualEvaluator, object::DroidDifficultyObject},
};

#[derive(Clone, Debug)]
pub struct DroidVisual {
    hidden: bool,
    with_sliders: bool,
    curr_strain: f64,
    /// Indexed by object index.
    rhythm_multipliers: Vec<f64>,
    state: StrainSkillState,
}

impl DroidVisual {
    const SKILL_MULTIPLIER: f64 = 10.0;
    const STRAIN_DECAY_BASE: f64 = 0.1;

    const REDUCED_SECTION_COUNT: usize = 10;
    const REDUCED_STRAIN_BASELINE: f64 = 0.75;

    pub fn new(hidden: bool, with_sliders: bool, rhythm_multipliers: Vec<f64>) -> Self {
        Self {
            hidden,
            with_sliders,
            curr_strain: 0.0,
            rhythm_multipliers,
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

    pub fn count_difficult_strains(&self) -> f64 {
        count_difficult_strains(&self.state.object_strains)
    }

    pub fn difficulty_to_performance(difficulty: f64) -> f64 {
        22.5 * difficulty.powf(1.6)
    }
}

impl StrainSkill for DroidVisual {
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
        let rhythm_multiplier = self.rhythm_multipliers.get(curr.idx).copied().unwrap_or(1.0);

        self.curr_strain *= strain_decay(curr.delta_time, Self::STRAIN_DECAY_BASE);
        self.curr_strain += VisualEvaluator::evaluate_diff_of(
            curr,
            objects,
            self.hidden,
            self.with_sliders,
            rhythm_multiplier,
        ) * Self::SKILL_MULTIPLIER;

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
