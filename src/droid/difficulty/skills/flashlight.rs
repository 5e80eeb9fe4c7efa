use crate::{
    any::difficulty::{
        object::{HasStartTime, IDifficultyObject},
        skills::{
            count_difficult_strains, difficulty_value, strain_decay, StrainSkill,
            StrainSkillState, DECAY_WEIGHT,
        },
    },
    droid::difficulty::{evaluators::FlashlightEvaluator, object::DroidDifficultyObject},
};

pub struct DroidFlashlight {
    hidden: bool,
    with_sliders: bool,
    curr_strain: f64,
    evaluator: FlashlightEvaluator,
    /// Object index and strain of every slider.
    slider_strains: Vec<(usize, f64)>,
    state: StrainSkillState,
}

impl DroidFlashlight {
    const SKILL_MULTIPLIER: f64 = 0.052;
    const STRAIN_DECAY_BASE: f64 = 0.15;

    const REDUCED_SECTION_COUNT: usize = 10;
    const REDUCED_STRAIN_BASELINE: f64 = 0.75;

    pub fn new(hidden: bool, with_sliders: bool, radius: f64) -> Self {
        Self {
            hidden,
            with_sliders,
            curr_strain: 0.0,
            evaluator: FlashlightEvaluator::new(radius),
            slider_strains: Vec::new(),
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

    pub fn slider_strains(&self) -> &[(usize, f64)] {
        &self.slider_strains
    }

    pub fn difficulty_to_performance(difficulty: f64) -> f64 {
        25.0 * difficulty.powf(1.6)
    }
}

impl StrainSkill for DroidFlashlight {
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
            self.evaluator
                .evaluate_diff_of(curr, objects, self.hidden, self.with_sliders)
                * Self::SKILL_MULTIPLIER;

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

    fn save_to_hit_object<'a>(&mut self, curr: &DroidDifficultyObject<'a>, strain: f64) {
        if curr.base.is_slider() {
            self.slider_strains.push((curr.idx, strain));
        }
    }
}
