use crate::{
    any::difficulty::{
        object::{HasStartTime, IDifficultyObject},
        skills::{
            count_top_weighted_strains, difficulty_value, strain_decay, StrainSkill,
            StrainSkillState, DECAY_WEIGHT,
        },
    },
    osu::difficulty::{evaluators::AimEvaluator, object::OsuDifficultyObject},
    util::float_ext::FloatExt,
};

#[derive(Clone, Debug)]
pub struct Aim {
    include_sliders: bool,
    curr_strain: f64,
    slider_strains: Vec<f64>,
    state: StrainSkillState,
}

impl Aim {
    const SKILL_MULTIPLIER: f64 = 25.6;
    const STRAIN_DECAY_BASE: f64 = 0.15;

    const REDUCED_SECTION_COUNT: usize = 10;
    const REDUCED_STRAIN_BASELINE: f64 = 0.75;

    pub fn new(include_sliders: bool) -> Self {
        Self {
            include_sliders,
            curr_strain: 0.0,
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

    pub fn count_top_weighted_strains(&self, difficulty_value: f64) -> f64 {
        count_top_weighted_strains(&self.state.object_strains, difficulty_value)
    }

    /// Amount of sliders weighted by their difficulty.
    pub fn difficult_slider_count(&self) -> f64 {
        let max_slider_strain = self.slider_strains.iter().copied().fold(0.0, f64::max);

        if max_slider_strain.eq(0.0) {
            return 0.0;
        }

        self.slider_strains
            .iter()
            .map(|strain| 1.0 / (1.0 + f64::exp(-(strain / max_slider_strain * 12.0 - 6.0))))
            .sum()
    }
}

impl StrainSkill for Aim {
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
        self.curr_strain *= strain_decay(curr.delta_time, Self::STRAIN_DECAY_BASE);
        self.curr_strain += AimEvaluator::evaluate_diff_of(curr, objects, self.include_sliders)
            * Self::SKILL_MULTIPLIER;

        if curr.base.is_slider() {
            self.slider_strains.push(self.curr_strain);
        }

        self.curr_strain
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

        self.curr_strain * strain_decay(time - prev_start_time, Self::STRAIN_DECAY_BASE)
    }
}
