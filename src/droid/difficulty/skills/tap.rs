use crate::{
    any::difficulty::{
        object::{HasStartTime, IDifficultyObject},
        probability::{MissPenaltyCurve, RetryTimeModel},
        skills::{
            count_difficult_strains, difficulty_value, strain_decay, StrainSkill,
            StrainSkillState, DECAY_WEIGHT,
        },
    },
    droid::difficulty::{evaluators::TapEvaluator, object::DroidDifficultyObject},
};

#[derive(Clone, Debug)]
pub struct DroidTap {
    consider_cheesability: bool,
    curr_strain: f64,
    curr_rhythm: f64,
    /// Indexed by object index.
    effective_strain_times: Vec<f64>,
    /// Indexed by object index.
    rhythm_multipliers: Vec<f64>,
    /// Start time and strain of every object.
    object_difficulties: Vec<(f64, f64)>,
    delta_times: Vec<f64>,
    state: StrainSkillState,
}

impl DroidTap {
    const SKILL_MULTIPLIER: f64 = 1.375;
    const STRAIN_DECAY_BASE: f64 = 0.3;

    const REDUCED_SECTION_COUNT: usize = 5;
    const REDUCED_STRAIN_BASELINE: f64 = 0.75;

    pub fn new(
        consider_cheesability: bool,
        effective_strain_times: Vec<f64>,
        rhythm_multipliers: Vec<f64>,
    ) -> Self {
        Self {
            consider_cheesability,
            curr_strain: 0.0,
            curr_rhythm: 1.0,
            effective_strain_times,
            rhythm_multipliers,
            object_difficulties: Vec::new(),
            delta_times: Vec::new(),
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

    /// Strains of all processed objects in order.
    pub fn object_strains(&self) -> &[f64] {
        &self.state.object_strains
    }

    /// Start times of all processed objects in order.
    pub fn start_times(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.object_difficulties.iter().map(|(start_time, _)| *start_time)
    }

    /// Delta times of all processed objects in order.
    pub fn delta_times(&self) -> &[f64] {
        &self.delta_times
    }

    /// Weight of each object's strain relative to the highest one.
    fn relevance_weights(&self) -> impl Iterator<Item = f64> + '_ {
        let object_strains = &self.state.object_strains;
        let max_strain = object_strains.iter().copied().fold(0.0, f64::max);

        object_strains.iter().map(move |strain| {
            if max_strain > 0.0 {
                (1.0 + f64::exp(-(strain / max_strain * 12.0 - 6.0))).recip()
            } else {
                0.0
            }
        })
    }

    /// Amount of notes weighted by how difficult they are to tap.
    pub fn relevant_note_count(&self) -> f64 {
        self.relevance_weights().sum()
    }

    /// Delta time of the notes that are relevant for tapping, weighted by
    /// their strain.
    pub fn relevant_delta_time(&self) -> f64 {
        let (weighted_sum, total_weight) = self
            .relevance_weights()
            .zip(self.delta_times.iter())
            .fold((0.0, 0.0), |(sum, total), (weight, delta_time)| {
                (sum + delta_time * weight, total + weight)
            });

        if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            0.0
        }
    }

    pub fn miss_penalty_curve(&self) -> MissPenaltyCurve {
        let model = RetryTimeModel::new(&self.object_difficulties);
        let skill_level = model.skill_level();

        if skill_level <= 0.0 {
            return MissPenaltyCurve::default();
        }

        MissPenaltyCurve::new(&model, skill_level)
    }
}

impl StrainSkill for DroidTap {
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
        let effective_strain_time = self
            .effective_strain_times
            .get(curr.idx)
            .copied()
            .unwrap_or(curr.strain_time);

        self.curr_strain *= strain_decay(curr.strain_time, Self::STRAIN_DECAY_BASE);
        self.curr_strain += TapEvaluator::evaluate_diff_of(
            curr,
            objects,
            self.consider_cheesability,
            effective_strain_time,
        ) * Self::SKILL_MULTIPLIER;

        self.curr_rhythm = self.rhythm_multipliers.get(curr.idx).copied().unwrap_or(1.0);

        self.curr_strain * self.curr_rhythm
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

        (self.curr_strain * self.curr_rhythm)
            * strain_decay(time - prev_start_time, Self::STRAIN_DECAY_BASE)
    }

    fn save_to_hit_object<'a>(&mut self, curr: &DroidDifficultyObject<'a>, strain: f64) {
        self.object_difficulties.push((curr.start_time, strain));
        self.delta_times.push(curr.delta_time);
    }
}
