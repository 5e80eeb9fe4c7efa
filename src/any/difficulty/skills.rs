use crate::util::{difficulty::lerp, float_ext::FloatExt, hint::unlikely};

use super::object::{HasStartTime, IDifficultyObject};

pub use crate::util::difficulty::strain_decay;

/// Bookkeeping shared by all strain skills.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrainSkillState {
    pub curr_section_peak: f64,
    pub curr_section_end: f64,
    pub strain_peaks: Vec<f64>,
    pub object_strains: Vec<f64>,
}

impl StrainSkillState {
    pub const SECTION_LEN: f64 = 400.0;

    pub fn save_curr_peak(&mut self) {
        tracing::trace!(
            peak = self.curr_section_peak,
            section_end = self.curr_section_end,
            "Saved strain peak"
        );

        self.strain_peaks.push(self.curr_section_peak);
    }

    pub fn start_new_section_from(&mut self, initial_strain: f64) {
        // * The maximum strain of the new section is not zero by default
        // * This means we need to capture the strain level at the beginning of the new section, and use that as the initial peak level.
        self.curr_section_peak = initial_strain;
    }

    /// The strain peaks of all sections, including the current one.
    pub fn get_curr_strain_peaks(&self) -> Vec<f64> {
        let mut peaks = Vec::with_capacity(self.strain_peaks.len() + 1);
        peaks.extend_from_slice(&self.strain_peaks);
        peaks.push(self.curr_section_peak);

        peaks
    }
}

/// A skill that accumulates strain per object and buckets the peaks into
/// sections of [`StrainSkillState::SECTION_LEN`] milliseconds.
pub trait StrainSkill {
    type DifficultyObject<'a>: IDifficultyObject + HasStartTime;

    fn state(&self) -> &StrainSkillState;

    fn state_mut(&mut self) -> &mut StrainSkillState;

    /// Calculate the strain of the current object and update the skill's
    /// own strain accordingly.
    fn strain_value_at<'a>(
        &mut self,
        curr: &Self::DifficultyObject<'a>,
        objects: &[Self::DifficultyObject<'a>],
    ) -> f64;

    /// The strain at the beginning of a new section which starts at `time`.
    fn calculate_initial_strain<'a>(
        &self,
        time: f64,
        curr: &Self::DifficultyObject<'a>,
        objects: &[Self::DifficultyObject<'a>],
    ) -> f64;

    /// Hook to store per-object results of the skill.
    fn save_to_hit_object<'a>(&mut self, _curr: &Self::DifficultyObject<'a>, _strain: f64) {}

    /// Process an object. Objects must be processed in chronological order.
    fn process<'a>(
        &mut self,
        curr: &Self::DifficultyObject<'a>,
        objects: &[Self::DifficultyObject<'a>],
    ) {
        let start_time = curr.start_time();

        // * The first object doesn't generate a strain, so we begin with an incremented section end
        if self.state().object_strains.is_empty() {
            self.state_mut().curr_section_end =
                (start_time / StrainSkillState::SECTION_LEN).ceil() * StrainSkillState::SECTION_LEN;
        }

        while start_time > self.state().curr_section_end {
            self.state_mut().save_curr_peak();
            let section_end = self.state().curr_section_end;
            let initial_strain = self.calculate_initial_strain(section_end, curr, objects);

            let state = self.state_mut();
            state.start_new_section_from(initial_strain);
            state.curr_section_end += StrainSkillState::SECTION_LEN;
        }

        let strain = self.strain_value_at(curr, objects);
        self.save_to_hit_object(curr, strain);

        let state = self.state_mut();
        state.curr_section_peak = strain.max(state.curr_section_peak);
        state.object_strains.push(strain);
    }
}

pub const DECAY_WEIGHT: f64 = 0.9;

/// Weighted sum of the sorted strain peaks.
///
/// The `reduced_section_count` highest peaks are dampened down to
/// `reduced_strain_baseline` so that single spikes don't dominate.
pub fn difficulty_value(
    current_strain_peaks: Vec<f64>,
    reduced_section_count: usize,
    reduced_strain_baseline: f64,
    decay_weight: f64,
) -> f64 {
    let mut difficulty = 0.0;
    let mut weight = 1.0;

    // * Sections with 0 strain are excluded to avoid worst-case time complexity of the following sort (e.g. /b/2351871).
    // * These sections will not contribute to the difficulty.
    let mut peaks = current_strain_peaks;
    peaks.retain(|&peak| peak > 0.0);
    peaks.sort_unstable_by(|a, b| b.total_cmp(a));

    // * We are reducing the highest strains first to account for extreme difficulty spikes
    for (i, strain) in peaks.iter_mut().take(reduced_section_count).enumerate() {
        let clamped = (i as f64 / reduced_section_count as f64).clamp(0.0, 1.0);
        let scale = f64::log10(lerp(1.0, 10.0, clamped));
        *strain *= lerp(reduced_strain_baseline, 1.0, scale);
    }

    peaks.sort_unstable_by(|a, b| b.total_cmp(a));

    // * Difficulty is the weighted sum of the highest strains from every section.
    // * We're sorting from highest to lowest strain.
    for strain in peaks {
        let addition = strain * weight;

        if unlikely(addition <= difficulty * f64::EPSILON) {
            break;
        }

        difficulty += addition;
        weight *= decay_weight;
    }

    difficulty
}

/// Aggregates object difficulties with weights following `1 / (1 + x / 10)`.
///
/// Each object's weight is the integral of that curve over its position in
/// the sorted list.
pub fn harmonic_difficulty_value(object_difficulties: Vec<f64>) -> f64 {
    const SCALE: f64 = 10.0;

    let mut difficulties = object_difficulties;
    difficulties.retain(|&d| d > 0.0);
    difficulties.sort_unstable_by(|a, b| b.total_cmp(a));

    difficulties
        .iter()
        .enumerate()
        .map(|(i, difficulty)| {
            let i = i as f64;
            let weight = SCALE * f64::ln((SCALE + i + 1.0) / (SCALE + i));

            difficulty * weight
        })
        .sum()
}

pub fn count_top_weighted_strains(object_strains: &[f64], difficulty_value: f64) -> f64 {
    if unlikely(object_strains.is_empty()) {
        return 0.0;
    }

    // * What would the top strain be if all strain values were identical
    let consistent_top_strain = difficulty_value / 10.0;

    if unlikely(FloatExt::eq(consistent_top_strain, 0.0)) {
        return object_strains.len() as f64;
    }

    // * Use a weighted sum of all strains. Constants are arbitrary and give nice values
    object_strains
        .iter()
        .map(|s| 1.1 / (1.0 + f64::exp(-10.0 * (s / consistent_top_strain - 0.88))))
        .sum()
}

/// Sum of all strains relative to the maximum strain, raised to the 4th
/// power.
pub fn count_difficult_strains(object_strains: &[f64]) -> f64 {
    let max_strain = object_strains.iter().copied().fold(0.0, f64::max);

    if unlikely(max_strain <= 0.0) {
        return 0.0;
    }

    object_strains
        .iter()
        .map(|strain| (strain / max_strain).powi(4))
        .sum()
}

/// Converts a skill rating to its base performance value.
pub fn difficulty_to_performance(difficulty: f64) -> f64 {
    f64::powf(5.0 * f64::max(1.0, difficulty / 0.0675) - 4.0, 3.0) / 100_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_sum_without_reduction() {
        let value = difficulty_value(vec![0.0, 1.0, 2.0, 0.0], 0, 1.0, DECAY_WEIGHT);

        assert!((value - 2.9).abs() < 1e-12, "{value}");
    }

    #[test]
    fn reduction_dampens_top_peak() {
        let reduced = difficulty_value(vec![100.0], 10, 0.75, DECAY_WEIGHT);

        assert!((reduced - 75.0).abs() < 1e-12, "{reduced}");
    }

    #[test]
    fn harmonic() {
        let single = harmonic_difficulty_value(vec![1.0]);
        assert!((single - 0.953_101_798_043_249).abs() < 1e-12, "{single}");

        let double = harmonic_difficulty_value(vec![0.0, 1.0, 1.0]);
        assert!((double - 1.823_215_567_939_546).abs() < 1e-12, "{double}");

        assert_eq!(harmonic_difficulty_value(Vec::new()), 0.0);
    }

    #[test]
    fn difficult_strains() {
        assert_eq!(count_difficult_strains(&[]), 0.0);
        assert_eq!(count_difficult_strains(&[0.0, 0.0]), 0.0);

        let count = count_difficult_strains(&[1.0, 2.0]);
        assert!((count - 1.0625).abs() < 1e-12);
    }

    #[test]
    fn top_weighted_strains() {
        assert_eq!(count_top_weighted_strains(&[], 5.0), 0.0);
        assert_eq!(count_top_weighted_strains(&[1.0, 2.0, 3.0], 0.0), 3.0);
    }

    #[test]
    fn performance_base() {
        assert!((difficulty_to_performance(0.0675) - 1e-5).abs() < 1e-15);
    }
}
