use std::{f64::consts::SQRT_2, sync::OnceLock};

use serde::{Deserialize, Serialize};

use crate::util::{
    root_finding::{find_root_expand, RootFinding},
    special_functions::{erf, normal_cdf, normal_pdf},
};

use super::skills::difficulty_to_performance;

/// Amount of seconds a player is assumed to spend retrying a map until they
/// full combo it.
const TARGET_RETRY_TIME: f64 = 24.0 * 60.0;

/// Above this amount of objects, difficulties are grouped into bins.
const BIN_THRESHOLD: usize = 64;
const DIFFICULTY_BIN_COUNT: usize = 32;
const TIME_BIN_COUNT: usize = 16;

/// Amount of sample points for the miss penalty polynomial.
const SAMPLE_COUNT: usize = 21;
const POLYNOMIAL_DEGREE: usize = 3;
const COEFFICIENT_COUNT: usize = POLYNOMIAL_DEGREE + 1;

/// Probability to hit an object of the given difficulty at the given skill.
pub fn hit_probability(skill: f64, difficulty: f64) -> f64 {
    if difficulty <= 0.0 {
        return 1.0;
    }

    if skill <= 0.0 {
        return 0.0;
    }

    erf(skill / (SQRT_2 * difficulty))
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Bin {
    difficulty: f64,
    count: f64,
}

/// A period of the map after which the player either full combo'd so far or
/// has to retry.
#[derive(Clone, Debug, PartialEq)]
struct TimeSlice {
    /// Duration in seconds.
    duration: f64,
    bins: Vec<Bin>,
}

/// Models how long a player of a given skill level spends retrying a map.
///
/// Small maps are evaluated object by object, larger maps are grouped into a
/// grid of difficulty and time bins.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryTimeModel {
    slices: Vec<TimeSlice>,
    max_difficulty: f64,
    object_count: usize,
}

impl RetryTimeModel {
    /// `objects` consists of `(time, difficulty)` pairs with the time in
    /// clock-rate adjusted milliseconds, sorted by time.
    pub fn new(objects: &[(f64, f64)]) -> Self {
        let max_difficulty = objects.iter().map(|(_, d)| *d).fold(0.0, f64::max);

        let slices = if objects.len() > BIN_THRESHOLD && max_difficulty > 0.0 {
            Self::binned_slices(objects, max_difficulty)
        } else {
            Self::exact_slices(objects)
        };

        Self {
            slices,
            max_difficulty,
            object_count: objects.len(),
        }
    }

    fn exact_slices(objects: &[(f64, f64)]) -> Vec<TimeSlice> {
        let mut prev_time = objects.first().map_or(0.0, |(time, _)| *time);

        objects
            .iter()
            .map(|&(time, difficulty)| {
                let duration = (time - prev_time).max(0.0) / 1000.0;
                prev_time = time;

                TimeSlice {
                    duration,
                    bins: vec![Bin {
                        difficulty,
                        count: 1.0,
                    }],
                }
            })
            .collect()
    }

    fn binned_slices(objects: &[(f64, f64)], max_difficulty: f64) -> Vec<TimeSlice> {
        let (Some(first), Some(last)) = (objects.first(), objects.last()) else {
            return Vec::new();
        };

        let start_time = first.0;
        let slice_len = (last.0 - start_time) / TIME_BIN_COUNT as f64;

        let mut counts = vec![[0.0; DIFFICULTY_BIN_COUNT]; TIME_BIN_COUNT];

        for &(time, difficulty) in objects {
            let time_idx = if slice_len > 0.0 {
                (((time - start_time) / slice_len) as usize).min(TIME_BIN_COUNT - 1)
            } else {
                0
            };

            let difficulty_idx = ((difficulty / max_difficulty * DIFFICULTY_BIN_COUNT as f64)
                as usize)
                .min(DIFFICULTY_BIN_COUNT - 1);

            counts[time_idx][difficulty_idx] += 1.0;
        }

        let bin_width = max_difficulty / DIFFICULTY_BIN_COUNT as f64;

        counts
            .iter()
            .map(|slice_counts| TimeSlice {
                duration: slice_len / 1000.0,
                bins: slice_counts
                    .iter()
                    .enumerate()
                    .filter(|(_, count)| **count > 0.0)
                    .map(|(i, count)| Bin {
                        difficulty: (i as f64 + 0.5) * bin_width,
                        count: *count,
                    })
                    .collect(),
            })
            .collect()
    }

    /// Expected time in seconds to full combo the map at the given skill.
    pub fn expected_retry_time(&self, skill: f64) -> f64 {
        let mut cumulative_probability = 1.0;
        let mut total = 0.0;

        for slice in self.slices.iter() {
            cumulative_probability *= slice
                .bins
                .iter()
                .map(|bin| hit_probability(skill, bin.difficulty).powf(bin.count))
                .product::<f64>();

            if slice.duration <= 0.0 {
                continue;
            }

            if cumulative_probability <= 0.0 {
                return f64::INFINITY;
            }

            total += slice.duration / cumulative_probability - slice.duration;
        }

        total
    }

    /// The skill level at which the expected retry time is 24 minutes.
    pub fn skill_level(&self) -> f64 {
        if self.max_difficulty <= 0.0 {
            return 0.0;
        }

        let f = |skill: f64| self.expected_retry_time(skill) - TARGET_RETRY_TIME;

        match find_root_expand(f, 0.0, 2.0 * self.max_difficulty, RootFinding::DEFAULT) {
            Some(skill) => {
                tracing::trace!(skill, "Found skill level for retry time");

                skill.max(0.0)
            }
            None => {
                tracing::trace!("No skill level matches the target retry time");

                0.0
            }
        }
    }

    /// Median amount of misses at the given skill level.
    pub fn expected_misses(&self, skill: f64) -> f64 {
        let mut mean = 0.0;
        let mut variance = 0.0;
        let mut third_moment = 0.0;

        for bin in self.slices.iter().flat_map(|slice| slice.bins.iter()) {
            let q = 1.0 - hit_probability(skill, bin.difficulty);
            mean += bin.count * q;
            variance += bin.count * q * (1.0 - q);
            third_moment += bin.count * q * (1.0 - q) * (1.0 - 2.0 * q);
        }

        poisson_binomial_median(mean, variance, third_moment, self.object_count)
    }
}

/// Smallest `k` for which the Poisson binomial distribution's CDF is at least
/// 0.5, approximated through the refined normal approximation.
fn poisson_binomial_median(mean: f64, variance: f64, third_moment: f64, n: usize) -> f64 {
    if variance <= 0.0 {
        return mean.round();
    }

    let sd = variance.sqrt();
    let skewness = third_moment / (sd * sd * sd);

    let cdf = |k: usize| {
        let x = (k as f64 + 0.5 - mean) / sd;
        let value = normal_cdf(x) + skewness * (1.0 - x * x) * normal_pdf(x) / 6.0;

        value.clamp(0.0, 1.0)
    };

    let mut lower = 0;
    let mut upper = n;

    if cdf(lower) >= 0.5 {
        return 0.0;
    }

    while lower + 1 < upper {
        let mid = lower + (upper - lower) / 2;

        if cdf(mid) >= 0.5 {
            upper = mid;
        } else {
            lower = mid;
        }
    }

    upper as f64
}

fn sample_points() -> impl Iterator<Item = f64> {
    (0..SAMPLE_COUNT).map(|i| i as f64 / (SAMPLE_COUNT - 1) as f64)
}

/// Pseudo-inverse of the Vandermonde matrix of the sample points.
fn pseudo_inverse() -> &'static [[f64; SAMPLE_COUNT]; COEFFICIENT_COUNT] {
    static PSEUDO_INVERSE: OnceLock<[[f64; SAMPLE_COUNT]; COEFFICIENT_COUNT]> = OnceLock::new();

    PSEUDO_INVERSE.get_or_init(|| {
        let mut vandermonde = [[0.0; COEFFICIENT_COUNT]; SAMPLE_COUNT];

        for (row, x) in vandermonde.iter_mut().zip(sample_points()) {
            let mut power = 1.0;

            for value in row.iter_mut() {
                *value = power;
                power *= x;
            }
        }

        // Normal equations (AᵀA)⁻¹Aᵀ
        let mut gram = [[0.0; COEFFICIENT_COUNT]; COEFFICIENT_COUNT];

        for (i, gram_row) in gram.iter_mut().enumerate() {
            for (j, value) in gram_row.iter_mut().enumerate() {
                *value = vandermonde.iter().map(|row| row[i] * row[j]).sum();
            }
        }

        let inverse = invert(gram);
        let mut pinv = [[0.0; SAMPLE_COUNT]; COEFFICIENT_COUNT];

        for (i, pinv_row) in pinv.iter_mut().enumerate() {
            for (k, value) in pinv_row.iter_mut().enumerate() {
                *value = (0..COEFFICIENT_COUNT)
                    .map(|j| inverse[i][j] * vandermonde[k][j])
                    .sum();
            }
        }

        pinv
    })
}

/// Gauss-Jordan elimination with partial pivoting.
fn invert<const N: usize>(mut matrix: [[f64; N]; N]) -> [[f64; N]; N] {
    let mut inverse = [[0.0; N]; N];

    for (i, row) in inverse.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    for col in 0..N {
        let pivot = (col..N)
            .max_by(|&a, &b| matrix[a][col].abs().total_cmp(&matrix[b][col].abs()))
            .unwrap_or(col);

        matrix.swap(col, pivot);
        inverse.swap(col, pivot);

        let pivot_value = matrix[col][col];

        if pivot_value == 0.0 {
            continue;
        }

        for j in 0..N {
            matrix[col][j] /= pivot_value;
            inverse[col][j] /= pivot_value;
        }

        for row in 0..N {
            if row == col {
                continue;
            }

            let factor = matrix[row][col];

            for j in 0..N {
                matrix[row][j] -= factor * matrix[col][j];
                inverse[row][j] -= factor * inverse[col][j];
            }
        }
    }

    inverse
}

/// Least-squares fit of a cubic through values at the sample points.
fn fit_cubic(values: &[f64; SAMPLE_COUNT]) -> [f64; COEFFICIENT_COUNT] {
    let pinv = pseudo_inverse();
    let mut coefficients = [0.0; COEFFICIENT_COUNT];

    for (coefficient, row) in coefficients.iter_mut().zip(pinv.iter()) {
        *coefficient = row.iter().zip(values).map(|(a, b)| a * b).sum();
    }

    coefficients
}

/// Cubic polynomial mapping a proportion of the skill level to
/// `ln(misses + 1)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MissPenaltyCurve {
    /// Coefficients in ascending order of degree.
    pub coefficients: [f64; COEFFICIENT_COUNT],
}

impl MissPenaltyCurve {
    pub fn new(model: &RetryTimeModel, skill_level: f64) -> Self {
        let mut values = [0.0; SAMPLE_COUNT];

        for (value, x) in values.iter_mut().zip(sample_points()) {
            *value = (model.expected_misses(x * skill_level) + 1.0).ln();
        }

        Self {
            coefficients: fit_cubic(&values),
        }
    }

    /// Whether the curve carries no information, e.g. for maps without
    /// difficulty.
    pub fn is_empty(&self) -> bool {
        self.coefficients.iter().all(|c| *c == 0.0)
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |sum, coefficient| sum * x + coefficient)
    }

    /// Proportion of the skill level at which the given amount of misses is
    /// expected.
    pub fn skill_proportion(&self, misses: f64) -> f64 {
        let target = (misses + 1.0).ln();

        if target >= self.evaluate(0.0) {
            return 0.0;
        } else if target <= self.evaluate(1.0) {
            return 1.0;
        }

        find_root_expand(
            |x| self.evaluate(x) - target,
            0.0,
            1.0,
            RootFinding::DEFAULT,
        )
        .map_or(1.0, |x| x.clamp(0.0, 1.0))
    }

    /// Multiplier for the performance of a skill with the given rating.
    pub fn penalty(&self, misses: f64, rating: f64) -> f64 {
        if misses <= 0.0 || rating <= 0.0 {
            return 1.0;
        }

        let proportion = self.skill_proportion(misses);

        difficulty_to_performance(rating * proportion) / difficulty_to_performance(rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(count: usize, difficulty: f64) -> Vec<(f64, f64)> {
        (0..count)
            .map(|i| (i as f64 * 250.0, difficulty))
            .collect()
    }

    #[test]
    fn probability_bounds() {
        assert!((hit_probability(1.0, 0.0) - 1.0).abs() < f64::EPSILON);
        assert!(hit_probability(0.0, 1.0).abs() < f64::EPSILON);
        assert!(hit_probability(3.0, 1.0) > hit_probability(1.0, 1.0));
    }

    #[test]
    fn retry_time_decreases_with_skill() {
        let model = RetryTimeModel::new(&uniform(40, 2.0));

        assert!(model.expected_retry_time(0.0).is_infinite());
        assert!(model.expected_retry_time(2.0) > model.expected_retry_time(4.0));
        assert!(model.expected_retry_time(100.0) < 1.0);
    }

    #[test]
    fn harder_maps_need_more_skill() {
        let easy = RetryTimeModel::new(&uniform(40, 1.0)).skill_level();
        let hard = RetryTimeModel::new(&uniform(40, 2.0)).skill_level();

        assert!(easy > 0.0);
        assert!(hard > easy);

        let binned = RetryTimeModel::new(&uniform(500, 2.0)).skill_level();
        assert!(binned.is_finite() && binned > hard);
    }

    #[test]
    fn retry_time_at_skill_level_hits_target() {
        let model = RetryTimeModel::new(&uniform(40, 2.0));
        let skill = model.skill_level();

        let below = model.expected_retry_time(skill - 1e-2);
        let above = model.expected_retry_time(skill + 1e-2);

        assert!(below >= TARGET_RETRY_TIME && above <= TARGET_RETRY_TIME);
    }

    #[test]
    fn no_difficulty() {
        let model = RetryTimeModel::new(&uniform(10, 0.0));
        assert!(model.skill_level().abs() < f64::EPSILON);
        assert!(model.expected_misses(1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn poisson_binomial() {
        // 100 coin flips
        let median = poisson_binomial_median(50.0, 25.0, 0.0, 100);
        assert!((median - 50.0).abs() < f64::EPSILON);

        // Certain outcomes
        assert!(poisson_binomial_median(0.0, 0.0, 0.0, 100).abs() < f64::EPSILON);
        assert!((poisson_binomial_median(7.0, 0.0, 0.0, 100) - 7.0).abs() < f64::EPSILON);

        // Rare misses
        let median = poisson_binomial_median(0.1, 0.099, 0.099 * 0.8, 100);
        assert!(median.abs() < f64::EPSILON);
    }

    #[test]
    fn cubic_fit_recovers_polynomial() {
        let mut values = [0.0; SAMPLE_COUNT];

        for (value, x) in values.iter_mut().zip(sample_points()) {
            *value = 1.0 + 2.0 * x - x * x * x;
        }

        let coefficients = fit_cubic(&values);
        let expected = [1.0, 2.0, 0.0, -1.0];

        for (actual, expected) in coefficients.iter().zip(expected) {
            assert!((actual - expected).abs() < 1e-8, "{coefficients:?}");
        }
    }

    #[test]
    fn miss_penalty() {
        let model = RetryTimeModel::new(&uniform(200, 2.0));
        let curve = MissPenaltyCurve::new(&model, model.skill_level());

        assert!(!curve.is_empty());
        assert!((curve.penalty(0.0, 3.0) - 1.0).abs() < f64::EPSILON);

        let one = curve.penalty(1.0, 3.0);
        let many = curve.penalty(20.0, 3.0);

        assert!(one <= 1.0 && many < one);
        assert!(many > 0.0);
    }
}
