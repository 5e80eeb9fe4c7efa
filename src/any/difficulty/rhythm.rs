use std::{cmp, f64::consts::PI};

use crate::util::difficulty::logistic;

use super::object::{HasStartTime, IDifficultyObject, MIN_DELTA_TIME};

/// A difficulty object whose rhythm can be evaluated.
pub trait RhythmObject: IDifficultyObject + HasStartTime {
    fn delta_time(&self) -> f64;

    fn strain_time(&self) -> f64;

    fn is_slider(&self) -> bool;

    fn is_spinner(&self) -> bool;

    /// How likely it is that `self` and `next` are hit with a single
    /// doubletap, between `0.0` and `1.0`.
    ///
    /// `great_window` is the full window for a great hit.
    fn doubletapness(&self, next: Option<&Self>, great_window: f64) -> f64 {
        let Some(next) = next else { return 0.0 };

        let great_window = if self.is_spinner() { 0.0 } else { great_window };

        let curr_delta_time = self.delta_time().max(1.0);
        let next_delta_time = next.delta_time().max(1.0);
        let delta_diff = (next_delta_time - curr_delta_time).abs();
        let speed_ratio = curr_delta_time / curr_delta_time.max(delta_diff);
        let window_ratio = (curr_delta_time / great_window).min(1.0).powf(2.0);

        1.0 - speed_ratio.powf(1.0 - window_ratio)
    }
}

const HISTORY_TIME_MAX: f64 = 5000.0;
const HISTORY_OBJECTS_MAX: usize = 32;
const RHYTHM_RATIO_MULTIPLIER: f64 = 12.0;

/// Sum of rhythm complexity over the recent history of `curr`.
///
/// Walks from the oldest object within the last 5 seconds, but at most 32
/// objects, up to `curr` and rewards every change between "islands" of
/// similar delta times.
#[allow(clippy::too_many_lines)]
pub fn rhythm_complexity_sum<T: RhythmObject>(curr: &T, objects: &[T], great_window: f64) -> f64 {
    let mut rhythm_complexity_sum = 0.0;

    let delta_difference_eps = great_window * 0.3;

    let mut island = RhythmIsland::new(delta_difference_eps);
    let mut prev_island = RhythmIsland::new(delta_difference_eps);

    // Islands are compared with a tolerance so they can't be hashed
    let mut island_counts = Vec::<IslandCount>::new();

    // Ratio of the current start of an island to buff tighter rhythms
    let mut start_ratio = 0.0;

    let mut first_delta_switch = false;

    let historical_note_count = cmp::min(curr.idx(), HISTORY_OBJECTS_MAX);

    let mut rhythm_start = 0;

    while curr
        .previous(rhythm_start, objects)
        .filter(|prev| {
            rhythm_start + 2 < historical_note_count
                && curr.start_time() - prev.start_time() < HISTORY_TIME_MAX
        })
        .is_some()
    {
        rhythm_start += 1;
    }

    let Some((mut prev_obj, mut last_obj)) = curr
        .previous(rhythm_start, objects)
        .zip(curr.previous(rhythm_start + 1, objects))
    else {
        return 0.0;
    };

    // From the furthest object back to the current one
    for i in (1..=rhythm_start).rev() {
        let Some(curr_obj) = curr.previous(i - 1, objects) else {
            break;
        };

        // Scales note 0 to 1 from history to now
        let time_decay =
            (HISTORY_TIME_MAX - (curr.start_time() - curr_obj.start_time())) / HISTORY_TIME_MAX;
        let note_decay = (historical_note_count - i) as f64 / historical_note_count as f64;

        // Limited either by time or by object count
        let curr_historical_decay = note_decay.min(time_decay);

        let curr_delta = curr_obj.strain_time();
        let prev_delta = prev_obj.strain_time();
        let last_delta = last_obj.strain_time();

        // Deltas that are multiples of each other, e.g. 100 and 200, get a
        // reduced bonus
        let delta_difference_ratio = prev_delta.min(curr_delta) / prev_delta.max(curr_delta);
        let curr_ratio =
            1.0 + RHYTHM_RATIO_MULTIPLIER * (PI / delta_difference_ratio).sin().powf(2.0).min(0.5);

        // Big delta differences get less of a ratio bonus
        let fraction = (prev_delta / curr_delta).max(curr_delta / prev_delta);
        let fraction_multiplier = (2.0 - fraction / 8.0).clamp(0.0, 1.0);

        let window_penalty = (((prev_delta - curr_delta).abs() - delta_difference_eps).max(0.0)
            / delta_difference_eps)
            .min(1.0);

        let mut effective_ratio = window_penalty * curr_ratio * fraction_multiplier;

        if first_delta_switch {
            if (prev_delta - curr_delta).abs() < delta_difference_eps {
                // Island is still progressing
                island.add_delta(curr_delta as i32);
            } else {
                // Speed change into a slider is an easy acc window
                if curr_obj.is_slider() {
                    effective_ratio *= 0.125;
                }

                // Speed change out of a slider is easier than circle to circle
                if prev_obj.is_slider() {
                    effective_ratio *= 0.3;
                }

                // Repeated island polarity, e.g. 2 -> 4 or 3 -> 5
                if island.is_similar_polarity(&prev_island) {
                    effective_ratio *= 0.5;
                }

                // Previous increase happened a note ago, e.g. 1/1 -> 1/2 -> 1/4
                if last_delta > prev_delta + delta_difference_eps
                    && prev_delta > curr_delta + delta_difference_eps
                {
                    effective_ratio *= 0.125;
                }

                // Repeated island size, e.g. triplet -> triplet
                if prev_island.delta_count == island.delta_count {
                    effective_ratio *= 0.5;
                }

                if let Some(island_count) = island_counts
                    .iter_mut()
                    .find(|entry| entry.island == island)
                    .filter(|entry| !entry.island.is_default())
                {
                    // Only count islands that follow one another
                    if prev_island == island {
                        island_count.count += 1;
                    }

                    let power = logistic(f64::from(island.delta), 58.33, 0.24, Some(2.75));
                    effective_ratio *= (3.0 / island_count.count as f64)
                        .min((island_count.count as f64).recip().powf(power));
                } else {
                    island_counts.push(IslandCount { island, count: 1 });
                }

                // Doubletappable objects are easier
                let doubletapness = prev_obj.doubletapness(Some(curr_obj), great_window);
                effective_ratio *= 1.0 - doubletapness * 0.75;

                rhythm_complexity_sum +=
                    (effective_ratio * start_ratio).sqrt() * curr_historical_decay;

                start_ratio = effective_ratio;

                prev_island = island;

                // Slowing down, stop counting
                if prev_delta + delta_difference_eps < curr_delta {
                    first_delta_switch = false;
                }

                island = RhythmIsland::new_with_delta(curr_delta as i32, delta_difference_eps);
            }
        } else if prev_delta > curr_delta + delta_difference_eps {
            // Speeding up, count the island until the speed changes again
            first_delta_switch = true;

            if curr_obj.is_slider() {
                effective_ratio *= 0.6;
            }

            if prev_obj.is_slider() {
                effective_ratio *= 0.6;
            }

            start_ratio = effective_ratio;

            island = RhythmIsland::new_with_delta(curr_delta as i32, delta_difference_eps);
        }

        last_obj = prev_obj;
        prev_obj = curr_obj;
    }

    rhythm_complexity_sum
}

#[derive(Copy, Clone, Debug)]
struct RhythmIsland {
    delta_difference_eps: f64,
    delta: i32,
    delta_count: i32,
}

impl RhythmIsland {
    const fn new(delta_difference_eps: f64) -> Self {
        Self {
            delta_difference_eps,
            delta: i32::MAX,
            delta_count: 0,
        }
    }

    fn new_with_delta(delta: i32, delta_difference_eps: f64) -> Self {
        Self {
            delta_difference_eps,
            delta: delta.max(MIN_DELTA_TIME as i32),
            delta_count: 1,
        }
    }

    fn add_delta(&mut self, delta: i32) {
        if self.delta == i32::MAX {
            self.delta = delta.max(MIN_DELTA_TIME as i32);
        }

        self.delta_count += 1;
    }

    const fn is_similar_polarity(&self, other: &Self) -> bool {
        self.delta_count % 2 == other.delta_count % 2
    }

    const fn is_default(&self) -> bool {
        self.delta == i32::MAX && self.delta_count == 0
    }
}

impl PartialEq for RhythmIsland {
    fn eq(&self, other: &Self) -> bool {
        f64::from(self.delta.abs_diff(other.delta)) < self.delta_difference_eps
            && self.delta_count == other.delta_count
    }
}

struct IslandCount {
    island: RhythmIsland,
    count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Note {
        idx: usize,
        start_time: f64,
        delta_time: f64,
    }

    impl IDifficultyObject for Note {
        fn idx(&self) -> usize {
            self.idx
        }
    }

    impl HasStartTime for Note {
        fn start_time(&self) -> f64 {
            self.start_time
        }
    }

    impl RhythmObject for Note {
        fn delta_time(&self) -> f64 {
            self.delta_time
        }

        fn strain_time(&self) -> f64 {
            self.delta_time.max(MIN_DELTA_TIME)
        }

        fn is_slider(&self) -> bool {
            false
        }

        fn is_spinner(&self) -> bool {
            false
        }
    }

    fn notes(deltas: &[f64]) -> Vec<Note> {
        let mut time = 0.0;

        deltas
            .iter()
            .enumerate()
            .map(|(idx, &delta_time)| {
                time += delta_time;

                Note {
                    idx,
                    start_time: time,
                    delta_time,
                }
            })
            .collect()
    }

    #[test]
    fn steady_stream_has_no_complexity() {
        let notes = notes(&[150.0; 20]);
        let last = notes.last().unwrap();

        assert!(rhythm_complexity_sum(last, &notes, 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn changing_rhythm_is_complex() {
        let deltas: Vec<_> = [300.0, 300.0, 150.0, 150.0, 100.0, 300.0, 150.0, 100.0]
            .into_iter()
            .cycle()
            .take(24)
            .collect();

        let notes = notes(&deltas);
        let last = notes.last().unwrap();

        assert!(rhythm_complexity_sum(last, &notes, 60.0) > 0.0);
    }

    #[test]
    fn doubletapness() {
        let notes = notes(&[100.0, 100.0, 50.0, 200.0]);

        // Next object comes at the same pace
        assert!(notes[0].doubletapness(Some(&notes[1]), 50.0).abs() < f64::EPSILON);
        // No next object
        assert!(notes[3].doubletapness(None, 50.0).abs() < f64::EPSILON);
        // Next object is much slower but the window is too tight to doubletap
        assert!(notes[2].doubletapness(Some(&notes[3]), 50.0).abs() < f64::EPSILON);
        // Same with a lenient window
        assert!(notes[2].doubletapness(Some(&notes[3]), 400.0) > 0.5);
    }
}
