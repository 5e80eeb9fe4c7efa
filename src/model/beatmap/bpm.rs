use std::collections::HashMap;

use crate::model::{control_point::TimingPoint, hit_object::HitObject};

/// The most common BPM weighted by how long each beat length is active.
pub fn bpm(last_hit_object: Option<&HitObject>, timing_points: &[TimingPoint]) -> f64 {
    // Slider end times are unknown at this point so the last object's start
    // time is used for sliders.
    let last_time = last_hit_object
        .map(HitObject::end_time)
        .or_else(|| timing_points.last().map(|t| t.time))
        .unwrap_or(0.0);

    let mut durations = BeatLenDurations::new(last_time);

    // The first timing point is treated as if it started at 0
    match timing_points {
        [curr] => durations.add(curr.beat_len, 0.0, last_time),
        [curr, next, ..] => durations.add(curr.beat_len, 0.0, next.time),
        [] => {}
    }

    timing_points
        .iter()
        .skip(1)
        .zip(timing_points.iter().skip(2).map(|t| t.time))
        .for_each(|(curr, next_time)| durations.add(curr.beat_len, curr.time, next_time));

    if let [.., _, curr] = timing_points {
        durations.add(curr.beat_len, curr.time, last_time);
    }

    let most_common_beat_len = durations
        .map
        .into_iter()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map_or(0.0, |(beat_len, _)| f64::from_bits(beat_len));

    60_000.0 / most_common_beat_len
}

/// Maps rounded beat lengths to their cumulative duration.
struct BeatLenDurations {
    last_time: f64,
    map: HashMap<u64, f64>,
}

impl BeatLenDurations {
    fn new(last_time: f64) -> Self {
        Self {
            last_time,
            map: HashMap::default(),
        }
    }

    fn add(&mut self, beat_len: f64, curr_time: f64, next_time: f64) {
        let beat_len = (1000.0 * beat_len).round() / 1000.0;
        let entry = self.map.entry(beat_len.to_bits()).or_default();

        if curr_time <= self.last_time {
            *entry += next_time - curr_time;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::hit_object::{HitObjectKind, Pos};

    use super::*;

    #[test]
    fn longest_beat_len_wins() {
        let points = [
            TimingPoint::new(0.0, 500.0),
            TimingPoint::new(1000.0, 300.0),
            TimingPoint::new(2000.0, 500.0),
        ];

        let last = HitObject {
            pos: Pos::default(),
            start_time: 10_000.0,
            kind: HitObjectKind::Circle,
        };

        assert!((bpm(Some(&last), &points) - 120.0).abs() < 1e-9);
    }

    #[test]
    fn no_timing_points() {
        assert_eq!(bpm(None, &[]), f64::INFINITY);
    }
}
