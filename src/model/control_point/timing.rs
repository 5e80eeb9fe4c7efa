/// Timing-related info about this control point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimingPoint {
    pub time: f64,
    pub beat_len: f64,
}

impl TimingPoint {
    pub const DEFAULT_BEAT_LEN: f64 =
        rosu_map::section::timing_points::TimingPoint::DEFAULT_BEAT_LEN;

    pub const DEFAULT_BPM: f64 = 60_000.0 / Self::DEFAULT_BEAT_LEN;

    /// Create a new timing point, clamping the beat length to `[6, 60000]`.
    pub fn new(time: f64, beat_len: f64) -> Self {
        Self {
            time,
            beat_len: beat_len.clamp(6.0, 60_000.0),
        }
    }

    pub fn bpm(&self) -> f64 {
        60_000.0 / self.beat_len
    }
}

impl Default for TimingPoint {
    fn default() -> Self {
        Self {
            time: 0.0,
            beat_len: Self::DEFAULT_BEAT_LEN,
        }
    }
}

/// The timing point active at `time`, falling back to the first one if
/// `time` lies before all of them.
pub fn timing_point_at(points: &[TimingPoint], time: f64) -> Option<&TimingPoint> {
    let i = points
        .binary_search_by(|probe| probe.time.total_cmp(&time))
        .unwrap_or_else(|i| i.saturating_sub(1));

    points.get(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        let points = [TimingPoint::new(0.0, 500.0), TimingPoint::new(1000.0, 250.0)];

        assert_eq!(timing_point_at(&points, -50.0).map(|p| p.beat_len), Some(500.0));
        assert_eq!(timing_point_at(&points, 999.0).map(|p| p.beat_len), Some(500.0));
        assert_eq!(timing_point_at(&points, 1000.0).map(|p| p.beat_len), Some(250.0));
        assert_eq!(timing_point_at(&points, 5000.0).map(|p| p.beat_len), Some(250.0));
        assert!(timing_point_at(&[], 0.0).is_none());
    }

    #[test]
    fn clamped_beat_len() {
        assert_eq!(TimingPoint::new(0.0, 1.0).beat_len, 6.0);
        assert!((TimingPoint::new(0.0, 300.0).bpm() - 200.0).abs() < 1e-12);
    }
}
