use std::f64::consts::{PI, SQRT_2};

use crate::util::{
    float_ext::FloatExt,
    special_functions::{erf, erf_inv},
};

/// 99% critical value of the one-tailed normal distribution.
#[allow(clippy::unreadable_literal)]
const Z: f64 = 2.32634787404;

/// Clock rate adjusted hit windows in milliseconds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct JudgementWindows {
    pub great: f64,
    pub ok: f64,
    pub meh: f64,
}

/// Judgements on a subset of a map's objects.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct RelevantHits {
    pub great: f64,
    pub ok: f64,
    pub meh: f64,
    pub miss: f64,
}

impl RelevantHits {
    /// Distribute the judgements of a play onto `object_count` objects,
    /// assuming the worst case i.e. every mistake happened on them.
    pub fn worst_case(n100: u32, n50: u32, misses: u32, object_count: f64) -> Self {
        let miss = f64::min(f64::from(misses), object_count);
        let meh = f64::min(f64::from(n50), object_count - miss);
        let ok = f64::min(f64::from(n100), object_count - miss - meh);
        let great = f64::max(0.0, object_count - miss - meh - ok);

        Self {
            great,
            ok,
            meh,
            miss,
        }
    }

    /// Estimate the deviation of the hits in milliseconds.
    ///
    /// Greats and oks are assumed to be normally distributed and mehs
    /// uniformly. The result is an upper bound with 99% confidence, or
    /// `None` if nothing was hit.
    pub fn deviation(&self, windows: &JudgementWindows) -> Option<f64> {
        let Self {
            great,
            ok,
            meh,
            miss,
        } = *self;

        if great + ok + meh <= 0.0 {
            return None;
        }

        let object_count = great + ok + meh + miss;

        // Share of greats among circles plus one as bias correction
        let n = f64::max(1.0, object_count - miss - meh);
        let p = great / n;

        let p_lower_bound = (n * p + Z * Z / 2.0) / (n + Z * Z)
            - Z / (n + Z * Z) * f64::sqrt(n * p * (1.0 - p) + Z * Z / 4.0);

        let mut deviation = windows.great / (SQRT_2 * erf_inv(p_lower_bound));

        let random_value = f64::sqrt(2.0 / PI)
            * windows.ok
            * f64::exp(-0.5 * f64::powf(windows.ok / deviation, 2.0))
            / (deviation * erf(windows.ok / (SQRT_2 * deviation)));

        deviation *= f64::sqrt(1.0 - random_value);

        // Deviation as the amount of greats approaches 0
        let limit_value = windows.ok / f64::sqrt(3.0);

        if FloatExt::eq(p_lower_bound, 0.0)
            || random_value >= 1.0
            || deviation > limit_value
            || deviation.is_nan()
        {
            deviation = limit_value;
        }

        let meh_variance =
            (windows.meh * windows.meh + windows.ok * windows.meh + windows.ok * windows.ok) / 3.0;

        let deviation = f64::sqrt(
            ((great + ok) * f64::powf(deviation, 2.0) + meh * meh_variance) / (great + ok + meh),
        );

        Some(deviation)
    }
}

/// Probability that a hit with the given deviation lands within `window`.
pub(crate) fn window_scaling(window: f64, deviation: f64) -> f64 {
    if deviation.is_infinite() || window <= 0.0 {
        0.0
    } else if deviation <= 0.0 {
        1.0
    } else {
        erf(window / (SQRT_2 * deviation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOWS: JudgementWindows = JudgementWindows {
        great: 60.0,
        ok: 120.0,
        meh: 280.0,
    };

    fn hits(great: f64, ok: f64, meh: f64, miss: f64) -> RelevantHits {
        RelevantHits {
            great,
            ok,
            meh,
            miss,
        }
    }

    #[test]
    fn worst_case_distribution() {
        let relevant = RelevantHits::worst_case(30, 10, 5, 40.0);

        assert_eq!(relevant, hits(0.0, 25.0, 10.0, 5.0));

        let relevant = RelevantHits::worst_case(3, 2, 1, 100.0);

        assert_eq!(relevant, hits(94.0, 3.0, 2.0, 1.0));
    }

    #[test]
    fn deviation_grows_with_mistakes() {
        let clean = hits(500.0, 0.0, 0.0, 0.0).deviation(&WINDOWS).unwrap();
        let sloppy = hits(400.0, 80.0, 20.0, 0.0).deviation(&WINDOWS).unwrap();

        assert!(clean.is_finite() && clean > 0.0);
        assert!(sloppy > clean, "{sloppy} vs {clean}");
    }

    #[test]
    fn no_hits_have_no_deviation() {
        assert!(hits(0.0, 0.0, 0.0, 10.0).deviation(&WINDOWS).is_none());
    }

    #[test]
    fn deviation_is_capped_without_greats() {
        let deviation = hits(0.0, 50.0, 0.0, 0.0).deviation(&WINDOWS).unwrap();

        assert!((deviation - WINDOWS.ok / f64::sqrt(3.0)).abs() < 1e-9);
    }

    #[test]
    fn window_scaling_bounds() {
        assert!((window_scaling(60.0, 0.0) - 1.0).abs() < f64::EPSILON);
        assert_eq!(window_scaling(120.0, f64::INFINITY), 0.0);

        let tight = window_scaling(60.0, 10.0);
        let loose = window_scaling(60.0, 40.0);

        assert!(tight > loose);
        assert!(tight <= 1.0 && loose > 0.0);
    }
}
