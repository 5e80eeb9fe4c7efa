pub const fn bpm_to_milliseconds(bpm: f64, delimiter: Option<i32>) -> f64 {
    60_000.0 / i32_unwrap_or(delimiter, 4) as f64 / bpm
}

pub const fn milliseconds_to_bpm(ms: f64, delimiter: Option<i32>) -> f64 {
    60_000.0 / (ms * i32_unwrap_or(delimiter, 4) as f64)
}

// `Option::unwrap_or` is not const
const fn i32_unwrap_or(option: Option<i32>, default: i32) -> i32 {
    match option {
        Some(value) => value,
        None => default,
    }
}

// `f64::exp` is not const
pub fn logistic(x: f64, midpoint_offset: f64, multiplier: f64, max_value: Option<f64>) -> f64 {
    max_value.unwrap_or(1.0) / (1.0 + f64::exp(multiplier * (midpoint_offset - x)))
}

pub const fn lerp(start: f64, end: f64, amount: f64) -> f64 {
    start + (end - start) * amount
}

/// Position of `x` between `start` and `end`, clamped to `[0, 1]`.
pub fn reverse_lerp(x: f64, start: f64, end: f64) -> f64 {
    if (end - start).abs() < f64::EPSILON {
        return if x < start { 0.0 } else { 1.0 };
    }

    ((x - start) / (end - start)).clamp(0.0, 1.0)
}

pub fn smoothstep(x: f64, start: f64, end: f64) -> f64 {
    let x = reverse_lerp(x, start, end);

    x * x * (3.0 - 2.0 * x)
}

pub fn smootherstep(x: f64, start: f64, end: f64) -> f64 {
    let x = reverse_lerp(x, start, end);

    x * x * x * (x * (6.0 * x - 15.0) + 10.0)
}

pub fn strain_decay(ms: f64, strain_decay_base: f64) -> f64 {
    f64::powf(strain_decay_base, ms / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bpm_conversion() {
        assert!((bpm_to_milliseconds(200.0, None) - 75.0).abs() < 1e-12);
        assert!((milliseconds_to_bpm(75.0, None) - 200.0).abs() < 1e-12);
        assert!((milliseconds_to_bpm(150.0, Some(2)) - 200.0).abs() < 1e-12);
    }

    #[test]
    fn steps_are_clamped() {
        assert_eq!(smoothstep(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(smoothstep(2.0, 0.0, 1.0), 1.0);
        assert!((smoothstep(0.5, 0.0, 1.0) - 0.5).abs() < 1e-12);
        assert!((smootherstep(0.5, 0.0, 1.0) - 0.5).abs() < 1e-12);
        assert_eq!(smootherstep(5.0, 10.0, 0.0), 1.0);
    }

    #[test]
    fn degenerate_reverse_lerp() {
        assert_eq!(reverse_lerp(0.5, 1.0, 1.0), 0.0);
        assert_eq!(reverse_lerp(1.5, 1.0, 1.0), 1.0);
    }
}
