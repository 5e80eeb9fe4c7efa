use std::f64::consts::{PI, SQRT_2};

const TWO_OVER_SQRT_PI: f64 = 1.128_379_167_095_512_6;

/// Below this value `erf` is evaluated through its Maclaurin series, above it
/// through the continued fraction of `erfc`.
const SERIES_THRESHOLD: f64 = 2.5;

/// The error function.
pub fn erf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    } else if x.is_infinite() {
        return x.signum();
    }

    let abs = x.abs();

    let value = if abs < SERIES_THRESHOLD {
        erf_series(abs)
    } else {
        1.0 - erfc_continued_fraction(abs)
    };

    value.copysign(x)
}

/// The complementary error function `1 - erf(x)`.
pub fn erfc(x: f64) -> f64 {
    if x.is_nan() {
        f64::NAN
    } else if x >= SERIES_THRESHOLD {
        erfc_continued_fraction(x)
    } else {
        1.0 - erf(x)
    }
}

fn erf_series(x: f64) -> f64 {
    let x2 = x * x;
    let mut term = x;
    let mut sum = x;

    for n in 1..200 {
        term *= -x2 / f64::from(n);
        let add = term / f64::from(2 * n + 1);
        sum += add;

        if add.abs() < 1e-17 * sum.abs() {
            break;
        }
    }

    TWO_OVER_SQRT_PI * sum
}

fn erfc_continued_fraction(x: f64) -> f64 {
    // Evaluated bottom-up: x + (1/2) / (x + 1 / (x + (3/2) / (x + ...)))
    let mut t = x;

    for n in (1..=60).rev() {
        t = x + f64::from(n) / 2.0 / t;
    }

    (-x * x).exp() / (PI.sqrt() * t)
}

/// The inverse error function, defined on `[-1, 1]`.
///
/// Returns `±∞` at the boundaries and `NaN` outside of them.
pub fn erf_inv(z: f64) -> f64 {
    if z.is_nan() || z.abs() > 1.0 {
        return f64::NAN;
    } else if z <= -1.0 {
        return f64::NEG_INFINITY;
    } else if z >= 1.0 {
        return f64::INFINITY;
    } else if z == 0.0 {
        return 0.0;
    }

    // Initial guess by Winitzki's approximation, refined through Halley steps
    const A: f64 = 0.147;

    let ln = (1.0 - z * z).ln();
    let t = 2.0 / (PI * A) + ln / 2.0;
    let mut x = ((t * t - ln / A).sqrt() - t).sqrt().copysign(z);

    for _ in 0..4 {
        let err = erf(x) - z;
        let deriv = TWO_OVER_SQRT_PI * (-x * x).exp();

        if deriv == 0.0 {
            break;
        }

        let step = err / (deriv + x * err);
        x -= step;

        if step.abs() <= 1e-15 * x.abs() {
            break;
        }
    }

    x
}

/// Cumulative distribution function of the standard normal distribution.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Probability density function of the standard normal distribution.
pub fn normal_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, eps: f64) {
        assert!(
            (actual - expected).abs() < eps,
            "{actual} != {expected} (eps={eps})"
        );
    }

    #[test]
    fn erf_known_values() {
        assert_close(erf(0.0), 0.0, 1e-15);
        assert_close(erf(0.5), 0.520_499_877_813_046_5, 1e-13);
        assert_close(erf(1.0), 0.842_700_792_949_714_9, 1e-13);
        assert_close(erf(2.0), 0.995_322_265_018_952_7, 1e-13);
        assert_close(erf(3.0), 0.999_977_909_503_001_4, 1e-13);
        assert_close(erf(-1.0), -0.842_700_792_949_714_9, 1e-13);
        assert_close(erf(f64::INFINITY), 1.0, 0.0);
    }

    #[test]
    fn erfc_tail() {
        assert_close(erfc(3.0), 2.209_049_699_858_544e-5, 1e-15);
        assert_close(erfc(5.0), 1.537_459_794_428_035e-12, 1e-22);
    }

    #[test]
    fn erf_inv_inverts_erf() {
        for &z in &[-0.999, -0.7, -0.1, 0.01, 0.3, 0.5, 0.9, 0.99, 0.999_999] {
            assert_close(erf(erf_inv(z)), z, 1e-12);
        }

        assert_eq!(erf_inv(1.0), f64::INFINITY);
        assert_eq!(erf_inv(-1.0), f64::NEG_INFINITY);
        assert!(erf_inv(1.5).is_nan());
    }

    #[test]
    fn normal_distribution() {
        assert_close(normal_cdf(0.0), 0.5, 1e-15);
        assert_close(normal_cdf(1.959_963_984_540_054), 0.975, 1e-12);
        assert_close(normal_pdf(0.0), 0.398_942_280_401_432_7, 1e-15);
    }
}
