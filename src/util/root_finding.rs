/// Settings for [`find_root_expand`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RootFinding {
    pub accuracy: f64,
    pub max_iterations: usize,
    pub expand_factor: f64,
    pub max_expansions: usize,
}

impl RootFinding {
    pub const DEFAULT: Self = Self {
        accuracy: 1e-4,
        max_iterations: 100,
        expand_factor: 1.6,
        max_expansions: 50,
    };
}

impl Default for RootFinding {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Finds a root of `f` inside `[lower, upper]` through bisection.
///
/// If `f(lower)` and `f(upper)` share a sign, the bracket is widened on the
/// side with the smaller absolute value until the signs differ. Returns
/// `None` if no sign change could be found.
pub fn find_root_expand<F>(mut f: F, lower: f64, upper: f64, settings: RootFinding) -> Option<f64>
where
    F: FnMut(f64) -> f64,
{
    let (mut lower, mut upper) = if lower <= upper {
        (lower, upper)
    } else {
        (upper, lower)
    };

    let mut f_lower = f(lower);
    let mut f_upper = f(upper);
    let mut expansions = 0;

    while same_sign(f_lower, f_upper) {
        if expansions >= settings.max_expansions {
            tracing::trace!(lower, upper, "root finding failed to bracket a sign change");

            return None;
        }

        let width = upper - lower;

        if f_lower.abs() < f_upper.abs() {
            lower -= settings.expand_factor * width;
            f_lower = f(lower);
        } else {
            upper += settings.expand_factor * width;
            f_upper = f(upper);
        }

        expansions += 1;
    }

    if f_lower == 0.0 {
        return Some(lower);
    } else if f_upper == 0.0 {
        return Some(upper);
    }

    for _ in 0..settings.max_iterations {
        let mid = lower + (upper - lower) / 2.0;

        if upper - lower <= settings.accuracy {
            return Some(mid);
        }

        let f_mid = f(mid);

        if f_mid == 0.0 {
            return Some(mid);
        } else if same_sign(f_mid, f_lower) {
            lower = mid;
            f_lower = f_mid;
        } else {
            upper = mid;
        }
    }

    Some(lower + (upper - lower) / 2.0)
}

fn same_sign(a: f64, b: f64) -> bool {
    a != 0.0 && b != 0.0 && (a.is_sign_negative() == b.is_sign_negative())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracketed_root() {
        let root = find_root_expand(|x| x * x - 2.0, 0.0, 2.0, RootFinding::DEFAULT).unwrap();
        assert!((root - 2.0_f64.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn expands_bracket() {
        let root = find_root_expand(|x| x - 50.0, 0.0, 1.0, RootFinding::DEFAULT).unwrap();
        assert!((root - 50.0).abs() < 1e-4);

        let root = find_root_expand(|x| x + 7.5, 0.0, 1.0, RootFinding::DEFAULT).unwrap();
        assert!((root + 7.5).abs() < 1e-4);
    }

    #[test]
    fn infinite_side_is_fine() {
        let f = |x: f64| if x <= 0.0 { f64::INFINITY } else { 1.0 / x - 4.0 };
        let root = find_root_expand(f, 0.0, 1.0, RootFinding::DEFAULT).unwrap();
        assert!((root - 0.25).abs() < 1e-4);
    }

    #[test]
    fn no_sign_change() {
        let settings = RootFinding {
            max_expansions: 5,
            ..RootFinding::DEFAULT
        };

        assert!(find_root_expand(|x| x * x + 1.0, -1.0, 1.0, settings).is_none());
    }
}
