use crate::any::{difficulty::cursor::NORMALIZED_RADIUS, object::PlayObject};

const BROKEN_GAMEFIELD_ROUNDING_ALLOWANCE: f32 = 1.00041;

/// Fields around the scaling of hit objects.
///
/// All objects of a map share the same scaling so it is only stored once.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScalingFactor {
    /// `NORMALIZED_RADIUS / radius` and then adjusted if `radius < 30`
    pub factor: f32,
    pub radius: f64,
    pub scale: f32,
}

impl ScalingFactor {
    pub fn new(cs: f64) -> Self {
        let scale = (f64::from(1.0_f32) - f64::from(0.7_f32) * ((cs - 5.0) / 5.0)) as f32 / 2.0
            * BROKEN_GAMEFIELD_ROUNDING_ALLOWANCE;

        let radius = f64::from(PlayObject::OBJECT_RADIUS * scale);
        let factor = NORMALIZED_RADIUS / radius as f32;

        let factor_with_small_circle_bonus = if radius < 30.0 {
            factor * (1.0 + (30.0 - radius as f32).min(5.0) / 50.0)
        } else {
            factor
        };

        Self {
            factor: factor_with_small_circle_bonus,
            radius,
            scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cs_five() {
        let scaling = ScalingFactor::new(5.0);

        assert!((scaling.radius - 32.013_12).abs() < 1e-3, "{}", scaling.radius);
        assert!((f64::from(scaling.factor) - 50.0 / scaling.radius).abs() < 1e-4);
    }

    #[test]
    fn small_circle_bonus() {
        let scaling = ScalingFactor::new(7.0);
        let unadjusted = f64::from(NORMALIZED_RADIUS) / scaling.radius;

        assert!(scaling.radius < 30.0);
        assert!(f64::from(scaling.factor) > unadjusted);
    }
}
