use crate::any::{difficulty::cursor::NORMALIZED_RADIUS, object::PlayObject};

/// Ratio between osu!droid's playfield height in pixels and osu!standard's.
const DROID_TO_OSU_SCALE: f32 = 384.0 / (681.0 * 0.85);

/// Fields around the scaling of hit objects on osu!droid.
///
/// Circles on a phone screen are sized differently than on desktop so the
/// radius is derived from osu!droid's own playfield scale first and then
/// converted to osu!pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DroidScalingFactor {
    /// `NORMALIZED_RADIUS / radius` and then adjusted if `radius < 40`
    pub factor: f32,
    pub radius: f64,
    /// Object scale in osu!pixels.
    pub scale: f32,
}

impl DroidScalingFactor {
    pub fn new(cs: f64) -> Self {
        let droid_scale = ((681.0 / 480.0) * (54.42 - 4.48 * cs) * 2.0 / 128.0).max(1e-3) as f32;
        let scale = droid_scale * DROID_TO_OSU_SCALE;

        let radius = f64::from(PlayObject::OBJECT_RADIUS * scale);
        let factor = NORMALIZED_RADIUS / radius as f32;

        let factor_with_small_circle_bonus = if radius < 40.0 {
            let diff = (40.0 - radius as f32).min(20.0);

            factor * (1.0 + diff * diff / 1600.0)
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
    fn cs_four() {
        let scaling = DroidScalingFactor::new(4.0);

        assert!((scaling.radius - 34.35).abs() < 0.01, "{}", scaling.radius);

        let unadjusted = 50.0 / scaling.radius;
        let diff = 40.0 - scaling.radius;
        let expected = unadjusted * (1.0 + diff * diff / 1600.0);

        assert!((f64::from(scaling.factor) - expected).abs() < 1e-3);
    }

    #[test]
    fn bonus_is_capped() {
        let huge_cs = DroidScalingFactor::new(11.0);
        let unadjusted = 50.0 / huge_cs.radius;

        assert!(huge_cs.radius < 20.0);
        assert!((f64::from(huge_cs.factor) - unadjusted * 1.25).abs() < 1e-3);
    }

    #[test]
    fn scale_never_vanishes() {
        let scaling = DroidScalingFactor::new(20.0);

        assert!(scaling.scale > 0.0);
        assert!(scaling.factor.is_finite());
    }
}
