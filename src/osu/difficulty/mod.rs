use std::cmp;

use crate::{
    any::{
        difficulty::{cursor::SliderCursorCache, Difficulty},
        object::{convert_objects, ObjectCounts, PlayObject},
    },
    model::{beatmap::Beatmap, mode::Ruleset, mods::GameMods},
    osu::{attributes::OsuDifficultyAttributes, performance::PERFORMANCE_BASE_MULTIPLIER},
};

use self::{object::OsuDifficultyObject, scaling_factor::ScalingFactor, skills::OsuSkills};

pub mod evaluators;
pub mod object;
pub mod scaling_factor;
pub mod skills;

const DIFFICULTY_MULTIPLIER: f64 = 0.0675;

pub fn difficulty(difficulty: &Difficulty, map: &Beatmap) -> OsuDifficultyAttributes {
    let DifficultyValues {
        skills:
            OsuSkills {
                aim,
                aim_no_sliders,
                speed,
                flashlight,
            },
        mut attrs,
    } = DifficultyValues::calculate(difficulty, map);

    if attrs.n_objects() == 0 {
        return attrs;
    }

    let aim_difficulty_value = aim.difficulty_value();
    let aim_no_sliders_difficulty_value = aim_no_sliders.difficulty_value();
    let speed_relevant_note_count = speed.relevant_note_count();
    let speed_difficulty_value = speed.difficulty_value();
    let flashlight_difficulty_value = flashlight.difficulty_value();

    attrs.aim_difficult_slider_count = aim.difficult_slider_count();
    attrs.aim_difficult_strain_count = aim.count_top_weighted_strains(aim_difficulty_value);
    attrs.speed_difficult_strain_count = speed.count_top_weighted_strains(speed_difficulty_value);

    DifficultyValues::eval(
        &mut attrs,
        &difficulty.get_mods(),
        aim_difficulty_value,
        aim_no_sliders_difficulty_value,
        speed_difficulty_value,
        speed_relevant_note_count,
        flashlight_difficulty_value,
    );

    tracing::debug!(
        stars = attrs.stars,
        aim = attrs.aim,
        speed = attrs.speed,
        flashlight = attrs.flashlight,
        max_combo = attrs.max_combo,
        "Calculated osu!standard difficulty"
    );

    attrs
}

pub struct DifficultyValues {
    pub skills: OsuSkills,
    pub attrs: OsuDifficultyAttributes,
}

impl DifficultyValues {
    pub fn calculate(difficulty: &Difficulty, map: &Beatmap) -> Self {
        let mods = difficulty.get_mods();
        let take = difficulty.get_passed_objects();
        let clock_rate = difficulty.get_clock_rate();

        let map_attrs = difficulty.map_attributes(map, Ruleset::Osu);
        let scaling_factor = ScalingFactor::new(map_attrs.cs);

        // Preempt without clock rate, truncated like the game does
        let time_preempt = f64::from((map_attrs.hit_windows.ar * clock_rate) as f32);

        let objects = convert_objects(map, mods.hr(), scaling_factor.scale, time_preempt);

        let ObjectCounts {
            n_circles,
            n_sliders,
            n_spinners,
            max_combo,
        } = ObjectCounts::new(&objects, take);

        let attrs = OsuDifficultyAttributes {
            ar: map_attrs.ar,
            od: map_attrs.od,
            hp: map_attrs.hp,
            great_hit_window: map_attrs.hit_windows.od_great,
            ok_hit_window: map_attrs.hit_windows.od_ok,
            meh_hit_window: map_attrs.hit_windows.od_meh,
            n_circles,
            n_sliders,
            n_spinners,
            max_combo,
            ..Default::default()
        };

        let mut skills = OsuSkills::new(&mods, &scaling_factor, &map_attrs, time_preempt);

        let diff_objects =
            Self::create_difficulty_objects(&objects, &scaling_factor, clock_rate);

        // The first hit object has no difficulty object
        let take_diff_objects = cmp::min(objects.len(), take).saturating_sub(1);

        for hit_object in diff_objects.iter().take(take_diff_objects) {
            skills.process(hit_object, &diff_objects);
        }

        Self { skills, attrs }
    }

    /// Process the difficulty values and store the results in `attrs`.
    pub fn eval(
        attrs: &mut OsuDifficultyAttributes,
        mods: &GameMods,
        aim_difficulty_value: f64,
        aim_no_sliders_difficulty_value: f64,
        speed_difficulty_value: f64,
        speed_relevant_note_count: f64,
        flashlight_difficulty_value: f64,
    ) {
        let mut aim_rating = aim_difficulty_value.sqrt() * DIFFICULTY_MULTIPLIER;
        let aim_rating_no_sliders = aim_no_sliders_difficulty_value.sqrt() * DIFFICULTY_MULTIPLIER;
        let mut speed_rating = speed_difficulty_value.sqrt() * DIFFICULTY_MULTIPLIER;
        let mut flashlight_rating = flashlight_difficulty_value.sqrt() * DIFFICULTY_MULTIPLIER;

        let slider_factor = if aim_rating > 0.0 {
            aim_rating_no_sliders / aim_rating
        } else {
            1.0
        };

        if mods.td() {
            aim_rating = aim_rating.powf(0.8);
            flashlight_rating = flashlight_rating.powf(0.8);
        }

        if mods.rx() {
            aim_rating *= 0.9;
            speed_rating = 0.0;
            flashlight_rating *= 0.7;
        }

        let base_aim_performance = (5.0 * (aim_rating / 0.0675).max(1.0) - 4.0).powi(3) / 100_000.0;
        let base_speed_performance =
            (5.0 * (speed_rating / 0.0675).max(1.0) - 4.0).powi(3) / 100_000.0;

        let base_flashlight_performance = if mods.fl() {
            flashlight_rating.powi(2) * 25.0
        } else {
            0.0
        };

        let base_performance = ((base_aim_performance).powf(1.1)
            + (base_speed_performance).powf(1.1)
            + (base_flashlight_performance).powf(1.1))
        .powf(1.0 / 1.1);

        let star_rating = if base_performance > 0.00001 {
            PERFORMANCE_BASE_MULTIPLIER.cbrt()
                * 0.027
                * ((100_000.0 / 2.0_f64.powf(1.0 / 1.1) * base_performance).cbrt() + 4.0)
        } else {
            0.0
        };

        attrs.aim = aim_rating;
        attrs.speed = speed_rating;
        attrs.flashlight = flashlight_rating;
        attrs.slider_factor = slider_factor;
        attrs.stars = star_rating;
        attrs.speed_note_count = speed_relevant_note_count;
    }

    pub fn create_difficulty_objects<'a>(
        objects: &'a [PlayObject],
        scaling_factor: &ScalingFactor,
        clock_rate: f64,
    ) -> Vec<OsuDifficultyObject<'a>> {
        let cursors = SliderCursorCache::new(objects, scaling_factor.radius);

        (1..objects.len())
            .map(|obj_idx| {
                OsuDifficultyObject::new(objects, obj_idx, &cursors, clock_rate, scaling_factor)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::model::hit_object::{HitObject, HitObjectKind, Pos};

    use super::*;

    fn jumps(n: usize, spacing_ms: f64) -> Beatmap {
        let hit_objects = (0..n)
            .map(|i| HitObject {
                pos: if i % 2 == 0 {
                    Pos::new(64.0, 192.0)
                } else {
                    Pos::new(448.0, 192.0)
                },
                start_time: 1000.0 + i as f64 * spacing_ms,
                kind: HitObjectKind::Circle,
            })
            .collect();

        Beatmap {
            hit_objects,
            ..Default::default()
        }
    }

    #[test]
    fn empty_map() {
        let attrs = difficulty(&Difficulty::new(), &Beatmap::default());

        assert_eq!(attrs.stars, 0.0);
        assert_eq!(attrs.max_combo, 0);
    }

    #[test]
    fn jumps_have_aim() {
        let attrs = difficulty(&Difficulty::new(), &jumps(64, 250.0));

        assert!(attrs.aim > attrs.speed, "{attrs:?}");
        assert!(attrs.stars > 0.0);
        assert_eq!(attrs.n_circles, 64);
        assert_eq!(attrs.max_combo, 64);
        assert!((attrs.slider_factor - 1.0).abs() < 1e-12);
    }

    #[test]
    fn passed_objects_limit_counts() {
        let map = jumps(64, 250.0);
        let full = difficulty(&Difficulty::new(), &map);
        let partial = difficulty(&Difficulty::new().passed_objects(10), &map);

        assert_eq!(partial.n_circles, 10);
        assert!(partial.stars <= full.stars);
    }

    #[test]
    fn relax_removes_speed() {
        let attrs = difficulty(&Difficulty::new().mods(128), &jumps(64, 150.0));

        assert_eq!(attrs.speed, 0.0);
    }
}
