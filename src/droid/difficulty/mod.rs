use std::cmp;

use crate::{
    any::{
        difficulty::{
            cursor::SliderCursorCache,
            skills::{difficulty_to_performance, StrainSkill},
            Difficulty,
        },
        object::{convert_objects, time_fade_in, ObjectCounts, PlayObject},
    },
    droid::attributes::{DifficultSlider, DroidDifficultyAttributes},
    model::{beatmap::Beatmap, mode::Ruleset, mods::GameMods},
};

use self::{
    object::{compute_visuals, DroidDifficultyObject, DroidObjectSettings},
    scaling_factor::DroidScalingFactor,
    skills::{
        flashlight::DroidFlashlight, rhythm::DroidRhythm, visual::DroidVisual, DroidSkills,
    },
    three_finger::possible_three_fingered_sections,
    touch::effective_strain_times,
};

pub mod evaluators;
pub mod object;
pub mod scaling_factor;
pub mod skills;
pub mod three_finger;
pub mod touch;

const DIFFICULTY_MULTIPLIER: f64 = 0.0675;

/// Share of sliders that count as difficult.
const DIFFICULT_SLIDER_SHARE: f64 = 0.15;

pub fn difficulty(difficulty: &Difficulty, map: &Beatmap) -> DroidDifficultyAttributes {
    let DifficultyValues {
        skills,
        rhythm,
        mut attrs,
    } = DifficultyValues::calculate(difficulty, map);

    if attrs.n_objects() == 0 {
        return attrs;
    }

    let DroidSkills {
        aim,
        aim_no_sliders,
        tap,
        tap_no_cheese,
        flashlight,
        flashlight_no_sliders,
        visual,
        visual_no_sliders,
        reading,
    } = skills;

    let values = SkillValues {
        aim: aim.difficulty_value(),
        aim_no_sliders: aim_no_sliders.difficulty_value(),
        tap: tap.difficulty_value(),
        tap_no_cheese: tap_no_cheese.difficulty_value(),
        rhythm: rhythm.difficulty_value(),
        flashlight: flashlight.difficulty_value(),
        flashlight_no_sliders: flashlight_no_sliders.difficulty_value(),
        visual: visual.difficulty_value(),
        visual_no_sliders: visual_no_sliders.difficulty_value(),
        reading: reading.difficulty_value(),
    };

    attrs.speed_note_count = tap.relevant_note_count();
    attrs.average_speed_delta_time = tap.relevant_delta_time();

    attrs.aim_difficult_strain_count = aim.count_difficult_strains();
    attrs.tap_difficult_strain_count = tap.count_difficult_strains();
    attrs.flashlight_difficult_strain_count = flashlight.count_difficult_strains();
    attrs.visual_difficult_strain_count = visual.count_difficult_strains();

    attrs.aim_difficult_sliders = difficult_sliders(aim.slider_strains());
    attrs.flashlight_difficult_sliders = difficult_sliders(flashlight.slider_strains());

    let start_times: Vec<_> = tap.start_times().collect();

    // The first hit object is never processed
    attrs.possible_three_fingered_sections = possible_three_fingered_sections(
        &start_times,
        tap.delta_times(),
        tap.object_strains(),
        1,
    );

    attrs.aim_miss_penalty_curve = aim.miss_penalty_curve();
    attrs.tap_miss_penalty_curve = tap.miss_penalty_curve();

    DifficultyValues::eval(&mut attrs, &difficulty.get_mods(), &values);

    tracing::debug!(
        stars = attrs.stars,
        aim = attrs.aim,
        tap = attrs.tap,
        rhythm = attrs.rhythm,
        flashlight = attrs.flashlight,
        visual = attrs.visual,
        reading = attrs.reading,
        vibro_factor = attrs.vibro_factor,
        three_fingered_sections = attrs.possible_three_fingered_sections.len(),
        max_combo = attrs.max_combo,
        "Calculated osu!droid difficulty"
    );

    attrs
}

/// Difficulty values of all skills, i.e. before they're turned into ratings.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SkillValues {
    pub aim: f64,
    pub aim_no_sliders: f64,
    pub tap: f64,
    pub tap_no_cheese: f64,
    pub rhythm: f64,
    pub flashlight: f64,
    pub flashlight_no_sliders: f64,
    pub visual: f64,
    pub visual_no_sliders: f64,
    pub reading: f64,
}

pub struct DifficultyValues {
    pub skills: DroidSkills,
    pub rhythm: DroidRhythm,
    pub attrs: DroidDifficultyAttributes,
}

impl DifficultyValues {
    pub fn calculate(difficulty: &Difficulty, map: &Beatmap) -> Self {
        let mods = difficulty.get_mods();
        let take = difficulty.get_passed_objects();
        let clock_rate = difficulty.get_clock_rate();

        let map_attrs = difficulty.map_attributes(map, Ruleset::Droid);
        let scaling_factor = DroidScalingFactor::new(map_attrs.cs);

        // Preempt without clock rate, truncated like the game does
        let time_preempt = f64::from((map_attrs.hit_windows.ar * clock_rate) as f32);

        let objects = convert_objects(map, mods.hr(), scaling_factor.scale, time_preempt);

        let ObjectCounts {
            n_circles,
            n_sliders,
            n_spinners,
            max_combo,
        } = ObjectCounts::new(&objects, take);

        let attrs = DroidDifficultyAttributes {
            mods,
            ar: map_attrs.ar,
            od: map_attrs.od,
            hp: map_attrs.hp,
            clock_rate,
            great_hit_window: map_attrs.hit_windows.od_great,
            ok_hit_window: map_attrs.hit_windows.od_ok,
            meh_hit_window: map_attrs.hit_windows.od_meh,
            n_circles,
            n_sliders,
            n_spinners,
            max_combo,
            vibro_factor: 1.0,
            aim_slider_factor: 1.0,
            flashlight_slider_factor: 1.0,
            visual_slider_factor: 1.0,
            ..Default::default()
        };

        let settings = DroidObjectSettings {
            clock_rate,
            scaling_factor,
            time_preempt,
            time_fade_in: time_fade_in(time_preempt, mods.hd()),
            great_window: 2.0 * map_attrs.hit_windows.od_great,
            hidden: mods.hd(),
        };

        let diff_objects = Self::create_difficulty_objects(&objects, &settings);

        // The first object only serves as reference for the second one
        let take_diff_objects = cmp::min(objects.len(), take);
        let processed = || diff_objects.iter().take(take_diff_objects).skip(1);

        // Tap and visual depend on the rhythm of each object
        let mut rhythm = DroidRhythm::new(diff_objects.len());

        for hit_object in processed() {
            rhythm.process(hit_object, &diff_objects);
        }

        let mut skills = DroidSkills::new(
            &mods,
            scaling_factor.radius,
            effective_strain_times(&diff_objects),
            rhythm.multipliers().to_vec(),
        );

        for hit_object in processed() {
            skills.process(hit_object, &diff_objects);
        }

        Self {
            skills,
            rhythm,
            attrs,
        }
    }

    /// Process the difficulty values and store the results in `attrs`.
    pub fn eval(attrs: &mut DroidDifficultyAttributes, mods: &GameMods, values: &SkillValues) {
        let rating = |difficulty_value: f64| difficulty_value.sqrt() * DIFFICULTY_MULTIPLIER;

        let mut aim_rating = rating(values.aim);
        let mut tap_rating = rating(values.tap);
        let mut flashlight_rating = rating(values.flashlight);
        let mut visual_rating = rating(values.visual);

        let slider_factor = |with_sliders: f64, without_sliders: f64| {
            if with_sliders > 0.0 {
                rating(without_sliders) / rating(with_sliders)
            } else {
                1.0
            }
        };

        attrs.aim_slider_factor = slider_factor(values.aim, values.aim_no_sliders);
        attrs.flashlight_slider_factor =
            slider_factor(values.flashlight, values.flashlight_no_sliders);
        attrs.visual_slider_factor = slider_factor(values.visual, values.visual_no_sliders);

        let tap_no_cheese_rating = rating(values.tap_no_cheese);

        attrs.vibro_factor = if tap_no_cheese_rating > 0.0 {
            (tap_rating / tap_no_cheese_rating).min(1.0)
        } else {
            1.0
        };

        if mods.rx() {
            aim_rating *= 0.9;
            tap_rating = 0.0;
            flashlight_rating *= 0.7;
            visual_rating *= 0.7;
        }

        let base_aim_performance = difficulty_to_performance(aim_rating);
        let base_tap_performance = difficulty_to_performance(tap_rating);

        let base_flashlight_performance = if mods.fl() {
            DroidFlashlight::difficulty_to_performance(flashlight_rating)
        } else {
            0.0
        };

        let base_visual_performance = DroidVisual::difficulty_to_performance(visual_rating);

        let base_performance = (base_aim_performance.powf(1.1)
            + base_tap_performance.powf(1.1)
            + base_flashlight_performance.powf(1.1)
            + base_visual_performance.powf(1.1))
        .powf(1.0 / 1.1);

        let star_rating = if base_performance > 0.00001 {
            0.027 * ((100_000.0 / 2.0_f64.powf(1.0 / 1.1) * base_performance).cbrt() + 4.0)
        } else {
            0.0
        };

        attrs.aim = aim_rating;
        attrs.tap = tap_rating;
        attrs.rhythm = rating(values.rhythm);
        attrs.flashlight = flashlight_rating;
        attrs.visual = visual_rating;
        attrs.reading = rating(values.reading);
        attrs.stars = star_rating;
    }

    pub fn create_difficulty_objects<'a>(
        objects: &'a [PlayObject],
        settings: &DroidObjectSettings,
    ) -> Vec<DroidDifficultyObject<'a>> {
        let cursors = SliderCursorCache::new(objects, settings.scaling_factor.radius);

        let mut diff_objects: Vec<_> = (0..objects.len())
            .map(|obj_idx| DroidDifficultyObject::new(objects, obj_idx, &cursors, settings))
            .collect();

        compute_visuals(&mut diff_objects, settings.hidden);

        diff_objects
    }
}

/// The most difficult sliders among `slider_strains`, i.e. pairs of object
/// index and strain.
///
/// Each slider is rated by its share of the summed strain and only the top
/// share of sliders is kept.
pub fn difficult_sliders(slider_strains: &[(usize, f64)]) -> Vec<DifficultSlider> {
    let total: f64 = slider_strains.iter().map(|(_, strain)| strain).sum();

    if total <= 0.0 {
        return Vec::new();
    }

    let mut sliders: Vec<_> = slider_strains
        .iter()
        .map(|&(index, strain)| DifficultSlider {
            index,
            difficulty_rating: strain / total,
        })
        .collect();

    sliders.sort_by(|a, b| b.difficulty_rating.total_cmp(&a.difficulty_rating));

    let count = (sliders.len() as f64 * DIFFICULT_SLIDER_SHARE).ceil() as usize;
    sliders.truncate(count);

    sliders
}
