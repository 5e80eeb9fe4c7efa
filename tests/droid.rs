use droid_pp::{
    droid::{Droid, DroidDifficultyAttributes, DroidPerformance, DroidStrains},
    Beatmap, Difficulty,
};

use self::common::{mods::*, *};

mod common;

fn attrs(map: &Beatmap, mods: u32) -> DroidDifficultyAttributes {
    Difficulty::new()
        .mods(mods)
        .calculate_for_mode::<Droid>(map)
}

#[test]
fn deterministic() {
    init_logging();

    let map = mixed();

    for mods in [NM, HD, DT, HR + FL] {
        assert_eq!(attrs(&map, mods), attrs(&map, mods), "mods={mods}");
    }

    let strains = Difficulty::new().strains_for_mode::<Droid>(&map);
    assert_eq!(strains, Difficulty::new().strains_for_mode::<Droid>(&map));
}

#[test]
fn attributes_carry_mods() {
    let attrs = attrs(&stream(32, 120.0), HD + DT);

    assert_eq!(attrs.mods.to_string(), "HDDT");
    assert!((attrs.clock_rate - 1.5).abs() < f64::EPSILON);
}

#[test]
fn double_time_increases_tap() {
    let map = stream(200, 100.0);

    let nomod = attrs(&map, NM);
    let dt = attrs(&map, DT);

    assert!(nomod.tap > 0.0);
    assert!(dt.tap > nomod.tap, "{} vs {}", dt.tap, nomod.tap);
    assert!(dt.stars > nomod.stars);
}

#[test]
fn higher_approach_rate_keeps_reading_difficulty() {
    let map = sparse(64);

    let with_ar = |ar: f32| {
        Difficulty::new()
            .mods(FL)
            .ar(ar, false)
            .calculate_for_mode::<Droid>(&map)
    };

    let low = with_ar(9.0);
    let mid = with_ar(10.0);
    let high = with_ar(11.0);

    for (lower, higher) in [(&low, &mid), (&mid, &high)] {
        assert!(higher.flashlight >= lower.flashlight);
        assert!(higher.visual >= lower.visual);
        assert!(higher.reading >= lower.reading);
    }

    assert!(high.reading > low.reading);
}

#[test]
fn sliders_are_tracked() {
    let attrs = attrs(&mixed(), NM);

    assert_eq!(attrs.n_sliders, 16);
    assert_eq!(attrs.n_spinners, 1);
    assert!(attrs.max_combo > attrs.n_objects());
    assert!(attrs.aim_slider_factor > 0.0 && attrs.aim_slider_factor <= 1.0);
    assert!(!attrs.aim_difficult_sliders.is_empty());
    assert!(attrs.aim_difficult_sliders.len() <= 3);

    let share: f64 = attrs
        .aim_difficult_sliders
        .iter()
        .map(|slider| slider.difficulty_rating)
        .sum();

    assert!(share > 0.0 && share <= 1.0);
}

#[test]
fn fast_streams_may_be_three_fingered() {
    let slow = attrs(&stream(64, 300.0), NM);
    assert!(slow.possible_three_fingered_sections.is_empty());

    let fast = attrs(&stream(400, 45.0), DT);
    assert!(!fast.possible_three_fingered_sections.is_empty());

    for section in fast.possible_three_fingered_sections.iter() {
        assert!(section.last_object_index >= section.first_object_index + 4);
        assert!(section.sum_strain > 0.0);
    }
}

#[test]
fn slider_only_maps_keep_aim() {
    let attrs = attrs(&sliders(60), NM);

    assert_eq!(attrs.n_circles, 0);
    assert_eq!(attrs.n_sliders, 60);
    assert!(attrs.aim > 0.0);

    let perf = DroidPerformance::from(attrs).calculate();

    assert!(perf.deviation.is_finite(), "{}", perf.deviation);
    assert!(perf.pp_aim > 0.0);
    assert_eq!(perf.pp_acc, 0.0);
}

#[test]
fn strain_sections() {
    let map = stream(100, 100.0);
    let strains = Difficulty::new().strains_for_mode::<Droid>(&map);

    // Ten seconds of objects
    let expected = (10_000.0 / DroidStrains::SECTION_LEN) as usize;

    assert!(strains.tap.len().abs_diff(expected) <= 2, "{}", strains.tap.len());
    assert_eq!(strains.tap.len(), strains.aim.len());
    assert_eq!(strains.tap.len(), strains.visual.len());
}

#[test]
fn performance_from_map_matches_attributes() {
    let map = mixed();
    let diff_attrs = attrs(&map, HD);

    let from_map = DroidPerformance::new(&map).mods(HD).accuracy(98.0).calculate();
    let from_attrs = DroidPerformance::from(diff_attrs).accuracy(98.0).calculate();

    assert_eq!(from_map, from_attrs);
    assert!(from_map.pp > 0.0);
}

#[test]
fn penalty_reapplication_is_idempotent() {
    let mut perf = DroidPerformance::from(attrs(&stream(200, 90.0), NM))
        .accuracy(97.0)
        .misses(2)
        .calculate();

    perf.apply_tap_penalty(1.3).unwrap();
    let once = perf.pp;

    perf.apply_tap_penalty(1.3).unwrap();
    assert_eq!(perf.pp, once);

    perf.apply_aim_slider_cheese_penalty(0.8).unwrap();
    let cheesed = perf.pp;

    perf.apply_aim_slider_cheese_penalty(0.8).unwrap();
    assert_eq!(perf.pp, cheesed);
}

#[test]
fn invalid_penalty_is_rejected() {
    let mut perf = DroidPerformance::from(attrs(&stream(50, 120.0), NM)).calculate();
    let before = perf.clone();

    assert!(perf.apply_tap_penalty(0.0).is_err());
    assert!(perf.apply_flashlight_slider_cheese_penalty(2.0).is_err());
    assert_eq!(perf, before);

    assert!(DroidPerformance::from(attrs(&stream(50, 120.0), NM))
        .tap_penalty(-1.0)
        .is_err());
}

#[test]
fn all_misses() {
    let map = mixed();
    let n_objects = attrs(&map, HD + FL).n_objects();

    let perf = DroidPerformance::new(&map)
        .mods(HD + FL)
        .misses(n_objects)
        .calculate();

    assert!(perf.deviation.is_infinite());
    assert!(perf.tap_deviation.is_infinite());
    assert_eq!(perf.pp_acc, 0.0);

    for value in [
        perf.pp,
        perf.pp_aim,
        perf.pp_tap,
        perf.pp_flashlight,
        perf.pp_visual,
    ] {
        assert!(!value.is_nan());
    }
}

#[test]
fn empty_map() {
    let attrs = attrs(&Beatmap::default(), NM);
    assert_eq!(attrs.stars, 0.0);

    let perf = DroidPerformance::from(attrs).calculate();
    assert_eq!(perf.pp, 0.0);
    assert!(perf.deviation.is_infinite());
}

#[test]
fn serde_round_trip() {
    let attrs = attrs(&mixed(), HD + DT);

    let json = serde_json::to_value(&attrs).unwrap();
    assert_eq!(json["mods"], "HDDT");

    let deserialized: DroidDifficultyAttributes = serde_json::from_value(json).unwrap();

    assert_eq!(deserialized.mods, attrs.mods);
    assert_eq!(deserialized.max_combo, attrs.max_combo);
    assert_eq!(
        deserialized.aim_difficult_sliders.len(),
        attrs.aim_difficult_sliders.len()
    );
    assert!((deserialized.stars - attrs.stars).abs() < 1e-12);
}
