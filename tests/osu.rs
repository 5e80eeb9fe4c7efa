use droid_pp::{
    osu::{Osu, OsuDifficultyAttributes, OsuPerformance},
    Beatmap, Difficulty,
};

use self::common::{mods::*, *};

mod common;

fn attrs(map: &Beatmap, mods: u32) -> OsuDifficultyAttributes {
    Difficulty::new()
        .mods(mods)
        .calculate_for_mode::<Osu>(map)
}

#[test]
fn deterministic() {
    init_logging();

    let map = mixed();

    for mods in [NM, HD, DT, HR + FL] {
        assert_eq!(attrs(&map, mods), attrs(&map, mods), "mods={mods}");
    }
}

#[test]
fn double_time_increases_speed() {
    let map = stream(200, 100.0);

    let nomod = attrs(&map, NM);
    let dt = attrs(&map, DT);

    assert!(nomod.speed > 0.0);
    assert!(dt.speed > nomod.speed, "{} vs {}", dt.speed, nomod.speed);
    assert!(dt.stars > nomod.stars);
    assert!(dt.ar > nomod.ar);
}

#[test]
fn jumps_have_more_aim_than_streams() {
    let jumps = attrs(&jumps(100, 300.0), NM);
    let stream = attrs(&stream(100, 300.0), NM);

    assert!(jumps.aim > stream.aim, "{} vs {}", jumps.aim, stream.aim);
}

#[test]
fn object_counts() {
    let attrs = attrs(&mixed(), NM);

    assert_eq!(attrs.n_circles, 32);
    assert_eq!(attrs.n_sliders, 16);
    assert_eq!(attrs.n_spinners, 1);
    assert!(attrs.max_combo > attrs.n_objects());
}

#[test]
fn passed_objects_limit_difficulty() {
    let map = stream(200, 100.0);

    let partial = Difficulty::new()
        .passed_objects(50)
        .calculate_for_mode::<Osu>(&map);

    let full = attrs(&map, NM);

    assert_eq!(partial.n_objects(), 50);
    assert!(partial.stars <= full.stars);
}

#[test]
fn strain_sections() {
    let map = stream(100, 100.0);
    let strains = Difficulty::new().strains_for_mode::<Osu>(&map);

    assert!(!strains.speed.is_empty());
    assert_eq!(strains.speed.len(), strains.aim.len());
    assert_eq!(strains.aim.len(), strains.aim_no_sliders.len());
}

#[test]
fn performance() {
    let map = mixed();
    let diff_attrs = attrs(&map, HD);

    let from_map = OsuPerformance::new(&map).mods(HD).accuracy(98.0).calculate();
    let from_attrs = OsuPerformance::from(diff_attrs)
        .mods(HD)
        .accuracy(98.0)
        .calculate();

    assert_eq!(from_map, from_attrs);
    assert!(from_map.pp > 0.0);

    let missed = OsuPerformance::from(from_map.clone())
        .mods(HD)
        .accuracy(98.0)
        .misses(3)
        .calculate();

    assert!(missed.pp < from_map.pp);
}

#[test]
fn empty_map() {
    let attrs = attrs(&Beatmap::default(), NM);
    assert_eq!(attrs.stars, 0.0);

    let perf = OsuPerformance::from(attrs).calculate();
    assert_eq!(perf.pp, 0.0);
}
