use droid_pp::{droid::Droid, osu::Osu, Beatmap, Difficulty};

use self::common::*;

mod common;

#[test]
fn inline_map() {
    let map = mixed();

    assert_eq!(map.hit_objects.len(), 49);
    assert_eq!(map.hit_objects.iter().filter(|h| h.is_slider()).count(), 16);
    assert_eq!(map.hit_objects.iter().filter(|h| h.is_spinner()).count(), 1);
    assert!((map.od - 8.0).abs() < f32::EPSILON);
    assert!((map.bpm() - 150.0).abs() < 1e-6);
}

#[test]
fn negative_repeat_count_skips_slider() {
    init_logging();

    let map: Beatmap = negative_repeats().parse().unwrap();

    assert_eq!(map.hit_objects.len(), 2);
    assert!(map.hit_objects.iter().all(|h| h.is_circle()));

    let attrs = Difficulty::new().calculate_for_mode::<Droid>(&map);
    assert_eq!(attrs.n_circles, 2);
    assert_eq!(attrs.n_sliders, 0);
}

#[test]
fn from_bytes_matches_from_str() {
    let content = negative_repeats();

    let from_str: Beatmap = content.parse().unwrap();
    let from_bytes = Beatmap::from_bytes(content.as_bytes()).unwrap();

    assert_eq!(from_str.hit_objects.len(), from_bytes.hit_objects.len());
    assert_eq!(
        Difficulty::new().calculate_for_mode::<Osu>(&from_str),
        Difficulty::new().calculate_for_mode::<Osu>(&from_bytes),
    );
}

#[cfg(feature = "async_tokio")]
#[test]
fn parse_async_tokio() {
    let content = negative_repeats();

    let map = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("could not start runtime")
        .block_on(Beatmap::parse(content.as_bytes()))
        .unwrap();

    assert_eq!(map.hit_objects.len(), 2);
}

#[cfg(feature = "async_std")]
#[test]
fn parse_async_std() {
    let content = negative_repeats();
    let map = async_std::task::block_on(Beatmap::parse(content.as_bytes())).unwrap();

    assert_eq!(map.hit_objects.len(), 2);
}
