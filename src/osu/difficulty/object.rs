use crate::any::{
    difficulty::{
        cursor::SliderCursorCache,
        object::{HasStartTime, IDifficultyObject, Movement, MIN_DELTA_TIME},
        rhythm::RhythmObject,
    },
    object::PlayObject,
};

use super::scaling_factor::ScalingFactor;

pub struct OsuDifficultyObject<'a> {
    pub idx: usize,
    pub base: &'a PlayObject,
    pub start_time: f64,
    pub delta_time: f64,

    pub strain_time: f64,
    pub lazy_jump_dist: f64,
    pub min_jump_dist: f64,
    pub min_jump_time: f64,
    pub travel_dist: f64,
    pub travel_time: f64,
    pub angle: Option<f64>,
    /// Unadjusted lazy travel distance of a slider in normalized osu!pixels.
    pub lazy_travel_dist: f64,
}

impl<'a> OsuDifficultyObject<'a> {
    /// Difficulty object for `objects[obj_idx]`.
    ///
    /// The first object has no difficulty object so `obj_idx` must be at
    /// least `1` and `idx` is `obj_idx - 1`.
    pub fn new(
        objects: &'a [PlayObject],
        obj_idx: usize,
        cursors: &SliderCursorCache,
        clock_rate: f64,
        scaling_factor: &ScalingFactor,
    ) -> Self {
        let hit_object = &objects[obj_idx];
        let last_object = &objects[obj_idx - 1];

        let delta_time = (hit_object.start_time - last_object.start_time) / clock_rate;
        let start_time = hit_object.start_time / clock_rate;

        let strain_time = delta_time.max(MIN_DELTA_TIME);

        let Movement {
            lazy_jump_dist,
            min_jump_dist,
            min_jump_time,
            travel_dist,
            travel_time,
            angle,
        } = Movement::new(
            objects,
            obj_idx,
            cursors,
            scaling_factor.factor,
            clock_rate,
            strain_time,
        );

        let lazy_travel_dist = cursors
            .get(obj_idx)
            .map_or(0.0, |cursor| f64::from(cursor.lazy_travel_dist));

        Self {
            idx: obj_idx - 1,
            base: hit_object,
            start_time,
            delta_time,
            strain_time,
            lazy_jump_dist,
            min_jump_dist,
            min_jump_time,
            travel_dist,
            travel_time,
            angle,
            lazy_travel_dist,
        }
    }

    pub fn opacity_at(&self, time: f64, hidden: bool, time_preempt: f64, time_fade_in: f64) -> f64 {
        self.base
            .opacity_at(time, hidden, time_preempt, time_fade_in)
    }
}

impl IDifficultyObject for OsuDifficultyObject<'_> {
    fn idx(&self) -> usize {
        self.idx
    }
}

impl HasStartTime for OsuDifficultyObject<'_> {
    fn start_time(&self) -> f64 {
        self.start_time
    }
}

impl RhythmObject for OsuDifficultyObject<'_> {
    fn delta_time(&self) -> f64 {
        self.delta_time
    }

    fn strain_time(&self) -> f64 {
        self.strain_time
    }

    fn is_slider(&self) -> bool {
        self.base.is_slider()
    }

    fn is_spinner(&self) -> bool {
        self.base.is_spinner()
    }
}
