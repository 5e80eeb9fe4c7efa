use crate::{
    any::{
        difficulty::{
            cursor::{SliderCursorCache, NORMALIZED_RADIUS},
            object::{HasStartTime, IDifficultyObject, Movement, MIN_DELTA_TIME},
            rhythm::RhythmObject,
        },
        object::{self, PlayObject},
    },
    util::difficulty::smootherstep,
};

use super::scaling_factor::DroidScalingFactor;

/// Objects hit within this many milliseconds of each other count as hit at
/// the same time.
const OVERLAP_TIME_THRESHOLD: f64 = 5.0;

/// A hit object with all the features osu!droid's skills need.
///
/// Unlike on osu!standard, the first hit object has a difficulty object as
/// well so `idx` always matches the index of the hit object. Its movement
/// related fields are zero.
pub struct DroidDifficultyObject<'a> {
    pub idx: usize,
    pub base: &'a PlayObject,
    pub start_time: f64,
    pub end_time: f64,
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

    /// Clock rate adjusted preempt.
    pub time_preempt: f64,
    /// Clock rate adjusted fade in duration.
    pub time_fade_in: f64,
    /// Full clock rate adjusted window for a great hit.
    pub great_window: f64,
    pub scaling_factor: f64,

    /// Summed opacity of upcoming objects while this one has to be hit.
    pub note_density: f64,
    /// How much this object covers previous objects that were recently on
    /// screen.
    pub overlapping_factor: f64,
}

/// Settings that are the same for every difficulty object of a map.
#[derive(Copy, Clone, Debug)]
pub struct DroidObjectSettings {
    pub clock_rate: f64,
    pub scaling_factor: DroidScalingFactor,
    /// Preempt without clock rate.
    pub time_preempt: f64,
    /// Fade in duration without clock rate.
    pub time_fade_in: f64,
    /// Full clock rate adjusted window for a great hit.
    pub great_window: f64,
    pub hidden: bool,
}

impl<'a> DroidDifficultyObject<'a> {
    pub fn new(
        objects: &'a [PlayObject],
        obj_idx: usize,
        cursors: &SliderCursorCache,
        settings: &DroidObjectSettings,
    ) -> Self {
        let clock_rate = settings.clock_rate;
        let hit_object = &objects[obj_idx];

        let start_time = hit_object.start_time / clock_rate;
        let end_time = hit_object.end_time() / clock_rate;

        let delta_time = obj_idx
            .checked_sub(1)
            .map_or(0.0, |last_idx| {
                (hit_object.start_time - objects[last_idx].start_time) / clock_rate
            });

        let strain_time = delta_time.max(MIN_DELTA_TIME);

        let movement = if obj_idx == 0 {
            Movement::default()
        } else {
            Movement::new(
                objects,
                obj_idx,
                cursors,
                settings.scaling_factor.factor,
                clock_rate,
                strain_time,
            )
        };

        let Movement {
            lazy_jump_dist,
            min_jump_dist,
            min_jump_time,
            travel_dist,
            travel_time,
            angle,
        } = movement;

        let lazy_travel_dist = cursors
            .get(obj_idx)
            .map_or(0.0, |cursor| f64::from(cursor.lazy_travel_dist));

        Self {
            idx: obj_idx,
            base: hit_object,
            start_time,
            end_time,
            delta_time,
            strain_time,
            lazy_jump_dist,
            min_jump_dist,
            min_jump_time,
            travel_dist,
            travel_time,
            angle,
            lazy_travel_dist,
            time_preempt: settings.time_preempt / clock_rate,
            time_fade_in: settings.time_fade_in / clock_rate,
            great_window: settings.great_window,
            scaling_factor: f64::from(settings.scaling_factor.factor),
            note_density: 0.0,
            overlapping_factor: 0.0,
        }
    }

    /// How visible the object is at the clock rate adjusted `time`.
    pub fn opacity_at(&self, time: f64, hidden: bool) -> f64 {
        object::opacity_at(
            self.start_time,
            time,
            hidden,
            self.time_preempt,
            self.time_fade_in,
        )
    }

    /// Whether the object is hit at virtually the same time as the previous
    /// one.
    ///
    /// If `consider_distance` is set, both objects also need to overlap on
    /// the playfield.
    pub fn is_overlapping(&self, consider_distance: bool, objects: &[Self]) -> bool {
        if self.base.is_spinner() {
            return false;
        }

        let Some(prev) = self.previous(0, objects) else {
            return false;
        };

        if prev.base.is_spinner() || self.delta_time >= OVERLAP_TIME_THRESHOLD {
            return false;
        }

        !consider_distance || self.lazy_jump_dist < 2.0 * f64::from(NORMALIZED_RADIUS)
    }

    /// Distance in normalized osu!pixels between the end of `other` and the
    /// start of `self`.
    pub fn dist_from_end_of(&self, other: &Self) -> f64 {
        f64::from((self.base.stacked_pos() - other.base.stacked_end_pos()).length())
            * self.scaling_factor
    }
}

/// Fill in the note density and overlapping factor of all objects.
///
/// Both depend on neighbouring objects so they can only be computed once
/// every object exists.
pub fn compute_visuals(objects: &mut [DroidDifficultyObject<'_>], hidden: bool) {
    let visuals: Vec<(f64, f64)> = {
        let view: &[DroidDifficultyObject<'_>] = objects;

        view.iter()
            .map(|curr| {
                (
                    note_density(curr, view, hidden),
                    overlapping_factor(curr, view),
                )
            })
            .collect()
    };

    for (curr, (note_density, overlapping_factor)) in objects.iter_mut().zip(visuals) {
        curr.note_density = note_density;
        curr.overlapping_factor = overlapping_factor;
    }
}

fn note_density(
    curr: &DroidDifficultyObject<'_>,
    objects: &[DroidDifficultyObject<'_>],
    hidden: bool,
) -> f64 {
    objects
        .iter()
        .skip(curr.idx + 1)
        .take_while(|next| next.start_time - curr.start_time <= curr.time_preempt)
        .map(|next| next.opacity_at(curr.start_time, hidden))
        .sum()
}

fn overlapping_factor(
    curr: &DroidDifficultyObject<'_>,
    objects: &[DroidDifficultyObject<'_>],
) -> f64 {
    if curr.base.is_spinner() {
        return 0.0;
    }

    // In normalized osu!pixels
    let max_dist = 3.0 * f64::from(NORMALIZED_RADIUS);

    objects[..curr.idx]
        .iter()
        .rev()
        .take_while(|prev| curr.start_time - prev.start_time < curr.time_preempt)
        .filter(|prev| !prev.base.is_spinner())
        .map(|prev| {
            let dist = curr.dist_from_end_of(prev);
            let time_weight =
                1.0 - smootherstep(curr.start_time - prev.start_time, 0.0, curr.time_preempt);

            (1.0 - dist / max_dist).max(0.0) * time_weight
        })
        .sum()
}

impl IDifficultyObject for DroidDifficultyObject<'_> {
    fn idx(&self) -> usize {
        self.idx
    }
}

impl HasStartTime for DroidDifficultyObject<'_> {
    fn start_time(&self) -> f64 {
        self.start_time
    }
}

impl RhythmObject for DroidDifficultyObject<'_> {
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

#[cfg(test)]
mod tests {
    use rosu_map::util::Pos;

    use crate::any::object::PlayObjectKind;

    use super::*;

    fn circle(x: f32, start_time: f64) -> PlayObject {
        PlayObject {
            pos: Pos::new(x, 192.0),
            start_time,
            stack_height: 0,
            stack_offset: Pos::default(),
            kind: PlayObjectKind::Circle,
        }
    }

    fn settings() -> DroidObjectSettings {
        DroidObjectSettings {
            clock_rate: 1.0,
            scaling_factor: DroidScalingFactor::new(4.0),
            time_preempt: 600.0,
            time_fade_in: 400.0,
            great_window: 120.0,
            hidden: false,
        }
    }

    fn create(objects: &[PlayObject]) -> Vec<DroidDifficultyObject<'_>> {
        let settings = settings();
        let cursors = SliderCursorCache::new(objects, settings.scaling_factor.radius);

        let mut diff_objects: Vec<_> = (0..objects.len())
            .map(|i| DroidDifficultyObject::new(objects, i, &cursors, &settings))
            .collect();

        compute_visuals(&mut diff_objects, settings.hidden);

        diff_objects
    }

    #[test]
    fn first_object_is_kept() {
        let objects = [circle(100.0, 1000.0), circle(300.0, 1200.0)];
        let diff_objects = create(&objects);

        assert_eq!(diff_objects.len(), 2);
        assert_eq!(diff_objects[0].idx, 0);
        assert!(diff_objects[0].lazy_jump_dist.abs() < f64::EPSILON);
        assert!((diff_objects[0].strain_time - MIN_DELTA_TIME).abs() < f64::EPSILON);
        assert!(diff_objects[1].lazy_jump_dist > 0.0);
        assert!((diff_objects[1].delta_time - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn density_counts_upcoming_objects() {
        let objects: Vec<_> = (0..6)
            .map(|i| circle(50.0 + 60.0 * i as f32, 1000.0 + 100.0 * f64::from(i)))
            .collect();

        let diff_objects = create(&objects);

        assert!(diff_objects[0].note_density > diff_objects[4].note_density);
        assert!(diff_objects[5].note_density.abs() < f64::EPSILON);
    }

    #[test]
    fn simultaneous_objects_overlap() {
        let objects = [
            circle(100.0, 1000.0),
            circle(100.0, 1300.0),
            circle(110.0, 1302.0),
        ];

        let diff_objects = create(&objects);

        assert!(!diff_objects[1].is_overlapping(true, &diff_objects));
        assert!(diff_objects[2].is_overlapping(true, &diff_objects));
        assert!(diff_objects[2].is_overlapping(false, &diff_objects));
        assert!(diff_objects[2].overlapping_factor > 0.0);
    }
}
