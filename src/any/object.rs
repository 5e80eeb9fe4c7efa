use rosu_map::{
    section::hit_objects::{CurveBuffers, SliderEvent, SliderEventType, SliderEventsIter},
    util::Pos,
};

use crate::model::{
    beatmap::Beatmap,
    control_point::{DifficultyPoint, TimingPoint},
    hit_object::{HitObject, HitObjectKind, Slider, Spinner},
};

use super::stacking;

/// Size of the osu!standard playfield in osu!pixels.
pub const PLAYFIELD_BASE_SIZE: Pos = Pos::new(512.0, 384.0);

const HD_FADE_IN_DURATION_MULTIPLIER: f64 = 0.4;
const HD_FADE_OUT_DURATION_MULTIPLIER: f64 = 0.3;

/// Duration in milliseconds for an object to fully fade in.
pub fn time_fade_in(time_preempt: f64, hidden: bool) -> f64 {
    if hidden {
        time_preempt * HD_FADE_IN_DURATION_MULTIPLIER
    } else {
        // Preempt below 450ms, e.g. through AR>10, fades in proportionally
        400.0 * (time_preempt / PlayObject::PREEMPT_MIN).min(1.0)
    }
}

/// Opacity at `time` of an object starting at `start_time`.
///
/// All arguments must share the same timeline, i.e. either all or none of
/// them are adjusted by the clock rate.
pub fn opacity_at(
    start_time: f64,
    time: f64,
    hidden: bool,
    time_preempt: f64,
    time_fade_in: f64,
) -> f64 {
    if time > start_time {
        return 0.0;
    }

    let fade_in_start_time = start_time - time_preempt;
    let fade_in = ((time - fade_in_start_time) / time_fade_in).clamp(0.0, 1.0);

    if hidden {
        let fade_out_start_time = start_time - time_preempt + time_fade_in;
        let fade_out_duration = time_preempt * HD_FADE_OUT_DURATION_MULTIPLIER;

        fade_in.min(1.0 - ((time - fade_out_start_time) / fade_out_duration).clamp(0.0, 1.0))
    } else {
        fade_in
    }
}

/// Time in milliseconds during which a Hidden object is fully invisible
/// before it has to be hit.
pub fn time_invisible(time_preempt: f64, time_fade_in: f64) -> f64 {
    (time_preempt - time_fade_in - time_preempt * HD_FADE_OUT_DURATION_MULTIPLIER).max(0.0)
}

/// A [`HitObject`] prepared for a single calculation, i.e. with stacking
/// applied and slider nested objects generated.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayObject {
    pub pos: Pos,
    pub start_time: f64,
    pub stack_height: i32,
    pub stack_offset: Pos,
    pub kind: PlayObjectKind,
}

impl PlayObject {
    pub const OBJECT_RADIUS: f32 = 64.0;
    pub const PREEMPT_MIN: f64 = 450.0;

    const BASE_SCORING_DIST: f64 = 100.0;

    pub fn new(
        h: &HitObject,
        map: &Beatmap,
        curve_bufs: &mut CurveBuffers,
        ticks_buf: &mut Vec<SliderEvent>,
    ) -> Self {
        let kind = match h.kind {
            HitObjectKind::Circle => PlayObjectKind::Circle,
            HitObjectKind::Slider(ref slider) => {
                PlayObjectKind::Slider(PlaySlider::new(h, slider, map, curve_bufs, ticks_buf))
            }
            HitObjectKind::Spinner(Spinner { duration }) => PlayObjectKind::Spinner {
                end_time: h.start_time + duration,
            },
        };

        Self {
            pos: h.pos,
            start_time: h.start_time,
            stack_height: 0,
            stack_offset: Pos::default(),
            kind,
        }
    }

    /// Mirror the object along the horizontal center of the playfield.
    pub fn reflect_vertically(&mut self) {
        fn reflect_y(y: &mut f32) {
            *y = PLAYFIELD_BASE_SIZE.y - *y;
        }

        reflect_y(&mut self.pos.y);

        if let PlayObjectKind::Slider(ref mut slider) = self.kind {
            // Relative to the head
            slider.lazy_end_offset.y = -slider.lazy_end_offset.y;

            for nested in slider.nested_objects.iter_mut() {
                reflect_y(&mut nested.pos.y);
            }
        }
    }

    pub const fn end_time(&self) -> f64 {
        match self.kind {
            PlayObjectKind::Circle => self.start_time,
            PlayObjectKind::Slider(ref slider) => slider.end_time,
            PlayObjectKind::Spinner { end_time } => end_time,
        }
    }

    pub fn stacked_pos(&self) -> Pos {
        self.pos + self.stack_offset
    }

    pub fn end_pos(&self) -> Pos {
        match self.kind {
            PlayObjectKind::Circle | PlayObjectKind::Spinner { .. } => self.pos,
            PlayObjectKind::Slider(ref slider) => slider.tail().map_or(self.pos, |tail| tail.pos),
        }
    }

    pub fn stacked_end_pos(&self) -> Pos {
        self.end_pos() + self.stack_offset
    }

    /// Time between the head and the last nested object.
    pub fn lazy_travel_time(&self) -> f64 {
        match self.kind {
            PlayObjectKind::Circle | PlayObjectKind::Spinner { .. } => 0.0,
            PlayObjectKind::Slider(ref slider) => slider
                .nested_objects
                // Here we really want the last nested object which is not
                // necessarily the tail
                .last()
                .map_or(0.0, |nested| nested.start_time - self.start_time),
        }
    }

    /// How visible the object is at `time`, between `0.0` and `1.0`.
    ///
    /// The object counts as invisible as soon as its start time has passed.
    pub fn opacity_at(&self, time: f64, hidden: bool, time_preempt: f64, time_fade_in: f64) -> f64 {
        opacity_at(self.start_time, time, hidden, time_preempt, time_fade_in)
    }

    pub const fn is_circle(&self) -> bool {
        matches!(self.kind, PlayObjectKind::Circle)
    }

    pub const fn is_slider(&self) -> bool {
        matches!(self.kind, PlayObjectKind::Slider(_))
    }

    pub const fn is_spinner(&self) -> bool {
        matches!(self.kind, PlayObjectKind::Spinner { .. })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlayObjectKind {
    Circle,
    Slider(PlaySlider),
    Spinner { end_time: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlaySlider {
    pub end_time: f64,
    pub span_duration: f64,
    /// Distance of a single span in osu!pixels.
    pub span_dist: f64,
    /// Path position at the lazy end time, relative to the head.
    pub lazy_end_offset: Pos,
    pub nested_objects: Vec<NestedSliderObject>,
}

impl PlaySlider {
    fn new(
        h: &HitObject,
        slider: &Slider,
        map: &Beatmap,
        curve_bufs: &mut CurveBuffers,
        ticks_buf: &mut Vec<SliderEvent>,
    ) -> Self {
        let start_time = h.start_time;

        let beat_len = map
            .timing_point_at(start_time)
            .map_or(TimingPoint::DEFAULT_BEAT_LEN, |point| point.beat_len);

        let (slider_velocity, generate_ticks) = map.difficulty_point_at(start_time).map_or(
            (
                DifficultyPoint::DEFAULT_SLIDER_VELOCITY,
                DifficultyPoint::DEFAULT_GENERATE_TICKS,
            ),
            |point| (point.slider_velocity, point.generate_ticks),
        );

        let path = slider.curve(curve_bufs);

        let span_count = slider.span_count() as f64;

        let scoring_dist = PlayObject::BASE_SCORING_DIST * map.slider_multiplier * slider_velocity;
        let velocity = scoring_dist / beat_len;

        let end_time = start_time + span_count * path.dist() / velocity;

        let duration = end_time - start_time;
        let span_duration = duration / span_count;

        let tick_dist_multiplier = if map.version < 8 {
            slider_velocity.recip()
        } else {
            1.0
        };

        let tick_dist = if generate_ticks {
            scoring_dist / map.slider_tick_rate * tick_dist_multiplier
        } else {
            f64::INFINITY
        };

        let events = SliderEventsIter::new(
            start_time,
            span_duration,
            velocity,
            tick_dist,
            path.dist(),
            slider.span_count() as i32,
            ticks_buf,
        );

        let span_at = |progress: f64| (progress * span_count) as i32;

        let obj_progress_at = |progress: f64| {
            let p = progress * span_count % 1.0;

            if span_at(progress) % 2 == 1 {
                1.0 - p
            } else {
                p
            }
        };

        let end_path_pos = path.position_at(obj_progress_at(1.0));

        let mut nested_objects: Vec<_> = events
            .filter_map(|e| {
                let (pos, start_time, kind) = match e.kind {
                    SliderEventType::Tick => (
                        path.position_at(e.path_progress),
                        e.time,
                        NestedSliderObjectKind::Tick,
                    ),
                    SliderEventType::Repeat => (
                        path.position_at(e.path_progress),
                        start_time + f64::from(e.span_idx + 1) * span_duration,
                        NestedSliderObjectKind::Repeat,
                    ),
                    SliderEventType::LastTick => {
                        (end_path_pos, e.time, NestedSliderObjectKind::Tail)
                    }
                    SliderEventType::Head | SliderEventType::Tail => return None,
                };

                Some(NestedSliderObject {
                    pos: h.pos + pos,
                    start_time,
                    kind,
                })
            })
            .collect();

        nested_objects.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        let lazy_travel_time = nested_objects
            .last()
            .map_or(0.0, |nested| nested.start_time - start_time);

        let mut end_time_min = if span_duration > 0.0 {
            lazy_travel_time / span_duration
        } else {
            0.0
        };

        if end_time_min % 2.0 >= 1.0 {
            end_time_min = 1.0 - end_time_min % 1.0;
        } else {
            end_time_min %= 1.0;
        }

        let lazy_end_offset = path.position_at(end_time_min);

        Self {
            end_time,
            span_duration,
            span_dist: path.dist(),
            lazy_end_offset,
            nested_objects,
        }
    }

    pub fn repeat_count(&self) -> usize {
        self.nested_objects
            .iter()
            .filter(|nested| nested.is_repeat())
            .count()
    }

    pub fn span_count(&self) -> usize {
        self.repeat_count() + 1
    }

    pub fn tail(&self) -> Option<&NestedSliderObject> {
        self.nested_objects
            .iter()
            // The tail is not necessarily the last nested object, e.g. on very
            // short and fast buzz sliders (/b/1001757)
            .rfind(|nested| matches!(nested.kind, NestedSliderObjectKind::Tail))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NestedSliderObject {
    pub pos: Pos,
    pub start_time: f64,
    pub kind: NestedSliderObjectKind,
}

impl NestedSliderObject {
    pub const fn is_repeat(&self) -> bool {
        matches!(self.kind, NestedSliderObjectKind::Repeat)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NestedSliderObjectKind {
    Repeat,
    Tail,
    Tick,
}

/// Object counts of the first `take` objects.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectCounts {
    pub n_circles: u32,
    pub n_sliders: u32,
    pub n_spinners: u32,
    pub max_combo: u32,
}

impl ObjectCounts {
    pub fn new(objects: &[PlayObject], take: usize) -> Self {
        let mut counts = Self::default();

        for h in objects.iter().take(take) {
            counts.max_combo += 1;

            match h.kind {
                PlayObjectKind::Circle => counts.n_circles += 1,
                PlayObjectKind::Slider(ref slider) => {
                    counts.n_sliders += 1;
                    counts.max_combo += slider.nested_objects.len() as u32;
                }
                PlayObjectKind::Spinner { .. } => counts.n_spinners += 1,
            }
        }

        counts
    }
}

/// Turn the map's hit objects into [`PlayObject`]s.
///
/// `scale` is the object scale of the ruleset and determines the offset of
/// stacked objects.
pub fn convert_objects(map: &Beatmap, hr: bool, scale: f32, time_preempt: f64) -> Vec<PlayObject> {
    let mut curve_bufs = CurveBuffers::default();
    let mut ticks_buf = Vec::new();

    let mut objects: Vec<_> = map
        .hit_objects
        .iter()
        .map(|h| PlayObject::new(h, map, &mut curve_bufs, &mut ticks_buf))
        .collect();

    if hr {
        objects.iter_mut().for_each(PlayObject::reflect_vertically);
    }

    let stack_threshold = time_preempt * f64::from(map.stack_leniency);

    if map.version >= 6 {
        stacking::stacking(&mut objects, stack_threshold);
    } else {
        stacking::old_stacking(&mut objects, stack_threshold);
    }

    for h in objects.iter_mut() {
        h.stack_offset = stacking::stack_offset(h.stack_height, scale);
    }

    objects
}

#[cfg(test)]
mod tests {
    use crate::model::hit_object::{PathControlPoint, PathType};

    use super::*;

    fn linear_slider(repeats: usize, len: f64) -> HitObject {
        HitObject {
            pos: Pos::new(100.0, 100.0),
            start_time: 1000.0,
            kind: HitObjectKind::Slider(Slider {
                expected_dist: Some(len),
                repeats,
                control_points: Box::new([
                    PathControlPoint {
                        pos: Pos::new(0.0, 0.0),
                        path_type: Some(PathType::LINEAR),
                    },
                    PathControlPoint {
                        pos: Pos::new(len as f32, 0.0),
                        path_type: None,
                    },
                ]),
            }),
        }
    }

    #[test]
    fn slider_timing_and_nested() {
        let map = Beatmap {
            hit_objects: vec![linear_slider(1, 140.0)],
            ..Default::default()
        };

        let objects = convert_objects(&map, false, 1.0, 1200.0);
        let PlayObjectKind::Slider(ref slider) = objects[0].kind else {
            panic!("expected slider");
        };

        // 140px at 1.4 * 100 px per 1000ms beat => 1000ms per span
        assert!((slider.span_duration - 1000.0).abs() < 1e-6);
        assert!((objects[0].end_time() - 3000.0).abs() < 1e-6);
        assert_eq!(slider.repeat_count(), 1);
        assert!(slider.tail().is_some());

        let counts = ObjectCounts::new(&objects, usize::MAX);
        assert_eq!(counts.n_sliders, 1);
        assert_eq!(counts.max_combo, 1 + slider.nested_objects.len() as u32);
    }

    #[test]
    fn opacity() {
        let h = PlayObject {
            pos: Pos::default(),
            start_time: 1000.0,
            stack_height: 0,
            stack_offset: Pos::default(),
            kind: PlayObjectKind::Circle,
        };

        let fade_in = time_fade_in(600.0, false);
        assert!((fade_in - 400.0).abs() < f64::EPSILON);

        assert!(h.opacity_at(300.0, false, 600.0, fade_in).abs() < f64::EPSILON);
        assert!((h.opacity_at(600.0, false, 600.0, fade_in) - 0.5).abs() < 1e-9);
        assert!((h.opacity_at(900.0, false, 600.0, fade_in) - 1.0).abs() < f64::EPSILON);
        assert!(h.opacity_at(1001.0, false, 600.0, fade_in).abs() < f64::EPSILON);

        // Hidden fades out again before the object has to be hit
        let fade_in = time_fade_in(600.0, true);
        assert!(h.opacity_at(1000.0, true, 600.0, fade_in).abs() < f64::EPSILON);
        assert!((h.opacity_at(640.0, true, 600.0, fade_in) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn hardrock_reflects() {
        let map = Beatmap {
            hit_objects: vec![linear_slider(0, 100.0)],
            ..Default::default()
        };

        let objects = convert_objects(&map, true, 1.0, 1200.0);

        assert!((objects[0].pos.y - 284.0).abs() < f32::EPSILON);
        assert!((objects[0].end_pos().y - 284.0).abs() < 1e-3);
    }
}
