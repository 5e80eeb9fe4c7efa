use rosu_map::util::Pos;

use crate::any::object::{PlayObject, PlayObjectKind};

/// Radius of an object after normalization.
pub const NORMALIZED_RADIUS: f32 = 50.0;

/// How far the cursor can be from the slider ball while still tracking it.
pub const ASSUMED_SLIDER_RADIUS: f32 = NORMALIZED_RADIUS * 1.8;

/// Result of simulating a lazy cursor along a slider.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SliderCursor {
    /// Absolute, stacked position of the cursor at the end of the slider.
    pub lazy_end_pos: Pos,
    /// Distance traveled in normalized osu!pixels.
    pub lazy_travel_dist: f32,
    /// Time between the head and the last nested object.
    pub lazy_travel_time: f64,
}

/// Lazy cursor data for every slider of a map, keyed by object index.
///
/// Built once before any difficulty object is created and only read
/// afterwards.
#[derive(Clone, Debug, Default)]
pub struct SliderCursorCache {
    cursors: Vec<Option<SliderCursor>>,
}

impl SliderCursorCache {
    /// `radius` is the object radius in osu!pixels.
    pub fn new(objects: &[PlayObject], radius: f64) -> Self {
        let scaling_factor = f64::from(NORMALIZED_RADIUS) / radius;

        let cursors = objects
            .iter()
            .map(|h| simulate(h, scaling_factor))
            .collect();

        Self { cursors }
    }

    pub fn get(&self, idx: usize) -> Option<&SliderCursor> {
        self.cursors.get(idx).and_then(Option::as_ref)
    }

    /// The position the cursor is at when leaving the object.
    pub fn end_cursor_pos(&self, idx: usize, h: &PlayObject) -> Pos {
        self.get(idx)
            .map_or_else(|| h.stacked_pos(), |cursor| cursor.lazy_end_pos)
    }
}

fn simulate(h: &PlayObject, scaling_factor: f64) -> Option<SliderCursor> {
    let PlayObjectKind::Slider(ref slider) = h.kind else {
        return None;
    };

    let stack_offset = h.stack_offset;
    let nested = slider.nested_objects.as_slice();

    let mut cursor = SliderCursor {
        lazy_end_pos: h.pos + slider.lazy_end_offset + stack_offset,
        lazy_travel_dist: 0.0,
        lazy_travel_time: h.lazy_travel_time(),
    };

    let mut curr_cursor_pos = h.stacked_pos();

    for (curr_movement_obj, i) in nested.iter().zip(1..) {
        let is_last = i == nested.len();

        let mut curr_movement = curr_movement_obj.pos + stack_offset - curr_cursor_pos;
        let mut curr_movement_len = scaling_factor * f64::from(curr_movement.length());
        let mut required_movement = f64::from(ASSUMED_SLIDER_RADIUS);

        if is_last {
            // The end of the slider is reached by whichever is shorter, the
            // lazy end or the actual final position
            let lazy_movement = cursor.lazy_end_pos - curr_cursor_pos;

            if lazy_movement.length() < curr_movement.length() {
                curr_movement = lazy_movement;
            }

            curr_movement_len = scaling_factor * f64::from(curr_movement.length());
        } else if curr_movement_obj.is_repeat() {
            required_movement = f64::from(NORMALIZED_RADIUS);
        }

        if curr_movement_len > required_movement {
            let ratio = (curr_movement_len - required_movement) / curr_movement_len;
            curr_cursor_pos += curr_movement * ratio as f32;
            curr_movement_len *= ratio;
            cursor.lazy_travel_dist += curr_movement_len as f32;
        }

        if is_last {
            cursor.lazy_end_pos = curr_cursor_pos;
        }
    }

    Some(cursor)
}

#[cfg(test)]
mod tests {
    use crate::any::object::{NestedSliderObject, NestedSliderObjectKind, PlaySlider};

    use super::*;

    fn slider(tail: Pos) -> PlayObject {
        PlayObject {
            pos: Pos::new(100.0, 100.0),
            start_time: 0.0,
            stack_height: 0,
            stack_offset: Pos::default(),
            kind: PlayObjectKind::Slider(PlaySlider {
                end_time: 300.0,
                span_duration: 300.0,
                span_dist: f64::from((tail - Pos::new(100.0, 100.0)).length()),
                lazy_end_offset: tail - Pos::new(100.0, 100.0),
                nested_objects: vec![NestedSliderObject {
                    pos: tail,
                    start_time: 264.0,
                    kind: NestedSliderObjectKind::Tail,
                }],
            }),
        }
    }

    #[test]
    fn short_slider_has_no_travel() {
        let objects = [slider(Pos::new(140.0, 100.0))];
        let cache = SliderCursorCache::new(&objects, 50.0);
        let cursor = cache.get(0).unwrap();

        assert!(cursor.lazy_travel_dist.abs() < f32::EPSILON);
        assert_eq!(cursor.lazy_end_pos, Pos::new(100.0, 100.0));
        assert!((cursor.lazy_travel_time - 264.0).abs() < f64::EPSILON);
    }

    #[test]
    fn long_slider_travels() {
        let objects = [slider(Pos::new(300.0, 100.0))];
        let cache = SliderCursorCache::new(&objects, 50.0);
        let cursor = cache.get(0).unwrap();

        // 200px movement minus the 90px the cursor may lag behind
        assert!((cursor.lazy_travel_dist - 110.0).abs() < 1e-3);
        assert!((cursor.lazy_end_pos.x - 210.0).abs() < 1e-3);
    }

    #[test]
    fn circles_have_no_cursor() {
        let circle = PlayObject {
            kind: PlayObjectKind::Circle,
            ..slider(Pos::new(140.0, 100.0))
        };

        let cache = SliderCursorCache::new(std::slice::from_ref(&circle), 50.0);
        assert!(cache.get(0).is_none());
        assert_eq!(cache.end_cursor_pos(0, &circle), circle.pos);
    }
}
