use crate::any::object::{PlayObject, PlayObjectKind};

use super::cursor::{SliderCursorCache, ASSUMED_SLIDER_RADIUS, NORMALIZED_RADIUS};

/// Strain times are floored at this value.
pub const MIN_DELTA_TIME: f64 = 25.0;

const MAX_SLIDER_RADIUS: f32 = NORMALIZED_RADIUS * 2.4;

/// Index-based navigation over a flat slice of difficulty objects.
pub trait IDifficultyObject: Sized {
    fn idx(&self) -> usize;

    fn previous<'a>(&self, backwards_idx: usize, diff_objects: &'a [Self]) -> Option<&'a Self> {
        self.idx()
            .checked_sub(backwards_idx + 1)
            .and_then(|idx| diff_objects.get(idx))
    }

    fn next<'a>(&self, forwards_idx: usize, diff_objects: &'a [Self]) -> Option<&'a Self> {
        diff_objects.get(self.idx() + (forwards_idx + 1))
    }
}

pub trait HasStartTime {
    fn start_time(&self) -> f64;
}

/// Cursor movement from the previous objects into the current one.
///
/// All distances are scaled by the ruleset's scaling factor.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Movement {
    pub lazy_jump_dist: f64,
    pub min_jump_dist: f64,
    pub min_jump_time: f64,
    pub travel_dist: f64,
    pub travel_time: f64,
    pub angle: Option<f64>,
}

impl Movement {
    /// Movement into `objects[idx]` which must not be the first object.
    pub fn new(
        objects: &[PlayObject],
        idx: usize,
        cursors: &SliderCursorCache,
        scaling_factor: f32,
        clock_rate: f64,
        strain_time: f64,
    ) -> Self {
        let mut this = Self::default();

        let Some(curr) = objects.get(idx) else {
            return this;
        };

        if let Some(cursor) = cursors.get(idx) {
            let repeats = match curr.kind {
                PlayObjectKind::Slider(ref slider) => slider.repeat_count(),
                PlayObjectKind::Circle | PlayObjectKind::Spinner { .. } => 0,
            };

            this.travel_dist = f64::from(
                cursor.lazy_travel_dist * ((1.0 + repeats as f64 / 2.5).powf(1.0 / 2.5)) as f32,
            );

            this.travel_time = (cursor.lazy_travel_time / clock_rate).max(MIN_DELTA_TIME);
        }

        let Some(last_idx) = idx.checked_sub(1) else {
            return this;
        };

        let last = &objects[last_idx];

        if curr.is_spinner() || last.is_spinner() {
            return this;
        }

        let last_cursor_pos = cursors.end_cursor_pos(last_idx, last);

        this.lazy_jump_dist = f64::from(
            (curr.stacked_pos() * scaling_factor - last_cursor_pos * scaling_factor).length(),
        );
        this.min_jump_time = strain_time;
        this.min_jump_dist = this.lazy_jump_dist;

        if let Some(last_cursor) = cursors.get(last_idx) {
            let last_travel_time = (last_cursor.lazy_travel_time / clock_rate).max(MIN_DELTA_TIME);
            this.min_jump_time = (strain_time - last_travel_time).max(MIN_DELTA_TIME);

            // The cursor may either follow the slider to its end or leave
            // early towards the next object
            let tail_jump_dist =
                (last.stacked_end_pos() - curr.stacked_pos()).length() * scaling_factor;

            let diff = f64::from(MAX_SLIDER_RADIUS - ASSUMED_SLIDER_RADIUS);
            let min = f64::from(tail_jump_dist - MAX_SLIDER_RADIUS);
            this.min_jump_dist = ((this.lazy_jump_dist - diff).min(min)).max(0.0);
        }

        let last_last = last_idx
            .checked_sub(1)
            .map(|i| (i, &objects[i]))
            .filter(|(_, h)| !h.is_spinner());

        if let Some((last_last_idx, last_last)) = last_last {
            let last_last_cursor_pos = cursors.end_cursor_pos(last_last_idx, last_last);

            let v1 = last_last_cursor_pos - last.stacked_pos();
            let v2 = curr.stacked_pos() - last_cursor_pos;

            let dot = v1.dot(v2);
            let det = v1.x * v2.y - v1.y * v2.x;

            this.angle = Some((f64::from(det).atan2(f64::from(dot))).abs());
        }

        this
    }
}
