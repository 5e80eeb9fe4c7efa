use rosu_map::util::Pos;

use super::object::{NestedSliderObjectKind, PlayObject, PlayObjectKind};

const STACK_DISTANCE: f32 = 3.0;

/// Visual offset of an object with the given stack height.
pub fn stack_offset(stack_height: i32, scale: f32) -> Pos {
    let offset = stack_height as f32 * scale * -6.4;

    Pos::new(offset, offset)
}

/// Stacking for maps of format version 6 and newer.
pub fn stacking(objects: &mut [PlayObject], stack_threshold: f64) {
    let mut extended_start_idx = 0;

    let Some(extended_end_idx) = objects.len().checked_sub(1) else {
        return;
    };

    for i in (1..=extended_end_idx).rev() {
        let mut n = i;
        let mut base_idx = i;

        // Objects that already received a stack height were handled as part
        // of a later stack
        if objects[base_idx].stack_height != 0 || objects[base_idx].is_spinner() {
            continue;
        }

        if objects[base_idx].is_circle() {
            while let Some(prev) = n.checked_sub(1) {
                n = prev;

                if objects[n].is_spinner() {
                    continue;
                }

                if objects[base_idx].start_time - objects[n].end_time() > stack_threshold {
                    break;
                }

                if n < extended_start_idx {
                    objects[n].stack_height = 0;
                    extended_start_idx = n;
                }

                // Circles underneath the end of a slider stack downwards
                if objects[n].is_slider()
                    && objects[n].end_pos().distance(objects[base_idx].pos) < STACK_DISTANCE
                {
                    let offset = objects[base_idx].stack_height - objects[n].stack_height + 1;
                    let slider_end = objects[n].end_pos();

                    for h in objects[n + 1..=i].iter_mut() {
                        if slider_end.distance(h.pos) < STACK_DISTANCE {
                            h.stack_height -= offset;
                        }
                    }

                    // The slider itself is handled in a later iteration
                    break;
                }

                if objects[n].pos.distance(objects[base_idx].pos) < STACK_DISTANCE {
                    objects[n].stack_height = objects[base_idx].stack_height + 1;
                    base_idx = n;
                }
            }
        } else if objects[base_idx].is_slider() {
            // Everything on top of a slider stacks upwards
            while let Some(prev) = n.checked_sub(1) {
                n = prev;

                if objects[n].is_spinner() {
                    continue;
                }

                if objects[base_idx].start_time - objects[n].start_time > stack_threshold {
                    break;
                }

                if objects[n].end_pos().distance(objects[base_idx].pos) < STACK_DISTANCE {
                    objects[n].stack_height = objects[base_idx].stack_height + 1;
                    base_idx = n;
                }
            }
        }
    }
}

/// Stacking for maps older than format version 6.
pub fn old_stacking(objects: &mut [PlayObject], stack_threshold: f64) {
    for i in 0..objects.len() {
        if objects[i].stack_height != 0 && !objects[i].is_slider() {
            continue;
        }

        let mut start_time = objects[i].end_time();
        let path_end = path_end_pos(&objects[i]);
        let mut slider_stack = 0;

        for j in i + 1..objects.len() {
            if objects[j].start_time - stack_threshold > start_time {
                break;
            }

            // Start times are compared on purpose; older clients did not know
            // the end time of later objects at this point.
            if objects[j].pos.distance(objects[i].pos) < STACK_DISTANCE {
                objects[i].stack_height += 1;
                start_time = objects[j].start_time;
            } else if objects[j].pos.distance(path_end) < STACK_DISTANCE {
                slider_stack += 1;
                objects[j].stack_height -= slider_stack;
                start_time = objects[j].start_time;
            }
        }
    }
}

/// End of the slider path which is the first repeat for odd repeat counts.
fn path_end_pos(h: &PlayObject) -> Pos {
    let PlayObjectKind::Slider(ref slider) = h.kind else {
        return h.pos;
    };

    let nested = if slider.repeat_count() % 2 == 0 {
        slider.tail()
    } else {
        slider
            .nested_objects
            .iter()
            .find(|nested| matches!(nested.kind, NestedSliderObjectKind::Repeat))
    };

    nested.map_or(h.pos, |nested| nested.pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(x: f32, y: f32, start_time: f64) -> PlayObject {
        PlayObject {
            pos: Pos::new(x, y),
            start_time,
            stack_height: 0,
            stack_offset: Pos::default(),
            kind: PlayObjectKind::Circle,
        }
    }

    #[test]
    fn circles_stack_upwards() {
        let mut objects = vec![
            circle(100.0, 100.0, 0.0),
            circle(100.0, 100.0, 100.0),
            circle(101.0, 101.0, 200.0),
            circle(300.0, 300.0, 300.0),
        ];

        stacking(&mut objects, 1000.0);

        let heights: Vec<_> = objects.iter().map(|h| h.stack_height).collect();
        assert_eq!(heights, [2, 1, 0, 0]);
    }

    #[test]
    fn threshold_breaks_stack() {
        let mut objects = vec![circle(100.0, 100.0, 0.0), circle(100.0, 100.0, 5000.0)];

        stacking(&mut objects, 1000.0);
        assert!(objects.iter().all(|h| h.stack_height == 0));

        old_stacking(&mut objects, 1000.0);
        assert!(objects.iter().all(|h| h.stack_height == 0));
    }

    #[test]
    fn offset_scales() {
        let offset = stack_offset(2, 0.5);
        assert!((offset.x + 6.4).abs() < 1e-6);
        assert!((offset.y + 6.4).abs() < 1e-6);
    }
}
