use crate::any::difficulty::{cursor::NORMALIZED_RADIUS, object::MIN_DELTA_TIME};

use super::object::DroidDifficultyObject;

/// Amount of hypotheses that are kept after each object.
const BEAM_WIDTH: usize = 8;

/// Softmax temperature in milliseconds. Lower values make the simulated
/// player pick the easiest hand more consistently.
const TEMPERATURE: f64 = 10.0;

/// How an object is hit on a touch screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TouchHand {
    Left,
    Right,
    /// Keep the finger of the hand that tapped last on the screen and move
    /// it to the object without tapping again.
    Drag,
}

/// One hypothesis of how the player has been hitting objects so far.
#[derive(Copy, Clone, Debug, PartialEq)]
struct TouchProbability {
    last_left: Option<f64>,
    last_right: Option<f64>,
    probability: f64,
}

impl TouchProbability {
    const INITIAL: Self = Self {
        last_left: None,
        last_right: None,
        probability: 1.0,
    };

    /// Time since the relevant hand last tapped, if it ever did.
    ///
    /// Drags don't tap so they are never constrained by a previous tap.
    fn hand_delta(&self, hand: TouchHand, time: f64) -> Option<f64> {
        let last = match hand {
            TouchHand::Left => self.last_left,
            TouchHand::Right => self.last_right,
            TouchHand::Drag => None,
        };

        last.map(|last| time - last)
    }

    fn advance(&self, hand: TouchHand, time: f64, probability: f64) -> Self {
        let mut next = *self;
        next.probability = probability;

        match hand {
            TouchHand::Left => next.last_left = Some(time),
            TouchHand::Right => next.last_right = Some(time),
            TouchHand::Drag => {}
        }

        next
    }
}

/// Strain time of each object as experienced by a player with two hands.
///
/// Hitting objects with alternating hands halves the tapping rate of each
/// hand so the effective strain time of an object is half the time since the
/// hand hitting it tapped last, capped at its regular strain time. The
/// hypotheses of which hand hits what are tracked through a beam search and
/// the result of each object is weighted by their probabilities.
///
/// The returned values are indexed like `objects`.
pub fn effective_strain_times(objects: &[DroidDifficultyObject<'_>]) -> Vec<f64> {
    let mut beam = vec![TouchProbability::INITIAL];
    let mut next_beam = Vec::with_capacity(BEAM_WIDTH * 3);
    let mut strain_times = Vec::with_capacity(objects.len());

    for curr in objects {
        if curr.base.is_spinner() {
            strain_times.push(curr.strain_time);

            continue;
        }

        let can_drag = curr.idx > 0 && curr.lazy_jump_dist < 2.0 * f64::from(NORMALIZED_RADIUS);

        let hands: &[TouchHand] = if can_drag {
            &[TouchHand::Left, TouchHand::Right, TouchHand::Drag]
        } else {
            &[TouchHand::Left, TouchHand::Right]
        };

        let mut expected_strain_time = 0.0;
        next_beam.clear();

        for hypothesis in beam.iter() {
            let mut branches = [(TouchHand::Left, 0.0); 3];

            for (branch, &hand) in branches.iter_mut().zip(hands) {
                let hand_strain_time = hypothesis
                    .hand_delta(hand, curr.start_time)
                    .map_or(curr.strain_time, |delta| {
                        (delta / 2.0).max(MIN_DELTA_TIME).min(curr.strain_time)
                    });

                *branch = (hand, hand_strain_time);
            }

            let branches = &branches[..hands.len()];

            // Softmax, shifted by the maximum for numerical stability
            let max = branches.iter().map(|(_, st)| *st).fold(0.0, f64::max);
            let weights: Vec<_> = branches
                .iter()
                .map(|(_, st)| ((st - max) / TEMPERATURE).exp())
                .collect();
            let weight_sum: f64 = weights.iter().sum();

            for (&(hand, strain_time), weight) in branches.iter().zip(weights) {
                let probability = hypothesis.probability * weight / weight_sum;
                expected_strain_time += probability * strain_time;

                next_beam.push(hypothesis.advance(hand, curr.start_time, probability));
            }
        }

        strain_times.push(expected_strain_time);

        next_beam.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        next_beam.truncate(BEAM_WIDTH);

        let total: f64 = next_beam.iter().map(|h| h.probability).sum();

        if total > 0.0 {
            next_beam.iter_mut().for_each(|h| h.probability /= total);
        }

        std::mem::swap(&mut beam, &mut next_beam);
    }

    strain_times
}

#[cfg(test)]
mod tests {
    use rosu_map::util::Pos;

    use crate::{
        any::{
            difficulty::cursor::SliderCursorCache,
            object::{PlayObject, PlayObjectKind},
        },
        droid::difficulty::{
            object::{DroidObjectSettings, DroidDifficultyObject},
            scaling_factor::DroidScalingFactor,
        },
    };

    use super::*;

    fn stream(count: usize, spacing_ms: f64, spacing_px: f32) -> Vec<PlayObject> {
        (0..count)
            .map(|i| PlayObject {
                pos: Pos::new(20.0 + spacing_px * (i % 8) as f32, 192.0),
                start_time: 1000.0 + spacing_ms * i as f64,
                stack_height: 0,
                stack_offset: Pos::default(),
                kind: PlayObjectKind::Circle,
            })
            .collect()
    }

    fn strain_times(objects: &[PlayObject]) -> (Vec<f64>, Vec<f64>) {
        let settings = DroidObjectSettings {
            clock_rate: 1.0,
            scaling_factor: DroidScalingFactor::new(4.0),
            time_preempt: 600.0,
            time_fade_in: 400.0,
            great_window: 120.0,
            hidden: false,
        };

        let cursors = SliderCursorCache::new(objects, settings.scaling_factor.radius);

        let diff_objects: Vec<_> = (0..objects.len())
            .map(|i| DroidDifficultyObject::new(objects, i, &cursors, &settings))
            .collect();

        let regular = diff_objects.iter().map(|h| h.strain_time).collect();

        (effective_strain_times(&diff_objects), regular)
    }

    #[test]
    fn never_exceeds_strain_time() {
        let (effective, regular) = strain_times(&stream(32, 90.0, 60.0));

        assert_eq!(effective.len(), regular.len());

        for (effective, regular) in effective.iter().zip(regular) {
            assert!(*effective <= regular + 1e-9);
            assert!(*effective >= MIN_DELTA_TIME);
        }
    }

    #[test]
    fn slow_objects_are_unaffected() {
        let (effective, regular) = strain_times(&stream(16, 600.0, 150.0));

        for (effective, regular) in effective.iter().zip(regular).skip(1) {
            assert!((effective - regular).abs() < 1e-6, "{effective} vs {regular}");
        }
    }

    /// Pairs of objects 30ms apart with 120ms between pairs.
    fn uneven_stream(count: usize, spacing_px: f32) -> Vec<PlayObject> {
        let mut objects = stream(count, 0.0, spacing_px);

        for (i, h) in objects.iter_mut().enumerate() {
            h.start_time = 1000.0 + 150.0 * (i / 2) as f64 + 30.0 * (i % 2) as f64;
        }

        objects
    }

    #[test]
    fn dragging_keeps_strain_time() {
        let (close, regular) = strain_times(&uneven_stream(32, 4.0));
        let (far, _) = strain_times(&uneven_stream(32, 150.0));

        // First object after a 120ms gap
        assert!((regular[20] - 120.0).abs() < 1e-6, "{}", regular[20]);
        assert!(close[20] > 110.0, "{}", close[20]);
        assert!(far[20] < 80.0, "{}", far[20]);

        for (close, far) in close.iter().zip(far.iter()) {
            assert!(*close >= *far - 1e-6, "{close} vs {far}");
        }
    }

    #[test]
    fn faster_streams_lose_more() {
        let (slow, slow_regular) = strain_times(&stream(32, 120.0, 150.0));
        let (fast, fast_regular) = strain_times(&stream(32, 60.0, 150.0));

        let slow_ratio = slow[20] / slow_regular[20];
        let fast_ratio = fast[20] / fast_regular[20];

        assert!(fast_ratio < slow_ratio, "{fast_ratio} vs {slow_ratio}");
    }
}
