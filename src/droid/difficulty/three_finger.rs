use crate::droid::attributes::HighStrainSection;

/// Tap strain from which a section may be three-fingered.
const STRAIN_THRESHOLD: f64 = 175.0;
const MIN_SECTION_OBJECTS: usize = 5;
/// Sections closer than this many milliseconds are merged.
const MERGE_THRESHOLD: f64 = 2000.0;

/// Sections of consecutive objects whose tap strain is high enough that
/// they may have been tapped with more than two fingers.
///
/// All slices are in processing order and `first_object_index` is the hit
/// object index of their first element.
pub fn possible_three_fingered_sections(
    start_times: &[f64],
    delta_times: &[f64],
    strains: &[f64],
    first_object_index: usize,
) -> Vec<HighStrainSection> {
    let len = start_times.len().min(delta_times.len()).min(strains.len());

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    let mut section_start = None;

    let mut push_range = |first: usize, last: usize| {
        if last + 1 - first < MIN_SECTION_OBJECTS {
            return;
        }

        match ranges.last_mut() {
            Some(prev) if start_times[first] - start_times[prev.1] < MERGE_THRESHOLD => {
                prev.1 = last;
            }
            _ => ranges.push((first, last)),
        }
    };

    for i in 0..len {
        let above = strains[i] >= STRAIN_THRESHOLD;
        let slowed_down = i > 0 && delta_times[i] >= 2.0 * delta_times[i - 1];

        match section_start {
            Some(first) if !above || slowed_down => {
                push_range(first, i - 1);
                section_start = above.then_some(i);
            }
            None if above => section_start = Some(i),
            _ => {}
        }
    }

    if let Some(first) = section_start {
        push_range(first, len - 1);
    }

    ranges
        .into_iter()
        .map(|(first, last)| {
            let sum: f64 = strains[first..=last]
                .iter()
                .map(|strain| strain / STRAIN_THRESHOLD)
                .sum();

            HighStrainSection {
                first_object_index: first + first_object_index,
                last_object_index: last + first_object_index,
                sum_strain: sum.powf(0.75),
            }
        })
        .collect()
}
