use std::cmp;

/// While generating remaining hitresults, decide how they should be
/// distributed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum HitResultPriority {
    /// Prioritize good hitresults over bad ones
    #[default]
    BestCase,
    /// Prioritize bad hitresults over good ones
    WorstCase,
}

/// Hitresults as specified by the user, possibly incomplete.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct HitResultInput {
    pub n300: Option<u32>,
    pub n100: Option<u32>,
    pub n50: Option<u32>,
    pub misses: Option<u32>,
    /// Accuracy between `0.0` and `1.0`.
    pub acc: Option<f64>,
    pub priority: HitResultPriority,
}

/// A complete set of hitresults.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct HitResults {
    pub n300: u32,
    pub n100: u32,
    pub n50: u32,
    pub misses: u32,
}

impl HitResultInput {
    /// Fill in missing hitresults so that they add up to `n_objects` and
    /// match the accuracy as closely as possible.
    #[allow(clippy::too_many_lines)]
    pub fn generate(&self, n_objects: u32) -> HitResults {
        let priority = self.priority;

        let misses = self.misses.map_or(0, |n| n.min(n_objects));
        let n_remaining = n_objects - misses;

        let mut n300 = self.n300.map_or(0, |n| n.min(n_remaining));
        let mut n100 = self.n100.map_or(0, |n| n.min(n_remaining - n300));
        let mut n50 = self.n50.map_or(0, |n| n.min(n_remaining - n300 - n100));

        if let Some(acc) = self.acc {
            let target_total = acc * f64::from(6 * n_objects);

            match (self.n300, self.n100, self.n50) {
                (Some(_), Some(_), Some(_)) => {
                    let remaining = n_objects.saturating_sub(n300 + n100 + n50 + misses);

                    match priority {
                        HitResultPriority::BestCase => n300 += remaining,
                        HitResultPriority::WorstCase => n50 += remaining,
                    }
                }
                (Some(_), Some(_), None) => n50 = n_objects.saturating_sub(n300 + n100 + misses),
                (Some(_), None, Some(_)) => n100 = n_objects.saturating_sub(n300 + n50 + misses),
                (None, Some(_), Some(_)) => n300 = n_objects.saturating_sub(n100 + n50 + misses),
                (Some(_), None, None) => {
                    let mut best_dist = f64::MAX;
                    let n_remaining = n_remaining - n300;

                    let raw_n100 = target_total - f64::from(n_remaining + 6 * n300);
                    let min_n100 = n_remaining.min(raw_n100.floor() as u32);
                    let max_n100 = n_remaining.min(raw_n100.ceil() as u32);

                    for new100 in min_n100..=max_n100 {
                        let new50 = n_remaining - new100;
                        let dist = (acc - accuracy(n300, new100, new50, misses)).abs();

                        if dist < best_dist {
                            best_dist = dist;
                            n100 = new100;
                            n50 = new50;
                        }
                    }
                }
                (None, Some(_), None) => {
                    let mut best_dist = f64::MAX;
                    let n_remaining = n_remaining - n100;

                    let raw_n300 = (target_total - f64::from(n_remaining + 2 * n100)) / 5.0;
                    let min_n300 = n_remaining.min(raw_n300.floor() as u32);
                    let max_n300 = n_remaining.min(raw_n300.ceil() as u32);

                    for new300 in min_n300..=max_n300 {
                        let new50 = n_remaining - new300;
                        let dist = (acc - accuracy(new300, n100, new50, misses)).abs();

                        if dist < best_dist {
                            best_dist = dist;
                            n300 = new300;
                            n50 = new50;
                        }
                    }
                }
                (None, None, Some(_)) => {
                    let mut best_dist = f64::MAX;
                    let n_remaining = n_remaining - n50;

                    let raw_n300 =
                        (target_total + f64::from(2 * misses + n50) - f64::from(2 * n_objects))
                            / 4.0;

                    let min_n300 = n_remaining.min(raw_n300.floor() as u32);
                    let max_n300 = n_remaining.min(raw_n300.ceil() as u32);

                    for new300 in min_n300..=max_n300 {
                        let new100 = n_remaining - new300;
                        let dist = (acc - accuracy(new300, new100, n50, misses)).abs();

                        if dist < best_dist {
                            best_dist = dist;
                            n300 = new300;
                            n100 = new100;
                        }
                    }
                }
                (None, None, None) => {
                    let mut best_dist = f64::MAX;

                    let raw_n300 = (target_total - f64::from(n_remaining)) / 5.0;
                    let min_n300 = cmp::min(n_remaining, raw_n300.floor() as u32);
                    let max_n300 = cmp::min(n_remaining, raw_n300.ceil() as u32);

                    for new300 in min_n300..=max_n300 {
                        let raw_n100 = target_total - f64::from(n_remaining + 5 * new300);
                        let min_n100 = cmp::min(raw_n100.floor() as u32, n_remaining - new300);
                        let max_n100 = cmp::min(raw_n100.ceil() as u32, n_remaining - new300);

                        for new100 in min_n100..=max_n100 {
                            let new50 = n_remaining - new300 - new100;
                            let dist = (acc - accuracy(new300, new100, new50, misses)).abs();

                            if dist < best_dist {
                                best_dist = dist;
                                n300 = new300;
                                n100 = new100;
                                n50 = new50;
                            }
                        }
                    }

                    match priority {
                        HitResultPriority::BestCase => {
                            // Shift n50 to n100 by sacrificing n300
                            let n = n300.min(n50 / 4);
                            n300 -= n;
                            n100 += 5 * n;
                            n50 -= 4 * n;
                        }
                        HitResultPriority::WorstCase => {
                            // Shift n100 to n50 by gaining n300
                            let n = n100 / 5;
                            n300 += n;
                            n100 -= 5 * n;
                            n50 += 4 * n;
                        }
                    }
                }
            }
        } else {
            let remaining = n_objects.saturating_sub(n300 + n100 + n50 + misses);

            match priority {
                HitResultPriority::BestCase => match (self.n300, self.n100, self.n50) {
                    (None, ..) => n300 = remaining,
                    (_, None, _) => n100 = remaining,
                    (.., None) => n50 = remaining,
                    _ => n300 += remaining,
                },
                HitResultPriority::WorstCase => match (self.n50, self.n100, self.n300) {
                    (None, ..) => n50 = remaining,
                    (_, None, _) => n100 = remaining,
                    (.., None) => n300 = remaining,
                    _ => n50 += remaining,
                },
            }
        }

        HitResults {
            n300,
            n100,
            n50,
            misses,
        }
    }
}

/// Clamp the combo into `[0, max_combo - misses - dropped]`.
pub(crate) fn clamp_combo(combo: Option<u32>, max_combo: u32, misses: u32, dropped: u32) -> u32 {
    let max_possible_combo = max_combo.saturating_sub(misses).saturating_sub(dropped);

    combo.map_or(max_possible_combo, |combo| combo.min(max_possible_combo))
}

/// Accuracy between `0.0` and `1.0` for the given hitresults.
pub(crate) fn accuracy(n300: u32, n100: u32, n50: u32, misses: u32) -> f64 {
    let total_hits = n300 + n100 + n50 + misses;

    if total_hits == 0 {
        return 0.0;
    }

    let numerator = 6 * n300 + 2 * n100 + n50;
    let denominator = 6 * total_hits;

    f64::from(numerator) / f64::from(denominator)
}

/// Miss penalty based on the amount of relatively difficult sections.
///
/// Misses are assumed to happen on the hardest parts so maps with few hard
/// sections are punished more.
pub(crate) fn strain_count_miss_penalty(miss_count: f64, difficult_strain_count: f64) -> f64 {
    // Below one difficult strain the penalty approaches zero
    let strain_factor = 4.0 * difficult_strain_count.max(1.0).ln().powf(0.94);

    0.96 / ((miss_count / strain_factor) + 1.0)
}

/// Penalty relative to the total amount of hits with a 3% base reduction.
pub(crate) fn proportional_miss_penalty(miss_count: f64, total_hits: f64, exponent: f64) -> f64 {
    if miss_count <= 0.0 || total_hits <= 0.0 {
        return 1.0;
    }

    0.97 * (1.0 - (miss_count / total_hits).min(1.0).powf(0.775)).powf(miss_count.powf(exponent))
}

/// Ratio between the play's combo and the map's max combo.
pub(crate) fn combo_scaling_factor(combo: u32, max_combo: u32) -> f64 {
    if max_combo == 0 {
        1.0
    } else {
        (f64::from(combo).powf(0.8) / f64::from(max_combo).powf(0.8)).min(1.0)
    }
}

/// Slider judgements of a play that are not part of its hitresults.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SliderBreaks {
    /// Slider ends that were not held until the end.
    pub end_drops: Option<u32>,
    /// Slider ticks and repeats that were missed.
    pub large_tick_misses: Option<u32>,
}

impl SliderBreaks {
    /// Combo that is lost without breaking it, i.e. through dropped ends
    /// and missed ticks.
    pub const fn lost_combo(&self) -> u32 {
        let end_drops = match self.end_drops {
            Some(drops) => drops,
            None => 0,
        };

        let tick_misses = match self.large_tick_misses {
            Some(misses) => misses,
            None => 0,
        };

        end_drops.saturating_add(tick_misses)
    }

    /// Amount of sliders that were not followed properly if the play
    /// reports any slider judgements.
    ///
    /// Slider head misses are not included since they are penalized on
    /// their own.
    const fn improperly_followed(&self) -> Option<u32> {
        if self.end_drops.is_none() && self.large_tick_misses.is_none() {
            None
        } else {
            Some(self.lost_combo())
        }
    }
}

/// Misses plus an estimate of the slider breaks that are hidden in the
/// combo.
///
/// Known dropped slider ends replace the slider-count based estimate of
/// the full combo. Known tick misses limit the amount of breaks since only
/// they and regular misses break combo.
pub(crate) fn effective_miss_count(
    map_max_combo: u32,
    n_sliders: u32,
    combo: u32,
    imperfect_hits: u32,
    misses: u32,
    breaks: SliderBreaks,
) -> f64 {
    let mut combo_based_miss_count = 0.0;

    if n_sliders > 0 {
        let full_combo_threshold = match breaks.end_drops {
            Some(drops) => f64::from(map_max_combo.saturating_sub(drops)),
            None => f64::from(map_max_combo) - 0.1 * f64::from(n_sliders),
        };

        if f64::from(combo) < full_combo_threshold {
            combo_based_miss_count = full_combo_threshold / f64::from(combo).max(1.0);
        }
    }

    let max_breaks = match breaks.large_tick_misses {
        Some(tick_misses) => misses.saturating_add(tick_misses),
        None => imperfect_hits,
    };

    combo_based_miss_count
        .min(f64::from(max_breaks))
        .max(f64::from(misses))
}

/// Factor between `slider_factor` and `1.0` that scales difficulty down if
/// difficult sliders were likely not followed properly.
///
/// Without slider judgements, all missing combo is assumed to stem from
/// dropped difficult sliders.
pub(crate) fn slider_nerf_factor(
    slider_factor: f64,
    difficult_slider_count: f64,
    imperfect_hits: u32,
    missing_combo: u32,
    breaks: SliderBreaks,
) -> f64 {
    if difficult_slider_count <= 0.0 {
        return 1.0;
    }

    let improperly_followed = breaks
        .improperly_followed()
        .unwrap_or_else(|| cmp::min(imperfect_hits, missing_combo));

    let estimate_improperly_followed_difficult_sliders =
        f64::from(improperly_followed).clamp(0.0, difficult_slider_count);

    (1.0 - slider_factor)
        * (1.0 - estimate_improperly_followed_difficult_sliders / difficult_slider_count).powf(3.0)
        + slider_factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_remaining_with_300s() {
        let input = HitResultInput {
            n100: Some(5),
            misses: Some(2),
            ..Default::default()
        };

        let results = input.generate(100);

        assert_eq!(
            results,
            HitResults {
                n300: 93,
                n100: 5,
                n50: 0,
                misses: 2
            }
        );
    }

    #[test]
    fn worst_case_fills_50s() {
        let input = HitResultInput {
            n300: Some(50),
            priority: HitResultPriority::WorstCase,
            ..Default::default()
        };

        let results = input.generate(100);
        assert_eq!(results.n50, 50);
    }

    #[test]
    fn matches_accuracy() {
        let input = HitResultInput {
            acc: Some(0.95),
            misses: Some(1),
            ..Default::default()
        };

        let results = input.generate(500);
        let sum = results.n300 + results.n100 + results.n50 + results.misses;
        assert_eq!(sum, 500);

        let acc = accuracy(results.n300, results.n100, results.n50, results.misses);
        assert!((acc - 0.95).abs() < 0.001);
    }

    #[test]
    fn oversized_inputs_are_clamped() {
        let input = HitResultInput {
            n300: Some(80),
            n100: Some(80),
            misses: Some(500),
            acc: Some(0.5),
            ..Default::default()
        };

        let results = input.generate(100);
        assert_eq!(results.misses, 100);
        assert_eq!(results.n300 + results.n100 + results.n50, 0);
    }

    #[test]
    fn combo_is_clamped() {
        assert_eq!(clamp_combo(None, 500, 2, 3), 495);
        assert_eq!(clamp_combo(Some(600), 500, 0, 0), 500);
        assert_eq!(clamp_combo(Some(100), 500, 10, 0), 100);
        assert_eq!(clamp_combo(Some(100), 5, 10, 0), 0);
    }

    #[test]
    fn strain_count_penalty() {
        assert!(strain_count_miss_penalty(3.0, 0.5).abs() < f64::EPSILON);

        let penalty = strain_count_miss_penalty(1.0, 100.0);
        assert!(penalty > 0.0 && penalty < 0.96);
    }

    #[test]
    fn slider_nerf() {
        let unknown = SliderBreaks::default();

        assert!((slider_nerf_factor(0.8, 0.0, 10, 10, unknown) - 1.0).abs() < f64::EPSILON);
        assert!((slider_nerf_factor(0.8, 20.0, 0, 50, unknown) - 1.0).abs() < f64::EPSILON);
        assert!((slider_nerf_factor(0.8, 20.0, 50, 50, unknown) - 0.8).abs() < f64::EPSILON);

        let partial = slider_nerf_factor(0.8, 20.0, 5, 50, unknown);
        assert!(partial > 0.8 && partial < 1.0);
    }

    #[test]
    fn slider_nerf_uses_known_breaks() {
        let clean = SliderBreaks {
            end_drops: Some(0),
            large_tick_misses: Some(0),
        };

        // Imperfect hits on circles don't nerf sliders that were followed
        assert!((slider_nerf_factor(0.8, 20.0, 50, 50, clean) - 1.0).abs() < f64::EPSILON);

        let tick_misses = SliderBreaks {
            end_drops: None,
            large_tick_misses: Some(8),
        };

        let with_ends = SliderBreaks {
            end_drops: Some(4),
            ..tick_misses
        };

        let ticks_only = slider_nerf_factor(0.8, 20.0, 0, 0, tick_misses);
        let both = slider_nerf_factor(0.8, 20.0, 0, 0, with_ends);

        assert!(ticks_only > 0.8 && ticks_only < 1.0);
        assert!(both < ticks_only);
        assert_eq!(with_ends.lost_combo(), 12);
    }

    #[test]
    fn effective_misses_from_combo() {
        let unknown = SliderBreaks::default();

        // Full combo
        assert_eq!(effective_miss_count(900, 150, 900, 10, 0, unknown), 0.0);

        // Breaks are limited by imperfect hits
        let estimated = effective_miss_count(900, 150, 300, 2, 0, unknown);
        assert!((estimated - 2.0).abs() < f64::EPSILON);

        // Known tick misses are the only other way to break combo
        let ticks = SliderBreaks {
            end_drops: Some(0),
            large_tick_misses: Some(1),
        };

        let with_ticks = effective_miss_count(900, 150, 300, 20, 1, ticks);
        assert!((with_ticks - 2.0).abs() < f64::EPSILON);

        // Dropped ends lower the full combo threshold
        let drops = SliderBreaks {
            end_drops: Some(20),
            large_tick_misses: None,
        };

        assert_eq!(effective_miss_count(900, 150, 880, 10, 0, drops), 0.0);
        assert!(effective_miss_count(900, 150, 880, 10, 0, unknown) > 0.0);
    }
}
