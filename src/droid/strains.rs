use crate::{any::difficulty::Difficulty, model::beatmap::Beatmap};

use super::difficulty::{skills::DroidSkills, DifficultyValues};

/// The result of calculating the strains on an osu!droid map.
///
/// Suitable to plot the difficulty of a map over time.
#[derive(Clone, Debug, PartialEq)]
pub struct DroidStrains {
    /// Strain peaks of the aim skill.
    pub aim: Vec<f64>,
    /// Strain peaks of the aim skill without sliders.
    pub aim_no_sliders: Vec<f64>,
    /// Strain peaks of the tap skill.
    pub tap: Vec<f64>,
    /// Strain peaks of the rhythm skill.
    pub rhythm: Vec<f64>,
    /// Strain peaks of the flashlight skill.
    pub flashlight: Vec<f64>,
    /// Strain peaks of the visual skill.
    pub visual: Vec<f64>,
    /// Strain peaks of the reading skill.
    pub reading: Vec<f64>,
}

impl DroidStrains {
    /// Time between two strains in ms.
    pub const SECTION_LEN: f64 = 400.0;
}

pub fn strains(difficulty: &Difficulty, map: &Beatmap) -> DroidStrains {
    let DifficultyValues {
        skills:
            DroidSkills {
                aim,
                aim_no_sliders,
                tap,
                flashlight,
                visual,
                reading,
                ..
            },
        rhythm,
        attrs: _,
    } = DifficultyValues::calculate(difficulty, map);

    DroidStrains {
        aim: aim.get_curr_strain_peaks(),
        aim_no_sliders: aim_no_sliders.get_curr_strain_peaks(),
        tap: tap.get_curr_strain_peaks(),
        rhythm: rhythm.get_curr_strain_peaks(),
        flashlight: flashlight.get_curr_strain_peaks(),
        visual: visual.get_curr_strain_peaks(),
        reading: reading.get_curr_strain_peaks(),
    }
}
