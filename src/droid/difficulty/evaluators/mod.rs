pub use self::{
    aim::AimEvaluator, flashlight::FlashlightEvaluator, reading::ReadingEvaluator,
    rhythm::RhythmEvaluator, tap::TapEvaluator, visual::VisualEvaluator,
};

mod aim;
mod flashlight;
mod reading;
mod rhythm;
mod tap;
mod visual;

const NORMALIZED_RADIUS: f64 = crate::any::difficulty::cursor::NORMALIZED_RADIUS as f64;
const NORMALIZED_DIAMETER: f64 = NORMALIZED_RADIUS * 2.0;
