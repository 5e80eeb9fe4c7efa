pub use self::{
    aim::AimEvaluator, flashlight::FlashlightEvaluator, rhythm::RhythmEvaluator,
    speed::SpeedEvaluator,
};

mod aim;
mod flashlight;
mod rhythm;
mod speed;

const NORMALIZED_RADIUS: f64 = crate::any::difficulty::cursor::NORMALIZED_RADIUS as f64;
const NORMALIZED_DIAMETER: f64 = NORMALIZED_RADIUS * 2.0;
