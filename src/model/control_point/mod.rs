pub use self::{difficulty::DifficultyPoint, timing::TimingPoint};

pub(crate) use self::{difficulty::difficulty_point_at, timing::timing_point_at};

mod difficulty;
mod timing;
