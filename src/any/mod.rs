pub use self::{
    difficulty::{Difficulty, ModsDependent},
    performance::HitResultPriority,
};

pub mod difficulty;
pub(crate) mod deviation;
pub mod object;
pub mod performance;
mod stacking;
