pub mod math;
pub mod misc;

pub use math::*;
pub use misc::*;
pub use noisy_float::prelude::*;
