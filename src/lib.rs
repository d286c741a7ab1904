pub mod bounds;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod geometry;
pub mod history;
pub mod hit;
pub mod placement;
pub mod play;
pub mod session;
pub mod timing;
pub mod utils;

pub use config::Settings;
pub use play::PlayPlugin;
pub use session::{Session, SessionSummary, Targets};
