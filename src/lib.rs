//! Projectile-motion lab: closed-form flight metrics, canvas mapping, path
//! sampling and a clock-driven launch animation, plus the history store and
//! chart rendering used by the command-line and viewer front ends.

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod history;
pub mod report;

pub use crate::config::LabConfig;
pub use crate::core::ballistics::{DisplayMetrics, FlightMetrics, LaunchParameters};
pub use crate::core::trajectory::TrajectorySample;
pub use crate::core::window::{Canvas, PixelPoint, ViewportScale};
pub use crate::engine::clock::{Clock, ManualClock, SystemClock};
pub use crate::engine::scheduler::{FrameQueue, FrameRequest, FrameScheduler};
pub use crate::engine::{
    AnimationState, EnginePhase, FlightRecorder, FrameUpdate, LaunchOutcome, SimulationRecord,
    TrajectoryEngine,
};
pub use crate::error::{LabError, Result};
pub use crate::history::{HistoryEntry, SimulationHistory};
