use std::path::PathBuf;

use macroquad::time::get_time;
use parabola_lab::core::ballistics::{LaunchDefaults, LaunchParameters};
use parabola_lab::{Clock, FrameQueue, LabConfig, SimulationHistory, TrajectoryEngine};

/// Milliseconds since the window opened, as seen by the frame loop.
pub(crate) struct FrameClock;

impl Clock for FrameClock {
    fn now_ms(&self) -> f64 {
        get_time() * 1000.0
    }
}

pub(crate) type LabEngine = TrajectoryEngine<FrameClock, FrameQueue, SimulationHistory>;

pub(crate) struct ViewerState {
    pub(crate) engine: LabEngine,
    pub(crate) defaults: LaunchDefaults,
    pub(crate) angle_text: String,
    pub(crate) velocity_text: String,
    pub(crate) gravity_text: String,
    pub(crate) history_path: PathBuf,
    pub(crate) status_line: String,
}

impl ViewerState {
    pub(crate) fn new(config: &LabConfig, history: SimulationHistory) -> Self {
        let defaults = config.defaults;
        Self {
            engine: TrajectoryEngine::new(config, FrameClock, FrameQueue::new(), history),
            defaults,
            angle_text: defaults.angle_deg.to_string(),
            velocity_text: defaults.speed_mps.to_string(),
            gravity_text: defaults.gravity_mps2.to_string(),
            history_path: config.history.path.clone(),
            status_line: "Ready".to_string(),
        }
    }

    pub(crate) fn launch_parameters(&self) -> LaunchParameters {
        LaunchParameters::from_text(
            &self.angle_text,
            &self.velocity_text,
            &self.gravity_text,
            &self.defaults,
        )
    }
}
