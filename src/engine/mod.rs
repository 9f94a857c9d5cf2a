//! Launch state machine and frame-driven animation.
//!
//! A launch cycle always walks `Idle -> Computed -> Animating -> Complete`.
//! The host supplies time through a [`Clock`], runs frames requested through a
//! [`FrameScheduler`], and receives exactly one [`SimulationRecord`] per
//! finished flight through a [`FlightRecorder`].

pub mod clock;
pub mod scheduler;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::config::LabConfig;
use crate::core::ballistics::{DisplayMetrics, FlightMetrics, LaunchParameters};
use crate::core::trajectory::{DEFAULT_SAMPLE_COUNT, TrajectorySample};
use crate::core::window::{Canvas, PixelPoint, ViewportMargins, ViewportScale};

pub use clock::Clock;
pub use scheduler::{FrameRequest, FrameScheduler};

pub const DEFAULT_DURATION_CAP_MS: f64 = 3000.0;
pub const DEFAULT_MS_PER_FLIGHT_SECOND: f64 = 500.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub sample_count: usize,
    pub duration_cap_ms: f64,
    /// Animation milliseconds spent per simulated second of flight.
    pub ms_per_flight_second: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            duration_cap_ms: DEFAULT_DURATION_CAP_MS,
            ms_per_flight_second: DEFAULT_MS_PER_FLIGHT_SECOND,
        }
    }
}

impl AnimationSettings {
    pub fn duration_ms(&self, metrics: &FlightMetrics) -> f64 {
        (metrics.time_of_flight_s * self.ms_per_flight_second)
            .min(self.duration_cap_ms)
            .max(0.0)
    }
}

/// Payload handed to the persistence collaborator once a flight completes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub velocity: f64,
    pub angle: f64,
    pub height: f64,
    pub distance: f64,
}

impl SimulationRecord {
    pub fn from_metrics(metrics: &FlightMetrics) -> Self {
        Self {
            velocity: metrics.launch.speed_mps,
            angle: metrics.launch.angle_deg,
            height: metrics.max_height_m,
            distance: metrics.range_m,
        }
    }
}

/// Receives completed flights. Fire-and-forget: the engine neither waits for
/// nor inspects the outcome, so implementations log their own failures.
pub trait FlightRecorder {
    fn record(&mut self, record: SimulationRecord);
}

impl FlightRecorder for Vec<SimulationRecord> {
    fn record(&mut self, record: SimulationRecord) {
        self.push(record);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    Computed,
    Animating,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaunchOutcome {
    Accepted,
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationState {
    pub start_ms: f64,
    pub duration_ms: f64,
    pub progress: f64,
    pub position: PixelPoint,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUpdate {
    pub progress: f64,
    pub simulated_time_s: f64,
    pub position: PixelPoint,
    pub finished: bool,
}

#[derive(Clone, Debug)]
struct Flight {
    metrics: FlightMetrics,
    viewport: ViewportScale,
    sample: TrajectorySample,
}

pub struct TrajectoryEngine<C, S, R> {
    canvas: Canvas,
    margins: ViewportMargins,
    settings: AnimationSettings,
    clock: C,
    scheduler: S,
    recorder: R,
    phase: EnginePhase,
    flight: Option<Flight>,
    animation: Option<AnimationState>,
    pending_frame: Option<FrameRequest>,
}

impl<C, S, R> TrajectoryEngine<C, S, R>
where
    C: Clock,
    S: FrameScheduler,
    R: FlightRecorder,
{
    pub fn new(config: &LabConfig, clock: C, scheduler: S, recorder: R) -> Self {
        Self {
            canvas: config.canvas,
            margins: config.viewport,
            settings: config.animation,
            clock,
            scheduler,
            recorder,
            phase: EnginePhase::Idle,
            flight: None,
            animation: None,
            pending_frame: None,
        }
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        self.phase == EnginePhase::Animating
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn metrics(&self) -> Option<&FlightMetrics> {
        self.flight.as_ref().map(|f| &f.metrics)
    }

    pub fn display_metrics(&self) -> Option<DisplayMetrics> {
        self.metrics().map(FlightMetrics::display)
    }

    pub fn viewport(&self) -> Option<&ViewportScale> {
        self.flight.as_ref().map(|f| &f.viewport)
    }

    pub fn sample(&self) -> Option<&TrajectorySample> {
        self.flight.as_ref().map(|f| &f.sample)
    }

    pub fn animation(&self) -> Option<&AnimationState> {
        self.animation.as_ref()
    }

    /// Where the moving marker should be drawn; the launch point when idle.
    pub fn current_position(&self) -> PixelPoint {
        self.animation
            .map_or_else(|| self.canvas.origin(), |a| a.position)
    }

    pub fn pending_frame(&self) -> Option<FrameRequest> {
        self.pending_frame
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    /// Computes metrics, viewport and path for `launch`, replacing whatever
    /// the previous cycle left behind. Ignored while a flight is animating.
    pub fn prepare(&mut self, launch: LaunchParameters) -> LaunchOutcome {
        if self.is_animating() {
            debug!("launch ignored: animation already in flight");
            return LaunchOutcome::Ignored;
        }

        self.reset_to_idle();

        let metrics = FlightMetrics::compute(launch);
        let viewport = ViewportScale::fit(
            metrics.range_m,
            metrics.max_height_m,
            &self.canvas,
            &self.margins,
        );
        let sample = TrajectorySample::generate(
            &metrics,
            &viewport,
            &self.canvas,
            self.settings.sample_count,
        );

        debug!(
            angle_deg = launch.angle_deg,
            speed_mps = launch.speed_mps,
            gravity_mps2 = launch.gravity_mps2,
            time_of_flight_s = metrics.time_of_flight_s,
            range_m = metrics.range_m,
            max_height_m = metrics.max_height_m,
            "flight computed"
        );

        self.flight = Some(Flight {
            metrics,
            viewport,
            sample,
        });
        self.phase = EnginePhase::Computed;
        LaunchOutcome::Accepted
    }

    /// Starts animating the computed flight and requests the first frame.
    pub fn start(&mut self) -> LaunchOutcome {
        if self.phase != EnginePhase::Computed {
            debug!(phase = ?self.phase, "start ignored: no computed flight waiting");
            return LaunchOutcome::Ignored;
        }
        let Some(flight) = self.flight.as_ref() else {
            return LaunchOutcome::Ignored;
        };

        let duration_ms = self.settings.duration_ms(&flight.metrics);
        self.animation = Some(AnimationState {
            start_ms: self.clock.now_ms(),
            duration_ms,
            progress: 0.0,
            position: self.canvas.origin(),
        });
        self.pending_frame = Some(self.scheduler.request_frame());
        self.phase = EnginePhase::Animating;
        debug!(duration_ms, "animation started");
        LaunchOutcome::Accepted
    }

    pub fn launch(&mut self, launch: LaunchParameters) -> LaunchOutcome {
        match self.prepare(launch) {
            LaunchOutcome::Accepted => self.start(),
            LaunchOutcome::Ignored => LaunchOutcome::Ignored,
        }
    }

    /// Frame callback. Advances the animation from the clock, schedules the
    /// next frame, and on the final frame hands the result to the recorder.
    pub fn on_frame(&mut self) -> Option<FrameUpdate> {
        if !self.is_animating() {
            return None;
        }
        self.pending_frame = None;

        let flight = self.flight.as_ref()?;
        let animation = self.animation.as_mut()?;

        let elapsed_ms = (self.clock.now_ms() - animation.start_ms).max(0.0);
        let progress = if animation.duration_ms > 0.0 {
            (elapsed_ms / animation.duration_ms).min(1.0)
        } else {
            1.0
        };
        // A clock stepping backwards must not rewind the marker.
        let progress = progress.max(animation.progress);

        let simulated_time_s = progress * flight.metrics.time_of_flight_s;
        let (x, y) = flight.metrics.position_at(simulated_time_s);
        let position = flight.viewport.to_canvas(x, y, &self.canvas);

        animation.progress = progress;
        animation.position = position;
        trace!(progress, x = position.x, y = position.y, "frame");

        let finished = progress >= 1.0;
        if finished {
            self.phase = EnginePhase::Complete;
            let record = SimulationRecord::from_metrics(&flight.metrics);
            info!(
                velocity = record.velocity,
                angle = record.angle,
                distance = record.distance,
                height = record.height,
                "flight complete"
            );
            self.recorder.record(record);
        } else {
            self.pending_frame = Some(self.scheduler.request_frame());
        }

        Some(FrameUpdate {
            progress,
            simulated_time_s,
            position,
            finished,
        })
    }

    /// Host view is going away: cancel the outstanding frame and drop the
    /// cycle without recording anything.
    pub fn teardown(&mut self) {
        if self.is_animating() {
            debug!("animation cancelled by teardown");
        }
        self.reset_to_idle();
    }

    fn reset_to_idle(&mut self) {
        if let Some(request) = self.pending_frame.take() {
            self.scheduler.cancel_frame(request);
        }
        self.animation = None;
        self.flight = None;
        self.phase = EnginePhase::Idle;
    }
}
