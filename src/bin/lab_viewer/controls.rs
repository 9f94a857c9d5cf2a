use macroquad::prelude::*;
use macroquad::ui::{hash, root_ui, widgets};
use parabola_lab::EnginePhase;

use crate::constants::{
    ANGLE_KEY_RATE_DEG, MAX_ANGLE_DEG, MAX_VELOCITY_MPS, MIN_ANGLE_DEG, MIN_VELOCITY_MPS,
    VELOCITY_KEY_RATE_MPS,
};
use crate::state::ViewerState;

#[derive(Default, Clone, Copy)]
pub(crate) struct FrameActions {
    pub(crate) launch: bool,
    pub(crate) reset: bool,
    pub(crate) quit: bool,
}

impl FrameActions {
    pub(crate) fn merge(self, other: Self) -> Self {
        Self {
            launch: self.launch || other.launch,
            reset: self.reset || other.reset,
            quit: self.quit || other.quit,
        }
    }
}

pub(crate) fn hotkey_actions() -> FrameActions {
    FrameActions {
        launch: is_key_pressed(KeyCode::Space),
        reset: is_key_pressed(KeyCode::R),
        quit: is_key_pressed(KeyCode::Escape),
    }
}

pub(crate) fn draw_control_panel(state: &mut ViewerState) -> FrameActions {
    let animating = state.engine.is_animating();
    let mut actions = FrameActions::default();

    widgets::Window::new(hash!(), vec2(18.0, 140.0), vec2(360.0, 260.0))
        .label("Launch Settings")
        .ui(&mut *root_ui(), |ui| {
            ui.input_text(hash!(), "Angle (deg)", &mut state.angle_text);
            ui.input_text(hash!(), "Velocity (m/s)", &mut state.velocity_text);
            ui.input_text(hash!(), "Gravity (m/s^2)", &mut state.gravity_text);
            ui.separator();
            let launch_label = if animating {
                "Animating..."
            } else {
                "Launch (Space)"
            };
            if ui.button(None, launch_label) {
                actions.launch = true;
            }
            if ui.button(None, "Reset (R)") {
                actions.reset = true;
            }
            ui.label(
                None,
                &format!("State: {}", phase_text(state.engine.phase())),
            );
        });

    actions
}

/// Arrow keys nudge angle and velocity between launches.
pub(crate) fn apply_keyboard_adjustments(state: &mut ViewerState, frame_dt: f32) {
    if state.engine.is_animating() {
        return;
    }

    let dt = f64::from(frame_dt);
    let launch = state.launch_parameters();
    let mut angle = launch.angle_deg;
    let mut velocity = launch.speed_mps;
    let mut changed = false;

    if is_key_down(KeyCode::Up) {
        angle += ANGLE_KEY_RATE_DEG * dt;
        changed = true;
    }
    if is_key_down(KeyCode::Down) {
        angle -= ANGLE_KEY_RATE_DEG * dt;
        changed = true;
    }
    if is_key_down(KeyCode::Right) {
        velocity += VELOCITY_KEY_RATE_MPS * dt;
        changed = true;
    }
    if is_key_down(KeyCode::Left) {
        velocity -= VELOCITY_KEY_RATE_MPS * dt;
        changed = true;
    }

    if changed {
        state.angle_text = format!("{:.1}", angle.clamp(MIN_ANGLE_DEG, MAX_ANGLE_DEG));
        state.velocity_text = format!("{:.1}", velocity.clamp(MIN_VELOCITY_MPS, MAX_VELOCITY_MPS));
    }
}

pub(crate) fn phase_text(phase: EnginePhase) -> &'static str {
    match phase {
        EnginePhase::Idle => "Idle",
        EnginePhase::Computed => "Computed",
        EnginePhase::Animating => "Animating",
        EnginePhase::Complete => "Complete",
    }
}
