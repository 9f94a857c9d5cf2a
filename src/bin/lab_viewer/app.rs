use std::env;
use std::path::PathBuf;

use macroquad::prelude::*;
use parabola_lab::config::CONFIG_ENV_VAR;
use parabola_lab::core::window::Canvas;
use parabola_lab::{LabConfig, LaunchOutcome, SimulationHistory};
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use crate::constants::{
    CANVAS_HEIGHT, CANVAS_PADDING, CANVAS_WIDTH, INITIAL_WINDOW_HEIGHT, INITIAL_WINDOW_WIDTH,
    MSAA_SAMPLES,
};
use crate::controls::{FrameActions, apply_keyboard_adjustments, draw_control_panel, hotkey_actions};
use crate::hud::draw_hud;
use crate::render::{draw_canvas, draw_dashed_path, draw_marker};
use crate::state::ViewerState;

pub(crate) fn window_conf() -> Conf {
    Conf {
        window_title: "Projectile Motion Lab".to_string(),
        window_width: INITIAL_WINDOW_WIDTH,
        window_height: INITIAL_WINDOW_HEIGHT,
        high_dpi: true,
        sample_count: MSAA_SAMPLES,
        ..Default::default()
    }
}

fn load_config() -> LabConfig {
    let path = env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
    let mut config = match LabConfig::load_or_default(path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "could not load config, using defaults");
            LabConfig::default()
        }
    };
    config.canvas = viewer_canvas(config.canvas);
    config
}

/// The window layout owns the canvas size; a configured `[canvas]` table only
/// applies to the headless front ends.
fn viewer_canvas(configured: Canvas) -> Canvas {
    let canvas = Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT, CANVAS_PADDING);
    if configured != canvas && configured != Canvas::default() {
        debug!(
            configured_width = configured.width,
            configured_height = configured.height,
            configured_padding = configured.padding,
            width = canvas.width,
            height = canvas.height,
            padding = canvas.padding,
            "configured canvas ignored by the viewer"
        );
    }
    canvas
}

fn load_history(config: &LabConfig) -> SimulationHistory {
    SimulationHistory::load(&config.history.path).unwrap_or_else(|err| {
        warn!(%err, "could not read history, starting empty");
        SimulationHistory::new()
    })
}

fn apply_actions(state: &mut ViewerState, actions: FrameActions) {
    if actions.reset {
        state.engine.teardown();
        state.status_line = "Reset".to_string();
    }

    if actions.launch {
        let launch = state.launch_parameters();
        state.status_line = match state.engine.launch(launch) {
            LaunchOutcome::Accepted => format!(
                "Launched at {:.1} deg, {:.1} m/s, g = {:.2} m/s^2",
                launch.angle_deg, launch.speed_mps, launch.gravity_mps2
            ),
            LaunchOutcome::Ignored => "Still animating, launch ignored".to_string(),
        };
    }
}

fn step_animation(state: &mut ViewerState) {
    if state.engine.scheduler_mut().take_due().is_none() {
        return;
    }
    let Some(update) = state.engine.on_frame() else {
        return;
    };
    if !update.finished {
        return;
    }

    // Saving is fire-and-forget; the finished flight stays on screen either way.
    state.status_line = match state.engine.recorder().save(&state.history_path) {
        Ok(()) => "Flight complete, saved to history".to_string(),
        Err(err) => {
            warn!(%err, "could not write history file");
            "Flight complete".to_string()
        }
    };
}

pub(crate) async fn run() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config();
    let history = load_history(&config);
    let mut state = ViewerState::new(&config, history);

    loop {
        let frame_dt = get_frame_time();
        let screen_h = screen_height();

        let actions = hotkey_actions().merge(draw_control_panel(&mut state));
        if actions.quit {
            state.engine.teardown();
            break;
        }
        apply_actions(&mut state, actions);
        apply_keyboard_adjustments(&mut state, frame_dt);
        step_animation(&mut state);

        clear_background(Color::from_rgba(10, 14, 39, 255));
        draw_canvas(state.engine.canvas());
        if let Some(sample) = state.engine.sample() {
            draw_dashed_path(sample);
        }
        draw_marker(state.engine.current_position());
        draw_hud(&state, screen_h);

        next_frame().await;
    }
}
