use macroquad::prelude::*;

use crate::constants::{CANVAS_LEFT, CANVAS_TOP, CONTROLS_Y, HISTORY_PANEL_ROWS, TITLE_Y};
use crate::controls::phase_text;
use crate::render::draw_ui_text;
use crate::state::ViewerState;

pub(crate) fn draw_hud(state: &ViewerState, screen_h: f32) {
    draw_header_block();
    draw_metrics_block(state);
    draw_history_block(state);
    draw_ui_text(&state.status_line, 18.0, screen_h - 18.0, 20, GRAY);
}

fn draw_header_block() {
    draw_ui_text("Projectile Motion Lab", 18.0, TITLE_Y, 34, WHITE);
    draw_ui_text(
        "Controls: type angle/velocity/gravity | Up/Down angle | Left/Right velocity | Space launch | R reset | Esc quit",
        18.0,
        CONTROLS_Y,
        20,
        LIGHTGRAY,
    );
}

fn draw_metrics_block(state: &ViewerState) {
    let engine = &state.engine;
    let canvas = engine.canvas();
    let y = CANVAS_TOP + canvas.height as f32 + 36.0;

    let metrics_line = match engine.display_metrics() {
        Some(shown) => format!(
            "Distance: {:.2} m | Max height: {:.2} m | Time of flight: {:.2} s",
            shown.range_m, shown.max_height_m, shown.time_of_flight_s
        ),
        None => "Distance: - | Max height: - | Time of flight: -".to_string(),
    };
    draw_ui_text(&metrics_line, CANVAS_LEFT, y, 24, WHITE);

    let progress = engine.animation().map_or(0.0, |a| a.progress);
    draw_ui_text(
        &format!(
            "State: {} | Progress: {:.0}%",
            phase_text(engine.phase()),
            progress * 100.0
        ),
        CANVAS_LEFT,
        y + 30.0,
        20,
        LIGHTGRAY,
    );
}

fn draw_history_block(state: &ViewerState) {
    let history = state.engine.recorder();
    let x = 18.0;
    let mut y = 440.0;

    draw_ui_text("Recent simulations", x, y, 24, WHITE);
    y += 28.0;

    let recent = history.recent(HISTORY_PANEL_ROWS);
    if recent.is_empty() {
        draw_ui_text("No simulations yet", x, y, 18, GRAY);
        return;
    }
    for entry in recent {
        draw_ui_text(
            &format!(
                "{}  v={:.1} a={:.1} -> {:.2} m / {:.2} m",
                entry.timestamp.format("%H:%M:%S"),
                entry.record.velocity,
                entry.record.angle,
                entry.record.distance,
                entry.record.height
            ),
            x,
            y,
            18,
            LIGHTGRAY,
        );
        y += 24.0;
    }
}
