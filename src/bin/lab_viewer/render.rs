use macroquad::prelude::*;
use parabola_lab::core::window::{GRID_DIVISIONS, PixelPoint, grid_lines};
use parabola_lab::{Canvas, TrajectorySample};

use crate::constants::{
    CANVAS_BG, CANVAS_LEFT, CANVAS_TOP, DASH_EVERY, GRID_COLOR, MARKER_COLOR, MARKER_RADIUS,
    PATH_COLOR,
};

/// Engine canvas pixels to window pixels.
pub(crate) fn to_screen(point: PixelPoint) -> Vec2 {
    vec2(CANVAS_LEFT + point.x as f32, CANVAS_TOP + point.y as f32)
}

pub(crate) fn draw_ui_text(text: &str, x: f32, y: f32, font_size: u16, color: Color) {
    draw_text_ex(
        text,
        x,
        y,
        TextParams {
            font_size,
            color,
            ..Default::default()
        },
    );
}

pub(crate) fn draw_canvas(canvas: &Canvas) {
    draw_rectangle(
        CANVAS_LEFT,
        CANVAS_TOP,
        canvas.width as f32,
        canvas.height as f32,
        CANVAS_BG,
    );

    for line in grid_lines(canvas, GRID_DIVISIONS) {
        let from = to_screen(line.from);
        let to = to_screen(line.to);
        draw_line(from.x, from.y, to.x, to.y, 1.0, GRID_COLOR);
    }

    let ground_left = to_screen(canvas.origin());
    let ground_right = to_screen(PixelPoint::new(canvas.width - canvas.padding, canvas.origin().y));
    draw_line(
        ground_left.x,
        ground_left.y,
        ground_right.x,
        ground_right.y,
        2.0,
        LIGHTGRAY,
    );
}

/// Dashed polyline: every other segment of the sample is drawn.
pub(crate) fn draw_dashed_path(sample: &TrajectorySample) {
    let points = sample.points();
    if points.len() < 2 {
        return;
    }
    for (i, pair) in points.windows(2).enumerate() {
        if i % DASH_EVERY != 0 {
            continue;
        }
        let a = to_screen(pair[0]);
        let b = to_screen(pair[1]);
        draw_line(a.x, a.y, b.x, b.y, 2.0, PATH_COLOR);
    }
}

pub(crate) fn draw_marker(position: PixelPoint) {
    let p = to_screen(position);
    draw_circle(p.x, p.y, MARKER_RADIUS, MARKER_COLOR);
    draw_circle_lines(p.x, p.y, MARKER_RADIUS, 2.0, WHITE);
}
