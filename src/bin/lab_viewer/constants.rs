use macroquad::prelude::Color;

pub const INITIAL_WINDOW_WIDTH: i32 = 1600;
pub const INITIAL_WINDOW_HEIGHT: i32 = 900;
pub const MSAA_SAMPLES: i32 = 4;

pub const CANVAS_LEFT: f32 = 420.0;
pub const CANVAS_TOP: f32 = 140.0;
pub const CANVAS_WIDTH: f64 = 1120.0;
pub const CANVAS_HEIGHT: f64 = 560.0;
pub const CANVAS_PADDING: f64 = 40.0;

pub const TITLE_Y: f32 = 46.0;
pub const CONTROLS_Y: f32 = 92.0;

pub const MIN_ANGLE_DEG: f64 = 0.0;
pub const MAX_ANGLE_DEG: f64 = 90.0;
pub const MIN_VELOCITY_MPS: f64 = 1.0;
pub const MAX_VELOCITY_MPS: f64 = 100.0;
pub const ANGLE_KEY_RATE_DEG: f64 = 30.0;
pub const VELOCITY_KEY_RATE_MPS: f64 = 20.0;

pub const HISTORY_PANEL_ROWS: usize = 5;
pub const DASH_EVERY: usize = 2;
pub const MARKER_RADIUS: f32 = 8.0;

pub const CANVAS_BG: Color = Color::new(0.04, 0.055, 0.15, 1.0);
pub const GRID_COLOR: Color = Color::new(0.30, 0.46, 0.99, 0.30);
pub const PATH_COLOR: Color = Color::new(0.30, 0.46, 0.99, 0.85);
pub const MARKER_COLOR: Color = Color::new(0.0, 0.83, 0.67, 1.0);
