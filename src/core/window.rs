use serde::{Deserialize, Serialize};

pub const RANGE_MARGIN_FACTOR: f64 = 1.2;
pub const HEIGHT_MARGIN_FACTOR: f64 = 1.5;
pub const MIN_VIEW_SPAN_M: f64 = 10.0;

pub const GRID_DIVISIONS: usize = 5;

/// Fixed drawing surface in pixels. The drawable plot area is the canvas
/// shrunk by `padding` on every side.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 360.0,
            height: 250.0,
            padding: 30.0,
        }
    }
}

impl Canvas {
    pub fn new(width: f64, height: f64, padding: f64) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    pub fn plot_width(&self) -> f64 {
        (self.width - 2.0 * self.padding).max(1.0)
    }

    pub fn plot_height(&self) -> f64 {
        (self.height - 2.0 * self.padding).max(1.0)
    }

    /// Canvas position of the physical origin (launch point on the ground).
    pub fn origin(&self) -> PixelPoint {
        PixelPoint::new(self.padding, self.height - self.padding)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// How much empty space the view keeps around a trajectory.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportMargins {
    pub range_factor: f64,
    pub height_factor: f64,
    pub min_span_m: f64,
}

impl Default for ViewportMargins {
    fn default() -> Self {
        Self {
            range_factor: RANGE_MARGIN_FACTOR,
            height_factor: HEIGHT_MARGIN_FACTOR,
            min_span_m: MIN_VIEW_SPAN_M,
        }
    }
}

/// Per-axis meters-to-pixels mapping. The axes are scaled independently so the
/// trajectory fills the plot area instead of keeping its true aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ViewportScale {
    pub scale_x: f64,
    pub scale_y: f64,
    pub view_width_m: f64,
    pub view_height_m: f64,
}

impl ViewportScale {
    pub fn fit(range_m: f64, max_height_m: f64, canvas: &Canvas, margins: &ViewportMargins) -> Self {
        // A non-positive floor would let a degenerate flight divide by zero.
        let floor = margins.min_span_m.max(f64::MIN_POSITIVE);
        let view_width_m = (range_m * margins.range_factor).max(floor);
        let view_height_m = (max_height_m * margins.height_factor).max(floor);

        Self {
            scale_x: canvas.plot_width() / view_width_m,
            scale_y: canvas.plot_height() / view_height_m,
            view_width_m,
            view_height_m,
        }
    }

    /// Maps physical meters to canvas pixels with a Y flip. Heights below the
    /// ground line are drawn on it.
    pub fn to_canvas(&self, x_m: f64, y_m: f64, canvas: &Canvas) -> PixelPoint {
        to_canvas_coordinates(
            x_m,
            y_m,
            self.scale_x,
            self.scale_y,
            canvas.padding,
            canvas.height,
        )
    }
}

pub fn compute_viewport_scale(
    range_m: f64,
    max_height_m: f64,
    canvas_width: f64,
    canvas_height: f64,
    padding: f64,
) -> ViewportScale {
    ViewportScale::fit(
        range_m,
        max_height_m,
        &Canvas::new(canvas_width, canvas_height, padding),
        &ViewportMargins::default(),
    )
}

pub fn to_canvas_coordinates(
    x_m: f64,
    y_m: f64,
    scale_x: f64,
    scale_y: f64,
    padding: f64,
    canvas_height: f64,
) -> PixelPoint {
    let y_m = y_m.max(0.0);
    PixelPoint::new(
        padding + x_m * scale_x,
        canvas_height - padding - y_m * scale_y,
    )
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLine {
    pub from: PixelPoint,
    pub to: PixelPoint,
}

/// Evenly spaced horizontal then vertical lines spanning the plot area.
pub fn grid_lines(canvas: &Canvas, divisions: usize) -> Vec<GridLine> {
    let divisions = divisions.max(1);
    let left = canvas.padding;
    let top = canvas.padding;
    let right = canvas.width - canvas.padding;
    let bottom = canvas.height - canvas.padding;
    let step_y = (bottom - top) / divisions as f64;
    let step_x = (right - left) / divisions as f64;

    let horizontal = (0..=divisions).map(|i| {
        let y = top + step_y * i as f64;
        GridLine {
            from: PixelPoint::new(left, y),
            to: PixelPoint::new(right, y),
        }
    });
    let vertical = (0..=divisions).map(|i| {
        let x = left + step_x * i as f64;
        GridLine {
            from: PixelPoint::new(x, top),
            to: PixelPoint::new(x, bottom),
        }
    });

    horizontal.chain(vertical).collect()
}
