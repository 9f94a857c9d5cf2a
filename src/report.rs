use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use crate::core::ballistics::FlightMetrics;
use crate::core::trajectory::physical_samples;
use crate::core::window::{Canvas, ViewportMargins, ViewportScale};
use crate::error::{LabError, Result};

pub const DEFAULT_CHART_SIZE: (u32, u32) = (960, 540);

/// Data needed to draw one flight in physical units.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartData {
    pub path: Vec<(f64, f64)>,
    pub apex: (f64, f64),
    pub landing: (f64, f64),
    pub x_max: f64,
    pub y_max: f64,
}

impl ChartData {
    pub fn from_metrics(metrics: &FlightMetrics, sample_count: usize, margins: &ViewportMargins) -> Self {
        // Only the view extents matter here, so any canvas will do.
        let view = ViewportScale::fit(
            metrics.range_m,
            metrics.max_height_m,
            &Canvas::default(),
            margins,
        );
        let path = physical_samples(metrics, sample_count)
            .map(|(x, y)| (x, y.max(0.0)))
            .collect();

        Self {
            path,
            apex: (metrics.range_m / 2.0, metrics.max_height_m),
            landing: (metrics.range_m, 0.0),
            x_max: view.view_width_m,
            y_max: view.view_height_m,
        }
    }
}

fn render_error<E: std::fmt::Display>(err: E) -> LabError {
    LabError::Render(err.to_string())
}

/// Writes an SVG chart of the trajectory with apex and landing markers.
pub fn render_svg(
    path: &Path,
    metrics: &FlightMetrics,
    sample_count: usize,
    margins: &ViewportMargins,
    size: (u32, u32),
) -> Result<()> {
    let data = ChartData::from_metrics(metrics, sample_count, margins);
    let launch = metrics.launch;
    let shown = metrics.display();

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let caption = format!(
        "v0 = {:.1} m/s, angle = {:.1} deg, g = {:.2} m/s^2",
        launch.speed_mps, launch.angle_deg, launch.gravity_mps2
    );
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 22))
        .margin(16)
        .x_label_area_size(40)
        .y_label_area_size(56)
        .build_cartesian_2d(0.0..data.x_max, 0.0..data.y_max)
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .x_desc("Distance (m)")
        .y_desc("Height (m)")
        .draw()
        .map_err(render_error)?;

    chart
        .draw_series(LineSeries::new(data.path.iter().copied(), BLUE.stroke_width(2)))
        .map_err(render_error)?;

    chart
        .draw_series([data.apex, data.landing].into_iter().map(|p| Circle::new(p, 5, RED.filled())))
        .map_err(render_error)?;

    chart
        .draw_series(std::iter::once(Text::new(
            format!("H = {:.2} m", shown.max_height_m),
            data.apex,
            ("sans-serif", 16),
        )))
        .map_err(render_error)?;
    chart
        .draw_series(std::iter::once(Text::new(
            format!("R = {:.2} m, T = {:.2} s", shown.range_m, shown.time_of_flight_s),
            data.landing,
            ("sans-serif", 16),
        )))
        .map_err(render_error)?;

    root.present().map_err(render_error)?;
    info!(path = %path.display(), "trajectory chart written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::core::ballistics::compute_flight_metrics;

    #[test]
    fn chart_bounds_leave_margin_above_the_apex() {
        let metrics = compute_flight_metrics(25.0, 45.0, 9.8);
        let data = ChartData::from_metrics(&metrics, 50, &ViewportMargins::default());

        assert_eq!(data.path.len(), 51);
        assert_relative_eq!(data.x_max, metrics.range_m * 1.2);
        assert_relative_eq!(data.y_max, metrics.max_height_m * 1.5);
        assert!(data.path.iter().all(|(_, y)| *y >= 0.0 && *y <= data.y_max));
    }

    #[test]
    fn flat_launch_still_has_a_visible_frame() {
        let metrics = compute_flight_metrics(25.0, 0.0, 9.8);
        let data = ChartData::from_metrics(&metrics, 10, &ViewportMargins::default());

        assert_eq!(data.x_max, 10.0);
        assert_eq!(data.y_max, 10.0);
        assert_eq!(data.landing, (0.0, 0.0));
    }
}
