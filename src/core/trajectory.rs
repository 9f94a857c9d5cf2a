
use crate::core::ballistics::FlightMetrics;
use crate::core::window::{Canvas, PixelPoint, ViewportScale};

pub const DEFAULT_SAMPLE_COUNT: usize = 100;

/// Physical (x, y) positions at `sample_count + 1` evenly spaced instants
/// from launch to landing.
pub fn physical_samples(
    metrics: &FlightMetrics,
    sample_count: usize,
) -> impl Iterator<Item = (f64, f64)> + use<> {
    let metrics = *metrics;
    let sample_count = sample_count.max(1);
    (0..=sample_count).map(move |i| {
        let t = (i as f64 / sample_count as f64) * metrics.time_of_flight_s;
        metrics.position_at(t)
    })
}

/// Canvas-space polyline of one flight, built once per launch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrajectorySample {
    points: Vec<PixelPoint>,
}

impl TrajectorySample {
    pub fn generate(
        metrics: &FlightMetrics,
        viewport: &ViewportScale,
        canvas: &Canvas,
        sample_count: usize,
    ) -> Self {
        let points = physical_samples(metrics, sample_count)
            .map(|(x, y)| viewport.to_canvas(x, y, canvas))
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[PixelPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<PixelPoint> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<PixelPoint> {
        self.points.last().copied()
    }

    /// SVG path data: a move to the launch point followed by line segments.
    pub fn to_path_data(&self) -> String {
        self.points
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let command = if i == 0 { 'M' } else { 'L' };
                format!("{command} {:.2} {:.2}", point.x, point.y)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn sample_trajectory(
    metrics: &FlightMetrics,
    viewport: &ViewportScale,
    canvas: &Canvas,
    sample_count: usize,
) -> TrajectorySample {
    TrajectorySample::generate(metrics, viewport, canvas, sample_count)
}
