use serde::{Deserialize, Serialize};

pub const EARTH_GRAVITY_MPS2: f64 = 9.8;
pub const DEFAULT_ANGLE_DEG: f64 = 45.0;
pub const DEFAULT_SPEED_MPS: f64 = 25.0;

pub const MIN_ANGLE_DEG: f64 = 0.0;
pub const MAX_ANGLE_DEG: f64 = 90.0;

/// Inputs outside these bounds fall back to defaults; within them every
/// derived metric stays finite.
pub const MAX_SPEED_MPS: f64 = 1.0e6;
pub const MIN_GRAVITY_MPS2: f64 = 1.0e-3;
pub const MAX_GRAVITY_MPS2: f64 = 1.0e4;

/// Fallback values substituted for launch fields that are empty, non-numeric
/// or outside their physical domain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchDefaults {
    pub angle_deg: f64,
    pub speed_mps: f64,
    pub gravity_mps2: f64,
}

impl Default for LaunchDefaults {
    fn default() -> Self {
        Self {
            angle_deg: DEFAULT_ANGLE_DEG,
            speed_mps: DEFAULT_SPEED_MPS,
            gravity_mps2: EARTH_GRAVITY_MPS2,
        }
    }
}

/// Launch inputs for a single flight. Always holds values inside the physical
/// domain: speed in (0, MAX_SPEED_MPS], gravity in [MIN_GRAVITY_MPS2,
/// MAX_GRAVITY_MPS2], angle within [0, 90] degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaunchParameters {
    pub angle_deg: f64,
    pub speed_mps: f64,
    pub gravity_mps2: f64,
}

impl Default for LaunchParameters {
    fn default() -> Self {
        Self::from_defaults(&LaunchDefaults::default())
    }
}

impl LaunchParameters {
    pub fn new(angle_deg: f64, speed_mps: f64, gravity_mps2: f64) -> Self {
        Self::with_defaults(angle_deg, speed_mps, gravity_mps2, &LaunchDefaults::default())
    }

    pub fn from_defaults(defaults: &LaunchDefaults) -> Self {
        Self {
            angle_deg: defaults.angle_deg.clamp(MIN_ANGLE_DEG, MAX_ANGLE_DEG),
            speed_mps: defaults.speed_mps,
            gravity_mps2: defaults.gravity_mps2,
        }
    }

    /// Numeric-or-default: non-finite values fall back, speed must lie in
    /// (0, MAX_SPEED_MPS] and gravity in [MIN_GRAVITY_MPS2, MAX_GRAVITY_MPS2],
    /// the angle is clamped into [0, 90].
    pub fn with_defaults(
        angle_deg: f64,
        speed_mps: f64,
        gravity_mps2: f64,
        defaults: &LaunchDefaults,
    ) -> Self {
        let angle_deg = if angle_deg.is_finite() {
            angle_deg
        } else {
            defaults.angle_deg
        };

        Self {
            angle_deg: angle_deg.clamp(MIN_ANGLE_DEG, MAX_ANGLE_DEG),
            speed_mps: within_or(speed_mps, f64::MIN_POSITIVE, MAX_SPEED_MPS, defaults.speed_mps),
            gravity_mps2: within_or(
                gravity_mps2,
                MIN_GRAVITY_MPS2,
                MAX_GRAVITY_MPS2,
                defaults.gravity_mps2,
            ),
        }
    }

    /// Builds parameters from raw text fields, substituting `defaults` for
    /// anything that does not parse as a number.
    pub fn from_text(angle: &str, speed: &str, gravity: &str, defaults: &LaunchDefaults) -> Self {
        Self::with_defaults(
            numeric_or(angle, defaults.angle_deg),
            numeric_or(speed, defaults.speed_mps),
            numeric_or(gravity, defaults.gravity_mps2),
            defaults,
        )
    }

    pub fn velocity_components(&self) -> (f64, f64) {
        let theta = self.angle_deg.to_radians();
        // cos(pi/2) is not exactly zero in floating point.
        let vx = if self.angle_deg >= MAX_ANGLE_DEG {
            0.0
        } else {
            self.speed_mps * theta.cos()
        };
        let vy = self.speed_mps * theta.sin();
        (vx, vy)
    }
}

fn numeric_or(text: &str, fallback: f64) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(fallback)
}

fn within_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if (min..=max).contains(&value) {
        value
    } else {
        fallback
    }
}

/// Closed-form metrics for a launch and landing at ground level. Values are
/// kept at full precision; use [`FlightMetrics::display`] for presentation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FlightMetrics {
    pub launch: LaunchParameters,
    pub vx_mps: f64,
    pub vy_mps: f64,
    pub time_of_flight_s: f64,
    pub max_height_m: f64,
    pub range_m: f64,
}

impl FlightMetrics {
    pub fn compute(launch: LaunchParameters) -> Self {
        // Fields are public, so values may not have passed through `with_defaults`.
        let launch = LaunchParameters::new(launch.angle_deg, launch.speed_mps, launch.gravity_mps2);
        let (vx, vy) = launch.velocity_components();
        let g = launch.gravity_mps2;

        let time_of_flight_s = (2.0 * vy) / g;
        let range_m = vx * time_of_flight_s;
        let max_height_m = (vy * vy) / (2.0 * g);

        Self {
            launch,
            vx_mps: vx,
            vy_mps: vy,
            time_of_flight_s,
            max_height_m,
            range_m,
        }
    }

    /// Physical position in meters `time_s` seconds after launch.
    pub fn position_at(&self, time_s: f64) -> (f64, f64) {
        let x = self.vx_mps * time_s;
        let y = (self.vy_mps * time_s) - (0.5 * self.launch.gravity_mps2 * time_s * time_s);
        (x, y)
    }

    pub fn is_degenerate(&self) -> bool {
        self.time_of_flight_s <= 0.0
    }

    pub fn display(&self) -> DisplayMetrics {
        DisplayMetrics {
            time_of_flight_s: round_hundredths(self.time_of_flight_s),
            max_height_m: round_hundredths(self.max_height_m),
            range_m: round_hundredths(self.range_m),
        }
    }
}

pub fn compute_flight_metrics(speed_mps: f64, angle_deg: f64, gravity_mps2: f64) -> FlightMetrics {
    FlightMetrics::compute(LaunchParameters::new(angle_deg, speed_mps, gravity_mps2))
}

/// Flight metrics rounded to two decimals. Never fed back into simulation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    pub time_of_flight_s: f64,
    pub max_height_m: f64,
    pub range_m: f64,
}

pub fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
