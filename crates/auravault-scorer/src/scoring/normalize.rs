//! Log-scale normalization
//!
//! Follower and engagement counts are power-law distributed, so each metric
//! is interpolated on `ln(value)` between `ln(min)` and `ln(max)`: going from
//! 10 to 100 followers moves the score as much as 10k to 100k.

/// Interpolation bounds for one metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogRange {
    pub min: f64,
    pub max: f64,
    pub scale: f64,
}

/// Followers: 10 -> 0, 100k -> 200
pub const FOLLOWER_RANGE: LogRange = LogRange {
    min: 10.0,
    max: 100_000.0,
    scale: 200.0,
};

/// Follower delta: 1 -> 0, 1000 -> 200
pub const FOLLOWER_DELTA_RANGE: LogRange = LogRange {
    min: 1.0,
    max: 1_000.0,
    scale: 200.0,
};

/// Average likes: 1 -> 0, 1000 -> 200
pub const AVG_LIKES_RANGE: LogRange = LogRange {
    min: 1.0,
    max: 1_000.0,
    scale: 200.0,
};

impl LogRange {
    pub fn normalize(&self, value: f64) -> f64 {
        normalize_log(value, self.min, self.max, self.scale)
    }
}

/// Map `value` onto `[0, scale]` by interpolating its logarithm
pub fn normalize_log(value: f64, min: f64, max: f64, scale: f64) -> f64 {
    if value <= min {
        return 0.0;
    }
    if value >= max {
        return scale;
    }
    let log_min = min.ln();
    let log_max = max.ln();
    let normalized = (value.ln() - log_min) / (log_max - log_min) * scale;
    normalized.clamp(0.0, scale)
}
