//! Normal/abnormal judgment for the three water-quality metrics.
//!
//! A metric is `Abnormal` only when a value is present and lies strictly
//! outside its band; the band edges themselves are `Normal`, and so is a
//! missing value. Nothing here touches I/O, so the functions can be used from
//! any layer.

use crate::db::models::Status;

/// Inclusive band of acceptable values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn classify(&self, value: Option<f64>) -> Status {
        match value {
            Some(v) if v < self.min || v > self.max => Status::Abnormal,
            _ => Status::Normal,
        }
    }
}

/// Water temperature, degrees Celsius.
pub const TEMPERATURE: Range = Range { min: 5.0, max: 40.0 };

/// Acidity, unitless pH scale.
pub const PH: Range = Range { min: 6.5, max: 8.5 };

/// Total dissolved solids, parts per million.
pub const TDS: Range = Range { min: 0.0, max: 1000.0 };

pub fn classify_temperature(value: Option<f64>) -> Status {
    TEMPERATURE.classify(value)
}

pub fn classify_ph(value: Option<f64>) -> Status {
    PH.classify(value)
}

pub fn classify_tds(value: Option<f64>) -> Status {
    TDS.classify(value)
}
