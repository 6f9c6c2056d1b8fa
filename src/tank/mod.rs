pub mod classifier;
mod service;

pub use service::{
    canonical_value, SensorReading, SettingChange, TankService, MISSING_SETTING_FIELDS,
    UNSUPPORTED_SETTING_VALUE,
};
