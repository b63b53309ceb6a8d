pub mod config;
pub mod data;
pub mod plot;
pub mod stats;

pub const NANOS_PER_MICRO: f64 = 1_000.0;
