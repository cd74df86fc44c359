//! Core types and service wiring for the fillbridge waste container integration.

/// Mapping of vendor assets to fill-level readings.
pub mod classify;
/// Domain models for vendor assets and fill-level readings.
pub mod model;
/// Traits describing the asset source and measurement sink.
pub mod ports;
/// SenML measurement pack encoding.
pub mod senml;
/// High-level pipeline facade used by the binary.
pub mod service;

pub use classify::*;
pub use model::*;
pub use ports::*;
pub use service::*;
