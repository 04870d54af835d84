//! CLI library components for the visor de costos.

pub mod logging;
