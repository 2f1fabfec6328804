//! blockpool - fork-join worker pool and block-parallel texture compression
//!
//! The library has two layers:
//!
//! - [`pool`] - a fixed-size worker pool with counting join tokens, usable
//!   for any CPU-bound fan-out
//! - [`texture`] - a dispatcher that splits an image (or cubemap) into rows
//!   of 4×4 blocks and encodes them on the pool with BC5, BC6H or BC7
//!
//! [`app`] wires both together from a [`config`] file, [`logging`] sets up
//! tracing output, and [`telemetry`] exposes pool counters.

pub mod app;
pub mod config;
pub mod logging;
pub mod pool;
pub mod telemetry;
pub mod texture;
