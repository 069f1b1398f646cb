//! Board-agnostic core logic for the navHUD display
//!
//! This crate contains the application logic that does not depend on the
//! MCU or the display panel:
//!
//! - Configuration types and the `navhud.toml` parser
//! - The receive pipeline: chunk reassembly, stalled-session expiry and
//!   message decoding, with counters for diagnostics

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod pipeline;

pub use config::{parse_config, HudConfig};
pub use pipeline::{NavPipeline, PipelineEvent, PipelineStats};
