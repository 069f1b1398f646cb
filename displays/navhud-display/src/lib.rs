//! Render sink for the navHUD display
//!
//! This crate provides:
//! - `DisplayBackend` trait: the drawing primitives a panel driver offers
//! - `Bitmap`: 1 bpp image view with a dimension check
//! - Built-in icons (logo, link indicator)
//! - `NavScreen`: lays out decoded navigation messages, the idle screen and
//!   the link indicator on a 128x64 panel
//!
//! # Architecture
//!
//! The screen logic only talks to `DisplayBackend`, so it runs unchanged
//! against the SSD1306 driver in the firmware and against a recording fake
//! in host tests. Link state is passed into every call rather than kept in
//! a global.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod backend;
pub mod bitmap;
pub mod icons;
pub mod screen;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError, TextSize};
pub use bitmap::Bitmap;
pub use screen::{NavScreen, SCREEN_HEIGHT, SCREEN_WIDTH};
