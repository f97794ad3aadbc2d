//! Interactive timeline/Gantt widget for egui.
//!
//! The headless core ([`model`], [`layout`], [`interaction`]) maps time to
//! pixels, stacks overlapping items and runs the pointer state machine. The
//! [`ui`] module draws it with egui and feeds it real input.

pub mod config;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod ui;

pub use config::TimelineConfig;
pub use error::{Result, TimelineError};
