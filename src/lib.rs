//! change-sentry library crate.
//!
//! Watches a camera, compares every frame against rotating reference images
//! and sounds an alarm when enough pixels differ. Exposed as a library so the
//! session loop can be driven by integration tests.

pub mod alarm;
pub mod ascii;
pub mod camera;
pub mod cli;
pub mod config;
pub mod detect;
pub mod input;
pub mod reference;
pub mod session;
pub mod shutdown;
pub mod terminal;
