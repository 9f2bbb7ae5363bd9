//! trustcourse library crate.
//!
//! The primary interface is the `trustcourse` binary. The session core
//! (`trial`, `clock`, `session`, `results`) is presentation-agnostic so
//! integration tests can drive a full session headless, without a
//! terminal; `tui`, `doctor`, and `telemetry` are the binary's concerns.

pub mod clock;
pub mod config;
pub mod doctor;
pub mod error;
pub mod results;
pub mod session;
pub mod telemetry;
pub mod trial;
pub mod tui;
